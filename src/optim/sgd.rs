use serde::{Serialize, Deserialize};

/// Plain gradient descent: `p - learning_rate * g`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    pub fn update(&self, parameter: f64, gradient: f64) -> f64 {
        parameter - self.learning_rate * gradient
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd::new(0.1)
    }
}
