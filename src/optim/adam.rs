use serde::{Serialize, Deserialize};

/// Per-parameter moment estimates shared by [`Adam`] and `AdamW`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Moments {
    momentum: f64,
    velocity: f64,
    /// Running products β1^t and β2^t for bias correction.
    beta1_t: f64,
    beta2_t: f64,
}

impl Default for Moments {
    fn default() -> Self {
        Moments { momentum: 0.0, velocity: 0.0, beta1_t: 1.0, beta2_t: 1.0 }
    }
}

impl Moments {
    /// Advances one step and returns `corrected_momentum / (sqrt(corrected_velocity) + ε)`.
    pub(crate) fn step(&mut self, gradient: f64, beta1: f64, beta2: f64, epsilon: f64) -> f64 {
        self.momentum = beta1 * self.momentum + (1.0 - beta1) * gradient;
        self.velocity = beta2 * self.velocity + (1.0 - beta2) * gradient * gradient;

        self.beta1_t *= beta1;
        self.beta2_t *= beta2;
        let corr_momentum = self.momentum / (1.0 - self.beta1_t);
        let corr_velocity = self.velocity / (1.0 - self.beta2_t);

        corr_momentum / (corr_velocity.sqrt() + epsilon)
    }
}

/// Adam (Kingma & Ba, 2014) for a single scalar parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adam {
    pub alpha: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    #[serde(skip)]
    moments: Moments,
}

impl Adam {
    pub fn new(alpha: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { alpha, beta1, beta2, epsilon, moments: Moments::default() }
    }

    pub fn update(&mut self, parameter: f64, gradient: f64) -> f64 {
        parameter - self.alpha * self.moments.step(gradient, self.beta1, self.beta2, self.epsilon)
    }

    /// Same hyperparameters, no history.
    pub fn fresh(&self) -> Adam {
        Adam::new(self.alpha, self.beta1, self.beta2, self.epsilon)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam::new(0.001, 0.9, 0.999, 1e-8)
    }
}
