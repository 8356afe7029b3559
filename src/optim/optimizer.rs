use serde::{Serialize, Deserialize};

use crate::optim::{adam::Adam, adamw::AdamW, sgd::Sgd};

/// Update rule for one scalar parameter.
///
/// A configured value acts as a prototype: the training run clones one fresh
/// instance per weight and bias so moment histories never mix.
///
/// Deserializes from `{"type": "Adam", "alpha": 0.01}`-style JSON; omitted
/// hyperparameters take their usual defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Optimizer {
    Sgd(Sgd),
    Adam(Adam),
    AdamW(AdamW),
}

impl Optimizer {
    /// Returns the new value of `parameter` after one step against `gradient`.
    pub fn update(&mut self, parameter: f64, gradient: f64) -> f64 {
        match self {
            Optimizer::Sgd(sgd) => sgd.update(parameter, gradient),
            Optimizer::Adam(adam) => adam.update(parameter, gradient),
            Optimizer::AdamW(adamw) => adamw.update(parameter, gradient),
        }
    }

    /// An independent instance with the same hyperparameters and empty state.
    pub fn fresh(&self) -> Optimizer {
        match self {
            Optimizer::Sgd(sgd) => Optimizer::Sgd(sgd.clone()),
            Optimizer::Adam(adam) => Optimizer::Adam(adam.fresh()),
            Optimizer::AdamW(adamw) => Optimizer::AdamW(adamw.fresh()),
        }
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Optimizer::Sgd(Sgd::default())
    }
}
