use serde::{Serialize, Deserialize};

use crate::optim::adam::Moments;

/// Adam with decoupled weight decay (Loshchilov & Hutter): the decay term
/// `α·weight_decay·p` is subtracted from the parameter directly instead of
/// being folded into the gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamW {
    pub alpha: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    pub weight_decay: f64,
    #[serde(skip)]
    moments: Moments,
}

impl AdamW {
    pub fn new(alpha: f64, beta1: f64, beta2: f64, epsilon: f64, weight_decay: f64) -> AdamW {
        AdamW { alpha, beta1, beta2, epsilon, weight_decay, moments: Moments::default() }
    }

    pub fn update(&mut self, parameter: f64, gradient: f64) -> f64 {
        let adam_update = self.alpha * self.moments.step(gradient, self.beta1, self.beta2, self.epsilon);
        let decoupled_weight_decay = self.alpha * self.weight_decay * parameter;
        parameter - adam_update - decoupled_weight_decay
    }

    pub fn fresh(&self) -> AdamW {
        AdamW::new(self.alpha, self.beta1, self.beta2, self.epsilon, self.weight_decay)
    }
}

impl Default for AdamW {
    fn default() -> Self {
        AdamW::new(0.001, 0.9, 0.999, 1e-8, 0.01)
    }
}
