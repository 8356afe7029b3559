use serde::{Serialize, Deserialize};

use crate::loss::{BceLoss, HuberLoss, MaeLoss, MseLoss};

/// Selects which loss function the workers evaluate per output neuron.
///
/// - `Mse`                — squared error; pair with Identity or Sigmoid output.
/// - `Mae`                — absolute error; pair with Identity output.
/// - `Huber`              — Huber loss (δ=1.0); pair with Identity output.
/// - `BinaryCrossEntropy` — binary cross-entropy; pair with Sigmoid output.
///
/// A sample's loss is the sum of `value()` over its output neurons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    Mae,
    Huber,
    BinaryCrossEntropy,
}

impl LossType {
    pub fn value(&self, current: f64, expected: f64) -> f64 {
        match self {
            LossType::Mse                => MseLoss::value(current, expected),
            LossType::Mae                => MaeLoss::value(current, expected),
            LossType::Huber              => HuberLoss::value(current, expected),
            LossType::BinaryCrossEntropy => BceLoss::value(current, expected),
        }
    }

    /// Partial derivative with respect to the network output `current`.
    pub fn derivative(&self, current: f64, expected: f64) -> f64 {
        match self {
            LossType::Mse                => MseLoss::derivative(current, expected),
            LossType::Mae                => MaeLoss::derivative(current, expected),
            LossType::Huber              => HuberLoss::derivative(current, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(current, expected),
        }
    }

    /// Summed loss over all outputs of one sample.
    pub fn total(&self, outputs: &[f64], expected: &[f64]) -> f64 {
        outputs.iter().zip(expected)
            .map(|(c, e)| self.value(*c, *e))
            .sum()
    }
}
