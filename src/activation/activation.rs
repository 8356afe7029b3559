use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Activation applied element-wise to a layer's pre-activation sums.
///
/// Every variant also carries the random-weight rule used by
/// `Network::initialize_random()` for the weights feeding a layer that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    Tanh,
    ReLU,
    LeakyReLU { alpha: f64 },
    /// ReLU clamped to `[0, max]`; the usual choice for hidden layers of
    /// networks that are later quantized.
    ClippedReLU { max: f64 },
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::ClippedReLU { max } => x.clamp(0.0, *max),
        }
    }

    /// Derivative with respect to the pre-activation sum `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::ClippedReLU { max } => {
                if x > 0.0 && x < *max { 1.0 } else { 0.0 }
            }
        }
    }

    /// Draws one initial weight for a connection into a layer using this
    /// activation.
    ///
    /// `fan_in` is the size of the layer feeding this one, `fan_out` the size
    /// of the layer this one feeds (0 for the output layer).
    ///
    /// - Identity: uniform on `[0, 1)`.
    /// - ReLU family: He-uniform, `a = sqrt(2 / fan_in)`, uniform on `[-a, a)`.
    /// - Sigmoid: `sqrt(6) / sqrt(fan_in + fan_out) * U[0, 1)` with a random sign.
    /// - Tanh: Glorot-uniform, `a = sqrt(6) / sqrt(fan_in + fan_out)`, uniform on `[-a, a)`.
    pub fn random_weight<R: Rng + ?Sized>(&self, fan_in: usize, fan_out: usize, rng: &mut R) -> f64 {
        let fan_in = fan_in as f64;
        let fan_out = fan_out as f64;
        match self {
            ActivationFunction::Identity => rng.gen::<f64>(),
            ActivationFunction::ReLU
            | ActivationFunction::LeakyReLU { .. }
            | ActivationFunction::ClippedReLU { .. } => {
                let a = (2.0 / fan_in).sqrt();
                rng.gen::<f64>() * 2.0 * a - a
            }
            ActivationFunction::Sigmoid => {
                let magnitude = 6.0_f64.sqrt() / (fan_in + fan_out).sqrt() * rng.gen::<f64>();
                if rng.gen_bool(0.5) { magnitude } else { -magnitude }
            }
            ActivationFunction::Tanh => {
                let a = 6.0_f64.sqrt() / (fan_in + fan_out).sqrt();
                rng.gen::<f64>() * 2.0 * a - a
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 1e-6;

    fn numeric_derivative(f: ActivationFunction, x: f64) -> f64 {
        (f.function(x + H) - f.function(x - H)) / (2.0 * H)
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let functions = [
            ActivationFunction::Identity,
            ActivationFunction::Sigmoid,
            ActivationFunction::Tanh,
            ActivationFunction::ReLU,
            ActivationFunction::LeakyReLU { alpha: 0.01 },
            ActivationFunction::ClippedReLU { max: 1.0 },
        ];
        for f in functions {
            for x in [-2.3, -0.4, 0.35, 0.7, 1.9] {
                let expected = numeric_derivative(f, x);
                assert!(
                    (f.derivative(x) - expected).abs() < 1e-5,
                    "{f:?} at {x}: {} vs {expected}",
                    f.derivative(x)
                );
            }
        }
    }

    #[test]
    fn clipped_relu_saturates() {
        let f = ActivationFunction::ClippedReLU { max: 300.0 };
        assert_eq!(f.function(-5.0), 0.0);
        assert_eq!(f.function(42.0), 42.0);
        assert_eq!(f.function(1000.0), 300.0);
    }

    #[test]
    fn random_weights_stay_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let w = ActivationFunction::Identity.random_weight(4, 3, &mut rng);
            assert!((0.0..1.0).contains(&w));

            let a = (2.0_f64 / 8.0).sqrt();
            let w = ActivationFunction::ReLU.random_weight(8, 3, &mut rng);
            assert!(w >= -a && w < a);

            let a = 6.0_f64.sqrt() / 5.0_f64.sqrt();
            let w = ActivationFunction::Tanh.random_weight(2, 3, &mut rng);
            assert!(w >= -a && w < a);

            let w = ActivationFunction::Sigmoid.random_weight(2, 3, &mut rng);
            assert!(w.abs() < a);
        }
    }

    #[test]
    fn sigmoid_weights_take_both_signs() {
        let mut rng = rand::thread_rng();
        let draws: Vec<f64> = (0..200)
            .map(|_| ActivationFunction::Sigmoid.random_weight(4, 4, &mut rng))
            .collect();
        assert!(draws.iter().any(|w| *w > 0.0));
        assert!(draws.iter().any(|w| *w < 0.0));
    }
}
