use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::optim::optimizer::Optimizer;
use crate::train::gradients::Gradients;

/// One optimizer per trainable scalar, indexed in the network's canonical
/// parameter order.
#[derive(Debug, Clone)]
pub struct OptimizerBank {
    slots: Vec<Optimizer>,
}

impl OptimizerBank {
    pub fn new(prototype: &Optimizer, parameter_count: usize) -> OptimizerBank {
        OptimizerBank {
            slots: (0..parameter_count).map(|_| prototype.fresh()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrites every weight and bias of `network` with its optimizer's
    /// update against the matching (already averaged) gradient.
    pub fn step(&mut self, network: &mut Network, gradients: &Gradients) -> Result<()> {
        let count = network.parameter_count();
        if count != self.slots.len() || gradients.len() != self.slots.len() {
            return Err(NetError::ShapeMismatch { expected: self.slots.len(), found: count });
        }

        let mut slots = self.slots.iter_mut();
        let mut grads = gradients.iter_ordered();
        network.for_each_parameter_mut(|_, parameter| {
            if let (Some(optimizer), Some(gradient)) = (slots.next(), grads.next()) {
                *parameter = optimizer.update(*parameter, gradient);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::optim::{Adam, Sgd};

    fn net() -> Network {
        Network::new(2, vec![(2, ActivationFunction::Identity), (1, ActivationFunction::Identity)]).unwrap()
    }

    #[test]
    fn one_slot_per_parameter() {
        let network = net();
        let bank = OptimizerBank::new(&Optimizer::default(), network.parameter_count());
        assert_eq!(bank.len(), 2 * 2 + 2 * 1 + 2 + 1);
    }

    #[test]
    fn sgd_step_subtracts_scaled_gradient() {
        let mut network = net();
        let mut bank = OptimizerBank::new(&Optimizer::Sgd(Sgd::new(0.5)), network.parameter_count());
        let mut grads = Gradients::for_network(&network);
        grads.weights[0][(1, 0)] = 2.0;
        grads.biases[1][0] = -4.0;

        bank.step(&mut network, &grads).unwrap();

        assert_eq!(network.input_layer().features()[1].weights()[0], -1.0);
        assert_eq!(network.output_layer().neurons()[0].bias, 2.0);
        assert_eq!(network.layers()[0].neurons()[0].weights()[0], 0.0);
    }

    #[test]
    fn parameters_keep_separate_histories() {
        let mut network = net();
        let mut bank = OptimizerBank::new(&Optimizer::Adam(Adam::default()), network.parameter_count());
        let mut grads = Gradients::for_network(&network);

        // Only one weight receives gradients for two steps.
        grads.weights[0][(0, 0)] = 1.0;
        bank.step(&mut network, &grads).unwrap();
        bank.step(&mut network, &grads).unwrap();

        grads.weights[0][(0, 0)] = 0.0;
        grads.weights[0][(0, 1)] = 1.0;
        bank.step(&mut network, &grads).unwrap();

        // The neighbouring weight only ever saw gradients 0, 0, 1.
        let mut twin = Adam::default();
        let mut expected = 0.0;
        for g in [0.0, 0.0, 1.0] {
            expected = twin.update(expected, g);
        }
        let moved = network.input_layer().features()[0].weights()[1];
        assert!((moved - expected).abs() < 1e-12);

        let mut twin = Adam::default();
        let mut expected = 0.0;
        for g in [1.0, 1.0, 0.0] {
            expected = twin.update(expected, g);
        }
        let first = network.input_layer().features()[0].weights()[0];
        assert!((first - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_network() {
        let mut network = net();
        let mut bank = OptimizerBank::new(&Optimizer::default(), 3);
        let grads = Gradients::for_network(&network);
        assert!(bank.step(&mut network, &grads).is_err());
    }
}
