use std::iter;

use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Dense gradient buffers shaped like a network's parameters.
///
/// `weights[b]` is the gradient of boundary `b` (input→L0, then Li→Li+1),
/// with one row per source unit and one column per destination neuron.
/// `biases[l]` holds one entry per neuron of layer `l`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vec<f64>>,
}

impl Gradients {
    /// Zeroed buffers for `network`'s shape.
    pub fn for_network(network: &Network) -> Gradients {
        let layers = network.layers();
        let mut weights = Vec::with_capacity(layers.len());
        weights.push(Matrix::zeros(network.input_size(), layers[0].size()));
        for pair in layers.windows(2) {
            weights.push(Matrix::zeros(pair[0].size(), pair[1].size()));
        }
        let biases = layers.iter().map(|l| vec![0.0; l.size()]).collect();

        Gradients { weights, biases }
    }

    pub fn clear(&mut self) {
        self.weights.iter_mut().for_each(|m| m.fill(0.0));
        self.biases.iter_mut().for_each(|b| b.fill(0.0));
    }

    /// Element-wise `self += other`.
    pub fn accumulate(&mut self, other: &Gradients) {
        for (acc, m) in self.weights.iter_mut().zip(&other.weights) {
            *acc += m;
        }
        for (acc, b) in self.biases.iter_mut().zip(&other.biases) {
            acc.iter_mut().zip(b).for_each(|(a, g)| *a += g);
        }
    }

    /// Divides every entry by the number of samples the sums were taken over.
    pub fn average(&mut self, samples: usize) {
        let n = samples as f64;
        self.weights.iter_mut().for_each(|m| m.divide(n));
        self.biases.iter_mut().for_each(|b| b.iter_mut().for_each(|g| *g /= n));
    }

    /// Number of scalars, equal to the network's parameter count.
    pub fn len(&self) -> usize {
        self.weights.iter().map(|m| m.rows * m.cols).sum::<usize>()
            + self.biases.iter().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in the network's canonical parameter order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = f64> + '_ {
        let input = self.weights[0].as_slice().iter().copied();
        let layers = self.biases.iter().enumerate().flat_map(move |(l, biases)| {
            biases.iter().enumerate().flat_map(move |(j, bias)| {
                let outgoing = self.weights.get(l + 1).map_or(&[][..], |m| m.row(j));
                iter::once(*bias).chain(outgoing.iter().copied())
            })
        });
        input.chain(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;

    fn net() -> Network {
        Network::new(2, vec![(3, ActivationFunction::ReLU), (1, ActivationFunction::Identity)]).unwrap()
    }

    #[test]
    fn shaped_like_network() {
        let network = net();
        let grads = Gradients::for_network(&network);
        assert_eq!(grads.weights.len(), 2);
        assert_eq!((grads.weights[0].rows, grads.weights[0].cols), (2, 3));
        assert_eq!((grads.weights[1].rows, grads.weights[1].cols), (3, 1));
        assert_eq!(grads.len(), network.parameter_count());
        assert_eq!(grads.iter_ordered().count(), network.parameter_count());
    }

    #[test]
    fn accumulate_then_average() {
        let network = net();
        let mut total = Gradients::for_network(&network);
        let mut a = Gradients::for_network(&network);
        let mut b = Gradients::for_network(&network);
        a.weights[1][(2, 0)] = 3.0;
        a.biases[0][1] = 1.0;
        b.weights[1][(2, 0)] = 5.0;
        b.biases[0][1] = 2.0;

        total.accumulate(&a);
        total.accumulate(&b);
        total.average(4);

        assert_eq!(total.weights[1][(2, 0)], 2.0);
        assert_eq!(total.biases[0][1], 0.75);
    }

    #[test]
    fn ordered_iteration_matches_parameter_order() {
        let mut network = net();
        let count = network.parameter_count();
        network.set_parameters(&(0..count).map(|i| i as f64).collect::<Vec<_>>()).unwrap();

        // Mirror each parameter into the gradient slot it owns.
        let mut grads = Gradients::for_network(&network);
        for (i, feature) in network.input_layer().features().iter().enumerate() {
            grads.weights[0].row_mut(i).copy_from_slice(feature.weights());
        }
        for (l, layer) in network.layers().iter().enumerate() {
            for (j, neuron) in layer.neurons().iter().enumerate() {
                grads.biases[l][j] = neuron.bias;
                if let Some(m) = grads.weights.get_mut(l + 1) {
                    m.row_mut(j).copy_from_slice(neuron.weights());
                }
            }
        }

        assert_eq!(grads.iter_ordered().collect::<Vec<_>>(), network.parameters());
    }

    #[test]
    fn clear_zeroes_everything() {
        let network = net();
        let mut grads = Gradients::for_network(&network);
        grads.weights[0][(1, 2)] = 7.0;
        grads.biases[1][0] = -1.0;
        grads.clear();
        assert_eq!(grads, Gradients::for_network(&network));
    }
}
