use crate::layers::{Feature, Neuron};
use crate::loss::LossType;
use crate::network::network::Network;
use crate::train::gradients::Gradients;

/// Per-worker forward/backward scratch.
///
/// Workers share the network read-only, so the pre-activation sums and
/// activations of a sample live here instead of on the neurons.
#[derive(Debug, Clone)]
pub struct Backprop {
    sums: Vec<Vec<f64>>,
    activations: Vec<Vec<f64>>,
    deltas: Vec<Vec<f64>>,
}

impl Backprop {
    pub fn for_network(network: &Network) -> Backprop {
        let shape: Vec<Vec<f64>> = network.layers().iter().map(|l| vec![0.0; l.size()]).collect();
        Backprop { sums: shape.clone(), activations: shape.clone(), deltas: shape }
    }

    /// Activations of the output layer after the last [`Backprop::forward`].
    pub fn output(&self) -> &[f64] {
        self.activations.last().map_or(&[][..], Vec::as_slice)
    }

    /// Runs `input` through `network`, keeping every layer's sums and
    /// activations.
    pub fn forward(&mut self, network: &Network, input: &[f64]) -> &[f64] {
        for (l, layer) in network.layers().iter().enumerate() {
            let (previous, rest) = self.activations.split_at_mut(l);
            let source = if l == 0 { input } else { &previous[l - 1][..] };
            let sums = &mut self.sums[l];

            for (sum, neuron) in sums.iter_mut().zip(layer.neurons()) {
                *sum = neuron.bias;
            }
            if l == 0 {
                let rows = network.input_layer().features().iter().map(Feature::weights);
                accumulate_products(sums, source, rows);
            } else {
                let rows = network.layers()[l - 1].neurons().iter().map(Neuron::weights);
                accumulate_products(sums, source, rows);
            }

            let activation = layer.activation();
            for (a, sum) in rest[0].iter_mut().zip(sums.iter()) {
                *a = activation.function(*sum);
            }
        }
        self.output()
    }

    /// Back-propagates the loss of the last forward pass against `expected`
    /// and adds the resulting gradients into `gradients`.
    pub fn backward(&mut self, network: &Network, input: &[f64], expected: &[f64], loss: LossType, gradients: &mut Gradients) {
        let layers = network.layers();
        let last = layers.len() - 1;

        let activation = layers[last].activation();
        for (j, delta) in self.deltas[last].iter_mut().enumerate() {
            let a = self.activations[last][j];
            *delta = loss.derivative(a, expected[j]) * activation.derivative(self.sums[last][j]);
        }

        for l in (0..last).rev() {
            let (head, tail) = self.deltas.split_at_mut(l + 1);
            let next = &tail[0];
            let activation = layers[l].activation();
            for (j, neuron) in layers[l].neurons().iter().enumerate() {
                let carried: f64 = neuron.weights().iter().zip(next).map(|(w, d)| w * d).sum();
                head[l][j] = carried * activation.derivative(self.sums[l][j]);
            }
        }

        for (l, deltas) in self.deltas.iter().enumerate() {
            for (g, d) in gradients.biases[l].iter_mut().zip(deltas) {
                *g += d;
            }
            let source = if l == 0 { input } else { &self.activations[l - 1][..] };
            let boundary = &mut gradients.weights[l];
            for (i, x) in source.iter().enumerate() {
                for (g, d) in boundary.row_mut(i).iter_mut().zip(deltas) {
                    *g += x * d;
                }
            }
        }
    }

    /// Forward pass followed by backward pass; returns the sample loss.
    pub fn train_sample(&mut self, network: &Network, input: &[f64], expected: &[f64], loss: LossType, gradients: &mut Gradients) -> f64 {
        let sample_loss = loss.total(self.forward(network, input), expected);
        self.backward(network, input, expected, loss, gradients);
        sample_loss
    }

    /// Forward pass only; returns the sample loss.
    pub fn evaluate(&mut self, network: &Network, input: &[f64], expected: &[f64], loss: LossType) -> f64 {
        loss.total(self.forward(network, input), expected)
    }
}

fn accumulate_products<'a>(sums: &mut [f64], source: &[f64], rows: impl Iterator<Item = &'a [f64]>) {
    for (x, row) in source.iter().zip(rows) {
        for (sum, w) in sums.iter_mut().zip(row) {
            *sum += x * w;
        }
    }
}
