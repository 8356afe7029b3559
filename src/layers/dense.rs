use crate::activation::activation::ActivationFunction;

/// A hidden or output unit.
///
/// `weights[k]` is the connection to neuron `k` of the next layer; neurons of
/// the output layer own no outgoing weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    pub bias: f64,
    /// Pre-activation value from the last inference pass.
    pub sum: f64,
    /// Value after the activation function from the last inference pass.
    pub activated_value: f64,
}

impl Neuron {
    pub fn new(bias: f64, weights: Vec<f64>) -> Neuron {
        Neuron { weights, bias, ..Neuron::default() }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub(crate) fn allocate(&mut self, next_size: usize) {
        self.weights = vec![0.0; next_size];
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    activator: ActivationFunction,
}

impl Layer {
    pub fn new(size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            neurons: vec![Neuron::default(); size],
            activator: activation,
        }
    }

    /// Builds a layer from explicit neurons, e.g. to start from known weights.
    pub fn from_neurons(neurons: Vec<Neuron>, activation: ActivationFunction) -> Layer {
        Layer { neurons, activator: activation }
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    /// Feeds `input` (the previous layer's activations) through the previous
    /// layer's outgoing weights, storing sums and activations on the neurons.
    pub(crate) fn feed_from<'a>(&mut self, input: &[f64], weights: impl Iterator<Item = &'a [f64]>) -> Vec<f64> {
        for neuron in &mut self.neurons {
            neuron.sum = neuron.bias;
        }
        for (x, row) in input.iter().zip(weights) {
            for (neuron, w) in self.neurons.iter_mut().zip(row) {
                neuron.sum += x * w;
            }
        }
        let activator = self.activator;
        self.neurons.iter_mut()
            .map(|neuron| {
                neuron.activated_value = activator.function(neuron.sum);
                neuron.activated_value
            })
            .collect()
    }
}
