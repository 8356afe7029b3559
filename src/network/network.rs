use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::layers::{Feature, InputLayer, Layer, Neuron};

/// Declares the shape of a [`Network`] before any weight is allocated.
///
/// Layers are declared input first; `build()` consumes the builder and sizes
/// every weight vector against the neighbouring layer, so a network's shape
/// can never change once built.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    input_size: Option<usize>,
    layers: Vec<(usize, ActivationFunction)>,
}

impl NetworkBuilder {
    pub fn new() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn add_input_layer(mut self, size: usize) -> Result<NetworkBuilder> {
        if self.input_size.is_some() {
            return Err(NetError::config("input layer was already set"));
        }
        if size == 0 {
            return Err(NetError::config("input layer must have at least one feature"));
        }
        self.input_size = Some(size);
        Ok(self)
    }

    /// Adds a hidden layer; the last one added becomes the output layer.
    pub fn add_layer(mut self, size: usize, activation: ActivationFunction) -> Result<NetworkBuilder> {
        if size == 0 {
            return Err(NetError::config("layer must have at least one neuron"));
        }
        self.layers.push((size, activation));
        Ok(self)
    }

    /// Allocates zeroed weights for every connection.
    pub fn build(self) -> Result<Network> {
        let input_size = self
            .input_size
            .ok_or_else(|| NetError::config("input layer was not set"))?;
        if self.layers.is_empty() {
            return Err(NetError::config("network needs at least one layer"));
        }

        let mut input_layer = InputLayer::new(input_size);
        for feature in input_layer.features_mut() {
            feature.allocate(self.layers[0].0);
        }

        let mut layers: Vec<Layer> = self.layers.iter()
            .map(|&(size, activation)| Layer::new(size, activation))
            .collect();
        for i in 0..layers.len() - 1 {
            let next_size = layers[i + 1].size();
            for neuron in layers[i].neurons_mut() {
                neuron.allocate(next_size);
            }
        }

        Ok(Network { input_layer, layers })
    }
}

/// A built feedforward network: one input layer and a non-empty list of
/// layers, the last of which is the output layer.
///
/// Parameters have one canonical order, shared by the optimizer bank and the
/// weight file: the input features' weights in declaration order, then for
/// every layer and every neuron its bias followed by its outgoing weights.
#[derive(Debug, Clone)]
pub struct Network {
    input_layer: InputLayer,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from an input size and (size, activation) pairs.
    pub fn new(input_size: usize, layer_specs: Vec<(usize, ActivationFunction)>) -> Result<Network> {
        layer_specs.into_iter()
            .try_fold(NetworkBuilder::new().add_input_layer(input_size)?, |builder, (size, activation)| {
                builder.add_layer(size, activation)
            })?
            .build()
    }

    /// Assembles a network from layers that already carry weights.
    ///
    /// Every weight vector must match the size of the layer it feeds and the
    /// output layer must own no weights.
    pub fn from_layers(input_layer: InputLayer, layers: Vec<Layer>) -> Result<Network> {
        let first = layers
            .first()
            .ok_or_else(|| NetError::config("network needs at least one layer"))?;
        if input_layer.size() == 0 || layers.iter().any(|l| l.size() == 0) {
            return Err(NetError::config("layers must not be empty"));
        }
        if input_layer.features().iter().any(|f| f.weights().len() != first.size()) {
            return Err(NetError::config(format!(
                "input features must carry {} weights",
                first.size()
            )));
        }
        for (i, layer) in layers.iter().enumerate() {
            let expected = layers.get(i + 1).map_or(0, Layer::size);
            if layer.neurons().iter().any(|n| n.weights().len() != expected) {
                return Err(NetError::config(format!(
                    "neurons of layer {i} must carry {expected} weights"
                )));
            }
        }
        Ok(Network { input_layer, layers })
    }

    pub fn input_layer(&self) -> &InputLayer {
        &self.input_layer
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn input_size(&self) -> usize {
        self.input_layer.size()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().size()
    }

    /// Number of layer boundaries: input→L0 plus one per pair of adjacent layers.
    pub fn boundary_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of trainable scalars (weights and biases).
    pub fn parameter_count(&self) -> usize {
        let mut count = self.input_layer.size() * self.layers[0].size();
        for pair in self.layers.windows(2) {
            count += pair[0].size() * pair[1].size();
        }
        count + self.layers.iter().map(Layer::size).sum::<usize>()
    }

    pub fn initialize_random(&mut self) {
        self.initialize_random_with(&mut rand::thread_rng());
    }

    /// Re-draws every weight and bias from the activation-specific rule of
    /// the layer it feeds into.
    pub fn initialize_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let sizes: Vec<usize> = self.layers.iter().map(Layer::size).collect();
        let fans = |layer: usize| {
            let fan_in = if layer == 0 { self.input_layer.size() } else { sizes[layer - 1] };
            (fan_in, sizes.get(layer + 1).copied().unwrap_or(0))
        };
        let fans: Vec<(usize, usize)> = (0..sizes.len()).map(fans).collect();

        let first = self.layers[0].activation();
        let (fan_in, fan_out) = fans[0];
        for feature in self.input_layer.features_mut() {
            for w in feature.weights_mut() {
                *w = first.random_weight(fan_in, fan_out, rng);
            }
        }

        for i in 0..self.layers.len() {
            let own = self.layers[i].activation();
            let (own_in, own_out) = fans[i];
            let next = self.layers.get(i + 1).map(|l| (l.activation(), fans[i + 1]));

            for neuron in self.layers[i].neurons_mut() {
                neuron.bias = own.random_weight(own_in, own_out, rng);
                if let Some((activation, (fan_in, fan_out))) = next {
                    for w in neuron.weights_mut() {
                        *w = activation.random_weight(fan_in, fan_out, rng);
                    }
                }
            }
        }
    }

    /// Inference pass; stores sums and activations on each neuron.
    ///
    /// Fails with [`NetError::ShapeMismatch`] when `input` does not have one
    /// value per input feature.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_layer.size() {
            return Err(NetError::ShapeMismatch { expected: self.input_layer.size(), found: input.len() });
        }

        let mut current = self.layers[0].feed_from(input, self.input_layer.features().iter().map(Feature::weights));
        for i in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(i);
            current = after[0].feed_from(&current, before[i - 1].neurons().iter().map(Neuron::weights));
        }
        Ok(current)
    }

    /// Visits every parameter in canonical order together with the index of
    /// the layer boundary it belongs to.
    ///
    /// Boundary 0 holds the input weights and the first layer's biases;
    /// boundary `i + 1` holds layer `i`'s outgoing weights and layer
    /// `i + 1`'s biases.
    pub fn for_each_parameter<F: FnMut(usize, f64)>(&self, mut f: F) {
        for feature in self.input_layer.features() {
            feature.weights().iter().for_each(|w| f(0, *w));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            for neuron in layer.neurons() {
                f(i, neuron.bias);
                neuron.weights().iter().for_each(|w| f(i + 1, *w));
            }
        }
    }

    /// Mutable counterpart of [`Network::for_each_parameter`].
    pub fn for_each_parameter_mut<F: FnMut(usize, &mut f64)>(&mut self, mut f: F) {
        for feature in self.input_layer.features_mut() {
            feature.weights_mut().iter_mut().for_each(|w| f(0, w));
        }
        for (i, layer) in self.layers.iter_mut().enumerate() {
            for neuron in layer.neurons_mut() {
                f(i, &mut neuron.bias);
                neuron.weights_mut().iter_mut().for_each(|w| f(i + 1, w));
            }
        }
    }

    /// All parameters flattened in canonical order.
    pub fn parameters(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.parameter_count());
        self.for_each_parameter(|_, v| values.push(v));
        values
    }

    /// Overwrites every parameter from a flat slice in canonical order.
    pub fn set_parameters(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.parameter_count();
        if values.len() != expected {
            return Err(NetError::ShapeMismatch { expected, found: values.len() });
        }
        let mut source = values.iter();
        self.for_each_parameter_mut(|_, p| {
            if let Some(v) = source.next() {
                *p = *v;
            }
        });
        Ok(())
    }
}
