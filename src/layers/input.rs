/// One raw input dimension. `weights[j]` connects it to neuron `j` of the
/// first layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    weights: Vec<f64>,
}

impl Feature {
    pub fn new(weights: Vec<f64>) -> Feature {
        Feature { weights }
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
pub struct InputLayer {
    features: Vec<Feature>,
}

impl InputLayer {
    pub fn new(size: usize) -> InputLayer {
        InputLayer { features: vec![Feature::default(); size] }
    }

    pub fn from_features(features: Vec<Feature>) -> InputLayer {
        InputLayer { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut [Feature] {
        &mut self.features
    }

    pub fn size(&self) -> usize {
        self.features.len()
    }
}
