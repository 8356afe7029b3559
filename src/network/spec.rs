use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::network::network::{Network, NetworkBuilder};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `activation` — activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A fully serializable description of a network architecture plus the loss
/// it is trained with.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of the
/// trained weights, making it possible to store architecture configurations
/// before training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the weight file stem.
    pub name: String,
    /// Number of raw input features.
    pub input_size: usize,
    /// Ordered list of layer descriptions (first hidden → output).
    pub layers: Vec<LayerSpec>,
    /// Loss function to pair with this network during training.
    pub loss: LossType,
}

impl NetworkSpec {
    /// Declares and builds the described network with zeroed weights.
    pub fn to_network(&self) -> Result<Network> {
        self.layers.iter()
            .try_fold(NetworkBuilder::new().add_input_layer(self.input_size)?, |builder, layer| {
                builder.add_layer(layer.size, layer.activation)
            })?
            .build()
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
