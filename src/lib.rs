pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod persist;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Feature, InputLayer, Layer, Neuron};
pub use network::{Network, NetworkBuilder, LayerSpec, NetworkSpec};
pub use loss::loss_type::LossType;
pub use optim::{Adam, AdamW, Optimizer, OptimizerBank, Sgd};
pub use train::{
    train_network, ChannelReceiver, CheckpointConfig, EpochStats, ItemPool, LineSource, LogReceiver,
    MemorySource, OutputReceiver, SampleSource, ShuffleSource, TrainConfig, TrainSummary, Trainer,
    TrainingItem,
};
pub use persist::{Encoding, ScaleTable};
