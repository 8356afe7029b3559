pub mod backprop;
pub mod epoch_stats;
pub mod gradients;
pub mod pool;
pub mod queue;
pub mod receiver;
pub mod sample;
pub mod sources;
pub mod train_config;
pub mod trainer;
pub mod worker_pool;

pub use backprop::Backprop;
pub use epoch_stats::EpochStats;
pub use gradients::Gradients;
pub use pool::ItemPool;
pub use queue::WorkQueue;
pub use receiver::{ChannelReceiver, LogReceiver, OutputReceiver};
pub use sample::{SampleSource, TrainingItem};
pub use sources::{LineSource, MemorySource, ShuffleSource};
pub use train_config::{CheckpointConfig, TrainConfig};
pub use trainer::{train_network, TrainSummary, Trainer};
pub use worker_pool::{Losses, WorkerPool};
