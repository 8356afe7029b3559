use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::optimizer::Optimizer;

/// Where and how often a run writes its weights to disk.
///
/// Every `every` epochs the trainer writes `{name_prefix}_{epoch}.bin` (raw)
/// into `dir`, plus `quantized_{name_prefix}_{epoch}.bin` when quantization
/// levels are configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub dir: PathBuf,
    pub every: usize,
    #[serde(default = "default_prefix")]
    pub name_prefix: String,
}

fn default_prefix() -> String {
    "nn".to_string()
}

impl CheckpointConfig {
    pub fn new<P: Into<PathBuf>>(dir: P, every: usize) -> CheckpointConfig {
        CheckpointConfig { dir: dir.into(), every, name_prefix: default_prefix() }
    }

    pub fn raw_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.bin", self.name_prefix, epoch))
    }

    pub fn quantized_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("quantized_{}_{}.bin", self.name_prefix, epoch))
    }

    pub fn is_due(&self, epoch: usize) -> bool {
        self.every > 0 && epoch % self.every == 0
    }
}

/// Options for one [`Trainer`](crate::train::trainer::Trainer) run.
///
/// # Fields
/// - `epochs`       — full passes over the training source
/// - `batch_size`   — samples per optimizer step; use `1` for online training
/// - `threads`      — worker threads computing gradients
/// - `loss`         — loss evaluated per output neuron; required
/// - `optimizer`    — prototype cloned once per weight and bias
/// - `checkpoint`   — optional periodic weight files
/// - `quantization` — levels per layer boundary; empty means raw files only
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub threads: usize,
    pub loss: Option<LossType>,
    pub optimizer: Optimizer,
    pub checkpoint: Option<CheckpointConfig>,
    pub quantization: Vec<u32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            batch_size: 32,
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            loss: None,
            optimizer: Optimizer::default(),
            checkpoint: None,
            quantization: Vec::new(),
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, loss: LossType) -> Self {
        TrainConfig { epochs, batch_size, loss: Some(loss), ..TrainConfig::default() }
    }

    /// Checks the options against `network` before any thread is started.
    pub fn validate(&self, network: &Network) -> Result<LossType> {
        let loss = self.loss.ok_or_else(|| NetError::config("no loss function configured"))?;
        if self.batch_size == 0 {
            return Err(NetError::config("batch size must be at least 1"));
        }
        if self.threads == 0 {
            return Err(NetError::config("at least one worker thread is required"));
        }
        if !self.quantization.is_empty() {
            if self.quantization.len() != network.boundary_count() {
                return Err(NetError::config(format!(
                    "{} quantization levels given for {} layer boundaries",
                    self.quantization.len(),
                    network.boundary_count()
                )));
            }
            if self.quantization.iter().any(|&q| q < 2) {
                return Err(NetError::config("quantization levels must be at least 2"));
            }
        }
        if let Some(checkpoint) = &self.checkpoint {
            if checkpoint.every == 0 {
                return Err(NetError::config("checkpoint interval must be at least 1 epoch"));
            }
        }
        Ok(loss)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
