use serde::{Serialize, Deserialize};

/// Per-epoch training statistics handed to [`OutputReceiver::on_epoch_end`].
///
/// Losses are sums of per-sample losses, as reported to the receiver during
/// the epoch; the `mean_*` helpers divide by the sample counts.
///
/// [`OutputReceiver::on_epoch_end`]: crate::train::receiver::OutputReceiver::on_epoch_end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Summed training loss over every batch of this epoch.
    pub train_loss: f64,
    /// Training samples enqueued this epoch.
    pub train_samples: usize,
    /// Summed validation loss, if a validation source was provided.
    pub val_loss: Option<f64>,
    /// Validation samples evaluated this epoch.
    pub val_samples: usize,
    /// Batches whose loss was exactly zero and therefore skipped the update.
    pub skipped_batches: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    pub fn mean_train_loss(&self) -> f64 {
        if self.train_samples == 0 { 0.0 } else { self.train_loss / self.train_samples as f64 }
    }

    pub fn mean_val_loss(&self) -> Option<f64> {
        self.val_loss.map(|loss| if self.val_samples == 0 { 0.0 } else { loss / self.val_samples as f64 })
    }
}
