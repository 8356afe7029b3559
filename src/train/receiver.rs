use std::sync::mpsc;

use log::{debug, info};

use crate::train::epoch_stats::EpochStats;

/// Sink for the losses a training run reports.
pub trait OutputReceiver {
    /// Summed training loss of one batch, reported once per batch.
    fn on_training_loss(&mut self, loss: f64);

    /// Summed validation loss, reported once per epoch when a validation
    /// source is configured.
    fn on_validation_loss(&mut self, loss: f64);

    fn on_epoch_end(&mut self, _stats: &EpochStats) {}

    /// Polled after every epoch; returning `true` ends the run early.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Reports through the `log` facade: batch losses at debug level, epoch
/// summaries at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReceiver;

impl OutputReceiver for LogReceiver {
    fn on_training_loss(&mut self, loss: f64) {
        debug!("batch loss {:.6}", loss);
    }

    fn on_validation_loss(&mut self, loss: f64) {
        info!("validation loss {:.6}", loss);
    }

    fn on_epoch_end(&mut self, stats: &EpochStats) {
        info!(
            "epoch {}/{}: mean loss {:.6} over {} samples, {} skipped batches, {} ms",
            stats.epoch,
            stats.total_epochs,
            stats.mean_train_loss(),
            stats.train_samples,
            stats.skipped_batches,
            stats.elapsed_ms,
        );
    }
}

/// Forwards one [`EpochStats`] per epoch over a channel.
///
/// If the receiving end has been dropped the run stops after the current
/// epoch.
#[derive(Debug)]
pub struct ChannelReceiver {
    tx: mpsc::Sender<EpochStats>,
    disconnected: bool,
}

impl ChannelReceiver {
    pub fn new(tx: mpsc::Sender<EpochStats>) -> ChannelReceiver {
        ChannelReceiver { tx, disconnected: false }
    }
}

impl OutputReceiver for ChannelReceiver {
    fn on_training_loss(&mut self, _loss: f64) {}

    fn on_validation_loss(&mut self, _loss: f64) {}

    fn on_epoch_end(&mut self, stats: &EpochStats) {
        if self.tx.send(stats.clone()).is_err() {
            self.disconnected = true;
        }
    }

    fn should_stop(&self) -> bool {
        self.disconnected
    }
}
