use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::{NetError, Result};
use crate::loss::LossType;
use crate::network::network::Network;
use crate::optim::bank::OptimizerBank;
use crate::persist::{self, Encoding};
use crate::train::epoch_stats::EpochStats;
use crate::train::gradients::Gradients;
use crate::train::pool::ItemPool;
use crate::train::receiver::{LogReceiver, OutputReceiver};
use crate::train::sample::SampleSource;
use crate::train::sources::MemorySource;
use crate::train::train_config::TrainConfig;
use crate::train::worker_pool::WorkerPool;

/// Outcome of one [`Trainer::train`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainSummary {
    /// One entry per completed epoch.
    pub history: Vec<EpochStats>,
    /// Weight files written, in order.
    pub checkpoints: Vec<PathBuf>,
}

impl TrainSummary {
    pub fn epochs_completed(&self) -> usize {
        self.history.len()
    }

    pub fn last(&self) -> Option<&EpochStats> {
        self.history.last()
    }
}

/// Drives mini-batch training of one network over a pool of worker threads.
///
/// The optimizer bank lives as long as the trainer, so calling
/// [`Trainer::train`] again continues with the same moment estimates.
pub struct Trainer {
    network: Arc<RwLock<Network>>,
    config: TrainConfig,
    loss: LossType,
    bank: OptimizerBank,
    items: Arc<ItemPool>,
}

impl Trainer {
    /// Validates `config` against `network`; nothing is spawned yet.
    pub fn new(network: Network, config: TrainConfig) -> Result<Trainer> {
        let loss = config.validate(&network)?;
        let bank = OptimizerBank::new(&config.optimizer, network.parameter_count());

        Ok(Trainer {
            network: Arc::new(RwLock::new(network)),
            config,
            loss,
            bank,
            items: Arc::new(ItemPool::new()),
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn network(&self) -> RwLockReadGuard<'_, Network> {
        self.network.read()
    }

    /// Buffer pool shared with sources and workers.
    pub fn items(&self) -> &ItemPool {
        &self.items
    }

    pub fn into_network(self) -> Network {
        match Arc::try_unwrap(self.network) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }

    /// Runs `config.epochs` epochs over `source`, evaluating `validation`
    /// after each epoch when given.
    ///
    /// Blocks until every epoch has finished or `receiver` asks to stop.
    /// Worker threads live for the duration of this call.
    pub fn train(
        &mut self,
        source: &mut dyn SampleSource,
        mut validation: Option<&mut dyn SampleSource>,
        receiver: &mut dyn OutputReceiver,
    ) -> Result<TrainSummary> {
        let mut workers = WorkerPool::start(
            self.config.threads,
            Arc::clone(&self.network),
            self.loss,
            Arc::clone(&self.items),
        )?;
        let mut total = Gradients::for_network(&self.network.read());
        let mut summary = TrainSummary::default();

        info!(
            "training {} parameters for {} epochs on {} threads, batch size {}, {} samples per epoch",
            self.bank.len(),
            self.config.epochs,
            self.config.threads,
            self.config.batch_size,
            source.count_total(),
        );

        for epoch in 1..=self.config.epochs {
            let started = Instant::now();
            let mut stats = EpochStats {
                epoch,
                total_epochs: self.config.epochs,
                train_loss: 0.0,
                train_samples: 0,
                val_loss: None,
                val_samples: 0,
                skipped_batches: 0,
                elapsed_ms: 0,
            };

            // ── Training batches ─────────────────────────────────────────────
            source.reset();
            loop {
                workers.clear_gradients();
                let enqueued = self.fill(source, &workers, Some(self.config.batch_size), false)?;
                if enqueued == 0 {
                    break;
                }
                workers.drain()?;

                let batch_loss = workers.take_losses().training;
                receiver.on_training_loss(batch_loss);
                stats.train_loss += batch_loss;
                stats.train_samples += enqueued;

                if batch_loss == 0.0 {
                    stats.skipped_batches += 1;
                    continue;
                }

                workers.reduce_into(&mut total);
                total.average(enqueued);
                self.bank.step(&mut self.network.write(), &total)?;
            }

            // ── Validation ───────────────────────────────────────────────────
            if let Some(validation) = validation.as_deref_mut() {
                validation.reset();
                let evaluated = self.fill(validation, &workers, None, true)?;
                workers.drain()?;

                let val_loss = workers.take_losses().validation;
                receiver.on_validation_loss(val_loss);
                stats.val_loss = Some(val_loss);
                stats.val_samples = evaluated;
            }

            // ── Checkpoint ───────────────────────────────────────────────────
            self.checkpoint(epoch, &mut summary.checkpoints)?;

            stats.elapsed_ms = started.elapsed().as_millis() as u64;
            receiver.on_epoch_end(&stats);
            summary.history.push(stats);

            if receiver.should_stop() {
                info!("receiver requested stop after epoch {}", epoch);
                break;
            }
        }

        workers.stop();
        Ok(summary)
    }

    /// Moves up to `limit` items (all when `None`) from `source` into the
    /// queue and returns how many were enqueued.
    ///
    /// An item whose input or label length does not fit the network stops
    /// the run with [`NetError::ShapeMismatch`].
    fn fill(&self, source: &mut dyn SampleSource, workers: &WorkerPool, limit: Option<usize>, validation: bool) -> Result<usize> {
        let (inputs, outputs) = {
            let network = self.network.read();
            (network.input_size(), network.output_size())
        };

        let mut enqueued = 0;
        while limit.map_or(true, |limit| enqueued < limit) {
            let Some(mut item) = source.next(&self.items) else { break };
            let mismatch = [(inputs, item.input.len()), (outputs, item.expected.len())]
                .into_iter()
                .find(|(expected, found)| expected != found);
            if let Some((expected, found)) = mismatch {
                item.recycle(&self.items);
                return Err(NetError::ShapeMismatch { expected, found });
            }
            item.validation = validation;
            workers.submit(item);
            enqueued += 1;
        }
        Ok(enqueued)
    }

    fn checkpoint(&self, epoch: usize, written: &mut Vec<PathBuf>) -> Result<()> {
        let Some(checkpoint) = &self.config.checkpoint else { return Ok(()) };
        if !checkpoint.is_due(epoch) {
            return Ok(());
        }

        std::fs::create_dir_all(&checkpoint.dir)?;
        let network = self.network.read();

        let raw = checkpoint.raw_path(epoch);
        persist::save(&network, &Encoding::Raw, &raw)?;
        written.push(raw);

        if !self.config.quantization.is_empty() {
            let quantized = checkpoint.quantized_path(epoch);
            persist::save(&network, &Encoding::Quantized(self.config.quantization.clone()), &quantized)?;
            written.push(quantized);
        }
        debug!("checkpoint for epoch {} written to {}", epoch, checkpoint.dir.display());
        Ok(())
    }
}

/// Trains `network` in place on in-memory data, logging progress through
/// [`LogReceiver`].
///
/// `inputs` and `expected_outputs` are parallel and must have equal length.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<TrainSummary> {
    if inputs.len() != expected_outputs.len() {
        return Err(NetError::ShapeMismatch { expected: inputs.len(), found: expected_outputs.len() });
    }
    let mut trainer = Trainer::new(network.clone(), config.clone())?;
    let mut source = MemorySource::from_slices(inputs, expected_outputs);
    let summary = trainer.train(&mut source, None, &mut LogReceiver)?;
    *network = trainer.into_network();
    Ok(summary)
}
