use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};
use parking_lot::{Mutex, RwLock};

use crate::error::{NetError, Result};
use crate::loss::LossType;
use crate::network::network::Network;
use crate::train::backprop::Backprop;
use crate::train::gradients::Gradients;
use crate::train::pool::ItemPool;
use crate::train::queue::WorkQueue;
use crate::train::sample::TrainingItem;

/// Loss sums collected from all workers since the last [`WorkerPool::take_losses`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Losses {
    pub training: f64,
    pub validation: f64,
}

/// A fixed set of threads turning queued samples into gradients.
///
/// Each worker owns one [`Gradients`] buffer. Between [`WorkerPool::drain`]
/// and the next [`WorkerPool::submit`] every worker is parked, so the
/// orchestrator may read the buffers and write the shared network.
pub struct WorkerPool {
    queue: Arc<WorkQueue>,
    losses: Arc<Mutex<Losses>>,
    gradients: Vec<Arc<Mutex<Gradients>>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(threads: usize, network: Arc<RwLock<Network>>, loss: LossType, items: Arc<ItemPool>) -> Result<WorkerPool> {
        let queue = Arc::new(WorkQueue::new(threads));
        let losses = Arc::new(Mutex::new(Losses::default()));
        let template = Gradients::for_network(&network.read());

        let mut pool = WorkerPool {
            queue,
            losses,
            gradients: Vec::with_capacity(threads),
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let gradients = Arc::new(Mutex::new(template.clone()));
            let worker = Worker {
                queue: Arc::clone(&pool.queue),
                losses: Arc::clone(&pool.losses),
                gradients: Arc::clone(&gradients),
                network: Arc::clone(&network),
                items: Arc::clone(&items),
                loss,
            };
            // Already-spawned workers are stopped by Drop if this fails.
            let handle = thread::Builder::new()
                .name(format!("train-worker-{id}"))
                .spawn(move || worker.run())?;
            pool.gradients.push(gradients);
            pool.handles.push(handle);
        }
        debug!("started {} workers", threads);

        Ok(pool)
    }

    pub fn threads(&self) -> usize {
        self.handles.len()
    }

    pub fn submit(&self, item: TrainingItem) {
        self.queue.push(item);
    }

    /// Blocks until every submitted item has been processed.
    ///
    /// Fails with [`NetError::WorkerLost`] once a worker has panicked; the
    /// remaining queue contents are then left unprocessed.
    pub fn drain(&self) -> Result<()> {
        match self.queue.wait_drained() {
            0 => Ok(()),
            lost => Err(NetError::WorkerLost(lost)),
        }
    }

    /// Returns the accumulated losses and resets them to zero.
    pub fn take_losses(&self) -> Losses {
        std::mem::take(&mut *self.losses.lock())
    }

    pub fn clear_gradients(&self) {
        self.gradients.iter().for_each(|g| g.lock().clear());
    }

    /// Overwrites `total` with the element-wise sum of every worker's buffer.
    pub fn reduce_into(&self, total: &mut Gradients) {
        total.clear();
        self.gradients.iter().for_each(|g| total.accumulate(&g.lock()));
    }

    /// Sends one stop sentinel per worker and joins them all.
    pub fn stop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.handles.iter().for_each(|_| self.queue.push_stop());
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("a training worker panicked");
            }
        }
        debug!("workers stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    queue: Arc<WorkQueue>,
    losses: Arc<Mutex<Losses>>,
    gradients: Arc<Mutex<Gradients>>,
    network: Arc<RwLock<Network>>,
    items: Arc<ItemPool>,
    loss: LossType,
}

/// Reports the owning worker as lost if its thread unwinds.
struct AbandonOnPanic<'a>(&'a WorkQueue);

impl Drop for AbandonOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abandon();
        }
    }
}

impl Worker {
    fn run(self) {
        let _guard = AbandonOnPanic(&self.queue);
        let mut scratch = Backprop::for_network(&self.network.read());

        while let Some(item) = self.queue.take() {
            let sample_loss = {
                let network = self.network.read();
                if item.validation {
                    scratch.evaluate(&network, &item.input, &item.expected, self.loss)
                } else {
                    let mut gradients = self.gradients.lock();
                    scratch.train_sample(&network, &item.input, &item.expected, self.loss, &mut gradients)
                }
            };

            {
                let mut losses = self.losses.lock();
                if item.validation {
                    losses.validation += sample_loss;
                } else {
                    losses.training += sample_loss;
                }
            }
            item.recycle(&self.items);
        }
    }
}
