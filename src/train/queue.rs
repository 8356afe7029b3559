use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::train::sample::TrainingItem;

/// `None` tells the worker that takes it to exit.
type Job = Option<TrainingItem>;

struct State {
    jobs: VecDeque<Job>,
    idle: usize,
    lost: usize,
}

/// Multi-producer multi-consumer job queue with a drain barrier.
///
/// Workers block in [`WorkQueue::take`] while the queue is empty and count as
/// idle while they do. [`WorkQueue::wait_drained`] returns once the queue is
/// empty and every worker is idle, meaning every job handed out so far has
/// been fully processed. A worker that dies mid-job reports itself through
/// [`WorkQueue::abandon`], which releases the barrier instead of leaving it
/// waiting for a worker that will never park again.
pub struct WorkQueue {
    workers: usize,
    state: Mutex<State>,
    not_empty: Condvar,
    drained: Condvar,
}

impl WorkQueue {
    pub fn new(workers: usize) -> WorkQueue {
        WorkQueue {
            workers,
            state: Mutex::new(State { jobs: VecDeque::new(), idle: 0, lost: 0 }),
            not_empty: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    pub fn push(&self, item: TrainingItem) {
        self.enqueue(Some(item));
    }

    /// Enqueues one stop sentinel.
    pub fn push_stop(&self) {
        self.enqueue(None);
    }

    fn enqueue(&self, job: Job) {
        self.state.lock().jobs.push_back(job);
        self.not_empty.notify_one();
    }

    /// Blocks until a job is available. `None` means stop.
    pub fn take(&self) -> Option<TrainingItem> {
        let mut state = self.state.lock();
        if state.jobs.is_empty() {
            state.idle += 1;
            if state.idle + state.lost == self.workers {
                self.drained.notify_all();
            }
            while state.jobs.is_empty() {
                self.not_empty.wait(&mut state);
            }
            state.idle -= 1;
        }
        state.jobs.pop_front().flatten()
    }

    /// Blocks until the queue is empty and all workers are waiting for work,
    /// or until a worker has been lost. Returns the number of lost workers.
    pub fn wait_drained(&self) -> usize {
        let mut state = self.state.lock();
        while state.lost == 0 && !(state.jobs.is_empty() && state.idle == self.workers) {
            self.drained.wait(&mut state);
        }
        state.lost
    }

    /// Marks the calling worker as gone for good.
    pub fn abandon(&self) {
        self.state.lock().lost += 1;
        self.drained.notify_all();
    }

    pub fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
