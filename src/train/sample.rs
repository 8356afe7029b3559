use crate::train::pool::ItemPool;

/// One labelled example travelling from a source to a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingItem {
    pub input: Vec<f64>,
    pub expected: Vec<f64>,
    /// Validation items are only evaluated, never back-propagated.
    pub validation: bool,
}

impl TrainingItem {
    pub fn new(input: Vec<f64>, expected: Vec<f64>) -> TrainingItem {
        TrainingItem { input, expected, validation: false }
    }

    /// Returns both buffers to `pool`.
    pub fn recycle(self, pool: &ItemPool) {
        pool.give_back(self.input);
        pool.give_back(self.expected);
    }
}

/// Pull-based supplier of training items.
///
/// A source is exhausted when `next` returns `None`; `reset` rewinds it for
/// the next epoch. Sources should build their buffers with
/// [`ItemPool::rent`] so workers can recycle them.
pub trait SampleSource: Send {
    fn reset(&mut self);

    /// Number of items one full pass yields.
    fn count_total(&self) -> usize;

    fn next(&mut self, pool: &ItemPool) -> Option<TrainingItem>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn count_total(&self) -> usize {
        (**self).count_total()
    }

    fn next(&mut self, pool: &ItemPool) -> Option<TrainingItem> {
        (**self).next(pool)
    }
}
