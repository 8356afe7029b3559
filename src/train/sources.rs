use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::Rng;

use crate::error::Result;
use crate::train::pool::ItemPool;
use crate::train::sample::{SampleSource, TrainingItem};

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Yields a fixed list of `(input, expected)` pairs in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: Vec<(Vec<f64>, Vec<f64>)>,
    cursor: usize,
}

impl MemorySource {
    pub fn new(samples: Vec<(Vec<f64>, Vec<f64>)>) -> MemorySource {
        MemorySource { samples, cursor: 0 }
    }

    /// Pairs up parallel input and label slices; extra entries on either side
    /// are ignored.
    pub fn from_slices(inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> MemorySource {
        MemorySource::new(inputs.iter().cloned().zip(labels.iter().cloned()).collect())
    }
}

impl SampleSource for MemorySource {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn count_total(&self) -> usize {
        self.samples.len()
    }

    fn next(&mut self, pool: &ItemPool) -> Option<TrainingItem> {
        let (input, expected) = self.samples.get(self.cursor)?;
        self.cursor += 1;

        let mut item = TrainingItem::new(pool.rent(input.len()), pool.rent(expected.len()));
        item.input.copy_from_slice(input);
        item.expected.copy_from_slice(expected);
        Some(item)
    }
}

// ---------------------------------------------------------------------------
// Line-oriented files
// ---------------------------------------------------------------------------

/// Streams a text file one line per item, handing each line to a converter
/// that fills the pre-sized input and expected buffers.
pub struct LineSource<F> {
    path: PathBuf,
    input_size: usize,
    output_size: usize,
    converter: F,
    lines: Option<Lines<BufReader<File>>>,
    total: usize,
}

impl<F> LineSource<F>
where
    F: FnMut(&str, &mut [f64], &mut [f64]) + Send,
{
    pub fn open<P: AsRef<Path>>(path: P, input_size: usize, output_size: usize, converter: F) -> Result<LineSource<F>> {
        let path = path.as_ref().to_path_buf();
        let total = BufReader::new(File::open(&path)?).lines().count();
        let lines = Some(BufReader::new(File::open(&path)?).lines());
        debug!("opened {} with {} lines", path.display(), total);

        Ok(LineSource { path, input_size, output_size, converter, lines, total })
    }
}

impl<F> SampleSource for LineSource<F>
where
    F: FnMut(&str, &mut [f64], &mut [f64]) + Send,
{
    fn reset(&mut self) {
        self.lines = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) => {
                warn!("cannot reopen {}: {}", self.path.display(), e);
                None
            }
        };
    }

    fn count_total(&self) -> usize {
        self.total
    }

    fn next(&mut self, pool: &ItemPool) -> Option<TrainingItem> {
        let line = match self.lines.as_mut()?.next()? {
            Ok(line) => line,
            Err(e) => {
                warn!("stopped reading {}: {}", self.path.display(), e);
                self.lines = None;
                return None;
            }
        };

        let mut item = TrainingItem::new(pool.rent(self.input_size), pool.rent(self.output_size));
        (self.converter)(&line, &mut item.input, &mut item.expected);
        Some(item)
    }
}

// ---------------------------------------------------------------------------
// Shuffling wrapper
// ---------------------------------------------------------------------------

/// Items held in memory by [`ShuffleSource`] unless told otherwise.
pub const DEFAULT_SHUFFLE_BUFFER: usize = 256;

/// Randomizes the order of another source through a bounded buffer.
///
/// The buffer is filled from the inner source; each `next` picks a random
/// slot, returns its item and refills the slot. Once the inner source runs
/// dry the remaining items drain in random order. Every item of the inner
/// source is returned exactly once per pass.
///
/// Items still buffered when the source is reset go back to the pool on the
/// next call to `next`.
pub struct ShuffleSource<S> {
    inner: S,
    capacity: usize,
    buffer: Vec<TrainingItem>,
    primed: bool,
}

impl<S: SampleSource> ShuffleSource<S> {
    pub fn new(inner: S) -> ShuffleSource<S> {
        ShuffleSource::with_capacity(inner, DEFAULT_SHUFFLE_BUFFER)
    }

    pub fn with_capacity(inner: S, capacity: usize) -> ShuffleSource<S> {
        ShuffleSource { inner, capacity: capacity.max(1), buffer: Vec::new(), primed: false }
    }

    /// Returns every buffered item to `pool`.
    pub fn release(&mut self, pool: &ItemPool) {
        self.buffer.drain(..).for_each(|item| item.recycle(pool));
    }

    fn prime(&mut self, pool: &ItemPool) {
        self.release(pool);
        while self.buffer.len() < self.capacity {
            match self.inner.next(pool) {
                Some(item) => self.buffer.push(item),
                None => break,
            }
        }
        self.primed = true;
    }
}

impl<S: SampleSource> SampleSource for ShuffleSource<S> {
    fn reset(&mut self) {
        self.inner.reset();
        self.primed = false;
    }

    fn count_total(&self) -> usize {
        self.inner.count_total()
    }

    fn next(&mut self, pool: &ItemPool) -> Option<TrainingItem> {
        if !self.primed {
            self.prime(pool);
        }
        if self.buffer.is_empty() {
            return None;
        }

        let slot = rand::thread_rng().gen_range(0..self.buffer.len());
        match self.inner.next(pool) {
            Some(fresh) => Some(std::mem::replace(&mut self.buffer[slot], fresh)),
            None => Some(self.buffer.swap_remove(slot)),
        }
    }
}
