use std::collections::HashMap;

use parking_lot::Mutex;

/// Recycles `Vec<f64>` buffers between sample sources and workers.
///
/// Buffers are shelved by the length they were rented at, so a source that
/// always asks for the same two sizes gets its own buffers back in constant
/// time. Returned buffers are cleared before they are shelved.
#[derive(Debug, Default)]
pub struct ItemPool {
    shelves: Mutex<Shelves>,
}

#[derive(Debug, Default)]
struct Shelves {
    by_len: HashMap<usize, Vec<Vec<f64>>>,
    count: usize,
}

/// Upper bound on shelved buffers; extra returns are dropped.
const MAX_SHELVED: usize = 4096;

impl ItemPool {
    pub fn new() -> ItemPool {
        ItemPool::default()
    }

    /// A zero-filled buffer of exactly `len` elements.
    pub fn rent(&self, len: usize) -> Vec<f64> {
        let recycled = {
            let mut shelves = self.shelves.lock();
            let buffer = shelves.by_len.get_mut(&len).and_then(Vec::pop);
            if buffer.is_some() {
                shelves.count -= 1;
            }
            buffer
        };
        let mut buffer = recycled.unwrap_or_else(|| Vec::with_capacity(len));
        buffer.resize(len, 0.0);
        buffer
    }

    /// Hands a buffer back; its contents are discarded. Empty buffers are
    /// not kept.
    pub fn give_back(&self, mut buffer: Vec<f64>) {
        let len = buffer.len();
        if len == 0 {
            return;
        }
        buffer.clear();
        let mut shelves = self.shelves.lock();
        if shelves.count < MAX_SHELVED {
            shelves.by_len.entry(len).or_default().push(buffer);
            shelves.count += 1;
        }
    }

    /// Number of buffers currently waiting to be rented.
    pub fn available(&self) -> usize {
        self.shelves.lock().count
    }
}
