//! Fixed-capacity window of the most recent observations.

use std::collections::VecDeque;

/// Keeps the last `capacity` values, evicting the oldest on overflow
#[derive(Debug, Clone)]
pub struct History<T> {
    capacity: usize,
    buffer: VecDeque<T>,
}

impl<T> History<T> {
    /// Create an empty window
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be greater than 0");
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a value, dropping the oldest one if the window is full
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
