//! Fixed-capacity FIFO used for the play history and the autoplay buffer.
//!
//! Pushing onto a full deque silently evicts the oldest entry. Callers rely
//! on this as a memory bound, so eviction is not an error.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct BoundedDeque<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> BoundedDeque<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedDeque capacity must be non-zero");
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends to the tail, dropping the oldest entry if at capacity.
    pub fn push_back(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Appends every item in order, applying the same eviction policy.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push_back(item);
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    /// Moves all items out in FIFO order, leaving the deque empty.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }
}
