//! Fixed capacity collections. Neither of them ever grows past the capacity given on creation.

use std::collections::VecDeque;

/// Keeps the `capacity` most recent items, evicting the oldest one on overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds an item, dropping the oldest one if the buffer is full.
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }

        if self.items.len() == self.capacity {
            self.items.pop_front();
        }

        self.items.push_back(item);
    }

    /// The most recently added item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Items from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Append-only list that silently refuses new items once it is full.
#[derive(Debug, Clone, PartialEq)]
pub struct CappedBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> CappedBuffer<T> {
    /// Creates an empty buffer.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Appends the item. Returns false and drops the item if the buffer is full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }

        self.items.push(item);
        true
    }

    /// Returns true if no more items can be added.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Stored items in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates over the items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_keeps_latest() {
        let mut buffer = RingBuffer::new(1);
        for i in 0..10 {
            buffer.push(i);
            assert_eq!(buffer.len(), 1);
            assert_eq!(buffer.latest(), Some(&i));
        }

        let mut buffer = RingBuffer::new(3);
        (0..5).for_each(|i| buffer.push(i));
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn zero_capacity_ring_stores_nothing() {
        let mut buffer = RingBuffer::new(0);
        buffer.push("click");
        assert!(buffer.is_empty());
    }

    #[test]
    fn capped_drops_overflow() {
        let mut buffer = CappedBuffer::new(155);
        for i in 0..155 {
            assert!(buffer.push(i));
        }

        assert!(buffer.is_full());
        assert!(!buffer.push(155));
        assert_eq!(buffer.len(), 155);
        assert_eq!(buffer.as_slice().last(), Some(&154));

        buffer.clear();
        assert!(buffer.push(1000));
        assert_eq!(buffer.len(), 1);
    }
}
