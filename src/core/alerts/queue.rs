// Bounded FIFO for notifications nobody may be draining.
//
// When full, the oldest entry is dropped to make room. One warning is logged
// per overflow, re-armed by the next drain.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct BoundedQueue<T> {
    label: &'static str,
    items: VecDeque<T>,
    max_len: usize,
    dropped: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(label: &'static str, max_len: usize) -> Self {
        Self {
            label,
            items: VecDeque::new(),
            max_len: max_len.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() >= self.max_len {
            self.items.pop_front();
            if self.dropped == 0 {
                log::warn!(
                    "{} queue full ({} entries, not drained); dropping oldest",
                    self.label,
                    self.max_len
                );
            }
            self.dropped += 1;
        }
        self.items.push_back(item);
    }

    /// Take everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        if self.dropped > 0 {
            log::debug!("{} queue dropped {} entries since last drain", self.label, self.dropped);
            self.dropped = 0;
        }
        self.items.drain(..).collect()
    }

    /// Entries dropped since the last drain.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_oldest_when_full() {
        let mut queue = BoundedQueue::new("test", 3);
        for i in 0..5 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dropped(), 2);
        assert_eq!(queue.drain(), vec![2, 3, 4]);

        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut queue = BoundedQueue::new("test", 0);
        queue.push("a");
        queue.push("b");
        assert_eq!(queue.max_len(), 1);
        assert_eq!(queue.drain(), vec!["b"]);
    }
}
