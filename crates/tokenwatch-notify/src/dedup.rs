//! Process-local duplicate suppression.

use std::collections::{HashSet, VecDeque};

use tokenwatch_core::event::LogPosition;

type Key = (String, u64);

/// Remembers the last `capacity` log positions (oldest evicted first).
///
/// Keys are `(tx_hash, log_index)`, which identify a log independently of
/// the block it was reported in.
#[derive(Debug)]
pub struct SeenEvents {
    window: VecDeque<Key>,
    set: HashSet<Key>,
    capacity: usize,
}

impl SeenEvents {
    /// A capacity of zero disables suppression.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity.min(1024)),
            set: HashSet::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Record `position`. Returns `false` if it was already in the window.
    pub fn insert(&mut self, position: &LogPosition) -> bool {
        if self.capacity == 0 {
            return true;
        }
        let key = (position.tx_hash.to_ascii_lowercase(), position.log_index);
        if self.set.contains(&key) {
            return false;
        }
        if self.window.len() >= self.capacity {
            if let Some(oldest) = self.window.pop_front() {
                self.set.remove(&oldest);
            }
        }
        self.set.insert(key.clone());
        self.window.push_back(key);
        true
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(tx: &str, idx: u64) -> LogPosition {
        LogPosition {
            block_number: 1,
            tx_hash: tx.into(),
            log_index: idx,
        }
    }

    #[test]
    fn rejects_repeat() {
        let mut seen = SeenEvents::new(8);
        assert!(seen.insert(&pos("0xaa", 0)));
        assert!(seen.insert(&pos("0xaa", 1)));
        assert!(!seen.insert(&pos("0xAA", 0)));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn evicts_oldest() {
        let mut seen = SeenEvents::new(2);
        seen.insert(&pos("0x1", 0));
        seen.insert(&pos("0x2", 0));
        seen.insert(&pos("0x3", 0));
        assert_eq!(seen.len(), 2);
        assert!(seen.insert(&pos("0x1", 0)));
        assert!(!seen.insert(&pos("0x3", 0)));
    }

    #[test]
    fn zero_capacity_disables() {
        let mut seen = SeenEvents::new(0);
        assert!(seen.insert(&pos("0x1", 0)));
        assert!(seen.insert(&pos("0x1", 0)));
        assert!(seen.is_empty());
    }
}
