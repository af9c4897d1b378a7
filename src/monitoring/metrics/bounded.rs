//! Bounded ring-buffer operations for the sample store

use std::collections::VecDeque;

/// Helper trait for bounded VecDeque operations
pub(super) trait BoundedPush<T> {
    /// Push a value, evicting from the front until at most `max_size` remain
    fn push_bounded(&mut self, value: T, max_size: usize);

    /// Keep only the last `keep` values, returning how many were dropped
    fn retain_last(&mut self, keep: usize) -> usize;
}

impl<T> BoundedPush<T> for VecDeque<T> {
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) {
        self.push_back(value);
        while self.len() > max_size {
            self.pop_front();
        }
    }

    fn retain_last(&mut self, keep: usize) -> usize {
        let excess = self.len().saturating_sub(keep);
        if excess > 0 {
            self.drain(..excess);
        }
        excess
    }
}
