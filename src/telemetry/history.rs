//! Fixed-length rolling window of CPU values

use std::collections::VecDeque;

/// Default number of retained CPU values.
pub const DEFAULT_HISTORY_LEN: usize = 20;

/// FIFO history pre-filled with zeros.
///
/// The length never changes after construction: every push evicts exactly one
/// value from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricHistory {
    values: VecDeque<f64>,
}

impl MetricHistory {
    /// Create a history of `len` zeros. Lengths below 2 are raised to 2 so the
    /// graph projection always has a defined x step.
    pub fn new(len: usize) -> Self {
        let len = len.max(2);
        Self {
            values: std::iter::repeat(0.0).take(len).collect(),
        }
    }

    /// Evict the oldest value and append `value`.
    pub fn push(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> f64 {
        self.values.back().copied().unwrap_or(0.0)
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_filled_with_zeros() {
        let history = MetricHistory::default();
        assert_eq!(history.len(), 20);
        assert!(history.iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = MetricHistory::new(3);
        history.push(1.0);
        history.push(2.0);
        history.push(3.0);
        history.push(4.0);
        assert_eq!(history.to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.latest(), 4.0);
    }

    #[test]
    fn test_length_is_constant() {
        let mut history = MetricHistory::default();
        for i in 0..100 {
            history.push(i as f64);
            assert_eq!(history.len(), 20);
        }
    }

    #[test]
    fn test_minimum_length() {
        assert_eq!(MetricHistory::new(0).len(), 2);
    }
}
