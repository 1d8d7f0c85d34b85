// ── Rolling sample window ──
//
// Fixed-capacity, oldest-evicted buffer of time-stamped samples feeding
// trend displays. Consumers always get an owned snapshot, never a live
// view into the buffer.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// One trend data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub at: DateTime<Utc>,
    pub value: T,
}

/// Fixed-capacity ordered buffer of time-stamped samples.
///
/// Samples are appended once per poll tick, so insertion order is
/// timestamp order. When an append exceeds capacity the oldest sample
/// is evicted from the head.
#[derive(Debug)]
pub struct RollingWindow<T> {
    samples: VecDeque<Sample<T>>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Capacity is fixed at construction; zero is rejected.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::InvalidWindowCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a sample stamped with the current time.
    pub fn push(&mut self, value: T) {
        self.push_at(Utc::now(), value);
    }

    /// Append a sample with an explicit timestamp.
    pub fn push_at(&mut self, at: DateTime<Utc>, value: T) {
        self.samples.push_back(Sample { at, value });
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Sample<T>> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> RollingWindow<T> {
    /// An owned copy of the window in append order, isolated from
    /// subsequent appends.
    pub fn snapshot(&self) -> Vec<Sample<T>> {
        self.samples.iter().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn zero_capacity_is_a_construction_error() {
        assert!(matches!(
            RollingWindow::<u64>::new(0),
            Err(CoreError::InvalidWindowCapacity)
        ));
    }

    #[test]
    fn overflow_evicts_from_the_head() {
        let mut window = RollingWindow::new(3).unwrap();
        for n in 0..7u64 {
            window.push(n);
        }

        assert_eq!(window.len(), 3);
        let values: Vec<u64> = window.snapshot().into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec![4, 5, 6], "exactly the last C samples, in order");
        assert_eq!(window.latest().unwrap().value, 6);
    }

    #[test]
    fn snapshot_is_isolated_from_later_appends() {
        let mut window = RollingWindow::new(5).unwrap();
        window.push("a");
        window.push("b");

        let snap = window.snapshot();
        window.push("c");

        assert_eq!(snap.len(), 2);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn timestamps_are_monotonic_in_append_order() {
        let mut window = RollingWindow::new(4).unwrap();
        let base = Utc::now();
        for n in 0..4i64 {
            window.push_at(base + chrono::Duration::seconds(n), n);
        }

        let snap = window.snapshot();
        assert!(snap.windows(2).all(|pair| pair[0].at <= pair[1].at));
    }
}
