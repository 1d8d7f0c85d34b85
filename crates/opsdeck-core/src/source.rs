// ── Source ──
//
// Identity and schedule of one pollable feed. Created when a view
// activates, dropped when it deactivates; never shared across views.

use std::time::Duration;

/// One independently scheduled pollable feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    key: String,
    interval: Duration,
    enabled: bool,
}

impl Source {
    /// A new source polling every `interval`. A zero interval disables
    /// the source: its scheduler starts but never ticks.
    pub fn new(key: impl Into<String>, interval: Duration) -> Self {
        Self {
            key: key.into(),
            interval,
            enabled: !interval.is_zero(),
        }
    }

    /// Mark the source disabled: its scheduler starts but never ticks.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_disables_the_source() {
        assert!(!Source::new("dlq-topics", Duration::ZERO).is_enabled());
        assert!(Source::new("dlq-topics", Duration::from_secs(5)).is_enabled());
        assert!(!Source::new("dlq-topics", Duration::from_secs(5)).disabled().is_enabled());
    }
}
