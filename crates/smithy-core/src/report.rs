//! Ordered, human-readable diagnostic steps.
//!
//! A [`StepLog`] is what callers get back instead of a structured plan: a flat
//! list of what was attempted, in order. Every entry is mirrored to `tracing`
//! at debug level.

use tracing::debug;

/// Flat, ordered log of the steps taken by one call chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLog {
    steps: Vec<String>,
}

impl StepLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn push(&mut self, step: impl Into<String>) {
        let step = step.into();
        debug!(step = %step, "Step");
        self.steps.push(step);
    }

    /// Steps recorded so far.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Remove and return every step, leaving the log empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.steps)
    }

    /// Consume the log.
    pub fn into_steps(self) -> Vec<String> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_drains() {
        let mut log = StepLog::new();
        log.push("first");
        log.push(format!("second {}", 2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.steps(), ["first", "second 2"]);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
