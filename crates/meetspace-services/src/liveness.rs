//! Stale-response guard for wizard steps.
//!
//! Every step takes a lease when it starts. Beginning another step or tearing
//! the flow down bumps the generation, and a step whose lease is no longer
//! current drops its results instead of merging them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter shared by a flow and whoever may tear it down.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    generation: Arc<AtomicU64>,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a step, superseding any step still in flight.
    pub fn begin(&self) -> StepLease {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        StepLease {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Supersede whatever step is in flight (view teardown, restart).
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Proof that a step was started at a given generation.
#[derive(Debug)]
pub struct StepLease {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl StepLease {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_step_supersedes_older_lease() {
        let liveness = Liveness::new();
        let first = liveness.begin();
        assert!(first.is_current());

        let second = liveness.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn invalidate_from_a_clone_supersedes_lease() {
        let liveness = Liveness::new();
        let teardown = liveness.clone();
        let lease = liveness.begin();
        teardown.invalidate();
        assert!(!lease.is_current());
    }
}
