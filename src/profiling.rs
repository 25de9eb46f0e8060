//! Step Profiling Counters
//!
//! Lightweight, deterministic counters for the stages of one simulation step.
//! Counts work items (pairs, contacts, solver applications) rather than
//! wall-clock time, so two identical runs report identical numbers.
//!
//! The world resets these at the start of every `step()`; read them after a
//! step to see where the frame's work went.

/// Work counters for the most recent simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    /// Body pairs considered by the broad phase (after the cheap
    /// static/static and particle/particle rejects).
    pub pairs_tested: u64,
    /// Pairs whose world-space AABBs overlapped.
    pub broad_phase_hits: u64,
    /// Arbiters with a non-empty contact manifold.
    pub contacts_found: u64,
    /// Individual contact solve visits (contacts × iterations).
    pub solver_applications: u64,
    /// Contacts whose penetration exceeded the allowance and got a
    /// positional correction.
    pub corrections_applied: u64,
    /// Total steps executed since the world was created.
    pub steps: u64,
}

impl StepCounters {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-step counters, keeping the lifetime step count.
    pub fn begin_step(&mut self) {
        let steps = self.steps;
        *self = Self::default();
        self.steps = steps + 1;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_step_resets_but_counts_steps() {
        let mut counters = StepCounters::new();
        counters.pairs_tested = 12;
        counters.contacts_found = 3;
        counters.begin_step();
        assert_eq!(counters.pairs_tested, 0);
        assert_eq!(counters.contacts_found, 0);
        assert_eq!(counters.steps, 1);
        counters.begin_step();
        assert_eq!(counters.steps, 2);
    }
}
