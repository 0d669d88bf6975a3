#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use std::time::Duration;

/// Knobs of a DPLL run.
///
/// Budgets are checked before each branch attempt. Exhausting one ends the
/// search with [`SolveOutcome::Aborted`](crate::sat::solver::SolveOutcome::Aborted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverOptions {
    /// Maximum number of branch attempts.
    pub max_decisions: Option<usize>,
    /// Wall-clock limit for a single call to `solve`.
    pub time_limit: Option<Duration>,
    /// Keep the decision tree for inspection after solving.
    pub record_tree: bool,
}

impl SolverOptions {
    #[must_use]
    pub const fn with_max_decisions(mut self, max_decisions: usize) -> Self {
        self.max_decisions = Some(max_decisions);
        self
    }

    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[must_use]
    pub const fn with_decision_tree(mut self, record_tree: bool) -> Self {
        self.record_tree = record_tree;
        self
    }

    /// `true` when the search may be cut short.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.max_decisions.is_some() || self.time_limit.is_some()
    }
}
