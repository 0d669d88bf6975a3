#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::assignment::Solutions;
use crate::sat::cnf::Cnf;
use std::fmt::{self, Display};
use std::time::Duration;

pub trait Solver {
    fn new(cnf: Cnf) -> Self;

    /// Decides the formula. Unsatisfiability is an outcome, not an error.
    fn solve(&mut self) -> SolveOutcome;

    fn stats(&self) -> SolutionStats;
}

/// Counters of the last search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branch attempts, true and false branches counted separately.
    pub decisions: usize,
    /// Literals fixed by unit propagation.
    pub propagations: usize,
    /// Variables fixed by pure-literal elimination.
    pub pure_literals: usize,
    /// Branches closed by an empty clause.
    pub conflicts: usize,
    /// Deepest decision level reached.
    pub max_depth: usize,
}

/// Budget that cut a search short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    DecisionLimit(usize),
    TimeLimit(Duration),
}

impl Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecisionLimit(limit) => write!(f, "decision limit of {limit} reached"),
            Self::TimeLimit(limit) => write!(f, "time limit of {limit:?} reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Solutions),
    Unsatisfiable,
    /// The search hit a budget before reaching a verdict.
    Aborted(AbortReason),
}

impl SolveOutcome {
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        matches!(self, Self::Satisfiable(_))
    }

    #[must_use]
    pub const fn is_unsat(&self) -> bool {
        matches!(self, Self::Unsatisfiable)
    }

    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    #[must_use]
    pub const fn solutions(&self) -> Option<&Solutions> {
        match self {
            Self::Satisfiable(solutions) => Some(solutions),
            _ => None,
        }
    }
}

impl Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable(_) => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Aborted(reason) => write!(f, "UNKNOWN ({reason})"),
        }
    }
}
