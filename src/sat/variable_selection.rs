#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;
use std::fmt::Debug;

/// Chooses the next variable to branch on.
pub trait VariableSelection: Debug + Clone {
    fn new(num_vars: usize) -> Self;

    /// The variable to decide next, `None` once every variable is decided.
    fn pick(&self, assignment: &Assignment) -> Option<Variable>;
}

/// Lowest-numbered undecided variable first.
///
/// The order is part of the solver's contract: it makes the search, and with
/// it the returned model, deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn new(_num_vars: usize) -> Self {
        Self
    }

    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        assignment.unassigned().next()
    }
}
