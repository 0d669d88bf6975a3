#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Partial and complete truth assignments.
//!
//! [`Assignment`] is the ternary working state of the engine: every variable is
//! either [`VarState::Unassigned`] or [`VarState::Assigned`]. Once a search
//! succeeds, [`Assignment::extend`] turns it into [`Solutions`], a complete
//! assignment over `1..=N`.

use crate::sat::literal::{Literal, Variable};
use core::ops::{Index, IndexMut};
use itertools::Itertools;
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// Ternary assignment over variables `1..=num_vars`.
///
/// Slot 0 is unused so that variables index the vector directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<Variable> for Assignment {
    fn index_mut(&mut self, index: Variable) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

impl Assignment {
    /// An all-undecided assignment over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn assign(&mut self, var: Variable, value: bool) {
        self[var] = VarState::Assigned(value);
    }

    /// Makes `lit` true.
    pub fn assign_literal(&mut self, lit: Literal) {
        self.assign(lit.variable(), lit.polarity());
    }

    /// Value of `var`, `None` while undecided or out of range.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.0.get(var as usize).and_then(|state| state.value())
    }

    /// Truth value of `lit`, `None` while its variable is undecided.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|b| b == lit.polarity())
    }

    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.var_value(var).is_some()
    }

    /// Variables that are still undecided, in ascending order.
    pub fn unassigned(&self) -> impl Iterator<Item = Variable> + '_ {
        self.iter()
            .filter(|(_, state)| state.is_unassigned())
            .map(|(var, _)| var)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (Variable, VarState)> + '_ {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &state)| (i as Variable, state))
    }

    /// Completes this assignment into [`Solutions`].
    ///
    /// Every variable from 1 to N appears in the result. A variable the search
    /// never decided is set to `true`.
    #[must_use]
    pub fn extend(&self) -> Solutions {
        Solutions(
            self.iter()
                .map(|(_, state)| state.value().unwrap_or(true))
                .collect(),
        )
    }
}

/// A complete assignment of every variable `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Solutions(Vec<bool>);

impl Solutions {
    #[must_use]
    pub const fn new(values: Vec<bool>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len()
    }

    /// Value of `var`, `None` when `var` is out of range.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        (var as usize)
            .checked_sub(1)
            .and_then(|i| self.0.get(i).copied())
    }

    /// `true` when `lit` holds in this assignment.
    #[must_use]
    pub fn check(&self, lit: Literal) -> bool {
        self.value(lit.variable()) == Some(lit.polarity())
    }

    /// The assignment as one literal per variable, in ascending variable order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &value)| Literal::new((i + 1) as Variable, value))
    }

    /// Variables set to `true`, ascending.
    pub fn true_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.literals()
            .filter(|lit| lit.polarity())
            .map(Literal::variable)
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literals().join(" "))
    }
}
