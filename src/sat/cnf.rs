#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CnfError {
    /// `0` terminates clauses in DIMACS text; it is never a literal.
    #[error("clause {clause} contains the literal 0")]
    ZeroLiteral { clause: usize },
}

/// A conjunction of clauses over variables `1..=num_vars`.
///
/// The variable count never drops below the largest variable mentioned by a
/// clause. An empty formula is satisfied by every assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    num_vars: usize,
}

impl Cnf {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
            num_vars: 0,
        }
    }

    /// An empty formula that already declares `num_vars` variables, as the
    /// puzzle encoder and the DIMACS header do.
    #[must_use]
    pub const fn with_vars(num_vars: usize) -> Self {
        Self {
            clauses: Vec::new(),
            num_vars,
        }
    }

    /// Appends a clause given as signed DIMACS integers.
    ///
    /// # Errors
    ///
    /// [`CnfError::ZeroLiteral`] if any of the integers is `0`; the formula is
    /// left unchanged.
    pub fn add_clause<I: IntoIterator<Item = i32>>(&mut self, literals: I) -> Result<(), CnfError> {
        let index = self.clauses.len();
        let clause = literals
            .into_iter()
            .map(|value| Literal::from_i32(value).ok_or(CnfError::ZeroLiteral { clause: index }))
            .collect::<Result<Clause, _>>()?;

        self.push_clause(clause);
        Ok(())
    }

    /// Appends an already-built clause.
    pub fn push_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.iter().map(|lit| lit.variable() as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// `true` when every clause is satisfied under the partial assignment.
    #[must_use]
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.iter().all(|clause| clause.is_satisfied(assignment))
    }

    /// Checks a complete assignment against every clause.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.iter()
            .all(|clause| clause.iter().any(|&lit| solutions.check(lit)))
    }
}

impl Extend<Clause> for Cnf {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        for clause in iter {
            self.push_clause(clause);
        }
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let mut cnf = Self::new();
        cnf.extend(iter);
        cnf
    }
}

impl TryFrom<Vec<Vec<i32>>> for Cnf {
    type Error = CnfError;

    fn try_from(clauses: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        let mut cnf = Self::new();
        for clause in clauses {
            cnf.add_clause(clause)?;
        }
        Ok(cnf)
    }
}

/// Bare DIMACS rendering: the problem line followed by one clause per line.
impl Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.num_clauses())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_formula() {
        let cnf = Cnf::new();
        assert_eq!(cnf.num_vars(), 0);
        assert_eq!(cnf.num_clauses(), 0);
        assert!(cnf.is_satisfied(&Assignment::new(0)));
        assert!(cnf.verify(&Solutions::default()));
    }

    #[test]
    fn test_add_clause_tracks_counts() {
        let mut cnf = Cnf::new();
        cnf.add_clause([1, -3]).unwrap();
        cnf.add_clause([2]).unwrap();

        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.num_literals(), 3);
    }

    #[test]
    fn test_declared_vars_are_kept() {
        let mut cnf = Cnf::with_vars(9);
        cnf.add_clause([1, 2]).unwrap();
        assert_eq!(cnf.num_vars(), 9);
        assert_eq!(cnf.num_clauses(), 1);
    }

    #[test]
    fn test_add_clause_rejects_zero() {
        let mut cnf = Cnf::new();
        cnf.add_clause([1]).unwrap();

        let err = cnf.add_clause([2, 0, 3]).unwrap_err();
        assert_eq!(err, CnfError::ZeroLiteral { clause: 1 });
        assert_eq!(cnf.num_clauses(), 1);
        assert_eq!(cnf.num_vars(), 1);
    }

    #[test]
    fn test_empty_clause_is_allowed_and_unsatisfied() {
        let mut cnf = Cnf::new();
        cnf.add_clause(Vec::new()).unwrap();
        assert_eq!(cnf.num_clauses(), 1);
        assert!(!cnf.is_satisfied(&Assignment::new(0)));
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::try_from(vec![vec![1, 2], vec![-1, -2]]).unwrap();
        assert!(cnf.verify(&Solutions::new(vec![true, false])));
        assert!(cnf.verify(&Solutions::new(vec![false, true])));
        assert!(!cnf.verify(&Solutions::new(vec![true, true])));
        assert!(!cnf.verify(&Solutions::new(vec![false, false])));
    }

    #[test]
    fn test_partial_assignment_satisfaction() {
        let cnf = Cnf::try_from(vec![vec![1, 2], vec![-2]]).unwrap();
        let mut a = Assignment::new(2);
        a.assign(1, true);
        assert!(!cnf.is_satisfied(&a));
        a.assign(2, false);
        assert!(cnf.is_satisfied(&a));
    }

    #[test]
    fn test_display() {
        let cnf = Cnf::try_from(vec![vec![1, -2], vec![2]]).unwrap();
        assert_eq!(cnf.to_string(), "p cnf 2 2\n1 -2 0\n2 0\n");
    }
}
