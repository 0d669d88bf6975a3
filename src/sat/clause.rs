#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use core::ops::Index;
use smallvec::SmallVec;
use std::fmt::{self, Display};

/// Inline capacity of a clause. Adjacency and pairwise region clauses hold at
/// most three literals.
const INLINE_LITERALS: usize = 4;

/// A disjunction of literals.
///
/// The empty clause is always false.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    pub literals: SmallVec<[Literal; INLINE_LITERALS]>,
}

impl Clause {
    pub fn new<I: IntoIterator<Item = Literal>>(literals: I) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    #[must_use]
    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.contains(&lit)
    }

    /// A copy of this clause with every occurrence of `lit` removed.
    #[must_use]
    pub fn without(&self, lit: Literal) -> Self {
        Self::new(self.iter().copied().filter(|&l| l != lit))
    }

    /// `true` if at least one literal is assigned and true. Undecided
    /// literals never satisfy a clause.
    #[must_use]
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.iter()
            .any(|&lit| assignment.literal_value(lit) == Some(true))
    }

    /// `true` if every literal is assigned and false.
    #[must_use]
    pub fn is_falsified(&self, assignment: &Assignment) -> bool {
        self.iter()
            .all(|&lit| assignment.literal_value(lit) == Some(false))
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self {
            literals: SmallVec::from_vec(literals),
        }
    }
}

/// DIMACS rendering: the literals followed by the `0` terminator.
impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in self.iter() {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}
