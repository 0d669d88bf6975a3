#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variables and literals in the signed-integer (DIMACS) convention.
//!
//! A variable is a positive integer in `[1, N]`. A literal is a non-zero
//! integer: `v` asserts variable `v` true, `-v` asserts it false.

use core::ops::{Neg, Not};
use std::fmt::{self, Display};

/// A propositional variable, numbered from 1.
pub type Variable = u32;

/// A variable together with a polarity.
///
/// The wrapped integer is never zero; `0` only exists as the clause terminator
/// of the textual DIMACS form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

impl Literal {
    /// Creates the literal of `var` with the given polarity (`true` is the
    /// positive literal).
    ///
    /// # Panics
    ///
    /// In debug builds, if `var` is zero or does not fit in an `i32`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn new(var: Variable, polarity: bool) -> Self {
        debug_assert!(var != 0, "variable 0 does not exist");
        debug_assert!(i32::try_from(var).is_ok(), "variable {var} overflows a literal");

        let value = var as i32;
        if polarity { Self(value) } else { Self(-value) }
    }

    /// Converts a signed DIMACS integer into a literal, `None` for `0`.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// The variable this literal talks about.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// The same variable with the opposite polarity.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// The signed DIMACS integer of this literal.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> Self {
        literal.to_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_polarity() {
        let pos = Literal::new(3, true);
        let neg = Literal::new(3, false);

        assert_eq!(pos.to_i32(), 3);
        assert_eq!(neg.to_i32(), -3);
        assert!(pos.polarity());
        assert!(neg.is_negated());
        assert_eq!(pos.variable(), neg.variable());
    }

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(-Literal::new(1, true), Literal::new(1, false));
        assert_eq!(!Literal::new(7, false), Literal::new(7, true));
    }

    #[test]
    fn test_from_i32_rejects_zero() {
        assert_eq!(Literal::from_i32(0), None);
        assert_eq!(Literal::from_i32(-4), Some(Literal::new(4, false)));
    }
}
