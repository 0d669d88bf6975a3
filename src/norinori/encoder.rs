#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Compiles the NoriNori rules into CNF, one Boolean variable per cell
//! (`true` = marked).
//!
//! Two clause families are produced, adjacency first:
//! - **adjacency**: for every cell, `¬cell ∨ ¬right` and `¬cell ∨ ¬below`
//!   where those neighbours exist. Diagonals are unconstrained.
//! - **region**: for every region, one clause per unordered pair
//!   `v_i ∨ v_j`, and for regions of three or more cells one clause per
//!   unordered triple `¬v_i ∨ ¬v_j ∨ ¬v_k`.
//!
//! The pairwise family is only "exactly two" for regions of three cells. A
//! two-cell region accepts one or two marks, and regions of four or more cells
//! cannot be satisfied at all (the pairs allow at most one unmarked cell, the
//! triples at most two marked ones). [`RegionEncoding::Exact`] replaces the
//! pair clauses with one clause per subset of `k - 1` cells, which is exact for
//! every size.

use crate::norinori::grid::{Grid, RegionId};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, clap::ValueEnum)]
pub enum RegionEncoding {
    /// Pair and triple clauses.
    #[default]
    Pairwise,
    /// `(k-1)`-subset and triple clauses.
    Exact,
}

impl Display for RegionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pairwise => write!(f, "pairwise"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("region {region} has {size} cell(s), at least 2 are required")]
    RegionTooSmall { region: RegionId, size: usize },
}

/// Clauses forcing two marks among `vars`.
#[must_use]
pub fn region_clauses(vars: &[Variable], encoding: RegionEncoding) -> Vec<Clause> {
    let at_least = match encoding {
        RegionEncoding::Pairwise => 2,
        RegionEncoding::Exact => vars.len().saturating_sub(1).max(1),
    };

    let mut clauses: Vec<Clause> = vars
        .iter()
        .combinations(at_least)
        .map(|subset| subset.into_iter().map(|&v| Literal::new(v, true)).collect())
        .collect();

    if vars.len() > 2 {
        clauses.extend(
            vars.iter()
                .tuple_combinations()
                .map(|(&a, &b, &c)| {
                    Clause::new([Literal::new(a, false), Literal::new(b, false), Literal::new(c, false)])
                }),
        );
    }
    clauses
}

/// Clauses forbidding two marks on side-adjacent cells, cell by cell in
/// row-major order with the right neighbour before the lower one.
#[must_use]
pub fn adjacency_clauses(grid: &Grid) -> Vec<Clause> {
    grid.cells()
        .flat_map(|cell| {
            let var = grid.variable(cell);
            [grid.right(cell), grid.below(cell)]
                .into_iter()
                .flatten()
                .map(move |other| {
                    Clause::new([Literal::new(var, false), Literal::new(grid.variable(other), false)])
                })
        })
        .collect()
}

/// The clause set of one puzzle, split by rule.
///
/// Owns the variable and clause counts written to the DIMACS problem line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub width: usize,
    pub height: usize,
    pub encoding: RegionEncoding,
    pub adjacency: Vec<Clause>,
    pub regions: Vec<Clause>,
}

impl Encoding {
    /// # Errors
    ///
    /// [`EncodeError::RegionTooSmall`] for the first region with fewer than
    /// two cells.
    pub fn new(grid: &Grid, encoding: RegionEncoding) -> Result<Self, EncodeError> {
        let mut regions = Vec::new();
        for region in grid.regions() {
            if region.len() < 2 {
                return Err(EncodeError::RegionTooSmall {
                    region: region.label,
                    size: region.len(),
                });
            }
            let vars = region.cells.iter().map(|&cell| grid.variable(cell)).collect_vec();
            regions.extend(region_clauses(&vars, encoding));
        }

        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            encoding,
            adjacency: adjacency_clauses(grid),
            regions,
        })
    }

    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.width * self.height
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.adjacency.len() + self.regions.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.adjacency.iter().chain(&self.regions)
    }

    #[must_use]
    pub fn to_cnf(&self) -> Cnf {
        let mut cnf = Cnf::with_vars(self.num_vars());
        cnf.extend(self.clauses().cloned());
        cnf
    }
}

/// DIMACS text with a header comment and one comment line before each rule.
impl Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "c NoriNori puzzle {}x{}, {} region encoding",
            self.width, self.height, self.encoding
        )?;
        writeln!(f, "p cnf {} {}", self.num_vars(), self.num_clauses())?;

        writeln!(f, "c adjacency rule: marked cells never share a side")?;
        for clause in &self.adjacency {
            writeln!(f, "{clause}")?;
        }

        writeln!(f, "c region rule: every region holds exactly two marked cells")?;
        for clause in &self.regions {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}
