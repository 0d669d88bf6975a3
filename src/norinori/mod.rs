#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! NoriNori puzzles on top of the SAT layer.
//!
//! A board is split into regions. A solution marks exactly two cells per
//! region such that no two marked cells share a side.

pub mod encoder;
pub mod generator;
pub mod grid;
pub mod marking;

use crate::norinori::encoder::{EncodeError, Encoding, RegionEncoding};
use crate::norinori::grid::Grid;
use crate::sat::config::SolverOptions;
use crate::sat::dpll::Dpll;
use crate::sat::solver::{SolveOutcome, Solver};

/// Encodes `grid` and decides it with the DPLL solver.
///
/// # Errors
///
/// [`EncodeError`] if a region has fewer than two cells.
pub fn solve_puzzle(
    grid: &Grid,
    encoding: RegionEncoding,
    options: SolverOptions,
) -> Result<SolveOutcome, EncodeError> {
    let cnf = Encoding::new(grid, encoding)?.to_cnf();
    let mut solver: Dpll = Dpll::with_options(cnf, options);
    Ok(solver.solve())
}
