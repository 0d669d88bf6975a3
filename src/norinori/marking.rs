#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Decoding solver models back onto the board and checking the puzzle rules
//! directly, independent of the clauses.

use crate::norinori::grid::{Cell, Grid, RegionId};
use crate::sat::assignment::Solutions;
use std::fmt::{self, Display};

/// A rule broken by a marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The region does not hold exactly two marked cells.
    RegionCount { region: RegionId, marked: usize },
    /// Two marked cells share a side.
    Adjacent { first: Cell, second: Cell },
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionCount { region, marked } => {
                write!(f, "region {region} has {marked} marked cells instead of 2")
            }
            Self::Adjacent { first, second } => {
                write!(f, "marked cells {first} and {second} are adjacent")
            }
        }
    }
}

/// The set of marked cells of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marking<'a> {
    grid: &'a Grid,
    marked: Vec<bool>,
}

impl<'a> Marking<'a> {
    /// Marks the cells whose variable is `true`. Variables beyond the board
    /// are ignored; cells without a value stay unmarked.
    #[must_use]
    pub fn from_solutions(grid: &'a Grid, solutions: &Solutions) -> Self {
        let marked = grid
            .cells()
            .map(|cell| solutions.value(grid.variable(cell)).unwrap_or(false))
            .collect();
        Self { grid, marked }
    }

    /// # Panics
    ///
    /// If a cell lies outside the board.
    #[must_use]
    pub fn from_cells(grid: &'a Grid, cells: &[Cell]) -> Self {
        let mut marked = vec![false; grid.num_cells()];
        for &cell in cells {
            assert!(grid.contains(cell), "cell {cell} outside the grid");
            marked[cell.row * grid.width() + cell.col] = true;
        }
        Self { grid, marked }
    }

    #[must_use]
    pub fn is_marked(&self, cell: Cell) -> bool {
        self.grid.contains(cell) && self.marked[cell.row * self.grid.width() + cell.col]
    }

    /// Marked cells in row-major order.
    pub fn marked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.grid.cells().filter(|&cell| self.is_marked(cell))
    }

    #[must_use]
    pub fn num_marked(&self) -> usize {
        self.marked.iter().filter(|&&m| m).count()
    }

    /// Every broken rule: region counts in region order, then adjacent pairs
    /// in row-major order.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .grid
            .regions()
            .into_iter()
            .filter_map(|region| {
                let marked = region.cells.iter().filter(|&&c| self.is_marked(c)).count();
                (marked != 2).then_some(Violation::RegionCount {
                    region: region.label,
                    marked,
                })
            })
            .collect();

        for first in self.marked_cells() {
            for second in [self.grid.right(first), self.grid.below(first)]
                .into_iter()
                .flatten()
                .filter(|&n| self.is_marked(n))
            {
                violations.push(Violation::Adjacent { first, second });
            }
        }
        violations
    }

    #[must_use]
    pub fn is_solution(&self) -> bool {
        self.violations().is_empty()
    }
}

/// `#` for a marked cell, `.` otherwise.
impl Display for Marking<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.marked.chunks(self.grid.width()) {
            let line: String = row.iter().map(|&m| if m { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
