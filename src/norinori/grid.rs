#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The NoriNori board: a rectangle of cells, each labelled with the region it
//! belongs to.
//!
//! Text form, one grid row per line, in one of two forms for the whole text:
//! - whitespace-separated labels (`1 1 2 2`), chosen when any row has more
//!   than one token or when the text contains a [`NUMERIC_MARKER`] line, or
//! - one token per row read one character per cell in base 36 (`1122`, `aabb`).
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::sat::literal::Variable;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

pub type RegionId = u32;

/// The 6×6 puzzle shipped with the command-line tool, in compact form.
pub const EXAMPLE_SIX: &str = "112222134445133455163667166667666888";

/// Forces the whitespace-separated form, so that a one-column board such as
/// `40\n40` reads as two labels of 40 rather than four base-36 digits.
pub const NUMERIC_MARKER: &str = "#!numeric";

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("failed to read grid file")]
    Io(#[from] std::io::Error),

    #[error("grid has no rows")]
    NoRows,

    #[error("row {row} has no cells")]
    EmptyRow { row: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: `{token}` is not a region label")]
    InvalidLabel { row: usize, token: String },

    #[error("grid width must be positive")]
    ZeroWidth,
}

/// Zero-based position of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The cells sharing one label, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub label: RegionId,
    pub cells: Vec<Cell>,
}

impl Region {
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major labels.
    labels: Vec<RegionId>,
}

impl Grid {
    /// Builds a grid from rows of labels.
    ///
    /// # Errors
    ///
    /// [`GridError::NoRows`], [`GridError::EmptyRow`] or
    /// [`GridError::RaggedRow`] when the rows do not form a rectangle.
    pub fn new(rows: Vec<Vec<RegionId>>) -> Result<Self, GridError> {
        let width = rows.first().ok_or(GridError::NoRows)?.len();
        if width == 0 {
            return Err(GridError::EmptyRow { row: 0 });
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            labels: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a grid from one string of base-36 labels, `width` per row.
    ///
    /// # Errors
    ///
    /// [`GridError::ZeroWidth`], [`GridError::NoRows`] for an empty string,
    /// [`GridError::InvalidLabel`] for a non-alphanumeric character and
    /// [`GridError::RaggedRow`] if the length is not a multiple of `width`.
    pub fn from_compact(labels: &str, width: usize) -> Result<Self, GridError> {
        if width == 0 {
            return Err(GridError::ZeroWidth);
        }

        let labels = labels
            .chars()
            .enumerate()
            .map(|(i, c)| {
                c.to_digit(36).ok_or_else(|| GridError::InvalidLabel {
                    row: i / width,
                    token: c.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if labels.is_empty() {
            return Err(GridError::NoRows);
        }
        if labels.len() % width != 0 {
            return Err(GridError::RaggedRow {
                row: labels.len() / width,
                expected: width,
                found: labels.len() % width,
            });
        }

        Ok(Self {
            width,
            height: labels.len() / width,
            labels,
        })
    }

    /// Reads a grid in text form from `path`.
    ///
    /// # Errors
    ///
    /// [`GridError::Io`] if the file cannot be read, otherwise as
    /// [`Grid::from_str`].
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, GridError> {
        std::fs::read_to_string(path)?.parse()
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// # Panics
    ///
    /// If `cell` lies outside the grid.
    #[must_use]
    pub fn label(&self, cell: Cell) -> RegionId {
        assert!(self.contains(cell), "cell {cell} outside the grid");
        self.labels[cell.row * self.width + cell.col]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }

    /// The Boolean variable of a cell: `row * width + col + 1`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn variable(&self, cell: Cell) -> Variable {
        (cell.row * self.width + cell.col + 1) as Variable
    }

    /// Inverse of [`Grid::variable`], `None` outside `1..=num_cells`.
    #[must_use]
    pub fn cell_of(&self, var: Variable) -> Option<Cell> {
        let index = (var as usize).checked_sub(1)?;
        (index < self.num_cells()).then(|| Cell::new(index / self.width, index % self.width))
    }

    #[must_use]
    pub fn right(&self, cell: Cell) -> Option<Cell> {
        (cell.col + 1 < self.width).then(|| Cell::new(cell.row, cell.col + 1))
    }

    #[must_use]
    pub fn below(&self, cell: Cell) -> Option<Cell> {
        (cell.row + 1 < self.height).then(|| Cell::new(cell.row + 1, cell.col))
    }

    /// Side-adjacent cells: up, left, right, down.
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let up = cell.row.checked_sub(1).map(|row| Cell::new(row, cell.col));
        let left = cell.col.checked_sub(1).map(|col| Cell::new(cell.row, col));
        [up, left, self.right(cell), self.below(cell)]
            .into_iter()
            .flatten()
    }

    /// Regions in order of their first cell in row-major order.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        let mut index: FxHashMap<RegionId, usize> = FxHashMap::default();
        let mut regions: Vec<Region> = Vec::new();

        for cell in self.cells() {
            let label = self.label(cell);
            let slot = *index.entry(label).or_insert_with(|| {
                regions.push(Region {
                    label,
                    cells: Vec::new(),
                });
                regions.len() - 1
            });
            regions[slot].cells.push(cell);
        }
        regions
    }

    #[must_use]
    pub fn num_regions(&self) -> usize {
        self.regions().len()
    }

    /// Rows of labels, the inverse of [`Grid::new`].
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<RegionId>> {
        self.labels.chunks(self.width).map(<[_]>::to_vec).collect()
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).collect();
        let numeric = lines.contains(&NUMERIC_MARKER)
            || lines
                .iter()
                .filter(|line| is_row(line))
                .any(|line| line.split_whitespace().nth(1).is_some());

        let rows = lines
            .into_iter()
            .filter(|line| is_row(line))
            .enumerate()
            .map(|(row, line)| parse_row(row, line, numeric))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rows)
    }
}

fn is_row(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

fn parse_row(row: usize, line: &str, numeric: bool) -> Result<Vec<RegionId>, GridError> {
    let invalid = |token: &str| GridError::InvalidLabel {
        row,
        token: token.to_owned(),
    };

    if numeric {
        line.split_whitespace()
            .map(|token| token.parse().map_err(|_| invalid(token)))
            .collect()
    } else {
        line.chars()
            .map(|c| c.to_digit(36).ok_or_else(|| invalid(&c.to_string())))
            .collect()
    }
}

/// Renders labels below 36 compactly, one character per cell. Otherwise
/// writes [`NUMERIC_MARKER`] followed by space-separated numbers.
impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact = self.labels.iter().all(|&label| label < 36);
        if !compact {
            writeln!(f, "{NUMERIC_MARKER}")?;
        }

        for row in self.labels.chunks(self.width) {
            if compact {
                let line: String = row
                    .iter()
                    .filter_map(|&label| char::from_digit(label, 36))
                    .collect();
                writeln!(f, "{line}")?;
            } else {
                let line = row.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let grid = Grid::new(vec![vec![1, 1, 2], vec![3, 3, 2]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.num_cells(), 6);
        assert_eq!(grid.label(Cell::new(1, 2)), 2);
        assert_eq!(grid.rows(), vec![vec![1, 1, 2], vec![3, 3, 2]]);
    }

    #[test]
    fn test_rejects_non_rectangles() {
        assert!(matches!(Grid::new(vec![]), Err(GridError::NoRows)));
        assert!(matches!(
            Grid::new(vec![vec![]]),
            Err(GridError::EmptyRow { row: 0 })
        ));
        assert!(matches!(
            Grid::new(vec![vec![1, 1], vec![2]]),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_variable_mapping_is_bijective() {
        let grid = Grid::from_compact(EXAMPLE_SIX, 6).unwrap();
        let vars: Vec<Variable> = grid.cells().map(|c| grid.variable(c)).collect();

        assert_eq!(vars, (1..=36).collect::<Vec<_>>());
        for cell in grid.cells() {
            assert_eq!(grid.cell_of(grid.variable(cell)), Some(cell));
        }
        assert_eq!(grid.variable(Cell::new(2, 3)), 2 * 6 + 3 + 1);
        assert_eq!(grid.cell_of(0), None);
        assert_eq!(grid.cell_of(37), None);
    }

    #[test]
    fn test_from_compact() {
        let grid = Grid::from_compact(EXAMPLE_SIX, 6).unwrap();
        assert_eq!(grid.height(), 6);
        assert_eq!(grid.num_regions(), 8);
        assert_eq!(grid.rows()[5], vec![6, 6, 6, 8, 8, 8]);

        assert!(matches!(Grid::from_compact("112", 2), Err(GridError::RaggedRow { .. })));
        assert!(matches!(Grid::from_compact("1-", 2), Err(GridError::InvalidLabel { .. })));
        assert!(matches!(Grid::from_compact("11", 0), Err(GridError::ZeroWidth)));
        assert!(matches!(Grid::from_compact("", 3), Err(GridError::NoRows)));
    }

    #[test]
    fn test_parse_both_row_forms() {
        let spaced: Grid = "# two rows\n1 1 2\n\n3 3 2\n".parse().unwrap();
        let compact: Grid = "112\n332".parse().unwrap();
        assert_eq!(spaced, compact);

        let wide: Grid = "10 10\n11 11".parse().unwrap();
        assert_eq!(wide.rows(), vec![vec![10, 10], vec![11, 11]]);
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        let err = "1 1\n1 x!".parse::<Grid>().unwrap_err();
        match err {
            GridError::InvalidLabel { row, token } => {
                assert_eq!(row, 1);
                assert_eq!(token, "x!");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_regions_in_first_appearance_order() {
        let grid: Grid = "2211\n2331".parse().unwrap();
        let regions = grid.regions();

        let labels: Vec<RegionId> = regions.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![2, 1, 3]);
        assert_eq!(
            regions[1].cells,
            vec![Cell::new(0, 2), Cell::new(0, 3), Cell::new(1, 3)]
        );
    }

    #[test]
    fn test_neighbours() {
        let grid: Grid = "123\n456\n789".parse().unwrap();

        let corner: Vec<Cell> = grid.neighbours(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);
        assert_eq!(grid.neighbours(Cell::new(1, 1)).count(), 4);
        assert_eq!(grid.right(Cell::new(0, 2)), None);
        assert_eq!(grid.below(Cell::new(2, 0)), None);
    }

    #[test]
    fn test_display_parses_back() {
        let grid = Grid::from_compact(EXAMPLE_SIX, 6).unwrap();
        assert!(grid.to_string().starts_with("112222\n134445\n"));
        assert_eq!(grid.to_string().parse::<Grid>().unwrap(), grid);

        let wide = Grid::new(vec![vec![40, 41]]).unwrap();
        assert_eq!(wide.to_string(), "#!numeric\n40 41\n");
        assert_eq!(wide.to_string().parse::<Grid>().unwrap(), wide);
    }

    #[test]
    fn test_one_column_with_large_labels_parses_back() {
        let column = Grid::new(vec![vec![40], vec![40], vec![7], vec![7]]).unwrap();
        assert_eq!(column.to_string(), "#!numeric\n40\n40\n7\n7\n");

        let parsed: Grid = column.to_string().parse().unwrap();
        assert_eq!(parsed, column);
        assert_eq!(parsed.width(), 1);

        // Without the marker a lone token is still read in base 36.
        let compact: Grid = "40\n40".parse().unwrap();
        assert_eq!(compact.rows(), vec![vec![4, 0], vec![4, 0]]);
    }

    #[test]
    fn test_one_form_per_text() {
        let grid: Grid = "10 10\n7 7".parse().unwrap();
        assert_eq!(grid.rows(), vec![vec![10, 10], vec![7, 7]]);

        // A single-token row is a number once another row is spaced.
        assert!(matches!(
            "12\n1 2".parse::<Grid>(),
            Err(GridError::RaggedRow { row: 1, expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_parse_file() {
        let path = std::env::temp_dir().join(format!("norinori-grid-{}.nori", std::process::id()));
        std::fs::write(&path, "1122\n3344\n").unwrap();
        let grid = Grid::parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(grid.num_regions(), 4);
        assert!(matches!(
            Grid::parse_file("/definitely/not/here.nori"),
            Err(GridError::Io(_))
        ));
    }
}
