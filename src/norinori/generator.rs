#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random puzzle boards.
//!
//! Cells are first paired with a random free neighbour. Cells left without a
//! free neighbour join the region of a random neighbour. When a region count
//! is requested, random adjacent regions are then merged until it is reached.
//! Every region therefore holds at least two orthogonally connected cells.
//!
//! The generated board is not checked for solvability.

use crate::norinori::grid::{Cell, Grid, GridError, RegionId};
use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

/// Pairing attempts before a requested region count is given up on.
const MAX_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub width: usize,
    pub height: usize,
    /// Number of regions, as many as the pairing produces when `None`.
    pub regions: Option<usize>,
    /// Fixed seed for reproducible boards.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new(6, 6)
    }
}

impl GeneratorOptions {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            regions: None,
            seed: None,
        }
    }

    #[must_use]
    pub const fn with_regions(mut self, regions: usize) -> Self {
        self.regions = Some(regions);
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("a {width}x{height} board has fewer than two cells")]
    TooSmall { width: usize, height: usize },

    #[error("{requested} regions requested, a board of this size allows 1 to {max}")]
    RegionCount { requested: usize, max: usize },

    #[error("no board with {requested} regions found after {attempts} attempts")]
    Unreachable { requested: usize, attempts: usize },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Generates a board following `options`.
///
/// # Errors
///
/// [`GeneratorError::TooSmall`] for boards of fewer than two cells,
/// [`GeneratorError::RegionCount`] when the requested count is zero or above
/// half the number of cells, and [`GeneratorError::Unreachable`] when the
/// pairing never produced enough regions to merge down from.
pub fn generate(options: &GeneratorOptions) -> Result<Grid, GeneratorError> {
    let GeneratorOptions {
        width,
        height,
        regions,
        seed,
    } = *options;

    if width * height < 2 {
        return Err(GeneratorError::TooSmall { width, height });
    }

    let max = width * height / 2;
    if let Some(requested) = regions {
        if requested == 0 || requested > max {
            return Err(GeneratorError::RegionCount { requested, max });
        }
    }

    let shape = Grid::new(vec![vec![0; width]; height])?;
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    for attempt in 1..=MAX_ATTEMPTS {
        let mut labels = pair_cells(&shape, &mut rng);
        let count = labels.iter().unique().count();

        if let Some(target) = regions {
            if count < target {
                debug!("attempt {attempt}: pairing gave {count} regions, {target} requested");
                continue;
            }
            merge_regions(&shape, &mut labels, target, &mut rng);
        }

        return relabel(&shape, &labels);
    }

    Err(GeneratorError::Unreachable {
        requested: regions.unwrap_or(max),
        attempts: MAX_ATTEMPTS,
    })
}

fn index(shape: &Grid, cell: Cell) -> usize {
    cell.row * shape.width() + cell.col
}

fn pair_cells(shape: &Grid, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut labels: Vec<Option<usize>> = vec![None; shape.num_cells()];
    let mut order: Vec<Cell> = shape.cells().collect();
    rng.shuffle(&mut order);

    let mut next = 0;
    for &cell in &order {
        if labels[index(shape, cell)].is_some() {
            continue;
        }
        let free = shape
            .neighbours(cell)
            .filter(|&n| labels[index(shape, n)].is_none())
            .collect_vec();

        if let Some(partner) = rng.choice(free) {
            labels[index(shape, cell)] = Some(next);
            labels[index(shape, partner)] = Some(next);
            next += 1;
        }
    }

    // Leftover cells are never adjacent to each other, so all their
    // neighbours are paired by now.
    for cell in order {
        if labels[index(shape, cell)].is_some() {
            continue;
        }
        let taken = shape
            .neighbours(cell)
            .filter_map(|n| labels[index(shape, n)])
            .collect_vec();
        labels[index(shape, cell)] = rng.choice(taken);
    }

    labels
        .into_iter()
        .map(|label| label.unwrap_or(next))
        .collect()
}

fn merge_regions(shape: &Grid, labels: &mut [usize], target: usize, rng: &mut fastrand::Rng) {
    loop {
        let distinct = labels.iter().copied().unique().collect_vec();
        if distinct.len() <= target {
            return;
        }
        let Some(region) = rng.choice(distinct) else {
            return;
        };

        let adjacent = shape
            .cells()
            .filter(|&cell| labels[index(shape, cell)] == region)
            .flat_map(|cell| shape.neighbours(cell))
            .map(|n| labels[index(shape, n)])
            .filter(|&label| label != region)
            .unique()
            .collect_vec();

        let Some(other) = rng.choice(adjacent) else {
            return;
        };
        for label in labels.iter_mut().filter(|label| **label == other) {
            *label = region;
        }
    }
}

/// Renumbers regions from 1 in row-major order of first appearance.
fn relabel(shape: &Grid, labels: &[usize]) -> Result<Grid, GeneratorError> {
    let mut ids: FxHashMap<usize, RegionId> = FxHashMap::default();
    let rows = labels
        .chunks(shape.width())
        .map(|row| {
            row.iter()
                .map(|label| {
                    let next = RegionId::try_from(ids.len() + 1).unwrap_or(RegionId::MAX);
                    *ids.entry(*label).or_insert(next)
                })
                .collect_vec()
        })
        .collect_vec();

    Ok(Grid::new(rows)?)
}
