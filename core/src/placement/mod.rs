use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, Range};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use seeded::*;

mod seeded;

/// Cells within this Chebyshev radius of the first reveal never hold a mine.
pub const SAFE_RADIUS: Coord = 2;

/// Uniform integer source driving mine placement.
pub trait UniformSource {
    /// Returns an index drawn uniformly from `range`, which is never empty.
    fn pick(&mut self, range: Range<usize>) -> usize;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn pick(&mut self, range: Range<usize>) -> usize {
        (**self).pick(range)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Mine mask next to the adjacency counts, one board row per line.
impl fmt::Display for MineLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                f.write_str(if self[(row, col)] { "B" } else { "." })?;
            }
            f.write_str("  |  ")?;
            for col in 0..cols {
                write!(f, "{}", self.adjacent_mine_count((row, col)))?;
            }
            if row + 1 < rows {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

/// Every cell farther than [`SAFE_RADIUS`] from `origin`, in row-major order.
pub fn eligible_sites(size: Coord2, origin: Coord2) -> Vec<Coord2> {
    let (rows, cols) = size;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&coords| chebyshev_distance(coords, origin) > SAFE_RADIUS)
        .collect()
}

/// Chooses mine sites for a board whose first reveal is at `origin`.
///
/// The requested count is clamped to the number of eligible sites, then a
/// partial Fisher–Yates shuffle selects that many distinct sites.
pub fn place_mines<S: UniformSource>(
    size: Coord2,
    origin: Coord2,
    requested: CellCount,
    source: &mut S,
) -> MineLayout {
    let mut pool = eligible_sites(size, origin);

    let count = usize::from(requested).min(pool.len());
    if count < usize::from(requested) {
        log::warn!(
            "Not enough room for mines, requested {} but only {} cells are eligible",
            requested,
            pool.len()
        );
    }

    for i in 0..count {
        let j = source.pick(i..pool.len());
        debug_assert!((i..pool.len()).contains(&j), "source picked out of range");
        pool.swap(i, j);
    }

    let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
    for &site in &pool[..count] {
        mine_mask[site.to_nd_index()] = true;
    }

    MineLayout {
        mine_mask,
        // bounded by the pool, which is bounded by the board area
        mine_count: count as CellCount,
    }
}
