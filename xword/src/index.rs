//! The run index: a one-time scan of the grid that records, for every
//! enterable cell, where its across and down runs start.
//!
//! A cell belongs to a horizontal run iff it has an enterable neighbor
//! immediately to its left or right; symmetrically for vertical runs. A cell
//! with no same-axis neighbor in either direction belongs to no run at all and
//! is unreachable by clue navigation. That is a puzzle-authoring error; the
//! index simply records no origin for it.

use crate::Direction::{Across, Down};
use crate::{Direction, Grid, Pos};

/// The run origins of a single cell, one per direction, either possibly absent.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CellRuns {
  pub across: Option<Pos>,
  pub down: Option<Pos>,
}

impl CellRuns {
  /// The origin of this cell's run in the given direction, if it has one.
  pub fn origin(&self, dir: Direction) -> Option<Pos> {
    match dir {
      Across => self.across,
      Down => self.down,
    }
  }
}

/// Precomputed run origins for every cell of a grid.
#[derive(Debug)]
pub struct RunIndex(Vec<Vec<CellRuns>>);

impl RunIndex {
  pub fn build(grid: &Grid) -> Self {
    let mut table = vec![vec![CellRuns::default(); grid.width()]; grid.height()];
    for pos in grid.positions() {
      if grid.get(pos).is_enterable() {
        table[pos.0][pos.1] = CellRuns {
          across: across_origin(grid, pos),
          down: down_origin(grid, pos),
        };
      }
    }
    Self(table)
  }

  /// Both run origins for a cell. For non-enterable or orphaned cells this is
  /// empty in both directions.
  pub fn cell_runs(&self, (r, c): Pos) -> CellRuns {
    self.0[r][c]
  }

  /// The origin of the run containing the cell in one direction.
  pub fn run_origin(&self, pos: Pos, dir: Direction) -> Option<Pos> {
    self.cell_runs(pos).origin(dir)
  }
}

/// Walks left to the first cell of the horizontal run containing `pos`, or
/// returns None if `pos` has no enterable horizontal neighbor.
fn across_origin(grid: &Grid, pos: Pos) -> Option<Pos> {
  if !grid.left_neighbor(pos).is_enterable() && !grid.right_neighbor(pos).is_enterable() {
    return None;
  }
  let (row, mut col) = pos;
  while col > 0 && grid.get((row, col - 1)).is_enterable() {
    col -= 1;
  }
  Some((row, col))
}

/// Walks up to the first cell of the vertical run containing `pos`, or
/// returns None if `pos` has no enterable vertical neighbor.
fn down_origin(grid: &Grid, pos: Pos) -> Option<Pos> {
  if !grid.up_neighbor(pos).is_enterable() && !grid.down_neighbor(pos).is_enterable() {
    return None;
  }
  let (mut row, col) = pos;
  while row > 0 && grid.get((row - 1, col)).is_enterable() {
    row -= 1;
  }
  Some((row, col))
}
