//! This crate is meant to be used as the foundation for a crossword puzzle app.
//! It provides no UI itself, but see `xwordtui` for an example of how you can use it
//! to produce a crossword app.
//!
//! Puzzles are loaded from JSON game documents: a rectangular board of cells plus a
//! flat clue list. The [Engine] tracks the player's cursor, typing direction,
//! highlight state, and per-clue completion, and emits [Effect]s describing what a
//! UI should update after each interaction.

use Direction::{Across, Down};
use serde::Deserialize;
use std::fmt::Debug;
use std::fmt::Display;
use std::ops::Not;

mod engine;
mod game;
mod index;

pub use engine::{ArrowKey, CellRole, Effect, Engine};
pub use game::{BoardCell, Clue, ClueDoc, ClueId, ClueSet, Game, GameError, Puzzle};
pub use index::{CellRuns, RunIndex};

/// The two crossword directions: `Across` and `Down`.
///
/// In game documents these appear as the strings `"across"` and `"down"`.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Across,
  Down,
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// A position in a grid: (row, column)
pub type Pos = (usize, usize);

/// One position of a crossword board.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Cell {
  /// Not part of any word; rendered as an absent square.
  Blocked,
  /// A solid, non-enterable square used as a visual separator.
  Filled,
  /// A square the player can type into. `clue` is set only when this cell
  /// is the start of one or more clues.
  Letter {
    clue: Option<u32>,
    /// The solution character, always an uppercase ASCII letter.
    answer: char,
  },
}

impl Cell {
  /// Whether a letter can be entered here.
  pub fn is_enterable(&self) -> bool {
    matches!(self, Self::Letter { .. })
  }

  /// The clue number carried by this cell, if any.
  pub fn clue_number(&self) -> Option<u32> {
    match self {
      Self::Letter { clue, .. } => *clue,
      _ => None,
    }
  }

  /// The solution character, for enterable cells.
  pub fn answer(&self) -> Option<char> {
    match self {
      Self::Letter { answer, .. } => Some(*answer),
      _ => None,
    }
  }
}

impl Debug for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Blocked => write!(f, " "),
      Self::Filled => write!(f, "■"),
      Self::Letter { answer, .. } => write!(f, "{}", answer),
    }
  }
}

impl Display for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// A rectangular grid of cells. Fixed dimensions, set once at load time.
#[derive(Eq, PartialEq)]
pub struct Grid(Vec<Vec<Cell>>);

impl Grid {
  /// Rows must already be validated as rectangular and non-empty; see
  /// [Game::into_puzzle](crate::Game::into_puzzle).
  pub(crate) fn new(rows: Vec<Vec<Cell>>) -> Self {
    debug_assert!(!rows.is_empty() && !rows[0].is_empty());
    debug_assert!(rows.iter().all(|r| r.len() == rows[0].len()));
    Self(rows)
  }

  /// The width of this grid.
  pub fn width(&self) -> usize {
    self.0[0].len()
  }

  /// The height of this grid.
  pub fn height(&self) -> usize {
    self.0.len()
  }

  /// Returns the [Cell] at the given [Pos].
  pub fn get(&self, (r, c): Pos) -> Cell {
    self.0[r][c]
  }

  /// An iterator over all the positions of this grid, from left to right and top to bottom.
  pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
    let (width, height) = (self.width(), self.height());
    (0..height).flat_map(move |r| (0..width).map(move |c| (r, c)))
  }

  /// Returns the cell immediately above the given position, or [Cell::Blocked]
  /// if the given position is on the top edge of the grid.
  pub(crate) fn up_neighbor(&self, (row, col): Pos) -> Cell {
    if row == 0 { Cell::Blocked } else { self.get((row - 1, col)) }
  }

  /// Returns the cell immediately below the given position, or [Cell::Blocked]
  /// if the given position is on the bottom edge of the grid.
  pub(crate) fn down_neighbor(&self, (row, col): Pos) -> Cell {
    if row + 1 == self.height() {
      Cell::Blocked
    } else {
      self.get((row + 1, col))
    }
  }

  /// Returns the cell immediately to the left of the given position, or
  /// [Cell::Blocked] if the given position is on the left edge of the grid.
  pub(crate) fn left_neighbor(&self, (row, col): Pos) -> Cell {
    if col == 0 { Cell::Blocked } else { self.get((row, col - 1)) }
  }

  /// Returns the cell immediately to the right of the given position, or
  /// [Cell::Blocked] if the given position is on the right edge of the grid.
  pub(crate) fn right_neighbor(&self, (row, col): Pos) -> Cell {
    if col + 1 == self.width() {
      Cell::Blocked
    } else {
      self.get((row, col + 1))
    }
  }

  /// All positions of the run starting at `origin` in the given direction,
  /// walking forward until the grid edge or the first non-enterable cell.
  pub fn run_cells(&self, origin: Pos, direction: Direction) -> Vec<Pos> {
    let (row, col) = origin;
    let mut cells = Vec::new();
    match direction {
      Across => {
        let mut c = col;
        while c < self.width() && self.get((row, c)).is_enterable() {
          cells.push((row, c));
          c += 1;
        }
      }
      Down => {
        let mut r = row;
        while r < self.height() && self.get((r, col)).is_enterable() {
          cells.push((r, col));
          r += 1;
        }
      }
    }
    cells
  }
}

impl Debug for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in &self.0 {
      for cell in row {
        write!(f, "{}", cell)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl Display for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "\n{:?}", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn letter(answer: char) -> Cell {
    Cell::Letter { clue: None, answer }
  }

  fn basic_grid() -> Grid {
    // A B
    //   C■
    // D E F
    Grid::new(vec![
      vec![letter('A'), letter('B'), Cell::Blocked],
      vec![Cell::Blocked, letter('C'), Cell::Filled],
      vec![letter('D'), letter('E'), letter('F')],
    ])
  }

  #[test]
  fn grid_rendering() {
    let grid = basic_grid();
    #[rustfmt::skip]
    assert_eq!(
      grid.to_string(),
      concat!(
        "\n",
        "AB \n",
        " C■\n",
        "DEF\n",
      )
    );
  }

  #[test]
  fn neighbors_at_edges_are_blocked() {
    let grid = basic_grid();
    assert_eq!(grid.up_neighbor((0, 1)), Cell::Blocked);
    assert_eq!(grid.left_neighbor((0, 0)), Cell::Blocked);
    assert_eq!(grid.right_neighbor((1, 2)), Cell::Blocked);
    assert_eq!(grid.down_neighbor((2, 2)), Cell::Blocked);
    assert_eq!(grid.down_neighbor((0, 1)), letter('C'));
  }

  #[test]
  fn run_cells_stop_at_non_enterable() {
    let grid = basic_grid();
    assert_eq!(grid.run_cells((0, 0), Across), vec![(0, 0), (0, 1)]);
    assert_eq!(grid.run_cells((0, 1), Down), vec![(0, 1), (1, 1), (2, 1)]);
    assert_eq!(grid.run_cells((2, 0), Across), vec![(2, 0), (2, 1), (2, 2)]);
    assert_eq!(grid.run_cells((0, 0), Down), vec![(0, 0)]);
  }

  #[test]
  fn positions_cover_grid_in_reading_order() {
    let grid = basic_grid();
    let all: Vec<Pos> = grid.positions().collect();
    assert_eq!(all.len(), 9);
    assert_eq!(all[0], (0, 0));
    assert_eq!(all[3], (1, 0));
    assert_eq!(all[8], (2, 2));
  }
}
