//! The JSON game document and its conversion into a playable [Puzzle].
//!
//! A document looks like:
//!
//! ```json
//! {
//!   "name": "Mini",
//!   "clues": [
//!     { "index": 1, "dir": "across", "text": "Feline" },
//!     { "index": 1, "dir": "down", "text": "Taxi", "references": [{ "index": 1, "dir": "across" }] }
//!   ],
//!   "board": [
//!     [{ "clue": 1, "answer": "C" }, { "answer": "A" }, { "answer": "T" }],
//!     [{ "answer": "A" }, null, true]
//!   ]
//! }
//! ```
//!
//! A board cell is `null` (blocked), `true` (a solid separator), or an object
//! carrying the answer letter and optionally a clue number.

use crate::Direction::{Across, Down};
use crate::{Cell, Direction, Grid, Pos};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Identifies a clue: the number shared with the cell where the clue starts,
/// plus the direction. An across clue and a down clue may share a number, so
/// the pair is the unique key, not the number alone.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
pub struct ClueId {
  pub index: u32,
  pub dir: Direction,
}

impl Display for ClueId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}-{}", self.index, self.dir)
  }
}

/// One clue of a loaded puzzle. `done` is the only mutable runtime state on a
/// [Puzzle]; it flips as the player fills and erases the clue's run.
#[derive(Debug, Clone)]
pub struct Clue {
  pub id: ClueId,
  pub text: String,
  /// The cell where this clue's run starts.
  pub origin: Pos,
  /// Whether every cell of this clue's run is currently filled in.
  pub done: bool,
  /// Other clues to co-highlight whenever this clue is selected.
  pub references: Vec<ClueId>,
}

/// The clues of a puzzle, keyed by number within each direction.
#[derive(Debug, Default)]
pub struct ClueSet {
  across: BTreeMap<u32, Clue>,
  down: BTreeMap<u32, Clue>,
}

impl ClueSet {
  /// The clues of one direction, in ascending number order.
  pub fn in_direction(&self, dir: Direction) -> &BTreeMap<u32, Clue> {
    match dir {
      Across => &self.across,
      Down => &self.down,
    }
  }

  fn in_direction_mut(&mut self, dir: Direction) -> &mut BTreeMap<u32, Clue> {
    match dir {
      Across => &mut self.across,
      Down => &mut self.down,
    }
  }

  pub fn get(&self, id: ClueId) -> Option<&Clue> {
    self.in_direction(id.dir).get(&id.index)
  }

  pub(crate) fn get_mut(&mut self, id: ClueId) -> Option<&mut Clue> {
    self.in_direction_mut(id.dir).get_mut(&id.index)
  }

  /// All clues, across first, each direction in ascending number order.
  pub fn iter(&self) -> impl Iterator<Item = &Clue> {
    self.across.values().chain(self.down.values())
  }

  pub fn len(&self) -> usize {
    self.across.len() + self.down.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// A playable crossword: immutable board and clue text, except for each
/// clue's `done` flag.
#[derive(Debug)]
pub struct Puzzle {
  name: String,
  grid: Grid,
  clues: ClueSet,
  /// The clue listed first in the document; the engine starts here.
  first: ClueId,
}

impl Puzzle {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn clues(&self) -> &ClueSet {
    &self.clues
  }

  pub(crate) fn clues_mut(&mut self) -> &mut ClueSet {
    &mut self.clues
  }

  pub fn first_clue(&self) -> ClueId {
    self.first
  }
}

/// A game document as it appears on the wire, before validation.
#[derive(Debug, Deserialize)]
pub struct Game {
  pub name: String,
  pub clues: Vec<ClueDoc>,
  pub board: Vec<Vec<Option<BoardCell>>>,
}

#[derive(Debug, Deserialize)]
pub struct ClueDoc {
  pub index: u32,
  pub dir: Direction,
  pub text: String,
  #[serde(default)]
  pub references: Vec<ClueId>,
}

/// A non-blocked board cell: any bare boolean is a solid separator, an object
/// is an enterable letter cell. (`null`, the blocked case, is handled by the
/// surrounding `Option`.)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BoardCell {
  Solid(bool),
  Letter {
    #[serde(default)]
    clue: Option<u32>,
    answer: String,
  },
}

/// The errors that may occur while loading a game document. These all surface
/// once at load time; a constructed [Puzzle] is structurally valid.
#[derive(Debug, Error)]
pub enum GameError {
  #[error("game document is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("board has no cells")]
  EmptyBoard,
  #[error("board row {row} has {got} cells, expected {want}")]
  RaggedBoard { row: usize, got: usize, want: usize },
  #[error("answer at ({row}, {col}) must be a single ASCII letter, got {answer:?}")]
  BadAnswer { row: usize, col: usize, answer: String },
  #[error("cells ({0}, {1}) and ({2}, {3}) both carry number {4}")]
  DuplicateNumber(usize, usize, usize, usize, u32),
  #[error("game has no clues")]
  NoClues,
  #[error("duplicate clue {0}")]
  DuplicateClue(ClueId),
  #[error("no cell on the board carries the number of clue {0}")]
  MissingOrigin(ClueId),
  #[error("clue {clue} references unknown clue {reference}")]
  UnknownReference { clue: ClueId, reference: ClueId },
}

impl Game {
  /// Parses a game document from JSON text. The result is unvalidated; call
  /// [into_puzzle](Self::into_puzzle) to get something playable.
  pub fn from_json(data: &str) -> Result<Self, GameError> {
    Ok(serde_json::from_str(data)?)
  }

  /// Reads and parses a game document from a file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
    Self::from_json(&std::fs::read_to_string(path)?)
  }

  /// Validates the document and builds a [Puzzle] from it. Any `done` state a
  /// document might claim is discarded; every clue starts undone.
  pub fn into_puzzle(self) -> Result<Puzzle, GameError> {
    let grid = build_grid(self.board)?;

    // Map clue numbers to the cells that carry them.
    let mut numbered: HashMap<u32, Pos> = HashMap::new();
    for pos in grid.positions() {
      if let Some(number) = grid.get(pos).clue_number() {
        if let Some(&prev) = numbered.get(&number) {
          return Err(GameError::DuplicateNumber(prev.0, prev.1, pos.0, pos.1, number));
        }
        numbered.insert(number, pos);
      }
    }

    let first = match self.clues.first() {
      Some(c) => ClueId {
        index: c.index,
        dir: c.dir,
      },
      None => return Err(GameError::NoClues),
    };

    let mut clues = ClueSet::default();
    for doc in self.clues {
      let id = ClueId {
        index: doc.index,
        dir: doc.dir,
      };
      let origin = match numbered.get(&doc.index) {
        Some(&pos) => pos,
        None => return Err(GameError::MissingOrigin(id)),
      };
      let clue = Clue {
        id,
        text: doc.text,
        origin,
        done: false,
        references: doc.references,
      };
      if clues.in_direction_mut(id.dir).insert(id.index, clue).is_some() {
        return Err(GameError::DuplicateClue(id));
      }
    }

    for clue in clues.iter() {
      for &reference in &clue.references {
        if clues.get(reference).is_none() {
          return Err(GameError::UnknownReference {
            clue: clue.id,
            reference,
          });
        }
      }
    }

    debug!(
      "loaded game '{}': {}x{} board, {} clues",
      self.name,
      grid.width(),
      grid.height(),
      clues.len()
    );

    Ok(Puzzle {
      name: self.name,
      grid,
      clues,
      first,
    })
  }
}

fn build_grid(board: Vec<Vec<Option<BoardCell>>>) -> Result<Grid, GameError> {
  if board.is_empty() || board[0].is_empty() {
    return Err(GameError::EmptyBoard);
  }

  let width = board[0].len();
  let mut rows = Vec::with_capacity(board.len());
  for (r, row) in board.into_iter().enumerate() {
    if row.len() != width {
      return Err(GameError::RaggedBoard {
        row: r,
        got: row.len(),
        want: width,
      });
    }
    let mut cells = Vec::with_capacity(width);
    for (c, cell) in row.into_iter().enumerate() {
      cells.push(match cell {
        None => Cell::Blocked,
        Some(BoardCell::Solid(_)) => Cell::Filled,
        Some(BoardCell::Letter { clue, answer }) => {
          let mut chars = answer.chars();
          match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphabetic() => Cell::Letter {
              clue,
              answer: ch.to_ascii_uppercase(),
            },
            _ => {
              return Err(GameError::BadAnswer {
                row: r,
                col: c,
                answer,
              });
            }
          }
        }
      });
    }
    rows.push(cells);
  }

  Ok(Grid::new(rows))
}

#[cfg(test)]
mod tests {
  use super::*;

  const MINI: &str = r#"{
    "name": "Corner",
    "clues": [
      { "index": 1, "dir": "across", "text": "First across" },
      { "index": 1, "dir": "down", "text": "First down" }
    ],
    "board": [
      [{ "clue": 1, "answer": "a" }, { "answer": "B" }, null],
      [{ "answer": "C" }, null, null],
      [null, null, null]
    ]
  }"#;

  #[test]
  fn parses_and_validates_mini_game() {
    let puzzle = Game::from_json(MINI).unwrap().into_puzzle().unwrap();
    assert_eq!(puzzle.name(), "Corner");
    assert_eq!(puzzle.grid().width(), 3);
    assert_eq!(puzzle.grid().height(), 3);
    assert_eq!(puzzle.clues().len(), 2);
    assert_eq!(puzzle.first_clue(), ClueId { index: 1, dir: Across });

    // Answers normalize to uppercase.
    assert_eq!(puzzle.grid().get((0, 0)).answer(), Some('A'));
    assert_eq!(puzzle.grid().get((0, 0)).clue_number(), Some(1));
    assert!(!puzzle.grid().get((1, 1)).is_enterable());

    let down = puzzle.clues().get(ClueId { index: 1, dir: Down }).unwrap();
    assert_eq!(down.origin, (0, 0));
    assert!(!down.done);
  }

  #[test]
  fn board_cell_shapes() {
    let game = Game::from_json(
      r#"{
        "name": "Shapes",
        "clues": [{ "index": 1, "dir": "across", "text": "x" }],
        "board": [[{ "clue": 1, "answer": "X" }, { "answer": "Y" }, true, null]]
      }"#,
    )
    .unwrap();
    let puzzle = game.into_puzzle().unwrap();
    assert_eq!(puzzle.grid().get((0, 2)), Cell::Filled);
    assert_eq!(puzzle.grid().get((0, 3)), Cell::Blocked);
  }

  #[test]
  fn rejects_multi_char_answer() {
    let err = Game::from_json(
      r#"{
        "name": "Bad",
        "clues": [{ "index": 1, "dir": "across", "text": "x" }],
        "board": [[{ "clue": 1, "answer": "AB" }, { "answer": "C" }]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::BadAnswer { row: 0, col: 0, .. }));
  }

  #[test]
  fn rejects_ragged_board() {
    let err = Game::from_json(
      r#"{
        "name": "Ragged",
        "clues": [{ "index": 1, "dir": "across", "text": "x" }],
        "board": [[{ "clue": 1, "answer": "A" }, { "answer": "B" }], [null]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::RaggedBoard { row: 1, got: 1, want: 2 }));
  }

  #[test]
  fn rejects_empty_board() {
    let err = Game::from_json(
      r#"{
        "name": "Void",
        "clues": [{ "index": 1, "dir": "across", "text": "x" }],
        "board": []
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::EmptyBoard));
  }

  #[test]
  fn rejects_repeated_cell_number() {
    let err = Game::from_json(
      r#"{
        "name": "Twice",
        "clues": [{ "index": 1, "dir": "across", "text": "x" }],
        "board": [[{ "clue": 1, "answer": "A" }, { "clue": 1, "answer": "B" }]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::DuplicateNumber(0, 0, 0, 1, 1)));
  }

  #[test]
  fn rejects_repeated_clue_id() {
    // Two across clues with the same number; the shared number alone is fine
    // for an across/down pair, but not within one direction.
    let err = Game::from_json(
      r#"{
        "name": "Echo",
        "clues": [
          { "index": 1, "dir": "across", "text": "x" },
          { "index": 1, "dir": "across", "text": "y" }
        ],
        "board": [[{ "clue": 1, "answer": "A" }, { "answer": "B" }]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::DuplicateClue(id) if id == ClueId { index: 1, dir: Across }));
  }

  #[test]
  fn rejects_clue_without_numbered_cell() {
    let err = Game::from_json(
      r#"{
        "name": "Lost",
        "clues": [{ "index": 7, "dir": "down", "text": "x" }],
        "board": [[{ "answer": "A" }, { "answer": "B" }]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::MissingOrigin(id) if id == ClueId { index: 7, dir: Down }));
  }

  #[test]
  fn rejects_unknown_reference() {
    let err = Game::from_json(
      r#"{
        "name": "Dangling",
        "clues": [
          { "index": 1, "dir": "across", "text": "x", "references": [{ "index": 9, "dir": "down" }] }
        ],
        "board": [[{ "clue": 1, "answer": "A" }, { "answer": "B" }]]
      }"#,
    )
    .unwrap()
    .into_puzzle()
    .unwrap_err();
    assert!(matches!(err, GameError::UnknownReference { .. }));
  }

  #[test]
  fn rejects_empty_clue_list() {
    let err = Game::from_json(r#"{ "name": "Empty", "clues": [], "board": [[null]] }"#)
      .unwrap()
      .into_puzzle()
      .unwrap_err();
    assert!(matches!(err, GameError::NoClues));
  }
}
