//! The interaction engine: one [Engine] value owns the puzzle and all
//! mutable session state (cursor, typing direction, entries, highlight,
//! per-clue done flags).
//!
//! The engine performs no I/O and renders nothing. Every operation is a
//! synchronous state transition; what a UI should change afterwards is
//! described by the [Effect]s the operation pushes, drained with
//! [take_effects](Engine::take_effects), plus the query methods
//! ([cell_role](Engine::cell_role), [entry](Engine::entry), and friends).
//!
//! Looking up a run on a cell/direction pair that has none is a logic bug
//! (the indexer and the navigation code disagree) and panics rather than
//! limping along with corrupt highlight state.

use crate::Direction::{Across, Down};
use crate::game::{ClueId, Puzzle};
use crate::index::RunIndex;
use crate::{Direction, Pos};
use log::debug;

/// What changed as a result of an engine operation. A UI applies these in
/// order; they reference cells by position and clues by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
  /// The cursor moved; the UI should focus this cell's input.
  FocusChanged { pos: Pos },
  /// The highlight was recomputed. `active` is every cell of the selected
  /// clue's run; `referenced` covers the runs of the clues the selected one
  /// cross-references. Previous marks are fully superseded.
  HighlightChanged {
    selected: ClueId,
    active: Vec<Pos>,
    referenced: Vec<Pos>,
  },
  /// A clue's done flag changed; the UI should en/disable its listing.
  ClueStateChanged { clue: ClueId, done: bool },
  /// Every enterable cell is filled and correct. Fired at most once per
  /// engine lifetime.
  PuzzleSolved,
}

/// Arrow-key input, distinct from [Direction] since a vertical arrow may act
/// as a direction toggle rather than a movement.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArrowKey {
  Up,
  Down,
  Left,
  Right,
}

impl ArrowKey {
  fn axis(self) -> Direction {
    match self {
      ArrowKey::Left | ArrowKey::Right => Across,
      ArrowKey::Up | ArrowKey::Down => Down,
    }
  }
}

/// How a cell relates to the current highlight. For instance a renderer might
/// map [Standard](Self::Standard) to white, [Cursor](Self::Cursor) to red,
/// [Active](Self::Active) to yellow, and [Referenced](Self::Referenced) to blue.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CellRole {
  /// Default styling.
  Standard,
  /// The cursor is positioned on this cell.
  Cursor,
  /// The cell belongs to the selected clue's run.
  Active,
  /// The cell belongs to the run of a clue referenced by the selected one.
  Referenced,
}

#[derive(Debug, Default, Clone)]
struct Highlight {
  active: Vec<Pos>,
  referenced: Vec<Pos>,
  referenced_clues: Vec<ClueId>,
}

/// A crossword session: the loaded [Puzzle] plus all interaction state.
#[derive(Debug)]
pub struct Engine {
  puzzle: Puzzle,
  index: RunIndex,
  entries: Vec<Vec<Option<char>>>,
  incorrect: Vec<Vec<bool>>,
  cursor: Pos,
  direction: Direction,
  current_clue: u32,
  highlight: Highlight,
  effects: Vec<Effect>,
  solved: bool,
}

impl Engine {
  /// Starts a session positioned on the puzzle's first clue. There is no
  /// in-place reset; to start over, build a new engine from a fresh puzzle.
  pub fn new(puzzle: Puzzle) -> Self {
    let index = RunIndex::build(puzzle.grid());
    let (width, height) = (puzzle.grid().width(), puzzle.grid().height());
    let first = puzzle.first_clue();
    let origin = puzzle
      .clues()
      .get(first)
      .expect("first clue missing from clue set")
      .origin;

    let mut engine = Self {
      puzzle,
      index,
      entries: vec![vec![None; width]; height],
      incorrect: vec![vec![false; width]; height],
      cursor: origin,
      direction: first.dir,
      current_clue: first.index,
      highlight: Highlight::default(),
      effects: Vec::new(),
      solved: false,
    };
    engine.focus_cell(origin);
    engine
  }

  pub fn puzzle(&self) -> &Puzzle {
    &self.puzzle
  }

  pub fn cursor(&self) -> Pos {
    self.cursor
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  /// The clue the player is currently working on.
  pub fn current_clue(&self) -> ClueId {
    ClueId {
      index: self.current_clue,
      dir: self.direction,
    }
  }

  /// The player's entry at a cell, if any.
  pub fn entry(&self, (r, c): Pos) -> Option<char> {
    self.entries[r][c]
  }

  /// Whether a check has flagged this cell as incorrect.
  pub fn is_incorrect(&self, (r, c): Pos) -> bool {
    self.incorrect[r][c]
  }

  pub fn is_solved(&self) -> bool {
    self.solved
  }

  /// Determines how a particular cell should be styled under the current
  /// highlight. See [CellRole].
  pub fn cell_role(&self, pos: Pos) -> CellRole {
    if pos == self.cursor {
      CellRole::Cursor
    } else if self.highlight.active.contains(&pos) {
      CellRole::Active
    } else if self.highlight.referenced.contains(&pos) {
      CellRole::Referenced
    } else {
      CellRole::Standard
    }
  }

  /// Whether a clue's listing should be marked as referenced by the
  /// currently selected clue.
  pub fn clue_is_referenced(&self, id: ClueId) -> bool {
    self.highlight.referenced_clues.contains(&id)
  }

  /// Every cell of the selected clue's run.
  pub fn active_cells(&self) -> &[Pos] {
    &self.highlight.active
  }

  /// Every cell of the runs of clues referenced by the selected clue.
  pub fn referenced_cells(&self) -> &[Pos] {
    &self.highlight.referenced
  }

  /// Drains the effects accumulated since the last drain.
  pub fn take_effects(&mut self) -> Vec<Effect> {
    std::mem::take(&mut self.effects)
  }

  /// Moves the cursor to an enterable cell, keeping the current typing
  /// direction when the cell has a run that way and flipping to the other
  /// axis when it does not (single-dimension entries). Recomputes the
  /// highlight and current clue.
  pub fn focus_cell(&mut self, pos: Pos) {
    let runs = self.index.cell_runs(pos);
    if runs.origin(self.direction).is_none() && runs.origin(!self.direction).is_some() {
      self.direction = !self.direction;
    }
    self.cursor = pos;
    self.effects.push(Effect::FocusChanged { pos });
    let origin = self.highlight(pos, self.direction);
    self.current_clue = self
      .puzzle
      .grid()
      .get(origin)
      .clue_number()
      .expect("run origin carries no clue number");
  }

  /// Recomputes the highlight for the run containing `pos` in the given
  /// direction, replacing all previous selection/reference marks, and returns
  /// the run's origin.
  ///
  /// # Panics
  ///
  /// Panics if the cell has no run in that direction. That can only happen
  /// when the caller and the run index disagree, which is a bug, not a
  /// recoverable condition.
  pub fn highlight(&mut self, pos: Pos, direction: Direction) -> Pos {
    let origin = self
      .index
      .run_origin(pos, direction)
      .unwrap_or_else(|| panic!("no {direction} run at {pos:?}: highlight not possible"));

    let grid = self.puzzle.grid();
    let number = grid
      .get(origin)
      .clue_number()
      .expect("run origin carries no clue number");
    let selected = ClueId {
      index: number,
      dir: direction,
    };
    let references = self
      .puzzle
      .clues()
      .get(selected)
      .unwrap_or_else(|| panic!("no clue {selected} for highlighted run"))
      .references
      .clone();

    let active = grid.run_cells(origin, direction);
    let mut referenced = Vec::new();
    let mut referenced_clues = Vec::new();
    for id in references {
      let target = self
        .puzzle
        .clues()
        .get(id)
        .expect("clue references are validated at load");
      referenced.extend(grid.run_cells(target.origin, id.dir));
      referenced_clues.push(id);
    }

    self.highlight = Highlight {
      active: active.clone(),
      referenced: referenced.clone(),
      referenced_clues,
    };
    self.effects.push(Effect::HighlightChanged {
      selected,
      active,
      referenced,
    });
    origin
  }

  /// Jumps to the nearest not-yet-done clue after (or, going backwards,
  /// before) the current one in the current direction, wrapping into the
  /// other direction's list when the current one is exhausted. When every
  /// other clue is done, the done filter is dropped and the whole search runs
  /// once more, so the jump succeeds whenever any other clue exists at all.
  ///
  /// Returns the clue jumped to, or None for a puzzle whose only clue is the
  /// current one.
  pub fn next_clue(&mut self, backwards: bool) -> Option<ClueId> {
    // Two explicit phases instead of retry-by-recursion: at most one retry.
    if let Some(id) = self.next_clue_filtered(backwards, false) {
      return Some(id);
    }
    self.next_clue_filtered(backwards, true)
  }

  fn next_clue_filtered(&mut self, backwards: bool, include_done: bool) -> Option<ClueId> {
    let current = self.current_clue;
    let dir = self.direction;

    let in_current_dir = {
      let clues = self.puzzle.clues().in_direction(dir);
      let found = if backwards {
        clues
          .range(..current)
          .rev()
          .find(|(_, c)| include_done || !c.done)
      } else {
        clues
          .range(current + 1..)
          .find(|(_, c)| include_done || !c.done)
      };
      found.map(|(_, c)| c.id)
    };
    if let Some(id) = in_current_dir {
      self.jump_to(id);
      return Some(id);
    }

    let other = !dir;
    let in_other_dir = self
      .puzzle
      .clues()
      .in_direction(other)
      .values()
      .find(|c| include_done || !c.done)
      .map(|c| c.id);
    if let Some(id) = in_other_dir {
      self.jump_to(id);
      return Some(id);
    }

    None
  }

  fn jump_to(&mut self, id: ClueId) {
    let origin = self
      .puzzle
      .clues()
      .get(id)
      .expect("jump target missing from clue set")
      .origin;
    self.direction = id.dir;
    self.current_clue = id.index;
    self.cursor = origin;
    self.effects.push(Effect::FocusChanged { pos: origin });
    self.highlight(origin, id.dir);
  }

  /// Handles an arrow key. With the key's axis matching the typing direction,
  /// the cursor moves one cell within the run (a non-enterable neighbor stops
  /// it). With the axes crossed, the key acts as a direction toggle instead:
  /// the direction switches and the highlight is recomputed, but only when
  /// the cell actually has a run on the key's axis, and the cursor stays put.
  pub fn move_arrow(&mut self, key: ArrowKey) {
    let axis = key.axis();
    if self.direction != axis {
      if self.index.run_origin(self.cursor, axis).is_some() {
        self.direction = axis;
        let origin = self.highlight(self.cursor, axis);
        self.current_clue = self
          .puzzle
          .grid()
          .get(origin)
          .clue_number()
          .expect("run origin carries no clue number");
      }
      return;
    }

    let (r, c) = self.cursor;
    let grid = self.puzzle.grid();
    let target = match key {
      ArrowKey::Left if c > 0 => Some((r, c - 1)),
      ArrowKey::Right if c + 1 < grid.width() => Some((r, c + 1)),
      ArrowKey::Up if r > 0 => Some((r - 1, c)),
      ArrowKey::Down if r + 1 < grid.height() => Some((r + 1, c)),
      _ => None,
    };
    if let Some(pos) = target {
      if grid.get(pos).is_enterable() {
        self.focus_cell(pos);
      }
    }
  }

  /// Commits one typed character to the cursor's cell. Only a single ASCII
  /// letter is accepted (normalized to uppercase); anything else clears the
  /// cell instead. On acceptance, both of the cell's runs are checked for
  /// completion, and the cursor auto-advances to the next enterable cell of
  /// the run, or on to the next clue when the run is exhausted.
  pub fn commit_char(&mut self, ch: char) {
    if !ch.is_ascii_alphabetic() {
      self.clear_current();
      return;
    }

    let (r, c) = self.cursor;
    self.entries[r][c] = Some(ch.to_ascii_uppercase());
    self.incorrect[r][c] = false;
    self.check_runs_done(self.cursor);

    let grid = self.puzzle.grid();
    let next = match self.direction {
      Across => (c + 1 < grid.width()).then(|| (r, c + 1)),
      Down => (r + 1 < grid.height()).then(|| (r + 1, c)),
    };
    if let Some(pos) = next {
      if self.puzzle.grid().get(pos).is_enterable() {
        self.focus_cell(pos);
        return;
      }
    }
    self.next_clue(false);
  }

  /// Erases the cursor's cell (re-enabling any clue that had become done
  /// through it) and steps back one cell within the current direction's run,
  /// when a previous enterable cell exists.
  pub fn backspace(&mut self) {
    self.clear_current();

    let (r, c) = self.cursor;
    let prev = match self.direction {
      Across => (c > 0).then(|| (r, c - 1)),
      Down => (r > 0).then(|| (r - 1, c)),
    };
    if let Some(pos) = prev {
      if self.puzzle.grid().get(pos).is_enterable() {
        self.focus_cell(pos);
      }
    }
  }

  /// Whether every enterable cell is filled with its answer (compared
  /// case-insensitively). With `flag_incorrect`, mismatched filled cells are
  /// additionally flagged for the UI and correct ones unflagged; the flags
  /// are cosmetic and never change the returned result. Empty cells make the
  /// check fail but are never flagged.
  pub fn check_puzzle(&mut self, flag_incorrect: bool) -> bool {
    let mut all_correct = true;
    for (r, c) in self.puzzle.grid().positions() {
      let Some(answer) = self.puzzle.grid().get((r, c)).answer() else {
        continue;
      };
      match self.entries[r][c] {
        None => all_correct = false,
        Some(ch) if ch.eq_ignore_ascii_case(&answer) => {
          if flag_incorrect {
            self.incorrect[r][c] = false;
          }
        }
        Some(_) => {
          all_correct = false;
          if flag_incorrect {
            self.incorrect[r][c] = true;
          }
        }
      }
    }
    all_correct
  }

  /// Fills every cell with its answer and marks every clue done. Terminal:
  /// the engine offers no way back short of starting a new session.
  pub fn reveal(&mut self) {
    for (r, c) in self.puzzle.grid().positions() {
      if let Some(answer) = self.puzzle.grid().get((r, c)).answer() {
        self.entries[r][c] = Some(answer);
        self.incorrect[r][c] = false;
      }
    }
    let ids: Vec<ClueId> = self.puzzle.clues().iter().map(|c| c.id).collect();
    for id in ids {
      self.set_clue_done(id, true);
    }
  }

  /// Clears the cursor's cell and its incorrect flag. An actual erasure
  /// re-enables the clues owning the cell's runs, so a done clue becomes
  /// undone the moment any of its letters disappears.
  fn clear_current(&mut self) {
    let (r, c) = self.cursor;
    self.incorrect[r][c] = false;
    if self.entries[r][c].take().is_none() {
      return;
    }

    let runs = self.index.cell_runs(self.cursor);
    for dir in [Across, Down] {
      if let Some(origin) = runs.origin(dir) {
        if let Some(number) = self.puzzle.grid().get(origin).clue_number() {
          self.set_clue_done(ClueId { index: number, dir }, false);
        }
      }
    }
  }

  /// After a cell is filled: each of its runs whose cells are now all
  /// non-empty marks its owning clue done.
  fn check_runs_done(&mut self, pos: Pos) {
    let runs = self.index.cell_runs(pos);
    let mut finished = Vec::new();
    for dir in [Across, Down] {
      if let Some(origin) = runs.origin(dir) {
        let filled = self
          .puzzle
          .grid()
          .run_cells(origin, dir)
          .iter()
          .all(|&(r, c)| self.entries[r][c].is_some());
        if filled {
          if let Some(number) = self.puzzle.grid().get(origin).clue_number() {
            finished.push(ClueId { index: number, dir });
          }
        }
      }
    }
    for id in finished {
      self.set_clue_done(id, true);
    }
  }

  fn set_clue_done(&mut self, id: ClueId, done: bool) {
    debug!("{} clue {}", if done { "disable" } else { "enable" }, id);
    self
      .puzzle
      .clues_mut()
      .get_mut(id)
      .expect("done state change for unknown clue")
      .done = done;
    self.effects.push(Effect::ClueStateChanged { clue: id, done });

    if done && !self.solved && self.check_puzzle(false) {
      self.solved = true;
      self.effects.push(Effect::PuzzleSolved);
    }
  }
}
