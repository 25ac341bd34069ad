use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, Padding, Paragraph, Widget},
};
use ratatui_macros::{horizontal, line, vertical};
use xword::{ArrowKey, CellRole, Direction, Effect, Engine, Game, Pos};

const SQUARE_WIDTH: u16 = 7;
const SQUARE_HEIGHT: u16 = 3;

/// Solve crossword puzzles in your terminal
#[derive(Parser)]
struct Args {
  /// Path to a JSON game document
  game: PathBuf,
}

fn main() -> io::Result<()> {
  let args = Args::parse();

  let puzzle = Game::load(&args.game)
    .and_then(Game::into_puzzle)
    .unwrap_or_else(|e| {
      println!("Unable to load game {}: {}", args.game.display(), e);
      std::process::exit(1);
    });

  let app = App::new(Engine::new(puzzle));

  let terminal = ratatui::init();
  let result = app.run(terminal);
  ratatui::restore();
  result
}

#[derive(Debug)]
pub struct App {
  engine: Engine,
  status: String,
  running: bool,
}

impl App {
  fn new(engine: Engine) -> Self {
    Self {
      engine,
      status: String::from("Type letters to fill the grid"),
      running: true,
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;
      self.handle_crossterm_events()?;
    }
    Ok(())
  }

  fn draw(&self, frame: &mut Frame) {
    frame.render_widget(self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`].
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      Event::Mouse(_) => {}
      Event::Resize(_, _) => {}
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events, forwarding interactions to the engine.
  fn on_key_event(&mut self, key: KeyEvent) {
    match (key.modifiers, key.code) {
      (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
        self.quit();
        return;
      }
      (KeyModifiers::CONTROL, KeyCode::Char('k')) => {
        self.status = if self.engine.check_puzzle(true) {
          String::from("Everything checks out!")
        } else {
          String::from("Some letters are wrong or missing")
        };
      }
      (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
        self.engine.reveal();
      }
      (_, KeyCode::Tab) => {
        self.engine.next_clue(false);
      }
      (_, KeyCode::BackTab) => {
        self.engine.next_clue(true);
      }
      (_, KeyCode::Backspace) => self.engine.backspace(),
      (_, KeyCode::Left) => self.engine.move_arrow(ArrowKey::Left),
      (_, KeyCode::Right) => self.engine.move_arrow(ArrowKey::Right),
      (_, KeyCode::Up) => self.engine.move_arrow(ArrowKey::Up),
      (_, KeyCode::Down) => self.engine.move_arrow(ArrowKey::Down),
      (modifiers, KeyCode::Char(ch)) if !modifiers.contains(KeyModifiers::CONTROL) => {
        self.engine.commit_char(ch);
      }
      _ => {}
    }
    self.apply_effects();
  }

  /// Turns engine effects into status-line updates. Focus and highlight
  /// changes need no handling here; rendering queries the engine directly.
  fn apply_effects(&mut self) {
    for effect in self.engine.take_effects() {
      match effect {
        Effect::ClueStateChanged { clue, done: true } => {
          self.status = format!("Finished {}", clue);
        }
        Effect::ClueStateChanged { clue, done: false } => {
          self.status = format!("Reopened {}", clue);
        }
        Effect::PuzzleSolved => {
          self.status = String::from("You solved it! 🎉");
        }
        Effect::FocusChanged { .. } | Effect::HighlightChanged { .. } => {}
      }
    }
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  fn render_square(&self, pos: Pos, square_area: Rect, buf: &mut Buffer) {
    let cell = self.engine.puzzle().grid().get(pos);
    if !cell.is_enterable() {
      if cell == xword::Cell::Filled {
        Block::new()
          .style(Style::new().bg(Color::Black))
          .render(square_area, buf);
      }
      return;
    }

    let bg = match self.engine.cell_role(pos) {
      CellRole::Standard => Color::White,
      CellRole::Cursor => Color::LightRed,
      CellRole::Active => Color::LightYellow,
      CellRole::Referenced => Color::LightBlue,
    };
    let fg = if self.engine.is_incorrect(pos) {
      Color::Red
    } else {
      Color::Black
    };
    let style = Style::new().bg(bg).fg(fg).add_modifier(Modifier::BOLD);

    let number = cell
      .clue_number()
      .map(|n| n.to_string())
      .unwrap_or_default();
    let letter = self
      .engine
      .entry(pos)
      .map(String::from)
      .unwrap_or_default();

    Paragraph::new(vec![
      Line::from(number).dim(),
      Line::from(letter).centered(),
    ])
    .block(Block::new().style(style))
    .render(square_area, buf);
  }

  fn clue_lines(&self, dir: Direction) -> Vec<Line<'_>> {
    let selected = self.engine.current_clue();
    self
      .engine
      .puzzle()
      .clues()
      .in_direction(dir)
      .values()
      .map(|clue| {
        let mut line = line![format!("{} ", clue.id.index).bold(), clue.text.clone()];
        if clue.id == selected {
          line = line.style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        } else if self.engine.clue_is_referenced(clue.id) {
          line = line.style(Style::new().fg(Color::LightBlue));
        }
        if clue.done {
          line = line.crossed_out().dim();
        }
        line
      })
      .collect()
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let [title_area, main_area, status_area] = vertical![==2, *=1, ==1].areas(area);

    let name = if self.engine.is_solved() {
      format!("{} — solved!", self.engine.puzzle().name())
    } else {
      self.engine.puzzle().name().to_string()
    };
    line!["Let's Play ".bold().blue(), name.bold()]
      .centered()
      .render(title_area, buf);

    let [puzzle_area, clue_area] = horizontal![*=1, ==45].areas(main_area);

    let grid = self.engine.puzzle().grid();
    let puzzle_area = center(
      puzzle_area,
      Constraint::Length((grid.width() * (1 + SQUARE_WIDTH as usize)).try_into().unwrap()),
      Constraint::Length((grid.height() * (1 + SQUARE_HEIGHT as usize)).try_into().unwrap()),
    );

    let mut square_area = Rect {
      x: puzzle_area.x,
      y: puzzle_area.y,
      width: SQUARE_WIDTH,
      height: SQUARE_HEIGHT,
    };
    for row in 0..grid.height() {
      for col in 0..grid.width() {
        self.render_square((row, col), square_area, buf);
        square_area.x += SQUARE_WIDTH + 2;
      }
      square_area.x = puzzle_area.x;
      square_area.y += SQUARE_HEIGHT + 1;
    }

    let [current_area, across_area, down_area] = vertical![==7, *=1, *=1].areas(clue_area);

    let current = self.engine.current_clue();
    let current_text = self
      .engine
      .puzzle()
      .clues()
      .get(current)
      .map(|c| c.text.clone())
      .unwrap_or_default();
    Paragraph::new(current_text)
      .block(
        Block::bordered()
          .title(Line::from(format!("Current clue: {}", current)).centered())
          .padding(Padding::uniform(1)),
      )
      .render(current_area, buf);

    Paragraph::new(self.clue_lines(Direction::Across))
      .block(Block::bordered().title("Across"))
      .render(across_area, buf);
    Paragraph::new(self.clue_lines(Direction::Down))
      .block(Block::bordered().title("Down"))
      .render(down_area, buf);

    line![
      self.status.clone().bold(),
      "   Tab: next clue  Ctrl-K: check  Ctrl-R: reveal  Esc: quit".dim()
    ]
    .render(status_area, buf);
  }
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
