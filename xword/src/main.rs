use std::env;
use std::fs;
use xword::{Direction, Game, GameError, Puzzle};

fn load_game(path: &str) -> Result<Puzzle, GameError> {
  Game::load(path)?.into_puzzle()
}

fn summarize(puzzle: &Puzzle) {
  let across = puzzle.clues().in_direction(Direction::Across).len();
  let down = puzzle.clues().in_direction(Direction::Down).len();
  println!(
    "'{}': {}x{} board, {} across / {} down",
    puzzle.name(),
    puzzle.grid().width(),
    puzzle.grid().height(),
    across,
    down
  );
}

/// A simple CLI for testing game document parsing
fn main() -> Result<(), GameError> {
  env_logger::init();

  let args: Vec<String> = env::args().collect();

  let path = &args[1];
  if fs::metadata(path)?.is_dir() {
    let mut success = 0;
    let mut failure = 0;

    for entry in fs::read_dir(path)? {
      let game_path = entry.unwrap().path();
      if let Some(p) = game_path.to_str() {
        match load_game(p) {
          Ok(puzzle) => {
            print!("Parsed {}: ", p);
            summarize(&puzzle);
            success += 1;
          }
          Err(e) => {
            println!("Failed with {} from {}", e, p);
            failure += 1;
          }
        }
      }
    }
    dbg!(success, failure);
  } else {
    match load_game(path) {
      Ok(puzzle) => {
        summarize(&puzzle);
        println!("{}", puzzle.grid());
      }
      Err(e) => {
        println!("Failed with: {}", e);
      }
    }
  }

  Ok(())
}
