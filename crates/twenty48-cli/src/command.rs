//! Keyboard commands accepted by the terminal driver.

use std::str::FromStr;
use thiserror::Error;
use twenty48_core::Direction;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type ? for help)")]
    Unknown(String),
}

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Undo,
    NewGame,
    Resume,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let word = input.trim().to_ascii_lowercase();
        let command = match word.as_str() {
            "" => return Err(CommandError::Empty),
            "w" | "k" | "up" => Command::Move(Direction::Up),
            "d" | "l" | "right" => Command::Move(Direction::Right),
            "s" | "j" | "down" => Command::Move(Direction::Down),
            "a" | "h" | "left" => Command::Move(Direction::Left),
            "u" | "undo" => Command::Undo,
            "n" | "new" => Command::NewGame,
            "r" | "resume" => Command::Resume,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            // Numeric direction codes, 1-4
            other => match other.parse::<u8>().ok().map(Direction::from_code) {
                Some(Ok(direction)) => Command::Move(direction),
                _ => return Err(CommandError::Unknown(input.trim().to_string())),
            },
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
Moves: w/a/s/d, h/j/k/l, or 1-4 (up, right, down, left)
u: undo   n: new game   r: resume saved game   q: quit";
