//! Line-oriented game loop.

use crate::command::{Command, HELP};
use anyhow::Result;
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::{debug, warn};
use twenty48_core::{Engine, GameError, GameEvent, GameState, SessionStore};

/// Read commands from `input` until quit or end of input, drawing to `output`.
pub fn run<S, R, I, O>(engine: &mut Engine<S, R>, input: I, mut output: O) -> Result<()>
where
    S: SessionStore,
    R: Rng,
    I: BufRead,
    O: Write,
{
    writeln!(output, "Twenty48")?;
    if engine.has_resumable_game() {
        writeln!(output, "A saved game is available: r to resume, n for a new game")?;
    } else {
        writeln!(output, "n to start a new game, ? for help")?;
    }
    writeln!(output, "Best: {}", engine.best_score())?;

    for line in input.lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        debug!("Command {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            Command::NewGame => {
                engine.new_game();
            }
            Command::Resume => match engine.load_game() {
                Ok(_) => {}
                Err(GameError::NoSavedGame) => {
                    writeln!(output, "No saved game")?;
                    continue;
                }
                Err(e) => {
                    warn!("Resume failed: {}", e);
                    writeln!(output, "Could not resume: {}", e)?;
                    continue;
                }
            },
            Command::Undo => {
                if !engine.undo_move() {
                    writeln!(output, "Nothing to undo")?;
                }
            }
            Command::Move(direction) => {
                if engine.state() != GameState::InProgress {
                    writeln!(output, "No game in progress (n for a new game)")?;
                    continue;
                }
                for event in engine.make_move(direction) {
                    if let GameEvent::BestScoreUpdated { best } = event {
                        debug!("New best score {}", best);
                    }
                }
            }
        }

        draw(engine, &mut output)?;
    }

    output.flush()?;
    Ok(())
}

/// Render the board and status lines
pub fn draw<S: SessionStore, R: Rng, O: Write>(engine: &Engine<S, R>, output: &mut O) -> Result<()> {
    write!(output, "{}", engine.board())?;
    writeln!(output, "Score: {}  Best: {}", engine.score(), engine.best_score())?;
    match engine.state() {
        GameState::Won => writeln!(output, "You made {}! n for a new game", engine.max_tile())?,
        GameState::Lost => writeln!(output, "No moves left. n for a new game")?,
        _ => {}
    }
    Ok(())
}
