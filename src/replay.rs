//! Headless play: apply a list of column indices to a fresh game and report
//! what each one did.

use std::fmt;

use tracing::debug;

use crate::error::{MoveError, ReplayError};
use crate::game::{GameEngine, GameStatus, Placement};

/// Result of a single requested move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    pub column: usize,
    pub outcome: Result<Placement, MoveError>,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(placement) => {
                write!(
                    f,
                    "{} -> column {}, row {}",
                    placement.player, placement.column, placement.row
                )?;
                if placement.status.is_terminal() {
                    write!(f, ": {}", placement.status)?;
                }
                Ok(())
            }
            Err(err) => write!(f, "column {} rejected: {}", self.column, err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub engine: GameEngine,
}

impl ReplayReport {
    pub fn status(&self) -> GameStatus {
        self.engine.status()
    }

    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|step| step.outcome.is_err()).count()
    }
}

/// Parse a list of 0-based column indices separated by commas and/or
/// whitespace, e.g. `0,0,1,1,2,2,3`.
pub fn parse_moves(input: &str) -> Result<Vec<usize>, ReplayError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<usize>().map_err(|_| ReplayError::InvalidToken {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Apply every move in order. Rejected moves are recorded and skipped, so
/// the rest of the list still runs against the same game.
pub fn replay(moves: &[usize]) -> ReplayReport {
    let mut engine = GameEngine::new();
    let steps = moves
        .iter()
        .map(|&column| ReplayStep {
            column,
            outcome: engine.drop_piece(column),
        })
        .collect();

    debug!(moves = moves.len(), status = %engine.status(), "replay finished");
    ReplayReport { steps, engine }
}
