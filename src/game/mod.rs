//! Core Connect Four game logic: board representation, players, and the
//! engine that applies moves and detects wins and ties.

mod board;
mod engine;
mod player;

pub use board::{Board, Cell, COLS, CONNECT, ROWS};
pub use engine::{GameEngine, GameStatus, Placement};
pub use player::Player;

pub use crate::error::MoveError;
