//! # Connect Four
//!
//! A two-player Connect Four engine with a terminal front end built on
//! Ratatui. The engine owns all game rules; the UI and the headless replay
//! mode only submit column indices and render what comes back.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, engine
//! - [`replay`] — Headless application of a move list
//! - [`ui`] — Terminal UI
//! - [`config`] — TOML configuration loading and validation
//! - [`logging`] — Tracing subscriber setup
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod replay;
pub mod ui;
