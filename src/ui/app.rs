use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use crate::config::UiConfig;
use crate::error::MoveError;
use crate::game::{GameEngine, COLS};

pub struct App {
    engine: GameEngine,
    config: UiConfig,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    /// When the result of a finished game should be announced.
    announce_at: Option<Instant>,
}

impl App {
    pub fn new(config: UiConfig) -> Self {
        App {
            engine: GameEngine::new(),
            selected_column: config.start_column.min(COLS - 1),
            config,
            should_quit: false,
            message: None,
            announce_at: None,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(self.config.poll_interval_ms))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Show the pending result once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.announce_at {
            if now >= at {
                self.announce_at = None;
                self.message = Some(format!(
                    "{}  Press 'r' for a new game.",
                    self.engine.status()
                ));
            }
        }
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press, unless a result is still pending
        if self.announce_at.is_none() && !self.engine.is_terminal() {
            self.message = None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.engine.reset();
                self.selected_column = self.config.start_column.min(COLS - 1);
                self.announce_at = None;
                self.message = Some("New game started!".to_string());
            }
            KeyCode::Char(c) => {
                // Digits pick a column and drop straight into it
                if let Some(col) = c.to_digit(10).map(|d| d as usize) {
                    if (1..=COLS).contains(&col) {
                        self.selected_column = col - 1;
                        self.drop_piece();
                    }
                }
            }
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        match self.engine.drop_piece(self.selected_column) {
            Ok(placement) => {
                if placement.status.is_terminal() {
                    let delay = Duration::from_millis(self.config.end_game_delay_ms);
                    self.announce_at = Some(Instant::now() + delay);
                    if delay.is_zero() {
                        self.tick(Instant::now());
                    }
                }
            }
            Err(MoveError::ColumnFull { column }) => {
                debug!(column, "drop into full column ignored");
                self.message = Some(format!("Column {} is full!", column + 1));
            }
            Err(MoveError::InvalidColumn { .. }) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameAlreadyOver) => {
                if self.announce_at.is_none() {
                    self.message = Some("Game over! Press 'r' to restart.".to_string());
                }
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.engine, self.selected_column, &self.message);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}
