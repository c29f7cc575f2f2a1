use std::fmt;

use tracing::{debug, info, warn};

use super::board::{Board, COLS};
use super::player::Player;
use crate::error::MoveError;

/// Outcome of the game as seen from the current board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Win(Player),
    Tie,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => f.write_str("Game in progress"),
            GameStatus::Win(player) => write!(f, "{} wins!", player),
            GameStatus::Tie => f.write_str("It's a Tie!"),
        }
    }
}

/// A piece that was placed, and what it did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub player: Player,
    pub status: GameStatus,
}

/// Owns the board and turn state for a single game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
}

impl GameEngine {
    /// Start a game: empty board, player one to move.
    pub fn new() -> Self {
        GameEngine {
            board: Board::new(),
            current_player: Player::One,
        }
    }

    /// Discard the current game and start a new one.
    pub fn reset(&mut self) {
        *self = GameEngine::new();
        info!("new game started");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose turn it is. After a win this stays the winner.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn move_count(&self) -> usize {
        self.board.piece_count()
    }

    /// Derive the game status from the board. A win for the current player
    /// takes precedence over a full board.
    pub fn status(&self) -> GameStatus {
        if self.check_for_win() {
            GameStatus::Win(self.current_player)
        } else if self.board.is_full() {
            GameStatus::Tie
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Columns that can still accept a piece. Empty once the game is over.
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Row a piece dropped into `column` would land in.
    pub fn find_landing_row(&self, column: usize) -> Result<usize, MoveError> {
        self.board.landing_row(column)
    }

    /// Whole-board scan for four in a row owned by the current player.
    pub fn check_for_win(&self) -> bool {
        self.board.has_four_in_a_row(self.current_player)
    }

    /// Drop the current player's piece into `column`.
    ///
    /// On success the piece is on the board and the returned status tells the
    /// caller whether to continue or announce a result. The turn passes to
    /// the other player only while the game is still in progress. Every error
    /// leaves the engine untouched.
    pub fn drop_piece(&mut self, column: usize) -> Result<Placement, MoveError> {
        if self.is_terminal() {
            warn!(column, "move rejected: game already over");
            return Err(MoveError::GameAlreadyOver);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player).inspect_err(|err| {
            warn!(column, %err, "move rejected");
        })?;
        debug!(row, column, player = player.number(), "piece placed");

        let won = self.check_for_win();
        debug_assert_eq!(won, self.board.wins_through(row, column));

        let status = if won {
            GameStatus::Win(player)
        } else if self.board.is_full() {
            GameStatus::Tie
        } else {
            self.current_player = player.other();
            GameStatus::InProgress
        };

        if status.is_terminal() {
            info!(moves = self.move_count(), "{}", status);
        }

        Ok(Placement {
            row,
            column,
            player,
            status,
        })
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, ROWS};

    /// Fills the board with no four in a row for either player.
    const TIE_MOVES: [usize; 42] = [
        0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 4, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4,
        5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6, 6,
    ];

    /// Fills the board; the last move completes a vertical four for player 2.
    const WIN_ON_LAST_MOVE: [usize; 42] = [
        0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 4, 3, 3, 3, 3, 3, 3, 4, 4, 4, 5, 4,
        6, 5, 5, 5, 6, 6, 4, 6, 5, 6, 5, 6,
    ];

    fn play(engine: &mut GameEngine, moves: &[usize]) -> Vec<Placement> {
        crate::logging::init_for_tests();
        moves
            .iter()
            .map(|&col| engine.drop_piece(col).unwrap())
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = GameEngine::new();
        assert_eq!(engine.current_player(), Player::One);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.legal_columns().len(), COLS);
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn test_drop_piece() {
        let mut engine = GameEngine::new();
        let placement = engine.drop_piece(3).unwrap();

        assert_eq!(
            placement,
            Placement {
                row: ROWS - 1,
                column: 3,
                player: Player::One,
                status: GameStatus::InProgress,
            }
        );
        assert_eq!(engine.current_player(), Player::Two);
        assert_eq!(engine.board().get(5, 3), Cell::Occupied(Player::One));
    }

    #[test]
    fn test_find_landing_row() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.find_landing_row(0), Ok(5));
        engine.drop_piece(0).unwrap();
        assert_eq!(engine.find_landing_row(0), Ok(4));
        assert_eq!(
            engine.find_landing_row(COLS),
            Err(MoveError::InvalidColumn { column: COLS })
        );
    }

    #[test]
    fn test_bottom_row_win() {
        let mut engine = GameEngine::new();
        let placements = play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);

        for placement in &placements[..6] {
            assert_eq!(placement.status, GameStatus::InProgress);
        }
        let last = placements[6];
        assert_eq!(last.status, GameStatus::Win(Player::One));
        assert_eq!((last.row, last.column), (5, 3));
        assert_eq!(engine.current_player(), Player::One);
        assert_eq!(engine.status(), GameStatus::Win(Player::One));
    }

    #[test]
    fn test_move_after_win_rejected() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        let before = engine.clone();

        assert_eq!(engine.drop_piece(4), Err(MoveError::GameAlreadyOver));
        assert_eq!(engine, before);
        assert!(engine.legal_columns().is_empty());
    }

    #[test]
    fn test_tie() {
        let mut engine = GameEngine::new();
        let placements = play(&mut engine, &TIE_MOVES);

        for placement in &placements[..41] {
            assert_eq!(placement.status, GameStatus::InProgress);
        }
        assert_eq!(placements[41].status, GameStatus::Tie);
        assert_eq!(placements[41].player, Player::Two);
        assert_eq!(engine.current_player(), Player::Two);
        assert_eq!(engine.drop_piece(0), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_win_beats_tie_on_full_board() {
        let mut engine = GameEngine::new();
        let placements = play(&mut engine, &WIN_ON_LAST_MOVE);

        assert!(engine.board().is_full());
        assert_eq!(placements[41].status, GameStatus::Win(Player::Two));
        assert_eq!(engine.status(), GameStatus::Win(Player::Two));
    }

    #[test]
    fn test_column_full_leaves_state_unchanged() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[2; ROWS]);
        let before = engine.clone();

        assert_eq!(
            engine.drop_piece(2),
            Err(MoveError::ColumnFull { column: 2 })
        );
        assert_eq!(engine, before);
        assert!(!engine.legal_columns().contains(&2));
    }

    #[test]
    fn test_invalid_column_leaves_state_unchanged() {
        let mut engine = GameEngine::new();
        engine.drop_piece(1).unwrap();
        let before = engine.clone();

        assert_eq!(
            engine.drop_piece(COLS + 3),
            Err(MoveError::InvalidColumn { column: COLS + 3 })
        );
        assert_eq!(engine, before);
    }

    #[test]
    fn test_turns_alternate() {
        let mut engine = GameEngine::new();
        let placements = play(&mut engine, &[3, 3, 4, 2]);
        let players: Vec<Player> = placements.iter().map(|p| p.player).collect();
        assert_eq!(
            players,
            vec![Player::One, Player::Two, Player::One, Player::Two]
        );
        assert_eq!(engine.current_player(), Player::One);
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new();
        play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        engine.reset();
        assert_eq!(engine, GameEngine::new());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GameStatus::Win(Player::One).to_string(), "Player 1 wins!");
        assert_eq!(GameStatus::Tie.to_string(), "It's a Tie!");
    }
}
