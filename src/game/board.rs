use std::fmt;

use super::player::Player;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of aligned pieces needed to win.
pub const CONNECT: usize = 4;

const _: () = assert!(
    ROWS >= CONNECT && COLS >= CONNECT,
    "board must be at least 4x4 for a win to be possible"
);

/// Ray directions as (row step, column step): horizontal, vertical,
/// diagonal down-right, diagonal down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row ROWS - 1 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Lowest empty row in a column, scanning from the bottom up.
    pub fn landing_row(&self, col: usize) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }

        (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col].is_empty())
            .ok_or(MoveError::ColumnFull { column: col })
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        let row = self.landing_row(col)?;
        self.cells[row][col] = player.to_cell();
        Ok(row)
    }

    /// Number of pieces stacked in a column
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| !self.cells[row][col].is_empty())
            .count()
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        !self.cells[0][col].is_empty()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    /// Scan every cell as the origin of a ray of four in each direction and
    /// report whether any ray is entirely owned by `player`.
    pub fn has_four_in_a_row(&self, player: Player) -> bool {
        (0..ROWS).any(|row| {
            (0..COLS).any(|col| {
                DIRECTIONS
                    .iter()
                    .any(|&dir| self.ray_owned_by(row, col, dir, player))
            })
        })
    }

    /// Check if the piece at (row, col) is part of four in a row. Only lines
    /// through that cell are examined.
    pub fn wins_through(&self, row: usize, col: usize) -> bool {
        let Some(player) = self.get(row, col).player() else {
            return false;
        };

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = self.run_length(row, col, dr, dc, player);
            let backward = self.run_length(row, col, -dr, -dc, player);
            1 + forward + backward >= CONNECT
        })
    }

    fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells.get(row as usize)?.get(col as usize).copied()
    }

    fn ray_owned_by(&self, row: usize, col: usize, (dr, dc): (isize, isize), player: Player) -> bool {
        (0..CONNECT as isize).all(|k| {
            self.cell_at(row as isize + k * dr, col as isize + k * dc) == Some(player.to_cell())
        })
    }

    /// Count consecutive `player` pieces stepping away from (row, col),
    /// not counting the starting cell.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        (1..)
            .take_while(|&k| {
                self.cell_at(row as isize + k * dr, col as isize + k * dc) == Some(player.to_cell())
            })
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".".to_string(),
                    Cell::Occupied(player) => player.number().to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
