//! Tic-tac-toe board cell encoding shared by the dataset loader and the
//! prediction tool.
//!
//! A cell is `x` (+1), `o` (-1) or blank (0). Boards are read row-major,
//! top-left first.

use thiserror::Error;

/// Number of cells on a 3x3 board.
pub const BOARD_CELLS: usize = 9;

/// A single board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    X,
    O,
    Blank,
}

impl Cell {
    /// Parse a cell symbol. Accepts `x`, `o`, `b`, `-`, `_`, `.` and empty input.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "x" | "X" => Some(Cell::X),
            "o" | "O" => Some(Cell::O),
            "" | "b" | "B" | "-" | "_" | "." => Some(Cell::Blank),
            _ => None,
        }
    }

    /// Numeric feature value for the cell.
    pub fn feature(self) -> f64 {
        match self {
            Cell::X => 1.0,
            Cell::O => -1.0,
            Cell::Blank => 0.0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("board must have 9 cells, got {0}")]
    WrongCellCount(usize),
    #[error("invalid board cell {0:?}")]
    InvalidCell(String),
}

/// Parse a board written either compactly (`xoxbbobxo`) or as comma-separated cells
/// (`x,o,x,b,b,o,b,x,o`) into feature values.
pub fn parse_board(text: &str) -> Result<Vec<f64>, BoardParseError> {
    let text = text.trim();
    let symbols: Vec<String> = if text.contains(',') {
        text.split(',').map(|cell| cell.to_string()).collect()
    } else {
        text.chars().map(|ch| ch.to_string()).collect()
    };
    if symbols.len() != BOARD_CELLS {
        return Err(BoardParseError::WrongCellCount(symbols.len()));
    }
    symbols
        .iter()
        .map(|symbol| {
            Cell::parse(symbol)
                .map(Cell::feature)
                .ok_or_else(|| BoardParseError::InvalidCell(symbol.clone()))
        })
        .collect()
}

/// Decode a dataset cell: a number, or a board symbol.
pub fn decode_feature_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value.is_finite().then_some(value);
    }
    Cell::parse(trimmed).map(Cell::feature)
}
