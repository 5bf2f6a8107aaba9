use std::io;

use crate::Coords;

#[derive(Debug, thiserror::Error)]
pub enum SnakeError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("Terminal size {actual:?} is smaller than the {needed:?} (columns, rows) the board needs")]
    TerminalTooSmall { needed: Coords, actual: Coords },
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Board must hold at least 2 cells, got {width}x{height}")]
    BoardTooSmall { width: i32, height: i32 },
    #[error("Board sides are capped at {max} cells, got {width}x{height}")]
    BoardTooLarge { width: i32, height: i32, max: i32 },
    #[error("Win threshold {win_spots} is reached before the first move on a board of {cells} cells")]
    ThresholdTooHigh { win_spots: usize, cells: usize },
    #[error("Step interval must be greater than zero")]
    ZeroStep,
    #[error("Unknown difficulty '{0}', expected 1, 2 or 3")]
    UnknownDifficulty(String),
}
