use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No box at that index")]
    InvalidBox,
    #[error("Contents must contradict every label")]
    InvalidArrangement,
    #[error("Operation is not valid in the current phase")]
    InvalidOperation,
    #[error("Every closed box needs a prediction before the reveal")]
    MissingPrediction,
}

pub type Result<T> = core::result::Result<T, GameError>;
