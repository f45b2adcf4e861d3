use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid cell index")]
    InvalidIndex,
    #[error("Invalid box index")]
    InvalidBox,
    #[error("Action is not accepted in the current phase")]
    WrongPhase,
    #[error("Selection does not cover the target cluster yet")]
    SelectionIncomplete,
    #[error("No box has room left")]
    NoOpenBox,
    #[error("Timer was cancelled or superseded")]
    StaleTimer,
    #[error("Session was torn down, no new actions are accepted")]
    TornDown,
}

pub type Result<T> = core::result::Result<T, GameError>;
