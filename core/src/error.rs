use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is not hidden")]
    NotHidden,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
}

pub type Result<T> = core::result::Result<T, GameError>;
