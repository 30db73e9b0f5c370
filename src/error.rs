use thiserror::Error;
use uuid::Uuid;

use crate::model::{Category, MAX_PLAYERS};

pub type Result<T> = std::result::Result<T, Error>;

/// Broad classes of failure. Everything except `Storage` is a caller bug:
/// the presentation layer sent a command that does not fit the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidIndex,
    NotFound,
    Storage,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("a game needs between 1 and {} players, got {}", MAX_PLAYERS, .count)]
    PlayerCount { count: usize },
    #[error("no player at index {index}; the game has {len} players")]
    InvalidPlayerIndex { index: usize, len: usize },
    #[error("{points} is not a score option for {category}")]
    InvalidPoints { category: Category, points: u32 },
    #[error("no player with id {0}")]
    UnknownPlayer(Uuid),
    #[error("no game with id {0} in history")]
    GameNotFound(Uuid),
    #[error("no game is currently being played")]
    NoCurrentGame,
    #[error("game {game_id} is inconsistent: {reason}")]
    InconsistentGame { game_id: Uuid, reason: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PlayerCount { .. } | Error::InconsistentGame { .. } => {
                ErrorKind::Configuration
            }
            Error::InvalidPlayerIndex { .. }
            | Error::InvalidPoints { .. }
            | Error::UnknownPlayer(_) => ErrorKind::InvalidIndex,
            Error::GameNotFound(_) | Error::NoCurrentGame => ErrorKind::NotFound,
            Error::Io(_) | Error::Json(_) => ErrorKind::Storage,
        }
    }
}
