use thiserror::Error;

use crate::error::HistoryError;
use crate::games::PlayerId;

#[derive(Debug, Error)]
pub enum ToppingError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("the bag holds {available} tiles, {needed} needed for a rack")]
    BagExhausted { available: usize, needed: usize },

    #[error("the game is over")]
    GameFinished,

    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("{0} is not a move")]
    NotAMove(crate::core::ActionId),

    #[error(transparent)]
    History(#[from] HistoryError),
}
