use thiserror::Error;

use crate::action::PlayerId;
use crate::card::Card;

/// Errors that can occur when manipulating the game state.
///
/// Every variant is raised before any state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),
    #[error("room is full ({capacity} players)")]
    RoomFull { capacity: usize },
    #[error("game already in progress")]
    GameAlreadyStarted,
    #[error("game not in progress")]
    GameNotInProgress,
    #[error("need at least {required} players to start")]
    NotEnoughPlayers { required: usize },
    #[error("not the specified player's turn")]
    NotYourTurn,
    #[error("invalid play: {0}")]
    InvalidPlay(#[from] InvalidPlay),
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Details of rejected player moves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidPlay {
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("{card} cannot be played on {top}")]
    CardMismatch { card: Card, top: Card },
    #[error("a color must be declared for a wild card")]
    MustDeclareColor,
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    #[error("must draw the pending cards or stack a draw card")]
    MustDrawOrStack,
    #[error("must draw a card before passing the turn")]
    MustDrawBeforePassing,
    #[error("already drew a card this turn")]
    AlreadyDrawn,
}
