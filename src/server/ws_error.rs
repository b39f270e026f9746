//! Session-level rejections and their WebSocket rendering.
//!
//! Every rejection is reported to the requesting connection only, as an `ERROR`
//! envelope carrying the human-readable message. The code is used in logs.

use thiserror::Error;

use crate::game::GameError;
use crate::protocol::ServerMessage;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Send JOIN first.")]
    NotJoined,

    #[error("You have already joined.")]
    AlreadyJoined,

    #[error("The lobby is full (2 players).")]
    LobbyFull,

    #[error("The game has not started yet. Waiting for 2 players.")]
    GameNotStarted,

    #[error("The match is over.")]
    GameOver,

    #[error("It is the other player's turn.")]
    NotYourTurn,

    #[error("There is no unit in the selected cell.")]
    NoUnitAtSource,

    #[error("The selected unit belongs to the other player.")]
    WrongOwner,

    #[error("Coordinates are outside the map.")]
    InvalidCoordinate,

    #[error("There is no unit to attack in the target cell.")]
    CellOccupiedOrEmptyMismatch,

    #[error(transparent)]
    Rule(#[from] GameError),
}

impl SessionError {
    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotJoined => "NOT_JOINED",
            SessionError::AlreadyJoined => "ALREADY_JOINED",
            SessionError::LobbyFull => "LOBBY_FULL",
            SessionError::GameNotStarted => "GAME_NOT_STARTED",
            SessionError::GameOver => "GAME_OVER",
            SessionError::NotYourTurn => "NOT_YOUR_TURN",
            SessionError::NoUnitAtSource => "NO_UNIT_AT_SOURCE",
            SessionError::WrongOwner => "WRONG_OWNER",
            SessionError::InvalidCoordinate => "INVALID_COORDINATE",
            SessionError::CellOccupiedOrEmptyMismatch => "CELL_OCCUPANCY_MISMATCH",
            SessionError::Rule(err) => err.code(),
        }
    }
}

/// Formats a rejection as the `ERROR` envelope sent back to the requester.
pub fn ws_error_message(err: &SessionError) -> ServerMessage {
    ServerMessage::error(err.to_string())
}
