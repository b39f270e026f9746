use thiserror::Error;

/// Rejections raised by the rules engine. Every check runs before any mutation,
/// so a returned error always leaves the game untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the map.")]
    InvalidCoordinate,

    #[error("The cell is not in the expected occupied/empty state.")]
    CellOccupiedOrEmptyMismatch,

    #[error("This is not your unit.")]
    NotYourUnit,

    #[error("You cannot attack your own unit.")]
    FriendlyFire,

    #[error("This unit cannot act right now.")]
    UnitCannotAct,

    #[error("You have already acted this turn. End the turn first.")]
    ActionAlreadyUsed,

    #[error("The unit cannot move to that cell.")]
    IllegalMove,

    #[error("The target is out of attack range.")]
    OutOfRange,
}

impl GameError {
    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidCoordinate => "INVALID_COORDINATE",
            GameError::CellOccupiedOrEmptyMismatch => "CELL_OCCUPANCY_MISMATCH",
            GameError::NotYourUnit => "NOT_YOUR_UNIT",
            GameError::FriendlyFire => "FRIENDLY_FIRE",
            GameError::UnitCannotAct => "UNIT_CANNOT_ACT",
            GameError::ActionAlreadyUsed => "ACTION_ALREADY_USED",
            GameError::IllegalMove => "ILLEGAL_MOVE",
            GameError::OutOfRange => "OUT_OF_RANGE",
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
