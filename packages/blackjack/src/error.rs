use crate::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Bet must be greater than 0")]
    InvalidBet,
    #[error("Insufficient chips: bet {bet}, available {chips}")]
    InsufficientChips { bet: u64, chips: u64 },
    #[error("Cannot {action} during {phase:?}")]
    IllegalTransition { action: &'static str, phase: Phase },
    #[error("Chip balance would exceed {}", u64::MAX)]
    ChipOverflow,
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(#[from] GatewayError),
    #[error("Table is closed")]
    TableClosed,
}

impl GameError {
    /// Operations called in the wrong phase are ignored rather than failed.
    pub fn is_ignored(&self) -> bool {
        matches!(self, GameError::IllegalTransition { .. })
    }
}

/// Failure talking to the ledger or the advisor.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}
