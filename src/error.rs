use thiserror::Error;

/// User-input-class failures surfaced by the engine. None of these are fatal;
/// every mutating operation leaves state untouched when it returns one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown company: {0}")]
    UnknownCompany(String),

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("insufficient funds: need ${needed:.2}, balance ${balance:.2}")]
    InsufficientFunds { needed: f64, balance: f64 },

    #[error("insufficient shares: want {wanted}, hold {held}")]
    InsufficientShares { wanted: u32, held: u32 },

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("session has not been started")]
    SessionNotStarted,

    #[error("session is already finished")]
    SessionFinished,

    #[error("day index {index} out of range (history length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
