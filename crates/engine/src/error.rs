//! Error types for engine operations.

use std::fmt;
use types::{CrisisId, DayIndex, RunId, StockId, UserId};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while driving the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Trade quantity was zero.
    InvalidQuantity,
    /// The requested user was not found.
    UnknownUser(UserId),
    /// The requested stock was not found.
    UnknownStock(StockId),
    /// The requested run was not found.
    UnknownRun(RunId),
    /// The requested crisis event was not found.
    UnknownCrisis(CrisisId),
    /// The operation requires an active run and none exists.
    NoActiveRun,
    /// Buyer cannot cover the trade cost.
    InsufficientBalance,
    /// Seller holds fewer shares than the trade quantity.
    InsufficientHoldings,
    /// The run has already reached its final day.
    WeekComplete(RunId),
    /// The weekly summary requires the run to be at its final day.
    WeekNotComplete(RunId, DayIndex),
    /// No summary has been generated for the run.
    SummaryNotFound(RunId),
    /// Crisis day range is outside the week or inverted.
    InvalidDayRange(DayIndex, DayIndex),
    /// Registration username is already in use.
    UsernameTaken(String),
    /// Login username or password did not match.
    InvalidCredentials,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidQuantity => write!(f, "trade quantity cannot be zero"),
            EngineError::UnknownUser(id) => write!(f, "unknown user: {}", id),
            EngineError::UnknownStock(id) => write!(f, "unknown stock: {}", id),
            EngineError::UnknownRun(id) => write!(f, "unknown run: {}", id),
            EngineError::UnknownCrisis(id) => write!(f, "unknown crisis event: {}", id),
            EngineError::NoActiveRun => write!(f, "no active simulation run"),
            EngineError::InsufficientBalance => write!(f, "insufficient balance for trade"),
            EngineError::InsufficientHoldings => write!(f, "insufficient holdings for trade"),
            EngineError::WeekComplete(id) => {
                write!(f, "{} is already at the final day of the week", id)
            }
            EngineError::WeekNotComplete(id, day) => {
                write!(f, "{} is at day {} and the week is not complete", id, day)
            }
            EngineError::SummaryNotFound(id) => write!(f, "no weekly summary exists for {}", id),
            EngineError::InvalidDayRange(start, end) => {
                write!(f, "invalid crisis day range: {}..={}", start, end)
            }
            EngineError::UsernameTaken(name) => write!(f, "username already taken: {}", name),
            EngineError::InvalidCredentials => write!(f, "invalid username or password"),
        }
    }
}

impl std::error::Error for EngineError {}
