//! Error types for the ATM.

use crate::amount::Amount;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ATM operations
pub type Result<T> = std::result::Result<T, AtmError>;

/// Errors that can occur while operating the ATM.
///
/// Nothing here is fatal to a session: domain errors are reported and the
/// amount is reprompted, format errors and PIN mismatches are reprompted where
/// they are detected, and storage errors are reported while the session
/// carries on with in-memory state.
#[derive(Error, Debug)]
pub enum AtmError {
    /// Amount is out of range: not positive, or too large to add to a balance
    #[error("Invalid amount Rs{amount}. {reason}")]
    InvalidAmount {
        amount: Amount,
        reason: &'static str,
    },

    /// Amount exceeds the available balance
    #[error("Insufficient funds. You have Rs{balance} in your account, but requested Rs{requested}.")]
    InsufficientFunds { balance: Amount, requested: Amount },

    /// Console input could not be parsed as the expected number
    #[error("Invalid input {input:?}. Please enter a numeric value.")]
    Format { input: String },

    /// Entered PIN does not match the stored PIN
    #[error("Invalid PIN. Please try again.")]
    PinMismatch,

    /// New PIN and its confirmation differ
    #[error("PIN verification failed. Please try again.")]
    PinVerification,

    /// PIN file or transaction log could not be opened
    #[error("Storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No account with the given number is held by this ATM
    #[error("Account {account} not found.")]
    AccountNotFound { account: String },

    /// The configured cardholder account is not among the seed accounts
    #[error("Cardholder account {account} is not among the loaded accounts")]
    MissingCardholder { account: String },

    /// Console input reached end of stream
    #[error("Input closed")]
    InputClosed,

    /// Console I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed account CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

impl AtmError {
    /// Returns `true` for business-rule violations raised by account operations.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            AtmError::InvalidAmount { .. } | AtmError::InsufficientFunds { .. }
        )
    }

    /// Wraps an I/O error with the path of the file that could not be used.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtmError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}
