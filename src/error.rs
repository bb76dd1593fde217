//! Error types for ticket-intake
//!
//! All fallible operations in the crate return [`Result`], whose error side
//! is [`IntakeError`]. Validation failures carry the offending [`Field`] and
//! a [`Reason`] whose `Display` is the message shown to the customer.

use crate::core::TicketId;
use crate::validation::{Field, Reason};
use thiserror::Error;

/// Main error type for ticket-intake
#[derive(Error, Debug)]
pub enum IntakeError {
    /// User-correctable input problem; the first rule that failed wins
    #[error("{reason}")]
    Validation { field: Field, reason: Reason },

    /// Ticket id absent from the partition(s) searched
    #[error("Ticket #{0} not found")]
    NotFound(TicketId),

    /// Email mismatch on status lookup, or a mutation without an admin session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Ticket already sits in the resolved partition
    #[error("Ticket #{0} is already resolved")]
    AlreadyResolved(TicketId),

    /// I/O failure on the durable layer; the operation was not applied
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// Product catalog file is unreadable or malformed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Ticket reference is not a number
    #[error("Invalid ticket id '{0}'")]
    InvalidTicketId(String),

    /// Resolution command line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl IntakeError {
    /// Shorthand for building a validation error
    #[must_use]
    pub const fn validation(field: Field, reason: Reason) -> Self {
        Self::Validation { field, reason }
    }

    /// Whether the caller can fix this by changing their input
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound(_)
                | Self::Unauthorized(_)
                | Self::InvalidTicketId(_)
        )
    }
}

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<config::ConfigError> for IntakeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for ticket-intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;
