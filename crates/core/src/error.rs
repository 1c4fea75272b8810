//! Core error type for all APDU operations
//!
//! A status word is never an error at this level: every response, whatever its
//! status, is handed back to the caller. Errors are reserved for failures to
//! encode, exchange or parse an APDU.

use crate::command::CommandError;
use crate::response::error::ResponseError;
use crate::transport::TransportError;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Command could not be encoded or parsed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Response could not be parsed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// GET RESPONSE chain limit exceeded
    #[error("Chain limit exceeded after {0} GET RESPONSE commands")]
    ChainLimitExceeded(usize),

    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },

    /// Other error with static message
    #[error("{0}")]
    Other(&'static str),
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a new error with a static message
    pub const fn other(message: &'static str) -> Self {
        Self::Other(message)
    }
}

/// Result type for APDU operations
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for core::result::Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let result: core::result::Result<(), TransportError> = Err(TransportError::Timeout);
        let err = result.context("Failed to transmit SELECT").unwrap_err();
        assert_eq!(err.to_string(), "Failed to transmit SELECT: Operation timed out");
    }
}
