//! Error types for the server dispatcher.

use std::collections::TryReserveError;

use thiserror::Error;

use oscframe_proto::ProtocolError;

/// Convenience alias used throughout the server crate.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced by server operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Memory could not be reserved; the caller's state is unchanged.
    #[error("allocation failed: {0}")]
    Allocation(TryReserveError),

    /// No registered handler matched the given pattern and method
    /// identity.
    #[error("no handler registered for pattern {pattern:?}")]
    HandlerNotFound {
        /// Pattern the caller tried to remove
        pattern: String,
    },

    /// Wire-format violation reported by the packet codec.
    #[error("protocol error: {0}")]
    Protocol(#[source] ProtocolError),
}

impl From<TryReserveError> for ServerError {
    fn from(err: TryReserveError) -> Self {
        Self::Allocation(err)
    }
}

/// Codec errors keep their kind: allocation failure stays allocation
/// failure rather than being wrapped as a protocol problem.
impl From<ProtocolError> for ServerError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Allocation(inner) => Self::Allocation(inner),
            other => Self::Protocol(other),
        }
    }
}
