//! Error types for the session layer.

use crate::ConnectionId;

/// Errors that can occur during connection bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No live registration exists for this id. Either it was never
    /// handed out or the connection has already been unregistered.
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}
