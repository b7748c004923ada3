use std::net::SocketAddr;
use std::time::Duration;

/// Boxed source error from the underlying WebSocket library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listening socket could not be opened.
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The listener failed to accept a TCP connection, or to report its
    /// own address.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// A TCP connection arrived but the WebSocket upgrade failed.
    #[error("websocket upgrade from {peer} failed: {source}")]
    Upgrade {
        peer: SocketAddr,
        #[source]
        source: BoxError,
    },

    /// Writing a frame to `peer` failed.
    #[error("send to {peer} failed: {source}")]
    Send {
        peer: SocketAddr,
        #[source]
        source: BoxError,
    },

    /// `peer` connected but did not finish the upgrade in time.
    #[error("websocket upgrade from {peer} timed out after {after:?}")]
    UpgradeTimedOut { peer: SocketAddr, after: Duration },

    /// Reading a frame from `peer` failed.
    #[error("receive from {peer} failed: {source}")]
    Receive {
        peer: SocketAddr,
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    /// Returns `true` for failures that only affect one incoming
    /// connection before it was ever usable.
    pub fn is_per_connection(&self) -> bool {
        matches!(self, Self::Upgrade { .. } | Self::UpgradeTimedOut { .. })
    }
}
