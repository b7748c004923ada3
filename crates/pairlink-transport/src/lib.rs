//! Network boundary for Pairlink.
//!
//! The lobby never sees sockets. It sees a [`Transport`] that yields
//! [`Incoming`] clients, and a [`Connection`] that moves whole text frames
//! in both directions once a client's handshake is done. What the frames
//! mean is decided further up.
//!
//! # Feature Flags
//!
//! - `websocket` (default): [`WebSocketTransport`] on `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::{BoxError, TransportError};
#[cfg(feature = "websocket")]
pub use websocket::{IncomingWebSocket, WebSocketConnection, WebSocketTransport};

use std::net::SocketAddr;

/// A listener that hands out freshly accepted clients.
pub trait Transport: Send + Sync + 'static {
    type Incoming: Incoming;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client.
    ///
    /// Returns as soon as the socket is accepted. The handshake is left to
    /// [`Incoming::upgrade`], so a client that never finishes it can't hold
    /// up the listener.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;

    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// An accepted client whose handshake has not run yet.
pub trait Incoming: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake. May wait on the client indefinitely; callers
    /// bound it with a timeout.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;

    fn peer_addr(&self) -> SocketAddr;
}

/// One client's bidirectional frame pipe.
///
/// `send` and `recv` take `&self` so a handler can wait for input and
/// deliver output on the same connection at once.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Writes one text frame.
    async fn send(&self, frame: &str) -> Result<(), Self::Error>;

    /// Reads the next text frame, skipping control traffic.
    ///
    /// `Ok(None)` means the peer closed the connection.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Starts the closing handshake.
    async fn close(&self) -> Result<(), Self::Error>;

    fn peer_addr(&self) -> SocketAddr;
}
