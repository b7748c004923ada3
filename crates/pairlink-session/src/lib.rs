//! Connection bookkeeping for Pairlink.
//!
//! This crate answers three questions about every live connection:
//!
//! 1. **Who is it?**: an opaque [`ConnectionId`]
//! 2. **How do I reach it?**: a [`PeerSender`] send capability plus a
//!    liveness check ([`Peer::is_live`])
//! 3. **Where is it sitting?**: an optional room hint
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← rooms hold ConnectionIds, never sockets
//!     ↕
//! Session Layer (this crate)  ← ConnectionRegistry
//!     ↕
//! Protocol Layer (below)  ← provides RoomCode, ServerMessage types
//! ```

mod error;
mod peer;
mod registry;

pub use error::RegistryError;
pub use peer::{ConnectionId, Peer, PeerSender};
pub use registry::ConnectionRegistry;
