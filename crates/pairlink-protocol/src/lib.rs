//! Wire protocol for Pairlink.
//!
//! This crate defines the "language" that browsers and the relay speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`GameId`],
//!   [`RoomCode`], [`Side`]): the message structures that travel on the
//!   wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to/from text frames.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the lobby
//! (pairing and relay). It doesn't know about connections or rooms; it
//! only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage) → Lobby (rooms, queue)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ClientMessage, Color, GameId, RoomCode, ServerMessage, Side, SidePayload,
    Symbol,
};
