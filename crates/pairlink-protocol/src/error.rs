//! Error types for the protocol layer.
//!
//! Each Pairlink crate defines its own error enum. When you see a
//! `ProtocolError`, the problem is in turning frames into messages or back,
//! not in networking or room bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into a frame).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning a frame into a message).
    ///
    /// Common causes: not JSON at all, no `"type"` tag, or a known type
    /// with a required field missing. Frames that fail here are
    /// malformed and never reach the lobby.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
