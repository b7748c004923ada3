//! Core protocol types for Pairlink's wire format.
//!
//! Every type here travels "on the wire": it is serialized to a JSON text
//! frame, sent over the WebSocket, and parsed by the browser on the other
//! side (or the other way round).
//!
//! The JSON shapes are fixed by existing clients. All messages are
//! internally tagged with a camelCase `"type"` and use camelCase field
//! names:
//!
//! ```text
//! → {"type":"joinRoom","gameId":"chess","roomId":"K7Q2ZD"}
//! ← {"type":"startGame","gameId":"chess","payload":{"color":"b","symbol":"O"}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A game-type tag, such as `"chess"` or `"tictactoe"`.
///
/// Each game id is an independent matchmaking pool: a `findMatch` for
/// `"chess"` never pairs with one for `"tictactoe"`, and a room created for
/// one game can't be joined by a player asking for another. The relay never
/// interprets the string beyond comparing it.
///
/// `#[serde(transparent)]` keeps it a plain JSON string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Creates a game id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A short, human-shareable room code such as `"K7Q2ZD"`.
///
/// Codes are generated by the room layer as six characters from `0-9A-Z`.
/// Players type them into a join form, so whatever arrives on the wire is
/// normalised (surrounding whitespace trimmed, ASCII uppercased) before it
/// is compared: `" k7q2zd "` finds room `K7Q2ZD`.
///
/// `#[serde(from = "String", into = "String")]` routes deserialization
/// through the normalising `From<String>` impl while still appearing as a
/// plain string in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Number of characters in a generated room code.
    pub const LEN: usize = 6;

    /// Creates a room code, normalising it the same way wire input is.
    pub fn new(code: impl Into<String>) -> Self {
        let code: String = code.into();
        Self(code.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// Which side of the board a participant plays.
///
/// Every active room has exactly one `First` and one `Second`. What a side
/// means is up to the game; the relay only hands out both conventional
/// markers (see [`SidePayload`]) so chess and tic-tac-toe clients can each
/// pick the one they care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Plays white / `X`. The earlier seeker in matchmaking.
    First,
    /// Plays black / `O`.
    Second,
}

impl Side {
    /// Returns the complementary side.
    pub fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Returns the markers a client should use for this side.
    pub fn payload(self) -> SidePayload {
        match self {
            Self::First => SidePayload {
                color: Color::White,
                symbol: Symbol::X,
            },
            Self::Second => SidePayload {
                color: Color::Black,
                symbol: Symbol::O,
            },
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// Chess-style colour marker: `"w"` or `"b"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

/// Tic-tac-toe-style marker: `"X"` or `"O"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

/// The `payload` object sent with `matchFound` and `startGame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePayload {
    pub color: Color,
    pub symbol: Symbol,
}

// ---------------------------------------------------------------------------
// ClientMessage: browser → relay
// ---------------------------------------------------------------------------

/// Everything a client can send.
///
/// `rename_all` turns variant names into the camelCase `"type"` tags;
/// `rename_all_fields` does the same for field names (`game_id` →
/// `"gameId"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// "Pair me with the next player looking for this game."
    FindMatch { game_id: GameId },

    /// "Open a private room for this game and give me its code."
    CreateRoom { game_id: GameId },

    /// "Put me in the room with this code."
    JoinRoom { game_id: GameId, room_id: RoomCode },

    /// "Forward this to my opponent."
    ///
    /// The relay never looks inside `payload`. A frame with no `move`
    /// field carries `null`.
    Move {
        #[serde(rename = "move", default)]
        payload: serde_json::Value,
    },

    /// Any `"type"` this relay doesn't know. Dropped by the dispatcher
    /// without a reply, so newer clients can talk to older servers.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FindMatch { .. } => "findMatch",
            Self::CreateRoom { .. } => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::Move { .. } => "move",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage: relay → browser
// ---------------------------------------------------------------------------

/// Everything the relay can send to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// You are queued; nobody else is looking for this game yet.
    WaitingForMatch,

    /// Matchmaking paired you. `payload` tells you your side.
    MatchFound {
        game_id: GameId,
        payload: SidePayload,
    },

    /// Your private room exists; share `room_id` with a friend.
    RoomCreated { room_id: RoomCode },

    /// Someone joined your room (or you joined theirs). `payload` tells
    /// you your side.
    StartGame {
        game_id: GameId,
        payload: SidePayload,
    },

    /// Your request was refused. `message` is human-readable.
    Error { message: String },

    /// Your opponent's move, exactly as they sent it.
    OpponentMove {
        #[serde(rename = "move")]
        payload: serde_json::Value,
    },

    /// Your opponent's connection closed; the room is gone.
    OpponentDisconnected,
}

// =========================================================================
// Tests
// =========================================================================
