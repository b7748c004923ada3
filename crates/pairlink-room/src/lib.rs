//! Room lifecycle and matchmaking for Pairlink.
//!
//! Everything here is plain synchronous bookkeeping. The lobby actor owns
//! one [`RoomManager`] and one [`MatchQueue`] and calls into them while
//! handling a single event, so nothing in this crate needs locks.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates rooms, admits the second player, closes rooms
//! - [`MatchQueue`]: one waiting slot per game id
//! - [`Room`] / [`Participant`]: who sits where, on which side
//! - [`RoomPhase`]: lifecycle state machine
//! - [`RoomConfig`]: room-code retry cap

mod code;
mod config;
mod error;
mod manager;
mod queue;
mod room;

pub use code::generate_room_code;
pub use config::{RoomConfig, RoomPhase};
pub use error::RoomError;
pub use manager::{Admission, RoomManager};
pub use queue::MatchQueue;
pub use room::{MAX_PARTICIPANTS, Participant, Room};
