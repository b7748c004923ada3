//! A single room: two seats, one game id, one lifecycle phase.

use pairlink_protocol::{GameId, RoomCode, Side};
use pairlink_session::ConnectionId;

use crate::{RoomError, RoomPhase};

/// Maximum participants in a room.
pub const MAX_PARTICIPANTS: usize = 2;

/// One seat in a room.
///
/// `side` is `None` only for the creator of a room that is still
/// awaiting an opponent: sides are drawn when the second player arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub conn: ConnectionId,
    pub side: Option<Side>,
}

/// The paired state for one two-player game instance.
///
/// Invariants, upheld by every constructor and mutator:
/// - never more than [`MAX_PARTICIPANTS`] participants
/// - no connection appears twice
/// - an `Active` room has exactly two participants on opposite sides
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    game_id: GameId,
    phase: RoomPhase,
    participants: Vec<Participant>,
}

impl Room {
    /// A room opened by `owner` that nobody has joined yet.
    pub(crate) fn awaiting(code: RoomCode, game_id: GameId, owner: ConnectionId) -> Self {
        Self {
            code,
            game_id,
            phase: RoomPhase::AwaitingOpponent,
            participants: vec![Participant {
                conn: owner,
                side: None,
            }],
        }
    }

    /// A room created already full by matchmaking. `first` arrived first
    /// and always takes [`Side::First`].
    pub(crate) fn paired(
        code: RoomCode,
        game_id: GameId,
        first: ConnectionId,
        second: ConnectionId,
    ) -> Self {
        Self {
            code,
            game_id,
            phase: RoomPhase::Active,
            participants: vec![
                Participant {
                    conn: first,
                    side: Some(Side::First),
                },
                Participant {
                    conn: second,
                    side: Some(Side::Second),
                },
            ],
        }
    }

    /// Seats `joiner` opposite the creator and activates the room.
    ///
    /// `creator_side` is the side the creator ends up with; the joiner
    /// gets the other one.
    pub(crate) fn admit(
        &mut self,
        joiner: ConnectionId,
        creator_side: Side,
    ) -> Result<(), RoomError> {
        if self.contains(joiner) {
            return Err(RoomError::AlreadySeated(joiner));
        }
        if !self.phase.is_joinable() || self.participants.len() >= MAX_PARTICIPANTS {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        self.participants[0].side = Some(creator_side);
        self.participants.push(Participant {
            conn: joiner,
            side: Some(creator_side.opposite()),
        });
        self.phase = RoomPhase::Active;
        Ok(())
    }

    /// Marks the room closed. Called on the record removed from the
    /// manager, just before it is dropped.
    pub(crate) fn close(&mut self) {
        if self.phase.can_transition_to(RoomPhase::Closed) {
            self.phase = RoomPhase::Closed;
        }
    }

    /// Returns the room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns the game this room was opened for.
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Returns the participants in seating order (creator or earlier
    /// seeker first).
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns `true` if `conn` holds a seat in this room.
    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.participants.iter().any(|p| p.conn == conn)
    }

    /// Returns `true` if both seats are taken.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    /// Returns the side `conn` plays, if it is seated and sides are drawn.
    pub fn side_of(&self, conn: ConnectionId) -> Option<Side> {
        self.participants
            .iter()
            .find(|p| p.conn == conn)
            .and_then(|p| p.side)
    }

    /// Returns the other participant, if `conn` is seated here and
    /// someone sits opposite.
    ///
    /// A connection that isn't a participant has no opponent, even if
    /// the room is full; that keeps a stale room hint from ever
    /// delivering to strangers.
    pub fn opponent_of(&self, conn: ConnectionId) -> Option<ConnectionId> {
        if !self.contains(conn) {
            return None;
        }
        self.participants
            .iter()
            .map(|p| p.conn)
            .find(|c| *c != conn)
    }
}
