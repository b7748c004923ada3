//! Room manager: creates, admits to, and tears down rooms.

use std::collections::HashMap;

use pairlink_protocol::{GameId, RoomCode, Side};
use pairlink_session::ConnectionId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::code::generate_room_code;
use crate::{Room, RoomConfig, RoomError};

/// The outcome of a successful [`RoomManager::join_room`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// The room that was joined.
    pub code: RoomCode,
    /// The game the room is for.
    pub game_id: GameId,
    /// Who opened the room.
    pub creator: ConnectionId,
    /// The creator's side, drawn by coin flip.
    pub creator_side: Side,
    /// The joiner's side: always `creator_side.opposite()`.
    pub joiner_side: Side,
}

/// Owns every open room, keyed by code.
///
/// The manager is the source of truth for who sits where. It never
/// exposes the raw map; everything goes through the methods below. It
/// doesn't send messages either. The lobby does that with the results.
pub struct RoomManager {
    rooms: HashMap<RoomCode, Room>,
    config: RoomConfig,

    /// Drives both room codes and the join coin flip. Seeded from the OS
    /// in production; tests pass a fixed seed.
    rng: StdRng,
}

impl RoomManager {
    /// Creates an empty manager with an OS-seeded random source.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an empty manager with the given random source.
    pub fn with_rng(config: RoomConfig, rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
            rng,
        }
    }

    /// Swaps in a new random source and returns the old one.
    ///
    /// Handing back a source with a known seed makes the next codes
    /// predictable, which is how callers reproduce a code collision.
    pub fn replace_rng(&mut self, rng: StdRng) -> StdRng {
        std::mem::replace(&mut self.rng, rng)
    }

    /// Opens a room for `owner` and returns its code.
    ///
    /// The room starts in `AwaitingOpponent` with `owner` as its only
    /// participant.
    ///
    /// # Errors
    /// [`RoomError::CodeSpaceExhausted`] if no free code turned up within
    /// `config.code_attempts` draws.
    pub fn create_room(
        &mut self,
        owner: ConnectionId,
        game_id: GameId,
    ) -> Result<RoomCode, RoomError> {
        let code = self.allocate_code()?;
        tracing::info!(
            room_id = %code,
            %game_id,
            conn_id = %owner,
            "room created"
        );
        self.rooms
            .insert(code.clone(), Room::awaiting(code.clone(), game_id, owner));
        Ok(code)
    }

    /// Opens an already-active room for a matchmaking pair.
    ///
    /// `first` is the earlier seeker and plays [`Side::First`].
    ///
    /// # Errors
    /// [`RoomError::CodeSpaceExhausted`] as for [`create_room`](Self::create_room).
    pub fn create_paired(
        &mut self,
        first: ConnectionId,
        second: ConnectionId,
        game_id: GameId,
    ) -> Result<RoomCode, RoomError> {
        let code = self.allocate_code()?;
        tracing::info!(
            room_id = %code,
            %game_id,
            %first,
            %second,
            "matched room created"
        );
        self.rooms.insert(
            code.clone(),
            Room::paired(code.clone(), game_id, first, second),
        );
        Ok(code)
    }

    /// Seats `joiner` in room `code` as its second participant.
    ///
    /// Sides are drawn by a fair coin flip: either participant may end up
    /// as either side. The room becomes `Active`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`]: no room has this code
    /// - [`RoomError::GameMismatch`]: the room is for another game
    /// - [`RoomError::RoomFull`]: both seats are taken
    /// - [`RoomError::AlreadySeated`]: `joiner` is the room's creator
    ///
    /// On error the room is left exactly as it was.
    pub fn join_room(
        &mut self,
        joiner: ConnectionId,
        game_id: &GameId,
        code: &RoomCode,
    ) -> Result<Admission, RoomError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if room.game_id() != game_id {
            return Err(RoomError::GameMismatch {
                room: code.clone(),
                expected: room.game_id().clone(),
                requested: game_id.clone(),
            });
        }

        let creator_side = if self.rng.random_bool(0.5) {
            Side::First
        } else {
            Side::Second
        };
        room.admit(joiner, creator_side)?;

        let creator = room.participants()[0].conn;
        tracing::info!(
            room_id = %code,
            %game_id,
            %creator,
            %joiner,
            %creator_side,
            "room joined"
        );

        Ok(Admission {
            code: code.clone(),
            game_id: game_id.clone(),
            creator,
            creator_side,
            joiner_side: creator_side.opposite(),
        })
    }

    /// Removes room `code` and returns its final record, marked `Closed`.
    ///
    /// Idempotent: closing a room that is already gone returns `None`.
    pub fn close_room(&mut self, code: &RoomCode) -> Option<Room> {
        let mut room = self.rooms.remove(code)?;
        room.close();
        tracing::info!(room_id = %code, "room closed");
        Some(room)
    }

    /// Looks up an open room.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Returns `true` if a room with this code is open.
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Returns the number of open rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all open room codes.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    /// Draws codes until one is free, up to `config.code_attempts` times.
    fn allocate_code(&mut self) -> Result<RoomCode, RoomError> {
        let attempts = self.config.code_attempts.max(1);
        for attempt in 1..=attempts {
            let code = generate_room_code(&mut self.rng);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
            tracing::debug!(room_id = %code, attempt, "room code collision");
        }
        tracing::warn!(attempts, "room code space exhausted");
        Err(RoomError::CodeSpaceExhausted { attempts })
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

#[cfg(test)]
mod tests {
    //! Collision handling needs to know which code the manager will draw
    //! next, so these tests run a second `StdRng` with the same seed to
    //! predict the manager's draws.

    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn seeded(seed: u64, code_attempts: usize) -> RoomManager {
        RoomManager::with_rng(
            RoomConfig { code_attempts },
            StdRng::seed_from_u64(seed),
        )
    }

    /// Plants a room under a specific code, bypassing allocation.
    fn plant(mgr: &mut RoomManager, code: &RoomCode, owner: ConnectionId) {
        mgr.rooms.insert(
            code.clone(),
            Room::awaiting(code.clone(), GameId::from("chess"), owner),
        );
    }

    #[test]
    fn test_create_room_regenerates_on_collision() {
        let mut predictor = StdRng::seed_from_u64(7);
        let first_draw = generate_room_code(&mut predictor);
        let second_draw = generate_room_code(&mut predictor);

        let mut mgr = seeded(7, 4);
        plant(&mut mgr, &first_draw, conn(100));

        let code = mgr.create_room(conn(1), GameId::from("chess")).unwrap();

        assert_eq!(code, second_draw);
        assert_eq!(mgr.room_count(), 2);
    }

    #[test]
    fn test_create_room_gives_up_after_attempt_cap() {
        let mut predictor = StdRng::seed_from_u64(11);
        let first_draw = generate_room_code(&mut predictor);

        let mut mgr = seeded(11, 1);
        plant(&mut mgr, &first_draw, conn(100));

        let result = mgr.create_room(conn(1), GameId::from("chess"));

        assert!(matches!(
            result,
            Err(RoomError::CodeSpaceExhausted { attempts: 1 })
        ));
        assert_eq!(mgr.room_count(), 1);
    }

    #[test]
    fn test_replace_rng_rewinds_code_draws() {
        let mut mgr = seeded(13, 1);
        let first = mgr.create_room(conn(1), GameId::from("chess")).unwrap();

        mgr.replace_rng(StdRng::seed_from_u64(13));
        let result = mgr.create_paired(conn(2), conn(3), GameId::from("chess"));

        assert!(matches!(
            result,
            Err(RoomError::CodeSpaceExhausted { attempts: 1 })
        ));
        assert!(mgr.contains(&first));
        assert_eq!(mgr.room_count(), 1);
    }

    #[test]
    fn test_zero_attempt_cap_still_tries_once() {
        let mut mgr = seeded(3, 0);
        assert!(mgr.create_room(conn(1), GameId::from("chess")).is_ok());
    }

    #[test]
    fn test_join_room_coin_flip_reaches_both_sides() {
        let mut mgr = seeded(5, 32);
        let mut creator_first = 0;
        let mut creator_second = 0;

        for i in 0..200 {
            let owner = conn(i * 2 + 1);
            let joiner = conn(i * 2 + 2);
            let code = mgr.create_room(owner, GameId::from("chess")).unwrap();
            let admission = mgr
                .join_room(joiner, &GameId::from("chess"), &code)
                .unwrap();

            assert_eq!(admission.joiner_side, admission.creator_side.opposite());
            match admission.creator_side {
                Side::First => creator_first += 1,
                Side::Second => creator_second += 1,
            }
        }

        assert!(creator_first > 0, "creator never drew First");
        assert!(creator_second > 0, "creator never drew Second");
    }
}
