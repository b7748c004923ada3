//! The lobby: every piece of pairing state, and the one place it changes.
//!
//! [`Lobby`] bundles the connection registry, the matchmaking queue and the
//! room manager. Each inbound event (a decoded client message or a
//! disconnect) is handled by exactly one method call that runs to
//! completion before the next event starts. The lobby actor
//! is what guarantees that ordering at runtime; the lobby itself is
//! plain synchronous code, which is what makes it easy to test.
//!
//! The flows live in submodules:
//! - `matchmaking`: `findMatch`
//! - `rooms`: `createRoom` / `joinRoom`
//! - `relay`: `move`
//! - `disconnect`: connection loss

mod disconnect;
mod matchmaking;
mod relay;
mod rooms;

use pairlink_protocol::{ClientMessage, GameId, RoomCode, ServerMessage};
use pairlink_room::{MatchQueue, Room, RoomError, RoomManager};
use pairlink_session::{ConnectionId, ConnectionRegistry, PeerSender};

use crate::LobbyConfig;

/// A snapshot of lobby occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LobbyStats {
    /// Registered connections.
    pub connections: usize,
    /// Occupied matchmaking slots.
    pub waiting: usize,
    /// Open rooms (awaiting an opponent or active).
    pub rooms: usize,
}

/// Process-wide pairing state: who is connected, who is waiting, who
/// sits in which room.
///
/// Nothing outside this type touches the registry, queue or room map.
pub struct Lobby {
    registry: ConnectionRegistry,
    queue: MatchQueue,
    rooms: RoomManager,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new(config: &LobbyConfig) -> Self {
        Self::with_room_manager(RoomManager::new(config.room_config()))
    }

    /// Creates an empty lobby around an existing room manager.
    ///
    /// Tests use this to pass a manager with a seeded random source.
    pub fn with_room_manager(rooms: RoomManager) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            queue: MatchQueue::new(),
            rooms,
        }
    }

    /// Registers a new connection and returns its id.
    pub fn connect(&mut self, outbound: PeerSender) -> ConnectionId {
        let conn_id = self.registry.register(outbound);
        tracing::info!(%conn_id, "connection registered with lobby");
        conn_id
    }

    /// Handles one decoded message from `conn`.
    ///
    /// Never fails: every recoverable condition is either answered with an
    /// `error` message or dropped here.
    pub fn dispatch(&mut self, conn: ConnectionId, msg: ClientMessage) {
        if !self.registry.contains(conn) {
            tracing::debug!(
                conn_id = %conn,
                kind = msg.kind(),
                "message from unregistered connection dropped"
            );
            return;
        }

        match msg {
            ClientMessage::FindMatch { game_id } => self.find_match(conn, game_id),
            ClientMessage::CreateRoom { game_id } => self.create_room(conn, game_id),
            ClientMessage::JoinRoom { game_id, room_id } => self.join_room(conn, game_id, room_id),
            ClientMessage::Move { payload } => self.relay_move(conn, payload),
            ClientMessage::Unknown => {
                tracing::debug!(conn_id = %conn, "unknown message type ignored");
            }
        }
    }

    /// Returns current occupancy counts.
    pub fn stats(&self) -> LobbyStats {
        LobbyStats {
            connections: self.registry.len(),
            waiting: self.queue.len(),
            rooms: self.rooms.room_count(),
        }
    }

    /// Returns the room `conn` is associated with, if any.
    pub fn room_of(&self, conn: ConnectionId) -> Option<&RoomCode> {
        self.registry.room_of(conn)
    }

    /// Looks up an open room.
    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Returns who is waiting for `game_id`.
    pub fn waiting_for(&self, game_id: &GameId) -> Option<ConnectionId> {
        self.queue.waiting_for(game_id)
    }

    /// Returns `true` if `conn` is still registered.
    pub fn is_connected(&self, conn: ConnectionId) -> bool {
        self.registry.contains(conn)
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// A connection that waits or sits in a room can't start another
    /// pairing until that one ends.
    fn is_engaged(&self, conn: ConnectionId) -> bool {
        self.registry.room_of(conn).is_some() || self.queue.is_waiting(conn)
    }

    /// Associates `conn` with `code`, logging instead of failing if the
    /// connection vanished.
    fn seat(&mut self, conn: ConnectionId, code: &RoomCode) {
        if let Err(e) = self.registry.associate(conn, code.clone()) {
            tracing::warn!(
                conn_id = %conn,
                room_id = %code,
                error = %e,
                "could not associate connection"
            );
        }
    }

    /// Answers `conn` with an `error` message carrying `err`'s text.
    fn reject(&self, conn: ConnectionId, err: RoomError) {
        tracing::debug!(conn_id = %conn, error = %err, "request rejected");
        self.registry.send(
            conn,
            ServerMessage::Error {
                message: err.to_string(),
            },
        );
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(&LobbyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pairlink_protocol::ServerMessage;
    use tokio::sync::mpsc;

    use super::*;

    fn client(lobby: &mut Lobby) -> (ConnectionId, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (lobby.connect(tx), rx)
    }

    #[test]
    fn test_connect_hands_out_distinct_ids() {
        let mut lobby = Lobby::default();
        let (a, _ra) = client(&mut lobby);
        let (b, _rb) = client(&mut lobby);

        assert_ne!(a, b);
        assert_eq!(lobby.stats().connections, 2);
    }

    #[test]
    fn test_dispatch_unknown_is_noop() {
        let mut lobby = Lobby::default();
        let (a, mut ra) = client(&mut lobby);

        lobby.dispatch(a, ClientMessage::Unknown);

        assert!(ra.try_recv().is_err());
        assert_eq!(
            lobby.stats(),
            LobbyStats {
                connections: 1,
                waiting: 0,
                rooms: 0
            }
        );
    }

    #[test]
    fn test_dispatch_from_unregistered_connection_is_dropped() {
        let mut lobby = Lobby::default();

        lobby.dispatch(
            ConnectionId::new(99),
            ClientMessage::FindMatch {
                game_id: GameId::from("chess"),
            },
        );

        assert_eq!(lobby.stats(), LobbyStats::default());
    }

    #[test]
    fn test_is_engaged_covers_queue_and_room() {
        let mut lobby = Lobby::default();
        let (a, _ra) = client(&mut lobby);
        let (b, _rb) = client(&mut lobby);
        assert!(!lobby.is_engaged(a));

        lobby.dispatch(
            a,
            ClientMessage::FindMatch {
                game_id: GameId::from("chess"),
            },
        );
        lobby.dispatch(
            b,
            ClientMessage::CreateRoom {
                game_id: GameId::from("go"),
            },
        );

        assert!(lobby.is_engaged(a));
        assert!(lobby.is_engaged(b));
    }
}
