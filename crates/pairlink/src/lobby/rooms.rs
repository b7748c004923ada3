//! `createRoom` and `joinRoom`: pairing by shared code.

use pairlink_protocol::{GameId, RoomCode, ServerMessage};
use pairlink_room::RoomError;
use pairlink_session::ConnectionId;

use super::Lobby;

impl Lobby {
    pub(super) fn create_room(&mut self, conn: ConnectionId, game_id: GameId) {
        if self.is_engaged(conn) {
            return self.reject(conn, RoomError::AlreadySeated(conn));
        }

        match self.rooms.create_room(conn, game_id) {
            Ok(room_id) => {
                self.seat(conn, &room_id);
                self.registry
                    .send(conn, ServerMessage::RoomCreated { room_id });
            }
            Err(e) => self.reject(conn, e),
        }
    }

    /// Seats `conn` in room `code`; both players get `startGame` with
    /// their side. Any failure leaves the room as it was and answers
    /// `conn` alone with an `error`.
    pub(super) fn join_room(&mut self, conn: ConnectionId, game_id: GameId, code: RoomCode) {
        if self.is_engaged(conn) {
            return self.reject(conn, RoomError::AlreadySeated(conn));
        }

        let admission = match self.rooms.join_room(conn, &game_id, &code) {
            Ok(admission) => admission,
            Err(e) => return self.reject(conn, e),
        };

        self.seat(conn, &admission.code);

        for (who, side) in [
            (admission.creator, admission.creator_side),
            (conn, admission.joiner_side),
        ] {
            self.registry.send(
                who,
                ServerMessage::StartGame {
                    game_id: admission.game_id.clone(),
                    payload: side.payload(),
                },
            );
        }
    }
}
