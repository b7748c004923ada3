//! `move`: forward a payload to the sender's one opponent.

use pairlink_protocol::ServerMessage;
use pairlink_session::ConnectionId;
use serde_json::Value;

use super::Lobby;

impl Lobby {
    /// Forwards `payload` verbatim to `conn`'s opponent.
    ///
    /// Dropped without any reply when `conn` has no room, the room has no
    /// second participant yet, or the opponent's transport has closed.
    pub(super) fn relay_move(&mut self, conn: ConnectionId, payload: Value) {
        let Some(code) = self.registry.room_of(conn).cloned() else {
            tracing::debug!(conn_id = %conn, "move from unpaired connection dropped");
            return;
        };

        let Some(room) = self.rooms.get(&code) else {
            tracing::warn!(conn_id = %conn, room_id = %code, "association points at a closed room");
            let _ = self.registry.clear_association(conn);
            return;
        };

        let Some(opponent) = room.opponent_of(conn) else {
            tracing::debug!(
                conn_id = %conn,
                room_id = %code,
                "move before opponent joined dropped"
            );
            return;
        };

        if !self
            .registry
            .send(opponent, ServerMessage::OpponentMove { payload })
        {
            tracing::debug!(
                conn_id = %conn,
                %opponent,
                room_id = %code,
                "opponent not live, move dropped"
            );
        }
    }
}
