//! Connection loss: tell the survivor, close the room, empty the slot.

use pairlink_protocol::ServerMessage;
use pairlink_session::ConnectionId;

use super::Lobby;

impl Lobby {
    /// Cleans up after `conn`'s transport closed.
    ///
    /// Runs once per connection, as the last event for it. The room check
    /// and the queue check are independent and both always run. Calling it
    /// for an id that is already gone does nothing.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        if let Some(code) = self.registry.room_of(conn).cloned() {
            let survivor = self.rooms.get(&code).and_then(|room| room.opponent_of(conn));
            if let Some(survivor) = survivor {
                if self
                    .registry
                    .send(survivor, ServerMessage::OpponentDisconnected)
                {
                    tracing::info!(
                        conn_id = %survivor,
                        room_id = %code,
                        "notified opponent of disconnect"
                    );
                } else {
                    tracing::debug!(
                        conn_id = %survivor,
                        room_id = %code,
                        "survivor already closed"
                    );
                }
            }

            // Closing an AwaitingOpponent room is just as unconditional.
            if let Some(room) = self.rooms.close_room(&code) {
                for participant in room.participants() {
                    let _ = self.registry.clear_association(participant.conn);
                }
            }
        }

        for game_id in self.queue.remove_connection(conn) {
            tracing::info!(conn_id = %conn, %game_id, "removed from matchmaking");
        }

        if self.registry.unregister(conn).is_some() {
            tracing::info!(conn_id = %conn, "connection left lobby");
        }
    }
}
