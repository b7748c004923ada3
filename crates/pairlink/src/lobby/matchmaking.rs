//! `findMatch`: pair the next two seekers of the same game.

use pairlink_protocol::{GameId, ServerMessage, Side};
use pairlink_room::RoomError;
use pairlink_session::ConnectionId;

use super::Lobby;

impl Lobby {
    /// Pairs `conn` with whoever is waiting for `game_id`, or parks it.
    ///
    /// The earlier seeker always plays [`Side::First`]. The waiting slot is
    /// emptied before either side hears about the match.
    pub(super) fn find_match(&mut self, conn: ConnectionId, game_id: GameId) {
        if self.is_engaged(conn) {
            return self.reject(conn, RoomError::AlreadySeated(conn));
        }

        let Some(first) = self.take_live_seeker(&game_id) else {
            self.queue.wait(game_id.clone(), conn);
            tracing::info!(conn_id = %conn, %game_id, "waiting for match");
            self.registry.send(conn, ServerMessage::WaitingForMatch);
            return;
        };

        let code = match self.rooms.create_paired(first, conn, game_id.clone()) {
            Ok(code) => code,
            Err(e) => {
                // Put the earlier seeker back where it was.
                self.queue.wait(game_id, first);
                return self.reject(conn, e);
            }
        };

        self.seat(first, &code);
        self.seat(conn, &code);
        tracing::info!(room_id = %code, %game_id, %first, second = %conn, "match found");

        for (who, side) in [(first, Side::First), (conn, Side::Second)] {
            self.registry.send(
                who,
                ServerMessage::MatchFound {
                    game_id: game_id.clone(),
                    payload: side.payload(),
                },
            );
        }
    }

    /// Empties the slot for `game_id` and returns its occupant, unless the
    /// occupant's transport already closed.
    ///
    /// A closed seeker has a disconnect on its way; pairing with it would
    /// only open a room that dies straight away.
    fn take_live_seeker(&mut self, game_id: &GameId) -> Option<ConnectionId> {
        let waiting = self.queue.take(game_id)?;
        if self.registry.is_live(waiting) {
            return Some(waiting);
        }
        tracing::debug!(conn_id = %waiting, %game_id, "discarding closed seeker");
        None
    }
}
