//! Matchmaking queue: at most one waiting connection per game.

use std::collections::HashMap;

use pairlink_protocol::GameId;
use pairlink_session::ConnectionId;

/// One waiting slot per game id.
///
/// A second seeker for the same game never queues behind the first; the
/// lobby [`take`](Self::take)s the waiting entry and pairs them instead.
/// So "the queue" is really a map of single slots.
#[derive(Debug, Default)]
pub struct MatchQueue {
    waiting: HashMap<GameId, ConnectionId>,
}

impl MatchQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns who is waiting for `game_id`, without removing them.
    pub fn waiting_for(&self, game_id: &GameId) -> Option<ConnectionId> {
        self.waiting.get(game_id).copied()
    }

    /// Removes and returns the connection waiting for `game_id`.
    pub fn take(&mut self, game_id: &GameId) -> Option<ConnectionId> {
        self.waiting.remove(game_id)
    }

    /// Puts `conn` in the slot for `game_id`.
    ///
    /// Returns whoever was already waiting there, which callers treat as a
    /// bug: the slot must be taken before a new seeker is parked.
    pub fn wait(&mut self, game_id: GameId, conn: ConnectionId) -> Option<ConnectionId> {
        self.waiting.insert(game_id, conn)
    }

    /// Removes `conn` from every slot it occupies and returns the game ids
    /// it was waiting for.
    ///
    /// A connection normally waits in at most one slot, but disconnect
    /// cleanup sweeps them all rather than rely on that.
    pub fn remove_connection(&mut self, conn: ConnectionId) -> Vec<GameId> {
        let games: Vec<GameId> = self
            .waiting
            .iter()
            .filter(|(_, waiting)| **waiting == conn)
            .map(|(game, _)| game.clone())
            .collect();
        for game in &games {
            self.waiting.remove(game);
        }
        games
    }

    /// Returns `true` if `conn` is waiting for any game.
    pub fn is_waiting(&self, conn: ConnectionId) -> bool {
        self.waiting.values().any(|c| *c == conn)
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Returns `true` if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn chess() -> GameId {
        GameId::from("chess")
    }

    #[test]
    fn test_wait_then_take_empties_slot() {
        let mut queue = MatchQueue::new();
        assert_eq!(queue.wait(chess(), conn(1)), None);

        assert_eq!(queue.take(&chess()), Some(conn(1)));
        assert_eq!(queue.waiting_for(&chess()), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_take_empty_slot_is_none() {
        let mut queue = MatchQueue::new();
        assert_eq!(queue.take(&chess()), None);
    }

    #[test]
    fn test_games_have_independent_slots() {
        let mut queue = MatchQueue::new();
        queue.wait(chess(), conn(1));
        queue.wait(GameId::from("tictactoe"), conn(2));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(&chess()), Some(conn(1)));
        assert_eq!(queue.waiting_for(&GameId::from("tictactoe")), Some(conn(2)));
    }

    #[test]
    fn test_remove_connection_clears_every_slot_it_holds() {
        let mut queue = MatchQueue::new();
        queue.wait(chess(), conn(1));
        queue.wait(GameId::from("go"), conn(1));
        queue.wait(GameId::from("tictactoe"), conn(2));

        let mut removed = queue.remove_connection(conn(1));
        removed.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        assert_eq!(removed, vec![chess(), GameId::from("go")]);
        assert!(!queue.is_waiting(conn(1)));
        assert!(queue.is_waiting(conn(2)));
    }

    #[test]
    fn test_remove_connection_not_waiting_is_noop() {
        let mut queue = MatchQueue::new();
        queue.wait(chess(), conn(1));

        assert!(queue.remove_connection(conn(9)).is_empty());
        assert_eq!(queue.len(), 1);
    }
}
