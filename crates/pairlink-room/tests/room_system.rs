//! Integration tests for the room manager and match queue together.

use pairlink_protocol::{GameId, RoomCode, Side};
use pairlink_room::{MatchQueue, RoomError, RoomManager, RoomPhase};
use pairlink_session::ConnectionId;

// =========================================================================
// Helpers
// =========================================================================

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn chess() -> GameId {
    GameId::from("chess")
}

fn manager() -> RoomManager {
    RoomManager::default()
}

// =========================================================================
// RoomManager tests
// =========================================================================

#[test]
fn test_create_room_returns_unique_codes() {
    let mut mgr = manager();
    let r1 = mgr.create_room(conn(1), chess()).unwrap();
    let r2 = mgr.create_room(conn(2), chess()).unwrap();
    assert_ne!(r1, r2);
    assert_eq!(mgr.room_count(), 2);
}

#[test]
fn test_create_room_awaits_opponent() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();

    let room = mgr.get(&code).expect("room should exist");
    assert_eq!(room.phase(), RoomPhase::AwaitingOpponent);
    assert_eq!(room.game_id(), &chess());
    assert_eq!(room.participants().len(), 1);
    assert!(room.contains(conn(1)));
}

#[test]
fn test_join_room_success_activates_with_opposite_sides() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();

    let admission = mgr.join_room(conn(2), &chess(), &code).unwrap();

    assert_eq!(admission.code, code);
    assert_eq!(admission.creator, conn(1));
    assert_ne!(admission.creator_side, admission.joiner_side);

    let room = mgr.get(&code).unwrap();
    assert_eq!(room.phase(), RoomPhase::Active);
    assert_eq!(room.side_of(conn(1)), Some(admission.creator_side));
    assert_eq!(room.side_of(conn(2)), Some(admission.joiner_side));
}

#[test]
fn test_join_room_accepts_lowercase_code() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();
    let typed = RoomCode::from(code.as_str().to_ascii_lowercase());

    assert!(mgr.join_room(conn(2), &chess(), &typed).is_ok());
}

#[test]
fn test_join_room_not_found_creates_nothing() {
    let mut mgr = manager();
    let result = mgr.join_room(conn(1), &chess(), &RoomCode::from("NOPE00"));

    assert!(matches!(result, Err(RoomError::NotFound(_))));
    assert_eq!(mgr.room_count(), 0);
}

#[test]
fn test_join_room_full_leaves_participants_untouched() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();
    mgr.join_room(conn(2), &chess(), &code).unwrap();
    let before = mgr.get(&code).unwrap().participants().to_vec();

    let result = mgr.join_room(conn(3), &chess(), &code);

    assert!(matches!(result, Err(RoomError::RoomFull(_))));
    assert_eq!(mgr.get(&code).unwrap().participants(), before.as_slice());
}

#[test]
fn test_join_room_game_mismatch() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();

    let result = mgr.join_room(conn(2), &GameId::from("tictactoe"), &code);

    match result {
        Err(RoomError::GameMismatch {
            expected,
            requested,
            ..
        }) => {
            assert_eq!(expected, chess());
            assert_eq!(requested, GameId::from("tictactoe"));
        }
        other => panic!("expected GameMismatch, got {other:?}"),
    }
    let room = mgr.get(&code).unwrap();
    assert_eq!(room.phase(), RoomPhase::AwaitingOpponent);
    assert_eq!(room.participants().len(), 1);
}

#[test]
fn test_join_room_mismatch_reported_before_full() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();
    mgr.join_room(conn(2), &chess(), &code).unwrap();

    let result = mgr.join_room(conn(3), &GameId::from("go"), &code);
    assert!(matches!(result, Err(RoomError::GameMismatch { .. })));
}

#[test]
fn test_create_paired_is_active_in_arrival_order() {
    let mut mgr = manager();
    let code = mgr.create_paired(conn(1), conn(2), chess()).unwrap();

    let room = mgr.get(&code).unwrap();
    assert_eq!(room.phase(), RoomPhase::Active);
    assert_eq!(room.side_of(conn(1)), Some(Side::First));
    assert_eq!(room.side_of(conn(2)), Some(Side::Second));
}

#[test]
fn test_close_room_removes_and_marks_closed() {
    let mut mgr = manager();
    let code = mgr.create_paired(conn(1), conn(2), chess()).unwrap();

    let closed = mgr.close_room(&code).expect("room should be returned");

    assert_eq!(closed.phase(), RoomPhase::Closed);
    assert!(!mgr.contains(&code));
    assert_eq!(mgr.room_count(), 0);
}

#[test]
fn test_close_room_is_idempotent() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();

    assert!(mgr.close_room(&code).is_some());
    assert!(mgr.close_room(&code).is_none());
}

#[test]
fn test_room_codes_lists_open_rooms() {
    let mut mgr = manager();
    let r1 = mgr.create_room(conn(1), chess()).unwrap();
    let r2 = mgr.create_room(conn(2), chess()).unwrap();
    mgr.close_room(&r1);

    assert_eq!(mgr.room_codes(), vec![r2]);
}

#[test]
fn test_no_room_ever_exceeds_two_participants() {
    let mut mgr = manager();
    let code = mgr.create_room(conn(1), chess()).unwrap();

    for joiner in 2..10 {
        let _ = mgr.join_room(conn(joiner), &chess(), &code);
        assert!(mgr.get(&code).unwrap().participants().len() <= 2);
    }
}

// =========================================================================
// Queue + manager: the matchmaking flow the lobby drives
// =========================================================================

#[test]
fn test_queue_pairs_first_two_seekers() {
    let mut queue = MatchQueue::new();
    let mut mgr = manager();

    // A arrives: nobody waiting, so A parks.
    assert_eq!(queue.take(&chess()), None);
    queue.wait(chess(), conn(1));

    // B arrives: A is consumed and paired ahead of B.
    let first = queue.take(&chess()).expect("A should be waiting");
    let code = mgr.create_paired(first, conn(2), chess()).unwrap();

    assert!(queue.is_empty());
    assert_eq!(mgr.get(&code).unwrap().side_of(conn(1)), Some(Side::First));
}
