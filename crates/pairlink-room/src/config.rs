//! Room configuration and lifecycle state machine.

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for the room manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    /// How many random codes to try before giving up on creating a room.
    ///
    /// With 36^6 possible codes a collision is rare, but the loop still
    /// needs a ceiling. Values below 1 are treated as 1.
    pub code_attempts: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { code_attempts: 32 }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// Transitions are strictly ordered, with no skipping back:
///
/// ```text
/// AwaitingOpponent → Active → Closed
///        └─────────────────────↗
/// ```
///
/// - **AwaitingOpponent**: created by `createRoom`, one participant,
///   waiting for someone to join with the code.
/// - **Active**: two participants with distinct sides; moves are relayed.
///   Matchmaking creates rooms directly in this phase.
/// - **Closed**: a participant disconnected. A closed room is removed
///   from the manager immediately; only the record handed back by
///   `RoomManager::close_room` is ever seen in this phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    AwaitingOpponent,
    Active,
    Closed,
}

impl RoomPhase {
    /// Returns `true` if a second participant may be admitted.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::AwaitingOpponent)
    }

    /// Returns `true` if moves are being relayed.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::AwaitingOpponent, Self::Active)
                | (Self::AwaitingOpponent, Self::Closed)
                | (Self::Active, Self::Closed)
        )
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingOpponent => write!(f, "AwaitingOpponent"),
            Self::Active => write!(f, "Active"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}
