use crate::stroke::StrokeKind;

/// Notifications emitted by a board after each transition.
///
/// Cursor values use the persisted convention: `-1` means nothing visible.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    SessionStarted { kind: StrokeKind },
    SessionUpdated,
    /// A stroke was committed; `truncated` redo entries were discarded
    StrokeCommitted { cursor: i64, truncated: usize },
    /// The in-progress stroke was dropped without touching history
    SessionAbandoned,
    /// The pointer left the canvas mid-stroke
    SessionInterrupted { committed: bool },
    Undone { cursor: i64 },
    Redone { cursor: i64 },
    Cleared,
    /// History was replaced from persisted data
    Loaded { cursor: i64 },
}

impl BoardEvent {
    /// Whether the event changed committed history, and so needs persisting
    pub fn changes_history(&self) -> bool {
        match self {
            BoardEvent::StrokeCommitted { .. }
            | BoardEvent::Undone { .. }
            | BoardEvent::Redone { .. }
            | BoardEvent::Cleared => true,
            BoardEvent::SessionInterrupted { committed } => *committed,
            BoardEvent::SessionStarted { .. }
            | BoardEvent::SessionUpdated
            | BoardEvent::SessionAbandoned
            | BoardEvent::Loaded { .. } => false,
        }
    }
}
