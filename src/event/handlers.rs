use std::cell::Cell;
use std::rc::Rc;

use crate::event::{BoardEvent, EventHandler};

/// Raises a shared flag whenever committed history changes.
///
/// The shell keeps the other half and flushes persisted state when it is set.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag {
    dirty: Rc<Cell<bool>>,
}

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Returns the current state and resets it
    pub fn take(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl EventHandler for DirtyFlag {
    fn handle_event(&mut self, event: &BoardEvent) {
        if event.changes_history() {
            self.dirty.set(true);
        }
    }
}
