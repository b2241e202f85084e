use crate::error::HistoryError;
use crate::stroke::{Stroke, StrokeRef};
use std::sync::Arc;

/// Ordered timeline of committed strokes with an undo/redo cursor.
///
/// `entries[..=cursor]` is what is visible; anything after the cursor is the
/// redo tail. A `None` cursor means nothing is visible.
///
/// Not meant for concurrent mutation: one board owns one engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEngine {
    entries: Vec<StrokeRef>,
    cursor: Option<usize>,
}

impl HistoryEngine {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an engine from already validated parts.
    ///
    /// Returns `None` if `cursor` points past the last entry.
    pub(crate) fn from_parts(entries: Vec<StrokeRef>, cursor: Option<usize>) -> Option<Self> {
        match cursor {
            Some(index) if index >= entries.len() => None,
            _ => Some(Self { entries, cursor }),
        }
    }

    /// Appends a stroke after dropping the redo tail, and makes it visible
    pub fn commit(&mut self, stroke: Stroke) -> StrokeRef {
        let stroke = Arc::new(stroke);
        self.entries.truncate(self.visible_len());
        self.entries.push(Arc::clone(&stroke));
        self.cursor = Some(self.entries.len() - 1);
        stroke
    }

    /// Hides the most recently visible stroke
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        match self.cursor {
            None => Err(HistoryError::NothingToUndo),
            Some(0) => {
                self.cursor = None;
                Ok(())
            }
            Some(index) => {
                self.cursor = Some(index - 1);
                Ok(())
            }
        }
    }

    /// Shows the next stroke of the redo tail
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor = Some(self.visible_len());
        Ok(())
    }

    /// Drops every entry. Not undoable.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// The strokes currently on the canvas, oldest first
    pub fn visible_strokes(&self) -> &[StrokeRef] {
        &self.entries[..self.visible_len()]
    }

    /// Every entry including the redo tail
    pub fn entries(&self) -> &[StrokeRef] {
        &self.entries
    }

    /// Index of the last visible entry
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The cursor as a signed index, `-1` when nothing is visible
    pub fn cursor_index(&self) -> i64 {
        self.cursor.map_or(-1, |index| index as i64)
    }

    /// Returns true if there are strokes that can be undone
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// Returns true if there are strokes that can be redone
    pub fn can_redo(&self) -> bool {
        self.visible_len() < self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn visible_len(&self) -> usize {
        self.cursor.map_or(0, |index| index + 1)
    }
}
