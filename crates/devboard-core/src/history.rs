//! Snapshot based undo/redo.

use crate::model::{Connector, Document, Item};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of undo (and redo) states kept.
pub const MAX_UNDO_HISTORY: usize = 40;

/// Items and connectors at a point in time.
///
/// Selection, boards and camera are not part of a snapshot, so undo never
/// restores focus.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub items: Arc<Vec<Item>>,
    pub connectors: Arc<Vec<Connector>>,
}

impl Snapshot {
    /// Capture the collections of `document` without copying them.
    pub fn of(document: &Document) -> Self {
        Self {
            items: Arc::clone(&document.items),
            connectors: Arc::clone(&document.connectors),
        }
    }

    /// Write this snapshot back into `document`.
    pub fn restore(self, document: &mut Document) {
        document.items = self.items;
        document.connectors = self.connectors;
    }
}

/// Two bounded stacks of snapshots with linear history semantics.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            past: VecDeque::with_capacity(capacity),
            future: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record the pre-mutation state. Clears the redo stack.
    pub fn checkpoint(&mut self, current: &Document) {
        push_bounded(&mut self.past, Snapshot::of(current), self.capacity);
        self.future.clear();
    }

    /// Restore the last checkpoint into `current`.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, current: &mut Document) -> bool {
        let Some(snapshot) = self.past.pop_back() else {
            return false;
        };
        push_bounded(&mut self.future, Snapshot::of(current), self.capacity);
        snapshot.restore(current);
        true
    }

    /// Re-apply the most recently undone state.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, current: &mut Document) -> bool {
        let Some(snapshot) = self.future.pop_back() else {
            return false;
        };
        push_bounded(&mut self.past, Snapshot::of(current), self.capacity);
        snapshot.restore(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// Push onto the back, dropping the oldest entry once over capacity.
fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, capacity: usize) {
    stack.push_back(snapshot);
    while stack.len() > capacity {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, ItemPayload};

    fn add_note(doc: &mut Document) {
        let board = doc.active_board_id;
        doc.push_item(Item::new(board, ItemPayload::default_for(ItemKind::Note)));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut doc = Document::new();
        let mut history = History::default();

        history.checkpoint(&doc);
        add_note(&mut doc);
        let after = doc.clone();

        assert!(history.undo(&mut doc));
        assert!(doc.items.is_empty());
        assert!(history.redo(&mut doc));
        assert_eq!(doc, after);
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut doc = Document::new();
        let mut history = History::default();
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_checkpoint_clears_future() {
        let mut doc = Document::new();
        let mut history = History::default();
        history.checkpoint(&doc);
        add_note(&mut doc);
        history.undo(&mut doc);
        assert!(history.can_redo());

        history.checkpoint(&doc);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut doc = Document::new();
        let mut history = History::new(3);
        for _ in 0..5 {
            history.checkpoint(&doc);
            add_note(&mut doc);
        }
        assert_eq!(history.undo_depth(), 3);
        while history.undo(&mut doc) {}
        // the two oldest checkpoints were discarded
        assert_eq!(doc.items.len(), 2);
    }
}
