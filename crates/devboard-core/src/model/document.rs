//! The persisted board state and its structural invariants.

use super::{Board, BoardId, Connector, ConnectorId, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Full persisted state: boards, the active board, items and connectors.
///
/// Items and connectors live in shared vectors that are cloned on first
/// write, so taking a history snapshot costs two reference count bumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub active_board_id: BoardId,
    #[serde(default)]
    pub items: Arc<Vec<Item>>,
    #[serde(default)]
    pub connectors: Arc<Vec<Connector>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding a single default board.
    pub fn new() -> Self {
        let board = Board::default_board();
        Self {
            active_board_id: board.id,
            boards: vec![board],
            items: Arc::default(),
            connectors: Arc::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    // --- boards ---

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn board_mut(&mut self, id: BoardId) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == id)
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.board(self.active_board_id)
    }

    /// Remove a board together with its items and every connector touching them.
    ///
    /// If no board remains a default board is created and activated. If the
    /// active board was removed the first remaining board becomes active.
    pub fn remove_board(&mut self, id: BoardId) -> Option<Board> {
        let index = self.boards.iter().position(|b| b.id == id)?;
        let board = self.boards.remove(index);
        self.retain_items(|item| item.board_id != id);
        self.ensure_board();
        if self.active_board_id == id {
            self.active_board_id = self.boards[0].id;
        }
        Some(board)
    }

    /// Make sure at least one board exists. Returns true if one was created.
    pub fn ensure_board(&mut self) -> bool {
        if !self.boards.is_empty() {
            return false;
        }
        let board = Board::default_board();
        self.active_board_id = board.id;
        self.boards.push(board);
        true
    }

    // --- items ---

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.item(id).is_some()
    }

    /// Mutable access to one item, cloning the shared vector if needed.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        if !self.contains_item(id) {
            return None;
        }
        Arc::make_mut(&mut self.items).iter_mut().find(|i| i.id == id)
    }

    /// Items of the given board, in insertion order.
    pub fn items_on(&self, board_id: BoardId) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.board_id == board_id)
    }

    /// Items of the active board, in insertion order.
    pub fn board_items(&self) -> impl Iterator<Item = &Item> {
        self.items_on(self.active_board_id)
    }

    pub fn push_item(&mut self, item: Item) {
        Arc::make_mut(&mut self.items).push(item);
    }

    /// Remove one item and cascade its connectors.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|i| i.id == id)?;
        let item = Arc::make_mut(&mut self.items).remove(index);
        self.retain_connectors(|c| !c.touches(id));
        Some(item)
    }

    /// Keep only items matching `keep`, cascading connectors of removed ones.
    /// Returns the number of items removed.
    pub fn retain_items(&mut self, mut keep: impl FnMut(&Item) -> bool) -> usize {
        let removed: HashSet<ItemId> = self
            .items
            .iter()
            .filter(|i| !keep(*i))
            .map(|i| i.id)
            .collect();
        if removed.is_empty() {
            return 0;
        }
        Arc::make_mut(&mut self.items).retain(|i| !removed.contains(&i.id));
        self.retain_connectors(|c| !removed.contains(&c.from_id) && !removed.contains(&c.to_id));
        removed.len()
    }

    /// Highest stacking value over all items, never below `floor`.
    pub fn max_stacking(&self, floor: f64) -> f64 {
        self.items
            .iter()
            .map(Item::stacking)
            .fold(floor, f64::max)
    }

    // --- connectors ---

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connector(id)?;
        Arc::make_mut(&mut self.connectors)
            .iter_mut()
            .find(|c| c.id == id)
    }

    pub fn has_connector_between(&self, a: ItemId, b: ItemId) -> bool {
        self.connectors.iter().any(|c| c.joins(a, b))
    }

    /// Connectors whose endpoints both lie on the given board.
    pub fn connectors_on(&self, board_id: BoardId) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().filter(move |c| {
            let on_board = |id| self.item(id).is_some_and(|i| i.board_id == board_id);
            on_board(c.from_id) && on_board(c.to_id)
        })
    }

    /// Whether `connector` may be added without breaking an invariant.
    pub fn accepts_connector(&self, connector: &Connector) -> bool {
        !connector.is_self_loop()
            && self.contains_item(connector.from_id)
            && self.contains_item(connector.to_id)
            && !self.has_connector_between(connector.from_id, connector.to_id)
    }

    /// Add a connector. Self-loops, dangling endpoints and duplicates of an
    /// existing pair are refused.
    pub fn add_connector(&mut self, connector: Connector) -> bool {
        if !self.accepts_connector(&connector) {
            return false;
        }
        Arc::make_mut(&mut self.connectors).push(connector);
        true
    }

    pub fn remove_connector(&mut self, id: ConnectorId) -> Option<Connector> {
        let index = self.connectors.iter().position(|c| c.id == id)?;
        Some(Arc::make_mut(&mut self.connectors).remove(index))
    }

    fn retain_connectors(&mut self, keep: impl Fn(&Connector) -> bool) {
        if self.connectors.iter().all(&keep) {
            return;
        }
        Arc::make_mut(&mut self.connectors).retain(keep);
    }

    // --- loading ---

    /// Bring a loaded document back in line with its invariants.
    ///
    /// Returns a description of every repair made, empty if none were needed.
    pub fn repair(&mut self) -> Vec<String> {
        let mut repairs = Vec::new();

        if self.ensure_board() {
            repairs.push("no boards, created a default board".to_string());
        }
        if self.active_board().is_none() {
            self.active_board_id = self.boards[0].id;
            repairs.push("active board missing, activated the first board".to_string());
        }

        let boards: HashSet<BoardId> = self.boards.iter().map(|b| b.id).collect();
        let orphans = self.retain_items(|item| boards.contains(&item.board_id));
        if orphans > 0 {
            repairs.push(format!("dropped {orphans} items without a board"));
        }

        if self.items.iter().any(|i| !(i.width > 0.0 && i.height > 0.0)) {
            for item in Arc::make_mut(&mut self.items) {
                item.normalize_size();
            }
            repairs.push("filled in missing item sizes".to_string());
        }

        let before = self.connectors.len();
        let mut kept: Vec<Connector> = Vec::with_capacity(before);
        for connector in self.connectors.iter() {
            let valid = !connector.is_self_loop()
                && self.contains_item(connector.from_id)
                && self.contains_item(connector.to_id)
                && !kept.iter().any(|k| k.joins(connector.from_id, connector.to_id));
            if valid {
                kept.push(connector.clone());
            }
        }
        if kept.len() != before {
            repairs.push(format!("dropped {} invalid connectors", before - kept.len()));
            self.connectors = Arc::new(kept);
        }

        repairs
    }
}
