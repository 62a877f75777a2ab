//! The board interaction engine.
//!
//! [`Engine`] owns the persisted [`Document`], the undo history, the camera
//! and all transient interaction state. It is the only sanctioned way to
//! change boards, items and connectors: every call that changes items or
//! connectors records exactly one history checkpoint before applying, and
//! calls naming unknown ids are silent no-ops.

use crate::camera::{Camera, Viewport};
use crate::config::EngineConfig;
use crate::events::{EngineEvent, Observers, SubscriptionId};
use crate::exchange::{self, ExchangeError, ExportBundle, ImportDocument, ImportSummary};
use crate::factory::ItemFactory;
use crate::history::History;
use crate::input::{Gesture, MouseButton, PointerEvent};
use crate::linking::{ConnectOutcome, ConnectorState, Finish};
use crate::model::{
    Board, BoardId, BoardTheme, Connector, ConnectorId, ConnectorPatch, Document, EntryId, Item,
    ItemId, ItemKind, ItemPatch, ItemPayload, ListEntry, TaskEntry,
};
use crate::search;
use chrono::{DateTime, Utc};
use kurbo::Point;
use log::{debug, info, warn};
use std::collections::HashSet;
use uuid::Uuid;

/// Interactive board editor state.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    document: Document,
    history: History,
    camera: Camera,
    viewport: Viewport,
    factory: ItemFactory,
    selected: Option<ItemId>,
    selected_connector: Option<ConnectorId>,
    hovered: Option<ItemId>,
    linking: ConnectorState,
    gesture: Gesture,
    /// Boards removed by `delete_board`, kept so undo can bring them back.
    retired_boards: Vec<Board>,
    revision: u64,
    observers: Observers,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine over a fresh document with one default board.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    /// Create an engine over a loaded document, repairing broken invariants.
    pub fn from_document(mut document: Document, config: EngineConfig) -> Self {
        for repair in document.repair() {
            warn!("Repaired loaded document: {}", repair);
        }
        Self::with_document(document, config)
    }

    fn with_document(document: Document, config: EngineConfig) -> Self {
        Self {
            history: History::new(config.history_capacity),
            camera: Camera::from_config(&config),
            factory: ItemFactory::new(&config),
            viewport: Viewport::default(),
            config,
            document,
            selected: None,
            selected_connector: None,
            hovered: None,
            linking: ConnectorState::Idle,
            gesture: Gesture::Idle,
            retired_boards: Vec::new(),
            revision: 0,
            observers: Observers::default(),
        }
    }

    // --- reading ---

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The persisted state.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Give up the engine and keep the persisted state.
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.document.active_board()
    }

    pub fn active_board_id(&self) -> BoardId {
        self.document.active_board_id
    }

    /// Items on the active board, in insertion order.
    pub fn board_items(&self) -> impl Iterator<Item = &Item> {
        self.document.board_items()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.document.item(id)
    }

    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn selected_connector_id(&self) -> Option<ConnectorId> {
        self.selected_connector
    }

    pub fn hovered_id(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Whether the connector gesture is armed.
    pub fn connector_mode(&self) -> bool {
        self.linking.is_armed()
    }

    pub fn connector_source_id(&self) -> Option<ItemId> {
        self.linking.source()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Document revision, bumped on every change to persisted state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Items on the active board matching `query`.
    pub fn search(&self, query: &str, kind: Option<ItemKind>) -> Vec<&Item> {
        search::search(&self.document, query, kind)
    }

    // --- subscriptions ---

    /// Register an observer. It runs synchronously after each change.
    pub fn subscribe(&mut self, callback: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: EngineEvent) {
        self.observers.emit(&event);
    }

    fn document_changed(&mut self) {
        self.revision += 1;
        self.emit(EngineEvent::DocumentChanged {
            revision: self.revision,
        });
    }

    fn checkpoint(&mut self) {
        self.history.checkpoint(&self.document);
    }

    // --- item creation ---

    /// Add a new item of `kind` to the active board.
    pub fn add_item(&mut self, kind: ItemKind) -> ItemId {
        let item = self.factory.create(kind, self.document.active_board_id);
        self.push_new_item(item)
    }

    pub fn add_note(&mut self, text: impl Into<String>) -> ItemId {
        let item = self.factory.note(text, self.document.active_board_id);
        self.push_new_item(item)
    }

    /// Add an item built from `payload` at a fresh spawn spot.
    pub fn add_payload(&mut self, payload: ItemPayload) -> ItemId {
        let item = self.factory.create_with(payload, self.document.active_board_id);
        self.push_new_item(item)
    }

    /// Add a photo showing an already resolved image handle.
    pub fn add_photo(&mut self, image_url: impl Into<String>, caption: impl Into<String>) -> ItemId {
        let item = self
            .factory
            .photo(image_url, caption, self.document.active_board_id);
        self.push_new_item(item)
    }

    /// Add a fully built item to the active board.
    ///
    /// The id is replaced if it collides with an existing item.
    pub fn insert_item(&mut self, mut item: Item) -> ItemId {
        if self.document.contains_item(item.id) {
            item.id = Uuid::new_v4();
        }
        item.board_id = self.document.active_board_id;
        item.normalize_size();
        let spot = self.config.bounds().clamp(item.planar());
        item.set_planar(spot);
        self.push_new_item(item)
    }

    fn push_new_item(&mut self, item: Item) -> ItemId {
        let id = item.id;
        debug!("Adding {} item {}", item.kind(), id);
        self.checkpoint();
        self.document.push_item(item);
        self.document_changed();
        id
    }

    // --- item edits ---

    /// Replace one item with the result of `edit`, checkpointing once.
    ///
    /// `edit` returns `None` to refuse; an unchanged result is a no-op.
    fn edit_item(&mut self, id: ItemId, edit: impl FnOnce(&Item) -> Option<Item>) -> bool {
        let Some(current) = self.document.item(id) else {
            debug!("Ignoring edit of unknown item {}", id);
            return false;
        };
        let Some(next) = edit(current) else {
            return false;
        };
        if next == *current {
            return false;
        }
        self.checkpoint();
        if let Some(slot) = self.document.item_mut(id) {
            *slot = next;
        }
        self.document_changed();
        true
    }

    /// Merge `patch` onto an item. Invalid patches are refused.
    pub fn update_item(&mut self, id: ItemId, patch: &ItemPatch) -> bool {
        let bounds = self.config.bounds();
        self.edit_item(id, |item| match patch.apply(item) {
            Ok(mut patched) => {
                patched.set_planar(bounds.clamp(patched.planar()));
                Some(patched)
            }
            Err(err) => {
                warn!("Refusing patch for item {}: {}", id, err);
                None
            }
        })
    }

    /// Move an item on the board plane, clamped to the board.
    pub fn move_item(&mut self, id: ItemId, to: Point) -> bool {
        let spot = self.config.bounds().clamp(to);
        self.edit_item(id, |item| {
            let mut moved = item.clone();
            moved.set_planar(spot);
            Some(moved)
        })
    }

    pub fn rotate_item(&mut self, id: ItemId, rotation: [f64; 3]) -> bool {
        self.edit_item(id, |item| {
            let mut rotated = item.clone();
            rotated.rotation = rotation;
            Some(rotated)
        })
    }

    /// Raise an item above every other item.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        let z = self.front_stacking();
        self.edit_item(id, |item| {
            let mut raised = item.clone();
            raised.position[2] = z;
            Some(raised)
        })
    }

    fn front_stacking(&self) -> f64 {
        self.document.max_stacking(self.config.stacking_floor) + self.config.stacking_epsilon
    }

    /// Append a task to a task list or milestone.
    pub fn add_task_entry(&mut self, id: ItemId, text: impl Into<String>) -> Option<EntryId> {
        let entry = TaskEntry::new(text);
        let entry_id = entry.id;
        self.edit_item(id, |item| {
            let mut tasks = item.task_entries()?.to_vec();
            tasks.push(entry);
            let mut next = item.clone();
            next.set_task_entries(tasks);
            Some(next)
        })
        .then_some(entry_id)
    }

    pub fn toggle_task_entry(&mut self, id: ItemId, entry: EntryId) -> bool {
        self.edit_item(id, |item| {
            let mut tasks = item.task_entries()?.to_vec();
            let task = tasks.iter_mut().find(|t| t.id == entry)?;
            task.done = !task.done;
            let mut next = item.clone();
            next.set_task_entries(tasks);
            Some(next)
        })
    }

    pub fn remove_task_entry(&mut self, id: ItemId, entry: EntryId) -> bool {
        self.edit_item(id, |item| {
            let tasks: Vec<TaskEntry> = item
                .task_entries()?
                .iter()
                .filter(|t| t.id != entry)
                .cloned()
                .collect();
            let mut next = item.clone();
            next.set_task_entries(tasks);
            Some(next)
        })
    }

    /// Append an entry to a list card.
    pub fn add_list_entry(&mut self, id: ItemId, text: impl Into<String>) -> Option<EntryId> {
        let entry = ListEntry::new(text);
        let entry_id = entry.id;
        self.edit_item(id, |item| {
            let mut entries = item.list_entries()?.to_vec();
            entries.push(entry);
            let mut next = item.clone();
            next.set_list_entries(entries);
            Some(next)
        })
        .then_some(entry_id)
    }

    pub fn toggle_list_entry(&mut self, id: ItemId, entry: EntryId) -> bool {
        self.edit_item(id, |item| {
            let mut entries = item.list_entries()?.to_vec();
            let found = entries.iter_mut().find(|e| e.id == entry)?;
            found.done = !found.done;
            let mut next = item.clone();
            next.set_list_entries(entries);
            Some(next)
        })
    }

    pub fn remove_list_entry(&mut self, id: ItemId, entry: EntryId) -> bool {
        self.edit_item(id, |item| {
            let entries: Vec<ListEntry> = item
                .list_entries()?
                .iter()
                .filter(|e| e.id != entry)
                .cloned()
                .collect();
            let mut next = item.clone();
            next.set_list_entries(entries);
            Some(next)
        })
    }

    // --- item removal and duplication ---

    /// Remove an item and every connector touching it.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if !self.document.contains_item(id) {
            debug!("Ignoring removal of unknown item {}", id);
            return false;
        }
        self.checkpoint();
        self.document.remove_item(id);
        self.forget_missing();
        self.document_changed();
        true
    }

    /// Remove the selected item, if any.
    pub fn remove_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.remove_item(id),
            None => false,
        }
    }

    /// Clone an item under a fresh id, offset so it does not cover the source.
    /// Connectors are not copied.
    pub fn duplicate_item(&mut self, id: ItemId) -> Option<ItemId> {
        let Some(source) = self.document.item(id) else {
            debug!("Ignoring duplicate of unknown item {}", id);
            return None;
        };
        let mut copy = source.clone();
        copy.id = Uuid::new_v4();
        copy.regenerate_entry_ids();
        let [dx, dy] = self.config.duplicate_offset;
        copy.position[0] += dx;
        copy.position[1] += dy;
        Some(self.push_new_item(copy))
    }

    /// Remove every item on the active board in one step.
    pub fn clear_board(&mut self) -> usize {
        let board = self.document.active_board_id;
        if self.document.items_on(board).next().is_none() {
            return 0;
        }
        self.checkpoint();
        let removed = self.document.retain_items(|item| item.board_id != board);
        self.forget_missing();
        info!("Cleared {} items from board {}", removed, board);
        self.document_changed();
        removed
    }

    // --- connectors ---

    pub fn remove_connector(&mut self, id: ConnectorId) -> bool {
        if self.document.connector(id).is_none() {
            debug!("Ignoring removal of unknown connector {}", id);
            return false;
        }
        self.checkpoint();
        self.document.remove_connector(id);
        if self.selected_connector == Some(id) {
            self.set_selection(self.selected, None);
        }
        self.document_changed();
        true
    }

    /// Change a connector's label, style or color.
    pub fn update_connector(&mut self, id: ConnectorId, patch: &ConnectorPatch) -> bool {
        let Some(next) = self.document.connector(id).and_then(|c| patch.apply(c)) else {
            return false;
        };
        self.checkpoint();
        if let Some(slot) = self.document.connector_mut(id) {
            *slot = next;
        }
        self.document_changed();
        true
    }

    pub fn select_connector(&mut self, id: ConnectorId) -> bool {
        if self.document.connector(id).is_none() {
            return false;
        }
        self.set_selection(None, Some(id));
        true
    }

    /// Arm the connector gesture on `source`.
    pub fn start_connector(&mut self, source: ItemId) -> bool {
        if !self.document.contains_item(source) {
            debug!("Ignoring connector start on unknown item {}", source);
            return false;
        }
        self.linking.start(source);
        self.emit(EngineEvent::ConnectorModeChanged {
            source: Some(source),
        });
        true
    }

    /// Complete the connector gesture on `target`.
    ///
    /// The gesture always ends; a connector is only created for two distinct,
    /// existing items on the same board that are not already connected.
    pub fn finish_connector(&mut self, target: ItemId) -> ConnectOutcome {
        let finish = self.linking.finish(target);
        if finish != Finish::NotArmed {
            self.emit(EngineEvent::ConnectorModeChanged { source: None });
        }
        let (from, to) = match finish {
            Finish::NotArmed => return ConnectOutcome::NotArmed,
            Finish::SelfLoop => return ConnectOutcome::SelfLoop,
            Finish::Connect { from, to } => (from, to),
        };

        let same_board = match (self.document.item(from), self.document.item(to)) {
            (Some(a), Some(b)) => a.board_id == b.board_id,
            _ => false,
        };
        if !same_board {
            debug!("Refusing connector {} -> {}", from, to);
            return ConnectOutcome::UnknownItem;
        }
        if self.document.has_connector_between(from, to) {
            return ConnectOutcome::Duplicate;
        }

        let connector = Connector::new(from, to);
        let id = connector.id;
        self.checkpoint();
        self.document.add_connector(connector);
        self.document_changed();
        ConnectOutcome::Created(id)
    }

    pub fn cancel_connector(&mut self) -> bool {
        let armed = self.linking.cancel();
        if armed {
            self.emit(EngineEvent::ConnectorModeChanged { source: None });
        }
        armed
    }

    // --- boards ---

    /// Create a board and make it active.
    pub fn add_board(&mut self, name: impl Into<String>) -> BoardId {
        let board = Board::new(name);
        let id = board.id;
        info!("Created board {} ({})", board.name, id);
        self.document.boards.push(board);
        self.activate(id);
        self.document_changed();
        id
    }

    pub fn rename_board(&mut self, id: BoardId, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(board) = self.document.board_mut(id) else {
            return false;
        };
        if board.name == name {
            return false;
        }
        board.name = name;
        self.document_changed();
        true
    }

    pub fn set_board_theme(&mut self, id: BoardId, theme: BoardTheme) -> bool {
        let Some(board) = self.document.board_mut(id) else {
            return false;
        };
        if board.theme == theme {
            return false;
        }
        board.theme = theme;
        self.document_changed();
        true
    }

    pub fn switch_board(&mut self, id: BoardId) -> bool {
        if self.document.board(id).is_none() || self.document.active_board_id == id {
            return false;
        }
        self.activate(id);
        self.document_changed();
        true
    }

    /// Delete a board with its items and their connectors.
    ///
    /// Deleting the last board leaves a fresh default board behind.
    pub fn delete_board(&mut self, id: BoardId) -> bool {
        if self.document.board(id).is_none() {
            return false;
        }
        let owns_items = self.document.items_on(id).next().is_some();
        if owns_items {
            self.checkpoint();
        }
        let was_active = self.document.active_board_id == id;
        if let Some(board) = self.document.remove_board(id) {
            info!("Deleted board {} ({})", board.name, id);
            // Older history entries can still hold items on this board.
            self.retired_boards.push(board);
        }
        if was_active {
            let active = self.document.active_board_id;
            self.activate(active);
        } else {
            self.forget_missing();
        }
        self.document_changed();
        true
    }

    fn activate(&mut self, id: BoardId) {
        self.document.active_board_id = id;
        self.gesture = Gesture::Idle;
        self.set_selection(None, None);
        self.cancel_connector();
        self.set_hover(None);
    }

    // --- selection ---

    pub fn select(&mut self, id: ItemId) -> bool {
        if !self.document.contains_item(id) {
            return false;
        }
        self.set_selection(Some(id), None);
        true
    }

    /// Clear selection and cancel the connector gesture.
    pub fn deselect(&mut self) {
        self.set_selection(None, None);
        self.cancel_connector();
    }

    pub fn hover(&mut self, id: Option<ItemId>) {
        let id = id.filter(|id| self.document.contains_item(*id));
        self.set_hover(id);
    }

    fn set_selection(&mut self, item: Option<ItemId>, connector: Option<ConnectorId>) {
        if self.selected == item && self.selected_connector == connector {
            return;
        }
        self.selected = item;
        self.selected_connector = connector;
        self.emit(EngineEvent::SelectionChanged {
            selected: item,
            connector,
        });
    }

    fn set_hover(&mut self, id: Option<ItemId>) {
        if self.hovered == id {
            return;
        }
        self.hovered = id;
        self.emit(EngineEvent::HoverChanged { hovered: id });
    }

    /// Drop transient references to items and connectors that no longer exist.
    fn forget_missing(&mut self) {
        let selected = self.selected.filter(|id| self.document.contains_item(*id));
        let connector = self
            .selected_connector
            .filter(|id| self.document.connector(*id).is_some());
        self.set_selection(selected, connector);
        if let Some(hovered) = self.hovered {
            if !self.document.contains_item(hovered) {
                self.set_hover(None);
            }
        }
        if let Some(source) = self.linking.source() {
            if !self.document.contains_item(source) {
                self.cancel_connector();
            }
        }
        if let Gesture::Dragging { item, .. } = self.gesture {
            if !self.document.contains_item(item) {
                self.gesture = Gesture::Idle;
            }
        }
    }

    // --- history ---

    /// Return to the state before the last checkpointed action.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.document) {
            return false;
        }
        self.after_history_move();
        true
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.document) {
            return false;
        }
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        self.restore_retired_boards();
        self.gesture = Gesture::Idle;
        self.set_selection(None, None);
        self.cancel_connector();
        self.forget_missing();
        self.document_changed();
    }

    /// Bring back deleted boards whose items were restored by undo.
    fn restore_retired_boards(&mut self) {
        let live: HashSet<BoardId> = self.document.boards.iter().map(|b| b.id).collect();
        let wanted: HashSet<BoardId> = self
            .document
            .items
            .iter()
            .map(|i| i.board_id)
            .filter(|id| !live.contains(id))
            .collect();
        if wanted.is_empty() {
            return;
        }
        let (revived, kept): (Vec<Board>, Vec<Board>) = self
            .retired_boards
            .drain(..)
            .partition(|b| wanted.contains(&b.id));
        self.retired_boards = kept;
        for board in revived {
            info!("Restored board {} ({})", board.name, board.id);
            self.document.boards.push(board);
        }
    }

    // --- import / export ---

    /// JSON export of the active board.
    pub fn export_bundle(&self, exported_at: DateTime<Utc>) -> Option<ExportBundle> {
        ExportBundle::of_active_board(&self.document, exported_at)
    }

    pub fn export_markdown(&self, exported_at: DateTime<Utc>) -> String {
        exchange::export_markdown(&self.document, exported_at)
    }

    /// Import items and connectors into the active board as one action.
    ///
    /// The document is parsed completely before anything is applied; a parse
    /// failure leaves the engine untouched.
    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary, ExchangeError> {
        let prepared = ImportDocument::parse(json)?.rebase(self.document.active_board_id);
        let mut summary = ImportSummary {
            items: prepared.items.len(),
            connectors: 0,
            dropped_connectors: prepared.dropped_connectors,
        };
        if prepared.items.is_empty() {
            summary.dropped_connectors += prepared.connectors.len();
            return Ok(summary);
        }

        self.checkpoint();
        let bounds = self.config.bounds();
        for mut item in prepared.items {
            item.set_planar(bounds.clamp(item.planar()));
            self.document.push_item(item);
        }
        for connector in prepared.connectors {
            if self.document.add_connector(connector) {
                summary.connectors += 1;
            } else {
                summary.dropped_connectors += 1;
            }
        }
        info!(
            "Imported {} items and {} connectors ({} dropped)",
            summary.items, summary.connectors, summary.dropped_connectors
        );
        self.document_changed();
        Ok(summary)
    }

    // --- pointer input ---

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Drive the gesture state machine with one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                target,
                position,
                button,
                modifiers,
            } => {
                if !self.gesture.is_idle() {
                    debug!("Ignoring pointer down during {:?}", self.gesture);
                    return;
                }
                let pans =
                    button != MouseButton::Left || self.config.pan_modifier.is_held(&modifiers);
                match target {
                    _ if pans => {
                        debug!("Begin pan");
                        self.gesture = Gesture::Panning { last: position };
                    }
                    Some(id) if !self.document.contains_item(id) => {
                        debug!("Ignoring pointer down on unknown item {}", id);
                    }
                    Some(id) if modifiers.command() => {
                        if self.linking.is_armed() {
                            self.finish_connector(id);
                        } else {
                            self.start_connector(id);
                        }
                    }
                    Some(id) if self.linking.is_armed() => {
                        self.finish_connector(id);
                    }
                    Some(id) => self.begin_drag(id, position),
                    None => self.deselect(),
                }
            }
            PointerEvent::Move { position } => match self.gesture {
                Gesture::Idle => {}
                Gesture::Dragging { item, offset, .. } => {
                    let world = self.camera.screen_to_world(position, self.viewport);
                    let spot = self.config.bounds().clamp(world + offset);
                    self.drag_to(item, spot);
                }
                Gesture::Panning { last } => {
                    self.camera.pan(position - last, self.viewport);
                    self.gesture = Gesture::Panning { last: position };
                    self.emit(EngineEvent::CameraChanged);
                }
            },
            PointerEvent::Up { .. } => {
                if !self.gesture.is_idle() {
                    debug!("End {:?}", self.gesture);
                }
                self.gesture = Gesture::Idle;
            }
            PointerEvent::Enter { item } => self.hover(Some(item)),
            PointerEvent::Leave { item } => {
                if self.hovered == Some(item) {
                    self.set_hover(None);
                }
            }
            PointerEvent::Wheel { position, delta } => {
                let factor = self.config.wheel_factor;
                if self.camera.zoom_at(position, delta, factor, self.viewport) {
                    self.emit(EngineEvent::CameraChanged);
                }
            }
        }
    }

    /// Select, checkpoint once and raise the item, then capture the grab offset.
    fn begin_drag(&mut self, id: ItemId, pointer: Point) {
        self.set_selection(Some(id), None);
        let z = self.front_stacking();
        self.checkpoint();
        let world = self.camera.screen_to_world(pointer, self.viewport);
        let Some(item) = self.document.item_mut(id) else {
            return;
        };
        item.position[2] = z;
        let offset = item.planar() - world;
        debug!("Begin drag of {}", id);
        self.gesture = Gesture::Dragging { item: id, offset, z };
        self.document_changed();
    }

    /// Per-move drag write. Never checkpoints.
    fn drag_to(&mut self, id: ItemId, spot: Point) {
        let Some(item) = self.document.item_mut(id) else {
            self.gesture = Gesture::Idle;
            return;
        };
        if item.planar() == spot {
            return;
        }
        item.set_planar(spot);
        self.document_changed();
    }

    /// Center the camera on the board at the initial distance.
    pub fn fit_all(&mut self) {
        self.camera.reset();
        self.emit(EngineEvent::CameraChanged);
    }
}
