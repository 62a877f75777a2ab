//! Entity model: boards, items, connectors and the persisted document.

mod board;
mod connector;
mod document;
mod item;
mod patch;

pub use board::{Board, BoardId, BoardTheme, DEFAULT_BOARD_NAME};
pub use connector::{
    CONNECTOR_COLORS, Connector, ConnectorId, ConnectorStyle, DEFAULT_CONNECTOR_COLOR,
};
pub use document::Document;
pub use item::{
    CodeSnippet, DEFAULT_STACKING, Decision, DecisionStatus, EntryId, Item, ItemId, ItemKind,
    ItemPayload, Link, List, ListEntry, ListVariant, Milestone, MilestoneStatus, NOTE_COLORS,
    Note, NoteVariant, PIN_COLORS, ParseItemKindError, Picture, Section, TaskEntry, TaskList,
};
pub use patch::{ConnectorPatch, ItemPatch, PatchError};
