//! DevBoard Core Library
//!
//! Platform-agnostic board interaction engine: boards, items and connectors,
//! snapshot undo/redo, pointer-to-board mapping for drag, pan and zoom, the
//! connector gesture, import/export and document storage. Rendering lives
//! elsewhere and talks to the engine through [`PointerEvent`]s and
//! [`EngineEvent`] subscriptions.

pub mod camera;
pub mod config;
pub mod engine;
pub mod events;
pub mod exchange;
pub mod factory;
pub mod history;
pub mod input;
pub mod linking;
pub mod model;
pub mod search;
pub mod storage;

pub use camera::{BoardBounds, Camera, Viewport};
pub use config::EngineConfig;
pub use engine::Engine;
pub use events::{EngineEvent, SubscriptionId};
pub use exchange::{ExchangeError, ExportBundle, ImportSummary};
pub use history::{History, Snapshot};
pub use input::{Gesture, Modifiers, MouseButton, PanModifier, PointerEvent};
pub use linking::{ConnectOutcome, ConnectorState};
pub use model::{
    Board, BoardId, BoardTheme, Connector, ConnectorId, ConnectorPatch, ConnectorStyle, Document,
    Item, ItemId, ItemKind, ItemPatch, ItemPayload,
};
