//! Item definitions for the board.
//!
//! An [`Item`] is a common base (identity, placement, size) plus a variant
//! payload. Generic engine operations only ever touch the base; the payload
//! is carried along untouched except by search, export and sub-entry edits.

use super::BoardId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for items.
pub type ItemId = Uuid;

/// Unique identifier for task and list entries inside an item.
pub type EntryId = Uuid;

/// Stacking value given to freshly created items.
pub const DEFAULT_STACKING: f64 = 0.05;

/// Sticky note paper colors.
pub const NOTE_COLORS: [&str; 6] = [
    "#f9e94e", "#f9c74f", "#90e0ef", "#f4a261", "#a8dadc", "#f48fb1",
];

/// Pin colors.
pub const PIN_COLORS: [&str; 2] = ["#e63946", "#023e8a"];

fn default_pin_color() -> String {
    PIN_COLORS[0].to_string()
}

/// Discriminant of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Note,
    Code,
    Task,
    Decision,
    Milestone,
    Link,
    Section,
    List,
    Photo,
    Diagram,
}

impl ItemKind {
    /// All kinds in toolbar order.
    pub const ALL: [ItemKind; 10] = [
        ItemKind::Note,
        ItemKind::Code,
        ItemKind::Task,
        ItemKind::Decision,
        ItemKind::Milestone,
        ItemKind::Link,
        ItemKind::Section,
        ItemKind::List,
        ItemKind::Photo,
        ItemKind::Diagram,
    ];

    /// Stable key used in the `type` field.
    pub fn key(self) -> &'static str {
        match self {
            ItemKind::Note => "note",
            ItemKind::Code => "code",
            ItemKind::Task => "task",
            ItemKind::Decision => "decision",
            ItemKind::Milestone => "milestone",
            ItemKind::Link => "link",
            ItemKind::Section => "section",
            ItemKind::List => "list",
            ItemKind::Photo => "photo",
            ItemKind::Diagram => "diagram",
        }
    }

    /// Default card size (width, height) in world units.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            ItemKind::Note => (1.5, 1.5),
            ItemKind::Code => (2.8, 2.2),
            ItemKind::Task => (2.0, 2.2),
            ItemKind::Decision => (2.4, 2.8),
            ItemKind::Milestone => (2.2, 1.8),
            ItemKind::Link => (2.0, 1.4),
            ItemKind::Section => (3.5, 0.7),
            ItemKind::List => (2.0, 1.6),
            ItemKind::Photo => (1.4, 1.6),
            ItemKind::Diagram => (1.8, 2.0),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown item kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item kind `{0}`")]
pub struct ParseItemKindError(pub String);

impl FromStr for ItemKind {
    type Err = ParseItemKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ParseItemKindError(s.to_string()))
    }
}

/// A checkable entry of a task list or milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: EntryId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl TaskEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            done: false,
        }
    }
}

/// An entry of a list card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: EntryId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl ListEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            done: false,
        }
    }
}

/// Flavor of a sticky note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteVariant {
    Idea,
    Todo,
    Warning,
    Blocker,
    Done,
    #[default]
    Note,
}

impl NoteVariant {
    pub fn key(self) -> &'static str {
        match self {
            NoteVariant::Idea => "idea",
            NoteVariant::Todo => "todo",
            NoteVariant::Warning => "warning",
            NoteVariant::Blocker => "blocker",
            NoteVariant::Done => "done",
            NoteVariant::Note => "note",
        }
    }
}

/// Lifecycle of a decision record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Proposed,
    Decided,
    Deprecated,
}

impl DecisionStatus {
    pub fn key(self) -> &'static str {
        match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Decided => "decided",
            DecisionStatus::Deprecated => "deprecated",
        }
    }
}

/// Health of a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    #[default]
    OnTrack,
    AtRisk,
    Delayed,
    Done,
}

impl MilestoneStatus {
    pub fn key(self) -> &'static str {
        match self {
            MilestoneStatus::OnTrack => "on-track",
            MilestoneStatus::AtRisk => "at-risk",
            MilestoneStatus::Delayed => "delayed",
            MilestoneStatus::Done => "done",
        }
    }
}

/// Bullet style of a list card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListVariant {
    #[default]
    Bullet,
    Numbered,
    Checklist,
    Starred,
}

/// Sticky note payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub text: String,
    pub color: String,
    pub variant: NoteVariant,
    pub font_size: f64,
    pub tags: Vec<String>,
    /// Fields this version does not model, kept as they were read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            text: "New Note".to_string(),
            color: NOTE_COLORS[0].to_string(),
            variant: NoteVariant::default(),
            font_size: 0.18,
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Code snippet payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeSnippet {
    pub title: String,
    pub language: String,
    pub code: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CodeSnippet {
    fn default() -> Self {
        Self {
            title: "Snippet".to_string(),
            language: "javascript".to_string(),
            code: String::new(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Task list payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskList {
    pub title: String,
    pub tasks: Vec<TaskEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            title: "Tasks".to_string(),
            tasks: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Decision record payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Decision {
    pub title: String,
    pub problem: String,
    pub options: String,
    pub decision: String,
    pub reason: String,
    pub status: DecisionStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            title: "Decision".to_string(),
            problem: String::new(),
            options: String::new(),
            decision: String::new(),
            reason: String::new(),
            status: DecisionStatus::default(),
            extra: Map::new(),
        }
    }
}

/// Milestone payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    pub title: String,
    pub target_date: String,
    pub status: MilestoneStatus,
    pub tasks: Vec<TaskEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Milestone {
    fn default() -> Self {
        Self {
            title: "Milestone".to_string(),
            target_date: String::new(),
            status: MilestoneStatus::default(),
            tasks: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Link card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    pub title: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            title: "Link".to_string(),
            url: String::new(),
            description: String::new(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Section label payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub label: String,
    pub color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            label: "Section".to_string(),
            color: "#ffffff".to_string(),
            extra: Map::new(),
        }
    }
}

/// List card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct List {
    pub title: String,
    pub variant: ListVariant,
    pub items: Vec<ListEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for List {
    fn default() -> Self {
        Self {
            title: "List".to_string(),
            variant: ListVariant::default(),
            items: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Photo or diagram payload. `image_url` is an already resolved resource handle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Picture {
    pub image_url: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Variant-specific part of an item, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemPayload {
    Note(Note),
    Code(CodeSnippet),
    Task(TaskList),
    Decision(Decision),
    Milestone(Milestone),
    Link(Link),
    Section(Section),
    List(List),
    Photo(Picture),
    Diagram(Picture),
}

impl ItemPayload {
    /// Payload with per-kind defaults.
    pub fn default_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Note => ItemPayload::Note(Note::default()),
            ItemKind::Code => ItemPayload::Code(CodeSnippet::default()),
            ItemKind::Task => ItemPayload::Task(TaskList::default()),
            ItemKind::Decision => ItemPayload::Decision(Decision::default()),
            ItemKind::Milestone => ItemPayload::Milestone(Milestone::default()),
            ItemKind::Link => ItemPayload::Link(Link::default()),
            ItemKind::Section => ItemPayload::Section(Section::default()),
            ItemKind::List => ItemPayload::List(List::default()),
            ItemKind::Photo => ItemPayload::Photo(Picture::default()),
            ItemKind::Diagram => ItemPayload::Diagram(Picture::default()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemPayload::Note(_) => ItemKind::Note,
            ItemPayload::Code(_) => ItemKind::Code,
            ItemPayload::Task(_) => ItemKind::Task,
            ItemPayload::Decision(_) => ItemKind::Decision,
            ItemPayload::Milestone(_) => ItemKind::Milestone,
            ItemPayload::Link(_) => ItemKind::Link,
            ItemPayload::Section(_) => ItemKind::Section,
            ItemPayload::List(_) => ItemKind::List,
            ItemPayload::Photo(_) => ItemKind::Photo,
            ItemPayload::Diagram(_) => ItemKind::Diagram,
        }
    }
}

/// A placeable entity on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    #[serde(default)]
    pub board_id: BoardId,
    /// `[x, y, z]`; z is the stacking value, not a depth.
    #[serde(default)]
    pub position: [f64; 3],
    /// Cosmetic tilt in radians.
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_pin_color")]
    pub pin_color: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl Item {
    /// Create an item at the board origin with default size for its kind.
    pub fn new(board_id: BoardId, payload: ItemPayload) -> Self {
        let (width, height) = payload.kind().default_size();
        Self {
            id: Uuid::new_v4(),
            board_id,
            position: [0.0, 0.0, DEFAULT_STACKING],
            rotation: [0.0; 3],
            pin_color: default_pin_color(),
            width,
            height,
            payload,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.payload.kind()
    }

    /// Position on the board plane.
    pub fn planar(&self) -> Point {
        Point::new(self.position[0], self.position[1])
    }

    /// Stacking value used for overlap ordering.
    pub fn stacking(&self) -> f64 {
        self.position[2]
    }

    /// Move on the board plane, keeping the stacking value.
    pub fn set_planar(&mut self, point: Point) {
        self.position[0] = point.x;
        self.position[1] = point.y;
    }

    /// Fill in a missing or degenerate size with the kind default.
    pub fn normalize_size(&mut self) {
        let (width, height) = self.kind().default_size();
        if !(self.width > 0.0) {
            self.width = width;
        }
        if !(self.height > 0.0) {
            self.height = height;
        }
    }

    /// Task entries for task lists and milestones.
    pub fn task_entries(&self) -> Option<&[TaskEntry]> {
        match &self.payload {
            ItemPayload::Task(task) => Some(&task.tasks),
            ItemPayload::Milestone(milestone) => Some(&milestone.tasks),
            _ => None,
        }
    }

    /// Replace the whole task vector. Returns false for kinds without tasks.
    pub fn set_task_entries(&mut self, tasks: Vec<TaskEntry>) -> bool {
        match &mut self.payload {
            ItemPayload::Task(task) => task.tasks = tasks,
            ItemPayload::Milestone(milestone) => milestone.tasks = tasks,
            _ => return false,
        }
        true
    }

    /// Entries of a list card.
    pub fn list_entries(&self) -> Option<&[ListEntry]> {
        match &self.payload {
            ItemPayload::List(list) => Some(&list.items),
            _ => None,
        }
    }

    /// Replace the whole entry vector. Returns false for kinds without entries.
    pub fn set_list_entries(&mut self, items: Vec<ListEntry>) -> bool {
        match &mut self.payload {
            ItemPayload::List(list) => {
                list.items = items;
                true
            }
            _ => false,
        }
    }

    /// Give every sub-entry a fresh id.
    pub fn regenerate_entry_ids(&mut self) {
        if let Some(tasks) = self.task_entries() {
            let tasks = tasks
                .iter()
                .map(|entry| TaskEntry {
                    id: Uuid::new_v4(),
                    ..entry.clone()
                })
                .collect();
            self.set_task_entries(tasks);
        }
        if let Some(items) = self.list_entries() {
            let items = items
                .iter()
                .map(|entry| ListEntry {
                    id: Uuid::new_v4(),
                    ..entry.clone()
                })
                .collect();
            self.set_list_entries(items);
        }
    }

    /// Short label for result lists and panels.
    pub fn label(&self) -> String {
        match &self.payload {
            ItemPayload::Note(note) => {
                let text: String = note.text.chars().take(40).collect();
                fallback(text, "Note")
            }
            ItemPayload::Code(code) => fallback(code.title.clone(), "Code Snippet"),
            ItemPayload::Task(task) => fallback(task.title.clone(), "Task List"),
            ItemPayload::Decision(decision) => fallback(decision.title.clone(), "Decision"),
            ItemPayload::Milestone(milestone) => fallback(milestone.title.clone(), "Milestone"),
            ItemPayload::Link(link) => {
                if !link.title.is_empty() {
                    link.title.clone()
                } else {
                    fallback(link.url.clone(), "Link")
                }
            }
            ItemPayload::Section(section) => fallback(section.label.clone(), "Section"),
            ItemPayload::List(list) => fallback(list.title.clone(), "List"),
            ItemPayload::Photo(picture) => fallback(picture.caption.clone(), "Photo"),
            ItemPayload::Diagram(picture) => fallback(picture.caption.clone(), "Diagram"),
        }
    }

    /// Text the search overlay matches against.
    pub fn search_text(&self) -> String {
        let parts: Vec<&str> = match &self.payload {
            ItemPayload::Note(note) => std::iter::once(note.text.as_str())
                .chain(note.tags.iter().map(String::as_str))
                .collect(),
            ItemPayload::Code(code) => [&code.title, &code.language, &code.code]
                .into_iter()
                .map(String::as_str)
                .chain(code.tags.iter().map(String::as_str))
                .collect(),
            ItemPayload::Task(task) => std::iter::once(task.title.as_str())
                .chain(task.tasks.iter().map(|t| t.text.as_str()))
                .collect(),
            ItemPayload::Decision(decision) => {
                vec![&decision.title, &decision.problem, &decision.decision]
                    .into_iter()
                    .map(String::as_str)
                    .collect()
            }
            ItemPayload::Milestone(milestone) => vec![
                milestone.title.as_str(),
                milestone.target_date.as_str(),
                milestone.status.key(),
            ],
            ItemPayload::Link(link) => [&link.title, &link.url, &link.description]
                .into_iter()
                .map(String::as_str)
                .chain(link.tags.iter().map(String::as_str))
                .collect(),
            ItemPayload::Section(section) => vec![section.label.as_str()],
            ItemPayload::List(list) => std::iter::once(list.title.as_str())
                .chain(list.items.iter().map(|e| e.text.as_str()))
                .collect(),
            ItemPayload::Photo(picture) | ItemPayload::Diagram(picture) => {
                vec![picture.caption.as_str()]
            }
        };
        parts.join(" ")
    }
}

fn fallback(text: String, default: &str) -> String {
    if text.trim().is_empty() {
        default.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Note".parse::<ItemKind>().unwrap(), ItemKind::Note);
        assert_eq!("diagram".parse::<ItemKind>().unwrap(), ItemKind::Diagram);
        assert!("sticker".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_item_serializes_flat_with_type_tag() {
        let item = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Milestone));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "milestone");
        assert_eq!(json["status"], "on-track");
        assert!(json.get("boardId").is_some());
        assert!(json.get("pinColor").is_some());
        assert!(json.get("targetDate").is_some());
    }

    #[test]
    fn test_item_parses_exported_note() {
        let json = r##"{
            "id": "0b6f3f0e-8d0c-4a51-9d7b-6b8f1c2d3e4f",
            "type": "note",
            "text": "Ship it",
            "color": "#f9c74f",
            "position": [1.0, -0.5, 0.07],
            "rotation": [0.01, 0.02, -0.03],
            "pinColor": "#023e8a",
            "fontSize": 0.18,
            "width": 1.2,
            "height": 1.2
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ItemKind::Note);
        assert_eq!(item.pin_color, "#023e8a");
        assert!((item.stacking() - 0.07).abs() < f64::EPSILON);
        match &item.payload {
            ItemPayload::Note(note) => {
                assert_eq!(note.text, "Ship it");
                assert_eq!(note.variant, NoteVariant::Note);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_missing_payload_fields_take_defaults() {
        let json = r#"{"type":"decision","position":[0,0,0.05]}"#;
        let mut item: Item = serde_json::from_str(json).unwrap();
        item.normalize_size();
        assert_eq!((item.width, item.height), ItemKind::Decision.default_size());
        match item.payload {
            ItemPayload::Decision(decision) => {
                assert_eq!(decision.title, "Decision");
                assert_eq!(decision.status, DecisionStatus::Proposed);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_task_entries_only_on_task_kinds() {
        let mut task = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Task));
        assert!(task.set_task_entries(vec![TaskEntry::new("write tests")]));
        assert_eq!(task.task_entries().unwrap().len(), 1);

        let mut link = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Link));
        assert!(link.task_entries().is_none());
        assert!(!link.set_task_entries(Vec::new()));
    }

    #[test]
    fn test_regenerate_entry_ids() {
        let mut list = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::List));
        let entry = ListEntry::new("milk");
        let old_id = entry.id;
        list.set_list_entries(vec![entry]);
        list.regenerate_entry_ids();
        let entries = list.list_entries().unwrap();
        assert_ne!(entries[0].id, old_id);
        assert_eq!(entries[0].text, "milk");
    }

    #[test]
    fn test_label_falls_back_per_kind() {
        let mut item = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Link));
        if let ItemPayload::Link(link) = &mut item.payload {
            link.title.clear();
            link.url = "https://example.com".to_string();
        }
        assert_eq!(item.label(), "https://example.com");

        let photo = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Photo));
        assert_eq!(photo.label(), "Photo");
    }

    #[test]
    fn test_search_text_includes_tags() {
        let mut item = Item::new(Uuid::new_v4(), ItemPayload::default_for(ItemKind::Code));
        if let ItemPayload::Code(code) = &mut item.payload {
            code.title = "Retry loop".to_string();
            code.tags = vec!["backoff".to_string()];
        }
        let text = item.search_text();
        assert!(text.contains("Retry loop"));
        assert!(text.contains("javascript"));
        assert!(text.contains("backoff"));
    }
}
