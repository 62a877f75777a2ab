//! JSON and Markdown export of a board, and JSON import.

use crate::model::{
    Board, BoardId, Connector, Document, Item, ItemId, ItemPayload, ListVariant, TaskEntry,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors while exchanging boards with the outside world.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("malformed import document: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to serialize export: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// JSON export of the active board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub board: Board,
    pub items: Vec<Item>,
    pub connectors: Vec<Connector>,
    pub exported_at: DateTime<Utc>,
}

impl ExportBundle {
    /// Collect the active board, its items and the connectors between them.
    pub fn of_active_board(document: &Document, exported_at: DateTime<Utc>) -> Option<Self> {
        let board = document.active_board()?.clone();
        Some(Self {
            items: document.items_on(board.id).cloned().collect(),
            connectors: document.connectors_on(board.id).cloned().collect(),
            board,
            exported_at,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, ExchangeError> {
        serde_json::to_string_pretty(self).map_err(ExchangeError::Serialize)
    }
}

/// The parts of an import document the engine reads. Anything else is ignored,
/// so an [`ExportBundle`] imports as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDocument {
    pub items: Vec<Item>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl ImportDocument {
    /// Parse the whole document up front. Nothing is applied on failure.
    pub fn parse(json: &str) -> Result<Self, ExchangeError> {
        serde_json::from_str(json).map_err(ExchangeError::Malformed)
    }

    /// Re-parent items to `board_id` under fresh ids and remap connectors.
    ///
    /// Connectors with an endpoint outside the document, self-loops and
    /// duplicates of an earlier pair are dropped.
    pub fn rebase(self, board_id: BoardId) -> PreparedImport {
        let mut ids: HashMap<ItemId, ItemId> = HashMap::with_capacity(self.items.len());
        let items: Vec<Item> = self
            .items
            .into_iter()
            .map(|mut item| {
                let fresh = Uuid::new_v4();
                ids.insert(item.id, fresh);
                item.id = fresh;
                item.board_id = board_id;
                item.regenerate_entry_ids();
                item.normalize_size();
                item
            })
            .collect();

        let mut connectors: Vec<Connector> = Vec::with_capacity(self.connectors.len());
        let mut dropped = 0;
        for connector in self.connectors {
            let mapped = ids
                .get(&connector.from_id)
                .zip(ids.get(&connector.to_id))
                .map(|(from, to)| (*from, *to));
            match mapped {
                Some((from, to))
                    if from != to && !connectors.iter().any(|c| c.joins(from, to)) =>
                {
                    connectors.push(Connector {
                        id: Uuid::new_v4(),
                        from_id: from,
                        to_id: to,
                        ..connector
                    });
                }
                _ => dropped += 1,
            }
        }

        PreparedImport {
            items,
            connectors,
            dropped_connectors: dropped,
        }
    }
}

/// Import content ready to be merged into a document.
#[derive(Debug, Clone, Default)]
pub struct PreparedImport {
    pub items: Vec<Item>,
    pub connectors: Vec<Connector>,
    pub dropped_connectors: usize,
}

/// What an import added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub items: usize,
    pub connectors: usize,
    pub dropped_connectors: usize,
}

/// Render the active board as Markdown, one section per item in board order.
pub fn export_markdown(document: &Document, exported_at: DateTime<Utc>) -> String {
    let name = document
        .active_board()
        .map(|b| b.name.as_str())
        .unwrap_or("DevBoard");
    let mut sections = vec![
        format!("# {name}\n"),
        format!("> Exported {}\n", exported_at.format("%Y-%m-%d")),
    ];
    sections.extend(document.board_items().map(item_markdown));
    sections.join("\n")
}

fn item_markdown(item: &Item) -> String {
    match &item.payload {
        ItemPayload::Note(note) => {
            format!("## Note ({})\n\n{}\n", note.variant.key(), note.text)
        }
        ItemPayload::Code(code) => format!(
            "## {}\n\n```{}\n{}\n```\n",
            non_empty(&code.title, "Code Snippet"),
            code.language,
            code.code
        ),
        ItemPayload::Task(task) => format!(
            "## {}\n\n{}\n",
            non_empty(&task.title, "Tasks"),
            checkboxes(&task.tasks)
        ),
        ItemPayload::Decision(decision) => format!(
            "## {}\n\n**Status:** {}\n\n**Problem:** {}\n\n**Options:** {}\n\n**Decision:** {}\n\n**Reason:** {}\n",
            non_empty(&decision.title, "Decision"),
            decision.status.key(),
            decision.problem,
            decision.options,
            decision.decision,
            decision.reason
        ),
        ItemPayload::Milestone(milestone) => format!(
            "## {}\n\n**Target:** {}  **Status:** {}\n\n{}\n",
            non_empty(&milestone.title, "Milestone"),
            non_empty(&milestone.target_date, "TBD"),
            milestone.status.key(),
            checkboxes(&milestone.tasks)
        ),
        ItemPayload::Link(link) => format!(
            "## {}\n\n{}\n\n{}\n",
            non_empty(&link.title, "Link"),
            link.url,
            link.description
        ),
        ItemPayload::Section(section) => format!("---\n\n# {}\n\n---\n", section.label),
        ItemPayload::List(list) => {
            let lines: Vec<String> = list
                .items
                .iter()
                .enumerate()
                .map(|(index, entry)| match list.variant {
                    ListVariant::Bullet => format!("- {}", entry.text),
                    ListVariant::Numbered => format!("{}. {}", index + 1, entry.text),
                    ListVariant::Checklist => {
                        format!("- [{}] {}", if entry.done { 'x' } else { ' ' }, entry.text)
                    }
                    ListVariant::Starred => format!("- ★ {}", entry.text),
                })
                .collect();
            format!("## {}\n\n{}\n", non_empty(&list.title, "List"), lines.join("\n"))
        }
        ItemPayload::Photo(picture) | ItemPayload::Diagram(picture) => format!(
            "## {}\n\n![{}]({})\n",
            item.label(),
            picture.caption,
            picture.image_url
        ),
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

fn checkboxes(tasks: &[TaskEntry]) -> String {
    tasks
        .iter()
        .map(|t| format!("- [{}] {}", if t.done { 'x' } else { ' ' }, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}
