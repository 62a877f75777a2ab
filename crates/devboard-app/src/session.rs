//! One shell invocation: load the stored document, apply a command, save.

use crate::args::{BoardCommand, ExportFormat};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::shortcuts::ShortcutRegistry;
use chrono::Utc;
use devboard_core::model::ItemPayload;
use devboard_core::storage::{AutoSaveManager, Storage};
use devboard_core::{BoardId, ConnectOutcome, Engine, ItemId, ItemKind};
use log::debug;
use std::fs;
use std::io::Write;
use std::sync::Arc;

/// Default payload for `kind` with `text` in its main text field.
fn payload_with_text(kind: ItemKind, text: &str) -> ItemPayload {
    let mut payload = ItemPayload::default_for(kind);
    let slot = match &mut payload {
        ItemPayload::Note(note) => &mut note.text,
        ItemPayload::Section(section) => &mut section.label,
        ItemPayload::Photo(picture) | ItemPayload::Diagram(picture) => &mut picture.caption,
        ItemPayload::Code(code) => &mut code.title,
        ItemPayload::Task(task) => &mut task.title,
        ItemPayload::Decision(decision) => &mut decision.title,
        ItemPayload::Milestone(milestone) => &mut milestone.title,
        ItemPayload::Link(link) => &mut link.title,
        ItemPayload::List(list) => &mut list.title,
    };
    *slot = text.to_owned();
    payload
}

/// First eight hex digits, enough to pick an id on the command line.
fn short_id(id: ItemId) -> String {
    id.to_string().chars().take(8).collect()
}

/// Pick the single id whose text form starts with `prefix`.
fn match_prefix<I>(prefix: &str, ids: I) -> Result<Option<ItemId>, AppError>
where
    I: IntoIterator<Item = ItemId>,
{
    let needle = prefix.to_ascii_lowercase();
    let mut found = None;
    for id in ids {
        if id.to_string().starts_with(&needle) {
            if found.is_some() {
                return Err(AppError::Ambiguous(prefix.to_string()));
            }
            found = Some(id);
        }
    }
    Ok(found)
}

pub struct Session<S: Storage> {
    engine: Engine,
    autosave: AutoSaveManager<S>,
}

impl<S: Storage> Session<S> {
    /// Open the configured document, or a fresh one if none is stored.
    pub fn open(storage: Arc<S>, config: &AppConfig) -> Result<Self, AppError> {
        let mut autosave = AutoSaveManager::new(storage, config.document_key.as_str());
        let engine = pollster::block_on(autosave.open(config.engine.clone()))?;
        Ok(Self { engine, autosave })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_modified(&self) -> bool {
        self.autosave.has_unsaved_changes(&self.engine)
    }

    /// Save the document if anything changed. Returns whether it was written.
    pub fn close(mut self) -> Result<bool, AppError> {
        if !self.is_modified() {
            debug!("Document unchanged, not saving");
            return Ok(false);
        }
        pollster::block_on(self.autosave.flush(&self.engine))?;
        Ok(true)
    }

    fn resolve_item(&self, prefix: &str) -> Result<ItemId, AppError> {
        let ids = self.engine.board_items().map(|item| item.id);
        match_prefix(prefix, ids)?.ok_or_else(|| AppError::UnknownItem(prefix.to_string()))
    }

    fn resolve_board(&self, prefix: &str) -> Result<BoardId, AppError> {
        let ids = self.engine.document().boards.iter().map(|board| board.id);
        match_prefix(prefix, ids)?.ok_or_else(|| AppError::UnknownBoard(prefix.to_string()))
    }

    /// Apply one command, writing its report to `out`.
    pub fn execute(&mut self, command: &BoardCommand, out: &mut impl Write) -> Result<(), AppError> {
        match command {
            BoardCommand::Boards => {
                let document = self.engine.document();
                for board in &document.boards {
                    let marker = if board.id == document.active_board_id {
                        '*'
                    } else {
                        ' '
                    };
                    writeln!(
                        out,
                        "{} {}  {}  [{}] {} items",
                        marker,
                        short_id(board.id),
                        board.name,
                        board.theme.label(),
                        document.items_on(board.id).count()
                    )?;
                }
            }
            BoardCommand::NewBoard { name } => {
                let id = self.engine.add_board(name.as_str());
                writeln!(out, "{}", id)?;
            }
            BoardCommand::SwitchBoard { board } => {
                let id = self.resolve_board(board)?;
                self.engine.switch_board(id);
                if let Some(board) = self.engine.active_board() {
                    writeln!(out, "Switched to {}", board.name)?;
                }
            }
            BoardCommand::Add { kind, text } => {
                let kind: ItemKind = kind.parse()?;
                let id = match (kind, text) {
                    (ItemKind::Note, Some(text)) => self.engine.add_note(text.as_str()),
                    (kind, Some(text)) => self.engine.add_payload(payload_with_text(kind, text)),
                    (kind, None) => self.engine.add_item(kind),
                };
                writeln!(out, "{}", id)?;
            }
            BoardCommand::List => {
                for item in self.engine.board_items() {
                    writeln!(
                        out,
                        "{}  {:<9} {}  ({:.1}, {:.1})",
                        short_id(item.id),
                        item.kind().key(),
                        item.label(),
                        item.position[0],
                        item.position[1]
                    )?;
                }
            }
            BoardCommand::Search { query, kind } => {
                let kind = kind.as_deref().map(str::parse::<ItemKind>).transpose()?;
                let hits = self.engine.search(query, kind);
                if hits.is_empty() {
                    writeln!(out, "No matches")?;
                }
                for item in hits {
                    writeln!(out, "{}  {:<9} {}", short_id(item.id), item.kind().key(), item.label())?;
                }
            }
            BoardCommand::Connect { from, to } => {
                let from = self.resolve_item(from)?;
                let to = self.resolve_item(to)?;
                self.engine.start_connector(from);
                match self.engine.finish_connector(to) {
                    ConnectOutcome::Created(id) => writeln!(out, "{}", id)?,
                    ConnectOutcome::SelfLoop => writeln!(out, "An item cannot connect to itself")?,
                    ConnectOutcome::Duplicate => writeln!(out, "Already connected")?,
                    ConnectOutcome::NotArmed | ConnectOutcome::UnknownItem => {
                        return Err(AppError::UnknownItem(short_id(to)));
                    }
                }
            }
            BoardCommand::Remove { item } => {
                let id = self.resolve_item(item)?;
                self.engine.remove_item(id);
                writeln!(out, "Removed {}", short_id(id))?;
            }
            BoardCommand::Export { format, out: path } => {
                let now = Utc::now();
                let text = match format {
                    ExportFormat::Json => self
                        .engine
                        .export_bundle(now)
                        .ok_or_else(|| {
                            AppError::UnknownBoard(self.engine.active_board_id().to_string())
                        })?
                        .to_json_pretty()?,
                    ExportFormat::Markdown => self.engine.export_markdown(now),
                };
                match path {
                    Some(path) => {
                        fs::write(path, text)?;
                        writeln!(out, "Exported to {}", path.display())?;
                    }
                    None => writeln!(out, "{}", text)?,
                }
            }
            BoardCommand::Import { file } => {
                let json = fs::read_to_string(file)?;
                let summary = self.engine.import_json(&json)?;
                write!(
                    out,
                    "Imported {} items and {} connectors",
                    summary.items, summary.connectors
                )?;
                if summary.dropped_connectors > 0 {
                    write!(out, " ({} connectors dropped)", summary.dropped_connectors)?;
                }
                writeln!(out)?;
            }
            BoardCommand::Clear => {
                let removed = self.engine.clear_board();
                writeln!(out, "Removed {} items", removed)?;
            }
            BoardCommand::Shortcuts => ShortcutRegistry::write_all(out)?,
        }
        Ok(())
    }
}
