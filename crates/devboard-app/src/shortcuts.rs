//! Keyboard shortcut registry and dispatch.

use devboard_core::{Engine, ItemKind, Modifiers};
use std::io::{self, Write};

/// What a shortcut does to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add(ItemKind),
    FitAll,
    Deselect,
    DeleteSelected,
    Undo,
    Redo,
}

impl Command {
    /// Run the command. Returns false when it had nothing to act on.
    pub fn apply(self, engine: &mut Engine) -> bool {
        match self {
            Command::Add(kind) => {
                engine.add_item(kind);
                true
            }
            Command::FitAll => {
                engine.fit_all();
                true
            }
            Command::Deselect => {
                engine.deselect();
                true
            }
            Command::DeleteSelected => engine.remove_selected(),
            Command::Undo => engine.undo(),
            Command::Redo => engine.redo(),
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use Command::*;
        vec![
            Shortcut::new("N", false, false, Add(ItemKind::Note), "Add note"),
            Shortcut::new("C", false, false, Add(ItemKind::Code), "Add code snippet"),
            Shortcut::new("T", false, false, Add(ItemKind::Task), "Add task list"),
            Shortcut::new("D", false, false, Add(ItemKind::Decision), "Add decision"),
            Shortcut::new("L", false, false, Add(ItemKind::Link), "Add link"),
            Shortcut::new("M", false, false, Add(ItemKind::Milestone), "Add milestone"),
            Shortcut::new("I", false, false, Add(ItemKind::List), "Add list"),
            Shortcut::new("P", false, false, Add(ItemKind::Photo), "Add photo"),
            Shortcut::new("S", false, false, Add(ItemKind::Section), "Add section"),
            Shortcut::new("F", false, false, FitAll, "Fit board in view"),
            Shortcut::new("Escape", false, false, Deselect, "Deselect / cancel link"),
            Shortcut::new("Delete", false, false, DeleteSelected, "Delete selected item"),
            Shortcut::new("Backspace", false, false, DeleteSelected, "Delete selected item"),
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
        ]
    }

    /// Find the command bound to a key press. Keys are matched case-insensitively
    /// and Cmd counts as Ctrl.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.command)
    }

    /// Resolve a key press and run it. Returns whether anything happened.
    pub fn dispatch(engine: &mut Engine, key: &str, modifiers: Modifiers) -> bool {
        match Self::resolve(key, modifiers) {
            Some(command) => command.apply(engine),
            None => false,
        }
    }

    /// Write the shortcut table.
    pub fn write_all(out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "=== Keyboard Shortcuts ===")?;
        for shortcut in Self::all() {
            writeln!(out, "  {:20} {}", shortcut.format(), shortcut.description)?;
        }
        Ok(())
    }
}
