//! Command-line argument definitions for the DevBoard shell.
//!
//! Every invocation loads the stored board document, applies one command
//! through the engine and saves the document back if it changed.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the DevBoard shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding board documents
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: BoardCommand,
}

/// One action applied to the stored document.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum BoardCommand {
    /// List boards, marking the active one
    Boards,
    /// Create a board and make it active
    NewBoard { name: String },
    /// Make another board active (id or unique id prefix)
    SwitchBoard { board: String },
    /// Add an item to the active board
    Add {
        /// note, code, task, decision, milestone, link, section, list, photo, diagram
        kind: String,
        /// Main text: note text, section label, picture caption or title
        #[arg(short, long)]
        text: Option<String>,
    },
    /// List items on the active board
    List,
    /// Search items on the active board
    Search {
        query: String,
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Connect two items (ids or unique id prefixes)
    Connect { from: String, to: String },
    /// Remove an item and its connectors
    Remove { item: String },
    /// Export the active board
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Import items and connectors from a JSON export into the active board
    Import { file: PathBuf },
    /// Remove every item from the active board
    Clear,
    /// Print keyboard shortcuts
    Shortcuts,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_text() {
        let args = Args::parse_from(["devboard", "add", "note", "--text", "hello"]);
        assert_eq!(
            args.command,
            BoardCommand::Add {
                kind: "note".to_string(),
                text: Some("hello".to_string()),
            }
        );
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_parse_export_format() {
        let args = Args::parse_from([
            "devboard",
            "--data-dir",
            "/tmp/boards",
            "export",
            "--format",
            "markdown",
        ]);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/boards")));
        assert!(matches!(
            args.command,
            BoardCommand::Export {
                format: ExportFormat::Markdown,
                out: None
            }
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["devboard"]).is_err());
    }
}
