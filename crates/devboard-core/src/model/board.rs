//! Board records and theme keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for boards.
pub type BoardId = Uuid;

/// Name given to the board that is created when none exist.
pub const DEFAULT_BOARD_NAME: &str = "My Board";

/// Theme key of a board.
///
/// Only the key is stored here; what a theme looks like is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardTheme {
    #[default]
    Cork,
    Dark,
    Blueprint,
    Whiteboard,
    Midnight,
    Forest,
    Slate,
    Paper,
    Neon,
}

impl BoardTheme {
    /// All themes in menu order.
    pub const ALL: [BoardTheme; 9] = [
        BoardTheme::Cork,
        BoardTheme::Dark,
        BoardTheme::Blueprint,
        BoardTheme::Whiteboard,
        BoardTheme::Midnight,
        BoardTheme::Forest,
        BoardTheme::Slate,
        BoardTheme::Paper,
        BoardTheme::Neon,
    ];

    /// Stable key used in persisted documents.
    pub fn key(self) -> &'static str {
        match self {
            BoardTheme::Cork => "cork",
            BoardTheme::Dark => "dark",
            BoardTheme::Blueprint => "blueprint",
            BoardTheme::Whiteboard => "whiteboard",
            BoardTheme::Midnight => "midnight",
            BoardTheme::Forest => "forest",
            BoardTheme::Slate => "slate",
            BoardTheme::Paper => "paper",
            BoardTheme::Neon => "neon",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            BoardTheme::Cork => "Cork",
            BoardTheme::Dark => "Dark",
            BoardTheme::Blueprint => "Blueprint",
            BoardTheme::Whiteboard => "Whiteboard",
            BoardTheme::Midnight => "Midnight",
            BoardTheme::Forest => "Forest",
            BoardTheme::Slate => "Slate",
            BoardTheme::Paper => "Paper",
            BoardTheme::Neon => "Neon",
        }
    }
}

impl fmt::Display for BoardTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BoardTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.key() == key)
            .ok_or_else(|| format!("unknown board theme `{s}`"))
    }
}

/// A named container scoping a set of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub theme: BoardTheme,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board with the default theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            theme: BoardTheme::default(),
            created_at: Utc::now(),
        }
    }

    /// Create the board used when no other board exists.
    pub fn default_board() -> Self {
        Self::new(DEFAULT_BOARD_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_keys_round_trip() {
        for theme in BoardTheme::ALL {
            assert_eq!(theme.key().parse::<BoardTheme>().unwrap(), theme);
        }
        assert!("plaid".parse::<BoardTheme>().is_err());
    }

    #[test]
    fn test_board_json_uses_camel_case() {
        let board = Board::new("Sprint");
        let json = serde_json::to_value(&board).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["theme"], "cork");
    }

    #[test]
    fn test_board_theme_defaults_when_missing() {
        let json = r#"{"id":"6f1c1f9e-3b7a-4f43-9a43-0b1d2c3e4f50","name":"Old"}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.theme, BoardTheme::Cork);
        assert_eq!(board.name, "Old");
    }
}
