//! Connectors between items.

use super::ItemId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for connectors.
pub type ConnectorId = Uuid;

/// Rope color used for new connectors.
pub const DEFAULT_CONNECTOR_COLOR: &str = "#e8c97a";

/// Colors offered for connectors.
pub const CONNECTOR_COLORS: [&str; 6] = [
    "#e8c97a", "#e63946", "#023e8a", "#2a9d8f", "#f4a261", "#ffffff",
];

/// Line style of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// A link between two items on the same board.
///
/// Direction is recorded but uniqueness is enforced on the unordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(default = "Uuid::new_v4")]
    pub id: ConnectorId,
    pub from_id: ItemId,
    pub to_id: ItemId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub style: ConnectorStyle,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CONNECTOR_COLOR.to_string()
}

impl Connector {
    /// Create an unlabeled solid connector in the default color.
    pub fn new(from_id: ItemId, to_id: ItemId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_id,
            to_id,
            label: String::new(),
            style: ConnectorStyle::Solid,
            color: default_color(),
        }
    }

    /// Whether this connector joins `a` and `b` in either direction.
    pub fn joins(&self, a: ItemId, b: ItemId) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: ItemId) -> bool {
        self.from_id == id || self.to_id == id
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_id == self.to_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_is_unordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let connector = Connector::new(a, b);
        assert!(connector.joins(a, b));
        assert!(connector.joins(b, a));
        assert!(!connector.joins(a, a));
        assert!(connector.touches(b));
    }

    #[test]
    fn test_connector_defaults_from_json() {
        let json = r#"{"fromId":"6f1c1f9e-3b7a-4f43-9a43-0b1d2c3e4f50","toId":"7a1c1f9e-3b7a-4f43-9a43-0b1d2c3e4f51"}"#;
        let connector: Connector = serde_json::from_str(json).unwrap();
        assert_eq!(connector.style, ConnectorStyle::Solid);
        assert_eq!(connector.color, DEFAULT_CONNECTOR_COLOR);
        assert!(connector.label.is_empty());
    }
}
