//! Partial updates for items and connectors.

use super::{Connector, ConnectorStyle, Item};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys a patch can never overwrite.
const IMMUTABLE_KEYS: [&str; 3] = ["id", "type", "boardId"];

/// Reason an item patch was refused.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("patched item is invalid: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("item did not serialize to an object")]
    NotAnObject,
}

/// A partial update merged onto an existing item.
///
/// Common fields are typed; variant fields are a JSON object merged key by
/// key onto the payload, so nested vectors are replaced whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub position: Option<[f64; 3]>,
    pub rotation: Option<[f64; 3]>,
    pub pin_color: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fields: Map<String, Value>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variant field, e.g. `text` on a note or `status` on a decision.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn position(mut self, position: [f64; 3]) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn pin_color(mut self, color: impl Into<String>) -> Self {
        self.pin_color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.pin_color.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.fields.is_empty()
    }

    /// Produce the patched item without touching `item`.
    pub fn apply(&self, item: &Item) -> Result<Item, PatchError> {
        let mut patched = if self.fields.is_empty() {
            item.clone()
        } else {
            let mut value = serde_json::to_value(item)?;
            let object = value.as_object_mut().ok_or(PatchError::NotAnObject)?;
            for (key, field) in &self.fields {
                if IMMUTABLE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                object.insert(key.clone(), field.clone());
            }
            serde_json::from_value::<Item>(value)?
        };

        patched.id = item.id;
        patched.board_id = item.board_id;
        if let Some(position) = self.position {
            patched.position = position;
        }
        if let Some(rotation) = self.rotation {
            patched.rotation = rotation;
        }
        if let Some(color) = &self.pin_color {
            patched.pin_color = color.clone();
        }
        if let Some(width) = self.width {
            patched.width = width;
        }
        if let Some(height) = self.height {
            patched.height = height;
        }
        patched.normalize_size();
        Ok(patched)
    }
}

/// A partial update of a connector's presentation fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorPatch {
    pub label: Option<String>,
    pub style: Option<ConnectorStyle>,
    pub color: Option<String>,
}

impl ConnectorPatch {
    /// Returns the patched connector, or `None` if nothing would change.
    pub fn apply(&self, connector: &Connector) -> Option<Connector> {
        let mut patched = connector.clone();
        if let Some(label) = &self.label {
            patched.label = label.clone();
        }
        if let Some(style) = self.style {
            patched.style = style;
        }
        if let Some(color) = &self.color {
            patched.color = color.clone();
        }
        (patched != *connector).then_some(patched)
    }
}
