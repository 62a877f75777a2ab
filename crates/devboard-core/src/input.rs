//! Pointer events delivered by the renderer and the gesture they drive.

use crate::model::ItemId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Modifier that turns a primary-button press into a pan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanModifier {
    #[default]
    Alt,
    Shift,
    /// Only secondary and middle buttons pan.
    None,
}

impl PanModifier {
    pub fn is_held(self, modifiers: &Modifiers) -> bool {
        match self {
            PanModifier::Alt => modifiers.alt,
            PanModifier::Shift => modifiers.shift,
            PanModifier::None => false,
        }
    }
}

/// Pointer input in device pixels, origin top-left.
///
/// `target` is the item under the pointer as reported by the renderer;
/// `None` means the board background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        target: Option<ItemId>,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    Enter {
        item: ItemId,
    },
    Leave {
        item: ItemId,
    },
    Wheel {
        position: Point,
        /// Vertical scroll delta; positive zooms out.
        delta: f64,
    },
}

impl PointerEvent {
    /// Primary-button press with no modifiers.
    pub fn down(target: Option<ItemId>, position: Point) -> Self {
        PointerEvent::Down {
            target,
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }
}

/// The single active pointer gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving an item; `offset` is item position minus the grabbed world point.
    Dragging { item: ItemId, offset: Vec2, z: f64 },
    /// Panning the camera; `last` is the previous pointer position in pixels.
    Panning { last: Point },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_modifier() {
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        assert!(PanModifier::Alt.is_held(&alt));
        assert!(!PanModifier::Shift.is_held(&alt));
        assert!(!PanModifier::None.is_held(&alt));
    }

    #[test]
    fn test_command_modifier() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(meta.command());
        assert!(!Modifiers::NONE.command());
    }
}
