//! Two-step connector gesture: pick a source, then a target.

use crate::model::{ConnectorId, ItemId};

/// State of the connector gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectorState {
    #[default]
    Idle,
    AwaitingTarget(ItemId),
}

/// What `finish` decided, before the document is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Connect { from: ItemId, to: ItemId },
    SelfLoop,
    NotArmed,
}

/// Result of a finished connector gesture as applied to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Created(ConnectorId),
    SelfLoop,
    /// The pair was already connected; nothing was created.
    Duplicate,
    NotArmed,
    /// An endpoint no longer exists or lies on another board.
    UnknownItem,
}

impl ConnectOutcome {
    pub fn created(&self) -> Option<ConnectorId> {
        match self {
            ConnectOutcome::Created(id) => Some(*id),
            _ => None,
        }
    }
}

impl ConnectorState {
    pub fn is_armed(&self) -> bool {
        matches!(self, ConnectorState::AwaitingTarget(_))
    }

    pub fn source(&self) -> Option<ItemId> {
        match self {
            ConnectorState::AwaitingTarget(source) => Some(*source),
            ConnectorState::Idle => None,
        }
    }

    /// Arm the gesture with `source`. Restarting replaces the source.
    pub fn start(&mut self, source: ItemId) {
        *self = ConnectorState::AwaitingTarget(source);
    }

    /// Complete the gesture on `target`. Always returns to `Idle`.
    pub fn finish(&mut self, target: ItemId) -> Finish {
        match std::mem::take(self) {
            ConnectorState::Idle => Finish::NotArmed,
            ConnectorState::AwaitingTarget(source) if source == target => Finish::SelfLoop,
            ConnectorState::AwaitingTarget(source) => Finish::Connect {
                from: source,
                to: target,
            },
        }
    }

    /// Drop an armed gesture. Returns true if one was armed.
    pub fn cancel(&mut self) -> bool {
        let armed = self.is_armed();
        *self = ConnectorState::Idle;
        armed
    }
}
