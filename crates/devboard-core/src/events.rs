//! Change notifications for renderers and the persistence bridge.

use crate::model::{ConnectorId, ItemId};
use std::fmt;

/// Something observable changed on the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Boards, items or connectors changed. `revision` increases by one per change.
    DocumentChanged { revision: u64 },
    SelectionChanged {
        selected: Option<ItemId>,
        connector: Option<ConnectorId>,
    },
    HoverChanged { hovered: Option<ItemId> },
    ConnectorModeChanged { source: Option<ItemId> },
    CameraChanged,
}

/// Handle returned by [`Engine::subscribe`](crate::Engine::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&EngineEvent)>;

/// Ordered list of observer callbacks.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

impl Observers {
    pub fn subscribe(&mut self, callback: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Deliver `event` to every observer in subscription order.
    pub fn emit(&mut self, event: &EngineEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_and_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        let sink = Rc::clone(&seen);
        let id = observers.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        observers.emit(&EngineEvent::CameraChanged);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(&EngineEvent::CameraChanged);

        assert_eq!(seen.borrow().as_slice(), &[EngineEvent::CameraChanged]);
        assert!(observers.is_empty());
    }
}
