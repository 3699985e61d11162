//! Handler registry shared by an event and its subscriptions.
//!
//! Handlers live in a slot map keyed by generational ids, so a subscription
//! holding a stale id can never remove a handler registered later into the
//! same slot. A separate list keeps registration order for dispatch.

use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

new_key_type! {
    /// Identifies one registered handler within its registry.
    pub struct HandlerId;
}

/// A registered callback.
pub(crate) type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handlers of one event, in registration order.
pub(crate) struct Registry<T: ?Sized> {
    handlers: SlotMap<HandlerId, Handler<T>>,
    order: Vec<HandlerId>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a handler and return its freshly minted id.
    pub fn insert(&mut self, handler: Handler<T>) -> HandlerId {
        let id = self.handlers.insert(handler);
        self.order.push(id);
        tracing::trace!(?id, handlers = self.order.len(), "handler registered");
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    ///
    /// Returns true if a handler was removed.
    pub fn remove(&mut self, id: HandlerId) -> bool {
        if self.handlers.remove(id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        tracing::trace!(?id, handlers = self.order.len(), "handler removed");
        true
    }

    pub fn clear(&mut self) {
        let removed = self.order.len();
        self.handlers.clear();
        self.order.clear();
        tracing::trace!(removed, "handlers cleared");
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Copy the current handlers in registration order.
    pub fn snapshot(&self) -> Vec<Handler<T>> {
        self.order
            .iter()
            .filter_map(|id| self.handlers.get(*id).cloned())
            .collect()
    }
}
