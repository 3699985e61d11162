//! Scoped ownership of registered handlers.

use crate::event::Event;
use crate::registry::{HandlerId, Registry};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Weak;

/// Owns the right to remove one handler from an [`Event`].
///
/// Dropping the subscription removes the handler. Subscriptions cannot be
/// cloned: exactly one owner may remove a given handler. They only hold a
/// weak reference to the event's registry, so they never keep it alive and
/// are safe to drop after every event handle is gone.
#[must_use = "dropping the subscription removes the handler immediately"]
pub struct Subscription<T: ?Sized> {
    registry: Weak<Mutex<Registry<T>>>,
    id: Option<HandlerId>,
}

impl<T: ?Sized> Subscription<T> {
    pub(crate) fn new(registry: Weak<Mutex<Registry<T>>>, id: HandlerId) -> Self {
        Self {
            registry,
            id: Some(id),
        }
    }

    /// Remove the owned handler, if any, and leave the subscription empty.
    ///
    /// Calling this on an empty subscription does nothing.
    pub fn reset(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(registry) = self.registry.upgrade() {
                registry.lock().remove(id);
            }
        }
        self.registry = Weak::new();
    }

    /// Release the current handler, then subscribe `handler` to `event`.
    pub fn observe(&mut self, event: &Event<T>, handler: impl Fn(&T) + Send + Sync + 'static) {
        self.reset();
        *self = event.subscribe(handler);
    }

    /// Give up the removal right, leaving the handler registered.
    ///
    /// The handler can then only be removed by [`Event::clear_handlers`].
    pub fn detach(mut self) {
        self.id = None;
    }

    /// Whether this subscription currently owns a handler.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl<T: ?Sized> Default for Subscription<T> {
    fn default() -> Self {
        Self {
            registry: Weak::new(),
            id: None,
        }
    }
}

impl<T: ?Sized> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Capability shared by subscriptions of every event type.
pub trait Release: Send {
    /// Remove the owned handler, if any.
    fn release(&mut self);

    /// Whether a handler is still owned.
    fn is_active(&self) -> bool;
}

impl<T: ?Sized + 'static> Release for Subscription<T> {
    fn release(&mut self) {
        self.reset();
    }

    fn is_active(&self) -> bool {
        Subscription::is_active(self)
    }
}

/// A subscription to an event of any type.
///
/// Lets one collection hold subscriptions to events with different payloads.
///
/// # Examples
///
/// ```rust
/// use observable::{AnySubscription, Event};
///
/// let names: Event<String> = Event::new();
/// let sizes: Event<usize> = Event::new();
///
/// let subscriptions: Vec<AnySubscription> = vec![
///     names.subscribe(|name| println!("{name}")).into(),
///     sizes.subscribe(|size| println!("{size}")).into(),
/// ];
/// assert!(subscriptions.iter().all(AnySubscription::is_active));
/// ```
#[derive(Default)]
#[must_use = "dropping the subscription removes the handler immediately"]
pub struct AnySubscription {
    inner: Option<Box<dyn Release>>,
}

impl AnySubscription {
    /// Remove the owned handler, if any, and leave the subscription empty.
    pub fn reset(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.release();
        }
    }

    /// Release the current handler, then subscribe `handler` to `event`.
    pub fn observe<T: ?Sized + 'static>(
        &mut self,
        event: &Event<T>,
        handler: impl Fn(&T) + Send + Sync + 'static,
    ) {
        self.reset();
        *self = event.subscribe(handler).into();
    }

    /// Whether this subscription currently owns a handler.
    pub fn is_active(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_active())
    }
}

impl<T: ?Sized + 'static> From<Subscription<T>> for AnySubscription {
    fn from(subscription: Subscription<T>) -> Self {
        Self {
            inner: Some(Box::new(subscription)),
        }
    }
}

impl fmt::Debug for AnySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnySubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
