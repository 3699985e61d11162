//! Typed multi-subscriber events.

use crate::registry::{Handler, Registry};
use crate::subscription::Subscription;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A notification channel delivering `&T` to every registered handler.
///
/// Cloning an `Event` yields another handle to the same handler registry.
/// The registry lives as long as any handle does; subscriptions only refer
/// to it weakly and become inert once it is gone.
///
/// Events with several arguments use a tuple for `T`.
///
/// # Examples
///
/// ```rust
/// use observable::Event;
///
/// let resized: Event<(u32, u32)> = Event::new();
/// let subscription = resized.subscribe(|(w, h)| println!("{w}x{h}"));
/// resized.emit(&(800, 600));
/// drop(subscription);
/// assert_eq!(resized.handler_count(), 0);
/// ```
pub struct Event<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T: ?Sized> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Event<T> {
    /// Create an event with its own empty registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register a handler and return the subscription that owns it.
    ///
    /// The handler stays registered until the subscription is reset or
    /// dropped, or until [`Event::clear_handlers`] runs.
    #[must_use = "dropping the subscription removes the handler immediately"]
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let id = self.registry.lock().insert(Arc::new(handler));
        Subscription::new(Arc::downgrade(&self.registry), id)
    }

    /// Register a handler that can only be removed by [`Event::clear_handlers`].
    pub fn connect(&self, handler: impl Fn(&T) + Send + Sync + 'static) {
        self.registry.lock().insert(Arc::new(handler));
    }

    /// Call every handler registered at the time of the call.
    ///
    /// The handler list is copied before dispatch and the lock released, so
    /// handlers may subscribe or unsubscribe on this same event. A handler
    /// added during dispatch first runs on the next `emit`; a handler removed
    /// during dispatch still runs once in the current one.
    ///
    /// A panicking handler unwinds out of `emit` and the remaining handlers
    /// of this dispatch are skipped.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = self.registry.lock().snapshot();
        tracing::trace!(handlers = handlers.len(), "emitting event");
        for handler in handlers {
            handler(value);
        }
    }

    /// Remove every handler, including those added through [`Event::connect`].
    ///
    /// Outstanding subscriptions turn into no-ops.
    pub fn clear_handlers(&self) {
        self.registry.lock().clear();
    }

    /// Number of registered handlers.
    ///
    /// Other threads may change this at any moment; use it for diagnostics only.
    pub fn handler_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Whether both handles share the same registry.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }
}

impl<T: ?Sized> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::thread;

    fn counter() -> (Arc<Mutex<usize>>, impl Fn(&i32) + Send + Sync + 'static) {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        (count, move |_: &i32| *count_clone.lock() += 1)
    }

    #[test]
    fn test_emit_reaches_all_handlers_in_order() {
        let event = Event::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _subs: Vec<_> = (0..3)
            .map(|tag| {
                let log = log.clone();
                event.subscribe(move |value: &i32| log.lock().push((tag, *value)))
            })
            .collect();

        event.emit(&5);
        assert_eq!(*log.lock(), vec![(0, 5), (1, 5), (2, 5)]);
    }

    #[test]
    fn test_clones_share_handlers() {
        let event = Event::new();
        let other = event.clone();
        let (count, handler) = counter();
        let _sub = event.subscribe(handler);

        other.emit(&1);
        assert_eq!(*count.lock(), 1);
        assert_eq!(other.handler_count(), 1);
        assert!(event.is_same(&other));
        assert!(!event.is_same(&Event::new()));
    }

    #[test]
    fn test_dropping_subscription_removes_handler() {
        let event = Event::new();
        let (count, handler) = counter();
        let sub = event.subscribe(handler);

        event.emit(&1);
        drop(sub);
        event.emit(&2);

        assert_eq!(*count.lock(), 1);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn test_connect_survives_until_clear() {
        let event = Event::new();
        let (count, handler) = counter();
        event.connect(handler);

        event.emit(&1);
        event.emit(&2);
        assert_eq!(*count.lock(), 2);

        event.clear_handlers();
        event.emit(&3);
        assert_eq!(*count.lock(), 2);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn test_clear_makes_subscriptions_inert() {
        let event = Event::new();
        let (count, handler) = counter();
        let mut sub = event.subscribe(handler);
        let (other_count, other_handler) = counter();

        event.clear_handlers();
        let _other = event.subscribe(other_handler);
        sub.reset();

        event.emit(&1);
        assert_eq!(*count.lock(), 0);
        assert_eq!(*other_count.lock(), 1);
        assert_eq!(event.handler_count(), 1);
    }

    #[test]
    fn test_handler_added_during_emit_runs_next_time() {
        let event: Event<i32> = Event::new();
        let (count, late_handler) = counter();
        let late_handler = Arc::new(late_handler);
        let added = Arc::new(Mutex::new(Vec::new()));

        let _adder = event.subscribe({
            let event = event.clone();
            let added = added.clone();
            move |_| {
                if added.lock().is_empty() {
                    let late_handler = late_handler.clone();
                    let sub = event.subscribe(move |value| late_handler(value));
                    added.lock().push(sub);
                }
            }
        });

        event.emit(&1);
        assert_eq!(*count.lock(), 0);
        assert_eq!(event.handler_count(), 2);

        event.emit(&2);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_handler_removed_during_emit_still_runs_once() {
        let event: Event<i32> = Event::new();
        let (count, handler) = counter();
        let victim = Arc::new(Mutex::new(Subscription::default()));

        let _remover = event.subscribe({
            let victim = victim.clone();
            move |_| victim.lock().reset()
        });
        *victim.lock() = event.subscribe(handler);

        event.emit(&1);
        assert_eq!(*count.lock(), 1);
        assert_eq!(event.handler_count(), 1);

        event.emit(&2);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_panicking_handler_stops_dispatch() {
        let event: Event<i32> = Event::new();
        let (before, before_handler) = counter();
        let (after, after_handler) = counter();
        let _before = event.subscribe(before_handler);
        let _panics = event.subscribe(|value| {
            if *value < 0 {
                panic!("negative value");
            }
        });
        let _after = event.subscribe(after_handler);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| event.emit(&-1)));
        assert!(result.is_err());
        assert_eq!(*before.lock(), 1);
        assert_eq!(*after.lock(), 0);

        // The registry is still usable after the unwind.
        event.emit(&1);
        assert_eq!(*before.lock(), 2);
        assert_eq!(*after.lock(), 1);
    }

    #[test]
    fn test_concurrent_subscribe() {
        const THREADS: usize = 8;
        let event: Event<i32> = Event::new();
        let count = Arc::new(Mutex::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let event = event.clone();
                let count = count.clone();
                thread::spawn(move || event.subscribe(move |_| *count.lock() += 1))
            })
            .collect();
        let mut subs: Vec<Subscription<i32>> = handles
            .into_iter()
            .map(|handle| handle.join().expect("subscriber thread panicked"))
            .collect();

        assert_eq!(event.handler_count(), THREADS);
        event.emit(&0);
        assert_eq!(*count.lock(), THREADS);

        for (removed, sub) in subs.iter_mut().enumerate() {
            sub.reset();
            assert_eq!(event.handler_count(), THREADS - removed - 1);
        }
    }

    #[test]
    fn test_unsized_payload() {
        let event: Event<str> = Event::new();
        let seen = Arc::new(Mutex::new(String::new()));
        let _sub = event.subscribe({
            let seen = seen.clone();
            move |text: &str| seen.lock().push_str(text)
        });

        event.emit("hello");
        assert_eq!(*seen.lock(), "hello");
    }
}
