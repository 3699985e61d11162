//! Mutable value cells that notify on every change.

use crate::computed::DerivedValue;
use crate::event::Event;
use crate::subscription::Subscription;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

struct ValueCell<T> {
    value: RwLock<Arc<T>>,
    on_change: Event<T>,
}

/// A reactive value holding a `T`.
///
/// Every [`set`](ReactiveValue::set) stores the new value and then emits it
/// on the value's change event. Cloning the handle shares the same cell.
///
/// # Examples
///
/// ```rust
/// use observable::ReactiveValue;
///
/// let name = ReactiveValue::<String>::new("unnamed");
/// let _sub = name.subscribe(|name| println!("renamed to {name}"));
/// name.set("config.toml");
/// assert_eq!(*name.get(), "config.toml");
/// ```
pub struct ReactiveValue<T> {
    cell: Arc<ValueCell<T>>,
}

impl<T> Clone for ReactiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> ReactiveValue<T> {
    /// Create a value cell from anything convertible into `T`.
    pub fn new(value: impl Into<T>) -> Self {
        Self {
            cell: Arc::new(ValueCell {
                value: RwLock::new(Arc::new(value.into())),
                on_change: Event::new(),
            }),
        }
    }

    /// Get the current value.
    ///
    /// The returned `Arc` keeps this value alive even if the cell is set again.
    pub fn get(&self) -> Arc<T> {
        self.cell.value.read().clone()
    }

    /// Get a clone of the current value.
    pub fn get_cloned(&self) -> T
    where
        T: Clone,
    {
        (*self.get()).clone()
    }

    /// Read the current value with a closure.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.get())
    }

    /// Replace the value and notify handlers with it.
    ///
    /// No lock is held while handlers run, so they may read or set any value,
    /// including this one.
    pub fn set(&self, value: impl Into<T>) {
        let value = Arc::new(value.into());
        *self.cell.value.write() = value.clone();
        self.cell.on_change.emit(&value);
    }

    /// Set the value only if it differs from the current one.
    ///
    /// Returns true if the value was updated.
    pub fn set_if_changed(&self, value: impl Into<T>) -> bool
    where
        T: PartialEq,
    {
        let value = value.into();
        let should_update = self.with(|current| current != &value);
        if should_update {
            self.set(value);
        }
        should_update
    }

    /// Update a copy of the current value with a closure, then set it.
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut value = self.get_cloned();
        f(&mut value);
        self.set(value);
    }

    /// The event fired after every change.
    pub fn on_change(&self) -> &Event<T> {
        &self.cell.on_change
    }

    /// Subscribe to changes of this value.
    #[must_use = "dropping the subscription removes the handler immediately"]
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        self.cell.on_change.subscribe(handler)
    }

    /// Derive a new value from this one.
    pub fn map<U, F>(&self, f: F) -> DerivedValue<U>
    where
        T: Send + Sync + 'static,
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        DerivedValue::map(self, f)
    }

    /// Create a weak handle that does not keep the cell alive.
    pub fn downgrade(&self) -> WeakValue<T> {
        WeakValue {
            cell: Arc::downgrade(&self.cell),
        }
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl ReactiveValue<bool> {
    /// Toggle the boolean value.
    pub fn toggle(&self) {
        self.update(|v| *v = !*v);
    }
}

impl<T: Default> Default for ReactiveValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveValue")
            .field("value", &self.get())
            .finish()
    }
}

/// A non-owning handle to a [`ReactiveValue`].
pub struct WeakValue<T> {
    cell: Weak<ValueCell<T>>,
}

impl<T> WeakValue<T> {
    /// Get a strong handle if the value is still alive.
    pub fn upgrade(&self) -> Option<ReactiveValue<T>> {
        self.cell.upgrade().map(|cell| ReactiveValue { cell })
    }
}

impl<T> Clone for WeakValue<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for WeakValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakValue")
            .field("alive", &(self.cell.strong_count() > 0))
            .finish()
    }
}
