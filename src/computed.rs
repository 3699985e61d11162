//! Values derived from other reactive values.

use crate::subscription::AnySubscription;
use crate::value::ReactiveValue;
use parking_lot::Mutex;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A reactive value computed from one or more other reactive values.
///
/// The value is computed once on construction and again, synchronously,
/// every time one of its dependencies is set. Each recomputation reads the
/// current value of every dependency and sets the derived value, which in
/// turn notifies its own subscribers. Changes to several dependencies are
/// not batched: every change triggers its own recomputation.
///
/// Dependencies are held weakly. Once a dependency has been dropped, later
/// recomputations use the last value seen from it, so the remaining
/// dependencies keep updating the derived value.
///
/// A `DerivedValue` dereferences to the [`ReactiveValue`] holding its result.
/// Dropping it releases its subscriptions to the dependencies.
///
/// # Examples
///
/// ```rust
/// use observable::{DerivedValue, ReactiveValue};
///
/// let width = ReactiveValue::<u32>::new(2u32);
/// let height = ReactiveValue::<u32>::new(3u32);
/// let area = DerivedValue::map2(&width, &height, |w, h| w * h);
/// assert_eq!(*area.get(), 6);
///
/// width.set(10u32);
/// assert_eq!(*area.get(), 30);
/// ```
pub struct DerivedValue<T> {
    dependencies: Vec<AnySubscription>,
    value: ReactiveValue<T>,
}

impl<T: Send + Sync + 'static> DerivedValue<T> {
    fn with_dependencies(
        initial: T,
        recompute: impl Fn() -> T + Send + Sync + 'static,
        subscribe: impl FnOnce(Arc<dyn Fn() + Send + Sync>) -> Vec<AnySubscription>,
    ) -> Self {
        let value = ReactiveValue::<T>::new(initial);
        let target = value.downgrade();
        let on_change: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
            if let Some(target) = target.upgrade() {
                target.set(recompute());
            }
        });

        Self {
            dependencies: subscribe(on_change),
            value,
        }
    }
}

macro_rules! derived_constructors {
    ($($(#[$meta:meta])* $name:ident($($dep:ident $var:ident $idx:tt),+);)+) => {
        impl<T: Send + Sync + 'static> DerivedValue<T> {
            $(
                $(#[$meta])*
                pub fn $name<$($dep,)+ F>($($var: &ReactiveValue<$dep>,)+ compute: F) -> Self
                where
                    $($dep: Send + Sync + 'static,)+
                    F: Fn($(&$dep),+) -> T + Send + Sync + 'static,
                {
                    let last_seen = ($($var.get(),)+);
                    let initial = compute($(&*last_seen.$idx),+);
                    let weak = ($($var.downgrade(),)+);
                    let last_seen = Mutex::new(last_seen);
                    let recompute = move || {
                        let values = {
                            let mut last_seen = last_seen.lock();
                            $(
                                match weak.$idx.upgrade() {
                                    Some(dependency) => last_seen.$idx = dependency.get(),
                                    None => tracing::debug!(
                                        dependency = $idx,
                                        "dependency dropped, using its last value"
                                    ),
                                }
                            )+
                            (*last_seen).clone()
                        };
                        compute($(&*values.$idx),+)
                    };

                    Self::with_dependencies(initial, recompute, |on_change| {
                        vec![$({
                            let on_change = on_change.clone();
                            $var.subscribe(move |_| on_change()).into()
                        }),+]
                    })
                }
            )+
        }
    };
}

derived_constructors! {
    /// Derive a value from one dependency.
    map(A a 0);
    /// Derive a value from two dependencies.
    map2(A a 0, B b 1);
    /// Derive a value from three dependencies.
    map3(A a 0, B b 1, C c 2);
    /// Derive a value from four dependencies.
    map4(A a 0, B b 1, C c 2, D d 3);
    /// Derive a value from five dependencies.
    map5(A a 0, B b 1, C c 2, D d 3, E e 4);
    /// Derive a value from six dependencies.
    map6(A a 0, B b 1, C c 2, D d 3, E e 4, G g 5);
}

impl<T> DerivedValue<T> {
    /// Get a handle to the underlying value.
    ///
    /// The handle stops receiving recomputed values once this
    /// `DerivedValue` is dropped.
    pub fn value(&self) -> ReactiveValue<T> {
        self.value.clone()
    }

    /// Number of dependencies this value is subscribed to.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }
}

impl<T> Deref for DerivedValue<T> {
    type Target = ReactiveValue<T>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for DerivedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedValue")
            .field("value", &self.value.get())
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}
