//! # Observable
//!
//! Typed events and reactive values for propagating state changes.
//!
//! ## Features
//!
//! - **Events**: [`Event<T>`] delivers `&T` to every registered handler, synchronously
//!   and in registration order
//! - **Scoped subscriptions**: dropping a [`Subscription`] removes its handler
//! - **Type erasure**: [`AnySubscription`] stores subscriptions to events of any type
//! - **Reactive values**: [`ReactiveValue`] emits its new value on every change
//! - **Derived values**: [`DerivedValue`] recomputes whenever a dependency changes
//! - **Thread safe**: handlers can be added, removed and emitted from any thread
//!
//! ## Example
//!
//! ```rust
//! use observable::prelude::*;
//!
//! let a = ReactiveValue::<i32>::new(2);
//! let b = ReactiveValue::<i32>::new(3);
//! let sum = DerivedValue::map2(&a, &b, |a, b| a + b);
//!
//! let _sub = sum.subscribe(|sum| println!("sum is now {sum}"));
//! a.set(10);
//! assert_eq!(*sum.get(), 13);
//! ```

mod computed;
mod event;
mod registry;
#[cfg(feature = "stream")]
mod stream;
mod subscription;
mod value;

pub use computed::DerivedValue;
pub use event::Event;
#[cfg(feature = "stream")]
pub use stream::Changes;
pub use subscription::{AnySubscription, Release, Subscription};
pub use value::{ReactiveValue, WeakValue};

// Re-export the prelude
pub mod prelude {
    pub use crate::{AnySubscription, DerivedValue, Event, ReactiveValue, Subscription};
}
