//! Asynchronous consumption of events.
//!
//! Dispatch stays synchronous: the stream is fed by an ordinary handler that
//! forwards an owned copy of each emitted value into an unbounded channel.

use crate::event::Event;
use crate::subscription::Subscription;
use crate::value::ReactiveValue;
use futures::channel::mpsc;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A stream of values emitted by an [`Event`].
///
/// Only values emitted after the stream was created are yielded. Dropping the
/// stream removes its handler. The stream ends once the event's registry is
/// gone or its handlers are cleared.
///
/// # Examples
///
/// ```rust
/// use futures::StreamExt;
/// use observable::ReactiveValue;
///
/// let value = ReactiveValue::<i32>::new(0);
/// let mut changes = value.changes();
/// value.set(1);
/// assert_eq!(futures::executor::block_on(changes.next()), Some(1));
/// ```
#[must_use = "streams do nothing unless polled"]
pub struct Changes<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    subscription: Subscription<T>,
}

impl<T: Clone + Send + 'static> Changes<T> {
    pub(crate) fn new(event: &Event<T>) -> Self {
        let (tx, receiver) = mpsc::unbounded::<T>();
        let subscription = event.subscribe(move |value| {
            // A closed receiver means the stream is being dropped.
            let _ = tx.unbounded_send(value.clone());
        });
        Self {
            receiver,
            subscription,
        }
    }
}

impl<T> Changes<T> {
    /// Stop receiving new values; already queued values are still yielded.
    pub fn close(&mut self) {
        self.subscription.reset();
        self.receiver.close();
    }
}

impl<T> Stream for Changes<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.receiver.size_hint()
    }
}

impl<T: Clone + Send + 'static> Event<T> {
    /// Stream every value emitted from now on.
    pub fn changes(&self) -> Changes<T> {
        Changes::new(self)
    }
}

impl<T: Clone + Send + 'static> ReactiveValue<T> {
    /// Stream every value this cell is set to from now on.
    pub fn changes(&self) -> Changes<T> {
        Changes::new(self.on_change())
    }
}
