//! Context Cells
//!
//! A [`Context`] is a single mutable value with change notification, used to
//! publish an ambient value (a rendering device, a clock, the canvas size)
//! that many nodes read without being wired to it.
//!
//! # How Contexts Work
//!
//! 1. External code owns the producer side and calls [`Context::set`] or
//!    [`Context::trigger`].
//!
//! 2. `set` stores the value and notifies subscribers only if it differs from
//!    the previous one. `trigger` notifies unconditionally.
//!
//! 3. Node factories capture a clone of the context they need and read it
//!    with [`Context::get`]. Clones share one cell.
//!
//! 4. Anything that must react to a change (say, rebuilding a pipeline when
//!    the device is swapped) registers a callback with
//!    [`Context::subscribe`] and keeps the returned [`SubscriberId`] to
//!    unsubscribe.
//!
//! # Thread Safety
//!
//! The value and the subscriber list sit behind `parking_lot` locks.
//! Callbacks run after both locks are released, so a callback may read the
//! cell or (un)subscribe.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Handle returned by [`Context::subscribe`]. Unique across all contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback = Arc<dyn Fn() + Send + Sync>;

/// A shared, observable value cell.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::Context;
///
/// let device = Context::empty();
/// assert_eq!(device.get(), None);
///
/// device.set("gpu0");
/// assert_eq!(device.get(), Some("gpu0"));
/// ```
pub struct Context<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// The current value; `None` until first set.
    value: Arc<RwLock<Option<T>>>,

    subscribers: Arc<RwLock<Vec<(SubscriberId, Callback)>>>,
}

impl<T> Context<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a context holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(Some(value))),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a context with no value yet.
    pub fn empty() -> Self {
        Self {
            value: Arc::new(RwLock::new(None)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The last value set, if any.
    pub fn get(&self) -> Option<T> {
        self.value.read().clone()
    }

    /// Store `value`. Subscribers are notified only if it changed.
    ///
    /// Returns whether a notification was sent.
    pub fn set(&self, value: T) -> bool {
        {
            let mut guard = self.value.write();
            if guard.as_ref() == Some(&value) {
                return false;
            }
            *guard = Some(value);
        }

        self.notify_subscribers();
        true
    }

    /// Notify subscribers without changing the value.
    pub fn trigger(&self) {
        self.notify_subscribers();
    }

    /// Register a callback run on every update. Returns the id to pass to
    /// [`Context::unsubscribe`].
    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriberId::next();
        self.subscribers.write().push((id, Arc::new(notify)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered here.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(subscriber, _)| *subscriber != id);
        subscribers.len() != before
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    fn notify_subscribers(&self) {
        let snapshot: Vec<Callback> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, notify)| Arc::clone(notify))
            .collect();
        for notify in snapshot {
            notify();
        }
    }
}

impl<T> Clone for Context<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T> Default for Context<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Debug for Context<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
