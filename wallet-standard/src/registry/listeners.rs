//! Identity-keyed listener lists.
//!
//! Listeners are stored per event, in subscription order, under an opaque
//! [`ListenerId`]. Removal goes by id, never by comparing closures, so the
//! same closure can be subscribed twice and each subscription removed on its
//! own.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::WalletError;

/// Receives errors that are isolated instead of returned, such as a panicking
/// listener.
pub type ErrorHandler = Arc<dyn Fn(&WalletError) + Send + Sync>;

/// Error handler that logs through `tracing`.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|error: &WalletError| {
        tracing::error!(code = ?error.code(), "{}", error);
    })
}

/// Opaque token identifying one subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered listeners keyed by event.
pub struct ListenerSet<E, L: ?Sized> {
    next_id: u64,
    by_event: HashMap<E, Vec<(ListenerId, Arc<L>)>>,
}

impl<E, L> ListenerSet<E, L>
where
    E: Copy + Eq + Hash,
    L: ?Sized,
{
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_event: HashMap::new(),
        }
    }

    /// Append `listener` to the end of `event`'s list.
    pub fn insert(&mut self, event: E, listener: Arc<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_event.entry(event).or_default().push((id, listener));
        id
    }

    /// Remove the subscription `id`. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for listeners in self.by_event.values_mut() {
            if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Copy of `event`'s listeners, in subscription order.
    pub fn snapshot(&self, event: E) -> Vec<Arc<L>> {
        self.by_event
            .get(&event)
            .map(|listeners| listeners.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of listeners subscribed to `event`.
    pub fn len(&self, event: E) -> usize {
        self.by_event.get(&event).map_or(0, Vec::len)
    }

    /// True when no listener is subscribed to any event.
    pub fn is_empty(&self) -> bool {
        self.by_event.values().all(Vec::is_empty)
    }
}

impl<E, L> Default for ListenerSet<E, L>
where
    E: Copy + Eq + Hash,
    L: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that removes one subscription.
///
/// Calling it more than once is a no-op. Dropping it does *not* unsubscribe.
/// It holds only a weak reference to the listener list, so it never keeps the
/// owner alive.
#[derive(Clone)]
pub struct Unsubscribe {
    inner: Arc<dyn Fn() + Send + Sync>,
}

impl Unsubscribe {
    pub(crate) fn new<E, L>(set: &Arc<Mutex<ListenerSet<E, L>>>, id: ListenerId) -> Self
    where
        E: Copy + Eq + Hash + Send + 'static,
        L: ?Sized + Send + Sync + 'static,
    {
        let set: Weak<Mutex<ListenerSet<E, L>>> = Arc::downgrade(set);
        Self {
            inner: Arc::new(move || {
                if let Some(set) = set.upgrade() {
                    set.lock().remove(id);
                }
            }),
        }
    }

    /// Remove the subscription.
    pub fn call(&self) {
        (self.inner)();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unsubscribe(..)")
    }
}

/// Run `f`, turning a panic into a [`WalletError::Listener`] reported to `handler`.
///
/// A panicking `handler` is contained as well and logged instead.
pub(crate) fn invoke_isolated(context: &str, handler: &ErrorHandler, f: impl FnOnce()) {
    let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) else {
        return;
    };
    let err = WalletError::listener(context, panic_message(payload.as_ref()));
    if let Err(handler_payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(&err))) {
        tracing::error!(
            error = %err,
            handler_panic = %panic_message(handler_payload.as_ref()),
            "registry error handler panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
