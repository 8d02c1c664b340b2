//! The wallet registry.
//!
//! # Thread Safety
//!
//! Every [`Registry::push`] runs under one reentrant dispatch lock, so pushes
//! from different threads are processed one after another in lock order, and
//! a callback that pushes again from inside a dispatch is processed
//! immediately, nested in the outer dispatch. The wallet list and listener
//! lists sit behind their own locks, which are never held while user code
//! runs.

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};

use super::command::{Command, RegisterListener, RegistryEvent};
use super::listeners::{
    default_error_handler, invoke_isolated, ErrorHandler, ListenerSet, Unsubscribe,
};
use crate::wallet::WalletHandle;
use crate::WalletError;

/// Registered wallets plus the listeners waiting for new ones.
///
/// Wallets are kept in registration order. Registering the same wallet twice
/// yields two entries.
pub struct Registry {
    dispatch: ReentrantMutex<()>,
    wallets: Mutex<Vec<WalletHandle>>,
    listeners: Arc<Mutex<ListenerSet<RegistryEvent, RegisterListener>>>,
    error_handler: ErrorHandler,
}

impl Registry {
    /// Create an empty registry that logs isolated errors.
    pub fn new() -> Self {
        Self::with_error_handler(default_error_handler())
    }

    /// Create an empty registry reporting isolated errors to `handler`.
    pub fn with_error_handler(handler: ErrorHandler) -> Self {
        Self {
            dispatch: ReentrantMutex::new(()),
            wallets: Mutex::new(Vec::new()),
            listeners: Arc::new(Mutex::new(ListenerSet::new())),
            error_handler: handler,
        }
    }

    /// Process `commands` in order.
    ///
    /// Never fails: unknown commands are skipped and panicking callbacks are
    /// reported to the error handler.
    pub fn push(&self, commands: impl IntoIterator<Item = Command>) {
        let _guard = self.dispatch.lock();
        for command in commands {
            self.dispatch_one(command);
        }
    }

    /// Copy of the registered wallets.
    pub fn wallets(&self) -> Vec<WalletHandle> {
        self.wallets.lock().clone()
    }

    /// Number of listeners subscribed to `event`.
    pub fn listener_count(&self, event: RegistryEvent) -> usize {
        self.listeners.lock().len(event)
    }

    /// Hold the dispatch lock so nothing else can push until the guard drops.
    pub(crate) fn lock_dispatch(&self) -> ReentrantMutexGuard<'_, ()> {
        self.dispatch.lock()
    }

    fn dispatch_one(&self, command: Command) {
        tracing::debug!(method = command.method(), "dispatching registry command");

        match command {
            Command::Get { callback } => {
                let wallets = self.wallets();
                invoke_isolated("get callback", &self.error_handler, move || {
                    callback(wallets)
                });
            }
            Command::Register { wallets } => self.register(wallets),
            Command::On {
                event,
                listener,
                callback,
            } => {
                let id = self.listeners.lock().insert(event, listener);
                let unsubscribe = Unsubscribe::new(&self.listeners, id);
                invoke_isolated("on callback", &self.error_handler, move || {
                    callback(unsubscribe)
                });
            }
            Command::Unknown { method } => {
                let error = WalletError::Protocol(format!("unknown command method '{}'", method));
                tracing::warn!(%method, "ignoring registry command: {}", error);
            }
        }
    }

    fn register(&self, wallets: Vec<WalletHandle>) {
        self.wallets.lock().extend(wallets.iter().cloned());

        let listeners = self.listeners.lock().snapshot(RegistryEvent::Register);
        for listener in listeners {
            invoke_isolated("register listener", &self.error_handler, || {
                listener(wallets.as_slice())
            });
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("wallets", &self.wallets.lock().len())
            .field("listeners", &self.listener_count(RegistryEvent::Register))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_wallets, recording_listener, test_wallet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_returns_copy() {
        let registry = Registry::new();
        registry.push([Command::register([test_wallet("W1")])]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry.push([Command::get(move |mut wallets| {
            wallets.clear();
            sink.lock().push(wallets.len());
        })]);

        assert_eq!(*seen.lock(), vec![0]);
        assert_eq!(registry.wallets().len(), 1);
    }

    #[test]
    fn test_register_appends_duplicates() {
        let registry = Registry::new();
        let wallet = test_wallet("W1");
        registry.push([Command::register([wallet.clone()])]);
        registry.push([Command::register([wallet])]);
        assert_wallets(&registry.wallets(), &["W1", "W1"]);
    }

    #[test]
    fn test_listener_sees_only_new_wallets() {
        let registry = Registry::new();
        registry.push([Command::register([test_wallet("W1")])]);

        let (listener, calls) = recording_listener();
        registry.push([Command::on_shared(RegistryEvent::Register, listener, |_| {})]);
        registry.push([Command::register([test_wallet("W2"), test_wallet("W3")])]);

        assert_eq!(*calls.lock(), vec![vec!["W2".to_string(), "W3".to_string()]]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = errors.clone();
        let registry = Registry::with_error_handler(Arc::new(move |_: &WalletError| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let (listener, calls) = recording_listener();
        registry.push([
            Command::on(RegistryEvent::Register, |_| panic!("listener failed"), |_| {}),
            Command::on_shared(RegistryEvent::Register, listener, |_| {}),
            Command::register([test_wallet("W1")]),
        ]);

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn test_panicking_error_handler_does_not_escape_push() {
        let registry =
            Registry::with_error_handler(Arc::new(|_: &WalletError| panic!("handler failed")));
        let (listener, calls) = recording_listener();

        let pushed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.push([
                Command::on(RegistryEvent::Register, |_| panic!("listener failed"), |_| {}),
                Command::on_shared(RegistryEvent::Register, listener, |_| {}),
                Command::register([test_wallet("W1")]),
            ]);
        }));

        assert!(pushed.is_ok());
        assert_eq!(*calls.lock(), vec![vec!["W1".to_string()]]);
    }

    #[test]
    fn test_unknown_command_ignored() {
        let registry = Registry::new();
        registry.push([
            Command::unknown("off"),
            Command::register([test_wallet("W1")]),
        ]);
        assert_eq!(registry.wallets().len(), 1);
    }

    #[test]
    fn test_reentrant_push_from_callback() {
        let registry = Arc::new(Registry::new());
        let inner = registry.clone();
        registry.push([Command::get(move |_| {
            inner.push([Command::register([test_wallet("nested")])]);
        })]);
        assert_wallets(&registry.wallets(), &["nested"]);
    }
}
