//! Registry commands.
//!
//! A [`Command`] is one request sent through `push`. The wire tags are
//! `"get"`, `"register"` and `"on"`; anything else is kept as
//! [`Command::Unknown`] so that newer senders never break older registries.

use std::fmt;
use std::sync::Arc;

use super::listeners::Unsubscribe;
use crate::wallet::WalletHandle;

/// Receives a copy of the registered wallets.
pub type GetCallback = Box<dyn FnOnce(Vec<WalletHandle>) + Send>;

/// Notified with the wallets added by each `Register` command.
pub type RegisterListener = dyn Fn(&[WalletHandle]) + Send + Sync;

/// Receives the unsubscribe handle of a new subscription.
pub type UnsubscribeCallback = Box<dyn FnOnce(Unsubscribe) + Send>;

/// Events the registry dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistryEvent {
    /// One or more wallets were registered.
    Register,
}

impl RegistryEvent {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
        }
    }

    /// Parse a wire name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "register" => Some(Self::Register),
            _ => None,
        }
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the registry. Consumed exactly once.
pub enum Command {
    /// Request the current wallet list.
    Get {
        /// Called with a snapshot of the registered wallets.
        callback: GetCallback,
    },
    /// Announce one or more wallets.
    Register {
        /// Wallets to append, in order.
        wallets: Vec<WalletHandle>,
    },
    /// Subscribe to an event.
    On {
        /// Event to subscribe to.
        event: RegistryEvent,
        /// Listener to add.
        listener: Arc<RegisterListener>,
        /// Called with the handle that removes `listener`.
        callback: UnsubscribeCallback,
    },
    /// A command this registry does not understand.
    Unknown {
        /// The unrecognised wire tag.
        method: String,
    },
}

impl Command {
    /// Build a `get` command.
    pub fn get(callback: impl FnOnce(Vec<WalletHandle>) + Send + 'static) -> Self {
        Self::Get {
            callback: Box::new(callback),
        }
    }

    /// Build a `register` command.
    pub fn register(wallets: impl IntoIterator<Item = WalletHandle>) -> Self {
        Self::Register {
            wallets: wallets.into_iter().collect(),
        }
    }

    /// Build an `on` command.
    pub fn on(
        event: RegistryEvent,
        listener: impl Fn(&[WalletHandle]) + Send + Sync + 'static,
        callback: impl FnOnce(Unsubscribe) + Send + 'static,
    ) -> Self {
        Self::On {
            event,
            listener: Arc::new(listener),
            callback: Box::new(callback),
        }
    }

    /// Build an `on` command for an existing listener handle.
    ///
    /// Subscribing the same `Arc` twice creates two independent subscriptions.
    pub fn on_shared(
        event: RegistryEvent,
        listener: Arc<RegisterListener>,
        callback: impl FnOnce(Unsubscribe) + Send + 'static,
    ) -> Self {
        Self::On {
            event,
            listener,
            callback: Box::new(callback),
        }
    }

    /// Build a command with an arbitrary wire tag.
    pub fn unknown(method: impl Into<String>) -> Self {
        Self::Unknown {
            method: method.into(),
        }
    }

    /// Wire tag of the command.
    pub fn method(&self) -> &str {
        match self {
            Self::Get { .. } => "get",
            Self::Register { .. } => "register",
            Self::On { .. } => "on",
            Self::Unknown { method } => method,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get { .. } => f.debug_struct("Get").finish_non_exhaustive(),
            Self::Register { wallets } => f
                .debug_struct("Register")
                .field(
                    "wallets",
                    &wallets.iter().map(|w| w.name().to_string()).collect::<Vec<_>>(),
                )
                .finish(),
            Self::On { event, .. } => f
                .debug_struct("On")
                .field("event", event)
                .finish_non_exhaustive(),
            Self::Unknown { method } => f.debug_struct("Unknown").field("method", method).finish(),
        }
    }
}
