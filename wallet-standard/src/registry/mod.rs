//! Race-free wallet discovery.
//!
//! Wallets and applications talk to each other through a single shared
//! [`DiscoverySlot`]. Anyone may [`push`](DiscoverySlot::push) commands at any
//! time. Until a wallet bootstraps, commands are buffered; the first
//! bootstrap installs the [`Registry`] and replays the buffer in arrival order,
//! so no command is lost or reordered regardless of who loads first.
//!
//! # Example
//!
//! ```ignore
//! use wallet_standard::registry::{self, Command, RegistryEvent};
//!
//! // An application may subscribe before any wallet has loaded.
//! registry::global::push([Command::on(
//!     RegistryEvent::Register,
//!     |wallets| println!("{} new wallet(s)", wallets.len()),
//!     |_unsubscribe| {},
//! )]);
//!
//! // Each wallet registers itself when it loads.
//! registry::global::initialize([my_wallet]);
//! ```

mod command;
mod dispatcher;
pub mod global;
mod listeners;
mod slot;

pub use command::{Command, GetCallback, RegisterListener, RegistryEvent, UnsubscribeCallback};
pub use dispatcher::Registry;
pub use listeners::{default_error_handler, ErrorHandler, ListenerId, ListenerSet, Unsubscribe};
pub use slot::DiscoverySlot;

pub(crate) use listeners::invoke_isolated;
