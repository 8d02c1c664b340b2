//! Test utilities for wallet and registry testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wallet_standard::registry::{Command, DiscoverySlot, RegistryEvent};
//! use wallet_standard::test_utils::{recording_listener, test_wallet, wallet_names};
//!
//! let slot = DiscoverySlot::new();
//! let (listener, calls) = recording_listener();
//! slot.push([Command::on_shared(RegistryEvent::Register, listener, |_| {})]);
//!
//! wallet_standard::bootstrap::initialize(&slot, [test_wallet("W1")]);
//! assert_eq!(*calls.lock(), vec![vec!["W1".to_string()]]);
//! ```

mod assertions;
mod fixtures;

pub use fixtures::{
    collecting_error_handler, recording_listener, test_account, test_account_with_submitter,
    test_wallet, wallet_names, wallet_with_accounts, RecordedCalls, TEST_ICON,
};

pub use assertions::{assert_authentication_failed, assert_submission_failed, assert_wallets};
