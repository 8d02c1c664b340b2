//! The process-wide discovery slot.
//!
//! Every wallet and application in the process shares this one slot. It is
//! created on first use, already holding an empty command buffer.

use std::sync::{Arc, OnceLock};

use super::command::Command;
use super::dispatcher::Registry;
use super::slot::DiscoverySlot;
use crate::wallet::WalletHandle;

static GLOBAL_SLOT: OnceLock<DiscoverySlot> = OnceLock::new();

/// Gets the global slot, creating it if necessary.
pub fn slot() -> &'static DiscoverySlot {
    GLOBAL_SLOT.get_or_init(DiscoverySlot::new)
}

/// Push commands through the global slot.
pub fn push(commands: impl IntoIterator<Item = Command>) {
    slot().push(commands)
}

/// Run the wallet bootstrap against the global slot.
pub fn initialize(wallets: impl IntoIterator<Item = WalletHandle>) -> Arc<Registry> {
    crate::bootstrap::initialize(slot(), wallets)
}

/// The global registry, once some wallet has claimed the slot.
pub fn registry() -> Option<Arc<Registry>> {
    slot().registry()
}
