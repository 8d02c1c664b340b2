//! The shared discovery slot.
//!
//! The slot starts out as a buffer of pending commands. The first wallet to
//! claim it swaps the buffer for a [`Registry`] and replays the buffer through
//! it. The slot never goes back to buffering.
//!
//! ```text
//! Pending(buffer) --claim--> Ready(registry)
//!       ^ push appends          ^ push dispatches
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use super::command::Command;
use super::dispatcher::Registry;

enum SlotState {
    Pending(Vec<Command>),
    Ready(Arc<Registry>),
}

/// Either a pending-command buffer or the registry that replaced it.
pub struct DiscoverySlot {
    state: Mutex<SlotState>,
    // Serialises claims; the state lock is not held while the factory runs.
    claiming: ReentrantMutex<()>,
}

impl DiscoverySlot {
    /// Create a slot holding an empty buffer.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending(Vec::new())),
            claiming: ReentrantMutex::new(()),
        }
    }

    /// Queue `commands` until a registry exists, or dispatch them to it.
    pub fn push(&self, commands: impl IntoIterator<Item = Command>) {
        let mut state = self.state.lock();
        let registry = match &mut *state {
            SlotState::Pending(buffer) => {
                let before = buffer.len();
                buffer.extend(commands);
                tracing::debug!(
                    queued = buffer.len() - before,
                    pending = buffer.len(),
                    "registry not ready, buffering commands"
                );
                return;
            }
            SlotState::Ready(registry) => registry.clone(),
        };
        drop(state);
        registry.push(commands);
    }

    /// Replace the buffer with a new [`Registry`] and replay it.
    ///
    /// Returns the registry now in the slot, whether this call created it or
    /// an earlier one did.
    pub fn claim(&self) -> Arc<Registry> {
        self.claim_with(Registry::new)
    }

    /// Like [`claim`](Self::claim), building the registry with `factory`.
    ///
    /// `factory` runs at most once per slot, and only for the call that wins.
    /// It may push to this slot; those commands are buffered and replayed
    /// after everything queued before them.
    pub fn claim_with(&self, factory: impl FnOnce() -> Registry) -> Arc<Registry> {
        let claiming = self.claiming.lock();
        if let Some(registry) = self.registry() {
            return registry;
        }

        let registry = Arc::new(factory());

        let mut state = self.state.lock();
        let buffer = match &mut *state {
            // The factory claimed the slot itself
            SlotState::Ready(existing) => return existing.clone(),
            SlotState::Pending(buffer) => std::mem::take(buffer),
        };
        // Taken before the slot is released so no direct push can overtake the replay
        let guard = registry.lock_dispatch();
        *state = SlotState::Ready(registry.clone());
        drop(state);
        drop(claiming);

        tracing::debug!(replayed = buffer.len(), "discovery slot claimed");
        registry.push(buffer);
        drop(guard);

        registry
    }

    /// True once a registry has claimed the slot.
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Ready(_))
    }

    /// The registry, if the slot has been claimed.
    pub fn registry(&self) -> Option<Arc<Registry>> {
        match &*self.state.lock() {
            SlotState::Ready(registry) => Some(registry.clone()),
            SlotState::Pending(_) => None,
        }
    }

    /// Number of buffered commands. Always zero once claimed.
    pub fn pending_len(&self) -> usize {
        match &*self.state.lock() {
            SlotState::Pending(buffer) => buffer.len(),
            SlotState::Ready(_) => 0,
        }
    }
}

impl Default for DiscoverySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiscoverySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.state.lock() {
            SlotState::Pending(buffer) => f
                .debug_struct("DiscoverySlot")
                .field("pending", &buffer.len())
                .finish(),
            SlotState::Ready(registry) => f
                .debug_struct("DiscoverySlot")
                .field("registry", registry)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_wallets, test_wallet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_buffer_until_claimed() {
        let slot = DiscoverySlot::new();
        slot.push([Command::register([test_wallet("early")])]);
        assert_eq!(slot.pending_len(), 1);
        assert!(slot.registry().is_none());

        let registry = slot.claim();
        assert!(slot.is_ready());
        assert_eq!(slot.pending_len(), 0);
        assert_wallets(&registry.wallets(), &["early"]);
    }

    #[test]
    fn test_claim_is_exactly_once() {
        let slot = DiscoverySlot::new();
        let created = AtomicUsize::new(0);
        let factory = || {
            created.fetch_add(1, Ordering::SeqCst);
            Registry::new()
        };

        let first = slot.claim_with(factory);
        let second = slot.claim_with(factory);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_push_after_claim_goes_direct() {
        let slot = DiscoverySlot::new();
        let registry = slot.claim();
        slot.push([Command::register([test_wallet("late")])]);
        assert_wallets(&registry.wallets(), &["late"]);
    }

    #[test]
    fn test_factory_may_push_to_its_slot() {
        let slot = DiscoverySlot::new();
        slot.push([Command::register([test_wallet("queued")])]);

        let registry = slot.claim_with(|| {
            slot.push([Command::register([test_wallet("from-factory")])]);
            Registry::new()
        });

        assert_wallets(&registry.wallets(), &["queued", "from-factory"]);
        assert_eq!(slot.pending_len(), 0);
    }

    #[test]
    fn test_factory_may_claim_its_slot() {
        let slot = DiscoverySlot::new();
        let created = AtomicUsize::new(0);

        let outer = slot.claim_with(|| {
            created.fetch_add(1, Ordering::SeqCst);
            slot.claim();
            Registry::new()
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&outer, &slot.registry().unwrap()));
    }

    #[test]
    fn test_replayed_callback_can_push() {
        let slot = Arc::new(DiscoverySlot::new());
        let inner = slot.clone();
        slot.push([Command::get(move |_| {
            inner.push([Command::register([test_wallet("from-callback")])]);
        })]);

        let registry = slot.claim();
        assert_wallets(&registry.wallets(), &["from-callback"]);
    }
}
