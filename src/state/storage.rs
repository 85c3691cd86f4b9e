//! Conversation state storage
//!
//! In-memory store holding one `ConversationState` per chat address.
//! Records are created lazily on first reference and never removed; a
//! finished cycle simply resets the record in place. Each record sits
//! behind its own async mutex so the inbound event consumer and the
//! control surface can mutate the same user without interleaving.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use super::context::ConversationState;

type Slot = Arc<Mutex<ConversationState>>;

/// Per-user conversation state store
#[derive(Clone, Default)]
pub struct ConversationStore {
    slots: Arc<RwLock<HashMap<String, Slot>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the user's slot, creating a default record if absent
    async fn slot(&self, user_id: &str) -> Slot {
        if let Some(slot) = self.slots.read().await.get(user_id) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(user_id.to_string()).or_insert_with(|| {
            debug!(user_id = user_id, "Creating conversation state");
            Arc::new(Mutex::new(ConversationState::default()))
        }))
    }

    /// Lock the user's record for an update spanning several awaits.
    ///
    /// Other writers for the same user wait until the guard is dropped;
    /// other users are unaffected.
    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<ConversationState> {
        self.slot(user_id).await.lock_owned().await
    }

    /// Snapshot of the user's current state
    pub async fn get(&self, user_id: &str) -> ConversationState {
        self.lock(user_id).await.clone()
    }

    /// Apply a mutation atomically under the user's lock
    pub async fn update<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&mut ConversationState) -> R,
    {
        let mut guard = self.lock(user_id).await;
        f(&mut guard)
    }

    /// Replace the user's state wholesale
    pub async fn put(&self, user_id: &str, state: ConversationState) {
        *self.lock(user_id).await = state;
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        self.slots.read().await.contains_key(user_id)
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore").finish_non_exhaustive()
    }
}
