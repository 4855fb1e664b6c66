use tracing::warn;

use super::principal::Principal;
use super::store::SharedStateStore;

/// Storage key for the serialized cached Principal.
pub const USER_KEY: &str = "doj_user";

/// Process-wide cached Principal slot. Replaced wholesale by each successful
/// fetch or save; there is no field-level merge. Malformed cached data is a
/// cache miss, never an error.
#[derive(Clone)]
pub struct IdentityCache {
    store: SharedStateStore,
}

impl IdentityCache {
    pub fn new(store: SharedStateStore) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<Principal> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str::<Principal>(&raw) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(target: "session", "cached principal unreadable, treating as miss: {}", e);
                None
            }
        }
    }

    pub fn replace(&self, principal: &Principal) {
        match serde_json::to_string(principal) {
            Ok(raw) => self.store.set(USER_KEY, &raw),
            Err(e) => warn!(target: "session", "failed to serialize principal for cache: {}", e),
        }
    }

    pub fn clear(&self) {
        self.store.remove(USER_KEY);
    }
}
