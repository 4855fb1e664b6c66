use super::cache::IdentityCache;
use super::principal::Principal;

/// A feature affordance is actionable only once the Discord account is
/// linked. Absence of information is never treated as permission.
pub fn feature_enabled(principal: Option<&Principal>) -> bool {
    principal.map(|p| p.is_linked()).unwrap_or(false)
}

/// Evaluates feature enablement from the cached Principal. Reads the cache on
/// every call, so replacing the cache re-evaluates automatically; no network
/// traffic originates here.
#[derive(Clone)]
pub struct CapabilityGate {
    cache: IdentityCache,
}

impl CapabilityGate {
    pub fn new(cache: IdentityCache) -> Self {
        Self { cache }
    }

    pub fn is_enabled(&self) -> bool {
        feature_enabled(self.cache.get().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::store::MemoryStore;

    #[test]
    fn disabled_without_principal() {
        assert!(!feature_enabled(None));
    }

    #[test]
    fn linked_flag_alone_decides() {
        let mut p = Principal::default();
        assert!(!feature_enabled(Some(&p)));
        p.discord_linked = true;
        assert!(feature_enabled(Some(&p)));
        // Role never factors in.
        p.discord_highest_role = Some("Juge Fédéral".into());
        p.discord_linked = false;
        assert!(!feature_enabled(Some(&p)));
    }

    #[test]
    fn gate_follows_cache_replacement() {
        let cache = IdentityCache::new(Arc::new(MemoryStore::new()));
        let gate = CapabilityGate::new(cache.clone());
        assert!(!gate.is_enabled());

        let p = Principal { discord_linked: true, ..Default::default() };
        cache.replace(&p);
        assert!(gate.is_enabled());

        cache.clear();
        assert!(!gate.is_enabled());
    }
}
