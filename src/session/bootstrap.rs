use tracing::{info, warn};

use crate::api::ApiClient;

use super::cache::IdentityCache;
use super::credential::CredentialStore;
use super::principal::Principal;

/// Query parameter appended by the Discord linking round-trip when the
/// browser is sent back into the protected area.
pub const LINK_DONE_PARAM: &str = "discord";
pub const LINK_DONE_VALUE: &str = "linked";

/// The query-string context of the navigation that mounted a protected view.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pairs: Vec<(String, String)>,
}

impl Navigation {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a raw query string (`a=1&b=2`, percent-encoded values allowed).
    pub fn from_query(query: &str) -> Self {
        let mut pairs = Vec::new();
        for part in query.trim_start_matches('?').split('&') {
            if part.is_empty() {
                continue;
            }
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            let k = urlencoding::decode(k).map(|s| s.into_owned()).unwrap_or_else(|_| k.to_string());
            let v = urlencoding::decode(v).map(|s| s.into_owned()).unwrap_or_else(|_| v.to_string());
            pairs.push((k, v));
        }
        Self { pairs }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// True when this navigation is the return leg of a Discord linking
    /// round-trip, meaning any cached Principal is stale.
    pub fn link_completed(&self) -> bool {
        self.param(LINK_DONE_PARAM) == Some(LINK_DONE_VALUE)
    }
}

/// Outcome of mounting a protected view.
#[derive(Debug, Clone, PartialEq)]
pub enum Bootstrap {
    /// No credential present: an authentication failure, redirect to entry.
    Unauthenticated,
    /// Fresh canonical Principal, cache replaced.
    Ready(Principal),
    /// Fetch failed but a cached Principal exists: render degraded, no logout.
    Degraded(Principal),
    /// Fetch failed and nothing is cached: surface a load failure, no redirect.
    Failed,
}

/// On each protected-page mount: validate credential presence, fetch the
/// canonical Principal, reconcile the cache.
pub struct SessionBootstrapper {
    credentials: CredentialStore,
    cache: IdentityCache,
    api: ApiClient,
}

impl SessionBootstrapper {
    pub fn new(credentials: CredentialStore, cache: IdentityCache, api: ApiClient) -> Self {
        Self { credentials, cache, api }
    }

    pub async fn bootstrap(&self, nav: &Navigation) -> Bootstrap {
        let Some(token) = self.credentials.read() else {
            return Bootstrap::Unauthenticated;
        };

        // A completed linking round-trip invalidates whatever is cached; drop
        // it before fetching so a stale snapshot can never be served.
        if nav.link_completed() {
            info!(target: "session", "link round-trip completed, discarding cached principal");
            self.cache.clear();
        }

        match self.api.fetch_me(&token).await {
            Ok(principal) => {
                self.cache.replace(&principal);
                Bootstrap::Ready(principal)
            }
            Err(e) => {
                // Availability failure, not an authentication failure: fall
                // back to the cache rather than logging the user out.
                warn!(target: "session", "principal fetch failed: {}", e);
                match self.cache.get() {
                    Some(cached) => Bootstrap::Degraded(cached),
                    None => Bootstrap::Failed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_parses_link_marker() {
        assert!(Navigation::from_query("discord=linked").link_completed());
        assert!(Navigation::from_query("?from=%2Fdashboard&discord=linked").link_completed());
        assert!(!Navigation::from_query("discord=pending").link_completed());
        assert!(!Navigation::from_query("from=%2Fdashboard").link_completed());
        assert!(!Navigation::none().link_completed());
    }

    #[test]
    fn navigation_decodes_params() {
        let nav = Navigation::from_query("from=%2Fdashboard%2Fcases");
        assert_eq!(nav.param("from"), Some("/dashboard/cases"));
        assert_eq!(nav.param("missing"), None);
    }
}
