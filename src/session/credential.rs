use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::store::SharedStateStore;

/// Storage key for the script-accessible token entry.
pub const TOKEN_KEY: &str = "doj_token";
/// Cookie name consumed by the route guard on the request path.
pub const TOKEN_COOKIE: &str = "doj_token";

const TOKEN_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Set-Cookie text written at login.
pub fn login_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax; Secure",
        TOKEN_COOKIE, token, TOKEN_MAX_AGE_SECS
    )
}

/// Set-Cookie text written at logout. Matching path and attributes, max-age
/// zero, so the guard observes the removal on the very next request.
pub fn logout_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax; Secure", TOKEN_COOKIE)
}

/// Client-side cookie storage as the guard layer would observe it. Holds the
/// current token cookie value, if any; applying a max-age-zero write drops it.
#[derive(Clone, Default)]
pub struct CookieJar {
    slot: Arc<RwLock<Option<String>>>,
}

impl CookieJar {
    pub fn new() -> Self { Self::default() }

    /// Apply a Set-Cookie line for the token cookie.
    pub fn apply(&self, set_cookie: &str) {
        let mut parts = set_cookie.split(';').map(|p| p.trim());
        let Some(pair) = parts.next() else { return };
        let Some((name, value)) = pair.split_once('=') else { return };
        if name != TOKEN_COOKIE {
            return;
        }
        let expired = parts.any(|p| p.eq_ignore_ascii_case("Max-Age=0"));
        let mut slot = self.slot.write();
        if expired || value.is_empty() {
            *slot = None;
        } else {
            *slot = Some(value.to_string());
        }
    }

    /// Current cookie value, or absent when never set or expired.
    pub fn value(&self) -> Option<String> {
        self.slot.read().clone()
    }

    /// `name=value` pair for a Cookie request header, as sent with the next
    /// navigation into the protected area.
    pub fn request_cookie(&self) -> Option<String> {
        self.value().map(|v| format!("{}={}", TOKEN_COOKIE, v))
    }
}

/// The session credential in its two representations: a script-accessible
/// store entry and a server-readable cookie. `save` and `clear` always touch
/// both within the same call; no operation leaves exactly one of the two set.
#[derive(Clone)]
pub struct CredentialStore {
    store: SharedStateStore,
    jar: CookieJar,
}

impl CredentialStore {
    pub fn new(store: SharedStateStore, jar: CookieJar) -> Self {
        Self { store, jar }
    }

    pub fn save(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
        // An unavailable store swallows the write; leave the cookie untouched
        // too so the two representations never diverge.
        if self.store.get(TOKEN_KEY).is_none() {
            debug!(target: "session", "storage unavailable, credential not saved");
            return;
        }
        self.jar.apply(&login_cookie(token));
        debug!(target: "session", "credential saved");
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.jar.apply(&logout_cookie());
        debug!(target: "session", "credential cleared");
    }

    /// Script-accessible entry only; the cookie is write-mostly and consumed
    /// by the guard on the request path, never read back here.
    pub fn read(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}
