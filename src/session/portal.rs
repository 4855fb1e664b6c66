use reqwest::Url;
use tracing::info;

use crate::api::{ApiClient, RegisterRequest};
use crate::error::{AppError, AppResult};

use super::bootstrap::SessionBootstrapper;
use super::cache::IdentityCache;
use super::capability::CapabilityGate;
use super::credential::{CookieJar, CredentialStore};
use super::editor::StructureEditor;
use super::principal::Principal;
use super::store::SharedStateStore;

/// Facade wiring one storage backend, one cookie jar and one backend client
/// into the session components. Login writes both credential representations
/// and the cache before returning; logout clears them in the same fashion.
pub struct PortalSession {
    credentials: CredentialStore,
    cache: IdentityCache,
    api: ApiClient,
}

impl PortalSession {
    pub fn new(base: &str, store: SharedStateStore) -> anyhow::Result<Self> {
        let api = ApiClient::new(base)?;
        let credentials = CredentialStore::new(store.clone(), CookieJar::new());
        let cache = IdentityCache::new(store);
        Ok(Self { credentials, cache, api })
    }

    /// POST the credentials; on success persist the token in both
    /// representations and seed the cache when the backend includes the user.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<Option<Principal>> {
        let success = self.api.login(identifier, password).await.map_err(AppError::from)?;
        self.credentials.save(&success.token);
        if let Some(user) = &success.user {
            self.cache.replace(user);
        }
        info!(target: "session", "login succeeded for {}", identifier);
        Ok(success.user)
    }

    pub async fn register(&self, req: &RegisterRequest) -> AppResult<()> {
        self.api.register(req).await.map_err(AppError::from)
    }

    /// Drop the credential (both representations) and the cached Principal.
    pub fn logout(&self) {
        self.credentials.clear();
        self.cache.clear();
        info!(target: "session", "logged out");
    }

    /// Linking handoff target; requires a live credential.
    pub fn discord_link_url(&self) -> AppResult<Url> {
        let Some(token) = self.credentials.read() else {
            return Err(AppError::auth("unauthenticated", "no credential present"));
        };
        self.api.discord_link_url(&token).map_err(AppError::from)
    }

    pub fn bootstrapper(&self) -> SessionBootstrapper {
        SessionBootstrapper::new(self.credentials.clone(), self.cache.clone(), self.api.clone())
    }

    pub fn capability_gate(&self) -> CapabilityGate {
        CapabilityGate::new(self.cache.clone())
    }

    pub fn structure_editor(&self) -> StructureEditor {
        StructureEditor::new(self.credentials.clone(), self.cache.clone(), self.api.clone())
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }
}
