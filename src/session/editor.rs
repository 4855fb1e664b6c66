use parking_lot::RwLock;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};

use super::assignment::{join_list, split_list, AssignmentUpdate};
use super::cache::IdentityCache;
use super::credential::CredentialStore;
use super::principal::Principal;

/// Grades allowed to mutate a structured assignment. The check is advisory
/// for the UI; the mutation endpoint remains the enforcement boundary.
pub const STRUCTURE_EDIT_ROLES: &[&str] =
    &["Juge Fédéral", "Juge Fédéral Adjoint", "Juge Assesseur"];

/// True iff the Discord highest role is on the fixed allow-list. Null or any
/// label outside the list renders the assignment read-only.
pub fn can_edit_structure(principal: &Principal) -> bool {
    principal
        .discord_highest_role
        .as_deref()
        .map(|role| STRUCTURE_EDIT_ROLES.contains(&role))
        .unwrap_or(false)
}

/// Editable text form of a structured assignment. Collections are held as
/// `", "`-joined strings while under edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentDraft {
    pub sector: String,
    pub service: String,
    pub poles: String,
    pub habilitations: String,
    pub fjf: bool,
}

impl AssignmentDraft {
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            sector: principal.sector.clone().unwrap_or_default(),
            service: principal.service.clone().unwrap_or_default(),
            poles: join_list(&principal.poles),
            habilitations: join_list(&principal.habilitations),
            fjf: principal.fjf,
        }
    }

    /// Normalize back to the wire payload: re-split collections, drop
    /// empties, map blank scalars to null.
    pub fn to_update(&self) -> AssignmentUpdate {
        fn blank_to_none(s: &str) -> Option<String> {
            let t = s.trim();
            if t.is_empty() { None } else { Some(t.to_string()) }
        }
        AssignmentUpdate {
            sector: blank_to_none(&self.sector),
            service: blank_to_none(&self.service),
            poles: split_list(&self.poles),
            habilitations: split_list(&self.habilitations),
            fjf: self.fjf,
        }
    }
}

#[derive(Default)]
struct EditorState {
    draft: Option<AssignmentDraft>,
    saving: bool,
}

/// Role-gated mutation path for the structured assignment. At most one save
/// is in flight at a time; a failed save keeps the draft and edit mode intact.
pub struct StructureEditor {
    credentials: CredentialStore,
    cache: IdentityCache,
    api: ApiClient,
    state: RwLock<EditorState>,
}

impl StructureEditor {
    pub fn new(credentials: CredentialStore, cache: IdentityCache, api: ApiClient) -> Self {
        Self { credentials, cache, api, state: RwLock::new(EditorState::default()) }
    }

    /// Hydrate a draft from the cached Principal and enter edit mode.
    /// Returns `None` when no Principal is cached to edit.
    pub fn begin_edit(&self) -> Option<AssignmentDraft> {
        let principal = self.cache.get()?;
        let draft = AssignmentDraft::from_principal(&principal);
        self.state.write().draft = Some(draft.clone());
        Some(draft)
    }

    /// Discard the draft; rendered values fall back to the cached Principal.
    pub fn cancel_edit(&self) {
        self.state.write().draft = None;
    }

    pub fn is_editing(&self) -> bool {
        self.state.read().draft.is_some()
    }

    pub fn current_draft(&self) -> Option<AssignmentDraft> {
        self.state.read().draft.clone()
    }

    /// Submit a draft. On success the cache and the draft slot are replaced by
    /// the server's canonical Principal and edit mode is exited; on failure
    /// the submitted draft is preserved unmodified and the error is retryable.
    pub async fn save(&self, draft: AssignmentDraft) -> AppResult<Principal> {
        {
            let mut st = self.state.write();
            if st.saving {
                return Err(AppError::conflict("save_in_flight", "a save is already in progress"));
            }
            st.saving = true;
            st.draft = Some(draft.clone());
        }

        let Some(token) = self.credentials.read() else {
            self.state.write().saving = false;
            return Err(AppError::auth("unauthenticated", "no credential present"));
        };

        let result = self.api.update_profile(&token, &draft.to_update()).await;
        match result {
            Ok(principal) => {
                // The server is the source of truth post-write, not the draft.
                self.cache.replace(&principal);
                let mut st = self.state.write();
                st.saving = false;
                st.draft = None;
                info!(target: "session", "assignment saved for {}", principal.username);
                Ok(principal)
            }
            Err(e) => {
                warn!(target: "session", "assignment save failed: {}", e);
                self.state.write().saving = false;
                Err(AppError::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_role(role: Option<&str>) -> Principal {
        Principal {
            discord_linked: true,
            discord_highest_role: role.map(|r| r.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn allow_list_is_exact() {
        assert!(can_edit_structure(&with_role(Some("Juge Fédéral"))));
        assert!(can_edit_structure(&with_role(Some("Juge Fédéral Adjoint"))));
        assert!(can_edit_structure(&with_role(Some("Juge Assesseur"))));
        assert!(!can_edit_structure(&with_role(Some("Greffier"))));
        assert!(!can_edit_structure(&with_role(Some("juge fédéral"))));
        assert!(!can_edit_structure(&with_role(Some(""))));
        assert!(!can_edit_structure(&with_role(None)));
    }

    #[test]
    fn draft_hydrates_joined_form() {
        let p = Principal {
            sector: Some("Section pénale".into()),
            poles: vec!["A".into(), "B".into()],
            habilitations: vec!["CI".into(), "Mandats".into(), "Fédéral".into()],
            fjf: true,
            ..Default::default()
        };
        let d = AssignmentDraft::from_principal(&p);
        assert_eq!(d.sector, "Section pénale");
        assert_eq!(d.service, "");
        assert_eq!(d.poles, "A, B");
        assert_eq!(d.habilitations, "CI, Mandats, Fédéral");
        assert!(d.fjf);
    }

    #[test]
    fn unmodified_draft_round_trips() {
        let p = Principal { sector: Some("X".into()), poles: vec!["A".into(), "B".into()], ..Default::default() };
        let update = AssignmentDraft::from_principal(&p).to_update();
        assert_eq!(update.sector.as_deref(), Some("X"));
        assert_eq!(update.service, None);
        assert_eq!(update.poles, vec!["A", "B"]);
        assert!(update.habilitations.is_empty());
    }

    #[test]
    fn blank_scalars_become_null() {
        let d = AssignmentDraft { sector: "  ".into(), service: "Service CI".into(), ..Default::default() };
        let update = d.to_update();
        assert_eq!(update.sector, None);
        assert_eq!(update.service.as_deref(), Some("Service CI"));
    }
}
