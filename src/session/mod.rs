//! Client-side session and access-control layer for the portal.
//! Keep the public surface thin and split implementation across sub-modules.

mod assignment;
mod bootstrap;
mod cache;
mod capability;
mod credential;
mod editor;
mod portal;
mod principal;
mod store;

pub use assignment::{join_list, split_list, AssignmentUpdate};
pub use bootstrap::{Bootstrap, Navigation, SessionBootstrapper, LINK_DONE_PARAM, LINK_DONE_VALUE};
pub use cache::{IdentityCache, USER_KEY};
pub use capability::{feature_enabled, CapabilityGate};
pub use credential::{login_cookie, logout_cookie, CookieJar, CredentialStore, TOKEN_COOKIE, TOKEN_KEY};
pub use editor::{can_edit_structure, AssignmentDraft, StructureEditor, STRUCTURE_EDIT_ROLES};
pub use portal::PortalSession;
pub use principal::Principal;
pub use store::{FileStore, MemoryStore, NullStore, SharedStateStore, StateStore};
