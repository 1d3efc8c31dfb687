use crate::logs::LogService;
use crate::store::models::{LogOutcome, SessionState, UserRecord, UserRole};
use crate::store::ContentStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct SessionService {
    store: ContentStore,
    logs: LogService,
}

impl SessionService {
    pub fn new(store: ContentStore, logs: LogService) -> Self {
        Self { store, logs }
    }

    /// Binds the single global session to a seed account. Credentials are
    /// never verified; the requested role picks the seat, and an address with
    /// no role match lands on the default creator account. Each call mints a
    /// fresh opaque token.
    pub fn authenticate(&self, submitted_email: &str, role: UserRole) -> Result<SessionView> {
        let user = self
            .store
            .with_state(|state| {
                state
                    .users()
                    .iter()
                    .find(|user| user.role == role)
                    .cloned()
                    .or_else(|| state.default_user().cloned())
            })?
            .context("user roster is empty")?;

        tracing::info!(
            submitted = %submitted_email,
            selected = %user.email,
            role = ?user.role,
            "session authenticated"
        );

        let session = SessionState {
            user: Some(user.clone()),
            authenticated: true,
            token: Some(new_session_token()),
        };
        self.store
            .with_state_mut(|state| state.replace_session(session.clone()))?;
        self.logs.append(
            "Login",
            LogOutcome::Success,
            format!("User {} logged in", user.email),
        )?;

        Ok(SessionView::from_state(session))
    }

    /// Clears the session unconditionally. Ending an inactive session is a
    /// no-op and, unlike login, leaves no audit entry.
    pub fn end_session(&self) -> Result<()> {
        self.store.with_state_mut(|state| state.clear_session())
    }

    pub fn current_session(&self) -> Result<SessionView> {
        self.store
            .with_state(|state| SessionView::from_state(state.session().clone()))
    }

    /// The immutable seed roster, shown in the admin console.
    pub fn list_users(&self) -> Result<Vec<UserView>> {
        self.store.with_state(|state| {
            state
                .users()
                .iter()
                .cloned()
                .map(UserView::from_record)
                .collect()
        })
    }
}

fn new_session_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub user: Option<UserView>,
    pub authenticated: bool,
    pub token: Option<String>,
}

impl UserView {
    fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            role: record.role,
            avatar_url: record.avatar_url,
        }
    }
}

impl SessionView {
    fn from_state(state: SessionState) -> Self {
        Self {
            user: state.user.map(UserView::from_record),
            authenticated: state.authenticated,
            token: state.token,
        }
    }
}
