use anyhow::Result;

use crate::store::json_store::JsonStore;
use crate::store::schema::{SessionRecord, UserProfile};

/// Who is logged in, and the bearer token for backend calls.
///
/// Built once at start-up from the persisted record and handed to whatever
/// needs the token; login and logout write through to the store.
pub struct AuthContext {
    store: Option<JsonStore>,
    record: Option<SessionRecord>,
}

impl AuthContext {
    pub fn init(store: Option<JsonStore>) -> Self {
        let record = store.as_ref().and_then(|s| s.load_session());
        if record.is_some() {
            tracing::info!("restored saved session");
        }
        Self { store, record }
    }

    pub fn token(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.record.as_ref().map(|r| &r.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.record.is_some()
    }

    /// The in-memory session is updated even when persisting fails.
    pub fn login(&mut self, token: String, user: UserProfile) -> Result<()> {
        let record = SessionRecord { user, token };
        let saved = match self.store {
            Some(ref store) => store.save_session(&record),
            None => Ok(()),
        };
        self.record = Some(record);
        saved
    }

    pub fn logout(&mut self) -> Result<()> {
        self.record = None;
        match self.store {
            Some(ref store) => store.clear_session(),
            None => Ok(()),
        }
    }
}
