//! Session record storage.
//!
//! A session is a durable server-side record; the browser only ever holds
//! its id (inside the encrypted auth cookie). Records are created on login,
//! bulk-deleted by "sign out of other sessions", and otherwise left to the
//! backing store's own expiry handling.
//!
//! # Tracing Events
//!
//! - `auth.session.created` - emitted by the credential verifier on login
//! - `auth.session.signed_out_others` - emitted by the profile action

use crate::error::Result;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Length of generated session ids (32 bytes = 256 bits).
const SESSION_ID_LENGTH: usize = 32;

/// A server-side session record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Owning account id.
    pub account_id: String,
    /// When the session expires.
    pub expires_at: SystemTime,
}

impl Session {
    /// Create a fresh session for an account with the given lifetime.
    #[must_use]
    pub fn new(account_id: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            id: generate_session_id(),
            account_id: account_id.into(),
            expires_at: SystemTime::now() + lifetime,
        }
    }

    /// Check if this session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }
}

/// Generate a secure random session id (URL-safe base64, no padding).
fn generate_session_id() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; SESSION_ID_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Trait for session record storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session record.
    async fn create_session(&self, session: &Session) -> Result<()>;

    /// Find a session by id.
    ///
    /// Returns `Ok(None)` for unknown or expired sessions.
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>>;

    /// Delete a session record.
    ///
    /// Returns `true` if the session was found and deleted.
    async fn delete_session(&self, session_id: &str) -> Result<bool>;

    /// Delete every session for an account except the given one.
    ///
    /// Backs "sign out of other sessions". Returns the number of sessions
    /// deleted; the excepted session is never touched.
    async fn delete_other_sessions(
        &self,
        account_id: &str,
        except_session_id: &str,
    ) -> Result<usize>;

    /// Count active (unexpired) sessions for an account.
    async fn count_active_sessions(&self, account_id: &str) -> Result<usize>;
}

/// In-memory store for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// In-memory session store for testing.
    #[derive(Clone, Default)]
    pub struct InMemorySessionStore {
        sessions: Arc<RwLock<HashMap<String, Session>>>,
    }

    impl InMemorySessionStore {
        /// Create a new in-memory store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl SessionStore for InMemorySessionStore {
        async fn create_session(&self, session: &Session) -> Result<()> {
            self.sessions
                .write()
                .unwrap()
                .insert(session.id.clone(), session.clone());
            Ok(())
        }

        async fn find_session(&self, session_id: &str) -> Result<Option<Session>> {
            let sessions = self.sessions.read().unwrap();
            Ok(sessions
                .get(session_id)
                .filter(|s| !s.is_expired())
                .cloned())
        }

        async fn delete_session(&self, session_id: &str) -> Result<bool> {
            Ok(self.sessions.write().unwrap().remove(session_id).is_some())
        }

        async fn delete_other_sessions(
            &self,
            account_id: &str,
            except_session_id: &str,
        ) -> Result<usize> {
            let mut sessions = self.sessions.write().unwrap();
            let to_delete: Vec<String> = sessions
                .values()
                .filter(|s| s.account_id == account_id && s.id != except_session_id)
                .map(|s| s.id.clone())
                .collect();
            let count = to_delete.len();
            for id in to_delete {
                sessions.remove(&id);
            }
            Ok(count)
        }

        async fn count_active_sessions(&self, account_id: &str) -> Result<usize> {
            let sessions = self.sessions.read().unwrap();
            Ok(sessions
                .values()
                .filter(|s| s.account_id == account_id && !s.is_expired())
                .count())
        }
    }
}
