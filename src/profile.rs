//! Profile actions.
//!
//! Form submissions on the profile page multiplex on an `intent` field.
//! Intents are an exhaustive enum; an unknown intent is rejected with a
//! 400 before any store is touched.

use crate::error::{GangwayError, Result};
use crate::state::AuthState;
use crate::storage::{AccountStore, SessionStore};
use std::str::FromStr;

/// A recognized profile form intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileIntent {
    /// Update display profile fields.
    UpdateProfile,
    /// Sign out every session except the current one.
    SignOutOfSessions,
}

impl ProfileIntent {
    /// The wire value of this intent.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateProfile => "update-profile",
            Self::SignOutOfSessions => "sign-out-of-sessions",
        }
    }
}

impl FromStr for ProfileIntent {
    type Err = GangwayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "update-profile" => Ok(Self::UpdateProfile),
            "sign-out-of-sessions" => Ok(Self::SignOutOfSessions),
            other => Err(GangwayError::bad_request(format!(
                "Invalid intent \"{}\"",
                other
            ))),
        }
    }
}

/// Executes profile page actions against the stores.
#[derive(Clone)]
pub struct ProfileActions<A, S> {
    accounts: A,
    sessions: S,
}

impl<A: AccountStore, S: SessionStore> ProfileActions<A, S> {
    /// Create profile actions over account and session stores.
    #[must_use]
    pub fn new(accounts: A, sessions: S) -> Self {
        Self { accounts, sessions }
    }

    /// Update the account's display name.
    pub async fn update_profile(&self, account_id: &str, name: Option<&str>) -> Result<()> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        self.accounts.update_name(account_id, name).await
    }

    /// Sign out of every session except the caller's own.
    ///
    /// Returns the number of sessions deleted. The current session is
    /// never touched, so the caller stays signed in.
    pub async fn sign_out_of_other_sessions(
        &self,
        account_id: &str,
        auth: &AuthState,
    ) -> Result<usize> {
        let Some(ref session_id) = auth.session_id else {
            return Err(GangwayError::unauthorized("No active session"));
        };

        let deleted = self
            .sessions
            .delete_other_sessions(account_id, session_id)
            .await?;

        tracing::info!(
            target: "auth.session.signed_out_others",
            account_id = %account_id,
            deleted,
            "Signed out of other sessions"
        );

        Ok(deleted)
    }

    /// Dispatch a parsed intent with its form fields.
    pub async fn dispatch(
        &self,
        intent: ProfileIntent,
        account_id: &str,
        auth: &AuthState,
        name: Option<&str>,
    ) -> Result<()> {
        match intent {
            ProfileIntent::UpdateProfile => self.update_profile(account_id, name).await,
            ProfileIntent::SignOutOfSessions => {
                self.sign_out_of_other_sessions(account_id, auth).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Account;
    use crate::storage::account::test::InMemoryAccountStore;
    use crate::storage::session::test::InMemorySessionStore;
    use crate::storage::{Session, SessionStore as _};
    use std::time::Duration;

    fn actions() -> (
        ProfileActions<InMemoryAccountStore, InMemorySessionStore>,
        InMemoryAccountStore,
        InMemorySessionStore,
    ) {
        let accounts = InMemoryAccountStore::new();
        let sessions = InMemorySessionStore::new();
        (
            ProfileActions::new(accounts.clone(), sessions.clone()),
            accounts,
            sessions,
        )
    }

    #[test]
    fn test_intent_parsing() {
        assert_eq!(
            "update-profile".parse::<ProfileIntent>().unwrap(),
            ProfileIntent::UpdateProfile
        );
        assert_eq!(
            "sign-out-of-sessions".parse::<ProfileIntent>().unwrap(),
            ProfileIntent::SignOutOfSessions
        );

        let err = "delete-everything".parse::<ProfileIntent>().unwrap_err();
        assert!(matches!(err, GangwayError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_profile_trims_name() {
        let (actions, accounts, _) = actions();
        let account = Account::new("ada@example.com", None);
        let id = account.id.clone();
        accounts.insert(account, None);

        actions.update_profile(&id, Some("  Ada  ")).await.unwrap();
        let found = accounts.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ada"));

        // Whitespace-only clears the name.
        actions.update_profile(&id, Some("   ")).await.unwrap();
        let found = accounts.find_by_id(&id).await.unwrap().unwrap();
        assert!(found.name.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_of_other_sessions() {
        let (actions, _, sessions) = actions();
        let current = Session::new("acct-1", Duration::from_secs(3600));
        sessions.create_session(&current).await.unwrap();
        for _ in 0..2 {
            sessions
                .create_session(&Session::new("acct-1", Duration::from_secs(3600)))
                .await
                .unwrap();
        }

        let auth = AuthState::new().with_session(&current.id);
        let deleted = actions
            .sign_out_of_other_sessions("acct-1", &auth)
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert!(sessions.find_session(&current.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_out_requires_session() {
        let (actions, _, _) = actions();
        let err = actions
            .sign_out_of_other_sessions("acct-1", &AuthState::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GangwayError::Unauthorized(_)));
    }
}
