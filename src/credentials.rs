//! Credential verification.
//!
//! Email/password checks that resolve to a fresh server-side session on
//! success. Failure is deliberately uniform: unknown email, missing
//! credential record, and wrong password all return `Ok(None)` after a
//! hash comparison, so response timing does not reveal which accounts
//! exist.

use crate::error::Result;
use crate::password::PasswordHasher;
use crate::storage::{AccountStore, Session, SessionStore};
use std::time::Duration;

/// A dummy Argon2id hash compared against when no real credential exists,
/// keeping the work factor uniform across all failure paths.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$Zm9yY29uc3RhbnR0aW1l$GVLJ+XGamlrW5aPdJZg/bl5pc0bGZAbn0RzAXi3x0dU";

/// Verifies email/password credentials and mints sessions.
#[derive(Clone)]
pub struct CredentialVerifier<A, S> {
    accounts: A,
    sessions: S,
    hasher: PasswordHasher,
    session_lifetime: Duration,
}

impl<A: AccountStore, S: SessionStore> CredentialVerifier<A, S> {
    /// Create a verifier over account and session stores.
    #[must_use]
    pub fn new(accounts: A, sessions: S, hasher: PasswordHasher, session_lifetime: Duration) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
            session_lifetime,
        }
    }

    /// Verify credentials; on success, create and return a new session.
    ///
    /// Returns `Ok(None)` for any credential failure. The caller decides
    /// how to present that; this layer never distinguishes the cause.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Option<Session>> {
        let email = email.trim().to_lowercase();

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            // Burn the same work as a real comparison.
            let _ = self.hasher.verify(password, DUMMY_HASH);
            return Ok(None);
        };

        let Some(hash) = self.accounts.password_hash(&account.id).await? else {
            let _ = self.hasher.verify(password, DUMMY_HASH);
            return Ok(None);
        };

        if !self.hasher.verify(password, &hash)? {
            return Ok(None);
        }

        let session = Session::new(&account.id, self.session_lifetime);
        self.sessions.create_session(&session).await?;

        tracing::info!(
            target: "auth.session.created",
            account_id = %account.id,
            session_id = %session.id,
            "Credentials verified, session created"
        );

        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::PasswordConfig;
    use crate::storage::Account;
    use crate::storage::account::test::InMemoryAccountStore;
    use crate::storage::session::test::InMemorySessionStore;

    const LIFETIME: Duration = Duration::from_secs(3600);

    fn verifier() -> (
        CredentialVerifier<InMemoryAccountStore, InMemorySessionStore>,
        InMemoryAccountStore,
        InMemorySessionStore,
    ) {
        let accounts = InMemoryAccountStore::new();
        let sessions = InMemorySessionStore::new();
        let verifier = CredentialVerifier::new(
            accounts.clone(),
            sessions.clone(),
            PasswordHasher::new(PasswordConfig::fast()),
            LIFETIME,
        );
        (verifier, accounts, sessions)
    }

    fn seed(accounts: &InMemoryAccountStore, email: &str, password: &str) -> Account {
        let hasher = PasswordHasher::new(PasswordConfig::fast());
        let account = Account::new(email, None);
        accounts.insert(account.clone(), Some(hasher.hash(password).unwrap()));
        account
    }

    #[tokio::test]
    async fn test_valid_credentials_create_session() {
        let (verifier, accounts, sessions) = verifier();
        let account = seed(&accounts, "ada@example.com", "hunter2hunter2");

        let session = verifier
            .verify("ada@example.com", "hunter2hunter2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.account_id, account.id);
        assert!(sessions.find_session(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_email_is_normalized() {
        let (verifier, accounts, _) = verifier();
        seed(&accounts, "ada@example.com", "hunter2hunter2");

        let session = verifier
            .verify("  Ada@Example.COM ", "hunter2hunter2")
            .await
            .unwrap();
        assert!(session.is_some());
    }

    #[tokio::test]
    async fn test_failures_are_uniform() {
        let (verifier, accounts, sessions) = verifier();
        seed(&accounts, "ada@example.com", "hunter2hunter2");
        let sso_only = Account::new("sso@example.com", None);
        accounts.insert(sso_only, None);

        // Unknown account, credential-less account, wrong password: all None.
        assert!(verifier
            .verify("nobody@example.com", "whatever")
            .await
            .unwrap()
            .is_none());
        assert!(verifier
            .verify("sso@example.com", "whatever")
            .await
            .unwrap()
            .is_none());
        assert!(verifier
            .verify("ada@example.com", "wrong password")
            .await
            .unwrap()
            .is_none());

        assert_eq!(sessions.count_active_sessions("any").await.unwrap(), 0);
    }
}
