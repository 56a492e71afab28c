//! Account storage.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An account identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: String,
    /// Unique email address, stored lowercase.
    pub email: String,
    /// Display name, if set.
    pub name: Option<String>,
}

impl Account {
    /// Create a new account with a fresh id.
    #[must_use]
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into().trim().to_lowercase(),
            name,
        }
    }
}

/// Trait for account storage.
///
/// The credential record (password hash) is reachable only through
/// `password_hash`; the credential verifier is its sole consumer.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an account by (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Find an account by id.
    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>>;

    /// Fetch the stored password hash for an account.
    ///
    /// Returns `Ok(None)` when the account has no credential record
    /// (e.g. external-provider-only accounts).
    async fn password_hash(&self, account_id: &str) -> Result<Option<String>>;

    /// Update the account's display name.
    async fn update_name(&self, account_id: &str, name: Option<&str>) -> Result<()>;
}

/// In-memory store for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    #[derive(Default)]
    struct InMemoryState {
        accounts: HashMap<String, Account>,
        password_hashes: HashMap<String, String>,
    }

    /// In-memory account store for testing.
    #[derive(Clone, Default)]
    pub struct InMemoryAccountStore {
        state: Arc<RwLock<InMemoryState>>,
    }

    impl InMemoryAccountStore {
        /// Create a new in-memory store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert an account, optionally with a credential record.
        pub fn insert(&self, account: Account, password_hash: Option<String>) {
            let mut state = self.state.write().unwrap();
            if let Some(hash) = password_hash {
                state.password_hashes.insert(account.id.clone(), hash);
            }
            state.accounts.insert(account.id.clone(), account);
        }
    }

    #[async_trait]
    impl AccountStore for InMemoryAccountStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
            let state = self.state.read().unwrap();
            Ok(state
                .accounts
                .values()
                .find(|a| a.email == email)
                .cloned())
        }

        async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>> {
            let state = self.state.read().unwrap();
            Ok(state.accounts.get(account_id).cloned())
        }

        async fn password_hash(&self, account_id: &str) -> Result<Option<String>> {
            let state = self.state.read().unwrap();
            Ok(state.password_hashes.get(account_id).cloned())
        }

        async fn update_name(&self, account_id: &str, name: Option<&str>) -> Result<()> {
            let mut state = self.state.write().unwrap();
            if let Some(account) = state.accounts.get_mut(account_id) {
                account.name = name.map(str::to_string);
            }
            Ok(())
        }
    }
}
