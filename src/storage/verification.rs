//! Verification record storage.
//!
//! Presence of a record keyed by `(kind, target)` is the whole contract:
//! a `two-factor` record for an account id means 2FA is enabled for it.
//! Enrollment (creating and deleting these records) happens in a separate
//! flow outside this crate.

use crate::error::Result;
use async_trait::async_trait;

/// Trait for verification record existence checks.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Check whether a verification record exists for `(kind, target)`.
    async fn has_verification(&self, kind: &str, target: &str) -> Result<bool>;
}

/// In-memory store for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, RwLock};

    /// In-memory verification store for testing.
    #[derive(Clone, Default)]
    pub struct InMemoryVerificationStore {
        records: Arc<RwLock<HashSet<(String, String)>>>,
    }

    impl InMemoryVerificationStore {
        /// Create a new in-memory store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert a verification record.
        pub fn enable(&self, kind: &str, target: &str) {
            self.records
                .write()
                .unwrap()
                .insert((kind.to_string(), target.to_string()));
        }

        /// Remove a verification record.
        pub fn disable(&self, kind: &str, target: &str) {
            self.records
                .write()
                .unwrap()
                .remove(&(kind.to_string(), target.to_string()));
        }
    }

    #[async_trait]
    impl VerificationStore for InMemoryVerificationStore {
        async fn has_verification(&self, kind: &str, target: &str) -> Result<bool> {
            let records = self.records.read().unwrap();
            Ok(records.contains(&(kind.to_string(), target.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test::InMemoryVerificationStore;
    use super::*;

    #[tokio::test]
    async fn test_existence_is_the_contract() {
        let store = InMemoryVerificationStore::new();
        assert!(!store.has_verification("two-factor", "acct-1").await.unwrap());

        store.enable("two-factor", "acct-1");
        assert!(store.has_verification("two-factor", "acct-1").await.unwrap());
        // Different kind or target does not match.
        assert!(!store.has_verification("onboarding", "acct-1").await.unwrap());
        assert!(!store.has_verification("two-factor", "acct-2").await.unwrap());

        store.disable("two-factor", "acct-1");
        assert!(!store.has_verification("two-factor", "acct-1").await.unwrap());
    }
}
