//! Two-factor policy decisions.
//!
//! Whether an account has 2FA enabled is a pure existence check against the
//! verification store; whether a browser's prior verification still counts
//! is a clock comparison against the configured freshness window. Both
//! decisions live here so the login and verify flows stay policy-free.

use crate::error::Result;
use crate::state::{AuthState, PendingVerification};
use crate::storage::VerificationStore;
use std::time::{Duration, SystemTime};

/// Verification kind marking an account as 2FA-enabled.
pub const TWO_FACTOR_VERIFICATION_KIND: &str = "two-factor";

/// Decides when a login must be routed through a two-factor challenge.
#[derive(Clone)]
pub struct TwoFactorGate<V> {
    store: V,
    freshness_window: Duration,
}

impl<V: VerificationStore> TwoFactorGate<V> {
    /// Create a gate over a verification store.
    #[must_use]
    pub fn new(store: V, freshness_window: Duration) -> Self {
        Self {
            store,
            freshness_window,
        }
    }

    /// Check whether two-factor is enabled for an account.
    pub async fn is_enabled_for(&self, account_id: &str) -> Result<bool> {
        self.store
            .has_verification(TWO_FACTOR_VERIFICATION_KIND, account_id)
            .await
    }

    /// Check whether the browser's last verification is still fresh.
    ///
    /// An outstanding pending verification always reads as stale: a
    /// challenge already in flight must not be short-circuited by an older
    /// verification stamp. A clock reading that puts the stamp in the
    /// future counts as fresh rather than forcing a spurious re-challenge.
    #[must_use]
    pub fn is_freshly_verified(
        &self,
        auth: &AuthState,
        pending: Option<&PendingVerification>,
    ) -> bool {
        if pending.is_some() {
            return false;
        }
        let Some(verified_at) = auth.verified_at else {
            return false;
        };
        match SystemTime::now().duration_since(verified_at) {
            Ok(age) => age <= self.freshness_window,
            Err(_) => true,
        }
    }
}
