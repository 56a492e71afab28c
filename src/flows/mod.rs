//! The session hand-off flows.
//!
//! [`HandoffOrchestrator`] ties the pieces together: credential
//! verification, the two-factor gate, and the two cookie-backed state
//! stores. The login half lives in [`login`], the challenge-completion
//! half in [`verify`]; both produce a [`Handoff`] outcome that the caller
//! turns into a redirect response.

pub mod login;
pub mod types;
pub mod verify;

pub use types::{BrowserState, Handoff, NewSessionRequest, Notice, VerifiedSubmission};

use crate::config::HandoffConfig;
use crate::credentials::CredentialVerifier;
use crate::error::Result;
use crate::providers::ProviderRegistry;
use crate::state::{AuthState, CookieStateStore, PendingVerification, load_key};
use crate::storage::{AccountStore, SessionStore, VerificationStore};
use crate::twofactor::TwoFactorGate;

/// Orchestrates the login and verification hand-off flows.
pub struct HandoffOrchestrator<A, S, V> {
    pub(crate) verifier: CredentialVerifier<A, S>,
    pub(crate) sessions: S,
    pub(crate) gate: TwoFactorGate<V>,
    pub(crate) auth_cookies: CookieStateStore<AuthState>,
    pub(crate) pending_cookies: CookieStateStore<PendingVerification>,
    pub(crate) providers: ProviderRegistry,
    pub(crate) config: HandoffConfig,
}

impl<A, S, V> HandoffOrchestrator<A, S, V>
where
    A: AccountStore,
    S: SessionStore + Clone,
    V: VerificationStore,
{
    /// Build an orchestrator over the given stores.
    ///
    /// # Errors
    ///
    /// Fails when the configured cookie encryption key is missing or
    /// malformed.
    pub fn new(accounts: A, sessions: S, verifications: V, config: HandoffConfig) -> Result<Self> {
        let key = load_key(&config.secret)?;
        let verifier = CredentialVerifier::new(
            accounts,
            sessions.clone(),
            crate::password::PasswordHasher::default(),
            config.session_lifetime(),
        );
        let gate = TwoFactorGate::new(verifications, config.freshness_window());
        let auth_cookies = CookieStateStore::new(key.clone(), config.auth_cookie.clone());
        let pending_cookies = CookieStateStore::new(key, config.pending_cookie.clone());

        Ok(Self {
            verifier,
            sessions,
            gate,
            auth_cookies,
            pending_cookies,
            providers: ProviderRegistry::new(),
            config,
        })
    }

    /// Attach a provider registry.
    #[must_use]
    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// The registered provider registry.
    #[must_use]
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Cookie store for the durable auth state.
    #[must_use]
    pub fn auth_cookies(&self) -> &CookieStateStore<AuthState> {
        &self.auth_cookies
    }

    /// Cookie store for the pending-verification state.
    #[must_use]
    pub fn pending_cookies(&self) -> &CookieStateStore<PendingVerification> {
        &self.pending_cookies
    }

    /// Decrypt both cookies into a [`BrowserState`].
    ///
    /// Missing or undecryptable values fall back to the signed-out default;
    /// a bad cookie never errors the request.
    pub fn read_browser_state(
        &self,
        auth_cookie: Option<&str>,
        pending_cookie: Option<&str>,
    ) -> BrowserState {
        let auth = auth_cookie
            .and_then(|v| self.auth_cookies.decrypt(v).ok().flatten())
            .unwrap_or_default();
        let pending = pending_cookie.and_then(|v| self.pending_cookies.decrypt(v).ok().flatten());
        BrowserState { auth, pending }
    }
}
