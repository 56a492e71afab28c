//! # Gangway
//!
//! Session hand-off for credential logins: verify a password, optionally
//! detour through a two-factor challenge, and land the session in an
//! encrypted browser cookie.
//!
//! The crate is storage-agnostic. Callers supply implementations of the
//! [`storage`] traits and get back a [`HandoffOrchestrator`] whose flow
//! methods return [`Handoff`] outcomes: a redirect destination plus the
//! exact cookies to set.
//!
//! ## Quick start
//!
//! ```no_run
//! use gangway::{HandoffConfig, HandoffOrchestrator, NewSessionRequest};
//! use gangway::storage::account::test::InMemoryAccountStore;
//! use gangway::storage::session::test::InMemorySessionStore;
//! use gangway::storage::verification::test::InMemoryVerificationStore;
//!
//! # async fn run() -> gangway::Result<()> {
//! let config = HandoffConfig::from_env();
//! let orchestrator = HandoffOrchestrator::new(
//!     InMemoryAccountStore::new(),
//!     InMemorySessionStore::new(),
//!     InMemoryVerificationStore::new(),
//!     config,
//! )?;
//!
//! let outcome = orchestrator
//!     .login(
//!         "ada@example.com",
//!         "correct horse battery staple",
//!         NewSessionRequest {
//!             redirect_to: Some("/settings".to_string()),
//!             remember: true,
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod flows;
pub mod password;
pub mod profile;
pub mod providers;
pub mod redirect;
pub mod state;
pub mod storage;
pub mod twofactor;

pub use config::{CookieStateConfig, HandoffConfig, SecretConfig};
pub use credentials::CredentialVerifier;
pub use error::{GangwayError, Result};
pub use flows::{
    BrowserState, Handoff, HandoffOrchestrator, NewSessionRequest, Notice, VerifiedSubmission,
};
pub use password::{PasswordConfig, PasswordHasher};
pub use profile::{ProfileActions, ProfileIntent};
pub use providers::{ConnectionData, ConnectionProvider, ProviderRegistry};
pub use state::{AuthState, PendingVerification};
pub use storage::{Account, AccountStore, Session, SessionStore, VerificationStore};
pub use twofactor::{TWO_FACTOR_VERIFICATION_KIND, TwoFactorGate};

/// Initialize tracing with sensible defaults.
///
/// Respects `RUST_LOG`; set `GANGWAY_LOG_JSON=true` for JSON output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("GANGWAY_LOG_JSON")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
