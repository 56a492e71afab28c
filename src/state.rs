//! Cookie-backed browser state.
//!
//! Two independent cookie stores carry the client half of the hand-off flow:
//! the durable auth cookie ([`AuthState`]) and the short-lived
//! pending-verification cookie ([`PendingVerification`]). State is modelled
//! as immutable value snapshots: reading decrypts into a value, and every
//! write goes through [`CookieStateStore::commit`] or
//! [`CookieStateStore::removal`], which return fully built `Set-Cookie`
//! values. Nothing mutates in place.
//!
//! Payloads are serialized to JSON and encrypted with the `cookie` crate's
//! private cookies (XChaCha20-Poly1305), giving both confidentiality and
//! integrity: tampered or foreign cookies decrypt to `None`.

use crate::config::{CookieStateConfig, SecretConfig};
use crate::error::{GangwayError, Result};
use cookie::{Cookie, CookieJar, Key, SameSite};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Durable auth cookie payload.
///
/// Holds at most one authenticated session id plus the time of the last
/// completed two-factor verification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// The finalized session id, if the browser is signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// When a two-factor challenge was last completed from this browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<SystemTime>,
}

impl AuthState {
    /// An empty, signed-out state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot carrying the given session id.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Return a snapshot stamped with a verification time.
    #[must_use]
    pub fn mark_verified(mut self, at: SystemTime) -> Self {
        self.verified_at = Some(at);
        self
    }
}

/// Pending-verification cookie payload.
///
/// Exists only while a two-factor challenge is outstanding: the session has
/// been created server-side but must not reach the auth cookie until the
/// challenge completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVerification {
    /// The session awaiting verification.
    pub unverified_session_id: String,
    /// Whether "remember me" was requested at login.
    #[serde(default)]
    pub remember: bool,
}

/// Build the cookie encryption key from configuration.
///
/// # Errors
///
/// Returns an error if no `encryption_key` is configured and
/// `allow_insecure_key` is `false`, or if the key is not exactly 64 bytes
/// of hex (128 hex chars).
pub fn load_key(config: &SecretConfig) -> Result<Arc<Key>> {
    let key = if let Some(ref key_str) = config.encryption_key {
        // The cookie crate requires 64 bytes for private cookie encryption.
        let key_bytes = hex::decode(key_str)
            .map_err(|e| GangwayError::internal(format!("Invalid encryption key format: {}", e)))?;

        if key_bytes.len() != 64 {
            return Err(GangwayError::internal(
                "Encryption key must be 64 bytes (128 hex characters). Generate with: openssl rand -hex 64",
            ));
        }

        Key::from(&key_bytes)
    } else if config.allow_insecure_key {
        tracing::error!(
            "SECURITY WARNING: using a randomly generated cookie encryption key; \
             sessions will not survive a restart and cannot be shared between \
             instances. Set GANGWAY_SESSION_ENCRYPTION_KEY in production."
        );
        Key::generate()
    } else {
        return Err(GangwayError::internal(
            "Cookie state requires an encryption key. \
             Set GANGWAY_SESSION_ENCRYPTION_KEY or config.secret.encryption_key. \
             Generate a key with: openssl rand -hex 64. \
             For development only, set GANGWAY_SESSION_ALLOW_INSECURE_KEY=true.",
        ));
    };

    Ok(Arc::new(key))
}

/// One cookie-backed state store.
///
/// Generic over its payload type so the auth and pending-verification
/// cookies share the machinery but can never be confused for each other:
/// each store is bound to its own cookie name and lifetime.
#[derive(Clone)]
pub struct CookieStateStore<T> {
    key: Arc<Key>,
    config: CookieStateConfig,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> CookieStateStore<T> {
    /// Create a store bound to a cookie name and key.
    #[must_use]
    pub fn new(key: Arc<Key>, config: CookieStateConfig) -> Self {
        Self {
            key,
            config,
            _payload: PhantomData,
        }
    }

    /// The configured cookie name.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.config.name
    }

    /// Encrypt a state snapshot into a cookie value.
    pub fn encrypt(&self, state: &T) -> Result<String> {
        let serialized = serde_json::to_string(state)
            .map_err(|e| GangwayError::internal(format!("Failed to serialize state: {}", e)))?;

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key)
            .add(Cookie::new(self.config.name.clone(), serialized));

        let encrypted = jar
            .get(&self.config.name)
            .ok_or_else(|| GangwayError::internal("Failed to encrypt state cookie"))?;

        Ok(encrypted.value().to_string())
    }

    /// Decrypt a cookie value back into a state snapshot.
    ///
    /// Returns `Ok(None)` when the value is missing, tampered with, or was
    /// encrypted under a different key.
    pub fn decrypt(&self, encrypted_value: &str) -> Result<Option<T>> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(
            self.config.name.clone(),
            encrypted_value.to_string(),
        ));

        match jar.private(&self.key).get(&self.config.name) {
            Some(cookie) => {
                let state: T = serde_json::from_str(cookie.value()).map_err(|e| {
                    GangwayError::internal(format!("Failed to deserialize state: {}", e))
                })?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    /// Commit a state snapshot, returning the `Set-Cookie` to send.
    ///
    /// Expiry precedence: an explicit `expires` wins (used by "remember me"
    /// to pin the auth cookie to the session's expiry), then the configured
    /// `max_age` (used by the pending cookie's short lifetime); with
    /// neither, the result is a browser-lifetime cookie.
    pub fn commit(&self, state: &T, expires: Option<SystemTime>) -> Result<Cookie<'static>> {
        let encrypted = self.encrypt(state)?;

        let mut builder = Cookie::build((self.config.name.clone(), encrypted))
            .path(self.config.path.clone())
            .http_only(self.config.http_only)
            .secure(self.config.secure)
            .same_site(SameSite::Lax);

        if let Some(expires) = expires {
            builder = builder.expires(to_offset_datetime(expires));
        } else if let Some(max_age) = self.config.max_age() {
            builder = builder.max_age(cookie::time::Duration::seconds(max_age.as_secs() as i64));
        }

        Ok(builder.build())
    }

    /// Build the removal cookie that destroys this store's state.
    #[must_use]
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.config.name.clone(), ""))
            .path(self.config.path.clone())
            .http_only(self.config.http_only)
            .secure(self.config.secure)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::ZERO)
            .build()
    }
}

fn to_offset_datetime(time: SystemTime) -> cookie::time::OffsetDateTime {
    let unix = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    cookie::time::OffsetDateTime::from_unix_timestamp(unix)
        .unwrap_or(cookie::time::OffsetDateTime::UNIX_EPOCH)
}
