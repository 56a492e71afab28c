use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for the session hand-off flow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandoffConfig {
    /// Lifetime of a server-side session record (in seconds)
    #[serde(default = "default_session_lifetime_seconds")]
    pub session_lifetime_seconds: u64,

    /// How long a prior two-factor verification counts as fresh (in seconds)
    #[serde(default = "default_freshness_window_seconds")]
    pub freshness_window_seconds: u64,

    /// Landing page used when no (or an unsafe) destination is supplied
    #[serde(default = "default_redirect")]
    pub default_redirect: String,

    /// Login entry point, used when a pending verification turns out stale
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Two-factor challenge endpoint the hand-off redirects into
    #[serde(default = "default_challenge_path")]
    pub challenge_path: String,

    /// Destination after a sign-out
    #[serde(default = "default_logout_redirect")]
    pub logout_redirect: String,

    /// Cookie encryption key shared by both cookie-backed stores
    #[serde(default)]
    pub secret: SecretConfig,

    /// Durable auth session cookie
    #[serde(default = "default_auth_cookie")]
    pub auth_cookie: CookieStateConfig,

    /// Short-lived pending-verification cookie
    #[serde(default = "default_pending_cookie")]
    pub pending_cookie: CookieStateConfig,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            session_lifetime_seconds: default_session_lifetime_seconds(),
            freshness_window_seconds: default_freshness_window_seconds(),
            default_redirect: default_redirect(),
            login_path: default_login_path(),
            challenge_path: default_challenge_path(),
            logout_redirect: default_logout_redirect(),
            secret: SecretConfig::default(),
            auth_cookie: default_auth_cookie(),
            pending_cookie: default_pending_cookie(),
        }
    }
}

impl HandoffConfig {
    /// Load configuration from environment variables.
    ///
    /// Each variable is checked with a `GANGWAY_` prefix first, then bare.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_var("SESSION_LIFETIME_SECONDS") {
            if let Ok(secs) = secs.parse() {
                config.session_lifetime_seconds = secs;
            }
        }
        if let Some(secs) = env_var("FRESHNESS_WINDOW_SECONDS") {
            if let Ok(secs) = secs.parse() {
                config.freshness_window_seconds = secs;
            }
        }
        if let Some(path) = env_var("DEFAULT_REDIRECT") {
            config.default_redirect = path;
        }
        if let Some(path) = env_var("LOGIN_PATH") {
            config.login_path = path;
        }
        if let Some(path) = env_var("CHALLENGE_PATH") {
            config.challenge_path = path;
        }
        if let Some(path) = env_var("LOGOUT_REDIRECT") {
            config.logout_redirect = path;
        }
        if let Some(key) = env_var("SESSION_ENCRYPTION_KEY") {
            config.secret.encryption_key = Some(key);
        }
        if let Some(allow) = env_var("SESSION_ALLOW_INSECURE_KEY") {
            config.secret.allow_insecure_key = allow.parse().unwrap_or(false);
        }
        if let Some(name) = env_var("AUTH_COOKIE_NAME") {
            config.auth_cookie.name = name;
        }
        if let Some(secure) = env_var("AUTH_COOKIE_SECURE") {
            config.auth_cookie.secure = secure.parse().unwrap_or(true);
        }
        if let Some(name) = env_var("PENDING_COOKIE_NAME") {
            config.pending_cookie.name = name;
        }
        if let Some(secure) = env_var("PENDING_COOKIE_SECURE") {
            config.pending_cookie.secure = secure.parse().unwrap_or(true);
        }

        config
    }

    /// Session record lifetime as a `Duration`
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_seconds)
    }

    /// Verification freshness window as a `Duration`
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_seconds)
    }
}

/// Cookie encryption key configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    /// Encryption key for cookie state (64 bytes hex-encoded)
    ///
    /// **REQUIRED** in production. Generate with: `openssl rand -hex 64`
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Allow a randomly generated key (FOR DEVELOPMENT ONLY)
    ///
    /// When `true`, cookie stores start without a configured key. Sessions
    /// break across restarts and cannot be shared between instances.
    #[serde(default)]
    pub allow_insecure_key: bool,
}

/// Configuration for one cookie-backed state store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieStateConfig {
    /// Cookie name
    pub name: String,

    /// Cookie path
    #[serde(default = "default_cookie_path")]
    pub path: String,

    /// Secure flag (HTTPS only)
    #[serde(default = "default_true")]
    pub secure: bool,

    /// HttpOnly flag
    #[serde(default = "default_true")]
    pub http_only: bool,

    /// Fixed max-age in seconds; `None` makes a browser-lifetime cookie
    /// unless an explicit expiry is supplied at commit time
    #[serde(default)]
    pub max_age_seconds: Option<u64>,
}

impl CookieStateConfig {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_seconds.map(Duration::from_secs)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("GANGWAY_{}", name))
        .or_else(|_| std::env::var(name))
        .ok()
}

fn default_session_lifetime_seconds() -> u64 {
    60 * 60 * 24 * 30 // 30 days
}

fn default_freshness_window_seconds() -> u64 {
    60 * 60 * 2 // 2 hours
}

fn default_redirect() -> String {
    "/app".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_challenge_path() -> String {
    "/verify".to_string()
}

fn default_logout_redirect() -> String {
    "/".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_auth_cookie() -> CookieStateConfig {
    CookieStateConfig {
        name: "gw_session".to_string(),
        path: default_cookie_path(),
        secure: true,
        http_only: true,
        max_age_seconds: None,
    }
}

fn default_pending_cookie() -> CookieStateConfig {
    CookieStateConfig {
        name: "gw_verification".to_string(),
        path: default_cookie_path(),
        secure: true,
        http_only: true,
        max_age_seconds: Some(60 * 10), // 10 minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HandoffConfig::default();
        assert_eq!(config.session_lifetime(), Duration::from_secs(2_592_000));
        assert_eq!(config.freshness_window(), Duration::from_secs(7_200));
        assert_eq!(config.default_redirect, "/app");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.challenge_path, "/verify");
        assert_eq!(config.logout_redirect, "/");
        assert_eq!(config.auth_cookie.name, "gw_session");
        assert_eq!(config.auth_cookie.max_age_seconds, None);
        assert_eq!(config.pending_cookie.name, "gw_verification");
        assert_eq!(config.pending_cookie.max_age_seconds, Some(600));
        assert!(config.pending_cookie.http_only);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: HandoffConfig =
            serde_json::from_str(r#"{"freshness_window_seconds": 60}"#).unwrap();
        assert_eq!(config.freshness_window(), Duration::from_secs(60));
        assert_eq!(config.session_lifetime_seconds, 2_592_000);
    }
}
