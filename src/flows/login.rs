//! Login half of the hand-off.
//!
//! A verified credential submission either finalizes straight into the
//! auth cookie or detours through a two-factor challenge. The branch
//! decision happens exactly once, here; the verify flow never re-checks
//! credentials.

use super::types::{BrowserState, Handoff, NewSessionRequest};
use super::HandoffOrchestrator;
use crate::error::Result;
use crate::redirect::sanitize_redirect;
use crate::state::PendingVerification;
use crate::storage::{AccountStore, Session, SessionStore, VerificationStore};
use crate::twofactor::TWO_FACTOR_VERIFICATION_KIND;

impl<A, S, V> HandoffOrchestrator<A, S, V>
where
    A: AccountStore,
    S: SessionStore + Clone,
    V: VerificationStore,
{
    /// Verify credentials and, on success, run the session hand-off.
    ///
    /// Returns `Ok(None)` when the credentials do not check out; the caller
    /// re-renders the login form.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        request: NewSessionRequest,
    ) -> Result<Option<Handoff>> {
        let Some(session) = self.verifier.verify(email, password).await? else {
            return Ok(None);
        };
        Ok(Some(self.handle_new_session(session, request).await?))
    }

    /// Hand off a freshly created session to the browser.
    ///
    /// With two-factor enabled for the account, the session id is parked in
    /// the short-lived pending cookie and the user is sent to the challenge
    /// endpoint; the auth cookie is not touched. Otherwise the session goes
    /// straight into the auth cookie, pinned to the session expiry when
    /// "remember me" was requested.
    pub async fn handle_new_session(
        &self,
        session: Session,
        request: NewSessionRequest,
    ) -> Result<Handoff> {
        if self.gate.is_enabled_for(&session.account_id).await? {
            let pending = PendingVerification {
                unverified_session_id: session.id.clone(),
                remember: request.remember,
            };
            let cookie = self.pending_cookies.commit(&pending, None)?;
            let challenge_url =
                self.challenge_url(&session.account_id, request.redirect_to.as_deref());

            tracing::info!(
                target: "auth.handoff.challenge",
                account_id = %session.account_id,
                "Two-factor enabled, routing to challenge"
            );

            return Ok(Handoff::ChallengeRequired {
                challenge_url,
                cookies: vec![cookie],
            });
        }

        let auth = crate::state::AuthState::new().with_session(&session.id);
        let expires = request.remember.then_some(session.expires_at);
        let cookie = self.auth_cookies.commit(&auth, expires)?;
        let redirect_to = sanitize_redirect(
            request.redirect_to.as_deref(),
            &self.config.default_redirect,
        );

        tracing::info!(
            target: "auth.handoff.finalized",
            account_id = %session.account_id,
            remember = request.remember,
            "Session handed off to browser"
        );

        Ok(Handoff::Finalized {
            redirect_to,
            cookies: vec![cookie],
        })
    }

    /// Decide whether the current browser must pass a two-factor challenge
    /// before performing a sensitive action.
    ///
    /// An outstanding pending verification always demands one. A signed-out
    /// browser never does (there is nothing to protect yet). Otherwise the
    /// answer is "2FA enabled and the last verification has gone stale".
    pub async fn should_request_two_factor(&self, browser: &BrowserState) -> Result<bool> {
        if browser.pending.is_some() {
            return Ok(true);
        }
        let Some(ref session_id) = browser.auth.session_id else {
            return Ok(false);
        };
        let Some(session) = self.sessions.find_session(session_id).await? else {
            return Ok(false);
        };
        if !self.gate.is_enabled_for(&session.account_id).await? {
            return Ok(false);
        }
        Ok(!self
            .gate
            .is_freshly_verified(&browser.auth, browser.pending.as_ref()))
    }

    /// Sign out: delete the server-side session and clear both cookies.
    ///
    /// Idempotent; a missing or already-deleted session still clears the
    /// browser state.
    pub async fn logout(&self, browser: &BrowserState) -> Result<Handoff> {
        if let Some(ref session_id) = browser.auth.session_id {
            self.sessions.delete_session(session_id).await?;
        }

        Ok(Handoff::Finalized {
            redirect_to: self.config.logout_redirect.clone(),
            cookies: vec![self.auth_cookies.removal(), self.pending_cookies.removal()],
        })
    }

    fn challenge_url(&self, account_id: &str, redirect_to: Option<&str>) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("type", TWO_FACTOR_VERIFICATION_KIND);
        query.append_pair("target", account_id);
        if let Some(redirect_to) = redirect_to {
            query.append_pair("redirectTo", redirect_to);
        }
        format!("{}?{}", self.config.challenge_path, query.finish())
    }
}
