//! Challenge-completion half of the hand-off.
//!
//! Runs after the two-factor challenge itself has been answered correctly.
//! The parked session moves from the pending cookie into the auth cookie,
//! the verification time is stamped, and the pending cookie is destroyed
//! no matter which branch is taken.

use super::types::{BrowserState, Handoff, Notice, VerifiedSubmission};
use super::HandoffOrchestrator;
use crate::error::Result;
use crate::redirect::sanitize_redirect;
use crate::storage::{AccountStore, SessionStore, VerificationStore};
use std::time::SystemTime;

impl<A, S, V> HandoffOrchestrator<A, S, V>
where
    A: AccountStore,
    S: SessionStore + Clone,
    V: VerificationStore,
{
    /// Finalize the hand-off after a successful challenge.
    ///
    /// The verification time is stamped even when no pending session exists
    /// (a signed-in user re-verifying for a sensitive action). A pending
    /// session that has vanished server-side rejects back to login rather
    /// than signing the browser in with a dead session id.
    pub async fn handle_verification(
        &self,
        browser: &BrowserState,
        submission: VerifiedSubmission,
    ) -> Result<Handoff> {
        let auth = browser.auth.clone().mark_verified(SystemTime::now());
        let pending_removal = self.pending_cookies.removal();

        let Some(ref pending) = browser.pending else {
            let cookie = self.auth_cookies.commit(&auth, None)?;
            let redirect_to = sanitize_redirect(
                submission.redirect_to.as_deref(),
                &self.config.default_redirect,
            );
            return Ok(Handoff::Finalized {
                redirect_to,
                cookies: vec![cookie, pending_removal],
            });
        };

        let Some(session) = self
            .sessions
            .find_session(&pending.unverified_session_id)
            .await?
        else {
            tracing::warn!(
                target: "auth.handoff.stale_pending",
                "Pending session no longer exists, rejecting verification"
            );
            return Ok(Handoff::Rejected {
                redirect_to: self.config.login_path.clone(),
                cookies: vec![pending_removal],
                notice: Notice {
                    title: "Invalid session".to_string(),
                    description: "Could not find session to verify. Please try again.".to_string(),
                },
            });
        };

        let auth = auth.with_session(&session.id);
        let expires = pending.remember.then_some(session.expires_at);
        let auth_cookie = self.auth_cookies.commit(&auth, expires)?;
        let redirect_to = sanitize_redirect(
            submission.redirect_to.as_deref(),
            &self.config.default_redirect,
        );

        tracing::info!(
            target: "auth.handoff.finalized",
            account_id = %session.account_id,
            remember = pending.remember,
            "Challenge passed, session handed off to browser"
        );

        Ok(Handoff::Finalized {
            redirect_to,
            cookies: vec![auth_cookie, pending_removal],
        })
    }
}
