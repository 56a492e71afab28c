//! Inputs and outcomes of the hand-off flows.

use crate::state::{AuthState, PendingVerification};
use axum::http::{HeaderValue, header::SET_COOKIE};
use axum::response::{IntoResponse, Redirect, Response};
use cookie::Cookie;

/// Browser-side state read at the start of a request.
///
/// Decrypted snapshots of the auth and pending-verification cookies. A
/// missing or undecryptable auth cookie reads as the default (signed-out)
/// state.
#[derive(Clone, Debug, Default)]
pub struct BrowserState {
    /// Auth cookie contents.
    pub auth: AuthState,
    /// Pending-verification cookie contents, if a challenge is in flight.
    pub pending: Option<PendingVerification>,
}

/// Parameters of a freshly verified login submission.
#[derive(Clone, Debug, Default)]
pub struct NewSessionRequest {
    /// Caller-supplied destination, sanitized before use.
    pub redirect_to: Option<String>,
    /// Whether the session should outlive the browser.
    pub remember: bool,
}

/// Parameters of a completed two-factor challenge.
#[derive(Clone, Debug, Default)]
pub struct VerifiedSubmission {
    /// Caller-supplied destination, sanitized before use.
    pub redirect_to: Option<String>,
}

/// A user-facing notice attached to a rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Outcome of a hand-off step.
///
/// Every variant carries the full set of cookies to send; callers apply
/// them and redirect, nothing else. The variants are exhaustive on purpose:
/// a flow step either finishes the hand-off, demands a challenge, or
/// rejects with a notice.
#[derive(Debug)]
pub enum Handoff {
    /// The session reached the auth cookie; send the user on their way.
    Finalized {
        redirect_to: String,
        cookies: Vec<Cookie<'static>>,
    },
    /// A two-factor challenge is required before the session is usable.
    ChallengeRequired {
        challenge_url: String,
        cookies: Vec<Cookie<'static>>,
    },
    /// The hand-off cannot proceed; route the user back with a notice.
    Rejected {
        redirect_to: String,
        cookies: Vec<Cookie<'static>>,
        notice: Notice,
    },
}

impl Handoff {
    /// The redirect destination of this outcome.
    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            Self::Finalized { redirect_to, .. } | Self::Rejected { redirect_to, .. } => redirect_to,
            Self::ChallengeRequired { challenge_url, .. } => challenge_url,
        }
    }

    /// The cookies to set alongside the redirect.
    #[must_use]
    pub fn cookies(&self) -> &[Cookie<'static>] {
        match self {
            Self::Finalized { cookies, .. }
            | Self::ChallengeRequired { cookies, .. }
            | Self::Rejected { cookies, .. } => cookies,
        }
    }
}

impl IntoResponse for Handoff {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(self.location()).into_response();
        for cookie in self.cookies() {
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}
