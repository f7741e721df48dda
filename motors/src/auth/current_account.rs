//! Extractor for the logged-in account.
//!
//! `CurrentAccount` in a handler signature acts as the login guard: anonymous requests are
//! rejected with [`Error::Unauthenticated`], which redirects to the login page. Handlers
//! that only want to know *whether* someone is logged in take `Option<CurrentAccount>`.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use tracing::{instrument, trace};

use crate::{
    AppState,
    auth::{
        session::{self, SessionAccount},
        utils::cookie_value,
    },
    errors::{Error, Result},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAccount(pub SessionAccount);

/// Account from the session cookie, or `None` when absent or no longer valid.
fn session_account(parts: &Parts, state: &AppState) -> Option<SessionAccount> {
    let token = cookie_value(&parts.headers, &state.config.auth.session.cookie_name)?;
    match session::verify_session_token(token, &state.config) {
        Ok(account) => Some(account),
        Err(e) => {
            // Expired or tampered tokens are treated as logged out
            trace!("Ignoring invalid session cookie: {e}");
            None
        }
    }
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        session_account(parts, state)
            .map(CurrentAccount)
            .ok_or(Error::Unauthenticated { message: None })
    }
}

impl OptionalFromRequestParts<AppState> for CurrentAccount {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Option<Self>> {
        Ok(session_account(parts, state).map(CurrentAccount))
    }
}
