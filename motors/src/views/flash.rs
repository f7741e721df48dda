//! One-request notices carried across a redirect in a short-lived cookie.
//!
//! A handler that redirects attaches a [`FlashMessage`] to its response; the
//! [`persist_flash`] middleware turns it into a cookie. The next page reads it with the
//! [`Flash`] extractor, and once a [`super::Page`] has shown the notices the middleware
//! clears the cookie again.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine as _, engine::general_purpose};
use std::convert::Infallible;
use tracing::warn;

use crate::{
    AppState,
    auth::utils::{build_cookie, cookie_value},
};

/// How long an unread notice survives.
const FLASH_MAX_AGE_SECS: u64 = 60;

/// Response extension: notices to show on the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashMessage(Vec<String>);

impl FlashMessage {
    pub fn new(notice: impl Into<String>) -> Self {
        Self(vec![notice.into()])
    }

    pub fn notices(&self) -> &[String] {
        &self.0
    }
}

/// Response extension: the incoming notices were displayed and can be dropped.
#[derive(Debug, Clone, Copy)]
pub struct FlashConsumed;

/// Notices left by the previous response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash(pub Vec<String>);

impl FromRequestParts<AppState> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let notices = cookie_value(&parts.headers, &state.config.flash_cookie_name)
            .and_then(decode)
            .unwrap_or_default();
        Ok(Flash(notices))
    }
}

pub fn encode(notices: &[String]) -> String {
    let json = serde_json::to_vec(notices).unwrap_or_default();
    general_purpose::URL_SAFE_NO_PAD.encode(json)
}

pub fn decode(value: &str) -> Option<Vec<String>> {
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// `303 See Other` to `to`, with a notice for the page it lands on.
pub fn redirect_with_notice(to: &str, notice: impl Into<String>) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.extensions_mut().insert(FlashMessage::new(notice));
    response
}

/// Writes or clears the flash cookie according to the response extensions.
pub async fn persist_flash(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let session = &state.config.auth.session;

    let cookie = if let Some(flash) = response.extensions().get::<FlashMessage>() {
        Some(build_cookie(&state.config.flash_cookie_name, &encode(flash.notices()), FLASH_MAX_AGE_SECS, session))
    } else if response.extensions().get::<FlashConsumed>().is_some() {
        Some(build_cookie(&state.config.flash_cookie_name, "", 0, session))
    } else {
        None
    };

    if let Some(cookie) = cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping unencodable flash cookie: {e}"),
        }
    }
    response
}
