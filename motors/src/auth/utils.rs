//! Cookie helpers shared by the session and flash cookies.

use axum::http::{HeaderMap, header};

use crate::config::SessionConfig;

/// Value of the named cookie in the request's `Cookie` headers, if present.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(cookie_name, _)| *cookie_name == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value with the site-wide attributes from the session settings.
pub fn build_cookie(name: &str, value: &str, max_age_secs: u64, session: &SessionConfig) -> String {
    let secure = if session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{name}={value}; Path=/; HttpOnly{secure}; SameSite={}; Max-Age={max_age_secs}",
        session.cookie_same_site
    )
}
