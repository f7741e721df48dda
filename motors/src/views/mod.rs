//! Server-rendered pages.
//!
//! Handlers take a [`Site`] extractor, which gathers what every page shows (navigation,
//! the logged-in account, notices left by a redirect), and return a [`Page`]: a template
//! name plus its context. Rendering happens in `Page`'s `IntoResponse`.
//!
//! - [`nav`]: navigation links and classification options
//! - [`flash`]: notices carried across redirects
//! - [`templates`]: the shared minijinja environment and its filters
//! - [`error_pages`]: middleware that turns error responses into full pages

pub mod error_pages;
pub mod flash;
pub mod nav;
pub mod templates;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use minijinja::Value;
use serde::Serialize;
use sqlx::PgConnection;
use std::collections::BTreeMap;

use crate::{
    AppState,
    auth::{current_account::CurrentAccount, session::SessionAccount},
    db::{
        errors::DbError,
        handlers::{Classifications, Repository},
        models::classifications::ClassificationDBResponse,
    },
    errors::Error,
    validation::ValidationErrors,
};
use flash::{Flash, FlashConsumed};
use nav::NavLink;

/// Per-request page chrome.
#[derive(Debug, Clone)]
pub struct Site {
    pub classifications: Vec<ClassificationDBResponse>,
    pub nav: Vec<NavLink>,
    pub account: Option<SessionAccount>,
    pub notices: Vec<String>,
}

impl FromRequestParts<AppState> for Site {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Flash(notices) = Flash::from_request_parts(parts, state).await.unwrap_or_default();
        let account =
            <CurrentAccount as axum::extract::OptionalFromRequestParts<AppState>>::from_request_parts(parts, state)
                .await?
                .map(|CurrentAccount(account)| account);

        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let classifications = Classifications::new(&mut conn).list(&()).await?;

        Ok(Site {
            nav: nav::build_nav(&classifications),
            classifications,
            account,
            notices,
        })
    }
}

impl Site {
    /// Reload classifications after a change so the navigation and options include it.
    pub async fn refresh(&mut self, conn: &mut PgConnection) -> Result<(), DbError> {
        self.classifications = Classifications::new(conn).list(&()).await?;
        self.nav = nav::build_nav(&self.classifications);
        Ok(())
    }

    /// A page with the shared chrome already in its context.
    pub fn page(&self, template: &'static str, title: impl Into<String>) -> Page {
        let mut page = Page::new(template, title)
            .with("nav", &self.nav)
            .with("account", &self.account);
        if !self.notices.is_empty() {
            page.notices.extend(self.notices.iter().cloned());
            page.consumes_flash = true;
        }
        page
    }

    pub fn classification_options(&self, selected: Option<i32>) -> Vec<nav::ClassificationOption> {
        nav::classification_options(&self.classifications, selected)
    }
}

/// A template and everything it needs, rendered on response.
#[derive(Debug)]
pub struct Page {
    template: &'static str,
    status: StatusCode,
    context: BTreeMap<&'static str, Value>,
    notices: Vec<String>,
    consumes_flash: bool,
}

impl Page {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        let mut context = BTreeMap::new();
        context.insert("title", Value::from(title.into()));
        Self {
            template,
            status: StatusCode::OK,
            context,
            notices: Vec::new(),
            consumes_flash: false,
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Serialize) -> Self {
        self.context.insert(key, Value::from_serialize(value));
        self
    }

    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notices.push(notice.into());
        self
    }

    pub fn errors(self, errors: &ValidationErrors) -> Self {
        self.with("errors", errors)
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for Page {
    fn into_response(mut self) -> Response {
        self.context.insert("notices", Value::from_serialize(&self.notices));

        match templates::render(self.template, Value::from_serialize(&self.context)) {
            Ok(body) => {
                let mut response = (self.status, Html(body)).into_response();
                if self.consumes_flash {
                    response.extensions_mut().insert(FlashConsumed);
                }
                response
            }
            Err(e) => Error::Internal {
                operation: format!("render template {}: {e:#}", self.template),
            }
            .into_response(),
        }
    }
}
