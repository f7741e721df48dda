//! Middleware that renders error responses as full HTML pages.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use tracing::warn;

use super::{nav, templates};
use crate::{
    AppState,
    db::handlers::{Classifications, Repository},
    errors::ErrorReport,
};

pub const CRASH_MESSAGE: &str = "Oh no! There was a crash. Maybe try a different route?";
pub const LOST_PAGE_MESSAGE: &str = "Sorry, we appear to have lost that page.";

/// Router fallback for paths that match no route.
pub async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    let mut response = (status, LOST_PAGE_MESSAGE).into_response();
    response.extensions_mut().insert(ErrorReport {
        status,
        message: LOST_PAGE_MESSAGE.to_string(),
    });
    response
}

/// Not-found errors show their own message; everything else gets the generic one.
pub fn display_message(report: &ErrorReport) -> &str {
    if report.status == StatusCode::NOT_FOUND {
        &report.message
    } else {
        CRASH_MESSAGE
    }
}

pub async fn error_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    // The navigation is a nicety here; a broken database must not hide the error page
    let classifications = match state.db.acquire().await {
        Ok(mut conn) => Classifications::new(&mut conn).list(&()).await.unwrap_or_default(),
        Err(_) => Vec::new(),
    };

    let title = report.status.canonical_reason().unwrap_or("Server Error");
    let rendered = templates::render(
        "errors/error.html",
        context! {
            title => title,
            status => report.status.as_u16(),
            message => display_message(&report),
            nav => nav::build_nav(&classifications),
            notices => Vec::<String>::new(),
        },
    );

    match rendered {
        Ok(body) => {
            let mut page = (report.status, Html(body)).into_response();
            *page.extensions_mut() = response.extensions().clone();
            page
        }
        Err(e) => {
            warn!("Failed to render error page: {e:#}");
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_message() {
        let not_found = ErrorReport {
            status: StatusCode::NOT_FOUND,
            message: "Vehicle not found".to_string(),
        };
        assert_eq!(display_message(&not_found), "Vehicle not found");

        let crash = ErrorReport {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        };
        assert_eq!(display_message(&crash), CRASH_MESSAGE);
    }

    #[test]
    fn test_error_template_renders() {
        let html = templates::render(
            "errors/error.html",
            context! {
                title => "Not Found",
                status => 404,
                message => "Vehicle not found",
                nav => nav::build_nav(&[]),
                notices => Vec::<String>::new(),
            },
        )
        .unwrap();
        assert!(html.contains("Vehicle not found"));
        assert!(html.contains("404"));
    }
}
