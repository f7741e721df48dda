//! HTTP handler for embedded static assets.

use axum::{
    body::Body,
    http::{HeaderValue, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::{static_assets, views::error_pages};

/// Serve a file from the embedded `static/` folder, or the not-found page.
///
/// Installed as the router fallback, so anything no route claims ends up here.
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn serve_embedded_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    let Some(content) = static_assets::Assets::get(path).filter(|_| !path.is_empty()) else {
        debug!("No route or asset for {}", uri.path());
        return error_pages::not_found().await;
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut response = Body::from(content.data.into_owned()).into_response();
    let headers = response.headers_mut();
    if let Ok(content_type) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    // Vehicle photos rarely change; stylesheets and scripts change with releases
    let cache_control = if path.starts_with("images/") {
        "public, max-age=86400"
    } else {
        "no-cache"
    };
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    response
}
