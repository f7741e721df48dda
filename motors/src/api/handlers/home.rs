//! Site-level pages.

use tracing::instrument;

use crate::views::{Page, Site};

#[instrument(skip_all)]
pub async fn build_home(site: Site) -> Page {
    site.page("index.html", "Home")
}

pub async fn healthz() -> &'static str {
    "OK"
}
