//! Files compiled into the binary: page templates and public static assets.

use rust_embed::RustEmbed;

/// CSS, JavaScript and images served under `/css`, `/js` and `/images`.
#[derive(RustEmbed)]
#[folder = "static/"]
pub struct Assets;

/// minijinja templates loaded by [`crate::views::templates`].
#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct Templates;
