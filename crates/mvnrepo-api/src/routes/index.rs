//! # Banner
//!
//! `GET /` returns a small HTML page identifying the server.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const BANNER: &str = concat!(
    "<!DOCTYPE html>\n",
    "<html>\n",
    "<head><title>mvnrepo</title></head>\n",
    "<body>\n",
    "<h1>mvnrepo ",
    env!("CARGO_PKG_VERSION"),
    "</h1>\n",
    "<p>Maven artifact repository. Artifacts are served under ",
    "<code>/repositories/{repository}/{path}</code> ",
    "and <code>/{path}</code> for the default repository.</p>\n",
    "</body>\n",
    "</html>\n",
);

/// Build the banner router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(banner))
}

async fn banner() -> Html<&'static str> {
    Html(BANNER)
}
