use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use plainview_http::HttpError;
use plainview_rewrite::{Document, Element, RewriteError};
use thiserror::Error;
use tokio::task::JoinError;

const ERROR_HEADING: &str = "Error fetching page";

/// Anything that can go wrong between receiving a target and sending the
/// rewritten page. All variants render the same error page.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid target: {0}")]
    Target(#[from] PathRejection),
    #[error(transparent)]
    Fetch(#[from] HttpError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("rewrite task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!(error = %message, "proxy.failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(error_page(&message))).into_response()
    }
}

/// Heading plus one paragraph carrying `message`, HTML-escaped.
///
/// ```
/// let page = plainview_server::error_page("bad <host> & co");
/// assert_eq!(
///     page,
///     "<h1>Error fetching page</h1><p>bad &lt;host&gt; &amp; co</p>"
/// );
/// ```
pub fn error_page(message: &str) -> String {
    let doc = Document::default()
        .with_child(Element::html("h1").with_child(ERROR_HEADING))
        .with_child(Element::html("p").with_child(message));
    doc.to_html()
        .unwrap_or_else(|_| format!("<h1>{ERROR_HEADING}</h1>"))
}
