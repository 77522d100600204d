//! HTTP surface of the proxy.
//!
//! | route           | behaviour                                         |
//! |-----------------|---------------------------------------------------|
//! | `GET /f`, `/f/` | static demonstration page                         |
//! | `GET /f/{*url}` | fetch `url` (query string appended), rewrite, serve |
//!
//! Every failure on the proxy route becomes a 500 with a short HTML error
//! page; see [`ProxyError`].

mod demo;
mod error;
mod proxy;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use plainview_config::PlainviewConfig;
use plainview_http::{FetchOptions, HttpError, PageClient};
use plainview_rewrite::{RewritePolicy, Rewriter};
use tower_http::trace::TraceLayer;

pub use demo::DEMO_PAGE;
pub use error::{ProxyError, error_page};

/// Shared by every request. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: Arc<PageClient>,
    pub rewriter: Rewriter,
}

impl AppState {
    pub fn new(client: PageClient, rewriter: Rewriter) -> Self {
        Self {
            client: Arc::new(client),
            rewriter,
        }
    }

    /// Build the fetcher and rewriter described by a loaded configuration.
    pub fn from_config(cfg: &PlainviewConfig) -> Result<Self, HttpError> {
        let client = PageClient::new(FetchOptions {
            user_agent: cfg.fetch.user_agent.clone(),
            timeout: Duration::from_secs(cfg.fetch.timeout_secs),
            connect_timeout: Duration::from_secs(cfg.fetch.connect_timeout_secs),
        })?;
        let rewriter = Rewriter::new(RewritePolicy {
            link_quota: cfg.rewrite.link_quota,
        });
        Ok(Self::new(client, rewriter))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/f", get(demo::demo_page))
        .route("/f/", get(demo::demo_page))
        .route("/f/{*target}", get(proxy::proxy_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
