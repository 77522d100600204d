use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::response::Html;
use plainview_http::FetchedPage;
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::error::ProxyError;

/// `GET /f/{*target}`: fetch, rewrite, serve.
pub(crate) async fn proxy_page(
    State(state): State<AppState>,
    target: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ProxyError> {
    let Path(target) = target?;
    let target = with_query(target, query.as_deref());
    let span = tracing::info_span!("proxy", req_id = %Uuid::new_v4());
    fetch_and_rewrite(state, target).instrument(span).await
}

async fn fetch_and_rewrite(state: AppState, target: String) -> Result<Html<String>, ProxyError> {
    let FetchedPage {
        url, encoding, body, ..
    } = state.client.fetch(&target).await?;

    // Parsing large pages is CPU-bound; keep it off the reactor.
    let rewriter = state.rewriter;
    let span = tracing::Span::current();
    let out = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        rewriter.rewrite(&body)
    })
    .await??;

    tracing::info!(
        url = %url,
        encoding,
        removed = out.stats.removed,
        defanged = out.stats.defanged,
        "proxy.served"
    );
    Ok(Html(out.html))
}

/// The router strips the query from the wildcard; put it back.
fn with_query(target: String, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{target}?{q}"),
        _ => target,
    }
}
