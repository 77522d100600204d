//! Page fetcher for the proxy: one GET per request, decoded to text.
//!
//! - Targets without a scheme default to `http://` ([`normalize_target`])
//! - Browser-like User-Agent and a fixed whole-request timeout
//!   ([`FetchOptions`]); no automatic retries
//! - Body decoded with the detected/apparent encoding ([`charset`])
//! - Non-2xx responses are errors
//! - Redacts sensitive query params before anything is logged
//! - Optional *raw* response logging via `PLAINVIEW_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), plainview_http::HttpError> {
//! let client = plainview_http::PageClient::new(plainview_http::FetchOptions::default())?;
//! let page = client.fetch("example.com/page").await?;
//! assert_eq!(page.url.as_str(), "http://example.com/page");
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, final errors, and (optionally) a raw response dump
//! (target `http.raw`).

pub mod charset;

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode};
use std::env;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "PLAINVIEW_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, secrets redacted.
fn make_curl(url: &Url, user_agent: &str) -> String {
    format!(
        "curl -XGET -H 'User-Agent: {}' '{}'",
        user_agent.replace('\'', r"'\''"),
        redacted_url(url).replace('\'', r"'\''")
    )
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if matches!(key.as_str(), "authorization" | "cookie" | "set-cookie") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status} for {url}")]
    Status { status: StatusCode, url: String },
}

// ==============================
// Target normalization
// ==============================

/// Prepend `http://` unless the target already names `http` or `https`.
///
/// A scheme whose double slash was collapsed by path normalization
/// (`http:/host`) is repaired rather than prefixed.
///
/// ```
/// use plainview_http::normalize_target;
///
/// assert_eq!(normalize_target("example.com/page"), "http://example.com/page");
/// assert_eq!(normalize_target("https://example.com"), "https://example.com");
/// assert_eq!(normalize_target("http:/example.com"), "http://example.com");
/// ```
pub fn normalize_target(raw: &str) -> String {
    let target = raw.trim();
    if starts_with_ignore_case(target, "http://") || starts_with_ignore_case(target, "https://") {
        return target.to_string();
    }
    for scheme in ["http:/", "https:/"] {
        if starts_with_ignore_case(target, scheme) {
            let (head, rest) = target.split_at(scheme.len());
            return format!("{head}/{rest}");
        }
    }
    format!("http://{target}")
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Normalize and parse a proxy target.
pub fn parse_target(raw: &str) -> Result<Url, HttpError> {
    let normalized = normalize_target(raw);
    let url = Url::parse(&normalized).map_err(|e| HttpError::Url(format!("{normalized}: {e}")))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(HttpError::Url(format!("{normalized}: missing host")));
    }
    Ok(url)
}

// ==============================
// Client
// ==============================

/// Knobs fixed for the lifetime of a [`PageClient`].
///
/// ```
/// use plainview_http::FetchOptions;
/// use std::time::Duration;
///
/// let opts = FetchOptions {
///     timeout: Duration::from_secs(3),
///     ..Default::default()
/// };
///
/// assert!(opts.user_agent.starts_with("Mozilla/5.0"));
/// assert_eq!(opts.connect_timeout, Duration::from_secs(5));
/// ```
#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub user_agent: String,
    /// Whole request, connect through end of body.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: plainview_common::default_user_agent(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// A fetched and decoded page.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    /// Name of the encoding the body was decoded with.
    pub encoding: &'static str,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct PageClient {
    inner: Client,
    opts: FetchOptions,
}

impl PageClient {
    /// Build the underlying connection pool.
    ///
    /// ```no_run
    /// use plainview_http::{FetchOptions, HttpError, PageClient};
    /// use std::time::Duration;
    ///
    /// let client = PageClient::new(FetchOptions::default())?;
    /// assert_eq!(client.options().timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(opts: FetchOptions) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .user_agent(opts.user_agent.clone())
            .connect_timeout(opts.connect_timeout)
            .build()
            .map_err(|e| HttpError::Build(error_chain(&e)))?;
        Ok(Self { inner, opts })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// GET `target` (normalized first) and decode the body.
    pub async fn fetch(&self, target: &str) -> Result<FetchedPage, HttpError> {
        let url = parse_target(target)?;
        let shown = redacted_url(&url);
        let timeout = self.opts.timeout;

        tracing::debug!(
            url=%shown,
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&url, &self.opts.user_agent);
            tracing::debug!(target: "http.raw", %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| self.transport_error(err, &shown, "send"))?;

        let status = resp.status();
        let final_url = resp.url().clone();
        let headers = resp.headers().clone();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| self.transport_error(err, &shown, "body"))?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(
            url=%shown,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            content_type=?content_type,
            redirected=%(final_url != url),
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                url=%shown,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        // ----- Non-success -----
        if !status.is_success() {
            tracing::warn!(
                url=%shown,
                %status,
                body_snippet=%snip_body(&bytes),
                "http.error"
            );
            return Err(HttpError::Status { status, url: shown });
        }

        // ----- Decode -----
        let decoded = charset::decode(&bytes, content_type.as_deref(), tld_of(&final_url));
        if decoded.had_errors {
            tracing::debug!(
                url=%shown,
                encoding=decoded.encoding.name(),
                "http.response.malformed_bytes_replaced"
            );
        }

        Ok(FetchedPage {
            url: final_url,
            status,
            content_type,
            encoding: decoded.encoding.name(),
            body: decoded.text,
        })
    }

    fn transport_error(&self, err: reqwest::Error, shown: &str, stage: &'static str) -> HttpError {
        let message = error_chain(&err);
        if err.is_timeout() {
            tracing::warn!(url=%shown, stage, message=%message, "http.timeout");
            return HttpError::Timeout(self.opts.timeout);
        }
        tracing::warn!(url=%shown, stage, message=%message, "http.network_error");
        HttpError::Network(message)
    }
}

// ==============================
// Helpers
// ==============================

/// `reqwest` hides the root cause (DNS, refused, TLS) in the source chain.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(&body[..body.len().min(SNIPPET_MAX)]).into_owned();
    if body.len() > SNIPPET_MAX {
        snip.push_str("...");
    }
    snip
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
            | "password"
    )
}

/// Full URL for logs: password and secret query values masked.
fn redacted_url(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() {
        let _ = shown.set_password(Some("<redacted>"));
    }
    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if is_secret_param(&k) {
                    "<redacted>".to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        shown.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    shown.to_string()
}

/// Top-level domain label, used as a hint for encoding detection.
fn tld_of(url: &Url) -> Option<&str> {
    let host = url.domain()?;
    let tld = host.rsplit('.').next()?;
    tld.bytes().all(|b| b.is_ascii_alphabetic()).then_some(tld)
}
