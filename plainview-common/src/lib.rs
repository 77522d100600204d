//! Common utilities shared across plainview crates.
//!
//! Kept dependency-minimal so every crate in the workspace (and every
//! integration test) can depend on it without pulling in the HTTP or HTML
//! stacks.
//!
//! # Overview
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`APP_NAME`] and [`APP_VERSION`]: identity used for log files and the
//!   default outbound User-Agent
//!
//! ```rust
//! use plainview_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig::default();
//! assert_eq!(cfg.app_name, plainview_common::APP_NAME);
//! assert_eq!(cfg.format, LogFormat::Text);
//! ```

pub mod observability;

/// Logical application name.
pub const APP_NAME: &str = "plainview";

/// Workspace version, baked in at compile time.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Browser-like User-Agent sent on outbound fetches unless configured
/// otherwise.
pub fn default_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; {APP_NAME}/{APP_VERSION})")
}
