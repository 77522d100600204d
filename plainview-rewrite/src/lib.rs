//! HTML rewriting policy for the plainview proxy.
//!
//! A page goes through three steps:
//!
//! - parse into an owned [`Document`] (html5ever, lenient)
//! - [`strip_active_content`]: drop `<script>`, `<style>` and every
//!   `<link>` that is not a stylesheet
//! - [`apply_link_quota`]: keep at most `link_quota` live links per run
//!   between structural boundaries, stripping `href` from the rest
//!
//! and is serialized back to HTML. Removal runs to completion before the
//! quota pass, so deleted nodes are never counted.
//!
//! ```rust
//! use plainview_rewrite::Rewriter;
//!
//! let out = Rewriter::default()
//!     .rewrite(r#"<script>x()</script><a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4">4</a>"#)
//!     .unwrap();
//!
//! assert!(!out.html.contains("<script>"));
//! assert!(out.html.contains(r#"<a href="3">3</a><a>4</a>"#));
//! assert_eq!(out.stats.removed, 1);
//! assert_eq!(out.stats.defanged, 1);
//! ```

mod dom;
mod error;
mod parse;
mod quota;
mod serialize;
mod strip;

pub use dom::{Attr, Document, Element, Elements, HTML_NAMESPACE, Node};
pub use error::RewriteError;
pub use quota::{DEFAULT_LINK_QUOTA, RESET_TAGS, apply_link_quota};
pub use strip::strip_active_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewritePolicy {
    /// Live links allowed between two structural boundaries.
    pub link_quota: usize,
}

impl Default for RewritePolicy {
    fn default() -> Self {
        Self {
            link_quota: DEFAULT_LINK_QUOTA,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Subtrees deleted by the removal pass.
    pub removed: usize,
    /// Links that lost their `href`.
    pub defanged: usize,
}

#[derive(Debug, Clone)]
pub struct Rewritten {
    pub html: String,
    pub stats: RewriteStats,
}

/// Stateless; one instance can serve any number of documents concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter {
    policy: RewritePolicy,
}

impl Rewriter {
    pub fn new(policy: RewritePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RewritePolicy {
        self.policy
    }

    /// Run both passes over an already parsed document.
    pub fn apply(&self, document: &mut Document) -> RewriteStats {
        let removed = strip_active_content(document);
        let defanged = apply_link_quota(document, self.policy.link_quota);
        RewriteStats { removed, defanged }
    }

    /// Parse, rewrite and serialize a page.
    pub fn rewrite(&self, html: &str) -> Result<Rewritten, RewriteError> {
        let mut document = Document::parse(html);
        let stats = self.apply(&mut document);
        let out = document.to_html()?;

        tracing::debug!(
            input_len = html.len(),
            output_len = out.len(),
            removed = stats.removed,
            defanged = stats.defanged,
            link_quota = self.policy.link_quota,
            "rewrite.done"
        );
        Ok(Rewritten { html: out, stats })
    }
}
