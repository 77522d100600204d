//! Positional link quota.
//!
//! Links are counted in document order. Once a run exceeds the quota, the
//! extra `<a>` elements lose their `href` and render as plain text. The run
//! restarts at every structural boundary in [`RESET_TAGS`]. Container tags
//! (`div`, `span`, `ul`, `li`, `nav`, ...) are not boundaries, so a menu of
//! links keeps only its first few live.

use crate::dom::{Document, Element, Node};

pub const DEFAULT_LINK_QUOTA: usize = 3;

/// Tags that restart the link run.
pub const RESET_TAGS: [&str; 14] = [
    "p", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "img", "table", "form", "section",
    "article",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Link,
    Boundary,
    Neutral,
}

fn role_of(element: &Element) -> Role {
    match element.tag() {
        "a" => Role::Link,
        tag if RESET_TAGS.contains(&tag) => Role::Boundary,
        _ => Role::Neutral,
    }
}

/// Walker state threaded through a single traversal.
#[derive(Debug)]
struct LinkRun {
    quota: usize,
    run: usize,
    defanged: usize,
}

impl LinkRun {
    fn new(quota: usize) -> Self {
        Self {
            quota,
            run: 0,
            defanged: 0,
        }
    }

    /// Pre-order walk over an explicit stack: an element is visited before
    /// its children, siblings left to right.
    fn walk(&mut self, nodes: &mut [Node]) {
        let mut stack: Vec<&mut Element> = nodes
            .iter_mut()
            .rev()
            .filter_map(Node::as_element_mut)
            .collect();

        while let Some(element) = stack.pop() {
            self.visit(element);
            stack.extend(
                element
                    .children
                    .iter_mut()
                    .rev()
                    .filter_map(Node::as_element_mut),
            );
        }
    }

    fn visit(&mut self, element: &mut Element) {
        match role_of(element) {
            Role::Link => {
                self.run += 1;
                if self.run > self.quota && element.remove_attr("href").is_some() {
                    self.defanged += 1;
                }
            }
            Role::Boundary => self.run = 0,
            Role::Neutral => {}
        }
    }
}

/// Strip `href` from every link past the quota. Returns how many links
/// were defanged.
pub fn apply_link_quota(document: &mut Document, quota: usize) -> usize {
    let mut run = LinkRun::new(quota);
    run.walk(&mut document.children);
    run.defanged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_links(doc: &Document) -> Vec<String> {
        doc.find_all("a")
            .filter(|a| a.attr("href").is_some())
            .map(Element::text_content)
            .collect()
    }

    fn quota_of(html: &str) -> (Document, usize) {
        let mut doc = Document::parse(html);
        let defanged = apply_link_quota(&mut doc, DEFAULT_LINK_QUOTA);
        (doc, defanged)
    }

    #[test]
    fn fourth_link_loses_href() {
        let (doc, defanged) = quota_of(
            r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4" class="k">4</a>"#,
        );
        assert_eq!(defanged, 1);
        assert_eq!(live_links(&doc), ["1", "2", "3"]);

        let fourth = doc.find_all("a").nth(3).unwrap();
        assert_eq!(fourth.attr("class"), Some("k"));
        assert_eq!(fourth.text_content(), "4");
    }

    #[test]
    fn every_reset_tag_restarts_the_run() {
        for tag in RESET_TAGS {
            let boundary = match tag {
                "br" | "hr" | "img" => format!("<{tag}>"),
                _ => format!("<{tag}>x</{tag}>"),
            };
            let html = format!(
                r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a>{boundary}<a href="4">4</a>"#
            );
            let (doc, defanged) = quota_of(&html);
            assert_eq!(defanged, 0, "<{tag}> should reset the link run");
            assert_eq!(live_links(&doc).len(), 4, "<{tag}>");
        }
    }

    #[test]
    fn containers_do_not_reset() {
        let (doc, defanged) = quota_of(
            r#"<nav><ul>
                 <li><a href="/">Home</a></li>
                 <li><a href="/a">About</a></li>
                 <li><div><span><a href="/c">Contact</a></span></div></li>
                 <li><a href="/b">Blog</a></li>
                 <li><a href="/j">Jobs</a></li>
               </ul></nav>"#,
        );
        assert_eq!(defanged, 2);
        assert_eq!(live_links(&doc), ["Home", "About", "Contact"]);
    }

    #[test]
    fn links_without_href_still_count() {
        let (doc, defanged) =
            quota_of(r##"<a name="top">t</a><a href="1">1</a><a href="2">2</a><a href="3">3</a>"##);
        assert_eq!(defanged, 1);
        assert_eq!(live_links(&doc), ["1", "2"]);
    }

    #[test]
    fn boundary_inside_a_link_run_counts_in_document_order() {
        // The <img> inside the third link is visited after that link.
        let (doc, _) = quota_of(
            r#"<a href="1">1</a><a href="2">2</a><a href="3"><img src="i">3</a><a href="4">4</a>"#,
        );
        assert_eq!(live_links(&doc), ["1", "2", "3", "4"]);
    }

    #[test]
    fn nested_links_count_separately() {
        // The parser never nests <a>, but a built tree can.
        let link = |href: &str| Element::html("a").with_attr("href", href).with_child(href);
        let mut doc = Document::default().with_child(
            Element::html("div")
                .with_child(link("1"))
                .with_child(link("2").with_child(link("3").with_child(link("4")))),
        );
        assert_eq!(apply_link_quota(&mut doc, DEFAULT_LINK_QUOTA), 1);
        let hrefs: Vec<Option<&str>> = doc.find_all("a").map(|a| a.attr("href")).collect();
        assert_eq!(hrefs, [Some("1"), Some("2"), Some("3"), None]);
    }

    #[test]
    fn custom_quota() {
        let mut doc = Document::parse(r#"<a href="1">1</a><a href="2">2</a>"#);
        assert_eq!(apply_link_quota(&mut doc, 1), 1);
        assert_eq!(live_links(&doc), ["1"]);

        let mut doc = Document::parse(r#"<a href="1">1</a>"#);
        assert_eq!(apply_link_quota(&mut doc, 0), 1);
        assert!(live_links(&doc).is_empty());
    }
}
