//! Removal of executable and styling content.
//!
//! `<script>` and `<style>` go unconditionally, together with their
//! subtrees. `<link>` goes unless its `rel` names `stylesheet`: stylesheet
//! links are the ones that stay.

use crate::dom::{Document, Element, Node};

/// Delete stripped nodes everywhere in the tree. Returns the number of
/// subtrees removed (a removed node's descendants are not counted).
pub fn strip_active_content(document: &mut Document) -> usize {
    let mut removed = retain_kept(&mut document.children);
    let mut stack: Vec<&mut Element> = document
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .collect();

    while let Some(element) = stack.pop() {
        removed += retain_kept(&mut element.children);
        stack.extend(element.children.iter_mut().filter_map(Node::as_element_mut));
    }
    removed
}

fn retain_kept(children: &mut Vec<Node>) -> usize {
    let before = children.len();
    children.retain(|node| !is_stripped(node));
    before - children.len()
}

pub(crate) fn is_stripped(node: &Node) -> bool {
    let Node::Element(element) = node else {
        return false;
    };
    match element.tag() {
        "script" | "style" => true,
        "link" => !element.has_rel_token("stylesheet"),
        _ => false,
    }
}
