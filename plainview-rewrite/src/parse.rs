//! HTML parsing.
//!
//! html5ever builds an `RcDom` with standard lenient semantics (unclosed
//! tags, stray end tags, unquoted attributes are all repaired), which is
//! then converted into the owned [`Document`] tree.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Attr, Document, Element, Node};

impl Document {
    /// Parse a full HTML document. Never fails.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

        let document = Document {
            children: convert_document(&dom),
        };

        tracing::trace!(
            input_len = html.len(),
            top_level = document.children.len(),
            "rewrite.parsed"
        );
        document
    }
}

/// An element under construction plus the source children not yet
/// converted. The conversion keeps these on the heap, one per open level.
struct Frame {
    element: Option<Element>,
    pending: std::vec::IntoIter<Handle>,
}

impl Frame {
    fn new(element: Option<Element>, source: &Handle) -> Self {
        Self {
            element,
            pending: child_handles(source).into_iter(),
        }
    }
}

fn convert_document(dom: &RcDom) -> Vec<Node> {
    let mut stack = vec![Frame::new(None, &dom.document)];
    let mut top_level = Vec::new();

    while let Some(frame) = stack.last_mut() {
        let Some(handle) = frame.pending.next() else {
            let Some(done) = stack.pop().and_then(|frame| frame.element) else {
                continue;
            };
            match stack.last_mut().and_then(|parent| parent.element.as_mut()) {
                Some(parent) => parent.children.push(Node::Element(done)),
                None => top_level.push(Node::Element(done)),
            }
            continue;
        };

        let leaf = match &handle.data {
            NodeData::Doctype { name, .. } => Node::Doctype(name.to_string()),
            NodeData::Text { contents } => Node::Text(contents.borrow().to_string()),
            NodeData::Comment { contents } => Node::Comment(contents.to_string()),
            NodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| Attr {
                        name: attr.name.clone(),
                        value: attr.value.to_string(),
                    })
                    .collect();
                let element = Element {
                    name: name.clone(),
                    attrs,
                    children: Vec::new(),
                };
                stack.push(Frame::new(Some(element), &handle));
                continue;
            }
            NodeData::Document | NodeData::ProcessingInstruction { .. } => continue,
        };

        match frame.element.as_mut() {
            Some(parent) => parent.children.push(leaf),
            None => top_level.push(leaf),
        }
    }
    top_level
}

/// Children to convert; `<template>` keeps them in a separate fragment.
fn child_handles(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(fragment) = template_contents.borrow().as_ref() {
            return fragment.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}
