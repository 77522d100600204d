//! Serialization through html5ever's HTML serializer.
//!
//! The owned tree implements [`Serialize`], so escaping, void elements and
//! raw-text parents (`<script>`, `<style>`, ...) follow the serializer's
//! canonical rules.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use crate::dom::{Document, Node};
use crate::error::RewriteError;

impl Serialize for Document {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        _traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        // The document node has no markup of its own.
        write_nodes(&self.children, serializer)
    }
}

/// Serializer work item; the walk keeps its own stack.
enum Step<'a> {
    Open(&'a Node),
    Close(&'a QualName),
}

fn write_nodes<S: Serializer>(nodes: &[Node], serializer: &mut S) -> io::Result<()> {
    let mut steps: Vec<Step<'_>> = nodes.iter().rev().map(Step::Open).collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Close(name) => serializer.end_elem(name.clone())?,
            Step::Open(Node::Doctype(name)) => serializer.write_doctype(name)?,
            Step::Open(Node::Text(text)) => serializer.write_text(text)?,
            Step::Open(Node::Comment(text)) => serializer.write_comment(text)?,
            Step::Open(Node::Element(element)) => {
                let attrs = element
                    .attrs
                    .iter()
                    .map(|attr| (&attr.name, attr.value.as_str()));
                serializer.start_elem(element.name.clone(), attrs)?;
                steps.push(Step::Close(&element.name));
                steps.extend(element.children.iter().rev().map(Step::Open));
            }
        }
    }
    Ok(())
}

impl Document {
    pub fn to_html(&self) -> Result<String, RewriteError> {
        let mut bytes = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..SerializeOpts::default()
        };
        serialize(&mut bytes, self, opts)?;
        Ok(String::from_utf8(bytes)?)
    }
}
