//! This module contains functions and types for parsing HTML into a custom DOM tree
//! and writing that tree back out as HTML text.
//!
//! It uses html5ever as the HTML parser and serializer and builds a DOM tree
//! defined in the `crate::dom::dom_tree` module.

use crate::dom::dom_tree::{self, Handle, Node, NodeData};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use log::debug;
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Creates a DOM tree from the provided HTML content.
///
/// Input without an `<html>` tag or a doctype is marked as a fragment, so that
/// [`to_html`] writes back only what was given instead of the implied
/// `<html><head></head><body>` wrapper.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = TableizeTreeSink::new();
    let mut document =
        html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string());
    document.fragment = is_fragment(html_content);
    document
}

fn is_fragment(html_content: &str) -> bool {
    let lowered = html_content.to_ascii_lowercase();
    !lowered.contains("<html") && !lowered.contains("<!doctype")
}

/// Serializes the document. Fragments are written as their content only.
pub fn to_html(document: &dom_tree::Document) -> String {
    let mut bytes = Vec::new();
    if let Err(err) = write_html(document, &mut bytes) {
        // writing into a Vec only fails on a serializer bug
        debug!("html serialization stopped early: {}", err);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn write_html<W: Write>(document: &dom_tree::Document, writer: &mut W) -> io::Result<()> {
    let nodes = if document.fragment {
        fragment_content(document)
    } else {
        if let Some(doctype) = &*document.doctype.borrow() {
            write!(writer, "<!DOCTYPE {}>", doctype.name)?;
        }
        vec![Rc::clone(&document.root)]
    };
    serialize(writer, &SerializableNodes(nodes), include_node())
}

/// The nodes a fragment was parsed into: the body's children, or, once the
/// body itself has been replaced, everything under `<html>` except `<head>`.
fn fragment_content(document: &dom_tree::Document) -> Vec<Handle> {
    if let Some(body) = document.body() {
        return body.borrow().children.clone();
    }
    let Some(html) = dom_tree::find_element(&document.root, "html") else {
        return document.root.borrow().children.clone();
    };
    let children = html.borrow().children.clone();
    children
        .into_iter()
        .filter(|node| !node.borrow().as_element().is_some_and(|e| e.has_tag("head")))
        .collect()
}

fn include_node() -> SerializeOpts {
    SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    }
}

impl dom_tree::Document {
    /// Serializes the document back to HTML text.
    pub fn to_html(&self) -> String {
        to_html(self)
    }
}

/// Serializes a single node, including the node itself.
pub fn node_to_html(node: &Handle) -> String {
    let mut bytes = Vec::new();
    let nodes = SerializableNodes(vec![Rc::clone(node)]);
    if let Err(err) = serialize(&mut bytes, &nodes, include_node()) {
        debug!("html serialization stopped early: {}", err);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Adapts a run of sibling DOM handles to html5ever's serializer.
struct SerializableNodes(Vec<Handle>);

impl Serialize for SerializableNodes {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        for node in &self.0 {
            match traversal_scope {
                TraversalScope::IncludeNode => serialize_node(node, serializer)?,
                TraversalScope::ChildrenOnly(_) => {
                    for child in &node.borrow().children {
                        serialize_node(child, serializer)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn serialize_node<S: Serializer>(node: &Handle, serializer: &mut S) -> io::Result<()> {
    let node_ref = node.borrow();
    match &node_ref.data {
        NodeData::DocumentRoot => {
            for child in &node_ref.children {
                serialize_node(child, serializer)?;
            }
        }
        NodeData::Element(elem) => {
            let attrs: Vec<(QualName, &str)> = elem
                .attributes
                .iter()
                .map(|(name, value)| {
                    (
                        QualName::new(
                            None,
                            Namespace::from(""),
                            LocalName::from(name.as_str()),
                        ),
                        value.as_str(),
                    )
                })
                .collect();
            serializer.start_elem(
                elem.qual_name.clone(),
                attrs.iter().map(|(name, value)| (name, *value)),
            )?;
            for child in &node_ref.children {
                serialize_node(child, serializer)?;
            }
            serializer.end_elem(elem.qual_name.clone())?;
        }
        NodeData::Text(text) => serializer.write_text(text)?,
        NodeData::Comment(text) => serializer.write_comment(text)?,
        NodeData::ProcessingInstruction { target, data } => {
            serializer.write_processing_instruction(target, data)?
        }
    }
    Ok(())
}

/// A custom TreeSink for building the DOM tree used by the parser.
///
/// It holds the Document being built and the current quirks mode.
pub struct TableizeTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for TableizeTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TableizeTreeSink {
    /// Creates a new `TableizeTreeSink` with an empty document.
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    fn into_handle(child: NodeOrText<Handle>) -> Handle {
        match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => Node::new(NodeData::Text(text.to_string())),
        }
    }
}

/// Appends text to `node` if it is a text node. Returns false otherwise.
fn merge_text(node: Option<&Handle>, text: &StrTendril) -> bool {
    if let Some(node) = node {
        if let NodeData::Text(existing) = &mut node.borrow_mut().data {
            existing.push_str(text);
            return true;
        }
    }
    false
}

/// A simple implementation of the `ElemName` trait for our elements.
#[derive(Debug)]
pub struct TableizeElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for TableizeElemName {
    /// Returns a reference to the local name of the element.
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    /// Returns a reference to the namespace of the element.
    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for TableizeTreeSink {
    type Handle = Handle;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = TableizeElemName
    where
        Self: 'a;

    /// Finalizes and returns the constructed Document.
    fn finish(self) -> Self::Output {
        self.document
    }

    /// Called when a parsing error occurs. Email markup is rarely valid, so
    /// these are only of interest when debugging.
    fn parse_error(&self, msg: Cow<'static, str>) {
        debug!("html parse error: {}", msg);
    }

    /// Returns the handle to the document's root node.
    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name (as `TableizeElemName`) for the given element handle.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match target.borrow().as_element() {
            Some(elem) => TableizeElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            None => panic!("elem_name called on non-element node"),
        }
    }

    /// Creates a new element node with the given name and attributes.
    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect::<Vec<_>>();
        Node::new(NodeData::Element(dom_tree::ElementNode::with_qual_name(
            name, attributes,
        )))
    }

    /// Creates a comment node. Conditional comments carry Outlook-only markup,
    /// so comments are kept.
    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    /// Appends a child node or text to the given parent node.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if let NodeOrText::AppendText(ref text) = child {
            let last = parent.borrow().children.last().cloned();
            if merge_text(last.as_ref(), text) {
                return;
            }
        }
        dom_tree::append_child(parent, &Self::into_handle(child));
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = element.borrow().parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    /// Stores the DOCTYPE information on the Document.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    /// Returns the contents of a template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    /// Determines if two node handles refer to the same node.
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    /// Sets the current quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    /// Inserts a node or text right before `sibling` (used for foster parenting).
    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if let NodeOrText::AppendText(ref text) = child {
            if merge_text(dom_tree::previous_sibling(sibling).as_ref(), text) {
                return;
            }
        }
        dom_tree::insert_before(sibling, &Self::into_handle(child));
    }

    /// Adds attributes to the target node if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Some(elem) = target.borrow_mut().as_element_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem.has_attribute(&key) {
                    elem.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    /// Removes a node from its parent.
    fn remove_from_parent(&self, target: &Self::Handle) {
        dom_tree::detach(target);
    }

    /// Moves all children of `node` to `new_parent`.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        dom_tree::move_children(node, new_parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_documents_round_trip() {
        let html = "<html><head><title>Hi</title></head><body><p class=\"a\">One &amp; two</p></body></html>";
        let document = create_dom_tree(html);
        assert!(!document.fragment);
        assert_eq!(to_html(&document), html);
    }

    #[test]
    fn fragments_serialize_without_wrapper() {
        let document = create_dom_tree("<p style='color:red'>Text</p><br>");
        assert!(document.fragment);
        assert_eq!(to_html(&document), "<p style=\"color:red\">Text</p><br>");
    }

    #[test]
    fn doctype_and_comments_are_kept() {
        let html = "<!DOCTYPE html><html><head></head><body><!--[if mso]>x<![endif]--></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(
            document.doctype.borrow().as_ref().map(|d| d.name.clone()),
            Some("html".to_string())
        );
        assert_eq!(to_html(&document), html);
    }

    #[test]
    fn style_text_is_not_escaped() {
        let html = "<html><head><style>p > a { color: red }</style></head><body></body></html>";
        let document = create_dom_tree(html);
        assert_eq!(to_html(&document), html);
    }

    #[test]
    fn node_serialization_includes_the_node() {
        let document = create_dom_tree("<div><em>x</em></div>");
        let em = dom_tree::find_element(&document.root, "em").unwrap();
        assert_eq!(node_to_html(&em), "<em>x</em>");
    }

    #[test]
    fn fragments_without_a_body_keep_their_content() {
        let document = create_dom_tree("<p>x</p>");
        let body = document.body().unwrap();
        let div = dom_tree::create_element("div");
        dom_tree::move_children(&body, &div);
        assert!(dom_tree::replace_node(&body, &div));

        assert_eq!(to_html(&document), "<div><p>x</p></div>");
    }
}
