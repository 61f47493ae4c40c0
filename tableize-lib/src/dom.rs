use html5ever::{LocalName, Namespace, QualName};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

    pub type Handle = Rc<RefCell<Node>>;
    pub type WeakHandle = Weak<RefCell<Node>>;

    #[derive(Debug)]
    pub struct Node {
        pub parent: Option<WeakHandle>,
        pub children: Vec<Handle>,
        pub data: NodeData,
    }

    #[derive(Debug, Clone)]
    pub enum NodeData {
        DocumentRoot,
        Element(ElementNode),
        Text(String),
        Comment(String),
        ProcessingInstruction { target: String, data: String },
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        /// Lower-case local name, e.g. "td".
        pub tag: String,
        pub qual_name: QualName,
        /// Attributes in source order.
        pub attributes: Vec<(String, String)>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: Handle,
        pub doctype: RefCell<Option<Doctype>>,
        /// Set when the source had no `<html>` element or doctype. Only the
        /// body content is written back out for fragments.
        pub fragment: bool,
    }

    #[derive(Debug, Clone)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl Node {
        pub fn new(data: NodeData) -> Handle {
            Rc::new(RefCell::new(Node {
                parent: None,
                children: Vec::new(),
                data,
            }))
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match &self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
            match &mut self.data {
                NodeData::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn parent(&self) -> Option<Handle> {
            self.parent.as_ref().and_then(Weak::upgrade)
        }
    }

    impl ElementNode {
        pub fn new(tag: &str) -> Self {
            let tag = tag.to_ascii_lowercase();
            ElementNode {
                qual_name: QualName::new(
                    None,
                    Namespace::from(HTML_NAMESPACE),
                    LocalName::from(tag.as_str()),
                ),
                tag,
                attributes: Vec::new(),
            }
        }

        pub fn with_qual_name(qual_name: QualName, attributes: Vec<(String, String)>) -> Self {
            ElementNode {
                tag: qual_name.local.to_ascii_lowercase().to_string(),
                qual_name,
                attributes,
            }
        }

        pub fn has_tag(&self, tag: &str) -> bool {
            self.tag.eq_ignore_ascii_case(tag)
        }

        /// Case-insensitive attribute lookup.
        pub fn get_attribute(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        pub fn has_attribute(&self, name: &str) -> bool {
            self.get_attribute(name).is_some()
        }

        /// Overwrites an existing attribute in place or appends a new one.
        pub fn set_attribute(&mut self, name: &str, value: &str) {
            match self
                .attributes
                .iter_mut()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value.to_string(),
                None => self
                    .attributes
                    .push((name.to_ascii_lowercase(), value.to_string())),
            }
        }

        pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
            let index = self
                .attributes
                .iter()
                .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
            Some(self.attributes.remove(index).1)
        }
    }

    pub fn new_document() -> Document {
        Document {
            root: Node::new(NodeData::DocumentRoot),
            doctype: RefCell::new(None),
            fragment: false,
        }
    }

    pub fn create_element(tag: &str) -> Handle {
        Node::new(NodeData::Element(ElementNode::new(tag)))
    }

    /// Lower-case tag name of an element handle.
    pub fn tag_name(node: &Handle) -> Option<String> {
        node.borrow().as_element().map(|elem| elem.tag.clone())
    }

    pub fn get_attribute(node: &Handle, name: &str) -> Option<String> {
        node.borrow()
            .as_element()
            .and_then(|elem| elem.get_attribute(name))
            .map(str::to_string)
    }

    pub fn set_attribute(node: &Handle, name: &str, value: &str) {
        if let Some(elem) = node.borrow_mut().as_element_mut() {
            elem.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(node: &Handle, name: &str) -> Option<String> {
        node.borrow_mut()
            .as_element_mut()
            .and_then(|elem| elem.remove_attribute(name))
    }

    /// Detaches `node` from its parent, if it has one.
    pub fn detach(node: &Handle) {
        let parent = node
            .borrow_mut()
            .parent
            .take()
            .and_then(|weak| weak.upgrade());
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }

    /// Appends `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(parent: &Handle, child: &Handle) {
        detach(child);
        child.borrow_mut().parent = Some(Rc::downgrade(parent));
        parent.borrow_mut().children.push(Rc::clone(child));
    }

    /// Inserts `child` immediately before `sibling`.
    pub fn insert_before(sibling: &Handle, child: &Handle) {
        let Some(parent) = sibling.borrow().parent() else {
            return;
        };
        detach(child);
        let mut parent_node = parent.borrow_mut();
        let index = parent_node
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
            .unwrap_or(parent_node.children.len());
        child.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent_node.children.insert(index, Rc::clone(child));
    }

    pub fn previous_sibling(node: &Handle) -> Option<Handle> {
        let parent = node.borrow().parent()?;
        let parent_node = parent.borrow();
        let index = parent_node
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, node))?;
        let previous = Rc::clone(&parent_node.children[index.checked_sub(1)?]);
        Some(previous)
    }

    /// Puts `replacement` where `old` was. Returns false if `old` has no parent.
    pub fn replace_node(old: &Handle, replacement: &Handle) -> bool {
        let Some(parent) = old.borrow().parent() else {
            return false;
        };
        detach(replacement);
        let mut parent_node = parent.borrow_mut();
        let Some(index) = parent_node
            .children
            .iter()
            .position(|c| Rc::ptr_eq(c, old))
        else {
            return false;
        };
        replacement.borrow_mut().parent = Some(Rc::downgrade(&parent));
        parent_node.children[index] = Rc::clone(replacement);
        drop(parent_node);
        old.borrow_mut().parent = None;
        true
    }

    /// Moves every child of `from` to the end of `to`, keeping their order.
    pub fn move_children(from: &Handle, to: &Handle) {
        let children = std::mem::take(&mut from.borrow_mut().children);
        for child in &children {
            child.borrow_mut().parent = Some(Rc::downgrade(to));
        }
        to.borrow_mut().children.extend(children);
    }

    /// Every element under `root` (root included), in document order.
    pub fn descendant_elements(root: &Handle) -> Vec<Handle> {
        let mut elements = Vec::new();
        let mut stack = vec![Rc::clone(root)];
        while let Some(node) = stack.pop() {
            let node_ref = node.borrow();
            for child in node_ref.children.iter().rev() {
                stack.push(Rc::clone(child));
            }
            let is_element = node_ref.as_element().is_some();
            drop(node_ref);
            if is_element {
                elements.push(node);
            }
        }
        elements
    }

    /// First element under `root` with the given tag, in document order.
    pub fn find_element(root: &Handle, tag: &str) -> Option<Handle> {
        descendant_elements(root)
            .into_iter()
            .find(|node| node.borrow().as_element().is_some_and(|e| e.has_tag(tag)))
    }

    /// Concatenated text of all text nodes under `node`.
    pub fn text_content(node: &Handle) -> String {
        let mut out = String::new();
        collect_text(node, &mut out);
        out
    }

    fn collect_text(node: &Handle, out: &mut String) {
        let node_ref = node.borrow();
        if let NodeData::Text(text) = &node_ref.data {
            out.push_str(text);
        }
        for child in &node_ref.children {
            collect_text(child, out);
        }
    }

    impl Document {
        pub fn head(&self) -> Option<Handle> {
            find_element(&self.root, "head")
        }

        pub fn body(&self) -> Option<Handle> {
            find_element(&self.root, "body")
        }
    }
}
