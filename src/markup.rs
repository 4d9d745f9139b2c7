//! Document writer seam plus an in-memory HTML tree implementing it.
//!
//! The renderer only ever talks to `dyn DocumentWriter`: create a leaf
//! element, write text into an element, open/close a scope. Scopes nest
//! strictly; closing anything but the innermost open scope is an error.
use std::fmt;

use indexmap::IndexMap;

use crate::error::WriteError;

/// Attribute map; insertion order is serialization order.
pub type Attrs = IndexMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Proof of an open scope. Consumed by `close_scope`.
#[derive(Debug, PartialEq, Eq)]
pub struct ScopeHandle(pub NodeId);

impl ScopeHandle {
    pub fn node(&self) -> NodeId { self.0 }
}

pub trait DocumentWriter {
    /// Append an element to the innermost open scope.
    fn create_element(&mut self, tag: &str, attrs: &Attrs) -> Result<NodeId, WriteError>;

    fn write_text(&mut self, node: NodeId, text: &str) -> Result<(), WriteError>;

    /// Append an element and make it the innermost open scope.
    fn open_scope(&mut self, tag: &str, attrs: &Attrs) -> Result<ScopeHandle, WriteError>;

    fn close_scope(&mut self, scope: ScopeHandle) -> Result<(), WriteError>;

    /// Innermost open scope (the fragment root when nothing is open).
    fn current(&self) -> NodeId;

    /// Number of open scopes.
    fn depth(&self) -> usize;

    fn text_element(&mut self, tag: &str, attrs: &Attrs, text: &str) -> Result<NodeId, WriteError> {
        let node = self.create_element(tag, attrs)?;
        self.write_text(node, text)?;
        Ok(node)
    }

    fn write_current(&mut self, text: &str) -> Result<(), WriteError> {
        let node = self.current();
        self.write_text(node, text)
    }
}

/// Add `value` to `key`, space-joined with what is already there.
pub fn add_attr(attrs: &mut Attrs, key: &str, value: &str) {
    match attrs.get_mut(key) {
        Some(existing) if !existing.is_empty() => {
            existing.push(' ');
            existing.push_str(value);
        }
        Some(existing) => existing.push_str(value),
        None => {
            attrs.insert(key.to_string(), value.to_string());
        }
    }
}

pub fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Attrs {
    let mut out = Attrs::new();
    for (k, v) in pairs {
        add_attr(&mut out, k, v);
    }
    out
}

// ------------------------------- MarkupTree ------------------------------- //

#[derive(Debug)]
struct Element {
    tag: String,
    attrs: Attrs,
    children: Vec<Child>,
}

#[derive(Debug)]
enum Child {
    Element(NodeId),
    Text(String),
}

/// Arena-backed element tree. Node 0 is the fragment root and is never
/// serialized itself.
#[derive(Debug)]
pub struct MarkupTree {
    nodes: Vec<Element>,
    open: Vec<NodeId>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        let root = Element { tag: String::new(), attrs: Attrs::new(), children: Vec::new() };
        MarkupTree { nodes: vec![root], open: vec![NodeId(0)] }
    }
}

impl MarkupTree {
    pub fn new() -> Self { Self::default() }

    pub fn root(&self) -> NodeId { NodeId(0) }

    pub fn is_balanced(&self) -> bool { self.open.len() == 1 }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|e| e.tag.as_str())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_children(NodeId(0), &mut out);
        out
    }

    pub fn into_string(self) -> String { self.to_html() }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, WriteError> {
        self.nodes.get_mut(node.0).ok_or(WriteError::UnknownNode(node.0))
    }

    fn write_children(&self, node: NodeId, out: &mut String) {
        let Some(el) = self.nodes.get(node.0) else { return };
        for child in &el.children {
            match child {
                Child::Text(text) => escape_into(text, false, out),
                Child::Element(id) => self.write_element(*id, out),
            }
        }
    }

    fn write_element(&self, node: NodeId, out: &mut String) {
        let Some(el) = self.nodes.get(node.0) else { return };
        out.push('<');
        out.push_str(&el.tag);
        for (k, v) in &el.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            escape_into(v, true, out);
            out.push('"');
        }
        out.push('>');
        self.write_children(node, out);
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

impl DocumentWriter for MarkupTree {
    fn create_element(&mut self, tag: &str, attrs: &Attrs) -> Result<NodeId, WriteError> {
        let id = NodeId(self.nodes.len());
        let parent = self.current();
        self.element_mut(parent)?.children.push(Child::Element(id));
        self.nodes.push(Element { tag: tag.to_string(), attrs: attrs.clone(), children: Vec::new() });
        Ok(id)
    }

    fn write_text(&mut self, node: NodeId, text: &str) -> Result<(), WriteError> {
        if text.is_empty() {
            return Ok(());
        }
        let el = self.element_mut(node)?;
        match el.children.last_mut() {
            Some(Child::Text(prev)) => prev.push_str(text),
            _ => el.children.push(Child::Text(text.to_string())),
        }
        Ok(())
    }

    fn open_scope(&mut self, tag: &str, attrs: &Attrs) -> Result<ScopeHandle, WriteError> {
        let id = self.create_element(tag, attrs)?;
        self.open.push(id);
        Ok(ScopeHandle(id))
    }

    fn close_scope(&mut self, scope: ScopeHandle) -> Result<(), WriteError> {
        if self.open.len() <= 1 {
            return Err(WriteError::NoOpenScope);
        }
        let innermost = self.current();
        if innermost != scope.0 {
            return Err(WriteError::UnbalancedScope { got: scope.0.0, open: innermost.0 });
        }
        self.open.pop();
        Ok(())
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId(0))
    }

    fn depth(&self) -> usize { self.open.len() - 1 }
}

impl fmt::Display for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
