//! A minimal owned view tree standing in for DOM construction.
//!
//! Components build [`Node`]s and hosts translate them into their own widgets or markup.
use core::fmt::Write as _;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(tag: &'static str, class: &'static str) -> Self {
        Self::new(tag).class(class)
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends `node` only when it is present.
    pub fn maybe_child(mut self, node: Option<impl Into<Node>>) -> Self {
        if let Some(node) = node {
            self.children.push(node.into());
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(core::slice::from_ref(self), &mut out);
        out
    }

    /// All elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.walk(&mut |el| {
            if el.has_class(class) {
                out.push(el);
            }
        });
        out
    }

    pub fn first_by_class(&self, class: &str) -> Option<&Element> {
        self.find_by_class(class).into_iter().next()
    }

    pub fn count_by_class(&self, class: &str) -> usize {
        self.find_by_class(class).len()
    }

    fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(el) = self {
            f(el);
            for child in &el.children {
                child.walk(f);
            }
        }
    }

    /// An indented, human-readable outline of the tree (`tag.class[attr=value]` / `"text"`).
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self {
            Node::Text(text) => {
                let _ = writeln!(out, "{indent}{text:?}");
            }
            Node::Element(el) => {
                let _ = write!(out, "{indent}{}", el.tag);
                for class in &el.classes {
                    let _ = write!(out, ".{class}");
                }
                for (name, value) in &el.attrs {
                    let _ = write!(out, "[{name}={value:?}]");
                }
                out.push('\n');
                for child in &el.children {
                    child.write_outline(depth + 1, out);
                }
            }
        }
    }
}

/// An element holding `text`, or `None` when the text is empty so the caller omits it.
pub(crate) fn text_element(tag: &'static str, class: &'static str, text: &str) -> Option<Element> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(Element::with_class(tag, class).text(text))
}

/// An Arabic-script text element (`lang="ar" dir="rtl"`), omitted when empty.
pub(crate) fn arabic_element(tag: &'static str, class: &'static str, text: &str) -> Option<Element> {
    text_element(tag, class, text).map(|el| el.attr("lang", "ar").attr("dir", "rtl"))
}

pub(crate) fn chip(text: &str) -> Option<Element> {
    text_element("span", "chip", text)
}
