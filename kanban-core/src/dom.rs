/// Minimal owned element tree used as the render target.
///
/// Nodes are addressed by `NodePath`, the list of child indices from the
/// root. Paths stay valid until the subtree containing them is rebuilt,
/// which is what event targets rely on between renders.
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Child-index path from the root element. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// True if `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// This path followed by each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> + '_ {
        (0..=self.0.len()).rev().map(move |len| Self(self.0[..len].to_vec()))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Value of a `data-*` attribute, e.g. `data("key")` reads `data-key`.
    pub fn data(&self, name: &str) -> Option<&str> {
        self.attr(&format!("data-{}", name))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    /// The element's own text, excluding descendants.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Own text followed by all descendant text, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        path.indices()
            .iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        path.indices()
            .iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Paths of every element (root included) matching `pred`, in document order.
    pub fn find_all<F>(&self, pred: F) -> Vec<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.collect_matching(&NodePath::root(), &pred, &mut found);
        found
    }

    /// Path of the first element matching `pred`, in document order.
    pub fn find_first<F>(&self, pred: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        self.find_all(pred).into_iter().next()
    }

    /// First element matching `pred` inside the subtree at `scope` (inclusive).
    /// The returned path is absolute.
    pub fn find_within<F>(&self, scope: &NodePath, pred: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let subtree = self.get(scope)?;
        let mut found = Vec::new();
        subtree.collect_matching(scope, &pred, &mut found);
        found.into_iter().next()
    }

    /// Nearest element at or above `path` matching `pred`.
    pub fn closest<F>(&self, path: &NodePath, pred: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        path.ancestors()
            .find(|p| self.get(p).is_some_and(|el| pred(el)))
    }

    fn collect_matching<F>(&self, at: &NodePath, pred: &F, found: &mut Vec<NodePath>)
    where
        F: Fn(&Element) -> bool,
    {
        if pred(self) {
            found.push(at.clone());
        }
        for (i, child) in self.children.iter().enumerate() {
            child.collect_matching(&at.child(i), pred, found);
        }
    }

    /// Serialize the subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name,
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        out.push('>');
        out.push_str(&html_escape::encode_text(&self.text));
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Predicate: element carries `class`.
pub fn by_class(class: &str) -> impl Fn(&Element) -> bool + '_ {
    move |el| el.has_class(class)
}

/// Predicate: element has `data-<name>` equal to `value`.
pub fn by_data<'a>(name: &'a str, value: &'a str) -> impl Fn(&Element) -> bool + 'a {
    move |el| el.data(name) == Some(value)
}
