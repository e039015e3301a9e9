#![forbid(unsafe_code)]

//! Typed element construction.
//!
//! ```ignore
//! let node = NodeBuilder::new("div")
//!     .class("modal-footer")
//!     .child(NodeBuilder::new("button").attr("data-modal-close", "").text("OK"))
//!     .build(&doc);
//! ```

use super::{Document, NodeId};

/// Declarative description of an element subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeBuilder {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    markup: Option<String>,
    hidden: bool,
    children: Vec<NodeBuilder>,
}

impl NodeBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Opaque markup content (not sanitised).
    #[must_use]
    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Visit this builder and every nested child builder, pre-order.
    pub fn walk(&self, visit: &mut impl FnMut(&NodeBuilder)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Materialise the subtree in `doc`. The returned root is detached.
    pub fn build(&self, doc: &Document) -> NodeId {
        let node = doc.create_element(&self.tag);
        if let Some(id) = &self.id {
            doc.set_id(node, id);
        }
        for class in &self.classes {
            doc.add_class(node, class);
        }
        for (name, value) in &self.attributes {
            doc.set_attribute(node, name, value);
        }
        if let Some(markup) = &self.markup {
            doc.set_inner_html(node, markup);
        } else if let Some(text) = &self.text {
            doc.set_text(node, text);
        }
        if self.hidden {
            doc.set_displayed(node, false);
        }
        for child in &self.children {
            let child = child.build(doc);
            doc.append_child(node, child);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_materialises_subtree() {
        let doc = Document::new();
        let root = NodeBuilder::new("div")
            .id("box")
            .class("modal")
            .attr("role", "dialog")
            .child(NodeBuilder::new("p").text("Hello"))
            .child(NodeBuilder::new("span").hidden())
            .build(&doc);

        assert!(!doc.is_connected(root));
        doc.append_child(doc.body(), root);

        assert_eq!(doc.get_element_by_id("box"), Some(root));
        assert!(doc.has_class(root, "modal"));
        assert_eq!(doc.attribute(root, "role").as_deref(), Some("dialog"));
        assert_eq!(doc.text_content(root), "Hello");

        let children = doc.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.tag(children[0]).as_deref(), Some("p"));
        assert!(!doc.is_rendered(children[1]));
    }

    #[test]
    fn markup_wins_over_text() {
        let doc = Document::new();
        let node = NodeBuilder::new("div")
            .text("ignored")
            .markup("<em>raw</em>")
            .build(&doc);
        assert_eq!(doc.inner_html(node).as_deref(), Some("<em>raw</em>"));
        assert_eq!(doc.text_content(node), "");
    }

    #[test]
    fn walk_visits_all_builders() {
        let tree = NodeBuilder::new("div")
            .child(NodeBuilder::new("button").attr("data-modal-close", ""))
            .child(NodeBuilder::new("div").child(NodeBuilder::new("button")));
        let mut tags = Vec::new();
        tree.walk(&mut |b| tags.push(b.tag_name().to_owned()));
        assert_eq!(tags, vec!["div", "button", "div", "button"]);
    }
}
