#![forbid(unsafe_code)]

//! Focus trap helpers.
//!
//! # Invariants
//!
//! - `focusable_elements` returns descendants in document order and never
//!   includes the surface itself.
//! - `trap_step` only ever returns an element from the list it was given.
//!
//! # Failure Modes
//!
//! - An empty list makes the trap inert: `trap_step` returns `None` and the
//!   caller leaves focus where it is.

use mantle_core::{Document, NodeId};

const NATIVE_CONTROLS: &[&str] = &["button", "input", "textarea", "select"];

/// Whether `node` takes part in sequential keyboard navigation.
///
/// Matches links with `href`, native form controls, and anything with a
/// non-negative `tabindex`; disabled controls and elements that are not
/// rendered are skipped.
pub fn is_focusable(doc: &Document, node: NodeId) -> bool {
    if !doc.is_rendered(node) || doc.has_attribute(node, "disabled") {
        return false;
    }
    if let Some(index) = doc.attribute(node, "tabindex") {
        return index.trim().parse::<i32>().is_ok_and(|i| i >= 0);
    }
    let Some(tag) = doc.tag(node) else {
        return false;
    };
    match tag.as_str() {
        "a" => doc.has_attribute(node, "href"),
        tag => NATIVE_CONTROLS.contains(&tag),
    }
}

/// Focusable descendants of `surface`, in document order.
pub fn focusable_elements(doc: &Document, surface: NodeId) -> Vec<NodeId> {
    doc.descendants(surface)
        .into_iter()
        .filter(|&node| is_focusable(doc, node))
        .collect()
}

/// Where focus goes when Tab (or Shift+Tab with `backwards`) is pressed.
///
/// Steps through `focusables` and wraps at both ends. Focus sitting outside
/// the list is pulled in at the first element (last when going backwards).
pub fn trap_step(focusables: &[NodeId], active: Option<NodeId>, backwards: bool) -> Option<NodeId> {
    let first = *focusables.first()?;
    let last = *focusables.last()?;
    let position = active.and_then(|a| focusables.iter().position(|&n| n == a));
    let next = match (position, backwards) {
        (None, false) => first,
        (None, true) => last,
        (Some(i), false) if i + 1 == focusables.len() => first,
        (Some(i), false) => focusables[i + 1],
        (Some(0), true) => last,
        (Some(i), true) => focusables[i - 1],
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantle_core::NodeBuilder;

    fn surface(doc: &Document, builder: NodeBuilder) -> NodeId {
        let node = builder.build(doc);
        doc.append_child(doc.body(), node);
        node
    }

    #[test]
    fn collects_interactive_descendants_in_order() {
        let doc = Document::new();
        let root = surface(
            &doc,
            NodeBuilder::new("div")
                .child(NodeBuilder::new("a").attr("href", "#").id("link"))
                .child(NodeBuilder::new("a").id("anchor"))
                .child(NodeBuilder::new("input").id("input"))
                .child(NodeBuilder::new("div").attr("tabindex", "0").id("tab0"))
                .child(NodeBuilder::new("div").attr("tabindex", "-1").id("tabneg"))
                .child(NodeBuilder::new("button").attr("disabled", "").id("disabled"))
                .child(NodeBuilder::new("select").hidden().id("hidden"))
                .child(NodeBuilder::new("p").child(NodeBuilder::new("textarea").id("nested"))),
        );

        let ids: Vec<_> = focusable_elements(&doc, root)
            .into_iter()
            .filter_map(|n| doc.id(n))
            .collect();
        assert_eq!(ids, ["link", "input", "tab0", "nested"]);
    }

    #[test]
    fn hidden_ancestor_excludes_children() {
        let doc = Document::new();
        let root = surface(
            &doc,
            NodeBuilder::new("div").child(NodeBuilder::new("div").hidden().child(NodeBuilder::new("button"))),
        );
        assert!(focusable_elements(&doc, root).is_empty());
    }

    #[test]
    fn hidden_attribute_excludes_element() {
        let doc = Document::new();
        let root = surface(
            &doc,
            NodeBuilder::new("div")
                .child(NodeBuilder::new("button").id("shown"))
                .child(NodeBuilder::new("button").attr("hidden", "").id("attr-hidden")),
        );
        let ids: Vec<_> = focusable_elements(&doc, root)
            .into_iter()
            .filter_map(|n| doc.id(n))
            .collect();
        assert_eq!(ids, ["shown"]);
    }

    #[test]
    fn detached_surface_has_nothing_focusable() {
        let doc = Document::new();
        let root = NodeBuilder::new("div").child(NodeBuilder::new("button")).build(&doc);
        assert!(focusable_elements(&doc, root).is_empty());
    }

    #[test]
    fn wraps_at_both_ends() {
        let doc = Document::new();
        let a = doc.create_element("button");
        let b = doc.create_element("button");
        let list = [a, b];
        assert_eq!(trap_step(&list, Some(b), false), Some(a));
        assert_eq!(trap_step(&list, Some(a), true), Some(b));
        assert_eq!(trap_step(&list, Some(a), false), Some(b));
        assert_eq!(trap_step(&list, Some(b), true), Some(a));
    }

    #[test]
    fn pulls_outside_focus_in() {
        let doc = Document::new();
        let a = doc.create_element("button");
        let b = doc.create_element("button");
        let c = doc.create_element("button");
        let list = [a, b, c];
        assert_eq!(trap_step(&list, None, false), Some(a));
        assert_eq!(trap_step(&list, None, true), Some(c));
        assert_eq!(trap_step(&list, Some(doc.body()), false), Some(a));
    }

    #[test]
    fn single_element_stays_put() {
        let doc = Document::new();
        let only = doc.create_element("button");
        assert_eq!(trap_step(&[only], Some(only), false), Some(only));
        assert_eq!(trap_step(&[only], Some(only), true), Some(only));
    }

    #[test]
    fn empty_list_is_inert() {
        assert_eq!(trap_step(&[], None, false), None);
    }
}
