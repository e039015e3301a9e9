#![forbid(unsafe_code)]

//! Retained element tree.
//!
//! [`Document`] is a cheap-clone handle (`Rc<RefCell<..>>`) over the tree, so
//! listeners can capture it and mutate the page while an event is being
//! dispatched. Borrows are never held across a listener call.
//!
//! # Invariants
//!
//! - Node slots are never reused: a [`NodeId`] refers to the same element for
//!   the lifetime of the document, whether attached or not.
//! - A node is *connected* iff its parent chain reaches the root.
//! - A node is *rendered* iff it is connected and neither it nor any ancestor
//!   has been hidden with [`Document::set_displayed`] or carries a `hidden`
//!   attribute.
//! - The active element is only ever reported while it is rendered.
//!
//! # Failure Modes
//!
//! - Operations on an unknown `NodeId` are no-ops and queries return
//!   `None`/`false`/empty.
//! - `append_child` refuses to create cycles (appending an ancestor under its
//!   own descendant is ignored).

mod builder;

pub use builder::NodeBuilder;

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::event::{DispatchOutcome, Event, EventContext, EventType, Handler, KeyEvent};

/// Handle to an element in a [`Document`]. Does not own the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Handle to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Viewport measurements used for layout-dependent styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    /// Full window width, including a vertical scrollbar.
    pub viewport_width: u32,
    /// Width available to content.
    pub client_width: u32,
}

impl PageMetrics {
    /// Width of the vertical scrollbar (zero for overlay scrollbars).
    #[inline]
    pub fn scrollbar_width(&self) -> u32 {
        self.viewport_width.saturating_sub(self.client_width)
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            client_width: 1280,
        }
    }
}

#[derive(Debug)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: AHashMap<String, String>,
    styles: AHashMap<String, String>,
    text: String,
    markup: Option<String>,
    displayed: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: AHashMap::new(),
            styles: AHashMap::new(),
            text: String::new(),
            markup: None,
            displayed: true,
            parent: None,
            children: Vec::new(),
        }
    }
}

struct Listener {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    handler: Handler,
}

struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    listeners: Vec<Listener>,
    next_listener: u64,
    metrics: PageMetrics,
}

impl Tree {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    fn is_rendered(&self, mut node: NodeId) -> bool {
        loop {
            let Some(n) = self.node(node) else {
                return false;
            };
            if !n.displayed || n.attributes.contains_key("hidden") {
                return false;
            }
            match n.parent {
                Some(parent) => node = parent,
                None => return node == self.root,
            }
        }
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(n) = self.node(node) {
            for &child in &n.children {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }
}

/// Shared handle to an element tree.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .field("listeners", &tree.listeners.len())
            .field("active", &tree.active)
            .finish()
    }
}

impl Document {
    /// Create a document holding `<html>` with an empty `<body>`.
    pub fn new() -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            active: None,
            listeners: Vec::new(),
            next_listener: 1,
            metrics: PageMetrics::default(),
        };
        let root = tree.push(Node::new("html"));
        let body = tree.push(Node::new("body"));
        tree.nodes[body.0 as usize].parent = Some(root);
        tree.nodes[root.0 as usize].children.push(body);
        tree.root = root;
        tree.body = body;
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    pub fn root(&self) -> NodeId {
        self.tree.borrow().root
    }

    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    pub fn metrics(&self) -> PageMetrics {
        self.tree.borrow().metrics
    }

    pub fn set_metrics(&self, metrics: PageMetrics) {
        self.tree.borrow_mut().metrics = metrics;
    }

    // --- Structure ---

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().push(Node::new(tag))
    }

    /// Whether `node` was created by this document.
    pub fn exists(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).is_some()
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if tree.node(parent).is_none() || tree.node(child).is_none() {
            return;
        }
        if tree.is_inclusive_ancestor(child, parent) {
            return;
        }
        tree.detach(child);
        if let Some(p) = tree.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = tree.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&self, node: NodeId) {
        self.tree.borrow_mut().detach(node);
    }

    /// Detach every child of `node` and drop its text and markup.
    pub fn clear_children(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        let children = match tree.node_mut(node) {
            Some(n) => {
                n.text.clear();
                n.markup = None;
                std::mem::take(&mut n.children)
            }
            None => return,
        };
        for child in children {
            if let Some(c) = tree.node_mut(child) {
                c.parent = None;
            }
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// All descendants of `node` in document (pre-)order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.tree.borrow().collect_descendants(node, &mut out);
        out
    }

    /// Inclusive containment: `contains(a, a)` is true.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.borrow().is_inclusive_ancestor(ancestor, node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        let tree = self.tree.borrow();
        tree.node(node).is_some() && tree.is_inclusive_ancestor(tree.root, node)
    }

    /// First descendant of `scope` (pre-order) carrying `class`.
    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| self.has_class(n, class))
    }

    /// Connected element whose id is `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let mut all = vec![tree.root];
        tree.collect_descendants(tree.root, &mut all);
        all.into_iter()
            .find(|&n| tree.node(n).and_then(|n| n.id.as_deref()) == Some(id))
    }

    // --- Element data ---

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).map(|n| n.tag.clone())
    }

    pub fn set_id(&self, node: NodeId, id: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.id = Some(id.to_owned());
        }
    }

    pub fn id(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).and_then(|n| n.id.clone())
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node)
            && !n.classes.iter().any(|c| c == class)
        {
            n.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.attributes.remove(name);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree
            .borrow()
            .node(node)
            .is_some_and(|n| n.attributes.contains_key(name))
    }

    /// Number of attributes on `node`.
    pub fn attribute_count(&self, node: NodeId) -> usize {
        self.tree
            .borrow()
            .node(node)
            .map_or(0, |n| n.attributes.len())
    }

    /// Set an inline style property (custom properties included).
    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.styles.insert(property.to_owned(), value.to_owned());
        }
    }

    pub fn remove_style(&self, node: NodeId, property: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.styles.remove(property);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(node)
            .and_then(|n| n.styles.get(property).cloned())
    }

    /// Replace the content of `node` with plain text.
    pub fn set_text(&self, node: NodeId, text: &str) {
        self.clear_children(node);
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.text = text.to_owned();
        }
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let tree = self.tree.borrow();
        let mut out = tree.node(node).map(|n| n.text.clone()).unwrap_or_default();
        let mut descendants = Vec::new();
        tree.collect_descendants(node, &mut descendants);
        for d in descendants {
            if let Some(n) = tree.node(d) {
                out.push_str(&n.text);
            }
        }
        out
    }

    /// Replace the content of `node` with opaque markup.
    ///
    /// The markup is stored as-is. Callers are responsible for sanitising
    /// untrusted input before it reaches this method.
    pub fn set_inner_html(&self, node: NodeId, markup: &str) {
        self.clear_children(node);
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.markup = Some(markup.to_owned());
        }
    }

    pub fn inner_html(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).and_then(|n| n.markup.clone())
    }

    // --- Display & focus ---

    /// Show or hide `node` (the equivalent of toggling `display: none`).
    pub fn set_displayed(&self, node: NodeId, displayed: bool) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.displayed = displayed;
        }
    }

    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).is_some_and(|n| n.displayed)
    }

    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.tree.borrow().is_rendered(node)
    }

    /// Move focus to `node`. Returns `false` if it is not rendered.
    pub fn focus(&self, node: NodeId) -> bool {
        let mut tree = self.tree.borrow_mut();
        if !tree.is_rendered(node) {
            return false;
        }
        tree.active = Some(node);
        true
    }

    pub fn blur(&self) {
        self.tree.borrow_mut().active = None;
    }

    /// The focused element, if it is still rendered.
    pub fn active_element(&self) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.active.filter(|&n| tree.is_rendered(n))
    }

    // --- Listeners & dispatch ---

    pub fn add_listener(
        &self,
        node: NodeId,
        event_type: EventType,
        handler: impl Fn(&EventContext<'_>) + 'static,
    ) -> ListenerId {
        let mut tree = self.tree.borrow_mut();
        let id = ListenerId(tree.next_listener);
        tree.next_listener += 1;
        tree.listeners.push(Listener {
            id,
            node,
            event_type,
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = {
            let mut tree = self.tree.borrow_mut();
            tree.listeners
                .iter()
                .position(|l| l.id == id)
                .map(|idx| tree.listeners.remove(idx))
        };
        // Handler dropped outside the borrow.
        removed.is_some()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.tree.borrow().listeners.iter().any(|l| l.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.tree.borrow().listeners.len()
    }

    /// Dispatch `event` at `target`, bubbling to the root.
    pub fn dispatch(&self, target: NodeId, event: Event) -> DispatchOutcome {
        let path = {
            let tree = self.tree.borrow();
            let mut path = Vec::new();
            let mut cursor = tree.node(target).map(|_| target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = tree.node(node).and_then(|n| n.parent);
            }
            path
        };

        let ctx = EventContext::new(&event, target);
        let mut handled = 0;
        for node in path {
            let handlers: Vec<(ListenerId, Handler)> = self
                .tree
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.node == node && l.event_type.matches(&event))
                .map(|l| (l.id, Rc::clone(&l.handler)))
                .collect();

            ctx.set_current_target(node);
            for (id, handler) in handlers {
                // A listener removed by an earlier one in this pass is skipped.
                if !self.has_listener(id) {
                    continue;
                }
                handler(&ctx);
                handled += 1;
            }
            if ctx.propagation_stopped() {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(node = target.0, handled, "event dispatched");

        DispatchOutcome {
            default_prevented: ctx.default_prevented(),
            propagation_stopped: ctx.propagation_stopped(),
            handled,
        }
    }

    /// Dispatch a key press at the focused element (or body).
    pub fn press_key(&self, key: impl Into<KeyEvent>) -> DispatchOutcome {
        let target = self.active_element().unwrap_or_else(|| self.body());
        self.dispatch(target, Event::Key(key.into()))
    }

    /// Dispatch a click at `node`.
    pub fn click(&self, node: NodeId) -> DispatchOutcome {
        self.dispatch(node, Event::Click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CustomEvent, KeyCode};
    use std::cell::Cell;

    fn attached(doc: &Document, tag: &str) -> NodeId {
        let node = doc.create_element(tag);
        doc.append_child(doc.body(), node);
        node
    }

    #[test]
    fn new_document_has_body_under_root() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
        assert!(doc.is_connected(doc.body()));
        assert!(doc.is_rendered(doc.body()));
    }

    #[test]
    fn hidden_attribute_hides_subtree() {
        let doc = Document::new();
        let div = attached(&doc, "div");
        let button = doc.create_element("button");
        doc.append_child(div, button);
        assert!(doc.focus(button));

        doc.set_attribute(div, "hidden", "");
        assert!(doc.is_displayed(div));
        assert!(!doc.is_rendered(button));
        assert_eq!(doc.active_element(), None);

        doc.remove_attribute(div, "hidden");
        assert!(doc.is_rendered(button));
    }

    #[test]
    fn detached_nodes_are_not_rendered() {
        let doc = Document::new();
        let div = doc.create_element("div");
        assert!(!doc.is_connected(div));
        assert!(!doc.is_rendered(div));
        assert!(!doc.focus(div));

        doc.append_child(doc.body(), div);
        assert!(doc.is_rendered(div));
        doc.remove(div);
        assert!(!doc.is_connected(div));
        assert!(doc.exists(div));
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let doc = Document::new();
        let outer = attached(&doc, "div");
        let inner = doc.create_element("button");
        doc.append_child(outer, inner);

        doc.set_displayed(outer, false);
        assert!(doc.is_displayed(inner));
        assert!(!doc.is_rendered(inner));
    }

    #[test]
    fn append_refuses_cycles() {
        let doc = Document::new();
        let a = attached(&doc, "div");
        let b = doc.create_element("div");
        doc.append_child(a, b);
        doc.append_child(b, a);
        assert_eq!(doc.parent(a), Some(doc.body()));
        assert_eq!(doc.parent(b), Some(a));
    }

    #[test]
    fn descendants_are_preorder() {
        let doc = Document::new();
        let a = attached(&doc, "div");
        let b = doc.create_element("p");
        let c = doc.create_element("span");
        let d = doc.create_element("em");
        doc.append_child(a, b);
        doc.append_child(b, c);
        doc.append_child(a, d);
        assert_eq!(doc.descendants(a), vec![b, c, d]);
    }

    #[test]
    fn id_lookup_ignores_detached() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.set_id(div, "dialog");
        assert_eq!(doc.get_element_by_id("dialog"), None);
        doc.append_child(doc.body(), div);
        assert_eq!(doc.get_element_by_id("dialog"), Some(div));
    }

    #[test]
    fn classes_are_unique() {
        let doc = Document::new();
        let div = attached(&doc, "div");
        doc.add_class(div, "modal");
        doc.add_class(div, "modal");
        assert_eq!(doc.classes(div), vec!["modal".to_string()]);
        doc.remove_class(div, "modal");
        assert!(!doc.has_class(div, "modal"));
    }

    #[test]
    fn active_element_drops_when_hidden() {
        let doc = Document::new();
        let button = attached(&doc, "button");
        assert!(doc.focus(button));
        assert_eq!(doc.active_element(), Some(button));
        doc.set_displayed(button, false);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn text_and_markup_replace_children() {
        let doc = Document::new();
        let div = attached(&doc, "div");
        let child = doc.create_element("span");
        doc.append_child(div, child);
        doc.set_text(child, "inner");
        assert_eq!(doc.text_content(div), "inner");

        doc.set_inner_html(div, "<b>bold</b>");
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.inner_html(div).as_deref(), Some("<b>bold</b>"));

        doc.set_text(div, "plain");
        assert_eq!(doc.inner_html(div), None);
        assert_eq!(doc.text_content(div), "plain");
    }

    #[test]
    fn dispatch_bubbles_to_root() {
        let doc = Document::new();
        let button = attached(&doc, "button");
        let seen = Rc::new(RefCell::new(Vec::new()));

        for node in [button, doc.body(), doc.root()] {
            let seen = Rc::clone(&seen);
            doc.add_listener(node, EventType::Click, move |ctx| {
                seen.borrow_mut().push(ctx.current_target());
            });
        }

        let outcome = doc.click(button);
        assert_eq!(outcome.handled, 3);
        assert_eq!(*seen.borrow(), vec![button, doc.body(), doc.root()]);
    }

    #[test]
    fn stop_propagation_finishes_current_node() {
        let doc = Document::new();
        let button = attached(&doc, "button");
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        doc.add_listener(button, EventType::Click, move |ctx| {
            c.set(c.get() + 1);
            ctx.stop_propagation();
        });
        let c = Rc::clone(&count);
        doc.add_listener(button, EventType::Click, move |_| c.set(c.get() + 1));
        let c = Rc::clone(&count);
        doc.add_listener(doc.body(), EventType::Click, move |_| c.set(c.get() + 100));

        let outcome = doc.click(button);
        assert!(outcome.propagation_stopped);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let doc = Document::new();
        let button = attached(&doc, "button");
        let fired = Rc::new(Cell::new(false));

        let second_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let slot = Rc::clone(&second_slot);
        let d = doc.clone();
        doc.add_listener(button, EventType::Click, move |_| {
            if let Some(id) = slot.get() {
                d.remove_listener(id);
            }
        });
        let f = Rc::clone(&fired);
        let second = doc.add_listener(button, EventType::Click, move |_| f.set(true));
        second_slot.set(Some(second));

        doc.click(button);
        assert!(!fired.get());
        assert_eq!(doc.listener_count(), 1);
    }

    #[test]
    fn press_key_targets_focus_and_reports_prevent_default() {
        let doc = Document::new();
        let input = attached(&doc, "input");
        doc.focus(input);

        let target = Rc::new(Cell::new(None));
        let t = Rc::clone(&target);
        doc.add_listener(doc.root(), EventType::KeyDown, move |ctx| {
            t.set(Some(ctx.target()));
            ctx.prevent_default();
        });

        let outcome = doc.press_key(KeyCode::Escape);
        assert!(outcome.default_prevented);
        assert_eq!(target.get(), Some(input));
    }

    #[test]
    fn custom_events_only_reach_matching_listeners() {
        let doc = Document::new();
        let div = attached(&doc, "div");
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        doc.add_listener(doc.root(), EventType::custom("modal-opened"), move |_| {
            h.set(h.get() + 1)
        });

        doc.dispatch(div, Event::Custom(CustomEvent::new("modal-closed")));
        assert_eq!(hits.get(), 0);
        doc.dispatch(div, Event::Custom(CustomEvent::new("modal-opened")));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn scrollbar_width_from_metrics() {
        let doc = Document::new();
        assert_eq!(doc.metrics().scrollbar_width(), 0);
        doc.set_metrics(PageMetrics {
            viewport_width: 1280,
            client_width: 1263,
        });
        assert_eq!(doc.metrics().scrollbar_width(), 17);
    }
}
