#![forbid(unsafe_code)]

//! Lifecycle controller for one dialog surface.
//!
//! # Invariants
//!
//! - The backdrop element exists iff `options.backdrop` is not
//!   [`Backdrop::None`](super::Backdrop::None), and lives until teardown.
//! - `is_open()` becomes `true` only once `open()` has shown the dialog.
//! - One prior-focus slot per open/close cycle; a later open overwrites it.
//! - While open the controller holds exactly one scroll-lock guard and one
//!   overlay entry. Closing moves the guard into a timer that drops it after
//!   [`CLOSE_ANIMATION`].
//! - Every listener the controller registers is tracked and removed on
//!   teardown.
//!
//! # Failure Modes
//!
//! - `open()` while open, `close()` while closed, and any call after
//!   `destroy()` are no-ops.
//! - Focus targets that are no longer rendered are skipped silently.
//! - Dropping the last handle without calling `destroy()` still tears down,
//!   but emits no events.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use mantle_core::{
    CustomEvent, Document, Event, EventContext, EventType, KeyCode, ListenerId, NodeBuilder,
    NodeId,
};
use mantle_runtime::{OverlayId, Page, ScrollLockGuard, TimerId};

use super::focus::{focusable_elements, trap_step};
use super::hooks::{Lifecycle, ModalHooks};
use super::options::{Backdrop, ModalOptions};
use super::template::Trigger;
use super::{CLOSE_ANIMATION, classes};
use crate::error::{ModalError, Result};

/// How a controller finds its surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceRef {
    /// A connected element with this id.
    Id(String),
    /// A specific node.
    Node(NodeId),
}

impl From<&str> for SurfaceRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for SurfaceRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<NodeId> for SurfaceRef {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl fmt::Display for SurfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Node(node) => write!(f, "node {}", node.index()),
        }
    }
}

impl SurfaceRef {
    fn resolve(&self, doc: &Document) -> Result<NodeId> {
        let node = match self {
            Self::Id(id) => doc.get_element_by_id(id),
            Self::Node(node) => doc.exists(*node).then_some(*node),
        };
        node.ok_or_else(|| ModalError::NotFound(self.to_string()))
    }
}

/// Replaceable region of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalRegion {
    Header,
    Body,
    Footer,
}

impl ModalRegion {
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Header => classes::HEADER,
            Self::Body => classes::BODY,
            Self::Footer => classes::FOOTER,
        }
    }
}

/// Content for a surface region.
///
/// `Markup` is stored unsanitised; callers must clean untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Markup(String),
    Nodes(Vec<NodeBuilder>),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NodeBuilder> for Content {
    fn from(node: NodeBuilder) -> Self {
        Self::Nodes(vec![node])
    }
}

impl Content {
    pub(crate) fn apply_to(&self, builder: NodeBuilder) -> NodeBuilder {
        match self {
            Self::Text(text) => builder.text(text.clone()),
            Self::Markup(markup) => builder.markup(markup.clone()),
            Self::Nodes(nodes) => builder.children(nodes.iter().cloned()),
        }
    }

    fn render(&self, doc: &Document, node: NodeId) {
        match self {
            Self::Text(text) => doc.set_text(node, text),
            Self::Markup(markup) => doc.set_inner_html(node, markup),
            Self::Nodes(nodes) => {
                doc.clear_children(node);
                doc.set_text(node, "");
                for builder in nodes {
                    let child = builder.build(doc);
                    doc.append_child(node, child);
                }
            }
        }
    }
}

/// What construction changed on the surface, so teardown can undo it.
#[derive(Debug, Default)]
struct SurfaceSnapshot {
    added_classes: Vec<String>,
    attributes: Vec<(&'static str, Option<String>)>,
    displayed: bool,
}

#[derive(Default)]
struct ControllerState {
    open: bool,
    destroyed: bool,
    focusables: Vec<NodeId>,
    prior_focus: Option<NodeId>,
    listeners: Vec<ListenerId>,
    pending_focus: Option<TimerId>,
    pending_release: Vec<TimerId>,
    lock: Option<ScrollLockGuard>,
    overlay: Option<OverlayId>,
    snapshot: SurfaceSnapshot,
}

struct Inner {
    page: Page,
    surface: NodeId,
    backdrop: Option<NodeId>,
    dialog_box: Option<NodeId>,
    options: ModalOptions,
    hooks: ModalHooks,
    state: RefCell<ControllerState>,
}

/// Owns the open/close state of one dialog surface.
///
/// Cloning is cheap; clones control the same dialog. The controller lives
/// until its last handle is dropped or [`destroy`](Self::destroy) is
/// called. Listeners registered on the document only hold weak references.
///
/// Hooks receive the controller as an argument. A hook that captures a
/// handle to its own controller keeps it alive until `destroy()`.
#[derive(Clone)]
pub struct ModalController {
    inner: Rc<Inner>,
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ModalController")
            .field("surface", &self.inner.surface)
            .field("backdrop", &self.inner.backdrop)
            .field("open", &state.open)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl PartialEq for ModalController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ModalController {}

impl ModalController {
    /// Bind a controller to `target` on `page`.
    ///
    /// # Errors
    ///
    /// [`ModalError::NotFound`] if `target` does not resolve to an element.
    pub fn new(page: &Page, target: impl Into<SurfaceRef>, options: ModalOptions) -> Result<Self> {
        Self::with_hooks(page, target, options, ModalHooks::default())
    }

    /// Like [`new`](Self::new), with lifecycle callbacks.
    pub fn with_hooks(
        page: &Page,
        target: impl Into<SurfaceRef>,
        options: ModalOptions,
        hooks: ModalHooks,
    ) -> Result<Self> {
        let doc = page.document();
        let surface = target.into().resolve(doc)?;

        let _span = tracing::debug_span!("modal_bind", surface = surface.index()).entered();

        let snapshot = prepare_surface(doc, surface, &options);
        let backdrop = options.backdrop.is_present().then(|| {
            let node = doc.create_element("div");
            doc.add_class(node, classes::BACKDROP);
            if options.backdrop == Backdrop::Static {
                doc.add_class(node, classes::BACKDROP_STATIC);
            }
            doc.set_displayed(node, false);
            doc.append_child(doc.body(), node);
            node
        });
        let dialog_box = doc.find_by_class(surface, classes::DIALOG);

        let inner = Rc::new(Inner {
            page: page.clone(),
            surface,
            backdrop,
            dialog_box,
            options,
            hooks,
            state: RefCell::new(ControllerState {
                snapshot,
                ..Default::default()
            }),
        });
        let controller = Self { inner };
        controller.bind_listeners();
        tracing::debug!(
            backdrop = backdrop.is_some(),
            listeners = controller.inner.state.borrow().listeners.len(),
            "modal controller bound"
        );
        Ok(controller)
    }

    fn bind_listeners(&self) {
        let doc = self.inner.page.document();
        let mut ids = Vec::with_capacity(4);

        if self.inner.options.keyboard {
            ids.push(doc.add_listener(
                doc.root(),
                EventType::KeyDown,
                self.handler(|modal, ctx| modal.handle_key(ctx)),
            ));
        }
        if let Some(backdrop) = self.inner.backdrop {
            ids.push(doc.add_listener(
                backdrop,
                EventType::Click,
                self.handler(|modal, _| modal.dismiss_from_backdrop()),
            ));
        }
        if let Some(dialog_box) = self.inner.dialog_box {
            ids.push(doc.add_listener(
                dialog_box,
                EventType::Click,
                self.handler(move |modal, ctx| {
                    let _ = modal.route_trigger(ctx.target(), dialog_box);
                    // Clicks inside the box never count as backdrop clicks.
                    ctx.stop_propagation();
                }),
            ));
        }
        ids.push(doc.add_listener(
            self.inner.surface,
            EventType::Click,
            self.handler(|modal, ctx| modal.handle_surface_click(ctx)),
        ));

        self.inner.state.borrow_mut().listeners = ids;
    }

    /// Wrap `f` in a listener that only holds a weak reference.
    fn handler(
        &self,
        f: impl Fn(&ModalController, &EventContext<'_>) + 'static,
    ) -> impl Fn(&EventContext<'_>) + 'static {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        move |ctx: &EventContext<'_>| {
            if let Some(inner) = weak.upgrade() {
                f(&ModalController { inner }, ctx);
            }
        }
    }

    // --- Accessors ---

    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().open
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    pub fn surface(&self) -> NodeId {
        self.inner.surface
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.inner.backdrop
    }

    pub fn options(&self) -> &ModalOptions {
        &self.inner.options
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }

    /// Focus-trap order as of the last open or refresh.
    pub fn focusable_elements(&self) -> Vec<NodeId> {
        self.inner.state.borrow().focusables.clone()
    }

    // --- Lifecycle ---

    /// Show the dialog. No-op if already open or destroyed.
    pub fn open(&self) {
        let _span = tracing::debug_span!("modal_open", surface = self.inner.surface.index()).entered();
        {
            let state = self.inner.state.borrow();
            if state.open || state.destroyed {
                tracing::trace!(open = state.open, destroyed = state.destroyed, "open ignored");
                return;
            }
        }

        let page = &self.inner.page;
        let doc = page.document();
        let prior_focus = doc.active_element();
        let guard = page.scroll_lock().acquire();
        let (overlay, z_index) = page.overlays().push();

        if let Some(backdrop) = self.inner.backdrop {
            doc.set_style(backdrop, "z-index", &z_index.to_string());
            doc.add_class(backdrop, classes::OPEN);
            doc.set_displayed(backdrop, true);
        }
        let surface = self.inner.surface;
        doc.set_style(surface, "z-index", &(z_index + 1).to_string());
        doc.add_class(surface, classes::OPEN);
        doc.set_attribute(surface, "aria-hidden", "false");
        doc.set_displayed(surface, true);

        let focusables = focusable_elements(doc, surface);
        let pending_focus = self.inner.options.focus.then(|| {
            let weak = Rc::downgrade(&self.inner);
            page.scheduler().defer(move || {
                if let Some(inner) = weak.upgrade() {
                    ModalController { inner }.focus_initial();
                }
            })
        });

        {
            let mut state = self.inner.state.borrow_mut();
            state.open = true;
            state.prior_focus = prior_focus;
            state.focusables = focusables;
            state.lock = Some(guard);
            state.overlay = Some(overlay);
            state.pending_focus = pending_focus;
        }
        tracing::debug!(z_index, depth = page.overlays().depth(), "modal opened");
        self.emit(Lifecycle::Opened);
    }

    /// Hide the dialog. No-op if not open.
    pub fn close(&self) {
        let _span = tracing::debug_span!("modal_close", surface = self.inner.surface.index()).entered();
        let Some(closing) = self.inner.take_open_state() else {
            tracing::trace!("close ignored");
            return;
        };

        self.inner.hide(closing.overlay);
        if let Some(guard) = closing.lock {
            let release = self
                .inner
                .page
                .scheduler()
                .schedule(CLOSE_ANIMATION, move || drop(guard));
            let scheduler = self.inner.page.scheduler();
            let mut state = self.inner.state.borrow_mut();
            state.pending_release.retain(|&id| scheduler.is_pending(id));
            state.pending_release.push(release);
        }
        if self.inner.options.focus {
            if let Some(prior) = closing.prior_focus {
                self.inner.page.document().focus(prior);
            }
        }
        tracing::debug!("modal closed");
        self.emit(Lifecycle::Closed);
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Close, then release everything the controller created or changed.
    ///
    /// Removes the backdrop, every tracked listener, and pending timers
    /// (a pending scroll release happens immediately), and restores the
    /// surface's classes, attributes and visibility. Calling it again is a
    /// no-op.
    pub fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        let _span =
            tracing::debug_span!("modal_destroy", surface = self.inner.surface.index()).entered();
        self.close();
        // A close hook may already have destroyed this controller.
        if self.is_destroyed() {
            return;
        }
        self.inner.teardown();
        tracing::debug!("modal destroyed");
    }

    /// Recompute the focus-trap order from the current content.
    pub fn refresh_focusables(&self) {
        let focusables = focusable_elements(self.inner.page.document(), self.inner.surface);
        self.inner.state.borrow_mut().focusables = focusables;
    }

    // --- Content ---

    /// Replace the content of `region`.
    ///
    /// # Errors
    ///
    /// [`ModalError::RegionMissing`] if the surface has no such region.
    pub fn set_content(&self, content: impl Into<Content>, region: ModalRegion) -> Result<()> {
        let doc = self.inner.page.document();
        let class = region.class_name();
        let node = doc
            .find_by_class(self.inner.surface, class)
            .ok_or(ModalError::RegionMissing { class })?;
        content.into().render(doc, node);
        if self.is_open() {
            self.refresh_focusables();
        }
        Ok(())
    }

    /// Replace the title text.
    ///
    /// # Errors
    ///
    /// [`ModalError::RegionMissing`] if the surface has no `.modal-title`.
    pub fn set_title(&self, title: &str) -> Result<()> {
        let doc = self.inner.page.document();
        let node = doc
            .find_by_class(self.inner.surface, classes::TITLE)
            .ok_or(ModalError::RegionMissing {
                class: classes::TITLE,
            })?;
        doc.set_text(node, title);
        Ok(())
    }

    // --- Event handling ---

    fn is_topmost(&self) -> bool {
        let state = self.inner.state.borrow();
        state
            .overlay
            .is_some_and(|id| self.inner.page.overlays().is_top(id))
    }

    fn handle_key(&self, ctx: &EventContext<'_>) {
        let Some(key) = ctx.event().key() else {
            return;
        };
        // A dialog above this one may have handled the key in the same pass.
        if ctx.default_prevented() || !self.is_open() || !self.is_topmost() {
            return;
        }
        match key.code {
            KeyCode::Escape if self.inner.options.close_on_escape => {
                ctx.prevent_default();
                self.close();
            }
            KeyCode::Tab => {
                let doc = self.inner.page.document();
                let next = {
                    let state = self.inner.state.borrow();
                    trap_step(&state.focusables, doc.active_element(), key.shift())
                };
                if let Some(next) = next {
                    ctx.prevent_default();
                    doc.focus(next);
                }
            }
            _ => {}
        }
    }

    fn dismiss_from_backdrop(&self) {
        if self.is_open() && self.inner.options.backdrop_dismisses() {
            tracing::trace!("backdrop dismiss");
            self.close();
        }
    }

    fn handle_surface_click(&self, ctx: &EventContext<'_>) {
        if self.route_trigger(ctx.target(), self.inner.surface) {
            return;
        }
        // Without an inner box only clicks on the wrapper itself dismiss.
        if self.inner.dialog_box.is_some() || ctx.target() == self.inner.surface {
            self.dismiss_from_backdrop();
        }
    }

    /// Activate the nearest trigger between `target` and `boundary`.
    fn route_trigger(&self, target: NodeId, boundary: NodeId) -> bool {
        if !self.is_open() {
            return false;
        }
        let doc = self.inner.page.document();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if let Some(trigger) = Trigger::of(doc, node) {
                self.activate(trigger);
                return true;
            }
            if node == boundary {
                break;
            }
            cursor = doc.parent(node);
        }
        false
    }

    fn activate(&self, trigger: Trigger) {
        tracing::trace!(?trigger, "modal trigger");
        match trigger {
            Trigger::Close => {}
            Trigger::Confirm => self.emit(Lifecycle::Confirmed),
            Trigger::Cancel => self.emit(Lifecycle::Cancelled),
        }
        self.close();
    }

    fn focus_initial(&self) {
        let target = {
            let mut state = self.inner.state.borrow_mut();
            state.pending_focus = None;
            if !state.open {
                return;
            }
            state.focusables.first().copied()
        };
        let doc = self.inner.page.document();
        doc.focus(target.unwrap_or(self.inner.surface));
    }

    /// Single emission point: DOM event first, then the hook.
    fn emit(&self, lifecycle: Lifecycle) {
        if let Some(name) = lifecycle.event_name() {
            let event = CustomEvent::new(name).with_detail(self.clone());
            self.inner
                .page
                .document()
                .dispatch(self.inner.surface, Event::Custom(event));
        }
        if let Some(hook) = self.inner.hooks.get(lifecycle) {
            hook(self);
        }
    }
}

/// Open-state resources handed over by a close.
struct Closing {
    prior_focus: Option<NodeId>,
    lock: Option<ScrollLockGuard>,
    overlay: Option<OverlayId>,
}

impl Inner {
    fn take_open_state(&self) -> Option<Closing> {
        let (closing, pending_focus) = {
            let mut state = self.state.borrow_mut();
            if !state.open {
                return None;
            }
            state.open = false;
            let closing = Closing {
                prior_focus: state.prior_focus.take(),
                lock: state.lock.take(),
                overlay: state.overlay.take(),
            };
            (closing, state.pending_focus.take())
        };
        if let Some(id) = pending_focus {
            self.page.scheduler().cancel(id);
        }
        Some(closing)
    }

    fn hide(&self, overlay: Option<OverlayId>) {
        let doc = self.page.document();
        doc.set_displayed(self.surface, false);
        doc.remove_class(self.surface, classes::OPEN);
        doc.set_attribute(self.surface, "aria-hidden", "true");
        doc.remove_style(self.surface, "z-index");
        if let Some(backdrop) = self.backdrop {
            doc.set_displayed(backdrop, false);
            doc.remove_class(backdrop, classes::OPEN);
            doc.remove_style(backdrop, "z-index");
        }
        if let Some(id) = overlay {
            self.page.overlays().remove(id);
        }
    }

    /// Release listeners, timers, the backdrop and surface changes.
    fn teardown(&self) {
        if std::mem::replace(&mut self.state.borrow_mut().destroyed, true) {
            return;
        }
        // An open dialog reaching here is being dropped: hide it quietly.
        if let Some(closing) = self.take_open_state() {
            self.hide(closing.overlay);
        }
        let (listeners, pending_release, snapshot) = {
            let mut state = self.state.borrow_mut();
            state.focusables.clear();
            (
                std::mem::take(&mut state.listeners),
                std::mem::take(&mut state.pending_release),
                std::mem::take(&mut state.snapshot),
            )
        };

        let doc = self.page.document();
        for id in listeners {
            doc.remove_listener(id);
        }
        let scheduler = self.page.scheduler();
        for id in pending_release {
            // Drops the held guard now instead of after the animation.
            scheduler.cancel(id);
        }
        if let Some(backdrop) = self.backdrop {
            doc.remove(backdrop);
        }
        restore_surface(doc, self.surface, snapshot);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !self.state.get_mut().destroyed {
            tracing::trace!(surface = self.surface.index(), "modal dropped without destroy");
            self.teardown();
        }
    }
}

fn prepare_surface(doc: &Document, surface: NodeId, options: &ModalOptions) -> SurfaceSnapshot {
    let mut snapshot = SurfaceSnapshot {
        displayed: doc.is_displayed(surface),
        ..Default::default()
    };

    let modifiers = [
        options.size.class_name(),
        options.variant.class_name(),
        options.animation.class_name(),
    ];
    for class in modifiers.into_iter().flatten() {
        if !doc.has_class(surface, &class) {
            doc.add_class(surface, &class);
            snapshot.added_classes.push(class);
        }
    }

    let attributes = [
        ("role", "dialog"),
        ("aria-modal", "true"),
        ("aria-hidden", "true"),
        ("tabindex", "-1"),
    ];
    for (name, value) in attributes {
        snapshot.attributes.push((name, doc.attribute(surface, name)));
        doc.set_attribute(surface, name, value);
    }

    doc.set_displayed(surface, false);
    snapshot
}

fn restore_surface(doc: &Document, surface: NodeId, snapshot: SurfaceSnapshot) {
    for class in &snapshot.added_classes {
        doc.remove_class(surface, class);
    }
    for (name, prior) in snapshot.attributes {
        match prior {
            Some(value) => doc.set_attribute(surface, name, &value),
            None => doc.remove_attribute(surface, name),
        }
    }
    doc.remove_class(surface, classes::OPEN);
    doc.remove_style(surface, "z-index");
    doc.set_displayed(surface, snapshot.displayed);
}
