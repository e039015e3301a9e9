//! End-to-end lifecycle tests for `ModalController`.
//!
//! Covers open/close round trips, idempotence, backdrop policy, the focus
//! trap, teardown, per-option key handling, nested dialogs and rapid
//! reopen sequences against the shared scroll lock.

#![forbid(unsafe_code)]

use std::time::Duration;

use mantle_core::{Document, KeyCode, KeyEvent, Modifiers, NodeBuilder, NodeId};
use mantle_runtime::Page;
use mantle_widgets::modal::{
    Backdrop, CLOSE_ANIMATION, ModalController, ModalHooks, ModalOptions, ModalRegistry,
};
use proptest::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

/// A surface with `buttons` focusable buttons inside `.modal-dialog`.
fn mount(page: &Page, id: &str, buttons: usize) -> NodeId {
    let doc = page.document();
    let body = (0..buttons).map(|i| NodeBuilder::new("button").id(format!("{id}-b{i}")));
    let surface = NodeBuilder::new("div")
        .id(id)
        .class("modal")
        .child(
            NodeBuilder::new("div")
                .class("modal-dialog")
                .child(NodeBuilder::new("div").class("modal-body").children(body)),
        )
        .build(doc);
    doc.append_child(doc.body(), surface);
    surface
}

fn button(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no #{id}"))
}

fn outside_button(doc: &Document) -> NodeId {
    let node = doc.create_element("button");
    doc.append_child(doc.body(), node);
    node
}

fn settle(page: &Page) {
    page.scheduler().advance(CLOSE_ANIMATION);
}

fn any_options() -> impl Strategy<Value = ModalOptions> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop_oneof![
            Just(Backdrop::None),
            Just(Backdrop::Dismissible),
            Just(Backdrop::Static)
        ],
    )
        .prop_map(|(on_backdrop, on_escape, keyboard, focus, backdrop)| {
            ModalOptions::new()
                .close_on_backdrop(on_backdrop)
                .close_on_escape(on_escape)
                .keyboard(keyboard)
                .focus(focus)
                .backdrop(backdrop)
        })
}

// =============================================================================
// Open / close
// =============================================================================

proptest! {
    #[test]
    fn open_then_close_restores_state(options in any_options()) {
        let page = Page::blank();
        let doc = page.document();
        mount(&page, "dlg", 2);
        let trigger = outside_button(doc);
        doc.focus(trigger);

        let modal = ModalController::new(&page, "dlg", options.clone()).unwrap();
        modal.open();
        page.scheduler().run_due();
        modal.close();

        prop_assert!(!modal.is_open());
        if let Some(backdrop) = modal.backdrop() {
            prop_assert!(!doc.is_displayed(backdrop));
        }
        prop_assert_eq!(modal.backdrop().is_some(), options.backdrop != Backdrop::None);
        if options.focus {
            prop_assert_eq!(doc.active_element(), Some(trigger));
        }
    }
}

#[test]
fn open_twice_is_open_once() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();

    modal.open();
    let listeners = doc.listener_count();
    let children = doc.children(doc.body()).len();
    modal.open();

    assert_eq!(doc.listener_count(), listeners);
    assert_eq!(doc.children(doc.body()).len(), children);
    assert_eq!(page.scroll_lock().holders(), 1);
    assert_eq!(page.overlays().depth(), 1);
}

#[test]
fn reopen_overwrites_prior_focus() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 1);
    let first = outside_button(doc);
    let second = outside_button(doc);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();

    doc.focus(first);
    modal.open();
    modal.close();
    doc.focus(second);
    modal.open();
    modal.close();
    assert_eq!(doc.active_element(), Some(second));
}

#[test]
fn focus_disabled_leaves_focus_alone() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 1);
    let trigger = outside_button(doc);
    doc.focus(trigger);
    let modal = ModalController::new(&page, "dlg", ModalOptions::new().focus(false)).unwrap();

    modal.open();
    page.scheduler().run_due();
    assert_eq!(doc.active_element(), Some(trigger));
}

// =============================================================================
// Backdrop policy
// =============================================================================

#[test]
fn static_backdrop_never_closes() {
    let page = Page::blank();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::new().backdrop(Backdrop::Static)).unwrap();
    modal.open();

    let backdrop = modal.backdrop().unwrap();
    page.document().click(backdrop);
    page.document().click(modal.surface());
    assert!(modal.is_open());
}

#[test]
fn dismissible_backdrop_always_closes() {
    let page = Page::blank();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    for _ in 0..3 {
        modal.open();
        page.document().click(modal.backdrop().unwrap());
        assert!(!modal.is_open());
    }
}

#[test]
fn backdrop_click_ignored_without_close_on_backdrop() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 2);
    let modal = ModalController::new(&page, "dlg", ModalOptions::new().close_on_backdrop(false)).unwrap();
    modal.open();
    page.scheduler().run_due();

    doc.click(modal.backdrop().unwrap());
    assert!(modal.is_open());

    // The trap still works.
    doc.focus(button(doc, "dlg-b1"));
    doc.press_key(KeyCode::Tab);
    assert_eq!(doc.active_element(), Some(button(doc, "dlg-b0")));
}

// =============================================================================
// Keyboard
// =============================================================================

#[test]
fn tab_wraps_between_two_focusables() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 2);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    modal.open();
    page.scheduler().run_due();
    let (first, second) = (button(doc, "dlg-b0"), button(doc, "dlg-b1"));

    doc.focus(second);
    doc.press_key(KeyCode::Tab);
    assert_eq!(doc.active_element(), Some(first));

    doc.press_key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));
    assert_eq!(doc.active_element(), Some(second));
}

#[test]
fn tab_with_nothing_focusable_is_inert() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 0);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    modal.open();
    page.scheduler().run_due();
    let before = doc.active_element();

    let outcome = doc.press_key(KeyCode::Tab);
    assert!(!outcome.default_prevented);
    assert_eq!(doc.active_element(), before);
    assert!(modal.is_open());
}

#[test]
fn escape_closes_and_prevents_default() {
    let page = Page::blank();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    modal.open();

    let outcome = page.document().press_key(KeyCode::Escape);
    assert!(outcome.default_prevented);
    assert!(!modal.is_open());
}

#[test]
fn escape_ignored_without_close_on_escape() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 2);
    let modal = ModalController::new(&page, "dlg", ModalOptions::new().close_on_escape(false)).unwrap();
    modal.open();
    page.scheduler().run_due();

    let outcome = doc.press_key(KeyCode::Escape);
    assert!(!outcome.default_prevented);
    assert!(modal.is_open());

    doc.press_key(KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));
    assert_eq!(doc.active_element(), Some(button(doc, "dlg-b1")));
}

#[test]
fn keys_ignored_while_closed() {
    let page = Page::blank();
    let doc = page.document();
    mount(&page, "dlg", 2);
    let _modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    let outside = outside_button(doc);
    doc.focus(outside);

    let outcome = doc.press_key(KeyCode::Tab);
    assert!(!outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(outside));
}

// =============================================================================
// Nesting
// =============================================================================

#[test]
fn only_topmost_dialog_handles_escape() {
    let page = Page::blank();
    mount(&page, "outer", 1);
    mount(&page, "inner", 1);
    let outer = ModalController::new(&page, "outer", ModalOptions::default()).unwrap();
    let inner = ModalController::new(&page, "inner", ModalOptions::default()).unwrap();

    outer.open();
    inner.open();
    let doc = page.document();
    let outer_z: u32 = doc.style(outer.surface(), "z-index").unwrap().parse().unwrap();
    let inner_z: u32 = doc.style(inner.surface(), "z-index").unwrap().parse().unwrap();
    assert!(inner_z > outer_z);

    doc.press_key(KeyCode::Escape);
    assert!(!inner.is_open());
    assert!(outer.is_open());

    doc.press_key(KeyCode::Escape);
    assert!(!outer.is_open());
}

#[test]
fn nested_close_keeps_scroll_locked() {
    let page = Page::blank();
    mount(&page, "outer", 1);
    mount(&page, "inner", 1);
    let outer = ModalController::new(&page, "outer", ModalOptions::default()).unwrap();
    let inner = ModalController::new(&page, "inner", ModalOptions::default()).unwrap();

    outer.open();
    inner.open();
    inner.close();
    settle(&page);
    assert!(page.scroll_lock().is_locked());

    outer.close();
    settle(&page);
    assert!(!page.scroll_lock().is_locked());
}

// =============================================================================
// Scroll lock under rapid toggling
// =============================================================================

#[test]
fn close_open_close_never_strands_the_lock() {
    let page = Page::blank();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    let scheduler = page.scheduler();

    modal.open();
    modal.close();
    scheduler.advance(Duration::from_millis(100));
    modal.open();
    // The first close's timer fires while the dialog is open again.
    scheduler.advance(Duration::from_millis(250));
    assert!(page.scroll_lock().is_locked());

    modal.close();
    settle(&page);
    assert!(!page.scroll_lock().is_locked());
}

proptest! {
    #[test]
    fn lock_tracks_open_state(steps in proptest::collection::vec((any::<bool>(), 0u64..400), 1..40)) {
        let page = Page::blank();
        mount(&page, "dlg", 1);
        let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();

        for (toggle, wait) in steps {
            if toggle {
                modal.toggle();
            }
            page.scheduler().advance(Duration::from_millis(wait));
            if modal.is_open() {
                prop_assert!(page.scroll_lock().is_locked());
            }
        }
        modal.close();
        settle(&page);
        prop_assert!(!page.scroll_lock().is_locked());
    }
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn destroy_reverts_everything_and_is_idempotent() {
    let page = Page::blank();
    let doc = page.document();
    let surface = mount(&page, "dlg", 1);
    let classes = doc.classes(surface);
    let attributes = doc.attribute_count(surface);
    let listeners = doc.listener_count();

    let modal = ModalController::new(
        &page,
        "dlg",
        ModalOptions::new().size(mantle_widgets::modal::ModalSize::Xl),
    )
    .unwrap();
    let backdrop = modal.backdrop().unwrap();
    modal.open();
    modal.destroy();

    assert!(!doc.is_connected(backdrop));
    assert_eq!(doc.classes(surface), classes);
    assert_eq!(doc.attribute_count(surface), attributes);
    assert_eq!(doc.listener_count(), listeners);
    assert!(page.overlays().is_empty());
    assert!(!page.scroll_lock().is_locked());

    modal.destroy();
    assert!(modal.is_destroyed());
}

#[test]
fn destroy_from_close_hook_restores_surface_once() {
    let page = Page::blank();
    let doc = page.document();
    let surface = mount(&page, "dlg", 1);
    let classes = doc.classes(surface);
    let attributes = doc.attribute_count(surface);
    assert!(doc.is_displayed(surface));

    let modal = ModalController::with_hooks(
        &page,
        "dlg",
        ModalOptions::default(),
        ModalHooks::new().on_close(|m| m.destroy()),
    )
    .unwrap();
    modal.open();
    modal.destroy();

    assert!(modal.is_destroyed());
    assert!(doc.is_displayed(surface));
    assert_eq!(doc.classes(surface), classes);
    assert_eq!(doc.attribute_count(surface), attributes);
    assert!(!page.scroll_lock().is_locked());
}

#[test]
fn registry_destroy_from_close_hook_restores_surface_once() {
    let page = Page::blank();
    let doc = page.document();
    let surface = mount(&page, "dlg", 1);
    let classes = doc.classes(surface);

    let registry = ModalRegistry::new(page.clone());
    let reentrant = registry.clone();
    let modal = registry
        .create_with_hooks(
            "dlg",
            "dlg",
            ModalOptions::default(),
            ModalHooks::new().on_close(move |_| reentrant.destroy("dlg")),
        )
        .unwrap();
    modal.open();
    modal.destroy();

    assert!(modal.is_destroyed());
    assert!(!registry.contains("dlg"));
    assert!(doc.is_displayed(surface));
    assert_eq!(doc.classes(surface), classes);
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn destroy_while_closing_releases_lock_immediately() {
    let page = Page::blank();
    mount(&page, "dlg", 1);
    let modal = ModalController::new(&page, "dlg", ModalOptions::default()).unwrap();
    modal.open();
    modal.close();
    assert!(page.scroll_lock().is_locked());

    modal.destroy();
    assert!(!page.scroll_lock().is_locked());
}
