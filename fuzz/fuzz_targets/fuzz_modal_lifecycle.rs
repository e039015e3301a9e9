#![no_main]

//! Drives two stacked modals through arbitrary input and checks that the
//! scroll lock and overlay stack stay consistent with their open state.

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mantle_core::{KeyCode, KeyEvent, Modifiers, NodeBuilder};
use mantle_runtime::Page;
use mantle_widgets::modal::{Backdrop, CLOSE_ANIMATION, ModalController, ModalOptions};

#[derive(Debug, Arbitrary)]
enum Op {
    Open(bool),
    Close(bool),
    Toggle(bool),
    Escape,
    Tab { shift: bool },
    ClickBackdrop(bool),
    ClickSurface(bool),
    ClickButton(u8),
    Advance(u16),
    Destroy(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    static_backdrop: bool,
    close_on_escape: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let page = Page::blank();
    let doc = page.document();
    let options = ModalOptions::new()
        .close_on_escape(input.close_on_escape)
        .backdrop(if input.static_backdrop {
            Backdrop::Static
        } else {
            Backdrop::Dismissible
        });

    let mut modals = Vec::new();
    for id in ["a", "b"] {
        let surface = NodeBuilder::new("div")
            .id(id)
            .child(
                NodeBuilder::new("div")
                    .class("modal-dialog")
                    .child(NodeBuilder::new("button").attr("data-modal-close", ""))
                    .child(NodeBuilder::new("button").attr("data-modal-confirm", ""))
                    .child(NodeBuilder::new("input")),
            )
            .build(doc);
        doc.append_child(doc.body(), surface);
        let Ok(modal) = ModalController::new(&page, id, options.clone()) else {
            return;
        };
        modals.push(modal);
    }
    let pick = |second: bool| &modals[usize::from(second)];

    for op in input.ops {
        match op {
            Op::Open(m) => pick(m).open(),
            Op::Close(m) => pick(m).close(),
            Op::Toggle(m) => pick(m).toggle(),
            Op::Escape => {
                doc.press_key(KeyCode::Escape);
            }
            Op::Tab { shift } => {
                let modifiers = if shift { Modifiers::SHIFT } else { Modifiers::empty() };
                doc.press_key(KeyEvent::new(KeyCode::Tab).with_modifiers(modifiers));
            }
            Op::ClickBackdrop(m) => {
                if let Some(backdrop) = pick(m).backdrop() {
                    doc.click(backdrop);
                }
            }
            Op::ClickSurface(m) => {
                doc.click(pick(m).surface());
            }
            Op::ClickButton(i) => {
                let buttons = doc.descendants(doc.body());
                if !buttons.is_empty() {
                    doc.click(buttons[usize::from(i) % buttons.len()]);
                }
            }
            Op::Advance(ms) => {
                page.scheduler().advance(Duration::from_millis(u64::from(ms)));
            }
            Op::Destroy(m) => pick(m).destroy(),
        }

        let open = modals.iter().filter(|m| m.is_open()).count();
        assert_eq!(page.overlays().depth(), open);
        if open > 0 {
            assert!(page.scroll_lock().is_locked());
        }
        if let Some(active) = doc.active_element() {
            assert!(doc.is_rendered(active));
        }
    }

    for modal in &modals {
        modal.close();
    }
    page.scheduler().advance(CLOSE_ANIMATION);
    assert!(!page.scroll_lock().is_locked());
    assert!(page.overlays().is_empty());
});
