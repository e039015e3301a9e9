#![forbid(unsafe_code)]

//! Background scroll suppression shared by every overlay on a page.
//!
//! The page scroll lock is a process-wide resource. Each overlay that wants
//! the page frozen holds a [`ScrollLockGuard`]; the page is locked while at
//! least one guard is alive and restored when the last one is dropped.
//!
//! # Invariants
//!
//! - `holders()` equals the number of live guards.
//! - Body styling is applied on the 0 → 1 transition only and reverted on
//!   1 → 0 only, so nested or overlapping overlays never unlock early.
//! - Inline values present before locking are restored verbatim.
//!
//! # Styling applied while locked
//!
//! | Node | Change |
//! |------|--------|
//! | `<html>` | `--scrollbar-width: <n>px` |
//! | `<body>` | `overflow: hidden`, `padding-right: var(--scrollbar-width)`, class `scroll-locked` |

use std::cell::RefCell;
use std::rc::Rc;

use mantle_core::Document;

/// Custom property carrying the measured scrollbar width.
pub const SCROLLBAR_WIDTH_PROPERTY: &str = "--scrollbar-width";
/// Class added to `<body>` while locked.
pub const SCROLL_LOCKED_CLASS: &str = "scroll-locked";

#[derive(Debug, Default)]
struct LockState {
    holders: usize,
    saved_overflow: Option<String>,
    saved_padding: Option<String>,
}

/// Reference-counted scroll lock for one document.
#[derive(Clone, Debug)]
pub struct ScrollLock {
    document: Document,
    state: Rc<RefCell<LockState>>,
}

impl ScrollLock {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            state: Rc::new(RefCell::new(LockState::default())),
        }
    }

    /// Take a hold on the lock, locking the page if this is the first holder.
    #[must_use = "the page unlocks as soon as the guard is dropped"]
    pub fn acquire(&self) -> ScrollLockGuard {
        let first = {
            let mut state = self.state.borrow_mut();
            state.holders += 1;
            state.holders == 1
        };
        if first {
            self.lock_page();
        }
        tracing::trace!(holders = self.holders(), "scroll lock acquired");
        ScrollLockGuard {
            lock: self.clone(),
        }
    }

    pub fn holders(&self) -> usize {
        self.state.borrow().holders
    }

    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    fn release(&self) {
        let last = {
            let mut state = self.state.borrow_mut();
            if state.holders == 0 {
                tracing::warn!("scroll lock released with no holders");
                return;
            }
            state.holders -= 1;
            state.holders == 0
        };
        if last {
            self.unlock_page();
        }
        tracing::trace!(holders = self.holders(), "scroll lock released");
    }

    fn lock_page(&self) {
        let doc = &self.document;
        let body = doc.body();
        {
            let mut state = self.state.borrow_mut();
            state.saved_overflow = doc.style(body, "overflow");
            state.saved_padding = doc.style(body, "padding-right");
        }
        let width = doc.metrics().scrollbar_width();
        doc.set_style(doc.root(), SCROLLBAR_WIDTH_PROPERTY, &format!("{width}px"));
        doc.set_style(body, "overflow", "hidden");
        doc.set_style(body, "padding-right", "var(--scrollbar-width)");
        doc.add_class(body, SCROLL_LOCKED_CLASS);
        tracing::debug!(scrollbar_width = width, "page scroll locked");
    }

    fn unlock_page(&self) {
        let doc = &self.document;
        let body = doc.body();
        let (overflow, padding) = {
            let mut state = self.state.borrow_mut();
            (state.saved_overflow.take(), state.saved_padding.take())
        };
        restore_style(doc, body, "overflow", overflow);
        restore_style(doc, body, "padding-right", padding);
        doc.remove_style(doc.root(), SCROLLBAR_WIDTH_PROPERTY);
        doc.remove_class(body, SCROLL_LOCKED_CLASS);
        tracing::debug!("page scroll unlocked");
    }
}

fn restore_style(doc: &Document, node: mantle_core::NodeId, property: &str, value: Option<String>) {
    match value {
        Some(value) => doc.set_style(node, property, &value),
        None => doc.remove_style(node, property),
    }
}

/// A hold on the page scroll lock. Dropping it releases the hold.
#[derive(Debug)]
pub struct ScrollLockGuard {
    lock: ScrollLock,
}

impl ScrollLockGuard {
    /// The lock this guard holds.
    pub fn lock(&self) -> &ScrollLock {
        &self.lock
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}
