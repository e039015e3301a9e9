#![forbid(unsafe_code)]

//! Per-document service bundle.

use mantle_core::Document;

use crate::overlay::OverlayStack;
use crate::scroll_lock::ScrollLock;
use crate::timer::Scheduler;

thread_local! {
    static CURRENT: Page = Page::blank();
}

/// A document plus the services every component on it shares.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone, Debug)]
pub struct Page {
    document: Document,
    scheduler: Scheduler,
    scroll_lock: ScrollLock,
    overlays: OverlayStack,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            scroll_lock: ScrollLock::new(document.clone()),
            document,
            scheduler: Scheduler::new(),
            overlays: OverlayStack::new(),
        }
    }

    /// A page over a fresh, empty document.
    pub fn blank() -> Self {
        Self::new(Document::new())
    }

    /// The default page of the current thread.
    pub fn current() -> Self {
        CURRENT.with(Page::clone)
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    #[inline]
    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }
}
