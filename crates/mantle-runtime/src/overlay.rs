#![forbid(unsafe_code)]

//! Z-ordering for open overlays.
//!
//! The `OverlayStack` tracks every open overlay on a page in the order it was
//! raised. Each push is assigned a z-index above everything already open, and
//! only the topmost overlay is expected to react to keyboard input.
//!
//! # Invariants
//!
//! - Z-order is strictly increasing: later overlays are always on top.
//! - Removal by id works from any position; the remaining order is kept.
//! - A new overlay sits one step above the current top, so z-indices stay
//!   bounded by the stack depth and reset once the stack empties.
//!
//! # Failure Modes
//!
//! - `remove()` for an id not on the stack returns `None` (no panic).
//! - `top()` on an empty stack returns `None`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Base z-index for the overlay layer.
pub const BASE_OVERLAY_Z: u32 = 1000;

/// Z-index increment between overlays (leaves room for backdrop + surface).
pub const Z_INCREMENT: u32 = 10;

static OVERLAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an overlay entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    fn new() -> Self {
        Self(OVERLAY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Entry {
    id: OverlayId,
    z_index: u32,
}

#[derive(Debug, Default)]
struct StackState {
    entries: Vec<Entry>,
}

/// Shared handle to the overlay ordering of one page.
#[derive(Clone, Debug, Default)]
pub struct OverlayStack {
    state: Rc<RefCell<StackState>>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a new overlay. Returns its id and z-index.
    pub fn push(&self) -> (OverlayId, u32) {
        let mut state = self.state.borrow_mut();
        let id = OverlayId::new();
        let z_index = state
            .entries
            .last()
            .map_or(BASE_OVERLAY_Z, |top| top.z_index.saturating_add(Z_INCREMENT));
        state.entries.push(Entry { id, z_index });
        (id, z_index)
    }

    /// Remove an overlay from any position. Returns its z-index.
    pub fn remove(&self, id: OverlayId) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let idx = state.entries.iter().position(|e| e.id == id)?;
        Some(state.entries.remove(idx).z_index)
    }

    pub fn top(&self) -> Option<OverlayId> {
        self.state.borrow().entries.last().map(|e| e.id)
    }

    pub fn is_top(&self, id: OverlayId) -> bool {
        self.top() == Some(id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.state.borrow().entries.iter().any(|e| e.id == id)
    }

    pub fn z_index(&self, id: OverlayId) -> Option<u32> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.z_index)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.state.borrow().entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }
}
