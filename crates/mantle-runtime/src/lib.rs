#![forbid(unsafe_code)]

//! Shared page services for Mantle components.
//!
//! Components on the same page coordinate through a [`Page`]:
//!
//! - [`Scheduler`]: one-shot deferred tasks (post-layout focus, animation
//!   windows) on a clock the host advances.
//! - [`ScrollLock`]: reference-counted background scroll suppression.
//! - [`OverlayStack`]: z-ordering of open overlays; only the top one takes
//!   keyboard input.

pub mod overlay;
pub mod page;
pub mod scroll_lock;
pub mod timer;

pub use overlay::{OverlayId, OverlayStack};
pub use page::Page;
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use timer::{Scheduler, TimerId};
