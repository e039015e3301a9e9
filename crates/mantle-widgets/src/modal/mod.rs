#![forbid(unsafe_code)]

//! Modal dialogs: lifecycle controller, registry, and dialog presets.
//!
//! # Lifecycle
//!
//! A [`ModalController`] binds one dialog surface already present in the
//! document (or built from a [`DialogTemplate`]). Opening it:
//!
//! - records the element that had focus,
//! - takes a hold on the page [`ScrollLock`](mantle_runtime::ScrollLock),
//! - shows the backdrop and surface and raises them on the overlay stack,
//! - after layout settles, focuses the first focusable descendant.
//!
//! Closing reverses this. The scroll hold is released after
//! [`CLOSE_ANIMATION`] so the scrollbar does not reappear mid-transition.
//!
//! # Surface Markup
//!
//! ```text
//! <div class="modal" id="settings">           surface
//!   <div class="modal-dialog">                inner box; clicks stop here
//!     <div class="modal-content">
//!       <div class="modal-header"><h2 class="modal-title">..</h2></div>
//!       <div class="modal-body">..</div>
//!       <div class="modal-footer">
//!         <button data-modal-cancel>Cancel</button>
//!         <button data-modal-confirm>Save</button>
//! ```
//!
//! Elements carrying `data-modal-close`, `data-modal-confirm` or
//! `data-modal-cancel` anywhere inside the surface act as triggers.
//!
//! # Example
//!
//! ```ignore
//! use mantle_widgets::modal::{ModalOptions, ModalRegistry, ModalSize};
//!
//! let registry = ModalRegistry::global();
//! registry.create("settings", "settings", ModalOptions::new().size(ModalSize::Lg))?;
//! registry.open("settings");
//!
//! let answer = registry.confirm("Discard changes?", "Discard", "Keep");
//! ```

mod controller;
mod focus;
mod hooks;
mod options;
mod registry;
mod response;
mod template;

use std::time::Duration;

pub use controller::{Content, ModalController, ModalRegion, SurfaceRef};
pub use focus::{focusable_elements, is_focusable, trap_step};
pub use hooks::{ModalHook, ModalHooks};
pub use options::{Backdrop, ModalAnimation, ModalOptions, ModalSize, ModalVariant};
pub use registry::ModalRegistry;
pub use response::DialogResponse;
pub use template::{AlertKind, DialogTemplate, TemplateButton, Trigger};

/// How long the close transition runs before scroll is released.
pub const CLOSE_ANIMATION: Duration = Duration::from_millis(300);

/// Event dispatched from the surface after a successful open.
pub const OPENED_EVENT: &str = "modal-opened";

/// Event dispatched from the surface after a successful close.
pub const CLOSED_EVENT: &str = "modal-closed";

/// Class names of the surface markup.
pub mod classes {
    pub const MODAL: &str = "modal";
    pub const DIALOG: &str = "modal-dialog";
    pub const CONTENT: &str = "modal-content";
    pub const HEADER: &str = "modal-header";
    pub const TITLE: &str = "modal-title";
    pub const BODY: &str = "modal-body";
    pub const FOOTER: &str = "modal-footer";
    pub const OPEN: &str = "is-open";
    pub const BACKDROP: &str = "modal-backdrop";
    pub const BACKDROP_STATIC: &str = "modal-backdrop--static";
}
