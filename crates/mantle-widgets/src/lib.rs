#![forbid(unsafe_code)]

//! Components for Mantle.
//!
//! Currently this is the modal family: a lifecycle controller for a dialog
//! surface, a keyed registry, and alert/confirm presets.

pub mod error;
pub mod modal;

pub use error::{ModalError, Result};
pub use modal::{ModalController, ModalOptions, ModalRegistry};
