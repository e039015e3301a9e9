#![forbid(unsafe_code)]

//! Lifecycle callbacks.

use std::fmt;
use std::rc::Rc;

use super::controller::ModalController;
use super::{CLOSED_EVENT, OPENED_EVENT};

/// A lifecycle callback. Receives a handle to the controller that fired it.
pub type ModalHook = Rc<dyn Fn(&ModalController)>;

/// Optional handler slots, fixed at construction.
#[derive(Clone, Default)]
pub struct ModalHooks {
    on_open: Option<ModalHook>,
    on_close: Option<ModalHook>,
    on_confirm: Option<ModalHook>,
    on_cancel: Option<ModalHook>,
}

impl fmt::Debug for ModalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_confirm", &self.on_confirm.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

impl ModalHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every successful open, after `modal-opened` is dispatched.
    #[must_use]
    pub fn on_open(mut self, hook: impl Fn(&ModalController) + 'static) -> Self {
        self.on_open = Some(Rc::new(hook));
        self
    }

    /// Called after every successful close, after `modal-closed` is dispatched.
    #[must_use]
    pub fn on_close(mut self, hook: impl Fn(&ModalController) + 'static) -> Self {
        self.on_close = Some(Rc::new(hook));
        self
    }

    /// Called when a confirm trigger is activated, before the dialog closes.
    #[must_use]
    pub fn on_confirm(mut self, hook: impl Fn(&ModalController) + 'static) -> Self {
        self.on_confirm = Some(Rc::new(hook));
        self
    }

    /// Called when a cancel trigger is activated, before the dialog closes.
    #[must_use]
    pub fn on_cancel(mut self, hook: impl Fn(&ModalController) + 'static) -> Self {
        self.on_cancel = Some(Rc::new(hook));
        self
    }

    /// Run `extra` after any existing `on_close` hook.
    pub(crate) fn chain_close(mut self, extra: impl Fn(&ModalController) + 'static) -> Self {
        let first = self.on_close.take();
        self.on_close = Some(Rc::new(move |modal| {
            if let Some(first) = &first {
                first(modal);
            }
            extra(modal);
        }));
        self
    }

    pub(crate) fn get(&self, lifecycle: Lifecycle) -> Option<ModalHook> {
        match lifecycle {
            Lifecycle::Opened => self.on_open.clone(),
            Lifecycle::Closed => self.on_close.clone(),
            Lifecycle::Confirmed => self.on_confirm.clone(),
            Lifecycle::Cancelled => self.on_cancel.clone(),
        }
    }
}

/// Points in the lifecycle where notifications fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Opened,
    Closed,
    Confirmed,
    Cancelled,
}

impl Lifecycle {
    /// Name of the DOM event dispatched for this transition, if any.
    pub(crate) fn event_name(self) -> Option<&'static str> {
        match self {
            Self::Opened => Some(OPENED_EVENT),
            Self::Closed => Some(CLOSED_EVENT),
            Self::Confirmed | Self::Cancelled => None,
        }
    }
}
