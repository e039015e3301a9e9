#![forbid(unsafe_code)]

//! Keyed lookup of modal controllers, plus transient alert/confirm dialogs.
//!
//! Lookups by an unknown id are lenient: `open`, `close`, `toggle` and
//! `destroy` log and return instead of failing, so fire-and-forget call
//! sites need no error handling.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use mantle_runtime::Page;

use super::CLOSE_ANIMATION;
use super::controller::{ModalController, SurfaceRef};
use super::hooks::ModalHooks;
use super::options::{ModalOptions, ModalSize, ModalVariant};
use super::response::{self, DialogResponse};
use super::template::{AlertKind, DialogTemplate};
use crate::error::Result;

thread_local! {
    static GLOBAL: ModalRegistry = ModalRegistry::new(Page::current());
}

struct RegistryInner {
    page: Page,
    entries: RefCell<AHashMap<String, ModalController>>,
    transient: RefCell<Vec<ModalController>>,
}

/// Registry of modal controllers on one page.
///
/// Cloning is cheap; clones share entries. The registry never holds a
/// borrow of its own state while calling into a controller, so hooks may
/// use the registry freely.
#[derive(Clone)]
pub struct ModalRegistry {
    inner: Rc<RegistryInner>,
}

impl fmt::Debug for ModalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalRegistry")
            .field("entries", &self.ids())
            .field("transient", &self.inner.transient.borrow().len())
            .finish()
    }
}

impl ModalRegistry {
    pub fn new(page: Page) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                page,
                entries: RefCell::new(AHashMap::new()),
                transient: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The registry of the current thread, over [`Page::current`].
    pub fn global() -> Self {
        GLOBAL.with(Self::clone)
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }

    /// Bind a controller to `target` and register it under `id`.
    ///
    /// # Errors
    ///
    /// [`ModalError::NotFound`](crate::ModalError::NotFound) if the surface
    /// cannot be resolved. Nothing is registered in that case.
    pub fn create(
        &self,
        id: impl Into<String>,
        target: impl Into<SurfaceRef>,
        options: ModalOptions,
    ) -> Result<ModalController> {
        self.create_with_hooks(id, target, options, ModalHooks::default())
    }

    pub fn create_with_hooks(
        &self,
        id: impl Into<String>,
        target: impl Into<SurfaceRef>,
        options: ModalOptions,
        hooks: ModalHooks,
    ) -> Result<ModalController> {
        let controller = ModalController::with_hooks(&self.inner.page, target, options, hooks)?;
        drop(self.register(id, controller.clone()));
        Ok(controller)
    }

    /// Register `controller` under `id`, returning whatever it replaced.
    ///
    /// A replaced controller is not destroyed; it tears itself down once its
    /// last handle is dropped.
    pub fn register(&self, id: impl Into<String>, controller: ModalController) -> Option<ModalController> {
        let id = id.into();
        let previous = self.inner.entries.borrow_mut().insert(id.clone(), controller);
        if previous.is_some() {
            tracing::debug!(id = %id, "modal registration replaced");
        } else {
            tracing::debug!(id = %id, "modal registered");
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<ModalController> {
        self.inner.entries.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.entries.borrow().contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.inner.entries.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn open(&self, id: &str) {
        if let Some(modal) = self.lookup(id, "open") {
            modal.open();
        }
    }

    pub fn close(&self, id: &str) {
        if let Some(modal) = self.lookup(id, "close") {
            modal.close();
        }
    }

    pub fn toggle(&self, id: &str) {
        if let Some(modal) = self.lookup(id, "toggle") {
            modal.toggle();
        }
    }

    /// Close every registered and transient dialog.
    pub fn close_all(&self) {
        for modal in self.all_controllers() {
            modal.close();
        }
    }

    /// Destroy the controller under `id` and remove it.
    pub fn destroy(&self, id: &str) {
        let removed = self.inner.entries.borrow_mut().remove(id);
        match removed {
            Some(modal) => {
                modal.destroy();
                tracing::debug!(id, "modal unregistered");
            }
            None => tracing::debug!(id, op = "destroy", "unknown modal id"),
        }
    }

    /// Destroy and remove every registered and transient dialog.
    pub fn destroy_all(&self) {
        let mut drained: Vec<ModalController> =
            self.inner.entries.borrow_mut().drain().map(|(_, m)| m).collect();
        drained.append(&mut self.inner.transient.borrow_mut());
        tracing::debug!(count = drained.len(), "destroying all modals");
        for modal in drained {
            modal.destroy();
        }
    }

    /// Show a one-button alert. Resolves once it is dismissed by any means.
    pub fn alert(&self, message: impl Into<String>, kind: AlertKind) -> DialogResponse<()> {
        let (responder, response) = response::channel(());
        let hooks = ModalHooks::new().on_close(move |_| {
            responder.resolve(());
        });
        let template = DialogTemplate::alert(message, kind);
        let options = ModalOptions::new()
            .size(ModalSize::Sm)
            .variant(ModalVariant::Alert);
        self.open_transient(&template, options, hooks);
        response
    }

    /// Ask a yes/no question.
    ///
    /// Resolves `true` only through the confirm button. Cancel and every
    /// other dismissal (Escape, backdrop, close button) resolve `false`.
    pub fn confirm(
        &self,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> DialogResponse<bool> {
        let (responder, response) = response::channel(false);
        let on_confirm = responder.clone();
        let on_cancel = responder.clone();
        let hooks = ModalHooks::new()
            .on_confirm(move |_| {
                on_confirm.resolve(true);
            })
            .on_cancel(move |_| {
                on_cancel.resolve(false);
            })
            .on_close(move |_| {
                // No-op if already answered.
                responder.resolve(false);
            });
        let template = DialogTemplate::confirm(message, confirm_label, cancel_label);
        self.open_transient(&template, ModalOptions::new().size(ModalSize::Sm), hooks);
        response
    }

    /// Dialogs opened by `alert`/`confirm` that have not been torn down yet.
    pub fn transient_count(&self) -> usize {
        self.inner.transient.borrow().len()
    }

    fn lookup(&self, id: &str, op: &'static str) -> Option<ModalController> {
        let modal = self.get(id);
        if modal.is_none() {
            tracing::debug!(id, op, "unknown modal id");
        }
        modal
    }

    fn all_controllers(&self) -> Vec<ModalController> {
        let mut all: Vec<_> = self.inner.entries.borrow().values().cloned().collect();
        all.extend(self.inner.transient.borrow().iter().cloned());
        all
    }

    /// Build, attach and open a throwaway dialog. It is destroyed and its
    /// surface removed [`CLOSE_ANIMATION`] after it closes.
    fn open_transient(&self, template: &DialogTemplate, options: ModalOptions, hooks: ModalHooks) {
        let page = &self.inner.page;
        let doc = page.document();
        let surface = template.build(doc);
        doc.append_child(doc.body(), surface);

        let registry: Weak<RegistryInner> = Rc::downgrade(&self.inner);
        let hooks = hooks.chain_close(move |modal| {
            let modal = modal.clone();
            let registry = registry.clone();
            let scheduler = modal.page().scheduler().clone();
            scheduler.schedule(CLOSE_ANIMATION, move || {
                modal.destroy();
                modal.page().document().remove(modal.surface());
                if let Some(inner) = registry.upgrade() {
                    inner.transient.borrow_mut().retain(|m| *m != modal);
                }
                tracing::trace!("transient dialog torn down");
            });
        });

        // The surface was just attached, so resolution cannot fail.
        match ModalController::with_hooks(page, surface, options, hooks) {
            Ok(modal) => {
                self.inner.transient.borrow_mut().push(modal.clone());
                modal.open();
            }
            Err(err) => {
                tracing::warn!(%err, "transient dialog could not be bound");
                doc.remove(surface);
            }
        }
    }
}
