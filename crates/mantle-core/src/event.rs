#![forbid(unsafe_code)]

//! Input and notification events.
//!
//! Events are dispatched at a target node and bubble towards the document
//! root. Handlers observe the event through an [`EventContext`], which also
//! carries the two DOM-style controls: `prevent_default` and
//! `stop_propagation`.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::dom::NodeId;

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

/// Key identity, reduced to what components care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    Backspace,
    Char(char),
    /// Any named key without dedicated handling.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` name to a key code.
    ///
    /// Legacy `Esc` is accepted alongside `Escape`.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            "Backspace" => Self::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// A named notification with an optional payload.
#[derive(Clone)]
pub struct CustomEvent {
    pub name: String,
    pub detail: Option<Rc<dyn Any>>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail<T: Any>(mut self, detail: T) -> Self {
        self.detail = Some(Rc::new(detail));
        self
    }

    /// Borrow the payload as `T`, if present and of that type.
    pub fn detail<T: Any>(&self) -> Option<&T> {
        self.detail.as_deref().and_then(|d| d.downcast_ref::<T>())
    }
}

impl fmt::Debug for CustomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomEvent")
            .field("name", &self.name)
            .field("has_detail", &self.detail.is_some())
            .finish()
    }
}

/// An event delivered through [`Document::dispatch`](crate::dom::Document::dispatch).
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Click,
    Custom(CustomEvent),
}

impl Event {
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}

/// What a listener subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    Click,
    Custom(String),
}

impl EventType {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Whether a listener of this type receives `event`.
    pub fn matches(&self, event: &Event) -> bool {
        match (self, event) {
            (Self::KeyDown, Event::Key(_)) => true,
            (Self::Click, Event::Click) => true,
            (Self::Custom(name), Event::Custom(custom)) => *name == custom.name,
            _ => false,
        }
    }
}

/// Listener callback.
pub type Handler = Rc<dyn Fn(&EventContext<'_>)>;

/// Per-dispatch view handed to every listener.
pub struct EventContext<'a> {
    event: &'a Event,
    target: NodeId,
    current_target: Cell<NodeId>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(event: &'a Event, target: NodeId) -> Self {
        Self {
            event,
            target,
            current_target: Cell::new(target),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    #[inline]
    pub fn event(&self) -> &Event {
        self.event
    }

    /// The node the event was dispatched at.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running.
    #[inline]
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    /// Suppress the host's default handling of this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Stop bubbling once the listeners on the current node have run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Result of a dispatch, for the host to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// Number of listeners that ran.
    pub handled: usize,
}
