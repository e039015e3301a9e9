#![forbid(unsafe_code)]

//! Document model and input events for Mantle.
//!
//! Components never touch a browser directly. They operate on a [`Document`],
//! a small retained element tree with classes, attributes, inline styles,
//! display state, a single focused element, and bubbling event dispatch.
//! A host binding mirrors real input into [`Document::dispatch`]; tests drive
//! it directly.

pub mod dom;
pub mod event;

pub use dom::{Document, ListenerId, NodeBuilder, NodeId, PageMetrics};
pub use event::{
    CustomEvent, DispatchOutcome, Event, EventContext, EventType, Handler, KeyCode, KeyEvent,
    Modifiers,
};
