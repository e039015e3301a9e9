#![forbid(unsafe_code)]

//! Dialog presets built from typed markup.
//!
//! A [`DialogTemplate`] produces the surface markup a [`ModalController`]
//! expects. Buttons carry their [`Trigger`] role as data, so the triggers a
//! preset relies on are always present in what it builds.
//!
//! ```ignore
//! let surface = DialogTemplate::confirm("Delete file?", "Delete", "Keep").build(&doc);
//! doc.append_child(doc.body(), surface);
//! ```
//!
//! [`ModalController`]: super::ModalController

use mantle_core::{Document, NodeBuilder, NodeId};

use super::classes;
use super::controller::Content;

/// What activating a button does to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Close the dialog.
    Close,
    /// Run `on_confirm`, then close.
    Confirm,
    /// Run `on_cancel`, then close.
    Cancel,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Close, Trigger::Confirm, Trigger::Cancel];

    /// Marker attribute that carries this role in markup.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Close => "data-modal-close",
            Self::Confirm => "data-modal-confirm",
            Self::Cancel => "data-modal-cancel",
        }
    }

    /// The role of `node`, if it is marked as a trigger.
    pub fn of(doc: &Document, node: NodeId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|trigger| doc.has_attribute(node, trigger.attribute()))
    }
}

/// A footer button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateButton {
    pub label: String,
    pub trigger: Trigger,
    pub primary: bool,
}

impl TemplateButton {
    pub fn new(label: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            label: label.into(),
            trigger,
            primary: false,
        }
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    fn to_builder(&self) -> NodeBuilder {
        let class = if self.primary {
            "btn--primary"
        } else {
            "btn--secondary"
        };
        NodeBuilder::new("button")
            .class("btn")
            .class(class)
            .attr("type", "button")
            .attr(self.trigger.attribute(), "")
            .text(self.label.clone())
    }
}

/// Alert flavour, used for the default title and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlertKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl AlertKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Info => "Information",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    pub fn class_name(self) -> String {
        format!("modal-alert--{}", self.as_str())
    }
}

/// Builder for a complete dialog surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogTemplate {
    title: Option<String>,
    body: Option<Content>,
    buttons: Vec<TemplateButton>,
    close_button: bool,
    classes: Vec<String>,
}

impl Default for DialogTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogTemplate {
    pub fn new() -> Self {
        Self {
            title: None,
            body: None,
            buttons: Vec::new(),
            close_button: true,
            classes: Vec::new(),
        }
    }

    /// Alert preset: message with a single OK button.
    pub fn alert(message: impl Into<String>, kind: AlertKind) -> Self {
        Self::new()
            .title(kind.title())
            .body(Content::Text(message.into()))
            .class("modal-alert")
            .class(kind.class_name())
            .primary_button("OK", Trigger::Close)
    }

    /// Confirm preset: message with cancel and confirm buttons.
    pub fn confirm(
        message: impl Into<String>,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> Self {
        Self::new()
            .title("Confirm")
            .body(Content::Text(message.into()))
            .class("modal-confirm")
            .button(cancel_label, Trigger::Cancel)
            .primary_button(confirm_label, Trigger::Confirm)
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, content: Content) -> Self {
        self.body = Some(content);
        self
    }

    #[must_use]
    pub fn button(mut self, label: impl Into<String>, trigger: Trigger) -> Self {
        self.buttons.push(TemplateButton::new(label, trigger));
        self
    }

    #[must_use]
    pub fn primary_button(mut self, label: impl Into<String>, trigger: Trigger) -> Self {
        self.buttons.push(TemplateButton::new(label, trigger).primary());
        self
    }

    /// Whether the header carries a `×` close button. On by default.
    #[must_use]
    pub fn close_button(mut self, show: bool) -> Self {
        self.close_button = show;
        self
    }

    /// Extra class on the surface.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn buttons(&self) -> &[TemplateButton] {
        &self.buttons
    }

    /// The surface markup. A template without buttons gets a primary OK
    /// close button.
    pub fn to_builder(&self) -> NodeBuilder {
        let default_button;
        let buttons: &[TemplateButton] = if self.buttons.is_empty() {
            default_button = [TemplateButton::new("OK", Trigger::Close).primary()];
            &default_button
        } else {
            &self.buttons
        };

        let mut header = NodeBuilder::new("div").class(classes::HEADER).child(
            NodeBuilder::new("h2")
                .class(classes::TITLE)
                .text(self.title.clone().unwrap_or_default()),
        );
        if self.close_button {
            header = header.child(
                NodeBuilder::new("button")
                    .class("modal-close")
                    .attr("type", "button")
                    .attr("aria-label", "Close")
                    .attr(Trigger::Close.attribute(), "")
                    .text("\u{00d7}"),
            );
        }

        let mut body = NodeBuilder::new("div").class(classes::BODY);
        if let Some(content) = &self.body {
            body = content.apply_to(body);
        }

        let footer = NodeBuilder::new("div")
            .class(classes::FOOTER)
            .children(buttons.iter().map(TemplateButton::to_builder));

        let mut surface = NodeBuilder::new("div").class(classes::MODAL);
        for class in &self.classes {
            surface = surface.class(class.clone());
        }
        surface.child(
            NodeBuilder::new("div").class(classes::DIALOG).child(
                NodeBuilder::new("div")
                    .class(classes::CONTENT)
                    .child(header)
                    .child(body)
                    .child(footer),
            ),
        )
    }

    /// Build the surface in `doc`. The returned node is detached.
    pub fn build(&self, doc: &Document) -> NodeId {
        self.to_builder().build(doc)
    }
}
