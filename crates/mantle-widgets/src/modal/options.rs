#![forbid(unsafe_code)]

//! Modal configuration.
//!
//! [`ModalOptions`] is an immutable snapshot taken when a controller is
//! built. It can be assembled with the builder methods, read from `data-*`
//! attributes on the surface ([`ModalOptions::from_attributes`]), or, with
//! the `serde` feature, deserialised from JSON using camelCase field names
//! and kebab-case values:
//!
//! ```json
//! { "size": "lg", "variant": "drawer-left", "backdrop": "static", "keyboard": false }
//! ```

use std::fmt;
use std::str::FromStr;

use mantle_core::{Document, NodeId};

use crate::error::ModalError;

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $option:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $text => Ok($name::$variant), )+
                    other => Err(ModalError::InvalidOption {
                        option: $option,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

option_enum! {
    /// Dialog width class.
    ModalSize, "size" {
        Sm => "sm",
        #[default]
        Default => "default",
        Lg => "lg",
        Xl => "xl",
        Full => "full",
    }
}

option_enum! {
    /// Layout variant.
    ModalVariant, "variant" {
        #[default]
        Default => "default",
        Alert => "alert",
        Image => "image",
        DrawerLeft => "drawer-left",
        DrawerRight => "drawer-right",
        BottomSheet => "bottom-sheet",
    }
}

option_enum! {
    /// Entrance animation.
    ModalAnimation, "animation" {
        #[default]
        FadeIn => "fade-in",
        SlideDown => "slide-down",
        ZoomIn => "zoom-in",
    }
}

impl ModalSize {
    /// Modifier class on the surface; `None` for the default size.
    pub fn class_name(self) -> Option<String> {
        (self != Self::Default).then(|| format!("modal--{}", self.as_str()))
    }
}

impl ModalVariant {
    /// Modifier class on the surface; `None` for the default variant.
    pub fn class_name(self) -> Option<String> {
        (self != Self::Default).then(|| format!("modal--{}", self.as_str()))
    }
}

impl ModalAnimation {
    /// Modifier class on the surface; `None` for the default animation.
    pub fn class_name(self) -> Option<String> {
        (self != Self::FadeIn).then(|| format!("modal--{}", self.as_str()))
    }
}

/// Backdrop policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BackdropRepr", into = "BackdropRepr")
)]
pub enum Backdrop {
    /// No backdrop element.
    None,
    /// Backdrop present; clicking it may close the dialog.
    #[default]
    Dismissible,
    /// Backdrop present for dimming only; clicks never close.
    Static,
}

impl Backdrop {
    #[inline]
    pub fn is_present(self) -> bool {
        self != Self::None
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "false",
            Self::Dismissible => "true",
            Self::Static => "static",
        }
    }
}

impl From<bool> for Backdrop {
    fn from(present: bool) -> Self {
        if present {
            Self::Dismissible
        } else {
            Self::None
        }
    }
}

impl FromStr for Backdrop {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "true" | "" => Ok(Self::Dismissible),
            "false" => Ok(Self::None),
            "static" => Ok(Self::Static),
            other => Err(ModalError::InvalidOption {
                option: "backdrop",
                value: other.to_owned(),
            }),
        }
    }
}

/// Wire form of [`Backdrop`]: `true`, `false`, or `"static"`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum BackdropRepr {
    Flag(bool),
    Mode(String),
}

#[cfg(feature = "serde")]
impl TryFrom<BackdropRepr> for Backdrop {
    type Error = ModalError;

    fn try_from(repr: BackdropRepr) -> Result<Self, Self::Error> {
        match repr {
            BackdropRepr::Flag(flag) => Ok(flag.into()),
            BackdropRepr::Mode(mode) => mode.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Backdrop> for BackdropRepr {
    fn from(backdrop: Backdrop) -> Self {
        match backdrop {
            Backdrop::None => Self::Flag(false),
            Backdrop::Dismissible => Self::Flag(true),
            Backdrop::Static => Self::Mode("static".to_owned()),
        }
    }
}

/// Modal configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ModalOptions {
    pub size: ModalSize,
    pub variant: ModalVariant,
    pub animation: ModalAnimation,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
    /// Master switch for key handling.
    pub keyboard: bool,
    /// Whether to move focus into the dialog and restore it afterwards.
    pub focus: bool,
    pub backdrop: Backdrop,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            size: ModalSize::Default,
            variant: ModalVariant::Default,
            animation: ModalAnimation::FadeIn,
            close_on_backdrop: true,
            close_on_escape: true,
            keyboard: true,
            focus: true,
            backdrop: Backdrop::Dismissible,
        }
    }
}

impl ModalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: ModalVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn animation(mut self, animation: ModalAnimation) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn keyboard(mut self, enabled: bool) -> Self {
        self.keyboard = enabled;
        self
    }

    #[must_use]
    pub fn focus(mut self, manage: bool) -> Self {
        self.focus = manage;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: impl Into<Backdrop>) -> Self {
        self.backdrop = backdrop.into();
        self
    }

    /// Whether a click on the backdrop should close the dialog.
    pub fn backdrop_dismisses(&self) -> bool {
        self.close_on_backdrop && self.backdrop != Backdrop::Static
    }

    /// Read options from `data-*` attributes on `node`.
    ///
    /// Recognised: `data-size`, `data-variant`, `data-animation`,
    /// `data-backdrop`, `data-keyboard`, `data-focus`,
    /// `data-close-on-escape`, `data-close-on-backdrop`. Missing attributes
    /// keep their defaults; invalid values are logged and ignored.
    pub fn from_attributes(doc: &Document, node: NodeId) -> Self {
        let mut options = Self::default();
        let read = |name: &str| doc.attribute(node, name);

        apply(&mut options.size, read("data-size"));
        apply(&mut options.variant, read("data-variant"));
        apply(&mut options.animation, read("data-animation"));
        apply(&mut options.backdrop, read("data-backdrop"));
        apply_flag(&mut options.keyboard, "keyboard", read("data-keyboard"));
        apply_flag(&mut options.focus, "focus", read("data-focus"));
        apply_flag(
            &mut options.close_on_escape,
            "close-on-escape",
            read("data-close-on-escape"),
        );
        apply_flag(
            &mut options.close_on_backdrop,
            "close-on-backdrop",
            read("data-close-on-backdrop"),
        );
        options
    }
}

fn apply<T: FromStr<Err = ModalError>>(slot: &mut T, raw: Option<String>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.parse() {
        Ok(value) => *slot = value,
        Err(err) => tracing::warn!(%err, "ignoring modal option attribute"),
    }
}

fn apply_flag(slot: &mut bool, option: &'static str, raw: Option<String>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.trim() {
        // A bare attribute (`data-keyboard`) reads as enabled.
        "true" | "" => *slot = true,
        "false" => *slot = false,
        other => tracing::warn!(option, value = other, "ignoring modal option attribute"),
    }
}
