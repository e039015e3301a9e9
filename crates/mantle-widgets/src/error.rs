#![forbid(unsafe_code)]

//! Error types for Mantle widgets.

use thiserror::Error;

/// Errors raised by modal construction and content updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// The dialog surface could not be resolved in the document.
    #[error("modal surface not found: {0}")]
    NotFound(String),

    /// The surface has no element for the requested region.
    #[error("modal surface has no `.{class}` region")]
    RegionMissing { class: &'static str },

    /// An option value could not be parsed.
    #[error("invalid value {value:?} for modal option `{option}`")]
    InvalidOption { option: &'static str, value: String },
}

pub type Result<T, E = ModalError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            ModalError::NotFound("#missing".into()).to_string(),
            "modal surface not found: #missing"
        );
        assert_eq!(
            ModalError::RegionMissing {
                class: "modal-footer"
            }
            .to_string(),
            "modal surface has no `.modal-footer` region"
        );
        assert_eq!(
            ModalError::InvalidOption {
                option: "size",
                value: "huge".into()
            }
            .to_string(),
            "invalid value \"huge\" for modal option `size`"
        );
    }
}
