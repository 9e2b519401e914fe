// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified document error types for jdflink.

use thiserror::Error;

/// Top-level error type for building and parsing JDF/JMF documents.
#[derive(Debug, Error)]
pub enum JdfError {
    // -- Document format errors --
    #[error("required element {tag} not found in {parent}")]
    MissingElement { parent: String, tag: String },

    #[error("required attribute {attribute} not found on {element}")]
    MissingAttribute { element: String, attribute: String },

    #[error("expected a {expected} element, found {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("unsupported {field} {value:?}")]
    UnsupportedDiscriminator { field: String, value: String },

    #[error("{0} command type is not supported")]
    UnsupportedCommand(String),

    #[error("document is not well-formed XML: {0}")]
    Xml(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JdfError {
    pub fn missing_element(parent: &str, tag: &str) -> Self {
        Self::MissingElement {
            parent: parent.to_owned(),
            tag: tag.to_owned(),
        }
    }

    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            element: element.to_owned(),
            attribute: attribute.to_owned(),
        }
    }

    pub fn invalid_value(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    /// True for every kind raised while reading or validating a document,
    /// including the unsupported-command sub-kind.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_)
        )
    }

    /// True only when a command envelope named a `Type` this crate cannot
    /// interpret, as opposed to a malformed command.
    pub fn is_unsupported_command(&self) -> bool {
        matches!(self, Self::UnsupportedCommand(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, JdfError>;
