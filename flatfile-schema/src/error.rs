//! Error types for schema loading.

use thiserror::Error;

/// Error type for schema compilation.
///
/// Any failure aborts the whole load; there is no partial schema. These
/// errors are raised during loading only, never during decode/encode.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// XML parsing error in the schema document.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Schema document is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Missing required attribute or annotation key.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute or annotation key.
        attribute: String,
    },

    /// Invalid attribute or annotation value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute or annotation key.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown numeric codepage identifier.
    #[error("unsupported codepage {code}")]
    UnsupportedCodepage {
        /// Numeric codepage.
        code: u32,
    },

    /// Sibling sequence numbers are not contiguous/unique.
    #[error("invalid sequence numbering under element '{element}': sequence numbers must be unique and contiguous from 1 to {count}")]
    InvalidSequence {
        /// Parent element name.
        element: String,
        /// Number of siblings.
        count: usize,
    },

    /// Structural problem in the schema document.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
