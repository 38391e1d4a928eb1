//! Error types for decode and encode operations.

use thiserror::Error;

/// Error type for conversions between flat bytes and documents.
///
/// Every variant aborts the whole decode or encode call; the codec
/// produces no partial output and performs no local recovery.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input ended where more bytes were required.
    #[error("unexpected end-of-input, expected '{expected}'")]
    UnexpectedEof {
        /// Human-readable rendering of the expected bytes or delimiters.
        expected: String,
    },

    /// An exact byte sequence was required but different bytes were found.
    #[error("expected bytes '{expected}', found '{found}'")]
    BytesMismatch {
        /// Expected byte sequence.
        expected: String,
        /// Bytes actually read, up to and including the first mismatch.
        found: String,
    },

    /// A required tag marker was not present in the input.
    #[error("unexpected content: expected tag '{tag}' for element '{element}'")]
    MissingTag {
        /// Element name.
        element: String,
        /// Expected tag marker.
        tag: String,
    },

    /// A required element was not found where the schema expects it.
    #[error("unexpected delimiter: expected element '{element}'")]
    MissingElement {
        /// Element name.
        element: String,
    },

    /// Fewer occurrences than `minOccurs` were supplied or found.
    #[error("expected at least {min} '{element}' elements, found {found}")]
    TooFewOccurrences {
        /// Element name.
        element: String,
        /// Minimum occurrence bound.
        min: u32,
        /// Occurrences actually present.
        found: u32,
    },

    /// More occurrences than `maxOccurs` were supplied.
    #[error("expected at most {max} '{element}' elements, found {found}")]
    TooManyOccurrences {
        /// Element name.
        element: String,
        /// Maximum occurrence bound.
        max: u32,
        /// Occurrences actually present.
        found: u32,
    },

    /// A positional field required more bytes than the input holds.
    #[error("unexpected end-of-input: expected {expected} bytes for element '{element}', {available} available")]
    ShortRead {
        /// Element name.
        element: String,
        /// Fixed field width in bytes.
        expected: usize,
        /// Bytes remaining in the input.
        available: usize,
    },

    /// The encoder input could not be parsed as an XML document.
    #[error("could not read the input document: {message}")]
    Document {
        /// Underlying parse failure.
        message: String,
    },
}

impl FormatError {
    /// Creates a document error from any displayable parse failure.
    pub fn document(err: impl std::fmt::Display) -> Self {
        Self::Document {
            message: err.to_string(),
        }
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, FormatError>;
