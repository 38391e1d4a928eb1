//! # Flatfile Core
//!
//! Core building blocks for the flat-file codec.
//!
//! This crate provides:
//! - [`Cursor`] — forward-only byte scanning with bounded lookahead/rewind
//! - [`Codepage`] — numeric codepage to byte encoding mapping
//! - [`XmlNode`] — the hierarchical document model consumed by the encoder
//! - [`FormatError`] — the error taxonomy for decode/encode failures

pub mod codepage;
pub mod cursor;
pub mod document;
pub mod error;

pub use codepage::Codepage;
pub use cursor::Cursor;
pub use document::{XmlAttribute, XmlNode};
pub use error::{FormatError, Result};
