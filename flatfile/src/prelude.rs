//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use flatfile::prelude::*;
//! ```

// Core types
pub use flatfile_core::codepage::Codepage;
pub use flatfile_core::cursor::{Cursor, Terminator};
pub use flatfile_core::document::{XmlAttribute, XmlNode};
pub use flatfile_core::error::{FormatError, Result as FormatResult};

// Schema types
pub use flatfile_schema::{
    ChildOrder, ElementId, ElementKind, FlatFileSchema, Justification, Occurs, SchemaElement,
    SchemaError, Structure, load_schema,
};

// Codec entry points
pub use flatfile_codec::{FlatFileConverter, decode, encode};
