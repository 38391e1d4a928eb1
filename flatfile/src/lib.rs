//! # Flatfile
//!
//! Schema-driven conversion between flat byte streams and XML documents.
//!
//! Flat files are byte-oriented record formats that are either
//! delimiter-separated or fixed-width. An annotated XML Schema describes
//! how record fields map to elements and attributes; the codec compiles
//! that schema once and then converts in both directions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use flatfile::prelude::*;
//!
//! let converter = FlatFileConverter::from_schema(&std::fs::read("orders.xsd")?)?;
//!
//! let xml = converter.flat_to_xml(b"A1|2|3")?;
//! let flat = converter.xml_to_flat(&xml)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Byte cursor, codepages, the document model, and errors
//! - [`schema`] - Schema model and the annotated-XSD loader
//! - [`codec`] - The decoder, encoder, and converter facade

pub mod prelude;

/// Byte scanning, codepages, document model, and errors.
pub mod core {
    pub use flatfile_core::*;
}

/// Schema model and the annotated-XSD loader.
pub mod schema {
    pub use flatfile_schema::*;
}

/// Decoder, encoder, and the converter facade.
pub mod codec {
    pub use flatfile_codec::*;
}

// Re-export commonly used items at the crate root
pub use flatfile_codec::{FlatFileConverter, decode, encode};
pub use flatfile_core::{Codepage, FormatError, XmlNode};
pub use flatfile_schema::{FlatFileSchema, SchemaError, load_schema};
