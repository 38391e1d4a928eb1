//! # Flatfile Schema
//!
//! Flat-file schema model and loader.
//!
//! This crate provides:
//! - The compiled, immutable schema tree ([`FlatFileSchema`], [`SchemaElement`])
//! - The XSD loader ([`load_schema`]) reading the codec annotation keys
//! - [`SchemaError`] for load failures
//!
//! A schema is compiled once and shared read-only across any number of
//! concurrent decode/encode calls.

pub mod error;
pub mod loader;
pub mod model;

pub use error::SchemaError;
pub use loader::load_schema;
pub use model::{
    ChildOrder, ElementId, ElementKind, FlatFileSchema, Justification, Occurs, SchemaElement,
    Structure, XmlFragments,
};
