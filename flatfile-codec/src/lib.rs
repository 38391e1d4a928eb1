//! # Flatfile Codec
//!
//! Schema-driven conversion between flat byte streams and XML documents.
//!
//! This crate provides:
//! - [`decode`] — flat bytes to an XML byte stream
//! - [`encode`] — an XML document to flat bytes
//! - [`FlatFileConverter`] — a loaded schema bundled with both directions
//!
//! Both directions walk the same compiled schema tree; a converter is
//! immutable after loading and safe to share across threads.

pub mod converter;
pub mod decoder;
pub mod encoder;

pub use converter::FlatFileConverter;
pub use decoder::decode;
pub use encoder::encode;
