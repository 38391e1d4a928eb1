//! High-level conversion entry points.

use tracing::debug;

use flatfile_core::FormatError;
use flatfile_schema::{FlatFileSchema, SchemaError, load_schema};

use crate::{decoder, encoder};

/// A loaded flat-file schema bundled with both conversion directions.
///
/// Construction compiles the schema once; the converter itself is
/// immutable and safe to share across threads.
#[derive(Debug, Clone)]
pub struct FlatFileConverter {
    schema: FlatFileSchema,
}

impl FlatFileConverter {
    /// Compiles a converter from an XSD schema document.
    ///
    /// # Errors
    /// Returns [`SchemaError`] when the schema cannot be compiled.
    pub fn from_schema(xsd: &[u8]) -> Result<Self, SchemaError> {
        let schema = load_schema(xsd)?;
        debug!(
            elements = schema.len(),
            flat_codepage = schema.flat_codepage.code(),
            xml_codepage = schema.xml_codepage.code(),
            "flat-file schema compiled"
        );
        Ok(Self { schema })
    }

    /// The compiled schema.
    #[must_use]
    pub fn schema(&self) -> &FlatFileSchema {
        &self.schema
    }

    /// Converts a flat byte stream into an XML byte stream.
    ///
    /// # Errors
    /// Returns [`FormatError`] when the input does not match the schema.
    pub fn flat_to_xml(&self, input: &[u8]) -> Result<Vec<u8>, FormatError> {
        debug!(input_len = input.len(), "converting flat input to XML");
        decoder::decode(&self.schema, input)
    }

    /// Converts an XML byte stream into a flat byte stream.
    ///
    /// The input is read in the schema's XML-side codepage, so the
    /// output of [`flat_to_xml`](Self::flat_to_xml) feeds back in
    /// unchanged.
    ///
    /// # Errors
    /// Returns [`FormatError`] when the document cannot be parsed or
    /// violates the schema's occurrence bounds.
    pub fn xml_to_flat(&self, xml: &[u8]) -> Result<Vec<u8>, FormatError> {
        debug!(input_len = xml.len(), "converting XML input to flat bytes");
        encoder::encode(&self.schema, xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(xsd: &str) -> FlatFileConverter {
        FlatFileConverter::from_schema(xsd.as_bytes()).expect("schema should compile")
    }

    fn roundtrip(converter: &FlatFileConverter, input: &[u8]) -> (String, Vec<u8>) {
        let xml = converter.flat_to_xml(input).expect("decode should succeed");
        let flat = converter.xml_to_flat(&xml).expect("encode should succeed");
        let xml = String::from_utf8(xml).expect("XML output should be UTF-8");
        (xml, flat)
    }

    const SCALAR_ROOT: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Value" type="xs:string">
    <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
  </xs:element>
</xs:schema>"#;

    const TAGGED_ITEMS: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Root">
    <xs:annotation><xs:appinfo>
      <codec structure="delimited" child_delimiter_type="hex"
             child_delimiter="0x0A" child_order="infix" sequence_number="1"/>
    </xs:appinfo></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Item" maxOccurs="unbounded">
          <xs:annotation><xs:appinfo>
            <codec structure="delimited" child_delimiter_type="char"
                   child_delimiter=";" child_order="infix"
                   tag_name="ITM:" sequence_number="1"/>
          </xs:appinfo></xs:annotation>
          <xs:complexType>
            <xs:sequence>
              <xs:element name="Code" type="xs:string">
                <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
              </xs:element>
              <xs:element name="Qty" type="xs:string">
                <xs:annotation><xs:appinfo><codec sequence_number="2"/></xs:appinfo></xs:annotation>
              </xs:element>
            </xs:sequence>
          </xs:complexType>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const ATTRIBUTED_ROOT: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Root">
    <xs:annotation><xs:appinfo>
      <codec structure="delimited" child_delimiter_type="char"
             child_delimiter="|" child_order="infix" sequence_number="1"/>
    </xs:appinfo></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Id" type="xs:string">
          <xs:annotation><xs:appinfo><codec sequence_number="2"/></xs:appinfo></xs:annotation>
        </xs:element>
      </xs:sequence>
      <xs:attribute name="version" type="xs:string">
        <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
      </xs:attribute>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const WIDE_POSITIONAL: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Row">
    <xs:annotation><xs:appinfo>
      <codec structure="positional" sequence_number="1"/>
    </xs:appinfo></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Field" type="xs:string">
          <xs:annotation><xs:appinfo>
            <codec sequence_number="1" justification="left" pos_offset="0" pos_length="10"/>
          </xs:appinfo></xs:annotation>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const NARROW_POSITIONAL: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Row">
    <xs:annotation><xs:appinfo>
      <codec structure="positional" sequence_number="1"/>
    </xs:appinfo></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Code" type="xs:string">
          <xs:annotation><xs:appinfo>
            <codec sequence_number="1" justification="left" pos_offset="0" pos_length="3"/>
          </xs:appinfo></xs:annotation>
        </xs:element>
        <xs:element name="Name" type="xs:string">
          <xs:annotation><xs:appinfo>
            <codec sequence_number="2" justification="right" pos_offset="3" pos_length="5"/>
          </xs:appinfo></xs:annotation>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const PREFIX_TAGGED: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="List">
    <xs:annotation><xs:appinfo>
      <codec structure="delimited" child_delimiter_type="char"
             child_delimiter="|" child_order="prefix" sequence_number="1"/>
    </xs:appinfo></xs:annotation>
    <xs:complexType>
      <xs:sequence>
        <xs:element name="Item" minOccurs="0" maxOccurs="unbounded">
          <xs:annotation><xs:appinfo>
            <codec structure="delimited" child_delimiter_type="char"
                   child_delimiter=";" child_order="infix"
                   tag_name="IT:" sequence_number="1"/>
          </xs:appinfo></xs:annotation>
          <xs:complexType>
            <xs:sequence>
              <xs:element name="Code" type="xs:string">
                <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
              </xs:element>
              <xs:element name="Qty" type="xs:string">
                <xs:annotation><xs:appinfo><codec sequence_number="2"/></xs:appinfo></xs:annotation>
              </xs:element>
            </xs:sequence>
          </xs:complexType>
        </xs:element>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    const LATIN1_FLAT: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:annotation><xs:appinfo>
    <codec codepage="28591" codepage_xml="65001"/>
  </xs:appinfo></xs:annotation>
  <xs:element name="Note" type="xs:string">
    <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
  </xs:element>
</xs:schema>"#;

    const LATIN1_BOTH: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:annotation><xs:appinfo>
    <codec codepage="28591" codepage_xml="28591"/>
  </xs:appinfo></xs:annotation>
  <xs:element name="Note" type="xs:string">
    <xs:annotation><xs:appinfo><codec sequence_number="1"/></xs:appinfo></xs:annotation>
  </xs:element>
</xs:schema>"#;

    #[test]
    fn test_single_scalar_full_round_trip() {
        let converter = converter(SCALAR_ROOT);
        let (xml, flat) = roundtrip(&converter, b"hello world");
        assert_eq!(xml, r#"<Value xmlns="">hello world</Value>"#);
        assert_eq!(flat, b"hello world");
    }

    #[test]
    fn test_tagged_repeating_records_round_trip() {
        let converter = converter(TAGGED_ITEMS);
        let (xml, flat) = roundtrip(&converter, b"ITM:a;1\nITM:b;2");
        assert_eq!(
            xml,
            "<Root xmlns=\"\"><Item><Code>a</Code><Qty>1</Qty></Item>\
             <Item><Code>b</Code><Qty>2</Qty></Item></Root>"
        );
        assert_eq!(flat, b"ITM:a;1\nITM:b;2");
    }

    #[test]
    fn test_missing_tag_fails_decode() {
        let converter = converter(TAGGED_ITEMS);
        let err = converter.flat_to_xml(b"XXX:a;1").unwrap_err();
        assert!(matches!(err, FormatError::MissingTag { .. }));
    }

    #[test]
    fn test_attribute_round_trip() {
        let converter = converter(ATTRIBUTED_ROOT);
        let (xml, flat) = roundtrip(&converter, b"1.0|A7");
        assert_eq!(xml, r#"<Root xmlns="" version="1.0"><Id>A7</Id></Root>"#);
        assert_eq!(flat, b"1.0|A7");
    }

    #[test]
    fn test_tagged_prefix_records_round_trip() {
        let converter = converter(PREFIX_TAGGED);
        let (xml, flat) = roundtrip(&converter, b"|IT:a;1|IT:b;2");
        assert_eq!(
            xml,
            "<List xmlns=\"\"><Item><Code>a</Code><Qty>1</Qty></Item>\
             <Item><Code>b</Code><Qty>2</Qty></Item></List>"
        );
        assert_eq!(flat, b"|IT:a;1|IT:b;2");
    }

    #[test]
    fn test_left_justified_wide_field() {
        let converter = converter(WIDE_POSITIONAL);
        let flat = converter
            .xml_to_flat(br#"<Row><Field>AB</Field></Row>"#)
            .unwrap();
        assert_eq!(flat, b"AB        ");

        let xml = converter.flat_to_xml(&flat).unwrap();
        assert_eq!(
            String::from_utf8(xml).unwrap(),
            r#"<Row xmlns=""><Field>AB</Field></Row>"#
        );
    }

    #[test]
    fn test_positional_pair_exact_round_trip() {
        let converter = converter(NARROW_POSITIONAL);
        let (xml, flat) = roundtrip(&converter, b"AB Hello");
        assert_eq!(
            xml,
            r#"<Row xmlns=""><Code>AB</Code><Name>Hello</Name></Row>"#
        );
        assert_eq!(flat, b"AB Hello");
    }

    #[test]
    fn test_structural_idempotence_when_truncating() {
        // An oversized value is truncated on encode; a second round trip
        // is stable.
        let converter = converter(NARROW_POSITIONAL);
        let flat = converter
            .xml_to_flat(br#"<Row><Code>TOOLONG</Code><Name>Wolfgang</Name></Row>"#)
            .unwrap();
        assert_eq!(flat, b"TOOfgang");

        let (_, flat_again) = roundtrip(&converter, &flat);
        assert_eq!(flat_again, flat);
    }

    #[test]
    fn test_encode_occurrence_bounds() {
        let converter = converter(ATTRIBUTED_ROOT);
        assert!(matches!(
            converter.xml_to_flat(br#"<Root version="1"></Root>"#),
            Err(FormatError::TooFewOccurrences { .. })
        ));
        assert!(matches!(
            converter.xml_to_flat(br#"<Root version="1"><Id>a</Id><Id>b</Id></Root>"#),
            Err(FormatError::TooManyOccurrences { .. })
        ));
    }

    #[test]
    fn test_mixed_codepages_round_trip() {
        let converter = converter(LATIN1_FLAT);
        let (xml, flat) = roundtrip(&converter, b"caf\xE9");
        // Latin-1 on the flat side, UTF-8 on the XML side.
        assert_eq!(xml, "<Note xmlns=\"\">caf\u{E9}</Note>");
        assert_eq!(flat, b"caf\xE9");
    }

    #[test]
    fn test_non_utf8_xml_codepage_round_trip() {
        // With Latin-1 on both sides the XML output is not valid UTF-8;
        // it must still feed straight back into the encoder.
        let converter = converter(LATIN1_BOTH);
        let xml = converter.flat_to_xml(b"caf\xE9").unwrap();
        assert!(String::from_utf8(xml.clone()).is_err());
        assert_eq!(xml, b"<Note xmlns=\"\">caf\xE9</Note>");
        assert_eq!(converter.xml_to_flat(&xml).unwrap(), b"caf\xE9");
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        assert!(FlatFileConverter::from_schema(b"not xml at all").is_err());
    }
}
