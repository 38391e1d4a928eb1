//! Flat-file schema loader.
//!
//! Compiles an XML Schema document carrying the codec annotation
//! attributes into a [`FlatFileSchema`]. Loading is two-phase: an event
//! pass collects raw element declarations and their annotation blocks,
//! then a build pass allocates the arena, resolves namespaces, validates
//! sequence numbers, and precomputes XML fragments and end delimiters.
//!
//! Any missing required annotation, unparseable occurrence string, or
//! malformed schema document aborts the whole load.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

use flatfile_core::Codepage;

use crate::error::SchemaError;
use crate::model::{
    ChildOrder, ElementId, ElementKind, FlatFileSchema, Justification, Occurs, SchemaElement,
    Structure, XmlFragments, derive_end_delimiters,
};

/// Compiles a flat-file schema from an XSD document.
///
/// # Errors
/// Returns [`SchemaError`] for malformed XML, missing required
/// annotations, unparseable occurrence strings, unknown codepages, or
/// invalid sequence numbering. There is no partial schema.
pub fn load_schema(xml: &[u8]) -> Result<FlatFileSchema, SchemaError> {
    let text = std::str::from_utf8(xml)?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut header: Option<SchemaHeader> = None;
    let mut settings: Option<HashMap<String, String>> = None;
    let mut root: Option<RawElement> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e)?.as_str() {
                "schema" => header = Some(SchemaHeader::from_start(e)?),
                "annotation" if header.is_some() => {
                    let attrs = parse_annotation(&mut reader)?;
                    // Only the first root annotation block carries the
                    // global settings.
                    if settings.is_none() && !attrs.is_empty() {
                        settings = Some(attrs);
                    }
                }
                "element" if header.is_some() => {
                    root = Some(parse_element(&mut reader, e)?);
                }
                _ => skip_element(&mut reader)?,
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let header = header
        .ok_or_else(|| SchemaError::structure("no schema element found"))?;
    let root = root
        .ok_or_else(|| SchemaError::structure("no root element declaration found"))?;
    let settings = GlobalSettings::from_annotation(settings.unwrap_or_default())?;

    Builder::new(header, settings).build(root)
}

/// Attributes read off the `schema` start tag.
struct SchemaHeader {
    target_namespace: Option<String>,
    element_form_qualified: bool,
}

impl SchemaHeader {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, SchemaError> {
        let mut target_namespace = None;
        let mut element_form_qualified = false;

        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr_value(&attr)?;
            match key.as_str() {
                "targetNamespace" => target_namespace = Some(value),
                "elementFormDefault" => element_form_qualified = value == "qualified",
                _ => {}
            }
        }

        Ok(Self {
            target_namespace,
            element_form_qualified,
        })
    }
}

/// Global codec settings from the schema root annotation.
struct GlobalSettings {
    flat_codepage: Codepage,
    xml_codepage: Codepage,
    pad_char: char,
}

impl GlobalSettings {
    fn from_annotation(attrs: HashMap<String, String>) -> Result<Self, SchemaError> {
        let flat_codepage = match attrs.get("codepage") {
            Some(value) => resolve_codepage("codepage", value)?,
            None => Codepage::default(),
        };
        let xml_codepage = match attrs.get("codepage_xml") {
            Some(value) => resolve_codepage("codepage_xml", value)?,
            None => flat_codepage,
        };

        let mut pad_char = ' ';
        if let Some(value) = attrs.get("default_pad_char").map(String::as_str) {
            if attrs.get("pad_char_type").map(String::as_str) == Some("hex") {
                pad_char = parse_hex_byte(value).ok_or_else(|| {
                    SchemaError::invalid_attr("schema", "default_pad_char", value)
                })? as char;
            } else if let Some(c) = value.chars().next() {
                pad_char = c;
            }
        }

        Ok(Self {
            flat_codepage,
            xml_codepage,
            pad_char,
        })
    }
}

fn resolve_codepage(attribute: &str, value: &str) -> Result<Codepage, SchemaError> {
    let code: u32 = value
        .parse()
        .map_err(|_| SchemaError::invalid_attr("schema", attribute, value))?;
    Codepage::from_code(code).ok_or(SchemaError::UnsupportedCodepage { code })
}

/// A hex byte literal, with or without the `0x` prefix.
fn parse_hex_byte(value: &str) -> Option<u8> {
    let trimmed = value.trim().to_lowercase();
    let digits = trimmed.strip_prefix("0x").unwrap_or(&trimmed);
    u8::from_str_radix(digits, 16).ok()
}

/// An element or attribute declaration before namespace resolution and
/// annotation interpretation.
#[derive(Debug, Default)]
struct RawElement {
    name: String,
    form: Option<String>,
    occurs: Occurs,
    value_type: Option<String>,
    is_attribute: bool,
    is_complex: bool,
    annotations: HashMap<String, String>,
    children: Vec<RawElement>,
}

impl RawElement {
    fn from_start(e: &BytesStart<'_>, is_attribute: bool) -> Result<Self, SchemaError> {
        let context = if is_attribute { "attribute" } else { "element" };
        let mut raw = RawElement {
            is_attribute,
            ..RawElement::default()
        };

        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr_value(&attr)?;
            match key.as_str() {
                "name" => raw.name = value,
                "form" => raw.form = Some(value),
                // The local part only; prefixes vary per document.
                "type" => {
                    raw.value_type =
                        Some(value.rsplit(':').next().unwrap_or(&value).to_string());
                }
                "minOccurs" => {
                    raw.occurs.min = value.parse().map_err(|_| {
                        SchemaError::invalid_attr(context, "minOccurs", value.as_str())
                    })?;
                }
                "maxOccurs" => {
                    raw.occurs.max = if value == "unbounded" {
                        None
                    } else {
                        Some(value.parse().map_err(|_| {
                            SchemaError::invalid_attr(context, "maxOccurs", value.as_str())
                        })?)
                    };
                }
                _ => {}
            }
        }

        if raw.name.is_empty() {
            return Err(SchemaError::missing_attr(context, "name"));
        }
        Ok(raw)
    }
}

/// Parses an `element` declaration, including nested complex content.
fn parse_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<RawElement, SchemaError> {
    let mut raw = RawElement::from_start(start, false)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e)?.as_str() {
                "annotation" => {
                    let attrs = parse_annotation(reader)?;
                    if raw.annotations.is_empty() {
                        raw.annotations = attrs;
                    }
                }
                "complexType" => {
                    raw.is_complex = true;
                    parse_complex_type(reader, &mut raw)?;
                }
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(raw)
}

/// Parses a `complexType` block: its attribute declarations and the
/// `sequence` of child elements.
fn parse_complex_type(
    reader: &mut Reader<&[u8]>,
    raw: &mut RawElement,
) -> Result<(), SchemaError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e)?.as_str() {
                "sequence" => parse_sequence(reader, raw)?,
                "attribute" => raw.children.push(parse_attribute(reader, e)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(ref e) => {
                if local_name(e)?.as_str() == "attribute" {
                    raw.children.push(RawElement::from_start(e, true)?);
                }
            }
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a `sequence` block of child element declarations.
fn parse_sequence(reader: &mut Reader<&[u8]>, raw: &mut RawElement) -> Result<(), SchemaError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e)?.as_str() {
                "element" => raw.children.push(parse_element(reader, e)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(ref e) => {
                if local_name(e)?.as_str() == "element" {
                    raw.children.push(RawElement::from_start(e, false)?);
                }
            }
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses an `attribute` declaration with content (its annotation).
fn parse_attribute(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<RawElement, SchemaError> {
    let mut raw = RawElement::from_start(start, true)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e)?.as_str() {
                "annotation" => {
                    let attrs = parse_annotation(reader)?;
                    if raw.annotations.is_empty() {
                        raw.annotations = attrs;
                    }
                }
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(raw)
}

/// Reads an `annotation` block and returns the attributes of the first
/// markup element found inside an `appinfo`.
fn parse_annotation(reader: &mut Reader<&[u8]>) -> Result<HashMap<String, String>, SchemaError> {
    let mut buf = Vec::new();
    let mut attrs = HashMap::new();
    let mut depth = 1usize;
    let mut appinfo_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                if local_name(e)?.as_str() == "appinfo" {
                    appinfo_depth = depth;
                } else if appinfo_depth > 0 && attrs.is_empty() {
                    attrs = collect_attrs(e)?;
                }
            }
            Event::Empty(ref e) => {
                if appinfo_depth > 0 && attrs.is_empty() {
                    attrs = collect_attrs(e)?;
                }
            }
            Event::End(_) => {
                if depth == appinfo_depth {
                    appinfo_depth = 0;
                }
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(attrs)
}

/// Skips to the end of the current element.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), SchemaError> {
    let mut buf = Vec::new();
    let mut depth = 1usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn local_name(e: &BytesStart<'_>) -> Result<String, SchemaError> {
    Ok(std::str::from_utf8(e.name().local_name().as_ref())?.to_string())
}

fn collect_attrs(e: &BytesStart<'_>) -> Result<HashMap<String, String>, SchemaError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        attrs.insert(key, attr_value(&attr)?);
    }
    Ok(attrs)
}

fn attr_value(attr: &Attribute<'_>) -> Result<String, SchemaError> {
    let raw = std::str::from_utf8(&attr.value)?;
    let value = unescape(raw).map_err(|e| SchemaError::structure(e.to_string()))?;
    Ok(value.into_owned())
}

/// Second phase: raw declarations into the compiled arena.
struct Builder {
    header: SchemaHeader,
    settings: GlobalSettings,
    elements: Vec<SchemaElement>,
}

impl Builder {
    fn new(header: SchemaHeader, settings: GlobalSettings) -> Self {
        Self {
            header,
            settings,
            elements: Vec::new(),
        }
    }

    fn build(mut self, root: RawElement) -> Result<FlatFileSchema, SchemaError> {
        let root_id = self.build_element(&root, None, None)?;
        self.compute_end_delimiters(root_id);

        Ok(FlatFileSchema {
            elements: self.elements,
            root: root_id,
            flat_codepage: self.settings.flat_codepage,
            xml_codepage: self.settings.xml_codepage,
            pad_char: self.settings.pad_char,
        })
    }

    fn build_element(
        &mut self,
        raw: &RawElement,
        parent: Option<ElementId>,
        parent_namespace: Option<Option<String>>,
    ) -> Result<ElementId, SchemaError> {
        let namespace = self.resolve_namespace(raw, parent.is_none());
        let annotations = Annotations::new(&raw.name, &raw.annotations);

        let sequence_number = annotations.required_u32("sequence_number")?;
        let justification = match annotations.optional("justification") {
            Some("left") => Justification::Left,
            Some("right") => Justification::Right,
            _ => Justification::Undefined,
        };
        let pos_offset = annotations.optional_usize("pos_offset")?.unwrap_or(0);
        let pos_length = annotations.optional_usize("pos_length")?.unwrap_or(0);

        let (kind, structure, tag_name) = if raw.is_attribute {
            (ElementKind::Attribute, None, None)
        } else if raw.is_complex {
            let structure = self.parse_structure(&raw.name, &annotations)?;
            let tag_name = annotations
                .optional("tag_name")
                .map(|t| self.settings.flat_codepage.encode(t));
            (ElementKind::Record, Some(structure), tag_name)
        } else {
            (ElementKind::Element, None, None)
        };

        let fragments = if raw.is_attribute {
            XmlFragments::for_attribute(&raw.name, self.settings.xml_codepage)
        } else {
            XmlFragments::for_element(
                &raw.name,
                namespace.as_deref(),
                parent_namespace.as_ref().map(Option::as_deref),
                self.settings.xml_codepage,
            )
        };

        let occurs = if raw.is_attribute {
            Occurs::ONE
        } else {
            raw.occurs
        };

        let id = ElementId(self.elements.len());
        self.elements.push(SchemaElement {
            name: raw.name.clone(),
            namespace: namespace.clone(),
            kind,
            structure,
            tag_name,
            occurs,
            sequence_number,
            justification,
            pos_offset,
            pos_length,
            value_type: raw.value_type.clone(),
            parent,
            children: Vec::new(),
            fragments,
            end_delimiters: Vec::new(),
        });

        let mut children = Vec::with_capacity(raw.children.len());
        for child in &raw.children {
            children.push(self.build_element(child, Some(id), Some(namespace.clone()))?);
        }

        // Children must be visited in sequence order, not document order.
        children.sort_by_key(|c| self.elements[c.0].sequence_number);
        let mut numbers: Vec<u32> = children
            .iter()
            .map(|c| self.elements[c.0].sequence_number)
            .collect();
        numbers.dedup();
        let contiguous = numbers.len() == children.len()
            && numbers
                .iter()
                .enumerate()
                .all(|(i, &n)| n == i as u32 + 1);
        if !contiguous {
            return Err(SchemaError::InvalidSequence {
                element: raw.name.clone(),
                count: children.len(),
            });
        }

        self.elements[id.0].children = children;
        Ok(id)
    }

    fn resolve_namespace(&self, raw: &RawElement, is_root: bool) -> Option<String> {
        let qualified = match raw.form.as_deref() {
            Some("qualified") => true,
            Some("unqualified") => false,
            _ => self.header.element_form_qualified,
        };
        if is_root || qualified {
            self.header.target_namespace.clone()
        } else {
            None
        }
    }

    fn parse_structure(
        &self,
        element: &str,
        annotations: &Annotations<'_>,
    ) -> Result<Structure, SchemaError> {
        match annotations.required("structure")? {
            "positional" => Ok(Structure::Positional),
            "delimited" => {
                let literal = annotations.required("child_delimiter")?;
                let delimiter = match annotations.optional("child_delimiter_type") {
                    Some("hex") => parse_hex_delimiter(element, literal)?,
                    _ => self.settings.flat_codepage.encode(literal),
                };
                if delimiter.is_empty() {
                    return Err(SchemaError::invalid_attr(
                        element,
                        "child_delimiter",
                        literal,
                    ));
                }

                let order = match annotations.required("child_order")? {
                    "prefix" => ChildOrder::Prefix,
                    "infix" => ChildOrder::Infix,
                    "postfix" => ChildOrder::Postfix,
                    other => {
                        return Err(SchemaError::invalid_attr(element, "child_order", other));
                    }
                };

                Ok(Structure::Delimited { delimiter, order })
            }
            other => Err(SchemaError::invalid_attr(element, "structure", other)),
        }
    }

    /// Walks parents-first so every derivation sees its parent finished.
    fn compute_end_delimiters(&mut self, root: ElementId) {
        let mut order = vec![root];
        let mut next = 0;
        while next < order.len() {
            let id = order[next];
            next += 1;
            order.extend(self.elements[id.0].children.iter().copied());
        }
        for id in order {
            self.elements[id.0].end_delimiters = derive_end_delimiters(&self.elements, id);
        }
    }
}

/// A space-separated list of hex byte literals, e.g. `0x0D 0x0A`.
fn parse_hex_delimiter(element: &str, literal: &str) -> Result<Vec<u8>, SchemaError> {
    literal
        .split_whitespace()
        .map(|part| {
            parse_hex_byte(part)
                .ok_or_else(|| SchemaError::invalid_attr(element, "child_delimiter", literal))
        })
        .collect()
}

/// Annotation key lookup bound to its element name for error reporting.
struct Annotations<'a> {
    element: &'a str,
    attrs: &'a HashMap<String, String>,
}

impl<'a> Annotations<'a> {
    fn new(element: &'a str, attrs: &'a HashMap<String, String>) -> Self {
        Self { element, attrs }
    }

    fn optional(&self, key: &str) -> Option<&'a str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn required(&self, key: &str) -> Result<&'a str, SchemaError> {
        self.optional(key)
            .ok_or_else(|| SchemaError::missing_attr(self.element, key))
    }

    fn required_u32(&self, key: &str) -> Result<u32, SchemaError> {
        let value = self.required(key)?;
        value
            .parse()
            .map_err(|_| SchemaError::invalid_attr(self.element, key, value))
    }

    fn optional_usize(&self, key: &str) -> Result<Option<usize>, SchemaError> {
        match self.optional(key) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| SchemaError::invalid_attr(self.element, key, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChildOrder, ElementKind, Structure};

    const DELIMITED_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           targetNamespace="urn:orders"
           elementFormDefault="unqualified">
    <xs:annotation>
        <xs:appinfo>
            <codec codepage="65001" default_pad_char="0x20" pad_char_type="hex"/>
        </xs:appinfo>
    </xs:annotation>
    <xs:element name="Order">
        <xs:annotation>
            <xs:appinfo>
                <codec structure="delimited" child_delimiter_type="char"
                       child_delimiter="|" child_order="infix" sequence_number="1"/>
            </xs:appinfo>
        </xs:annotation>
        <xs:complexType>
            <xs:sequence>
                <xs:element name="Id" type="xs:string">
                    <xs:annotation>
                        <xs:appinfo><codec sequence_number="2"/></xs:appinfo>
                    </xs:annotation>
                </xs:element>
                <xs:element name="Qty" type="xs:int" minOccurs="0" maxOccurs="unbounded">
                    <xs:annotation>
                        <xs:appinfo><codec sequence_number="3"/></xs:appinfo>
                    </xs:annotation>
                </xs:element>
            </xs:sequence>
            <xs:attribute name="version" type="xs:string">
                <xs:annotation>
                    <xs:appinfo><codec sequence_number="1"/></xs:appinfo>
                </xs:annotation>
            </xs:attribute>
        </xs:complexType>
    </xs:element>
</xs:schema>"#;

    #[test]
    fn test_load_delimited_schema() {
        let schema = load_schema(DELIMITED_SCHEMA.as_bytes()).expect("schema should load");

        let root = schema.element(schema.root());
        assert_eq!(root.name, "Order");
        assert_eq!(root.namespace.as_deref(), Some("urn:orders"));
        assert_eq!(root.kind, ElementKind::Record);
        assert_eq!(
            root.structure,
            Some(Structure::Delimited {
                delimiter: b"|".to_vec(),
                order: ChildOrder::Infix,
            })
        );
        assert_eq!(root.end_delimiters, vec![None]);
        assert_eq!(schema.pad_char, ' ');

        // Children come back in sequence order: attribute first.
        let children: Vec<&SchemaElement> =
            root.children.iter().map(|&c| schema.element(c)).collect();
        assert_eq!(children[0].name, "version");
        assert_eq!(children[0].kind, ElementKind::Attribute);
        assert_eq!(children[1].name, "Id");
        assert_eq!(children[1].value_type.as_deref(), Some("string"));
        assert_eq!(children[2].name, "Qty");
        assert_eq!(children[2].occurs.min, 0);
        assert_eq!(children[2].occurs.max, None);

        // Unqualified form: children carry no namespace.
        assert_eq!(children[1].namespace, None);
    }

    #[test]
    fn test_end_delimiter_derivation() {
        let schema = load_schema(DELIMITED_SCHEMA.as_bytes()).unwrap();
        let root = schema.element(schema.root());
        let id = schema.element(root.children[1]);
        let qty = schema.element(root.children[2]);

        // Middle child ends only at the parent's delimiter.
        assert_eq!(id.end_delimiters, vec![Some(b"|".to_vec())]);
        // Repeating last child: another repetition's delimiter first,
        // then the parent's own terminators.
        assert_eq!(qty.end_delimiters, vec![Some(b"|".to_vec()), None]);
    }

    #[test]
    fn test_qualified_form_inherits_target_namespace() {
        let xsd = DELIMITED_SCHEMA.replace(
            r#"elementFormDefault="unqualified""#,
            r#"elementFormDefault="qualified""#,
        );
        let schema = load_schema(xsd.as_bytes()).unwrap();
        let root = schema.element(schema.root());
        let id = schema.element(root.children[1]);
        assert_eq!(id.namespace.as_deref(), Some("urn:orders"));
        // Same namespace as the parent: no xmlns re-declaration.
        assert_eq!(id.fragments.start_tag, b"<Id");
    }

    #[test]
    fn test_missing_structure_fails() {
        let xsd = DELIMITED_SCHEMA.replace(r#"structure="delimited" "#, "");
        let err = load_schema(xsd.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingAttribute { ref attribute, .. } if attribute == "structure"
        ));
    }

    #[test]
    fn test_missing_sequence_number_fails() {
        let xsd = DELIMITED_SCHEMA.replace(
            r#"<xs:appinfo><codec sequence_number="2"/></xs:appinfo>"#,
            r#"<xs:appinfo><codec justification="left"/></xs:appinfo>"#,
        );
        let err = load_schema(xsd.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingAttribute { ref attribute, .. } if attribute == "sequence_number"
        ));
    }

    #[test]
    fn test_non_contiguous_sequence_fails() {
        let xsd = DELIMITED_SCHEMA.replace(r#"sequence_number="3""#, r#"sequence_number="5""#);
        let err = load_schema(xsd.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSequence { .. }));
    }

    #[test]
    fn test_unsupported_codepage_fails() {
        let xsd = DELIMITED_SCHEMA.replace(r#"codepage="65001""#, r#"codepage="866""#);
        let err = load_schema(xsd.as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedCodepage { code: 866 }));
    }

    #[test]
    fn test_unparseable_occurrence_fails() {
        let xsd = DELIMITED_SCHEMA.replace(r#"minOccurs="0""#, r#"minOccurs="lots""#);
        let err = load_schema(xsd.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidAttribute { ref attribute, .. } if attribute == "minOccurs"
        ));
    }

    #[test]
    fn test_hex_delimiter() {
        let xsd = DELIMITED_SCHEMA
            .replace(r#"child_delimiter_type="char""#, r#"child_delimiter_type="hex""#)
            .replace(r#"child_delimiter="|""#, r#"child_delimiter="0x0D 0x0A""#);
        let schema = load_schema(xsd.as_bytes()).unwrap();
        let root = schema.element(schema.root());
        assert_eq!(
            root.structure,
            Some(Structure::Delimited {
                delimiter: vec![0x0D, 0x0A],
                order: ChildOrder::Infix,
            })
        );
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(matches!(
            load_schema(b"<xs:schema><unclosed></xs:schema>"),
            Err(SchemaError::Xml(_))
        ));
    }
}
