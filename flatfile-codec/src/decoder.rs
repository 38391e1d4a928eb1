//! Flat-bytes to XML decoding.
//!
//! The decoder walks the schema tree top-down, consuming input through a
//! [`Cursor`] and emitting XML bytes as it goes. Delimited records drive
//! their children by peeking for delimiters and tag markers; positional
//! records read fixed widths. Attribute children are buffered separately
//! from element children so they land inside the parent's start tag.

use quick_xml::escape::escape;

use flatfile_core::{Cursor, FormatError, Result};
use flatfile_schema::{
    ChildOrder, ElementId, ElementKind, FlatFileSchema, Justification, SchemaElement, Structure,
};

/// Decodes a flat byte stream into an XML byte stream.
///
/// # Errors
/// Returns [`FormatError`] when the input does not match the schema:
/// missing delimiters or tags, too few occurrences, or truncated input.
/// No partial output is produced.
pub fn decode(schema: &FlatFileSchema, input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(input);
    let mut output = Vec::new();
    read_element(schema, schema.root(), &mut cursor, &mut output, 0)?;
    Ok(output)
}

fn read_element(
    schema: &FlatFileSchema,
    id: ElementId,
    cursor: &mut Cursor<'_>,
    output: &mut Vec<u8>,
    occurrence: u32,
) -> Result<()> {
    let element = schema.element(id);
    if element.kind == ElementKind::Record {
        return read_record(schema, id, cursor, output, occurrence);
    }

    let positional = matches!(
        schema.parent(id).and_then(|p| p.structure.as_ref()),
        Some(Structure::Positional)
    );
    if positional {
        read_positional_value(schema, element, cursor, output)
    } else {
        read_delimited_value(schema, element, cursor, output)
    }
}

/// Whether a child occurrence comes next, and how to proceed.
enum NextChild {
    /// Another occurrence follows; read it.
    Read,
    /// No further occurrence; stop repeating this child.
    Stop,
    /// Optional postfix child absent; consume its delimiter and move on.
    SkipDelimiter,
}

fn read_record(
    schema: &FlatFileSchema,
    id: ElementId,
    cursor: &mut Cursor<'_>,
    output: &mut Vec<u8>,
    occurrence: u32,
) -> Result<()> {
    let element = schema.element(id);

    if let Some(tag) = &element.tag_name {
        if !cursor.starts_with(tag) {
            if occurrence < element.occurs.min {
                return Err(FormatError::MissingTag {
                    element: element.name.clone(),
                    tag: schema.flat_codepage.decode(tag),
                });
            }
            // Enough occurrences already read.
            return Ok(());
        }
        cursor.expect(tag)?;
    }

    // Attributes must land inside the start tag, so the two child groups
    // are buffered separately and assembled afterwards.
    let mut child_output = Vec::new();
    let mut attribute_output = Vec::new();

    let child_count = element.children.len();
    for (index, &child_id) in element.children.iter().enumerate() {
        let child = schema.element(child_id);
        let last_child = index + 1 == child_count;
        let mut count = 0u32;

        while child.occurs.allows_more(count) {
            match element.structure.as_ref() {
                Some(Structure::Delimited { delimiter, order }) => {
                    match probe_next_child(cursor, child, delimiter, *order, count) {
                        NextChild::Stop => {
                            if count < child.occurs.min {
                                return Err(FormatError::MissingElement {
                                    element: child.name.clone(),
                                });
                            }
                            break;
                        }
                        NextChild::SkipDelimiter => {
                            cursor.expect(delimiter)?;
                            break;
                        }
                        NextChild::Read => {}
                    }

                    // A prefix child is always preceded by the delimiter; a
                    // repetition of the last infix child is preceded by one too.
                    if *order == ChildOrder::Prefix
                        || (*order == ChildOrder::Infix && last_child && count > 0)
                    {
                        cursor.expect(delimiter)?;
                    }

                    let sink = if child.kind == ElementKind::Attribute {
                        &mut attribute_output
                    } else {
                        &mut child_output
                    };
                    read_element(schema, child_id, cursor, sink, count)?;

                    // Trailing delimiter, except after the last infix child.
                    if *order == ChildOrder::Postfix
                        || (*order == ChildOrder::Infix && !last_child)
                    {
                        cursor.expect(delimiter)?;
                    }
                }
                _ => {
                    let sink = if child.kind == ElementKind::Attribute {
                        &mut attribute_output
                    } else {
                        &mut child_output
                    };
                    read_element(schema, child_id, cursor, sink, count)?;
                }
            }

            count += 1;
        }
    }

    output.extend_from_slice(&element.fragments.start_tag);
    output.extend_from_slice(&attribute_output);
    if child_output.is_empty() {
        output.extend_from_slice(&element.fragments.empty_closer);
    } else {
        output.extend_from_slice(&element.fragments.closer);
        output.extend_from_slice(&child_output);
        output.extend_from_slice(&element.fragments.end_tag);
    }

    Ok(())
}

/// Decides whether another occurrence of `child` comes next in the input.
///
/// Tagged children include their tag marker in the delimiter peek so a
/// delimiter followed by a foreign tag does not count as a match.
fn probe_next_child(
    cursor: &Cursor<'_>,
    child: &SchemaElement,
    delimiter: &[u8],
    order: ChildOrder,
    count: u32,
) -> NextChild {
    let mut marked = delimiter.to_vec();
    if let Some(tag) = &child.tag_name {
        marked.extend_from_slice(tag);
    }

    match order {
        ChildOrder::Prefix => {
            if cursor.starts_with(&marked) {
                NextChild::Read
            } else {
                NextChild::Stop
            }
        }
        ChildOrder::Infix => {
            if cursor.starts_with(&marked) {
                // The parent's delimiter ahead means another child follows.
                NextChild::Read
            } else if count == 0
                && (child.is_nullable_scalar() || child.kind == ElementKind::Record)
            {
                // First occurrence of a nullable child: try the value even
                // with no delimiter in sight.
                NextChild::Read
            } else if cursor.starts_with_any(&child.end_delimiters) {
                NextChild::Stop
            } else {
                NextChild::Read
            }
        }
        ChildOrder::Postfix => {
            if let Some(tag) = &child.tag_name {
                if cursor.starts_with(tag) {
                    NextChild::Read
                } else {
                    NextChild::Stop
                }
            } else if !cursor.starts_with_any(&child.end_delimiters) {
                NextChild::Read
            } else if count == 0 && child.occurs.min == 0 {
                // Optional child entirely absent; its delimiter still
                // appears in the stream.
                NextChild::SkipDelimiter
            } else if count == 0 && child.occurs.min > 0 && child.is_nullable_scalar() {
                NextChild::Read
            } else {
                NextChild::Stop
            }
        }
    }
}

/// Reads a scalar value up to the element's terminator candidates and
/// writes it as an XML element or attribute.
fn read_delimited_value(
    schema: &FlatFileSchema,
    element: &SchemaElement,
    cursor: &mut Cursor<'_>,
    output: &mut Vec<u8>,
) -> Result<()> {
    let raw = cursor.scan_until(&element.end_delimiters)?;
    let text = schema.flat_codepage.decode(&raw);
    let escaped = escape(&text);

    if element.kind == ElementKind::Attribute {
        output.extend_from_slice(&element.fragments.start_tag);
        output.extend_from_slice(&schema.xml_codepage.encode(&escaped));
        output.extend_from_slice(&element.fragments.closer);
    } else if raw.is_empty() {
        output.extend_from_slice(&element.fragments.start_tag);
        output.extend_from_slice(&element.fragments.empty_closer);
    } else {
        output.extend_from_slice(&element.fragments.start_tag);
        output.extend_from_slice(&element.fragments.closer);
        output.extend_from_slice(&schema.xml_codepage.encode(&escaped));
        output.extend_from_slice(&element.fragments.end_tag);
    }

    Ok(())
}

/// Reads a fixed-width scalar, strips padding per its justification, and
/// writes it as an XML element or attribute.
fn read_positional_value(
    schema: &FlatFileSchema,
    element: &SchemaElement,
    cursor: &mut Cursor<'_>,
    output: &mut Vec<u8>,
) -> Result<()> {
    let available = cursor.remaining();
    let raw = cursor
        .read_exact(element.pos_length)
        .ok_or_else(|| FormatError::ShortRead {
            element: element.name.clone(),
            expected: element.pos_length,
            available,
        })?;

    let text = schema.flat_codepage.decode(raw);
    let text = match element.justification {
        Justification::Left => text.trim_end_matches(schema.pad_char),
        Justification::Right => text.trim_start_matches(schema.pad_char),
        Justification::Undefined => &text,
    };
    let escaped = escape(text);
    let value = schema.xml_codepage.encode(&escaped);

    if element.kind == ElementKind::Attribute {
        output.extend_from_slice(&element.fragments.start_tag);
        output.extend_from_slice(&value);
        output.extend_from_slice(&element.fragments.closer);
    } else {
        output.extend_from_slice(&element.fragments.start_tag);
        output.extend_from_slice(&element.fragments.closer);
        output.extend_from_slice(&value);
        output.extend_from_slice(&element.fragments.end_tag);
    }

    Ok(())
}
