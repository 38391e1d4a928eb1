//! XML to flat-bytes encoding.
//!
//! The encoder decodes the input bytes with the XML-side codepage and
//! parses them into an [`XmlNode`] tree, then walks the schema tree,
//! looking up matching document nodes by local name and namespace at
//! each step and emitting flat bytes with the parent record's delimiter
//! placement rules.

use flatfile_core::{FormatError, Result, XmlNode};
use flatfile_schema::{
    ChildOrder, ElementId, ElementKind, FlatFileSchema, Justification, SchemaElement, Structure,
};

/// Encodes an XML document into a flat byte stream.
///
/// # Errors
/// Returns [`FormatError`] when the document cannot be parsed or the
/// matched occurrence counts violate the schema's bounds. No partial
/// output is produced.
pub fn encode(schema: &FlatFileSchema, xml: &[u8]) -> Result<Vec<u8>> {
    let text = schema.xml_codepage.decode(xml);
    let root = XmlNode::parse(&text)?;
    // Wrap the root so the schema root is looked up like any other child.
    let document = XmlNode {
        children: vec![root],
        ..XmlNode::default()
    };

    let mut output = Vec::new();
    write_element(schema, schema.root(), &document, &mut output, true)?;
    Ok(output)
}

/// A document node matched against one schema element.
enum Matched<'a> {
    Attribute(&'a str),
    Element(&'a XmlNode),
}

fn write_element(
    schema: &FlatFileSchema,
    id: ElementId,
    node: &XmlNode,
    output: &mut Vec<u8>,
    last_child: bool,
) -> Result<()> {
    let element = schema.element(id);
    let parent = schema.parent(id);
    let (parent_order, parent_delimiter) = match parent.and_then(|p| p.structure.as_ref()) {
        Some(Structure::Delimited { delimiter, order }) => {
            (Some(*order), Some(delimiter.as_slice()))
        }
        _ => (None, None),
    };

    let matched: Vec<Matched<'_>> = if element.kind == ElementKind::Attribute {
        node.matching_attributes(&element.name, element.namespace.as_deref())
            .into_iter()
            .map(Matched::Attribute)
            .collect()
    } else {
        node.matching_children(&element.name, element.namespace.as_deref())
            .into_iter()
            .map(Matched::Element)
            .collect()
    };

    let found = matched.len() as u32;
    if found < element.occurs.min {
        return Err(FormatError::TooFewOccurrences {
            element: element.name.clone(),
            min: element.occurs.min,
            found,
        });
    }
    if let Some(max) = element.occurs.max {
        if found > max {
            return Err(FormatError::TooManyOccurrences {
                element: element.name.clone(),
                max,
                found,
            });
        }
    }

    for (count, source) in matched.iter().enumerate() {
        // A prefix child is always preceded by the delimiter; a repetition
        // of the last infix child is preceded by one too.
        if parent_order == Some(ChildOrder::Prefix) || (last_child && count > 0) {
            if let Some(delimiter) = parent_delimiter {
                output.extend_from_slice(delimiter);
            }
        }

        if let Some(tag) = &element.tag_name {
            output.extend_from_slice(tag);
        }

        match source {
            Matched::Attribute(value) => {
                write_value(schema, element, parent, value, output);
            }
            Matched::Element(child_node) if element.kind == ElementKind::Record => {
                let own_order = match &element.structure {
                    Some(Structure::Delimited { order, .. }) => Some(*order),
                    _ => None,
                };
                let child_total = element.children.len();
                for (index, &child_id) in element.children.iter().enumerate() {
                    // The last infix child gets no trailing delimiter.
                    let last = own_order == Some(ChildOrder::Infix) && index + 1 == child_total;
                    write_element(schema, child_id, child_node, output, last)?;
                }
            }
            Matched::Element(child_node) => {
                let value = child_node.text.as_deref().unwrap_or_default();
                write_value(schema, element, parent, value, output);
            }
        }

        // Trailing delimiter, except after the last infix child.
        if (parent_order == Some(ChildOrder::Infix) && !last_child)
            || parent_order == Some(ChildOrder::Postfix)
        {
            if let Some(delimiter) = parent_delimiter {
                output.extend_from_slice(delimiter);
            }
        }
    }

    // A postfix child with zero occurrences still marks its slot with one
    // delimiter.
    if parent_order == Some(ChildOrder::Postfix) && matched.is_empty() {
        if let Some(delimiter) = parent_delimiter {
            output.extend_from_slice(delimiter);
        }
    }

    Ok(())
}

/// Writes a scalar value, applying fixed-width padding or truncation when
/// the parent record is positional.
fn write_value(
    schema: &FlatFileSchema,
    element: &SchemaElement,
    parent: Option<&SchemaElement>,
    value: &str,
    output: &mut Vec<u8>,
) {
    let positional = matches!(
        parent.and_then(|p| p.structure.as_ref()),
        Some(Structure::Positional)
    );
    if positional {
        let fitted = fit_value(value, element, schema.pad_char);
        output.extend_from_slice(&schema.flat_codepage.encode(&fitted));
    } else {
        output.extend_from_slice(&schema.flat_codepage.encode(value));
    }
}

/// Pads or truncates a value to its fixed width. Left justification pads
/// and truncates at the end; right justification (and undeclared) pads at
/// the start and keeps the trailing characters.
fn fit_value(value: &str, element: &SchemaElement, pad: char) -> String {
    let width = element.pos_length;
    let mut chars: Vec<char> = value.chars().collect();

    match element.justification {
        Justification::Left => {
            while chars.len() < width {
                chars.push(pad);
            }
            chars.truncate(width);
        }
        Justification::Right | Justification::Undefined => {
            while chars.len() < width {
                chars.insert(0, pad);
            }
            let excess = chars.len() - width;
            chars.drain(..excess);
        }
    }

    chars.into_iter().collect()
}
