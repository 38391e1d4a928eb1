//! Compiled schema model.
//!
//! The schema is a tree of [`SchemaElement`]s held in an arena
//! ([`FlatFileSchema`]); children own nothing, elements refer to each
//! other through [`ElementId`] indices, and each element keeps a
//! non-owning parent index for delimiter and namespace derivation.
//!
//! Byte-level fragments (XML start/end tags, attribute opener/closer)
//! and the set of possible terminating delimiters for every element are
//! precomputed at build time; the finished model is immutable and safe
//! to share across concurrent conversions.

use flatfile_core::Codepage;
use flatfile_core::cursor::Terminator;

/// Index of an element within a schema's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

/// What a schema element stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Composite element with ordered children.
    Record,
    /// Scalar element carrying a text value.
    Element,
    /// Scalar rendered as an attribute of its parent.
    Attribute,
}

/// Where a delimited record writes its child separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOrder {
    /// Separator before each child occurrence.
    Prefix,
    /// Separator between child occurrences.
    Infix,
    /// Separator after each child occurrence.
    Postfix,
}

/// Flat-side layout of a record's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    /// Children separated by a delimiter byte sequence.
    Delimited {
        /// Separator bytes.
        delimiter: Vec<u8>,
        /// Separator placement.
        order: ChildOrder,
    },
    /// Children at fixed byte widths.
    Positional,
}

/// Pad side for fixed-width scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    /// Value at the start, padding after.
    Left,
    /// Value at the end, padding before.
    Right,
    /// No declared justification; treated as right-justified on encode
    /// and left untrimmed on decode.
    #[default]
    Undefined,
}

/// Occurrence bounds; `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum occurrences.
    pub min: u32,
    /// Maximum occurrences, `None` for unbounded.
    pub max: Option<u32>,
}

impl Occurs {
    /// Exactly-once occurrence.
    pub const ONE: Occurs = Occurs {
        min: 1,
        max: Some(1),
    };

    /// True while `count` has not reached the upper bound.
    #[must_use]
    pub fn allows_more(&self, count: u32) -> bool {
        self.max.is_none_or(|max| count < max)
    }

    /// True when more than one occurrence is possible.
    #[must_use]
    pub fn is_repeating(&self) -> bool {
        self.max != Some(1)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Occurs::ONE
    }
}

/// Precomputed XML byte fragments for one element, in the XML-side
/// codepage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFragments {
    /// `<Name`, `<Name xmlns="…"`, or ` Name="` for attributes.
    pub start_tag: Vec<u8>,
    /// `>`, or `"` for attributes.
    pub closer: Vec<u8>,
    /// ` />` (unused for attributes).
    pub empty_closer: Vec<u8>,
    /// `</Name>` (unused for attributes).
    pub end_tag: Vec<u8>,
}

impl XmlFragments {
    /// Fragments for an element node.
    ///
    /// The namespace declaration is repeated only where it differs from
    /// the parent's; an element without a namespace under a namespaced
    /// parent declares `xmlns=""`. The root element (no parent, outer
    /// `None`) always declares its namespace, empty or not.
    #[must_use]
    pub fn for_element(
        name: &str,
        namespace: Option<&str>,
        parent_namespace: Option<Option<&str>>,
        codepage: Codepage,
    ) -> Self {
        let start = match namespace {
            ns if parent_namespace == Some(ns) => format!("<{name}"),
            Some(ns) => format!("<{name} xmlns=\"{ns}\""),
            None => format!("<{name} xmlns=\"\""),
        };
        Self {
            start_tag: codepage.encode(&start),
            closer: codepage.encode(">"),
            empty_closer: codepage.encode(" />"),
            end_tag: codepage.encode(&format!("</{name}>")),
        }
    }

    /// Fragments for an attribute node.
    #[must_use]
    pub fn for_attribute(name: &str, codepage: Codepage) -> Self {
        Self {
            start_tag: codepage.encode(&format!(" {name}=\"")),
            closer: codepage.encode("\""),
            empty_closer: Vec::new(),
            end_tag: Vec::new(),
        }
    }
}

/// One node of the compiled schema tree.
#[derive(Debug, Clone)]
pub struct SchemaElement {
    /// Local name.
    pub name: String,
    /// Namespace URI, `None` for unqualified elements.
    pub namespace: Option<String>,
    /// Record, scalar element, or attribute.
    pub kind: ElementKind,
    /// Flat layout; `Some` only on records.
    pub structure: Option<Structure>,
    /// Literal marker preceding this element's serialized form.
    pub tag_name: Option<Vec<u8>>,
    /// Occurrence bounds.
    pub occurs: Occurs,
    /// 1-based position among siblings; children are visited in this order.
    pub sequence_number: u32,
    /// Pad side for positional scalars.
    pub justification: Justification,
    /// Declared byte offset within a positional parent.
    pub pos_offset: usize,
    /// Fixed byte width within a positional parent.
    pub pos_length: usize,
    /// Local part of the declared simple type; `"string"` marks a
    /// nullable scalar.
    pub value_type: Option<String>,
    /// Non-owning back-reference for delimiter/namespace derivation.
    pub parent: Option<ElementId>,
    /// Children sorted by `sequence_number`.
    pub children: Vec<ElementId>,
    /// Precomputed XML byte fragments.
    pub fragments: XmlFragments,
    /// Terminator candidates for this element's value, in match order;
    /// `None` is the end-of-input sentinel. Consulted only during decode.
    pub end_delimiters: Vec<Terminator>,
}

impl SchemaElement {
    /// True for scalars whose declared type permits an empty value.
    #[must_use]
    pub fn is_nullable_scalar(&self) -> bool {
        self.value_type.as_deref() == Some("string")
    }
}

/// A compiled schema: the element arena plus global codec settings.
///
/// Immutable after loading; share by reference across threads.
#[derive(Debug, Clone)]
pub struct FlatFileSchema {
    pub(crate) elements: Vec<SchemaElement>,
    pub(crate) root: ElementId,
    /// Byte encoding of the flat side.
    pub flat_codepage: Codepage,
    /// Byte encoding of the XML side.
    pub xml_codepage: Codepage,
    /// Pad character for positional fields.
    pub pad_char: char,
}

impl FlatFileSchema {
    /// The root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Looks up an element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> &SchemaElement {
        &self.elements[id.0]
    }

    /// The parent of an element, when it has one.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<&SchemaElement> {
        self.element(id).parent.map(|p| self.element(p))
    }

    /// Number of elements in the schema.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True for a schema with no elements (never produced by the loader).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Derives the terminator candidates for `id` from its parent's
/// structure, order, and this element's position among its siblings.
///
/// Requires the parent's own `end_delimiters` to be computed already;
/// the loader walks the tree parents-first. Candidate ORDER is load-
/// bearing: the value scan stops at the first full match in this order.
pub(crate) fn derive_end_delimiters(
    elements: &[SchemaElement],
    id: ElementId,
) -> Vec<Terminator> {
    let element = &elements[id.0];
    let Some(parent_id) = element.parent else {
        // Root values run to end-of-input.
        return vec![None];
    };
    let parent = &elements[parent_id.0];

    match &parent.structure {
        Some(Structure::Delimited { delimiter, order }) => {
            if *order == ChildOrder::Postfix {
                return vec![Some(delimiter.clone())];
            }
            let last_child = parent.children.len() as u32 == element.sequence_number;
            if last_child {
                // The last prefix/infix child also ends where its parent
                // ends; a repeating one may instead be followed by
                // another repetition's delimiter.
                let mut candidates = Vec::new();
                if element.occurs.is_repeating() {
                    candidates.push(Some(delimiter.clone()));
                }
                candidates.extend(parent.end_delimiters.iter().cloned());
                candidates
            } else {
                vec![Some(delimiter.clone())]
            }
        }
        // Positional parents read by width; no terminators apply.
        _ => Vec::new(),
    }
}
