//! Hierarchical document model consumed by the encoder.
//!
//! [`XmlNode`] is a plain tree of named nodes with attributes and text.
//! Parsing resolves namespaces with an explicit scope stack so that both
//! default (`xmlns="…"`) and prefixed (`xmlns:p="…"`) declarations map
//! element and attribute names to their namespace URIs.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{FormatError, Result};

/// An attribute of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Local name.
    pub name: String,
    /// Namespace URI, when the attribute carries a resolvable prefix.
    pub namespace: Option<String>,
    /// Unescaped attribute value.
    pub value: String,
}

/// A node in a parsed document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local element name.
    pub name: String,
    /// Namespace URI; `None` when the element is in no namespace.
    pub namespace: Option<String>,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<XmlAttribute>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Text content, unescaped; `None` when the element holds no text.
    pub text: Option<String>,
}

/// One lexical scope of namespace declarations: prefix (or `None` for the
/// default namespace) to URI.
type NsScope = Vec<(Option<String>, String)>;

impl XmlNode {
    /// Parses a document from text into a node tree.
    ///
    /// # Errors
    /// Returns [`FormatError::Document`] for malformed XML.
    pub fn parse(text: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(text);
        let mut buf = Vec::new();
        let mut scopes: Vec<NsScope> = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(FormatError::document)? {
                Event::Start(ref e) => {
                    let node = open_node(e, &mut scopes)?;
                    stack.push(node);
                }
                Event::Empty(ref e) => {
                    let node = open_node(e, &mut scopes)?;
                    scopes.pop();
                    close_node(node, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    scopes.pop();
                    let node = stack.pop().ok_or_else(|| {
                        FormatError::document("unexpected closing tag")
                    })?;
                    close_node(node, &mut stack, &mut root)?;
                }
                Event::Text(ref t) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t.as_ref())
                            .map_err(FormatError::document)?;
                        let text = unescape(raw).map_err(FormatError::document)?;
                        if !text.trim().is_empty() {
                            current.text.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Event::CData(ref t) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(t.as_ref())
                            .map_err(FormatError::document)?;
                        current.text.get_or_insert_with(String::new).push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        root.ok_or_else(|| FormatError::document("no root element"))
    }

    /// Child elements matching a local name and namespace.
    pub fn matching_children(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|c| c.name == name && c.namespace.as_deref() == namespace)
            .collect()
    }

    /// Values of attributes matching a local name and namespace.
    pub fn matching_attributes(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.name == name && a.namespace.as_deref() == namespace)
            .map(|a| a.value.as_str())
            .collect()
    }
}

/// Builds a node from a start tag, pushing its namespace scope.
fn open_node(e: &BytesStart<'_>, scopes: &mut Vec<NsScope>) -> Result<XmlNode> {
    let mut scope: NsScope = Vec::new();
    let mut attributes: Vec<(Option<String>, String, String)> = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(FormatError::document)?;
        let key_local = std::str::from_utf8(attr.key.local_name().as_ref())
            .map_err(FormatError::document)?
            .to_string();
        let key_prefix = match attr.key.prefix() {
            Some(p) => Some(
                std::str::from_utf8(p.as_ref())
                    .map_err(FormatError::document)?
                    .to_string(),
            ),
            None => None,
        };
        let raw = std::str::from_utf8(&attr.value).map_err(FormatError::document)?;
        let value = unescape(raw).map_err(FormatError::document)?.into_owned();

        match key_prefix.as_deref() {
            // xmlns="uri" — default namespace declaration.
            None if key_local == "xmlns" => scope.push((None, value)),
            // xmlns:p="uri" — prefixed declaration.
            Some("xmlns") => scope.push((Some(key_local), value)),
            _ => attributes.push((key_prefix, key_local, value)),
        }
    }

    scopes.push(scope);

    let name_local = std::str::from_utf8(e.name().local_name().as_ref())
        .map_err(FormatError::document)?
        .to_string();
    let name_prefix = match e.name().prefix() {
        Some(p) => Some(
            std::str::from_utf8(p.as_ref())
                .map_err(FormatError::document)?
                .to_string(),
        ),
        None => None,
    };

    let namespace = resolve(scopes, name_prefix.as_deref(), true);
    let attributes = attributes
        .into_iter()
        .map(|(prefix, name, value)| XmlAttribute {
            // Unprefixed attributes are in no namespace.
            namespace: prefix
                .as_deref()
                .and_then(|p| resolve(scopes, Some(p), false)),
            name,
            value,
        })
        .collect();

    Ok(XmlNode {
        name: name_local,
        namespace,
        attributes,
        children: Vec::new(),
        text: None,
    })
}

/// Attaches a finished node to its parent, or installs it as the root.
fn close_node(
    node: XmlNode,
    stack: &mut Vec<XmlNode>,
    root: &mut Option<XmlNode>,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(FormatError::document("multiple root elements"));
    } else {
        *root = Some(node);
    }
    Ok(())
}

/// Resolves a prefix against the scope stack, innermost scope first.
///
/// With `use_default` the unprefixed form resolves to the default
/// namespace; attributes pass `false` since unprefixed attributes carry
/// no namespace. An empty URI (from `xmlns=""`) resolves to `None`.
fn resolve(scopes: &[NsScope], prefix: Option<&str>, use_default: bool) -> Option<String> {
    if prefix.is_none() && !use_default {
        return None;
    }
    for scope in scopes.iter().rev() {
        for (declared, uri) in scope.iter().rev() {
            if declared.as_deref() == prefix {
                if uri.is_empty() {
                    return None;
                }
                return Some(uri.clone());
            }
        }
    }
    None
}
