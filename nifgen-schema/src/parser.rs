//! nif.xml reader.
//!
//! This module turns the XML document into a small owned element tree.
//! Interpretation of the elements happens in [`crate::context`]; keeping the
//! reader generic lets the predicates look at raw attribute maps.

use crate::error::ParseError;
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// Attributes of one element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: IndexMap<String, String>,
}

impl Attributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the value of `key`, or a missing attribute error naming
    /// `element`.
    ///
    /// # Errors
    /// Returns [`ParseError::MissingAttribute`] if `key` is absent.
    pub fn require(&self, element: &str, key: &str) -> Result<&str, ParseError> {
        self.get(key)
            .ok_or_else(|| ParseError::missing_attr(element, key))
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// One XML element with its attributes, leading text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Attributes.
    pub attributes: Attributes,
    /// Text appearing before the first child element.
    pub text: String,
    /// Child elements.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with no text and no children.
    #[must_use]
    pub fn new(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Returns the value of attribute `key`, if present.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    /// Returns attribute `key`, failing with an error naming this element.
    ///
    /// # Errors
    /// Returns [`ParseError::MissingAttribute`] if `key` is absent.
    pub fn require(&self, key: &str) -> Result<&str, ParseError> {
        self.attributes.require(&self.tag, key)
    }
}

/// A parsed nif.xml document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Value of the root element's `version` attribute.
    pub version: Option<String>,
    /// Top-level entries (children of the root element).
    pub entries: Vec<Element>,
}

/// Parses a nif.xml document from a string.
///
/// # Arguments
/// * `xml` - XML document content
///
/// # Returns
/// The root's version attribute and its child elements.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or has no root element.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    // Text is trimmed per element, not per event, so entity references
    // keep the spaces around them.
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(parse_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = parse_element(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        let raw = std::str::from_utf8(t.as_ref())?;
                        current.text.push_str(&unescape(raw)?);
                    }
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        let name = std::str::from_utf8(r.as_ref())?;
                        current.text.push_str(&unescape(&format!("&{name};"))?);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some(mut element) = stack.pop() {
                    element.text = element.text.trim().to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let root = root.ok_or_else(|| ParseError::InvalidStructure {
        message: "document has no root element".to_string(),
    })?;

    Ok(Document {
        version: root.attr("version").map(str::to_string),
        entries: root.children,
    })
}

/// Reads an element's name and attributes.
fn parse_element(e: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let tag = std::str::from_utf8(&name_bytes)?;

    let mut attributes = Attributes::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attributes.insert(key, unescape(value)?.into_owned());
    }

    Ok(Element::new(tag, attributes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<niftoolsxml version="0.9.3.0">
    <version id="V20_2_0_7" num="20.2.0.7">Wizard101</version>
    <enum name="AlphaFunction" storage="byte" prefix="ALPHA">
        Describes alpha blend modes.
        <option value="0" name="ONE" />
        <option value="1" name="ZERO" />
    </enum>
    <struct name="Color3">
        <field name="r" type="float" />
        <field name="Has Data" type="bool" cond="Num &gt; 0" />
    </struct>
</niftoolsxml>"#;

    #[test]
    fn test_parse_root_version() {
        let doc = parse_document(SIMPLE_DOC).expect("Failed to parse document");
        assert_eq!(doc.version.as_deref(), Some("0.9.3.0"));
        assert_eq!(doc.entries.len(), 3);
    }

    #[test]
    fn test_parse_element_tree() {
        let doc = parse_document(SIMPLE_DOC).expect("Failed to parse document");

        let alpha = &doc.entries[1];
        assert_eq!(alpha.tag, "enum");
        assert_eq!(alpha.attr("prefix"), Some("ALPHA"));
        assert_eq!(alpha.text, "Describes alpha blend modes.");
        assert_eq!(alpha.children.len(), 2);
        assert_eq!(alpha.children[1].attr("name"), Some("ZERO"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let doc = parse_document(SIMPLE_DOC).expect("Failed to parse document");
        let color = &doc.entries[2];
        assert_eq!(color.children[1].attr("cond"), Some("Num > 0"));
    }

    #[test]
    fn test_entity_references_keep_surrounding_spaces() {
        let doc = parse_document(
            "<niftoolsxml><enum name=\"E\">\n    Value is &lt; 4 and &gt; 1.\n    <option value=\"0\" name=\"A\" /></enum></niftoolsxml>",
        )
        .expect("Failed to parse document");
        assert_eq!(doc.entries[0].text, "Value is < 4 and > 1.");
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        let doc = parse_document(SIMPLE_DOC).expect("Failed to parse document");
        assert_eq!(doc.entries[2].text, "");
    }

    #[test]
    fn test_require_reports_element() {
        let doc = parse_document(SIMPLE_DOC).expect("Failed to parse document");
        let err = doc.entries[2].require("storage").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingAttribute { ref element, ref attribute }
                if element == "struct" && attribute == "storage"
        ));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = parse_document("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_attributes_from_iter() {
        let attrs: Attributes = [("name", "Foo"), ("since", "20.0.0.4")]
            .into_iter()
            .collect();
        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains("since"));
        assert_eq!(attrs.get("name"), Some("Foo"));
    }
}
