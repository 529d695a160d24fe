/*!
 * Minimal owned XML tree for OOXML parts.
 *
 * Document parts are parsed into this tree, mutated in place (text
 * replacement, run reconstruction) and serialized back. Unknown elements,
 * attributes and processing instructions survive the round trip untouched,
 * which is what keeps non-text formatting intact.
 */

use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::DocumentError;

/// Captured XML declaration (`<?xml version="1.0" ...?>`)
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDecl {
    /// XML version string
    pub version: String,
    /// Declared encoding, if any
    pub encoding: Option<String>,
    /// Declared standalone flag, if any
    pub standalone: Option<String>,
}

impl Default for XmlDecl {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: Some("yes".to_string()),
        }
    }
}

/// One node in the tree. Text and attribute values are stored unescaped.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Character data
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment (content between `<!--` and `-->`)
    Comment(String),
    /// Processing instruction (content between `<?` and `?>`)
    ProcessingInstruction(String),
}

/// An element with its qualified name, attributes and children in
/// document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as it appears in the source (`a:rPr`, `w:t`, ...)
    pub name: String,
    /// Attributes in source order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without the namespace prefix (`a:rPr` -> `rPr`).
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Look up an attribute by exact qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Iterate over element children only, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Mutable variant of [`child_elements`](Self::child_elements).
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements()
            .find(|element| element.local_name() == local_name)
    }

    /// Mutable variant of [`child`](Self::child).
    pub fn child_mut(&mut self, local_name: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut()
            .find(|element| element.local_name() == local_name)
    }

    /// All child elements with the given local name, in document order.
    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements()
            .filter(move |element| element.local_name() == local_name)
    }

    /// Concatenated text content of this element and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
                _ => {}
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![XmlNode::Text(text.into())];
    }
}

/// A parsed XML part: declaration (if present) plus the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// The declaration from the source, re-emitted on serialization
    pub decl: Option<XmlDecl>,
    /// Document root
    pub root: XmlElement,
}

impl XmlDocument {
    /// Parse a part's XML into a tree.
    ///
    /// `part` names the package part in error messages.
    pub fn parse(xml: &str, part: &str) -> Result<Self, DocumentError> {
        let malformed = |message: String| DocumentError::MalformedXml {
            part: part.to_string(),
            message,
        };

        let mut reader = Reader::from_str(xml);
        let mut decl = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        // Appends a finished node to the open element, or records the root
        // when the stack is empty.
        fn attach(
            stack: &mut [XmlElement],
            root: &mut Option<XmlElement>,
            node: XmlNode,
        ) {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            } else if let XmlNode::Element(element) = node {
                root.get_or_insert(element);
            }
            // Whitespace and comments outside the root are dropped.
        }

        loop {
            match reader.read_event() {
                Ok(Event::Decl(d)) => {
                    let version = String::from_utf8_lossy(
                        d.version().map_err(|e| malformed(e.to_string()))?.as_ref(),
                    )
                    .into_owned();
                    let encoding = match d.encoding() {
                        Some(result) => Some(
                            String::from_utf8_lossy(
                                result.map_err(|e| malformed(e.to_string()))?.as_ref(),
                            )
                            .into_owned(),
                        ),
                        None => None,
                    };
                    let standalone = match d.standalone() {
                        Some(result) => Some(
                            String::from_utf8_lossy(
                                result.map_err(|e| malformed(e.to_string()))?.as_ref(),
                            )
                            .into_owned(),
                        ),
                        None => None,
                    };
                    decl = Some(XmlDecl {
                        version,
                        encoding,
                        standalone,
                    });
                }
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e, &malformed)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from_start(&e, &malformed)?;
                    attach(&mut stack, &mut root, XmlNode::Element(element));
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("unbalanced closing tag".to_string()))?;
                    attach(&mut stack, &mut root, XmlNode::Element(element));
                }
                Ok(Event::Text(t)) => {
                    let raw = std::str::from_utf8(t.as_ref())
                        .map_err(|e| malformed(e.to_string()))?;
                    let text = quick_xml::escape::unescape(raw)
                        .map_err(|e| malformed(e.to_string()))?
                        .into_owned();
                    attach(&mut stack, &mut root, XmlNode::Text(text));
                }
                Ok(Event::CData(t)) => {
                    let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                    attach(&mut stack, &mut root, XmlNode::CData(text));
                }
                Ok(Event::Comment(t)) => {
                    let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                    attach(&mut stack, &mut root, XmlNode::Comment(text));
                }
                Ok(Event::PI(t)) => {
                    let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                    attach(&mut stack, &mut root, XmlNode::ProcessingInstruction(text));
                }
                Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(e.to_string())),
            }
        }

        if !stack.is_empty() {
            return Err(malformed("unclosed element at end of input".to_string()));
        }
        let root = root.ok_or_else(|| malformed("no root element".to_string()))?;
        Ok(Self { decl, root })
    }

    /// Serialize the tree back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        if let Some(decl) = &self.decl {
            writer
                .write_event(Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    decl.standalone.as_deref(),
                )))
                .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        }
        write_element(&mut writer, &self.root)
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        Ok(writer.into_inner().into_inner())
    }
}

fn element_from_start(
    e: &BytesStart<'_>,
    malformed: &impl Fn(String) -> DocumentError,
) -> Result<XmlElement, DocumentError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &XmlElement,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            XmlNode::CData(text) => {
                writer.write_event(Event::CData(BytesCData::new(text.as_str())))?;
            }
            XmlNode::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
            XmlNode::ProcessingInstruction(text) => {
                writer.write_event(Event::PI(BytesPI::new(text.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
