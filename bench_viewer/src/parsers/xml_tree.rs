use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Errors raised while building an element tree from XML text
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Document has more than one root element (second root: <{name}>)")]
    MultipleRoots { name: String },

    #[error("Element <{name}> is never closed")]
    UnclosedElement { name: String },
}

/// A single XML element with its attributes and child elements.
///
/// Text content is not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// This element and all elements below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All elements named `name` in document order, including this element.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }
}

/// Pre-order traversal over an element subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parse XML text into its root element.
pub fn parse_tree(input: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                open.push(element_from_start(&reader, &start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&reader, &start)?;
                attach(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                // The reader verifies that end tags match their start tags.
                if let Some(element) = open.pop() {
                    attach(element, &mut open, &mut root)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(DocumentError::UnclosedElement {
            name: unclosed.name,
        });
    }

    root.ok_or(DocumentError::MissingRoot)
}

fn element_from_start(reader: &Reader<&[u8]>, start: &BytesStart) -> Result<Element, DocumentError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    element: Element,
    open: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), DocumentError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DocumentError::MultipleRoots { name: element.name });
        }
    }
    Ok(())
}
