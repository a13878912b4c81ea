use std::io::{BufRead, Write};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::XmlError;

/// A single element of a parsed document tree. Attribute order is the
/// document order, children keep their document order as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.into(),
            None => self.attrs.push((key.to_owned(), value.into())),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn expect_child(&self, name: &str) -> Result<&Element, XmlError> {
        self.child(name)
            .ok_or_else(|| XmlError::schema(&self.name, format!("missing required child <{}>", name)))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Entries of a list container, i.e. all `<Item>` children.
    pub fn items(&self) -> impl Iterator<Item = &Element> {
        self.children_named("Item")
    }

    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || !self.text.is_empty()
    }
}

pub(crate) fn read_tree<R: BufRead>(rdr: R) -> Result<Element, XmlError> {
    let mut reader = Reader::from_reader(rdr);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Start(ref e) => {
                stack.push(element_from_start(e)?);
            }
            Event::Empty(ref e) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unbalanced closing tag".to_owned()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref t) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                if let Some(top) = stack.last_mut() {
                    if !top.text.is_empty() {
                        top.text.push('\n');
                    }
                    top.text.push_str(&text);
                }
            }
            Event::CData(ref t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed("unexpected end of document".to_owned()));
    }
    root.ok_or_else(|| XmlError::Malformed("document has no root element".to_owned()))
}

fn element_from_start(e: &BytesStart) -> Result<Element, XmlError> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlError::Malformed("multiple root elements".to_owned())),
    }
    Ok(())
}

pub(crate) fn write_tree<W: Write>(root: &Element, out: W) -> Result<(), XmlError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;
    Ok(())
}

fn write_error<E: std::fmt::Display>(err: E) -> XmlError {
    XmlError::IOError(std::io::Error::other(err.to_string()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.has_content() {
        writer.write_event(Event::Start(start)).map_err(write_error)?;
        if !element.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&element.text)))
                .map_err(write_error)?;
        }
        for child in &element.children {
            write_element(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(element.name.as_str())))
            .map_err(write_error)?;
    } else {
        writer.write_event(Event::Empty(start)).map_err(write_error)?;
    }
    Ok(())
}
