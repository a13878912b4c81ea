use std::io::{BufRead, Write};

use thiserror::Error;

pub mod element;
pub mod schema;

pub use element::Element;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("document is not well-formed XML: {0}")]
    Malformed(String),

    #[error("element <{element}>: {reason}")]
    Schema { element: String, reason: String },

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl XmlError {
    pub fn schema(element: impl Into<String>, reason: impl Into<String>) -> Self {
        XmlError::Schema {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

/// Parses a whole document into its root element.
pub fn read_document<R: BufRead>(rdr: R) -> Result<Element, XmlError> {
    element::read_tree(rdr)
}

pub fn read_document_str(text: &str) -> Result<Element, XmlError> {
    element::read_tree(text.as_bytes())
}

/// Writes `root` as an indented document with the usual XML declaration.
pub fn write_document<W: Write>(root: &Element, out: W) -> Result<(), XmlError> {
    element::write_tree(root, out)
}

pub fn write_document_string(root: &Element) -> Result<String, XmlError> {
    let mut buf = Vec::new();
    element::write_tree(root, &mut buf)?;
    String::from_utf8(buf).map_err(|e| XmlError::Malformed(e.to_string()))
}
