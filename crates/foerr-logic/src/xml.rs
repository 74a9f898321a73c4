//! Small helpers over `xmltree` for the Remains data files.

use thiserror::Error;
use xmltree::Element;

use crate::diagnostics::Diagnostics;

#[derive(Debug, Error)]
#[error("XML document is malformed: {0}")]
pub struct XmlError(#[from] xmltree::ParseError);

/// Parse a whole XML document and return its root element.
pub fn parse_document(text: &str) -> Result<Element, XmlError> {
    Ok(Element::parse(text.as_bytes())?)
}

/// Direct child elements called `name`, in document order.
pub fn children_named<'a>(
    parent: &'a Element,
    name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(move |child| child.name == name)
}

pub fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element.attributes.get(name).map(String::as_str)
}

/// Integer attribute. A value that is present but not an integer is reported
/// as a warning and treated as absent.
pub fn attr_int(element: &Element, name: &str, owner: &str, diag: &mut Diagnostics) -> Option<i32> {
    let raw = attr(element, name)?;
    match raw.trim().parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            diag.warn(
                "xml",
                format!("{owner}: attribute {name}={raw:?} is not an integer, ignoring"),
            );
            None
        }
    }
}
