//! Standalone content for insertion operations

use xee_adapter::XeeEngine;
use xml_engine_traits::{XPathEngine, XmlTree};

use crate::error::{Error, Result};

/// A piece of content living in its own engine.
///
/// Insertion operations never link a fragment's node into a document
/// directly: it is imported into the target document first and then
/// copied once per destination, so a single fragment can be inserted any
/// number of times.
pub struct Fragment<E: XPathEngine = XeeEngine> {
    engine: E,
    root: E::Node,
}

impl<E: XPathEngine + Default> Fragment<E> {
    /// Parse markup with a single root element.
    ///
    /// Whitespace-only text between elements is dropped.
    pub fn parse(markup: &str) -> Result<Self> {
        let mut engine = E::default();
        let document = engine
            .parse_xml(markup)
            .map_err(|e| Error::Load(e.to_string()))?;
        engine.strip_whitespace(&document);
        let root = engine.document_element(&document)?;
        Ok(Self { engine, root })
    }

    /// An empty element
    pub fn element(name: &str) -> Result<Self> {
        let mut engine = E::default();
        let root = engine.create_element(name)?;
        Ok(Self { engine, root })
    }

    /// A bare text node
    pub fn text(text: &str) -> Self {
        let mut engine = E::default();
        let root = engine.create_text(text);
        Self { engine, root }
    }
}

impl<E: XPathEngine> Fragment<E> {
    pub(crate) fn from_parts(engine: E, root: E::Node) -> Self {
        Self { engine, root }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn root(&self) -> E::Node {
        self.root
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(self.engine.serialize(&self.root, false)?)
    }
}

impl<E: XPathEngine> std::fmt::Debug for Fragment<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment").field("root", &self.root).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_keeps_single_root() {
        let fragment: Fragment = Fragment::parse("<note>\n  <b>hi</b>\n</note>").unwrap();
        assert_eq!(fragment.to_xml().unwrap(), "<note><b>hi</b></note>");
    }

    #[test]
    fn malformed_markup_is_load_error() {
        let result = Fragment::<XeeEngine>::parse("<note>");
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn element_and_text() {
        let element: Fragment = Fragment::element("empty").unwrap();
        assert_eq!(element.to_xml().unwrap(), "<empty/>");

        let text: Fragment = Fragment::text("a & b");
        assert_eq!(text.to_xml().unwrap(), "a &amp; b");
    }
}
