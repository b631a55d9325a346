//! XML tree abstraction traits

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace node
    Namespace,
}

impl NodeType {
    /// Whether nodes of this type live in a parent's child list.
    ///
    /// Attributes and namespace declarations hang off their element
    /// instead, and documents have no parent at all.
    pub fn is_child(self) -> bool {
        matches!(
            self,
            NodeType::Element
                | NodeType::Text
                | NodeType::Comment
                | NodeType::ProcessingInstruction
        )
    }
}

/// Read access to an XML tree.
///
/// Node handles are cheap `Copy` values pointing into storage owned by the
/// implementor. A handle is only meaningful for the tree that produced it.
pub trait XmlTree {
    /// Type representing a node handle in this tree
    type Node: Copy + Eq + Hash + Debug;

    /// Parse a well-formed XML document and return its document node
    fn parse_xml(&mut self, xml: &str) -> Result<Self::Node>;

    /// Get the document element (root element) of a document node
    fn document_element(&self, doc: &Self::Node) -> Result<Self::Node>;

    /// Get the parent of a node, if it has one.
    ///
    /// The parent of an attribute is the element carrying it.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Get the child nodes of a node, in document order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Get all attributes of an element node as (qualified name, value) pairs
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    /// Look up a single attribute by qualified name
    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Get the qualified name of a node (if applicable)
    fn node_name(&self, node: &Self::Node) -> Option<String>;

    /// Get the value of a node: text, comment and attribute content, or
    /// processing instruction data
    fn node_value(&self, node: &Self::Node) -> Option<String>;

    /// Get the concatenated descendant text of a node
    fn text_content(&self, node: &Self::Node) -> String;

    /// Get the type of a node
    fn node_type(&self, node: &Self::Node) -> NodeType;

    /// Serialize a node to an XML string, optionally indented
    fn serialize(&self, node: &Self::Node, pretty: bool) -> Result<String>;
}

/// Trees that can be changed in place.
pub trait MutableXmlTree: XmlTree {
    /// Create a new empty document node
    fn create_document(&mut self) -> Self::Node;

    /// Create a new unattached element node.
    ///
    /// `name` may be prefixed; the prefix is resolved once the element is
    /// attached below an element declaring it.
    fn create_element(&mut self, name: &str) -> Result<Self::Node>;

    /// Create a new unattached text node
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Drop whitespace-only text nodes below `node` that carry no content
    fn strip_whitespace(&mut self, node: &Self::Node);

    /// Deep copy of a node within this tree. The copy is unattached.
    fn clone_node(&mut self, node: &Self::Node) -> Self::Node;

    /// Recreate a node (with its subtree) from another tree inside this one.
    /// The result is unattached.
    fn import_node(&mut self, source: &Self, node: &Self::Node) -> Result<Self::Node>;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Insert `node` as the previous sibling of `reference`
    fn insert_before(&mut self, reference: &Self::Node, node: &Self::Node) -> Result<()>;

    /// Insert `node` as the next sibling of `reference`
    fn insert_after(&mut self, reference: &Self::Node, node: &Self::Node) -> Result<()>;

    /// Unlink a node from its parent. The node (and its handle) stays usable.
    fn detach(&mut self, node: &Self::Node) -> Result<()>;

    /// Free a node and its subtree. The handle must not be used afterwards.
    fn discard(&mut self, node: &Self::Node) -> Result<()>;

    /// Set an attribute on an element, creating it when absent
    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// Remove an attribute from an element. Absent attributes are ignored.
    fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<()>;

    /// Replace the textual content of a node.
    ///
    /// Elements lose all their children (and get a single text child when
    /// `text` is not empty); text, comment and attribute nodes get a new
    /// value.
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<()>;
}
