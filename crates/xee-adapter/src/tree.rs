//! XmlTree and MutableXmlTree implementations over the engine's xot arena

use xml_engine_traits::{
    error::{Error, Result},
    tree::{MutableXmlTree, NodeType, XmlTree},
};
use xot::{output, NameId, Node, Value, ValueType};

use crate::import::Importer;
use crate::xpath::XeeEngine;

impl XeeEngine {
    /// Qualified name of `name` as seen from `node`'s in-scope prefixes.
    ///
    /// Falls back to the local name when no prefix is bound, which happens
    /// for detached nodes whose declarations lived on a former ancestor.
    fn qualified_name(&self, node: Node, name: NameId) -> String {
        let xot = self.xot();
        xot.full_name(node, name)
            .unwrap_or_else(|_| xot.local_name_str(name).to_string())
    }

    /// Find the name id of an attribute already present on `element`
    fn attribute_name(&self, element: Node, name: &str) -> Option<NameId> {
        self.xot()
            .attributes(element)
            .keys()
            .find(|id| self.qualified_name(element, *id) == name)
    }

    /// Resolve `prefix:local` (or plain `local`) against `element`, adding
    /// the name to the arena when it is new.
    fn resolve_name(&mut self, element: Node, name: &str) -> Result<NameId> {
        let xot = self.xot_mut();
        match name.split_once(':') {
            None => Ok(xot.add_name(name)),
            Some((prefix, local)) => {
                let namespace = xot
                    .prefix(prefix)
                    .and_then(|prefix_id| xot.namespace_for_prefix(element, prefix_id))
                    .ok_or_else(|| {
                        Error::structure(format!("prefix '{prefix}' is not bound on the element"))
                    })?;
                Ok(xot.add_name_ns(local, namespace))
            }
        }
    }

    fn check_sibling_reference(&self, reference: Node) -> Result<()> {
        if self.node_type(&reference).is_child() {
            Ok(())
        } else {
            Err(Error::structure(
                "siblings can only be added next to child nodes",
            ))
        }
    }
}

impl XmlTree for XeeEngine {
    type Node = Node;

    fn parse_xml(&mut self, xml: &str) -> Result<Node> {
        self.xot_mut()
            .parse(xml)
            .map_err(|e| Error::XmlParse(e.to_string()))
    }

    fn document_element(&self, doc: &Node) -> Result<Node> {
        self.xot()
            .document_element(*doc)
            .map_err(|e| Error::node_access(e.to_string()))
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        self.xot().parent(*node)
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        self.xot().children(*node).collect()
    }

    fn attributes(&self, node: &Node) -> Vec<(String, String)> {
        if !self.xot().is_element(*node) {
            return Vec::new();
        }
        self.xot()
            .attributes(*node)
            .iter()
            .map(|(name, value)| (self.qualified_name(*node, name), value.clone()))
            .collect()
    }

    fn get_attribute(&self, node: &Node, name: &str) -> Option<String> {
        if !self.xot().is_element(*node) {
            return None;
        }
        let id = self.attribute_name(*node, name)?;
        self.xot().get_attribute(*node, id).map(str::to_string)
    }

    fn node_name(&self, node: &Node) -> Option<String> {
        let xot = self.xot();
        match xot.value(*node) {
            Value::Element(element) => Some(self.qualified_name(*node, element.name())),
            Value::Attribute(attribute) => {
                let scope = xot.parent(*node).unwrap_or(*node);
                Some(self.qualified_name(scope, attribute.name()))
            }
            Value::ProcessingInstruction(pi) => Some(xot.local_name_str(pi.target()).to_string()),
            Value::Namespace(namespace) => Some(xot.prefix_str(namespace.prefix()).to_string()),
            _ => None,
        }
    }

    fn node_value(&self, node: &Node) -> Option<String> {
        let xot = self.xot();
        match xot.value(*node) {
            Value::Text(text) => Some(text.get().to_string()),
            Value::Comment(comment) => Some(comment.get().to_string()),
            Value::ProcessingInstruction(pi) => pi.data().map(str::to_string),
            Value::Attribute(attribute) => Some(attribute.value().to_string()),
            Value::Namespace(namespace) => Some(xot.namespace_str(namespace.namespace()).to_string()),
            Value::Document | Value::Element(_) => None,
        }
    }

    fn text_content(&self, node: &Node) -> String {
        self.xot().string_value(*node)
    }

    fn node_type(&self, node: &Node) -> NodeType {
        match self.xot().value_type(*node) {
            ValueType::Document => NodeType::Document,
            ValueType::Element => NodeType::Element,
            ValueType::Text => NodeType::Text,
            ValueType::Comment => NodeType::Comment,
            ValueType::ProcessingInstruction => NodeType::ProcessingInstruction,
            ValueType::Attribute => NodeType::Attribute,
            ValueType::Namespace => NodeType::Namespace,
        }
    }

    fn serialize(&self, node: &Node, pretty: bool) -> Result<String> {
        match self.node_type(node) {
            // xot writes these only as part of their element
            NodeType::Attribute => {
                let name = self.node_name(node).unwrap_or_default();
                let value = self.node_value(node).unwrap_or_default();
                Ok(format!("{name}=\"{}\"", escape_attribute(&value)))
            }
            NodeType::Namespace => {
                let prefix = self.node_name(node).unwrap_or_default();
                let uri = self.node_value(node).unwrap_or_default();
                let name = if prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{prefix}")
                };
                Ok(format!("{name}=\"{}\"", escape_attribute(&uri)))
            }
            // xot looks up the parent of text to pick CDATA output
            NodeType::Text if self.parent(node).is_none() => {
                Ok(escape_text(&self.node_value(node).unwrap_or_default()))
            }
            _ => {
                let parameters = if pretty {
                    output::xml::Parameters {
                        indentation: Some(Default::default()),
                        ..Default::default()
                    }
                } else {
                    Default::default()
                };
                self.xot()
                    .serialize_xml_string(parameters, *node)
                    .map_err(|e| Error::Serialize(e.to_string()))
            }
        }
    }
}

impl MutableXmlTree for XeeEngine {
    fn create_document(&mut self) -> Node {
        self.xot_mut().new_document()
    }

    fn create_element(&mut self, name: &str) -> Result<Node> {
        if name.contains(':') {
            return Err(Error::structure(format!(
                "cannot create '{name}' without a namespace scope"
            )));
        }
        let xot = self.xot_mut();
        let name = xot.add_name(name);
        Ok(xot.new_element(name))
    }

    fn create_text(&mut self, text: &str) -> Node {
        self.xot_mut().new_text(text)
    }

    fn strip_whitespace(&mut self, node: &Node) {
        self.xot_mut().remove_insignificant_whitespace(*node);
    }

    fn clone_node(&mut self, node: &Node) -> Node {
        self.xot_mut().clone_node(*node)
    }

    fn import_node(&mut self, source: &Self, node: &Node) -> Result<Node> {
        Importer::new(source.xot(), self.xot_mut()).import_root(*node)
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<()> {
        self.xot_mut()
            .append(*parent, *child)
            .map_err(|e| Error::structure(e.to_string()))
    }

    fn insert_before(&mut self, reference: &Node, node: &Node) -> Result<()> {
        self.check_sibling_reference(*reference)?;
        self.xot_mut()
            .insert_before(*reference, *node)
            .map_err(|e| Error::structure(e.to_string()))
    }

    fn insert_after(&mut self, reference: &Node, node: &Node) -> Result<()> {
        self.check_sibling_reference(*reference)?;
        self.xot_mut()
            .insert_after(*reference, *node)
            .map_err(|e| Error::structure(e.to_string()))
    }

    fn detach(&mut self, node: &Node) -> Result<()> {
        self.xot_mut()
            .detach(*node)
            .map_err(|e| Error::structure(e.to_string()))
    }

    fn discard(&mut self, node: &Node) -> Result<()> {
        self.xot_mut()
            .remove(*node)
            .map_err(|e| Error::structure(e.to_string()))
    }

    fn set_attribute(&mut self, element: &Node, name: &str, value: &str) -> Result<()> {
        if !self.xot().is_element(*element) {
            return Err(Error::structure("attributes can only be set on elements"));
        }
        let name = match self.attribute_name(*element, name) {
            Some(existing) => existing,
            None => self.resolve_name(*element, name)?,
        };
        self.xot_mut().set_attribute(*element, name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, element: &Node, name: &str) -> Result<()> {
        if !self.xot().is_element(*element) {
            return Ok(());
        }
        if let Some(name) = self.attribute_name(*element, name) {
            self.xot_mut().remove_attribute(*element, name);
        }
        Ok(())
    }

    fn set_text_content(&mut self, node: &Node, text: &str) -> Result<()> {
        let node = *node;
        let xot = self.xot_mut();
        match xot.value_type(node) {
            ValueType::Element => {
                let children: Vec<Node> = xot.children(node).collect();
                for child in children {
                    xot.detach(child)
                        .map_err(|e| Error::structure(e.to_string()))?;
                }
                if !text.is_empty() {
                    xot.append_text(node, text)
                        .map_err(|e| Error::structure(e.to_string()))?;
                }
            }
            ValueType::Text => {
                if let Some(value) = xot.text_mut(node) {
                    value.set(text);
                }
            }
            ValueType::Attribute => {
                if let Some(attribute) = xot.attribute_node_mut(node) {
                    attribute.set_value(text);
                }
            }
            ValueType::Comment => {
                if let Some(comment) = xot.comment_mut(node) {
                    comment
                        .set(text)
                        .map_err(|e| Error::structure(e.to_string()))?;
                }
            }
            ValueType::Document | ValueType::ProcessingInstruction | ValueType::Namespace => {}
        }
        Ok(())
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
