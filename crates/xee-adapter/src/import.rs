//! Copying subtrees from one xot arena into another

use xml_engine_traits::error::{Error, Result};
use xot::{NameId, NamespaceId, Node, PrefixId, Value, Xot};

/// Recreates nodes of `source` inside `target`, re-interning every name,
/// namespace and prefix on the way.
pub(crate) struct Importer<'a> {
    source: &'a Xot,
    target: &'a mut Xot,
}

impl<'a> Importer<'a> {
    pub(crate) fn new(source: &'a Xot, target: &'a mut Xot) -> Self {
        Self { source, target }
    }

    /// Import `node` and its subtree.
    ///
    /// Prefixes declared on the source ancestors of an element are
    /// redeclared on the copy so it serializes on its own.
    pub(crate) fn import_root(&mut self, node: Node) -> Result<Node> {
        let source = self.source;
        let imported = self.import(node)?;
        if !source.is_element(node) {
            return Ok(imported);
        }
        for ancestor in source.ancestors(node).skip(1) {
            if !source.is_element(ancestor) {
                continue;
            }
            for (prefix, namespace) in source.namespaces(ancestor).iter() {
                let prefix = self.prefix(prefix);
                if self.target.namespaces(imported).contains_key(prefix) {
                    continue;
                }
                let namespace = self.namespace(*namespace);
                self.target
                    .namespaces_mut(imported)
                    .insert(prefix, namespace);
            }
        }
        Ok(imported)
    }

    fn import(&mut self, node: Node) -> Result<Node> {
        let source = self.source;
        let imported = match source.value(node) {
            Value::Document => self.target.new_document(),
            Value::Element(element) => {
                let name = self.name(element.name());
                let imported = self.target.new_element(name);
                for (prefix, namespace) in source.namespaces(node).iter() {
                    let prefix = self.prefix(prefix);
                    let namespace = self.namespace(*namespace);
                    self.target
                        .namespaces_mut(imported)
                        .insert(prefix, namespace);
                }
                for (name, value) in source.attributes(node).iter() {
                    let name = self.name(name);
                    self.target
                        .attributes_mut(imported)
                        .insert(name, value.clone());
                }
                imported
            }
            Value::Text(text) => self.target.new_text(text.get()),
            Value::Comment(comment) => self.target.new_comment(comment.get()),
            Value::ProcessingInstruction(pi) => {
                let target = self.name(pi.target());
                self.target.new_processing_instruction(target, pi.data())
            }
            Value::Attribute(attribute) => {
                let name = self.name(attribute.name());
                self.target
                    .new_attribute_node(name, attribute.value().to_string())
            }
            Value::Namespace(namespace) => {
                let prefix = self.prefix(namespace.prefix());
                let uri = self.namespace(namespace.namespace());
                self.target.new_namespace_node(prefix, uri)
            }
        };
        for child in source.children(node) {
            let child = self.import(child)?;
            self.target
                .append(imported, child)
                .map_err(|e| Error::structure(e.to_string()))?;
        }
        Ok(imported)
    }

    fn name(&mut self, name: NameId) -> NameId {
        let (local, uri) = self.source.name_ns_str(name);
        if uri.is_empty() {
            self.target.add_name(local)
        } else {
            let namespace = self.target.add_namespace(uri);
            self.target.add_name_ns(local, namespace)
        }
    }

    fn namespace(&mut self, namespace: NamespaceId) -> NamespaceId {
        self.target
            .add_namespace(self.source.namespace_str(namespace))
    }

    fn prefix(&mut self, prefix: PrefixId) -> PrefixId {
        let prefix = self.source.prefix_str(prefix);
        if prefix.is_empty() {
            self.target.empty_prefix()
        } else {
            self.target.add_prefix(prefix)
        }
    }
}
