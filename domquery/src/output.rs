//! Output representations of a document or a result set

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xee_adapter::XeeEngine;
use xml_engine_traits::{NodeType, XPathEngine, XmlTree};

use crate::error::Result;
use crate::query::DocumentQuery;

/// Name of the wrapper element holding saved results
pub const RESULTS_ELEMENT: &str = "results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A new, independent [`DocumentQuery`]
    Dom,
    /// Serialized markup
    #[default]
    Markup,
    /// Plain [`ElementView`] trees
    Views,
}

pub enum Output<E: XPathEngine = XeeEngine> {
    Dom(DocumentQuery<E>),
    Markup(String),
    Views(Vec<ElementView>),
}

impl<E: XPathEngine> std::fmt::Debug for Output<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Dom(query) => f
                .debug_tuple("Dom")
                .field(&query.document_node())
                .finish(),
            Output::Markup(markup) => f.debug_tuple("Markup").field(markup).finish(),
            Output::Views(views) => f.debug_tuple("Views").field(views).finish(),
        }
    }
}

/// A detached, serializable snapshot of a node and its element children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementView {
    pub kind: NodeType,
    /// Element or attribute name, processing instruction target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// For elements the direct text children joined, otherwise the node value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementView>,
}

impl ElementView {
    pub fn build<T: XmlTree>(tree: &T, node: &T::Node) -> Self {
        let kind = tree.node_type(node);
        match kind {
            NodeType::Element | NodeType::Document => {
                let mut text = String::new();
                let mut children = Vec::new();
                for child in tree.children(node) {
                    match tree.node_type(&child) {
                        NodeType::Text => text.push_str(&tree.node_value(&child).unwrap_or_default()),
                        NodeType::Element => children.push(Self::build(tree, &child)),
                        _ => {}
                    }
                }
                Self {
                    kind,
                    name: tree.node_name(node),
                    attributes: tree.attributes(node).into_iter().collect(),
                    text: (!text.is_empty()).then_some(text),
                    children,
                }
            }
            _ => Self {
                kind,
                name: tree.node_name(node),
                attributes: BTreeMap::new(),
                text: tree.node_value(node),
                children: Vec::new(),
            },
        }
    }
}

impl<E: XPathEngine + Default> DocumentQuery<E> {
    /// The whole document in the requested shape.
    ///
    /// Views holds a single entry, the document element.
    pub fn save(&self, format: OutputFormat) -> Result<Output<E>> {
        match format {
            OutputFormat::Dom => {
                let mut copy = DocumentQuery::with_engine(E::default()).with_options(self.options);
                if let Some(document) = self.document {
                    copy.document = Some(copy.engine.import_node(&self.engine, &document)?);
                }
                Ok(Output::Dom(copy))
            }
            OutputFormat::Markup => Ok(Output::Markup(self.to_xml()?)),
            OutputFormat::Views => {
                let views = match self.document {
                    Some(document) => {
                        let root = self.engine.document_element(&document)?;
                        vec![ElementView::build(&self.engine, &root)]
                    }
                    None => Vec::new(),
                };
                Ok(Output::Views(views))
            }
        }
    }

    /// The active cursor's nodes in the requested shape.
    ///
    /// As a document, matched nodes are copied below a `<results>` root;
    /// matched attributes become attributes of that root.
    pub fn save_results(&self, format: OutputFormat) -> Result<Output<E>> {
        match format {
            OutputFormat::Dom => {
                let mut copy = DocumentQuery::with_engine(E::default()).with_options(self.options);
                let document = copy.engine.create_document();
                let root = copy.engine.create_element(RESULTS_ELEMENT)?;
                copy.engine.append_child(&document, &root)?;
                for node in self.results.nodes() {
                    match self.engine.node_type(node) {
                        NodeType::Attribute => {
                            let name = self.engine.node_name(node).unwrap_or_default();
                            let value = self.engine.node_value(node).unwrap_or_default();
                            copy.engine.set_attribute(&root, &name, &value)?;
                        }
                        NodeType::Namespace => {}
                        NodeType::Document => {
                            let element = self.engine.document_element(node)?;
                            let imported = copy.engine.import_node(&self.engine, &element)?;
                            copy.engine.append_child(&root, &imported)?;
                        }
                        _ => {
                            let imported = copy.engine.import_node(&self.engine, node)?;
                            copy.engine.append_child(&root, &imported)?;
                        }
                    }
                }
                copy.document = Some(document);
                Ok(Output::Dom(copy))
            }
            OutputFormat::Markup => Ok(Output::Markup(self.results_xml()?)),
            OutputFormat::Views => Ok(Output::Views(
                self.results
                    .nodes()
                    .iter()
                    .map(|node| ElementView::build(&self.engine, node))
                    .collect(),
            )),
        }
    }
}
