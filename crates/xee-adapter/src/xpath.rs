//! XPathEngine implementation for xee

use xee_interpreter::context::DocumentsRef;
use xee_xpath::query::SequenceQuery;
use xee_xpath::{Documents, Item, Queries, Query};
use xml_engine_traits::{
    error::{Error, Result},
    xpath::XPathEngine,
};
use xot::{Node, Xot};

/// xee XPath 3.1 engine over a single mutable xot arena.
///
/// Every tree handled by one engine lives in the same arena, so node
/// handles from different documents of one engine may be mixed freely.
/// Handles from another engine may not; use `import_node` to bring them
/// over.
#[derive(Debug)]
pub struct XeeEngine {
    documents: Documents,
}

impl XeeEngine {
    /// Create a new XeeEngine
    pub fn new() -> Self {
        Self {
            documents: Documents::new(),
        }
    }

    /// Get a reference to the underlying Xot
    pub fn xot(&self) -> &Xot {
        self.documents.xot()
    }

    /// Get a mutable reference to the underlying Xot
    pub fn xot_mut(&mut self) -> &mut Xot {
        self.documents.xot_mut()
    }
}

impl Default for XeeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathEngine for XeeEngine {
    type Query = SequenceQuery;

    fn compile_xpath(&self, xpath: &str) -> Result<Self::Query> {
        Queries::default()
            .sequence(xpath)
            .map_err(|e| Error::xpath_compile(format!("{xpath}: {e}")))
    }

    fn evaluate(&mut self, query: &Self::Query, context_node: &Node) -> Result<Vec<Node>> {
        let context_node = *context_node;
        // xee caches document order per documents handle; a fresh handle
        // keeps ordering correct after the tree has been mutated.
        let sequence = query
            .execute_build_context(&mut self.documents, |builder| {
                builder.context_node(context_node);
                builder.documents(DocumentsRef::new());
            })
            .map_err(|e| Error::xpath_eval(e.to_string()))?;

        sequence
            .iter()
            .map(|item| match item {
                Item::Node(node) => Ok(node),
                Item::Atomic(atomic) => Err(Error::xpath_eval(format!(
                    "expression must select nodes, got atomic value {atomic:?}"
                ))),
                Item::Function(_) => Err(Error::xpath_eval(
                    "expression must select nodes, got a function",
                )),
            })
            .collect()
    }

    fn xpath_version(&self) -> &'static str {
        "3.1"
    }
}
