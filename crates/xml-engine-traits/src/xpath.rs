//! XPath engine abstraction trait

use crate::error::Result;
use crate::tree::MutableXmlTree;

/// Trait for XPath query engines working over their own mutable tree.
///
/// Note: This trait does not require Send + Sync as most XML
/// libraries use Rc<T> for internal references. Users needing
/// thread-safety should wrap the engine in Arc<Mutex<T>>.
pub trait XPathEngine: MutableXmlTree {
    /// Type representing a compiled query
    type Query;

    /// Compile an XPath expression into a query
    fn compile_xpath(&self, xpath: &str) -> Result<Self::Query>;

    /// Evaluate a compiled query against a context node.
    ///
    /// The result must be a sequence of nodes; any atomic or function item
    /// is an evaluation error. Evaluation always sees the tree as it is now,
    /// including changes made since earlier evaluations.
    fn evaluate(&mut self, query: &Self::Query, context_node: &Self::Node)
        -> Result<Vec<Self::Node>>;

    /// Compile and evaluate in one step
    fn select(&mut self, xpath: &str, context_node: &Self::Node) -> Result<Vec<Self::Node>> {
        let query = self.compile_xpath(xpath)?;
        self.evaluate(&query, context_node)
    }

    /// Get the XPath version supported by this engine
    fn xpath_version(&self) -> &'static str;
}
