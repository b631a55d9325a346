//! The chainable query/mutation facade

use std::path::Path;

use xee_adapter::XeeEngine;
use xml_engine_traits::{NodeType, XPathEngine, XmlTree};

use crate::cursor::ResultCursor;
use crate::error::{Error, Result};
use crate::fragment::Fragment;
use crate::options::Options;
use crate::tracing_macros::{debug, trace};
use crate::value;

/// Where a copy goes relative to a destination node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Append,
    Prepend,
    Before,
    After,
    Replace,
}

/// Handed to `walk`, `visit` and `each` callbacks for every matched node.
pub struct WalkContext<'a, E: XPathEngine = XeeEngine> {
    /// The result set being walked, as it was when the walk started
    pub results: &'a ResultCursor<E::Node>,
    pub element: E::Node,
    /// Index of `element` in `results`
    pub position: usize,
    /// The owning query. Issuing a new `path` here replaces the active
    /// cursor but does not affect the walk in progress.
    pub context: &'a mut DocumentQuery<E>,
}

/// Typed alternative to a `walk` closure
pub trait Visitor<E: XPathEngine = XeeEngine> {
    fn visit(&mut self, ctx: WalkContext<'_, E>) -> Result<()>;
}

/// An XML document plus the result set of the last query run against it.
///
/// Queries select nodes with XPath and store them in the active
/// [`ResultCursor`]; mutation methods then apply to every node in that
/// cursor. Most methods return `&mut Self` so calls chain:
///
/// ```rust,ignore
/// let mut dq = DocumentQuery::new();
/// dq.load(xml)?.path("//item[@test]")?.set_attr("seen", "1")?;
/// println!("{}", dq.to_xml()?);
/// ```
///
/// Methods ending in `_cursor` run a query without touching the active
/// cursor and hand the result back instead.
pub struct DocumentQuery<E: XPathEngine = XeeEngine> {
    pub(crate) engine: E,
    pub(crate) document: Option<E::Node>,
    pub(crate) results: ResultCursor<E::Node>,
    pub(crate) options: Options,
}

impl DocumentQuery<XeeEngine> {
    pub fn new() -> Self {
        Self::with_engine(XeeEngine::new())
    }
}

impl Default for DocumentQuery<XeeEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: XPathEngine> DocumentQuery<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            document: None,
            results: ResultCursor::default(),
            options: Options::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Raw tree access for anything the facade does not cover
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn document_node(&self) -> Option<E::Node> {
        self.document
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// The active cursor
    pub fn results(&self) -> &ResultCursor<E::Node> {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut ResultCursor<E::Node> {
        &mut self.results
    }

    /// Size of the active cursor
    pub fn count(&self) -> usize {
        self.results.count()
    }

    /// Parse `source`, replacing the current document.
    ///
    /// The old document is freed and the active cursor emptied; handles
    /// into the old document must not be used afterwards.
    pub fn load(&mut self, source: &str) -> Result<&mut Self> {
        let document = self
            .engine
            .parse_xml(source)
            .map_err(|e| Error::Load(e.to_string()))?;
        if !self.options.preserve_whitespace {
            self.engine.strip_whitespace(&document);
        }
        if let Some(previous) = self.document.replace(document) {
            self.engine.discard(&previous)?;
        }
        self.results = ResultCursor::default();
        debug!(bytes = source.len(), "loaded document");
        Ok(self)
    }

    /// Load, then run `path` on the new document
    pub fn load_with(&mut self, source: &str, path: &str) -> Result<&mut Self> {
        self.load(source)?.path(path)
    }

    /// Load, then hand back the result of `path` instead of the query
    pub fn load_cursor(&mut self, source: &str, path: &str) -> Result<ResultCursor<E::Node>> {
        self.load(source)?.path_cursor(path)
    }

    pub fn load_file(&mut self, file: impl AsRef<Path>) -> Result<&mut Self> {
        let source = std::fs::read_to_string(file.as_ref())?;
        debug!(path = %file.as_ref().display(), "read document file");
        self.load(&source)
    }

    /// Load nested data, converted with [`value::to_markup`]
    pub fn load_value(&mut self, root: &str, data: &serde_json::Value) -> Result<&mut Self> {
        self.load(&value::to_markup(root, data))
    }

    /// Run `path` against the document and make the result the active cursor
    pub fn path(&mut self, path: &str) -> Result<&mut Self> {
        self.results = self.path_cursor(path)?;
        Ok(self)
    }

    /// Run `path` with `context` as the context node
    pub fn path_in(&mut self, path: &str, context: E::Node) -> Result<&mut Self> {
        self.results = self.path_cursor_in(path, context)?;
        Ok(self)
    }

    /// Run `path` against the document, leaving the active cursor alone.
    ///
    /// Before anything is loaded this yields an empty cursor (the expression
    /// is still compiled, so syntax errors surface).
    pub fn path_cursor(&mut self, path: &str) -> Result<ResultCursor<E::Node>> {
        match self.document {
            Some(document) => self.path_cursor_in(path, document),
            None => {
                self.engine.compile_xpath(path)?;
                Ok(ResultCursor::default())
            }
        }
    }

    pub fn path_cursor_in(&mut self, path: &str, context: E::Node) -> Result<ResultCursor<E::Node>> {
        let nodes = self.engine.select(path, &context)?;
        trace!(path, matched = nodes.len(), "evaluated path");
        Ok(ResultCursor::new(nodes))
    }

    /// Drain the active cursor from the start, the way every mutation
    /// consumes it. Leaves the cursor exhausted.
    fn matched(&mut self) -> Vec<E::Node> {
        let mut nodes = Vec::with_capacity(self.results.count());
        self.results.rewind();
        while let Some(node) = self.results.current() {
            nodes.push(node);
            self.results.advance();
        }
        nodes
    }

    /// Empty the content of every matched node
    pub fn clear(&mut self) -> Result<&mut Self> {
        for node in self.matched() {
            self.engine.set_text_content(&node, "")?;
        }
        Ok(self)
    }

    /// Detach every matched node from its parent.
    ///
    /// Removed nodes stay in the cursor and remain readable.
    pub fn remove(&mut self) -> Result<&mut Self> {
        let nodes = self.matched();
        debug!(count = nodes.len(), "removing matched nodes");
        for node in nodes {
            if self.engine.parent(&node).is_none() {
                return Err(Error::Structural(format!(
                    "cannot remove {:?} node without a parent",
                    self.engine.node_type(&node)
                )));
            }
            self.engine.detach(&node)?;
        }
        Ok(self)
    }

    /// Append a copy of `content` as last child of every matched node
    pub fn append(&mut self, content: &Fragment<E>) -> Result<&mut Self> {
        self.insert_fragment(content, Placement::Append)
    }

    /// Put a copy of `content` in front of the first element child of every
    /// matched node, or in front of the node itself when it has no element
    /// children
    pub fn prepend(&mut self, content: &Fragment<E>) -> Result<&mut Self> {
        self.insert_fragment(content, Placement::Prepend)
    }

    /// Insert a copy of `content` as previous sibling of every matched node
    pub fn before(&mut self, content: &Fragment<E>) -> Result<&mut Self> {
        self.insert_fragment(content, Placement::Before)
    }

    /// Insert a copy of `content` as next sibling of every matched node
    pub fn after(&mut self, content: &Fragment<E>) -> Result<&mut Self> {
        self.insert_fragment(content, Placement::After)
    }

    /// Swap every matched node for a copy of `content`
    pub fn replace(&mut self, content: &Fragment<E>) -> Result<&mut Self> {
        self.insert_fragment(content, Placement::Replace)
    }

    /// Append copies of the matched nodes to every node selected by `destination`.
    ///
    /// Matched attributes are set on destination elements rather than
    /// appended.
    pub fn append_to(&mut self, destination: &str) -> Result<&mut Self> {
        let destinations = self.path_cursor(destination)?;
        let sources = self.matched();
        self.fan_out(destinations.nodes(), &sources, Placement::Append)?;
        Ok(self)
    }

    /// Prepend copies of the matched nodes to every node selected by `destination`
    pub fn prepend_to(&mut self, destination: &str) -> Result<&mut Self> {
        let destinations = self.path_cursor(destination)?;
        let sources = self.matched();
        self.fan_out(destinations.nodes(), &sources, Placement::Prepend)?;
        Ok(self)
    }

    /// Append copies of the nodes selected by `from` to every node selected
    /// by `to`.
    ///
    /// `to` is evaluated first; `from` then becomes the active cursor.
    pub fn copy(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        let destinations = self.path_cursor(to)?;
        self.path(from)?;
        let sources = self.matched();
        self.fan_out(destinations.nodes(), &sources, Placement::Append)?;
        Ok(self)
    }

    /// Attribute `name` of every matched node, in cursor order.
    ///
    /// Nodes without the attribute, and nodes that are not elements, give
    /// `None`.
    pub fn get_attr(&mut self, name: &str) -> Vec<Option<String>> {
        self.matched()
            .into_iter()
            .map(|node| self.engine.get_attribute(&node, name))
            .collect()
    }

    /// Set attribute `name` on every matched element
    pub fn set_attr(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        for node in self.matched() {
            if self.engine.node_type(&node) == NodeType::Element {
                self.engine.set_attribute(&node, name, value)?;
            }
        }
        Ok(self)
    }

    /// Remove attribute `name` from every matched element
    pub fn remove_attr(&mut self, name: &str) -> Result<&mut Self> {
        for node in self.matched() {
            if self.engine.node_type(&node) == NodeType::Element {
                self.engine.remove_attribute(&node, name)?;
            }
        }
        Ok(self)
    }

    /// Call `callback` for every node of the active cursor.
    ///
    /// The walk covers the cursor as it was when the walk began, even if
    /// the callback runs new queries. An error from the callback stops the
    /// walk and is returned.
    pub fn walk<F>(&mut self, mut callback: F) -> Result<&mut Self>
    where
        F: FnMut(WalkContext<'_, E>) -> Result<()>,
    {
        let mut results = self.results.clone();
        results.rewind();
        while let Some(element) = results.current() {
            let position = results.key();
            callback(WalkContext {
                results: &results,
                element,
                position,
                context: &mut *self,
            })?;
            results.advance();
        }
        Ok(self)
    }

    /// [`walk`](Self::walk) with a [`Visitor`]
    pub fn visit<V: Visitor<E>>(&mut self, visitor: &mut V) -> Result<&mut Self> {
        self.walk(|ctx| visitor.visit(ctx))
    }

    /// [`walk`](Self::walk) with extra arguments passed to every call
    pub fn each<A, F>(&mut self, args: &[A], mut callback: F) -> Result<&mut Self>
    where
        F: FnMut(WalkContext<'_, E>, &[A]) -> Result<()>,
    {
        self.walk(|ctx| callback(ctx, args))
    }

    /// The whole document as markup, formatted per [`Options::format_output`].
    /// Empty before anything is loaded.
    pub fn to_xml(&self) -> Result<String> {
        match self.document {
            Some(document) => Ok(self.engine.serialize(&document, self.options.format_output)?),
            None => Ok(String::new()),
        }
    }

    /// Markup of every node in the active cursor, one per line when compact
    pub fn results_xml(&self) -> Result<String> {
        let pretty = self.options.format_output;
        let parts = self
            .results
            .nodes()
            .iter()
            .map(|node| self.engine.serialize(node, pretty))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(if pretty {
            parts.concat()
        } else {
            parts.join("\n")
        })
    }

    fn insert_fragment(&mut self, content: &Fragment<E>, placement: Placement) -> Result<&mut Self> {
        let template = self.engine.import_node(content.engine(), &content.root())?;
        let targets = self.matched();
        debug!(?placement, targets = targets.len(), "inserting fragment");
        let outcome = self.fan_out(&targets, &[template], placement);
        self.engine.discard(&template)?;
        outcome?;
        Ok(self)
    }

    /// Copy every source to every destination, destinations outermost
    fn fan_out(
        &mut self,
        destinations: &[E::Node],
        sources: &[E::Node],
        placement: Placement,
    ) -> Result<()> {
        for &destination in destinations {
            for source in sources {
                match self.engine.node_type(source) {
                    NodeType::Attribute => self.place_attribute(destination, source, placement)?,
                    NodeType::Namespace => {}
                    _ => {
                        let copy = self.engine.clone_node(source);
                        match self.place(destination, copy, placement) {
                            Ok(true) => {}
                            Ok(false) => self.engine.discard(&copy)?,
                            Err(err) => {
                                self.engine.discard(&copy)?;
                                return Err(err);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Attributes have no place in a child list; appending or prepending
    /// one to an element sets it there instead.
    fn place_attribute(
        &mut self,
        target: E::Node,
        attribute: &E::Node,
        placement: Placement,
    ) -> Result<()> {
        let into_element = self.engine.node_type(&target) == NodeType::Element;
        if !into_element || !matches!(placement, Placement::Append | Placement::Prepend) {
            return Ok(());
        }
        let name = self.engine.node_name(attribute).unwrap_or_default();
        let value = self.engine.node_value(attribute).unwrap_or_default();
        self.engine.set_attribute(&target, &name, &value)?;
        Ok(())
    }

    /// Put `node` at `placement` relative to `target`. Returns false when
    /// the target has nowhere to put it.
    fn place(&mut self, target: E::Node, node: E::Node, placement: Placement) -> Result<bool> {
        match placement {
            Placement::Append => {
                self.engine.append_child(&target, &node)?;
            }
            Placement::Prepend => {
                let first_element = self.path_cursor_in("*[1]", target)?.get(0);
                match first_element {
                    Some(first) => self.engine.insert_before(&first, &node)?,
                    None if self.has_element_parent(target) => {
                        self.engine.insert_before(&target, &node)?
                    }
                    None => return Ok(false),
                }
            }
            Placement::Before => {
                if !self.has_element_parent(target) {
                    return Ok(false);
                }
                self.engine.insert_before(&target, &node)?;
            }
            Placement::After => {
                if !self.has_element_parent(target) {
                    return Ok(false);
                }
                self.engine.insert_after(&target, &node)?;
            }
            Placement::Replace => {
                if self.engine.parent(&target).is_none() {
                    return Err(Error::Structural(format!(
                        "cannot replace {:?} node without a parent",
                        self.engine.node_type(&target)
                    )));
                }
                self.engine.insert_before(&target, &node)?;
                self.engine.detach(&target)?;
            }
        }
        Ok(true)
    }

    /// Siblings only make sense below an element; the document node takes a
    /// single root.
    fn has_element_parent(&self, node: E::Node) -> bool {
        self.engine
            .parent(&node)
            .is_some_and(|parent| self.engine.node_type(&parent) != NodeType::Document)
    }
}

impl<E: XPathEngine + Default> DocumentQuery<E> {
    /// Append copies of nodes from another document.
    ///
    /// `source` is parsed into a separate engine and `from` evaluated there;
    /// every node it selects is appended to each node `to` selects here,
    /// skipping text and document destinations. Selected attributes are set
    /// on the destination elements. The active cursor is left alone.
    pub fn merge(&mut self, source: &str, from: &str, to: &str) -> Result<&mut Self> {
        let mut foreign = DocumentQuery::with_engine(E::default()).with_options(self.options);
        foreign.load(source)?;
        let incoming = foreign.path_cursor(from)?;
        let destinations: Vec<E::Node> = self
            .path_cursor(to)?
            .nodes()
            .iter()
            .copied()
            .filter(|node| {
                !matches!(
                    self.engine.node_type(node),
                    NodeType::Text | NodeType::Document
                )
            })
            .collect();

        let mut templates = Vec::with_capacity(incoming.count());
        for node in incoming.nodes() {
            templates.push(self.engine.import_node(&foreign.engine, node)?);
        }
        debug!(
            sources = templates.len(),
            destinations = destinations.len(),
            "merging foreign nodes"
        );
        let outcome = self.fan_out(&destinations, &templates, Placement::Append);
        for template in &templates {
            self.engine.discard(template)?;
        }
        outcome?;
        Ok(self)
    }

    /// A detached copy of `node` that can be inserted into any document
    pub fn fragment(&self, node: E::Node) -> Result<Fragment<E>> {
        let mut engine = E::default();
        let root = engine.import_node(&self.engine, &node)?;
        Ok(Fragment::from_parts(engine, root))
    }
}
