//! Core trait abstractions for XML processing engines.
//!
//! This crate defines the tree, mutation and XPath traits a backend must
//! implement to sit underneath the `domquery` facade.

pub mod error;
pub mod tree;
pub mod xpath;

pub use error::{Error, Result};
pub use tree::{MutableXmlTree, NodeType, XmlTree};
pub use xpath::XPathEngine;
