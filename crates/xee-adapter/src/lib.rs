//! xee engine adapter for the XML engine abstraction
//!
//! This adapter wraps the xot tree and the xee XPath 3.1 engine to implement
//! the xml-engine-traits interfaces.

mod import;
pub mod tree;
pub mod xpath;

// Re-export main types
pub use xpath::XeeEngine;

// Re-export key types for convenience
pub use xot::Node;
