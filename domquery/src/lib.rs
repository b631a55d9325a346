//! domquery: chainable XPath query and mutation over an XML document
//!
//! A [`DocumentQuery`] owns one parsed document and the result set of the
//! last query run against it. Mutation methods (`append`, `prepend`,
//! `before`, `after`, `replace`, `remove`, `set_attr`, `merge`, ...) apply
//! to every node in that result set and return the query for chaining.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use domquery::{DocumentQuery, Fragment};
//!
//! let mut dq = DocumentQuery::new();
//! dq.load("<root><item>A</item><item test=\"x\">B</item></root>")?
//!     .path("//item[@test]")?
//!     .set_attr("seen", "1")?
//!     .append(&Fragment::parse("<note>hi</note>")?)?;
//! println!("{}", dq.to_xml()?);
//! ```
//!
//! The tree and XPath evaluation come from an engine implementing
//! [`xml_engine_traits::XPathEngine`]; [`xee_adapter::XeeEngine`] is the
//! default.

mod tracing_macros;

pub mod cursor;
pub mod error;
pub mod fragment;
pub mod options;
pub mod output;
pub mod query;
pub mod value;

// Re-export core types
pub use cursor::ResultCursor;
pub use error::{Error, Result};
pub use fragment::Fragment;
pub use options::Options;
pub use output::{ElementView, Output, OutputFormat};
pub use query::{DocumentQuery, Visitor, WalkContext};

// Re-export the default engine
pub use xee_adapter::{Node, XeeEngine};
pub use xml_engine_traits::NodeType;
