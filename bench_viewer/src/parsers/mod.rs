//! Parsers for downloaded benchmark result files
//!
//! Result files are XML documents produced by the Catch2 XML reporter. They are
//! parsed into an explicit element tree which is then queried for test cases
//! and their mean benchmark records.

pub mod catch2_xml;
pub mod xml_tree;

// Re-export commonly used types
pub use catch2_xml::{MeanRecord, RawDocument, TestCaseRecord};
pub use xml_tree::{DocumentError, Element};
