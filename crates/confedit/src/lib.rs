//! Format-preserving parse/edit/render pipeline for INI-style configuration
//! text.
//!
//! A configuration file is parsed into a [`Document`] tree that keeps every
//! original byte: comments, blank lines, inline comments and the original
//! spelling and indentation of keys and values. Nodes that are never touched
//! re-render verbatim from their raw source lines, so
//! `parse(text).render() == text`. Nodes mutated through the editing API are
//! marked updated and re-synthesized from their semantic state, leaving the
//! rest of the file byte-identical.
//!
//! ```rust
//! use confedit::Parser;
//!
//! let mut doc = Parser::new().parse("[default]\nkey = 1\n").unwrap();
//! doc.section_mut("default")
//!     .unwrap()
//!     .property_mut("key")
//!     .unwrap()
//!     .set_value("2")
//!     .unwrap();
//! assert_eq!(doc.render(), "[default]\nkey = 2\n");
//! ```

pub mod error;
pub mod io;
pub mod model;
pub mod parsing;
pub mod syntax;

// Re-export key types for easier usage
pub use error::Error;
pub use io::{read_path, read_path_with, write_path, IoError};
pub use model::{
    Comment, ConfigContent, Container, Document, DocumentBuilder, Property, RawLines, Section,
    SectionBuilder, SectionContent, Space,
};
pub use parsing::{ParseError, ParseIssue, Parser};
pub use syntax::{KeyXform, Syntax};
