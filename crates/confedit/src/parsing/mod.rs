//! Line-oriented parsing of configuration text into a [`crate::Document`].
//!
//! The parser walks the input one physical line at a time, classifying each
//! as a section header, a property line, a comment, a blank or an indented
//! continuation of the current property. Every line ends up stored verbatim
//! in exactly one node, which is what makes unedited output byte-identical
//! to the input.

mod lines;
mod parser;

pub use parser::{ParseError, ParseIssue, Parser};
