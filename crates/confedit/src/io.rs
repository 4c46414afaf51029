//! Reading and writing configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::document::Document;
use crate::parsing::{ParseError, Parser};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse the file at `path` with default syntax.
pub fn read_path(path: impl AsRef<Path>) -> Result<Document, IoError> {
    read_path_with(&Parser::new(), path)
}

/// Parse the file at `path` with a configured parser. Errors are labelled
/// with the path.
pub fn read_path_with(parser: &Parser, path: impl AsRef<Path>) -> Result<Document, IoError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let doc = parser.parse_named(&text, &path.display().to_string())?;
    Ok(doc)
}

/// Render `doc` to the file at `path`, optionally re-parsing the output
/// first to catch edits the syntax cannot read back.
pub fn write_path(doc: &Document, path: impl AsRef<Path>, validate: bool) -> Result<(), IoError> {
    if validate {
        doc.validate_format()?;
    }
    fs::write(path, doc.render())?;
    Ok(())
}
