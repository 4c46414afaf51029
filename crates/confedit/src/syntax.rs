use std::rc::Rc;

/// Key-normalization function owned by a [`crate::Document`] and consulted by
/// its sections for lookups and duplicate detection.
///
/// The raw spelling of a key is always kept for rendering; normalization only
/// decides which keys count as "the same".
pub type KeyXform = Rc<dyn Fn(&str) -> String>;

/// The default normalization: keys compare case-insensitively.
pub fn default_key_xform() -> KeyXform {
    Rc::new(|key: &str| key.to_lowercase())
}

/// An identity normalization, preserving the original case of keys.
pub fn identity_key_xform() -> KeyXform {
    Rc::new(str::to_string)
}

/// Syntax configuration shared by the parser and by nodes that re-synthesize
/// their text after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// Allow `key` lines with no delimiter and no value.
    pub allow_no_value: bool,
    /// Key/value delimiters, first entry used for newly created properties.
    pub delimiters: Vec<String>,
    /// Prefixes starting a full-line comment.
    pub comment_prefixes: Vec<String>,
    /// Prefixes starting an inline comment (none by default).
    pub inline_comment_prefixes: Vec<String>,
    /// Raise immediately on duplicate section or property names.
    pub strict: bool,
    /// Fold blank lines inside multi-line values instead of terminating them.
    pub empty_lines_in_values: bool,
    /// Pad the delimiter with spaces when synthesizing a property line.
    pub space_around_delimiters: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            allow_no_value: false,
            delimiters: vec!["=".to_string(), ":".to_string()],
            comment_prefixes: vec!["#".to_string(), ";".to_string()],
            inline_comment_prefixes: Vec::new(),
            strict: true,
            empty_lines_in_values: true,
            space_around_delimiters: true,
        }
    }
}

impl Syntax {
    /// Delimiter used when synthesizing a newly created property.
    pub(crate) fn default_delimiter(&self) -> &str {
        self.delimiters.first().map(String::as_str).unwrap_or("=")
    }
}
