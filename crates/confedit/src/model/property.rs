use std::cell::OnceCell;
use std::fmt;

use tracing::warn;

use crate::error::Error;
use crate::model::raw::RawLines;
use crate::syntax::Syntax;

/// A key/value entry inside a [`crate::Section`].
///
/// Keeps the raw spelling of the key, the delimiter it was written with and
/// the value as a list of per-line fragments, so the original layout of a
/// multi-line value survives untouched. The joined value string is memoized
/// and recomputed only after an edit.
#[derive(Debug, Clone)]
pub struct Property {
    raw: RawLines,
    raw_key: String,
    normalized_key: Option<String>,
    delimiter: String,
    values: Vec<String>,
    value_is_none: bool,
    joined: OnceCell<String>,
    space_around_delimiters: bool,
    allow_no_value: bool,
}

impl Property {
    /// A detached property with no value, to be filled in and inserted into a
    /// section. While detached it renders as a bare key line; once attached,
    /// the owning section's syntax decides whether a bare key is
    /// representable.
    pub fn new(key: &str) -> Self {
        Self {
            raw: RawLines::default(),
            raw_key: key.to_string(),
            normalized_key: None,
            delimiter: "=".to_string(),
            values: Vec::new(),
            value_is_none: true,
            joined: OnceCell::new(),
            space_around_delimiters: true,
            allow_no_value: true,
        }
    }

    /// A detached property inheriting the delimiter and layout of a given
    /// syntax, used when a section materializes a new key.
    pub(crate) fn with_syntax(key: &str, syntax: &Syntax) -> Self {
        Self {
            raw: RawLines::default(),
            raw_key: key.to_string(),
            normalized_key: None,
            delimiter: syntax.default_delimiter().to_string(),
            values: Vec::new(),
            value_is_none: true,
            joined: OnceCell::new(),
            space_around_delimiters: syntax.space_around_delimiters,
            allow_no_value: syntax.allow_no_value,
        }
    }

    pub(crate) fn from_parsed(
        raw_key: &str,
        delimiter: Option<&str>,
        value: Option<&str>,
        line: &str,
        syntax: &Syntax,
    ) -> Self {
        let mut raw = RawLines::default();
        raw.push_line(line);
        let (values, value_is_none) = match value {
            Some(v) => (vec![v.to_string()], false),
            None => (Vec::new(), true),
        };
        Self {
            raw,
            raw_key: raw_key.to_string(),
            normalized_key: None,
            delimiter: delimiter.unwrap_or(syntax.default_delimiter()).to_string(),
            values,
            value_is_none,
            joined: OnceCell::new(),
            space_around_delimiters: syntax.space_around_delimiters,
            allow_no_value: syntax.allow_no_value,
        }
    }

    /// Take over the rendering rules of the owning section's syntax. Raw
    /// lines are untouched, so unmodified parsed properties still render
    /// verbatim.
    pub(crate) fn adopt_syntax(&mut self, syntax: &Syntax) {
        self.space_around_delimiters = syntax.space_around_delimiters;
        self.allow_no_value = syntax.allow_no_value;
    }

    /// The normalized key used for lookups. Only defined once the property is
    /// attached to a section.
    pub fn key(&self) -> Result<&str, Error> {
        self.normalized_key.as_deref().ok_or(Error::NotAttached)
    }

    /// The key exactly as spelled in source (or as passed to the setter).
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    /// Re-spell the key, flagging the line for re-synthesis.
    pub(crate) fn set_raw_key(&mut self, key: &str) {
        self.raw_key = key.to_string();
        self.raw.mark_updated();
    }

    pub(crate) fn set_normalized_key(&mut self, key: String) {
        self.normalized_key = Some(key);
    }

    pub(crate) fn clear_normalized_key(&mut self) {
        self.normalized_key = None;
    }

    /// The value with fragments joined by newlines and trailing whitespace
    /// trimmed, or `None` for a valueless property.
    pub fn value(&self) -> Option<&str> {
        if self.value_is_none {
            return None;
        }
        Some(
            self.joined
                .get_or_init(|| self.values.join("\n").trim_end().to_string()),
        )
    }

    /// The per-line value fragments as parsed or assigned.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Assign a single-line value. Multi-line strings are rejected; use
    /// [`Property::set_values`] for those.
    pub fn set_value(&mut self, value: &str) -> Result<(), Error> {
        if value.contains('\n') {
            return Err(Error::MultilineValue {
                key: self.raw_key.clone(),
            });
        }
        self.replace_value(value);
        Ok(())
    }

    /// Assign a multi-line value from items, one per line, indented four
    /// spaces with the first item on its own line below the key.
    pub fn set_values<S: AsRef<str>>(&mut self, values: &[S]) {
        self.set_values_with(values, "\n", "    ", true);
    }

    /// Assign a value from items with explicit separator and layout control.
    ///
    /// When `separator` contains a newline, each item is placed on its own
    /// line prefixed by `indent`; `prepend_newline` additionally pushes the
    /// first item below the key line.
    pub fn set_values_with<S: AsRef<str>>(
        &mut self,
        values: &[S],
        separator: &str,
        indent: &str,
        prepend_newline: bool,
    ) {
        let joined = if values.is_empty() {
            // no items, no layout scaffolding
            String::new()
        } else if separator.contains('\n') {
            let sep = format!("{separator}{indent}");
            let body = values
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(&sep);
            if prepend_newline {
                format!("{sep}{body}")
            } else {
                body
            }
        } else {
            values
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(separator)
        };
        self.replace_value(&joined);
    }

    /// Append one item to a separator-structured value, preserving the
    /// existing multi-line layout.
    pub fn append_value(&mut self, value: &str, separator: &str) {
        let mut items = self.as_list(separator);
        items.push(value.to_string());
        self.set_values_with(&items, separator, "    ", true);
    }

    /// Split the value on `separator`, trimming items and dropping empties.
    pub fn as_list(&self, separator: &str) -> Vec<String> {
        match self.value() {
            None => Vec::new(),
            Some(v) => v
                .split(separator)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Drop the value, turning this into a bare-key property.
    pub(crate) fn clear_value(&mut self) {
        self.values.clear();
        self.value_is_none = true;
        self.joined.take();
        self.raw.mark_updated();
    }

    fn replace_value(&mut self, value: &str) {
        self.values = vec![value.to_string()];
        self.value_is_none = false;
        self.joined.take();
        // Cache the assigned string untrimmed so value() echoes it exactly.
        let _ = self.joined.set(value.to_string());
        self.raw.mark_updated();
    }

    /// Fold a continuation line into this property, keeping the physical line
    /// verbatim (inline comments included) while recording the trimmed text
    /// as a value fragment.
    pub(crate) fn push_continuation(&mut self, line: &str) {
        self.raw.push_line(line);
        self.values.push(line.trim().to_string());
        self.value_is_none = false;
        self.joined.take();
    }

    /// Fold blank-line-separated value text (recovered by the post-parse
    /// merge) into this property.
    pub(crate) fn merge_space_fragment(&mut self, fragment: String, lines: &[String]) {
        self.values.push(fragment);
        self.value_is_none = false;
        self.raw.extend_lines(lines);
        self.joined.take();
    }

    pub fn is_updated(&self) -> bool {
        self.raw.is_updated()
    }

    pub fn render(&self) -> String {
        if !self.raw.is_updated() {
            return self.raw.text();
        }
        match self.value() {
            None => {
                if self.allow_no_value {
                    format!("{}\n", self.raw_key)
                } else {
                    warn!(key = %self.raw_key, "skipping valueless property, not representable in this syntax");
                    String::new()
                }
            }
            Some(value) => {
                let delimiter = if self.space_around_delimiters {
                    // No pad after the delimiter when the value opens with its
                    // own newline; the indent handles the separation.
                    if value.starts_with('\n') {
                        format!(" {}", self.delimiter)
                    } else {
                        format!(" {} ", self.delimiter)
                    }
                } else {
                    self.delimiter.clone()
                };
                format!("{}{}{}\n", self.raw_key, delimiter, value)
            }
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
