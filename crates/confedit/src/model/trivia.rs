use crate::model::raw::RawLines;

/// One or more consecutive full-line comments.
///
/// Consecutive comment lines parsed from source merge into a single node.
/// Inline comments trailing a property or section header are not `Comment`
/// nodes; they stay inside the line that carries them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    raw: RawLines,
}

impl Comment {
    /// Build a comment from plain text, prefixing and newline-terminating it
    /// if the caller did not.
    pub fn new(text: &str, prefix: &str) -> Self {
        let mut line = if text.starts_with(prefix) {
            text.to_string()
        } else {
            format!("{prefix} {text}")
        };
        if !line.ends_with('\n') {
            line.push('\n');
        }
        let mut raw = RawLines::default();
        raw.push_line(&line);
        Self { raw }
    }

    /// Wrap a comment line exactly as it appeared in source.
    pub(crate) fn from_line(line: &str) -> Self {
        let mut raw = RawLines::default();
        raw.push_line(line);
        Self { raw }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        self.raw.push_line(line);
    }

    pub fn lines(&self) -> &[String] {
        self.raw.lines()
    }

    pub fn render(&self) -> String {
        self.raw.text()
    }
}

/// A run of consecutive blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    raw: RawLines,
}

impl Space {
    /// A vertical gap of `newlines` empty lines.
    pub fn new(newlines: usize) -> Self {
        let mut raw = RawLines::default();
        for _ in 0..newlines {
            raw.push_line("\n");
        }
        Self { raw }
    }

    pub(crate) fn from_line(line: &str) -> Self {
        let mut raw = RawLines::default();
        raw.push_line(line);
        Self { raw }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        self.raw.push_line(line);
    }

    pub fn lines(&self) -> &[String] {
        self.raw.lines()
    }

    pub fn render(&self) -> String {
        self.raw.text()
    }

    /// Give up the first `n` stored lines (they were folded into a preceding
    /// multi-line value).
    pub(crate) fn drain_lines(&mut self, n: usize) {
        self.raw.drain_prefix(n);
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.raw.lines().is_empty()
    }
}
