/// Raw source-line storage shared by every node kind.
///
/// Holds the physical lines (newline included) that produced a node, plus the
/// `updated` flag deciding between verbatim and synthesized rendering. A node
/// with no source lines was created programmatically and always counts as
/// updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLines {
    lines: Vec<String>,
    updated: bool,
}

impl RawLines {
    /// Append one physical source line (newline included).
    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Verbatim text of all stored lines.
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    /// Flag this node as semantically changed; rendering will synthesize
    /// instead of replaying the raw lines.
    pub fn mark_updated(&mut self) {
        self.updated = true;
    }

    pub fn is_updated(&self) -> bool {
        self.updated || self.lines.is_empty()
    }

    pub(crate) fn extend_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a String>) {
        self.lines.extend(lines.into_iter().cloned());
    }

    /// Drop the first `n` stored lines.
    pub(crate) fn drain_prefix(&mut self, n: usize) {
        self.lines.drain(..n);
    }
}
