use crate::error::Error;
use crate::model::container::Container;
use crate::model::document::{ConfigContent, Document};
use crate::model::section::{Section, SectionContent};
use crate::model::trivia::{Comment, Space};

/// Fluent insertion of blocks at a position inside a [`Section`].
///
/// Obtained from [`Section::insert_at`], [`Section::insert_before`] or
/// [`Section::insert_after`]. Each call inserts one block and advances, so a
/// chain lays its blocks down in call order.
#[derive(Debug)]
pub struct SectionBuilder<'a> {
    section: &'a mut Section,
    idx: usize,
}

impl<'a> SectionBuilder<'a> {
    pub(crate) fn new(section: &'a mut Section, idx: usize) -> Self {
        Self { section, idx }
    }

    /// Insert a `#`-prefixed comment line.
    pub fn comment(self, text: &str) -> Self {
        self.comment_with_prefix(text, "#")
    }

    pub fn comment_with_prefix(mut self, text: &str, prefix: &str) -> Self {
        self.section
            .insert(self.idx, SectionContent::Comment(Comment::new(text, prefix)));
        self.idx += 1;
        self
    }

    /// Insert a vertical gap of `newlines` blank lines.
    pub fn space(mut self, newlines: usize) -> Self {
        self.section
            .insert(self.idx, SectionContent::Space(Space::new(newlines)));
        self.idx += 1;
        self
    }

    /// Insert a property with a single-line value.
    pub fn property(mut self, key: &str, value: &str) -> Result<Self, Error> {
        self.section.insert_property_at(self.idx, key, Some(value))?;
        self.idx += 1;
        Ok(self)
    }

    /// Insert a bare-key property.
    pub fn property_no_value(mut self, key: &str) -> Result<Self, Error> {
        self.section.insert_property_at(self.idx, key, None)?;
        self.idx += 1;
        Ok(self)
    }
}

/// Fluent insertion of blocks at a position inside a [`Document`].
pub struct DocumentBuilder<'a> {
    document: &'a mut Document,
    idx: usize,
}

impl<'a> DocumentBuilder<'a> {
    pub(crate) fn new(document: &'a mut Document, idx: usize) -> Self {
        Self { document, idx }
    }

    /// Insert a `#`-prefixed comment line.
    pub fn comment(self, text: &str) -> Self {
        self.comment_with_prefix(text, "#")
    }

    pub fn comment_with_prefix(mut self, text: &str, prefix: &str) -> Self {
        self.document
            .insert(self.idx, ConfigContent::Comment(Comment::new(text, prefix)));
        self.idx += 1;
        self
    }

    /// Insert a vertical gap of `newlines` blank lines.
    pub fn space(mut self, newlines: usize) -> Self {
        self.document
            .insert(self.idx, ConfigContent::Space(Space::new(newlines)));
        self.idx += 1;
        self
    }

    /// Insert a section, refusing duplicates.
    pub fn section(mut self, section: impl Into<Section>) -> Result<Self, Error> {
        self.document.insert_section_at(self.idx, section)?;
        self.idx += 1;
        Ok(self)
    }
}
