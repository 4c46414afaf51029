use std::fmt;

use indexmap::IndexMap;

use crate::error::Error;
use crate::model::builder::DocumentBuilder;
use crate::model::container::Container;
use crate::model::section::Section;
use crate::model::trivia::{Comment, Space};
use crate::parsing::{ParseError, Parser};
use crate::syntax::{default_key_xform, KeyXform, Syntax};

/// One top-level child of a [`Document`]: a section, a comment block or a
/// blank run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigContent {
    Section(Section),
    Comment(Comment),
    Space(Space),
}

impl ConfigContent {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            ConfigContent::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            ConfigContent::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ConfigContent::Section(s) => s.render(),
            ConfigContent::Comment(c) => c.render(),
            ConfigContent::Space(sp) => sp.render(),
        }
    }
}

/// The root of a parsed or hand-built configuration tree.
///
/// Owns the key normalization and syntax that its sections inherit on
/// attachment. Rendering concatenates the children; anything never edited
/// comes back byte for byte.
#[derive(Clone)]
pub struct Document {
    children: Vec<ConfigContent>,
    syntax: Syntax,
    xform: KeyXform,
}

impl Document {
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            children: Vec::new(),
            syntax,
            xform: default_key_xform(),
        }
    }

    pub(crate) fn with_parts(syntax: Syntax, xform: KeyXform) -> Self {
        Self {
            children: Vec::new(),
            syntax,
            xform,
        }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Replace the key normalization. Attached sections pick up the new
    /// function for future lookups and insertions; keys normalized earlier
    /// keep their stored form.
    pub fn set_key_xform<F>(&mut self, xform: F)
    where
        F: Fn(&str) -> String + 'static,
    {
        self.xform = std::rc::Rc::new(xform);
        let xform = self.xform.clone();
        let syntax = self.syntax.clone();
        for child in &mut self.children {
            if let ConfigContent::Section(s) = child {
                s.bind(xform.clone(), syntax.clone());
            }
        }
    }

    fn idx_of_section(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| {
            child.as_section().is_some_and(|s| s.name() == name)
        })
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.idx_of_section(name).is_some()
    }

    pub fn section(&self, name: &str) -> Result<&Section, Error> {
        self.idx_of_section(name)
            .and_then(|idx| self.children[idx].as_section())
            .ok_or(Error::NoSection {
                name: name.to_string(),
            })
    }

    pub fn section_mut(&mut self, name: &str) -> Result<&mut Section, Error> {
        match self.idx_of_section(name) {
            Some(idx) => match &mut self.children[idx] {
                ConfigContent::Section(s) => Ok(s),
                _ => unreachable!("idx_of_section only matches sections"),
            },
            None => Err(Error::NoSection {
                name: name.to_string(),
            }),
        }
    }

    pub fn iter_sections(&self) -> impl Iterator<Item = &Section> {
        self.children.iter().filter_map(ConfigContent::as_section)
    }

    /// Section names in document order.
    pub fn sections(&self) -> Vec<String> {
        self.iter_sections().map(|s| s.name().to_string()).collect()
    }

    /// Append a section at the end of the document, refusing duplicates. The
    /// section adopts this document's key normalization and syntax.
    pub fn add_section(&mut self, section: impl Into<Section>) -> Result<&mut Section, Error> {
        let mut section = section.into();
        if self.has_section(section.name()) {
            return Err(Error::DuplicateSection {
                name: section.name().to_string(),
            });
        }
        section.bind(self.xform.clone(), self.syntax.clone());
        self.children.push(ConfigContent::Section(section));
        match self.children.last_mut() {
            Some(ConfigContent::Section(s)) => Ok(s),
            _ => unreachable!("section was just pushed"),
        }
    }

    /// Remove the section named `name`. Returns whether one existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        self.take_section(name).is_some()
    }

    /// Detach and return the section named `name`, ready for insertion into
    /// another document.
    pub fn take_section(&mut self, name: &str) -> Option<Section> {
        let idx = self.idx_of_section(name)?;
        match self.children.remove(idx) {
            ConfigContent::Section(s) => Some(s),
            _ => unreachable!("idx_of_section only matches sections"),
        }
    }

    /// Snapshot of the whole document as ordered nested maps.
    pub fn to_map(&self) -> IndexMap<String, IndexMap<String, Option<String>>> {
        self.iter_sections()
            .map(|s| (s.name().to_string(), s.to_map()))
            .collect()
    }

    /// Shorthand for `section(name)?.property(key)?.value()`.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<&str>, Error> {
        Ok(self.section(section)?.property(key)?.value())
    }

    /// Shorthand for `section_mut(name)?.set(key, value)`, creating the
    /// section if absent.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), Error> {
        if !self.has_section(section) {
            self.add_section(section)?;
        }
        self.section_mut(section)?.set(key, value)
    }

    pub fn has_property(&self, section: &str, key: &str) -> bool {
        self.section(section)
            .map(|s| s.has_property(key))
            .unwrap_or(false)
    }

    pub fn remove_property(&mut self, section: &str, key: &str) -> Result<bool, Error> {
        Ok(self.section_mut(section)?.remove_property(key))
    }

    /// Fluent insertion of new blocks starting at child index `idx`.
    pub fn insert_at(&mut self, idx: usize) -> DocumentBuilder<'_> {
        DocumentBuilder::new(self, idx)
    }

    /// Fluent insertion just before the section named `name`.
    pub fn insert_before(&mut self, name: &str) -> Result<DocumentBuilder<'_>, Error> {
        let idx = self.idx_of_section(name).ok_or(Error::NoSection {
            name: name.to_string(),
        })?;
        Ok(DocumentBuilder::new(self, idx))
    }

    /// Fluent insertion just after the section named `name`.
    pub fn insert_after(&mut self, name: &str) -> Result<DocumentBuilder<'_>, Error> {
        let idx = self.idx_of_section(name).ok_or(Error::NoSection {
            name: name.to_string(),
        })?;
        Ok(DocumentBuilder::new(self, idx + 1))
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Serialize the whole tree. Unedited nodes replay their source bytes.
    pub fn render(&self) -> String {
        self.children.iter().map(ConfigContent::render).collect()
    }

    /// Re-parse the rendered output under strict rules, surfacing edits that
    /// produced text the syntax cannot read back.
    pub fn validate_format(&self) -> Result<(), ParseError> {
        let syntax = Syntax {
            strict: true,
            ..self.syntax.clone()
        };
        Parser::with_syntax(syntax)
            .key_xform_rc(self.xform.clone())
            .parse(&self.render())?;
        Ok(())
    }

    pub(crate) fn push_parsed(&mut self, section: Section) {
        self.children.push(ConfigContent::Section(section));
    }

    pub(crate) fn insert_section_at(
        &mut self,
        idx: usize,
        section: impl Into<Section>,
    ) -> Result<(), Error> {
        let mut section = section.into();
        if self.has_section(section.name()) {
            return Err(Error::DuplicateSection {
                name: section.name().to_string(),
            });
        }
        section.bind(self.xform.clone(), self.syntax.clone());
        self.children.insert(idx, ConfigContent::Section(section));
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for Document {
    type Child = ConfigContent;

    fn children(&self) -> &[ConfigContent] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<ConfigContent> {
        &mut self.children
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("children", &self.children)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_document_from_scratch() {
        let mut doc = Document::new();
        let s = doc.add_section("main").unwrap();
        s.set("key", "value").unwrap();
        assert_eq!(doc.render(), "[main]\nkey = value\n");
    }

    #[test]
    fn test_duplicate_section_is_rejected() {
        let mut doc = Document::new();
        doc.add_section("main").unwrap();
        let err = doc.add_section("main").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateSection {
                name: "main".to_string()
            }
        );
    }

    #[test]
    fn test_take_section_moves_between_documents() {
        let mut a = Document::new();
        a.set("main", "key", "value").unwrap();
        let mut b = Document::new();
        let section = a.take_section("main").unwrap();
        b.add_section(section).unwrap();
        assert!(!a.has_section("main"));
        assert_eq!(b.get("main", "key").unwrap(), Some("value"));
    }

    #[test]
    fn test_set_key_xform_never_rewrites_stored_keys() {
        let mut doc = Document::new();
        doc.set("main", "MixedCase", "v").unwrap();
        assert!(doc.has_property("main", "MIXEDCASE"));
        doc.set_key_xform(str::to_string);
        // the stored key keeps its original normalized form
        assert!(doc.has_property("main", "mixedcase"));
        assert!(!doc.has_property("main", "MixedCase"));
        // fresh keys see the new normalization
        doc.set("main", "NewKey", "w").unwrap();
        assert!(doc.has_property("main", "NewKey"));
        assert!(!doc.has_property("main", "newkey"));
    }

    #[test]
    fn test_to_map_nests_sections() {
        let mut doc = Document::new();
        doc.set("a", "x", "1").unwrap();
        doc.set("b", "y", "2").unwrap();
        let map = doc.to_map();
        assert_eq!(map["a"]["x"], Some("1".to_string()));
        assert_eq!(map["b"]["y"], Some("2".to_string()));
    }
}
