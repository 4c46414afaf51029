use std::fmt;

use indexmap::IndexMap;

use crate::error::Error;
use crate::model::builder::SectionBuilder;
use crate::model::container::Container;
use crate::model::property::Property;
use crate::model::raw::RawLines;
use crate::model::trivia::{Comment, Space};
use crate::syntax::{default_key_xform, KeyXform, Syntax};

/// One child of a [`Section`]: a property, a comment block or a blank run.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Property(Property),
    Comment(Comment),
    Space(Space),
}

impl SectionContent {
    pub fn as_property(&self) -> Option<&Property> {
        match self {
            SectionContent::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut Property> {
        match self {
            SectionContent::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            SectionContent::Property(p) => p.render(),
            SectionContent::Comment(c) => c.render(),
            SectionContent::Space(s) => s.render(),
        }
    }
}

/// A named container of properties, comments and blank runs.
///
/// The header line (brackets plus anything trailing them) is stored raw so an
/// untouched section round-trips byte for byte. Lookups go through the key
/// normalization inherited from the owning [`crate::Document`]; a detached
/// section falls back to case-insensitive keys until it is attached.
#[derive(Clone)]
pub struct Section {
    raw: RawLines,
    name: String,
    raw_comment: String,
    children: Vec<SectionContent>,
    xform: KeyXform,
    syntax: Syntax,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Self {
            raw: RawLines::default(),
            name: name.to_string(),
            raw_comment: String::new(),
            children: Vec::new(),
            xform: default_key_xform(),
            syntax: Syntax::default(),
        }
    }

    pub(crate) fn from_parsed(
        name: &str,
        raw_comment: &str,
        line: &str,
        xform: KeyXform,
        syntax: Syntax,
    ) -> Self {
        let mut raw = RawLines::default();
        raw.push_line(line);
        Self {
            raw,
            name: name.to_string(),
            raw_comment: raw_comment.to_string(),
            children: Vec::new(),
            xform,
            syntax,
        }
    }

    /// Adopt the document's key normalization and syntax. Keys already
    /// normalized keep their stored form; only properties that never went
    /// through normalization get one now.
    pub(crate) fn bind(&mut self, xform: KeyXform, syntax: Syntax) {
        self.xform = xform;
        self.syntax = syntax;
        for child in &mut self.children {
            if let SectionContent::Property(p) = child {
                p.adopt_syntax(&self.syntax);
                if p.key().is_err() {
                    p.set_normalized_key((self.xform)(p.raw_key()));
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the section, flagging the header for re-synthesis.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.raw.mark_updated();
    }

    /// Text trailing the closing bracket on the header line, including any
    /// leading whitespace and comment prefix.
    pub fn raw_comment(&self) -> &str {
        &self.raw_comment
    }

    pub fn set_raw_comment(&mut self, raw_comment: &str) {
        self.raw_comment = raw_comment.to_string();
        self.raw.mark_updated();
    }

    fn idx_of_normalized(&self, normalized: &str) -> Option<usize> {
        self.children.iter().position(|child| {
            child
                .as_property()
                .and_then(|p| p.key().ok())
                .is_some_and(|k| k == normalized)
        })
    }

    fn idx_of(&self, key: &str) -> Option<usize> {
        self.idx_of_normalized(&(self.xform)(key))
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.idx_of(key).is_some()
    }

    pub fn property(&self, key: &str) -> Result<&Property, Error> {
        let normalized = (self.xform)(key);
        self.idx_of_normalized(&normalized)
            .and_then(|idx| self.children[idx].as_property())
            .ok_or(Error::NoProperty {
                section: self.name.clone(),
                key: normalized,
            })
    }

    pub fn property_mut(&mut self, key: &str) -> Result<&mut Property, Error> {
        let normalized = (self.xform)(key);
        match self.idx_of_normalized(&normalized) {
            Some(idx) => match &mut self.children[idx] {
                SectionContent::Property(p) => Ok(p),
                _ => unreachable!("idx_of_normalized only matches properties"),
            },
            None => Err(Error::NoProperty {
                section: self.name.clone(),
                key: normalized,
            }),
        }
    }

    pub fn iter_properties(&self) -> impl Iterator<Item = &Property> {
        self.children.iter().filter_map(SectionContent::as_property)
    }

    /// Normalized keys of all properties, in document order.
    pub fn properties(&self) -> Vec<String> {
        self.iter_properties()
            .filter_map(|p| p.key().ok().map(str::to_string))
            .collect()
    }

    /// Snapshot of this section as an ordered key/value map.
    pub fn to_map(&self) -> IndexMap<String, Option<String>> {
        self.iter_properties()
            .filter_map(|p| {
                p.key()
                    .ok()
                    .map(|k| (k.to_string(), p.value().map(str::to_string)))
            })
            .collect()
    }

    /// Set `key` to a single-line value, updating it in place if it exists or
    /// appending a new property at the end of the section.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.set_property(key, Some(value))
    }

    /// Like [`Section::set`] but `None` produces a bare-key property.
    pub fn set_property(&mut self, key: &str, value: Option<&str>) -> Result<(), Error> {
        match self.idx_of(key) {
            Some(idx) => {
                let prop = match &mut self.children[idx] {
                    SectionContent::Property(p) => p,
                    _ => unreachable!("idx_of only matches properties"),
                };
                match value {
                    Some(v) => prop.set_value(v)?,
                    None => prop.clear_value(),
                }
            }
            None => {
                let mut prop = self.create_property(key);
                if let Some(v) = value {
                    prop.set_value(v)?;
                }
                prop.set_normalized_key((self.xform)(key));
                self.children.push(SectionContent::Property(prop));
            }
        }
        Ok(())
    }

    /// A detached property configured for this section's syntax.
    fn create_property(&self, key: &str) -> Property {
        Property::with_syntax(key, &self.syntax)
    }

    /// Insert an externally built property, refusing duplicates.
    pub fn add_property(&mut self, mut property: Property) -> Result<(), Error> {
        let normalized = (self.xform)(property.raw_key());
        if self.idx_of_normalized(&normalized).is_some() {
            return Err(Error::DuplicateProperty {
                section: self.name.clone(),
                key: normalized,
            });
        }
        property.adopt_syntax(&self.syntax);
        property.set_normalized_key(normalized);
        self.children.push(SectionContent::Property(property));
        Ok(())
    }

    /// Remove the property for `key`. Returns whether one existed.
    pub fn remove_property(&mut self, key: &str) -> bool {
        self.take_property(key).is_some()
    }

    /// Detach and return the property for `key`, ready for insertion into
    /// another section.
    pub fn take_property(&mut self, key: &str) -> Option<Property> {
        let idx = self.idx_of(key)?;
        match self.children.remove(idx) {
            SectionContent::Property(mut p) => {
                p.clear_normalized_key();
                Some(p)
            }
            _ => unreachable!("idx_of only matches properties"),
        }
    }

    /// Re-key a property, preserving its value and position.
    pub fn rename_property(&mut self, old_key: &str, new_key: &str) -> Result<(), Error> {
        let normalized_new = (self.xform)(new_key);
        if normalized_new != (self.xform)(old_key) && self.idx_of_normalized(&normalized_new).is_some()
        {
            return Err(Error::DuplicateProperty {
                section: self.name.clone(),
                key: normalized_new,
            });
        }
        let name = self.name.clone();
        let normalized_old = (self.xform)(old_key);
        let idx = self
            .idx_of_normalized(&normalized_old)
            .ok_or(Error::NoProperty {
                section: name,
                key: normalized_old,
            })?;
        if let SectionContent::Property(p) = &mut self.children[idx] {
            p.set_raw_key(new_key);
            p.set_normalized_key(normalized_new);
        }
        Ok(())
    }

    /// Drop all children, keeping the header.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Fluent insertion of new blocks starting at child index `idx`.
    pub fn insert_at(&mut self, idx: usize) -> SectionBuilder<'_> {
        SectionBuilder::new(self, idx)
    }

    /// Fluent insertion just before the property for `key`.
    pub fn insert_before(&mut self, key: &str) -> Result<SectionBuilder<'_>, Error> {
        let idx = self.require_idx(key)?;
        Ok(SectionBuilder::new(self, idx))
    }

    /// Fluent insertion just after the property for `key`.
    pub fn insert_after(&mut self, key: &str) -> Result<SectionBuilder<'_>, Error> {
        let idx = self.require_idx(key)?;
        Ok(SectionBuilder::new(self, idx + 1))
    }

    fn require_idx(&self, key: &str) -> Result<usize, Error> {
        let normalized = (self.xform)(key);
        self.idx_of_normalized(&normalized).ok_or(Error::NoProperty {
            section: self.name.clone(),
            key: normalized,
        })
    }

    pub(crate) fn insert_property_at(
        &mut self,
        idx: usize,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let normalized = (self.xform)(key);
        if self.idx_of_normalized(&normalized).is_some() {
            return Err(Error::DuplicateProperty {
                section: self.name.clone(),
                key: normalized,
            });
        }
        let mut prop = self.create_property(key);
        if let Some(v) = value {
            prop.set_value(v)?;
        }
        prop.set_normalized_key(normalized);
        self.children.insert(idx, SectionContent::Property(prop));
        Ok(())
    }

    pub(crate) fn push_property(&mut self, mut property: Property) {
        property.adopt_syntax(&self.syntax);
        property.set_normalized_key((self.xform)(property.raw_key()));
        self.children.push(SectionContent::Property(property));
    }

    pub(crate) fn push_comment_line(&mut self, line: &str) {
        if let Some(SectionContent::Comment(c)) = self.children.last_mut() {
            c.push_line(line);
        } else {
            self.children.push(SectionContent::Comment(Comment::from_line(line)));
        }
    }

    pub(crate) fn push_space_line(&mut self, line: &str) {
        if let Some(SectionContent::Space(s)) = self.children.last_mut() {
            s.push_line(line);
        } else {
            self.children.push(SectionContent::Space(Space::from_line(line)));
        }
    }

    /// Route an indented continuation line to the last child, whatever its
    /// kind: a property absorbs it as a value fragment, trivia keeps it raw.
    pub(crate) fn push_continuation_line(&mut self, line: &str) {
        match self.children.last_mut() {
            Some(SectionContent::Property(p)) => p.push_continuation(line),
            Some(SectionContent::Comment(c)) => c.push_line(line),
            Some(SectionContent::Space(s)) => s.push_line(line),
            None => self.push_space_line(line),
        }
    }

    /// Fold blank runs that belong to a preceding multi-line value back into
    /// that property's value.
    pub(crate) fn merge_blank_lines_into_values(&mut self) {
        let mut i = 0;
        while i + 1 < self.children.len() {
            let (head, tail) = self.children.split_at_mut(i + 1);
            let merged = match (head.last_mut(), tail.first_mut()) {
                (Some(SectionContent::Property(prop)), Some(SectionContent::Space(space))) => {
                    match space.lines().iter().rposition(|l| !l.trim().is_empty()) {
                        Some(last_val_idx) => {
                            let value_lines: Vec<String> =
                                space.lines()[..=last_val_idx].to_vec();
                            let fragment: String = value_lines
                                .iter()
                                .map(|l| l.trim_start_matches(' '))
                                .collect();
                            prop.merge_space_fragment(fragment, &value_lines);
                            space.drain_lines(last_val_idx + 1);
                            space.is_drained()
                        }
                        None => false,
                    }
                }
                _ => false,
            };
            if merged {
                self.children.remove(i + 1);
            }
            i += 1;
        }
    }

    pub fn render(&self) -> String {
        let mut out = if self.raw.is_updated() {
            format!("[{}]{}\n", self.name, self.raw_comment)
        } else {
            let mut text = self.raw.text();
            if !self.children.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text
        };
        for child in &self.children {
            out.push_str(&child.render());
        }
        out
    }
}

impl Container for Section {
    type Child = SectionContent;

    fn children(&self) -> &[SectionContent] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<SectionContent> {
        &mut self.children
    }
}

impl From<&str> for Section {
    fn from(name: &str) -> Self {
        Section::new(name)
    }
}

impl From<String> for Section {
    fn from(name: String) -> Self {
        Section::new(&name)
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name)
            .field("raw_comment", &self.raw_comment)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.children == other.children
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
