use std::rc::Rc;

use regex::Regex;
use thiserror::Error;

use crate::model::container::Container;
use crate::model::document::{ConfigContent, Document};
use crate::model::property::Property;
use crate::model::section::Section;
use crate::model::trivia::{Comment, Space};
use crate::parsing::lines;
use crate::syntax::{default_key_xform, KeyXform, Syntax};

/// One line the parser could not classify. Collected rather than raised so a
/// single pass reports every offender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub lineno: usize,
    pub line: String,
}

fn format_issues(issues: &[ParseIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n\t[line {:2}]: {:?}", issue.lineno, issue.line))
        .collect()
}

/// Fatal and accumulated parse failures.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{origin}:{lineno}: property line found before any section header: {line:?}")]
    MissingSectionHeader {
        origin: String,
        lineno: usize,
        line: String,
    },

    #[error("{origin}:{lineno}: section `{name}` already declared")]
    DuplicateSection {
        origin: String,
        lineno: usize,
        name: String,
    },

    #[error("{origin}:{lineno}: property `{key}` already declared in section `{section}`")]
    DuplicateOption {
        origin: String,
        lineno: usize,
        section: String,
        key: String,
    },

    #[error("{origin} contains parsing errors:{}", format_issues(.issues))]
    Invalid {
        origin: String,
        issues: Vec<ParseIssue>,
    },

    #[error("bad syntax pattern: {0}")]
    BadPattern(#[from] regex::Error),
}

struct Grammar {
    section: Regex,
    option: Regex,
}

impl Grammar {
    fn compile(syntax: &Syntax) -> Result<Self, regex::Error> {
        let delims = syntax
            .delimiters
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        let option = if syntax.allow_no_value {
            format!(r"^(?P<option>.*?)\s*(?:(?P<vi>{delims})\s*(?P<value>.*))?$")
        } else {
            format!(r"^(?P<option>.*?)\s*(?P<vi>{delims})\s*(?P<value>.*)$")
        };
        Ok(Self {
            section: Regex::new(r"^\[(?P<header>[^\]]+)\](?P<raw_comment>.*)$")?,
            option: Regex::new(&option)?,
        })
    }
}

/// Line-oriented parser producing a lossless [`Document`].
///
/// Each physical line lands verbatim in exactly one node. Classification per
/// line, in order: full-line comment, blank, indented continuation of the
/// current property, section header, property, indented comment. Anything
/// left over is collected as a [`ParseIssue`].
pub struct Parser {
    syntax: Syntax,
    xform: KeyXform,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            xform: default_key_xform(),
        }
    }

    /// Override the key normalization applied to parsed property keys.
    pub fn key_xform<F>(mut self, xform: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.xform = Rc::new(xform);
        self
    }

    pub(crate) fn key_xform_rc(mut self, xform: KeyXform) -> Self {
        self.xform = xform;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Document, ParseError> {
        self.parse_named(text, "<string>")
    }

    /// Parse `text`, labelling errors with `source` (a file path or other
    /// origin marker).
    pub fn parse_named(&self, text: &str, source: &str) -> Result<Document, ParseError> {
        let grammar = Grammar::compile(&self.syntax)?;
        let mut doc = Document::with_parts(self.syntax.clone(), self.xform.clone());
        let mut issues: Vec<ParseIssue> = Vec::new();
        let mut cur_option: Option<String> = None;
        let mut indent_level: usize = 0;

        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let lineno = idx + 1;
            let facts = lines::classify(line, &self.syntax);

            if facts.is_full_comment {
                add_comment(&mut doc, line);
                continue;
            }

            let semantic = &line[..facts.comment_start.unwrap_or(line.len())];
            let value = semantic.trim();

            if value.is_empty() {
                if !self.syntax.empty_lines_in_values {
                    // A blank line hard-terminates the value being collected.
                    indent_level = usize::MAX;
                }
                if facts.comment_start.is_none() {
                    add_space(&mut doc, line);
                }
                continue;
            }

            let cur_indent = lines::indent_of(line);
            let in_section = matches!(doc.last(), Some(ConfigContent::Section(_)));

            if in_section && cur_option.is_some() && cur_indent > indent_level {
                if let Some(section) = last_section(&mut doc) {
                    section.push_continuation_line(line);
                }
                continue;
            }
            indent_level = cur_indent;

            if let Some(caps) = grammar.section.captures(value) {
                let name = caps["header"].to_string();
                let raw_comment = caps
                    .name("raw_comment")
                    .map(|m| m.as_str())
                    .unwrap_or("")
                    .to_string();
                if self.syntax.strict && doc.has_section(&name) {
                    return Err(ParseError::DuplicateSection {
                        origin: source.to_string(),
                        lineno,
                        name,
                    });
                }
                cur_option = None;
                doc.push_parsed(Section::from_parsed(
                    &name,
                    &raw_comment,
                    line,
                    self.xform.clone(),
                    self.syntax.clone(),
                ));
            } else if !in_section {
                return Err(ParseError::MissingSectionHeader {
                    origin: source.to_string(),
                    lineno,
                    line: line.to_string(),
                });
            } else if let Some(caps) = grammar.option.captures(value) {
                let raw_key = caps
                    .name("option")
                    .map(|m| m.as_str().trim_end())
                    .unwrap_or("")
                    .to_string();
                if raw_key.is_empty() {
                    // A delimiter with nothing in front of it names no key.
                    issues.push(ParseIssue {
                        lineno,
                        line: line.to_string(),
                    });
                    continue;
                }
                let delimiter = caps.name("vi").map(|m| m.as_str().to_string());
                let optval = caps.name("value").map(|m| m.as_str().trim().to_string());
                let strict = self.syntax.strict;
                if let Some(section) = last_section(&mut doc) {
                    if strict && section.has_property(&raw_key) {
                        return Err(ParseError::DuplicateOption {
                            origin: source.to_string(),
                            lineno,
                            section: section.name().to_string(),
                            key: (self.xform)(&raw_key),
                        });
                    }
                    cur_option = Some((self.xform)(&raw_key));
                    section.push_property(Property::from_parsed(
                        &raw_key,
                        delimiter.as_deref(),
                        optval.as_deref(),
                        line,
                        &self.syntax,
                    ));
                }
            } else if starts_with_comment_prefix(line, &self.syntax) {
                add_comment(&mut doc, line);
            } else {
                issues.push(ParseIssue {
                    lineno,
                    line: line.to_string(),
                });
            }
        }

        if !issues.is_empty() {
            return Err(ParseError::Invalid {
                origin: source.to_string(),
                issues,
            });
        }

        if self.syntax.empty_lines_in_values {
            for child in doc.children_mut() {
                if let ConfigContent::Section(section) = child {
                    section.merge_blank_lines_into_values();
                }
            }
        }

        Ok(doc)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Indented comment lines are not full-line comments but still attach as
/// comment blocks when they are not value continuations.
fn starts_with_comment_prefix(line: &str, syntax: &Syntax) -> bool {
    let trimmed = line.trim_start();
    syntax
        .comment_prefixes
        .iter()
        .any(|prefix| trimmed.starts_with(prefix.as_str()))
}

fn last_section(doc: &mut Document) -> Option<&mut Section> {
    doc.children_mut()
        .last_mut()
        .and_then(ConfigContent::as_section_mut)
}

/// Attach a comment line, merging into a trailing comment block. Once a
/// section has started, comments nest inside it.
fn add_comment(doc: &mut Document, line: &str) {
    match doc.children_mut().last_mut() {
        Some(ConfigContent::Section(s)) => {
            s.push_comment_line(line);
            return;
        }
        Some(ConfigContent::Comment(c)) => {
            c.push_line(line);
            return;
        }
        _ => {}
    }
    doc.push(ConfigContent::Comment(Comment::from_line(line)));
}

/// Attach a blank line, merging into a trailing blank run.
fn add_space(doc: &mut Document, line: &str) {
    match doc.children_mut().last_mut() {
        Some(ConfigContent::Section(s)) => {
            s.push_space_line(line);
            return;
        }
        Some(ConfigContent::Space(s)) => {
            s.push_line(line);
            return;
        }
        _ => {}
    }
    doc.push(ConfigContent::Space(Space::from_line(line)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("[main]\nkey = value\n")]
    #[case("# banner\n\n[main]\nkey : value   # kept verbatim\n\n[other]\nlist =\n    a\n    b\n")]
    #[case("[main]\nkey = 1\n\n  continued\n")]
    #[case("[main]  ; header note\nkey = value\n")]
    fn test_untouched_documents_round_trip(#[case] text: &str) {
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_continuation_lines_join_into_value() {
        let doc = Parser::new()
            .parse("[main]\nkey = 1\n    2\n    3\n")
            .unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("1\n2\n3"));
    }

    #[test]
    fn test_blank_line_folds_into_value() {
        let text = "[main]\nkey = 1\n\n  continued\nnext = 2\n";
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("1\n\ncontinued"));
        assert_eq!(doc.get("main", "next").unwrap(), Some("2"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_trailing_blank_run_stays_space() {
        let text = "[main]\nkey = 1\n\n\n";
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("1"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_property_before_header_is_fatal() {
        let err = Parser::new().parse("key = value\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingSectionHeader { lineno: 1, .. }
        ));
    }

    #[test]
    fn test_duplicate_section_rejected_when_strict() {
        let err = Parser::new().parse("[main]\n[main]\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateSection { lineno: 2, .. }
        ));
    }

    #[test]
    fn test_duplicate_section_kept_when_lenient() {
        let syntax = Syntax {
            strict: false,
            ..Syntax::default()
        };
        let text = "[main]\na = 1\n[main]\nb = 2\n";
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.sections(), vec!["main", "main"]);
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_duplicate_property_rejected_when_strict() {
        let err = Parser::new()
            .parse("[main]\nkey = 1\nKEY = 2\n")
            .unwrap_err();
        match err {
            ParseError::DuplicateOption {
                lineno,
                section,
                key,
                ..
            } => {
                assert_eq!(lineno, 3);
                assert_eq!(section, "main");
                assert_eq!(key, "key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_lines_collected() {
        let err = Parser::new()
            .parse("[main]\ngood = 1\nbogus line\nanother!\n")
            .unwrap_err();
        match err {
            ParseError::Invalid { issues, .. } => {
                assert_eq!(issues.len(), 2);
                assert_eq!(issues[0].lineno, 3);
                assert_eq!(issues[1].line, "another!\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_allow_no_value_accepts_bare_keys() {
        let syntax = Syntax {
            allow_no_value: true,
            ..Syntax::default()
        };
        let text = "[flags]\nverbose\nlevel = 3\n";
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.get("flags", "verbose").unwrap(), None);
        assert_eq!(doc.get("flags", "level").unwrap(), Some("3"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_bare_key_rejected_by_default() {
        let err = Parser::new().parse("[flags]\nverbose\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));
    }

    #[test]
    fn test_inline_comment_split_off_value() {
        let syntax = Syntax {
            inline_comment_prefixes: vec![";".to_string()],
            ..Syntax::default()
        };
        let text = "[main]\nkey = value ; note\n";
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("value"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_inline_comment_kept_in_continuation() {
        let syntax = Syntax {
            inline_comment_prefixes: vec![";".to_string()],
            ..Syntax::default()
        };
        let doc = Parser::with_syntax(syntax)
            .parse("[main]\nkey = 1\n    2 ; kept\n")
            .unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("1\n2 ; kept"));
    }

    #[test]
    fn test_blank_line_ends_value_when_configured() {
        let syntax = Syntax {
            empty_lines_in_values: false,
            ..Syntax::default()
        };
        let text = "[main]\nkey = 1\n\nnext = 2\n";
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("1"));
        assert_eq!(doc.get("main", "next").unwrap(), Some("2"));
    }

    #[test]
    fn test_custom_delimiters_and_prefixes() {
        let syntax = Syntax {
            delimiters: vec![":=".to_string()],
            comment_prefixes: vec!["//".to_string()],
            ..Syntax::default()
        };
        let text = "// banner\n[main]\nkey := value\n";
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.get("main", "key").unwrap(), Some("value"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_custom_key_xform_preserves_case() {
        let doc = Parser::new()
            .key_xform(str::to_string)
            .parse("[main]\nMixedCase = 1\n")
            .unwrap();
        assert!(doc.has_property("main", "MixedCase"));
        assert!(!doc.has_property("main", "mixedcase"));
    }

    #[test]
    fn test_indented_comment_under_property_joins_its_value() {
        let text = "[main]\nkey = 1\nother = 2\n   # indented note\n";
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(
            doc.get("main", "other").unwrap(),
            Some("2\n# indented note")
        );
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_indented_comment_after_blank_attaches_as_comment() {
        let text = "[main]\nkey = 1\nother = 2\n\n   ; indented note\n";
        let syntax = Syntax {
            empty_lines_in_values: false,
            ..Syntax::default()
        };
        let doc = Parser::with_syntax(syntax).parse(text).unwrap();
        assert_eq!(doc.get("main", "other").unwrap(), Some("2"));
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_delimiterless_line_with_empty_key_is_invalid() {
        let err = Parser::new().parse("[main]\n= value\n").unwrap_err();
        assert!(matches!(err, ParseError::Invalid { .. }));
    }

    #[test]
    fn test_missing_final_newline_round_trips() {
        let text = "[main]\nkey = value";
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_comments_before_first_section_stay_top_level() {
        let text = "# one\n# two\n\n[main]\nkey = 1\n";
        let doc = Parser::new().parse(text).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.render(), text);
    }
}
