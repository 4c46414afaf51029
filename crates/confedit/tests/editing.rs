//! Editing scenarios across the whole API surface: in-place updates,
//! structural insertion, moves between documents and map snapshots.

use confedit::{Container, Document, Parser, Property, Section, Syntax};
use pretty_assertions::assert_eq;

#[test]
fn test_update_value_in_place() {
    let mut doc = Parser::new().parse("[default]\nkey = 1\n").unwrap();
    doc.section_mut("default")
        .unwrap()
        .property_mut("key")
        .unwrap()
        .set_value("2")
        .unwrap();
    assert_eq!(doc.render(), "[default]\nkey = 2\n");
}

#[test]
fn test_insert_properties_around_existing_key() {
    let syntax = Syntax {
        allow_no_value: true,
        ..Syntax::default()
    };
    let mut doc = Parser::with_syntax(syntax)
        .parse("[section]\nkey1 = 1\n")
        .unwrap();
    let section = doc.section_mut("section").unwrap();
    section
        .insert_before("key1")
        .unwrap()
        .property("key0", "0")
        .unwrap();
    section
        .insert_after("key1")
        .unwrap()
        .property_no_value("key2")
        .unwrap();
    assert_eq!(doc.render(), "[section]\nkey0 = 0\nkey1 = 1\nkey2\n");
}

#[test]
fn test_remove_comment_and_space_leaves_bare_section() {
    let text = "[main]\n# note\n\nkey = 1\n";
    let mut doc = Parser::new().parse(text).unwrap();
    let section = doc.section_mut("main").unwrap();
    // comment at child 0, blank at child 1
    section.remove(0);
    section.remove(0);
    assert_eq!(doc.render(), "[main]\nkey = 1\n");
}

#[test]
fn test_section_holding_only_trivia_reduces_to_header() {
    let text = "[main]\n# note\n\n";
    let mut doc = Parser::new().parse(text).unwrap();
    let section = doc.section_mut("main").unwrap();
    section.remove(0);
    section.remove(0);
    assert_eq!(doc.render(), "[main]\n");
}

#[test]
fn test_move_section_between_documents() {
    let mut src = Parser::new()
        .parse("[keep]\na = 1\n[move]\nb = 2\n")
        .unwrap();
    let mut dst = Document::new();
    let section = src.take_section("move").unwrap();
    dst.add_section(section).unwrap();
    assert_eq!(src.render(), "[keep]\na = 1\n");
    assert_eq!(dst.render(), "[move]\nb = 2\n");
    assert_eq!(dst.get("move", "b").unwrap(), Some("2"));
}

#[test]
fn test_move_property_between_sections() {
    let mut doc = Parser::new().parse("[a]\nkey = 1\n[b]\n").unwrap();
    let prop = doc.section_mut("a").unwrap().take_property("key").unwrap();
    doc.section_mut("b").unwrap().add_property(prop).unwrap();
    assert_eq!(doc.get("b", "key").unwrap(), Some("1"));
    assert!(!doc.has_property("a", "key"));
}

#[test]
fn test_insert_section_with_builder_trivia() {
    let mut doc = Parser::new().parse("[last]\nk = v\n").unwrap();
    doc.insert_before("last")
        .unwrap()
        .comment("generated settings")
        .section("first")
        .unwrap()
        .space(1);
    doc.section_mut("first").unwrap().set("x", "1").unwrap();
    assert_eq!(
        doc.render(),
        "# generated settings\n[first]\nx = 1\n\n[last]\nk = v\n"
    );
}

#[test]
fn test_rewrite_multi_line_value() {
    let text = "[options]\ninstall_requires =\n    requests\n";
    let mut doc = Parser::new().parse(text).unwrap();
    let prop = doc
        .section_mut("options")
        .unwrap()
        .property_mut("install_requires")
        .unwrap();
    prop.append_value("click", "\n");
    assert_eq!(
        doc.render(),
        "[options]\ninstall_requires =\n    requests\n    click\n"
    );
}

#[test]
fn test_rename_section_and_property() {
    let mut doc = Parser::new().parse("[old]\nOldKey = 1\n").unwrap();
    doc.section_mut("old").unwrap().set_name("new");
    doc.section_mut("new")
        .unwrap()
        .rename_property("oldkey", "newkey")
        .unwrap();
    assert_eq!(doc.render(), "[new]\nnewkey = 1\n");
}

#[test]
fn test_custom_key_xform_applies_to_edits() {
    let mut doc = Parser::new()
        .key_xform(str::to_string)
        .parse("[main]\nKey = 1\n")
        .unwrap();
    assert!(doc.has_property("main", "Key"));
    assert!(!doc.has_property("main", "key"));
    doc.set("main", "key", "2").unwrap();
    // distinct under the identity transform
    assert_eq!(doc.section("main").unwrap().properties(), vec!["Key", "key"]);
}

#[test]
fn test_to_map_snapshot_of_parsed_file() {
    let doc = Parser::new()
        .parse("[a]\nx = 1\ny = 2\n[b]\nz = 3\n")
        .unwrap();
    let map = doc.to_map();
    let section_names: Vec<_> = map.keys().cloned().collect();
    assert_eq!(section_names, vec!["a", "b"]);
    assert_eq!(map["a"]["x"], Some("1".to_string()));
    assert_eq!(map["b"]["z"], Some("3".to_string()));
}

#[test]
fn test_clone_gives_independent_tree() {
    let mut doc = Parser::new().parse("[main]\nkey = 1\n").unwrap();
    let snapshot = doc.clone();
    doc.set("main", "key", "2").unwrap();
    assert_eq!(snapshot.render(), "[main]\nkey = 1\n");
    assert_eq!(doc.render(), "[main]\nkey = 2\n");
}

#[test]
fn test_equality_follows_rendered_content() {
    let a = Parser::new().parse("[main]\nkey = 1\n").unwrap();
    let b = Parser::new().parse("[main]\nkey = 1\n").unwrap();
    assert_eq!(a, b);
    let mut c = b.clone();
    c.set("main", "key", "2").unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_validate_format_rejects_unreadable_edit() {
    let mut doc = Document::new();
    let mut prop = Property::new("first\nsecond");
    prop.set_value("v").unwrap();
    let section = doc.add_section("main").unwrap();
    section.add_property(prop).unwrap();
    // the embedded newline splits the key across two lines on render
    assert!(doc.validate_format().is_err());
}

#[test]
fn test_hand_built_valueless_property_degrades_under_default_syntax() {
    let mut doc = Document::new();
    let section = doc.add_section("main").unwrap();
    section.add_property(Property::new("orphan")).unwrap();
    // default syntax has no textual form for a bare key
    assert_eq!(doc.render(), "[main]\n");
    assert_eq!(doc.get("main", "orphan").unwrap(), None);
}

#[test]
fn test_section_from_scratch_adopts_document_syntax() {
    let syntax = Syntax {
        space_around_delimiters: false,
        ..Syntax::default()
    };
    let mut doc = Document::with_syntax(syntax);
    let mut section = Section::new("fresh");
    section.set("early", "1").unwrap();
    doc.add_section(section).unwrap();
    doc.set("fresh", "late", "2").unwrap();
    // attach rebinds rendering rules, so the pre-attach property follows too
    assert_eq!(doc.render(), "[fresh]\nearly=1\nlate=2\n");
}
