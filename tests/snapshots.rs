//! Dump format snapshots

use bst::bst::formats::{to_sexp, to_treeviz_str};
use bst::{parse, DumpOptions, FormatRegistry};

fn sexp(source: &str) -> String {
    to_sexp(&parse(source), &DumpOptions::default())
}

#[test]
fn test_sexp_style_file() {
    let source = "\
ENTRY { author } { } { label }
FUNCTION {f} { 'author #1 > { \"x\" } 'skip$ if$ }
READ
";
    insta::assert_snapshot!(sexp(source), @r#"
    (source_file
      (entry
        fields: (identifier_list
          (identifier))
        integers: (identifier_list)
        strings: (identifier_list
          (identifier)))
      (function
        name: (identifier)
        body: (block
          term: (ref
            symbol: (identifier))
          term: (integer)
          term: (operator)
          term: (block
            term: (string))
          term: (ref
            symbol: (builtin))
          term: (builtin)))
      (read))
    "#);
}

#[test]
fn test_sexp_macro() {
    insta::assert_snapshot!(sexp("MACRO {jan} {\"January\"}"), @r#"
    (source_file
      (macro
        pattern: (pattern)
        subst: (string)))
    "#);
}

#[test]
fn test_sexp_missing_brace() {
    insta::assert_snapshot!(sexp("ENTRY { }\nREAD"), @r#"
    (source_file
      (entry
        fields: (identifier_list)
        (MISSING "{"))
      (read))
    "#);
}

#[test]
fn test_sexp_unexpected_tokens() {
    insta::assert_snapshot!(sexp("EXECUTE x y\nSORT"), @r#"
    (source_file
      (execute
        (ERROR
          (identifier)
          (identifier)))
      (sort))
    "#);
}

#[test]
fn test_sexp_comments_are_named() {
    insta::assert_snapshot!(sexp("% header\nSORT"), @r#"
    (source_file
      (comment)
      (sort))
    "#);
}

#[test]
fn test_sexp_with_ranges() {
    let options = DumpOptions {
        show_ranges: true,
        ..Default::default()
    };
    insta::assert_snapshot!(to_sexp(&parse("EXECUTE {x}"), &options), @r#"
    (source_file [0..11]
      (execute [0..11]
        func: (identifier [9..10])))
    "#);
}

#[test]
fn test_treeviz_execute() {
    let output = to_treeviz_str(&parse("EXECUTE {x}"), &DumpOptions::default());
    insta::assert_snapshot!(output.trim_end(), @r#"
    └─ execute: EXECUTE {x}
      ├─ keyword: EXECUTE
      ├─ {: {
      ├─ identifier (func): x
      └─ }: }
    "#);
}

#[test]
fn test_json_snapshot() {
    let output = FormatRegistry::default()
        .serialize(&parse("SORT"), "json", &DumpOptions::default())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "nodes": [
                { "kind": "source_file", "range": { "start": 0, "end": 4 } },
                { "kind": "sort", "parent": 0, "range": { "start": 0, "end": 4 } },
                {
                    "kind": "keyword",
                    "parent": 1,
                    "range": { "start": 0, "end": 4 },
                    "text": "SORT"
                }
            ]
        })
    );
}

#[test]
fn test_json_carries_errors() {
    let output = FormatRegistry::default()
        .serialize(&parse("EXECUTE {}"), "json", &DumpOptions::default())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let marker = &value["nodes"][4];
    assert_eq!(marker["kind"], "ERROR");
    assert_eq!(marker["parent"], 1);
    assert_eq!(
        marker["error"],
        serde_json::json!({ "type": "missing_token", "expected": "symbol" })
    );
}

#[test]
fn test_yaml_and_json_agree() {
    let tree = parse("FUNCTION {f} { #1 }");
    let registry = FormatRegistry::default();
    let options = DumpOptions::default();
    let json: serde_json::Value =
        serde_json::from_str(&registry.serialize(&tree, "json", &options).unwrap()).unwrap();
    let yaml: serde_json::Value =
        serde_yaml::from_str(&registry.serialize(&tree, "yaml", &options).unwrap()).unwrap();
    assert_eq!(json, yaml);
}
