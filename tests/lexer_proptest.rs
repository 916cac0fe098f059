//! Property-based tests for the bst lexer
//!
//! These tests ensure that lexing never fails, that tokens partition the input exactly, and
//! that the parser keeps every token it is given.

use bst::{lex_at, parse, tokenize, LexMode, SyntaxKind};
use proptest::prelude::*;

/// Source-like text: mostly valid tokens, with some noise mixed in.
fn source_like() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        Just("READ".to_string()),
        Just("function".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("'".to_string()),
        Just(":=".to_string()),
        "[a-z][a-z.$]{0,8}",
        "#-?[0-9]{1,4}",
        "\"[a-z ]{0,6}\"?",
        "%[a-z ]{0,10}\n",
        "[ \t\n]{1,3}",
        "[@^~é]",
    ];
    prop::collection::vec(token, 0..50).prop_map(|tokens| tokens.concat())
}

proptest! {
    #[test]
    fn test_tokens_partition_the_source(source in source_like()) {
        let tokens = tokenize(&source);
        let mut cursor = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, cursor);
            prop_assert!(token.end > token.start);
            cursor = token.end;
        }
        prop_assert_eq!(cursor, source.len());
    }

    #[test]
    fn test_arbitrary_text_lexes(source in "\\PC{0,100}") {
        let covered: usize = tokenize(&source).iter().map(|t| t.end - t.start).sum();
        prop_assert_eq!(covered, source.len());
    }

    #[test]
    fn test_tree_keeps_every_token(source in source_like()) {
        let tree = parse(&source);
        let text: String = tree.tokens().map(|token| token.text()).collect();
        prop_assert_eq!(text, source);
    }

    #[test]
    fn test_keywords_ignore_case(upper in prop::sample::select(vec![
        "ENTRY", "INTEGERS", "STRINGS", "MACRO", "FUNCTION",
        "READ", "EXECUTE", "ITERATE", "SORT", "REVERSE",
    ]), mask in any::<u16>()) {
        let mixed: String = upper
            .chars()
            .enumerate()
            .map(|(i, c)| if mask & (1 << i) != 0 { c.to_ascii_lowercase() } else { c })
            .collect();
        let token = lex_at(&mixed, 0, LexMode::Normal).unwrap();
        prop_assert_eq!(token.kind, SyntaxKind::Keyword);
        prop_assert_eq!(token.end, mixed.len());
    }

    #[test]
    fn test_macro_mode_partitions_too(source in "[a-z/{} \n@<]{0,40}") {
        let mut cursor = 0;
        while let Some(token) = lex_at(&source, cursor, LexMode::Macro) {
            prop_assert_eq!(token.start, cursor);
            cursor = token.end;
        }
        prop_assert_eq!(cursor, source.len());
    }
}
