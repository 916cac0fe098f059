//! Node classifier: a static kind to supertype lookup.
//!
//!     Each node is tagged with its supertypes when the builder creates it, so membership tests
//!     on a finished tree are a single bit test.

use super::kind::{SupertypeSet, SyntaxKind};

const STATEMENT: u8 = 0b001;
const TERM: u8 = 0b010;
const SYMBOL: u8 = 0b100;

static SUPERTYPES: [SupertypeSet; SyntaxKind::COUNT] = build_table();

const fn build_table() -> [SupertypeSet; SyntaxKind::COUNT] {
    let mut table = [SupertypeSet::EMPTY; SyntaxKind::COUNT];

    table[SyntaxKind::Entry as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Integers as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Strings as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Macro as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Function as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Read as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Execute as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Iterate as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Sort as usize] = SupertypeSet::from_bits(STATEMENT);
    table[SyntaxKind::Reverse as usize] = SupertypeSet::from_bits(STATEMENT);

    table[SyntaxKind::Integer as usize] = SupertypeSet::from_bits(TERM);
    table[SyntaxKind::String as usize] = SupertypeSet::from_bits(TERM);
    table[SyntaxKind::Ref as usize] = SupertypeSet::from_bits(TERM);
    table[SyntaxKind::Operator as usize] = SupertypeSet::from_bits(TERM);
    table[SyntaxKind::Block as usize] = SupertypeSet::from_bits(TERM);
    table[SyntaxKind::Identifier as usize] = SupertypeSet::from_bits(TERM | SYMBOL);
    table[SyntaxKind::Builtin as usize] = SupertypeSet::from_bits(TERM | SYMBOL);

    table
}

/// Supertypes of a kind.
pub fn classify(kind: SyntaxKind) -> SupertypeSet {
    SUPERTYPES[kind as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst::syntax::kind::Supertype;

    #[test]
    fn statements_are_only_statements() {
        let set = classify(SyntaxKind::Function);
        assert!(set.contains(Supertype::Statement));
        assert!(!set.contains(Supertype::Term));
        assert!(!set.contains(Supertype::Symbol));
    }

    #[test]
    fn identifiers_are_terms_and_symbols() {
        let kinds: Vec<_> = classify(SyntaxKind::Identifier).iter().collect();
        assert_eq!(kinds, vec![Supertype::Term, Supertype::Symbol]);
    }

    #[test]
    fn structural_kinds_have_no_supertype() {
        for kind in [
            SyntaxKind::SourceFile,
            SyntaxKind::IdentifierList,
            SyntaxKind::Error,
            SyntaxKind::Pattern,
            SyntaxKind::Keyword,
        ] {
            assert!(classify(kind).is_empty(), "{kind:?}");
        }
    }
}
