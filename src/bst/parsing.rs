//! Parsing entry points
//!
//!     Source text goes through three stages, all driven from [engine]:
//!         1. Lexing: tokens are pulled one at a time in the mode the current production asks
//!            for. See [lexing](crate::bst::lexing).
//!         2. Parsing: the engine walks the [grammar table](crate::bst::grammar) with an explicit
//!            frame stack and emits start/token/finish events, recovering from errors in place.
//!         3. Building: [builder] turns events into one node arena per top-level segment; nodes
//!            are classified into supertypes as they are created.
//!
//!     A parse never fails. Malformed regions become error nodes inside an otherwise normal
//!     tree and are listed by [SyntaxTree::errors].
//!
//!     The free functions [parse] and [parse_bytes] use no limits. [Parser] applies a
//!     [ParserConfig], e.g. a maximum input size for untrusted input.

pub(crate) mod builder;
pub(crate) mod engine;

use crate::bst::config::ParserConfig;
use crate::bst::error::Error;
use crate::bst::incremental::TextEdit;
use crate::bst::syntax::SyntaxTree;
use engine::Engine;
use std::sync::Arc;
use tracing::debug;

/// Parse source text into a concrete syntax tree.
pub fn parse(source: &str) -> SyntaxTree {
    let output = Engine::new(source, 0, None).run();
    let tree = SyntaxTree::from_segments(Arc::from(source), output.segments);
    debug!(
        bytes = source.len(),
        segments = tree.segments.len(),
        statements = tree.statements().count(),
        "parsed"
    );
    tree
}

/// Parse raw bytes, which must be UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<SyntaxTree, Error> {
    let source = std::str::from_utf8(bytes)?;
    Ok(parse(source))
}

/// A parser with configured limits.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn check_size(&self, size: usize) -> Result<(), Error> {
        let limit = self.config.max_input_bytes;
        if limit > 0 && size > limit {
            return Err(Error::InputTooLarge { size, limit });
        }
        Ok(())
    }

    pub fn parse(&self, source: &str) -> Result<SyntaxTree, Error> {
        self.check_size(source.len())?;
        Ok(parse(source))
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<SyntaxTree, Error> {
        self.decode(bytes).map(parse)
    }

    /// Accept raw input under the same size and encoding rules as [Parser::parse_bytes],
    /// for callers that only need the text.
    pub fn decode<'b>(&self, bytes: &'b [u8]) -> Result<&'b str, Error> {
        self.check_size(bytes.len())?;
        Ok(std::str::from_utf8(bytes)?)
    }

    /// Apply an edit to `tree`, enforcing the size limit on the edited text.
    pub fn edit(&self, tree: &SyntaxTree, edit: &TextEdit) -> Result<SyntaxTree, Error> {
        let removed = edit.range.end.saturating_sub(edit.range.start);
        let size = (tree.len() + edit.replacement.len()).saturating_sub(removed);
        self.check_size(size)?;
        Ok(tree.edit(edit)?)
    }
}
