//! Parse engine
//!
//!     The engine drives the lexer and the [SegmentBuilder] from the grammar table. It keeps an
//!     explicit stack of [Frame]s instead of recursing, so nesting depth is bounded by memory,
//!     not by the native stack.
//!
//!     Tokens are pulled one at a time through `peek`, which sets filler tokens (trivia and
//!     lexical errors) aside in a pending list. Pending fillers are attached to whatever node
//!     receives the next real token, or become top-level segments of their own when the
//!     engine is between statements. So fillers can never break a production.
//!
//! Recovery
//!
//!     Every frame handles three situations: the token it expects, a statement keyword or end
//!     of input (the frame closes, flagged as missing or unterminated), and anything else (an
//!     error node that swallows tokens until it is safe to continue). Since keywords always
//!     close frames, a malformed statement cannot leak into the statements after it.
//!
//! Reuse
//!
//!     When re-parsing after an edit, the engine is given a [Resume]. Each time it is between
//!     statements and about to start a new one past the edited region, it checks whether the
//!     previous tree had a statement at the matching old offset. If so the rest of the old tree
//!     is reused verbatim and the engine stops.

use super::builder::SegmentBuilder;
use crate::bst::error::{Construct, Expected, SyntaxError};
use crate::bst::grammar::{Class, Grammar, Item, Production};
use crate::bst::lexing::{lex_at, LexMode, Lexeme};
use crate::bst::syntax::{Field, Segment, SyntaxKind, SyntaxTree};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
enum Frame {
    Statement {
        production: &'static Production,
        step: usize,
        abandoned: bool,
    },
    Group {
        field: Field,
        class: Class,
        list: bool,
        filled: bool,
    },
    Block,
    Ref,
    Unexpected {
        found: SyntaxKind,
        in_group: bool,
        depth: usize,
        mode: LexMode,
        resume_on: Option<Class>,
    },
}

/// Where the old tree can be picked up again.
pub(crate) struct Resume<'a> {
    /// First new offset past the replaced text.
    pub(crate) min_pos: usize,
    /// New offset minus old offset for text after the edit.
    pub(crate) delta: isize,
    pub(crate) old: &'a SyntaxTree,
}

pub(crate) struct Output {
    pub(crate) segments: Vec<Arc<Segment>>,
    /// Index of the first old segment to append, if reuse kicked in.
    pub(crate) reuse_from: Option<usize>,
}

pub(crate) struct Engine<'s, 'r> {
    source: &'s str,
    grammar: &'static Grammar,
    cursor: usize,
    lookahead: Option<(Lexeme, LexMode)>,
    pending: Vec<Lexeme>,
    frames: Vec<Frame>,
    builder: Option<SegmentBuilder>,
    segments: Vec<Arc<Segment>>,
    closed_early: bool,
    resume: Option<Resume<'r>>,
}

impl<'s, 'r> Engine<'s, 'r> {
    pub(crate) fn new(source: &'s str, start: usize, resume: Option<Resume<'r>>) -> Self {
        Engine {
            source,
            grammar: Grammar::get(),
            cursor: start,
            lookahead: None,
            pending: Vec::new(),
            frames: Vec::new(),
            builder: None,
            segments: Vec::new(),
            closed_early: false,
            resume,
        }
    }

    pub(crate) fn run(mut self) -> Output {
        let mut reuse_from = None;
        loop {
            if self.frames.is_empty() {
                match self.step_root() {
                    RootStep::Continue => {}
                    RootStep::Done => break,
                    RootStep::Reuse(index) => {
                        reuse_from = Some(index);
                        break;
                    }
                }
            } else {
                self.step_frame();
            }
        }
        Output {
            segments: self.segments,
            reuse_from,
        }
    }

    // Token plumbing

    /// The next non-filler token in `mode`. Fillers before it go to the pending list.
    fn peek(&mut self, mode: LexMode) -> Option<Lexeme> {
        if let Some((lexeme, cached)) = self.lookahead {
            if cached == mode {
                return Some(lexeme);
            }
            self.lookahead = None;
        }
        loop {
            let lexeme = lex_at(self.source, self.cursor, mode)?;
            if lexeme.kind.is_filler() {
                self.cursor = lexeme.end;
                self.pending.push(lexeme);
                continue;
            }
            self.lookahead = Some((lexeme, mode));
            return Some(lexeme);
        }
    }

    fn flush_pending(&mut self) {
        let Some(builder) = self.builder.as_mut() else {
            return;
        };
        for lexeme in self.pending.drain(..) {
            builder.token(lexeme.kind, lexeme.start, lexeme.end, None);
        }
    }

    /// Consume the lookahead token into the current node.
    fn bump(&mut self, field: Option<Field>) {
        let Some((lexeme, _)) = self.lookahead.take() else {
            return;
        };
        self.flush_pending();
        if let Some(builder) = self.builder.as_mut() {
            builder.token(lexeme.kind, lexeme.start, lexeme.end, field);
        }
        self.cursor = lexeme.end;
    }

    /// Open a node at the lookahead token.
    fn open(&mut self, kind: SyntaxKind, field: Option<Field>) {
        let Some((lexeme, _)) = self.lookahead else {
            return;
        };
        self.flush_pending();
        if let Some(builder) = self.builder.as_mut() {
            builder.start_node(kind, field, lexeme.start);
        }
    }

    fn finish_node(&mut self, error: Option<SyntaxError>) {
        if let Some(builder) = self.builder.as_mut() {
            builder.finish_node(error);
        }
    }

    fn marker(&mut self, error: SyntaxError) {
        trace!(at = self.cursor, %error, "inserting marker");
        if let Some(builder) = self.builder.as_mut() {
            builder.marker(error);
        }
    }

    fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    fn replace_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    /// Drop the innermost frame. Closing the outermost one completes the segment.
    fn pop(&mut self) {
        self.frames.pop();
        if self.frames.is_empty() {
            if let Some(builder) = self.builder.take() {
                let segment = builder.finish(!self.closed_early);
                self.segments.push(Arc::new(segment));
            }
        }
    }

    fn abandon_statement(&mut self) {
        self.closed_early = true;
        let statement = self
            .frames
            .iter_mut()
            .rev()
            .find(|frame| matches!(frame, Frame::Statement { .. }));
        if let Some(Frame::Statement { abandoned, .. }) = statement {
            *abandoned = true;
        }
    }

    /// Start an error node at the lookahead token that swallows tokens until it is safe to stop.
    fn unexpected(&mut self, found: SyntaxKind, in_group: bool, mode: LexMode, resume_on: Option<Class>) {
        trace!(at = self.cursor, %found, in_group, "unexpected token");
        self.open(SyntaxKind::Error, None);
        self.push(Frame::Unexpected {
            found,
            in_group,
            depth: 0,
            mode,
            resume_on,
        });
    }

    // Top level

    fn step_root(&mut self) -> RootStep {
        let next = self.peek(LexMode::Normal);
        self.flush_root_pending();
        let Some(token) = next else {
            return RootStep::Done;
        };
        if let Some(index) = self.reusable(token) {
            return RootStep::Reuse(index);
        }

        self.closed_early = false;
        self.builder = Some(SegmentBuilder::new(token.start));
        let production = match token.kind {
            SyntaxKind::Keyword => self.grammar.production(token.text(self.source)),
            _ => None,
        };
        match production {
            Some(production) => {
                self.open(production.kind, None);
                self.bump(None);
                self.push(Frame::Statement {
                    production,
                    step: 0,
                    abandoned: false,
                });
            }
            None => self.unexpected(token.kind, false, LexMode::Normal, None),
        }
        RootStep::Continue
    }

    /// Fillers between statements become segments of their own.
    fn flush_root_pending(&mut self) {
        for lexeme in self.pending.drain(..) {
            let mut builder = SegmentBuilder::new(lexeme.start);
            builder.token(lexeme.kind, lexeme.start, lexeme.end, None);
            self.segments.push(Arc::new(builder.finish(false)));
        }
    }

    /// The old segment index to continue with, if the old tree can take over at `token`.
    fn reusable(&self, token: Lexeme) -> Option<usize> {
        let resume = self.resume.as_ref()?;
        if token.kind != SyntaxKind::Keyword || token.start < resume.min_pos {
            return None;
        }
        let old_start = usize::try_from(token.start as isize - resume.delta).ok()?;
        let index = resume.old.offsets.binary_search(&old_start).ok()?;
        resume.old.segments[index]
            .is_statement()
            .then_some(index)
    }

    // Frames

    fn step_frame(&mut self) {
        let Some(&frame) = self.frames.last() else {
            return;
        };
        match frame {
            Frame::Statement {
                production,
                step,
                abandoned,
            } => self.step_statement(production, step, abandoned),
            Frame::Group {
                field,
                class,
                list,
                filled,
            } => self.step_group(field, class, list, filled),
            Frame::Block => self.step_block(),
            Frame::Ref => self.step_ref(),
            Frame::Unexpected {
                found,
                in_group,
                depth,
                mode,
                resume_on,
            } => self.step_unexpected(found, in_group, depth, mode, resume_on),
        }
    }

    fn step_statement(&mut self, production: &'static Production, step: usize, abandoned: bool) {
        if abandoned || step == production.items.len() {
            self.finish_node(None);
            self.pop();
            return;
        }
        let next = self.peek(LexMode::Normal);
        match next {
            Some(token) if token.kind == SyntaxKind::LBrace => {
                self.replace_top(Frame::Statement {
                    production,
                    step: step + 1,
                    abandoned,
                });
                match production.items[step] {
                    Item::List(field) => {
                        self.open(SyntaxKind::IdentifierList, Some(field));
                        self.bump(None);
                        self.push(Frame::Group {
                            field,
                            class: Class::Identifier,
                            list: true,
                            filled: false,
                        });
                    }
                    Item::Group { field, class } => {
                        self.bump(None);
                        self.push(Frame::Group {
                            field,
                            class,
                            list: false,
                            filled: false,
                        });
                    }
                    Item::Block(field) => {
                        self.open(SyntaxKind::Block, Some(field));
                        self.bump(None);
                        self.push(Frame::Block);
                    }
                }
            }
            Some(token) if token.kind != SyntaxKind::Keyword => {
                self.abandon_statement();
                self.unexpected(token.kind, false, LexMode::Normal, None);
            }
            _ => {
                self.marker(SyntaxError::MissingToken {
                    expected: Expected::LBrace,
                });
                self.abandon_statement();
            }
        }
    }

    fn step_group(&mut self, field: Field, class: Class, list: bool, filled: bool) {
        let mode = class.mode();
        let next = self.peek(mode);
        let open_slot = list || !filled;
        match next {
            Some(token) if token.kind == SyntaxKind::RBrace => {
                if !list && !filled {
                    self.flush_pending();
                    self.marker(SyntaxError::MissingToken {
                        expected: class.expected(),
                    });
                }
                self.bump(None);
                if list {
                    self.finish_node(None);
                }
                self.pop();
            }
            Some(token) if open_slot && class.accepts(token.kind) => {
                if list {
                    self.bump(None);
                } else {
                    self.bump(Some(field));
                    self.replace_top(Frame::Group {
                        field,
                        class,
                        list,
                        filled: true,
                    });
                }
            }
            Some(token) if token.kind != SyntaxKind::Keyword => {
                let resume_on = open_slot.then_some(class);
                self.unexpected(token.kind, true, mode, resume_on);
            }
            _ => {
                trace!(at = self.cursor, list, "unterminated group");
                if list {
                    self.finish_node(Some(SyntaxError::UnterminatedConstruct {
                        construct: Construct::IdentifierList,
                    }));
                } else {
                    self.marker(SyntaxError::UnterminatedConstruct {
                        construct: Construct::Group,
                    });
                }
                self.abandon_statement();
                self.pop();
            }
        }
    }

    fn step_block(&mut self) {
        match self.peek(LexMode::Normal) {
            Some(token) => match token.kind {
                SyntaxKind::RBrace => {
                    self.bump(None);
                    self.finish_node(None);
                    self.pop();
                }
                SyntaxKind::LBrace => {
                    self.open(SyntaxKind::Block, Some(Field::Term));
                    self.bump(None);
                    self.push(Frame::Block);
                }
                SyntaxKind::Quote => {
                    self.open(SyntaxKind::Ref, Some(Field::Term));
                    self.bump(None);
                    self.push(Frame::Ref);
                }
                kind if kind.is_term_token() => self.bump(Some(Field::Term)),
                SyntaxKind::Keyword => self.unterminated_block(),
                kind => self.unexpected(kind, true, LexMode::Normal, None),
            },
            None => self.unterminated_block(),
        }
    }

    fn unterminated_block(&mut self) {
        trace!(at = self.cursor, "unterminated block");
        self.finish_node(Some(SyntaxError::UnterminatedConstruct {
            construct: Construct::Block,
        }));
        self.abandon_statement();
        self.pop();
    }

    fn step_ref(&mut self) {
        match self.peek(LexMode::Normal) {
            Some(token) if Class::Symbol.accepts(token.kind) => {
                self.bump(Some(Field::Symbol));
            }
            _ => {
                self.marker(SyntaxError::MissingToken {
                    expected: Expected::Symbol,
                });
            }
        }
        self.finish_node(None);
        self.pop();
    }

    fn step_unexpected(
        &mut self,
        found: SyntaxKind,
        in_group: bool,
        depth: usize,
        mode: LexMode,
        resume_on: Option<Class>,
    ) {
        let next = self.peek(mode);
        let stop = match next {
            None => true,
            Some(token) if token.kind == SyntaxKind::Keyword => true,
            Some(token) if in_group && depth == 0 => {
                token.kind == SyntaxKind::RBrace
                    || resume_on.is_some_and(|class| class.accepts(token.kind))
            }
            Some(_) => false,
        };
        if stop {
            if next.map_or(true, |token| token.kind == SyntaxKind::Keyword) {
                self.closed_early = true;
            }
            self.finish_node(Some(SyntaxError::UnexpectedToken { found }));
            self.pop();
            return;
        }

        let Some(token) = next else {
            return;
        };
        let depth = match token.kind {
            SyntaxKind::LBrace => depth + 1,
            SyntaxKind::RBrace => depth.saturating_sub(1),
            _ => depth,
        };
        self.replace_top(Frame::Unexpected {
            found,
            in_group,
            depth,
            mode,
            resume_on,
        });
        self.bump(None);
    }
}

enum RootStep {
    Continue,
    Done,
    Reuse(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Output {
        Engine::new(source, 0, None).run()
    }

    #[test]
    fn segments_cover_the_source() {
        let source = "READ % go\n\nSORT";
        let output = run(source);
        let total: usize = output.segments.iter().map(|s| s.len).sum();
        assert_eq!(total, source.len());
        assert_eq!(output.segments.len(), 5);
        assert!(output.reuse_from.is_none());
    }

    #[test]
    fn closed_statements_are_complete() {
        let output = run("EXECUTE {x}\nREVERSE {y");
        assert!(output.segments[0].is_complete_statement());
        assert!(output.segments[2].is_statement());
        assert!(!output.segments[2].is_complete_statement());
    }

    #[test]
    fn top_level_junk_is_one_error_segment() {
        let output = run("} x { READ");
        let root = output.segments[0].root();
        assert_eq!(root.kind, SyntaxKind::Error);
        assert_eq!(root.end, 5);
        assert!(!output.segments[0].complete);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let depth = 50_000;
        let source = format!("FUNCTION {{f}} {}{}", "{ ".repeat(depth), "} ".repeat(depth));
        let output = run(&source);
        let nodes = output
            .segments
            .iter()
            .map(|segment| segment.nodes.len())
            .max()
            .unwrap();
        assert!(nodes > depth);
    }
}
