use drop_bomb::DropBomb;
use lunar_errors::{Diagnostic, ErrorCode};
use lunar_inputs::LuaSyntaxOptions;
use lunar_tokenizer::{Token, Tokenizer};
use lunar_yellow::SyntaxKind::{self, *};
use lunar_yellow::{Builder, GreenNode, GreenTrivia, SyntaxSet, TriviaPiece};
use text_size::TextRange;

/// Nesting limit for statements and expressions.
const MAX_DEPTH: u32 = 200;

type NodeError = (ErrorCode, Vec<String>);

pub(crate) struct Parser<'db> {
    tokenizer: Tokenizer<'db>,
    events: Vec<Event>,
    depth: u32,
    after_line_break: bool,
}

impl<'db> Parser<'db> {
    pub(crate) fn new(text: &'db str, options: LuaSyntaxOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(text, options),
            events: Vec::new(),
            depth: 0,
            after_line_break: false,
        }
    }

    pub(crate) fn options(&self) -> LuaSyntaxOptions {
        self.tokenizer.options()
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    /// Kind of the token `n` positions ahead; `0` is the current token.
    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.tokenizer.peek_nth(n).kind
    }

    pub(crate) fn peek_text(&self) -> &'db str {
        self.tokenizer.peek().text(self.tokenizer.text())
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    /// Whether a line break separates the current token from the previous one.
    pub(crate) fn after_line_break(&self) -> bool {
        self.after_line_break
    }

    pub(crate) fn advance(&mut self) {
        if self.at(EOF) {
            return;
        }

        let token = self.tokenizer.next_token();
        self.push_token(token);
    }

    /// Consumes the current token, giving it `kind` in the tree.
    pub(crate) fn advance_as(&mut self, kind: SyntaxKind) {
        if self.at(EOF) {
            return;
        }

        let mut token = self.tokenizer.next_token();
        token.kind = kind;
        self.push_token(token);
    }

    /// Consumes `EOF`. It is the only token that is never skipped.
    pub(crate) fn finish_input(&mut self) {
        debug_assert!(self.at(EOF));
        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    fn push_token(&mut self, token: Token) {
        self.after_line_break = token.trailing.contains(END_OF_LINE);
        self.events.push(Event::Token(token));
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    /// Consumes `kind` or leaves a missing token in its place.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }

        let current = self.peek_kind();
        let (code, args) = match kind {
            NAME if current.is_keyword() => {
                (ErrorCode::IdentifierExpectedKw, vec![self.peek_text().to_owned()])
            }
            NAME => (ErrorCode::IdentifierExpected, Vec::new()),
            _ => (ErrorCode::TokenExpected, vec![kind.describe().to_owned()]),
        };
        self.events.push(Event::Missing { kind, error: Some((code, args)) });
        false
    }

    /// Fills an optional `;` slot.
    pub(crate) fn eat_semicolon(&mut self) {
        if !self.eat(SEMICOLON) {
            self.absent();
        }
    }

    /// Leaves an empty slot for an optional element.
    pub(crate) fn absent(&mut self) {
        self.events.push(Event::Absent);
    }

    /// A missing token that needs no diagnostic of its own.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing { kind, error: None });
    }

    pub(crate) fn missing_with_error(&mut self, kind: SyntaxKind, code: ErrorCode, args: Vec<String>) {
        self.events.push(Event::Missing { kind, error: Some((code, args)) });
    }

    /// Moves the current token into the leading trivia of the next token
    /// that makes it into the tree.
    pub(crate) fn skip(&mut self, code: ErrorCode, args: Vec<String>) {
        if self.at(EOF) {
            return;
        }

        let token = self.tokenizer.next_token();
        tracing::trace!(kind = ?token.kind, range = ?token.kind_range, ?code, "skipping token");

        let diagnostic = Diagnostic::new(code, token.kind_range, args);
        self.after_line_break = token.trailing.contains(END_OF_LINE);
        self.events.push(Event::Skipped { token, diagnostic });
    }

    /// Enters one level of nesting, or returns `false` when the limit is reached.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn build_tree(self) -> GreenNode {
        let Parser { tokenizer, mut events, .. } = self;
        let text = tokenizer.text();
        let tokens = events.iter().filter(|event| matches!(event, Event::Token(_))).count();
        tracing::debug!(events = events.len(), tokens, "building tree");

        let mut builder = Builder::new();
        let mut forward_parents = Vec::new();
        let mut skipped = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish { errors } => {
                    for (code, args) in errors {
                        builder.node_error(code, args);
                    }
                    builder.finish_node();
                }
                Event::Token(token) => {
                    let token = attach_skipped(&mut skipped, token);
                    builder.token(
                        token.kind,
                        token.full_text(text),
                        token.leading,
                        token.trailing,
                        token.value,
                        &token.diagnostics,
                    );
                }
                Event::Skipped { token, diagnostic } => skipped.push((token, diagnostic)),
                Event::Missing { kind, error } => {
                    let diagnostics: Vec<_> = error
                        .into_iter()
                        .map(|(code, args)| {
                            Diagnostic::new(code, TextRange::empty(builder.text_len()), args)
                        })
                        .collect();
                    builder.missing(kind, &diagnostics);
                }
                Event::Absent => builder.absent(),
            }
        }

        debug_assert!(skipped.is_empty(), "skipped tokens after end of file");
        builder.finish()
    }
}

/// Folds skipped tokens into the leading trivia of `token`.
fn attach_skipped(skipped: &mut Vec<(Token, Diagnostic)>, mut token: Token) -> Token {
    if skipped.is_empty() {
        return token;
    }

    let mut pieces = Vec::new();
    let mut diagnostics = Vec::new();
    for (skipped, diagnostic) in skipped.drain(..) {
        pieces.extend_from_slice(skipped.leading.pieces());
        pieces.push(TriviaPiece::new(SKIPPED_TOKEN, skipped.kind_range.len()));
        pieces.extend_from_slice(skipped.trailing.pieces());
        diagnostics.push(diagnostic);
        diagnostics.extend(skipped.diagnostics);
    }
    pieces.extend_from_slice(token.leading.pieces());
    diagnostics.append(&mut token.diagnostics);

    token.leading = GreenTrivia::new(&pieces);
    token.diagnostics = diagnostics;
    token
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Skipped { token: Token, diagnostic: Diagnostic },
    Missing { kind: SyntaxKind, error: Option<NodeError> },
    Absent,
    Finish { errors: Vec<NodeError> },
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        let finish = p.events.len() as u32;
        p.events.push(Event::Finish { errors: Vec::new() });
        CompletedMarker { pos: self.position, finish, kind }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
    finish: u32,
    kind: SyntaxKind,
}

impl CompletedMarker {
    pub(crate) fn kind(self) -> SyntaxKind {
        self.kind
    }

    /// Reports an error spanning the completed node.
    pub(crate) fn error(self, p: &mut Parser<'_>, code: ErrorCode) {
        match &mut p.events[self.finish as usize] {
            Event::Finish { errors } => errors.push((code, Vec::new())),
            _ => unreachable!(),
        }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
