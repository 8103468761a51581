//! The position-free half of the tree. Green elements know their width and
//! nothing about where they sit, so identical subtrees can be shared.

use std::fmt;
use std::hash::{Hash, Hasher};

use lunar_errors::{Diagnostic, ErrorCode};
use text_size::{TextLen, TextRange, TextSize};
use triomphe::Arc;

use crate::{GreenTrivia, NodeOrToken, SyntaxKind};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.width(),
            NodeOrToken::Token(token) => token.width(),
        }
    }
}

/// A diagnostic whose range is relative to the start of the element that
/// owns it, leading trivia included.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GreenDiagnostic {
    pub code: ErrorCode,
    pub range: TextRange,
    pub args: Box<[String]>,
}

impl GreenDiagnostic {
    pub fn new(code: ErrorCode, range: TextRange, args: Vec<String>) -> Self {
        Self { code, range, args: args.into_boxed_slice() }
    }

    /// Converts to an absolute diagnostic for an owner starting at `offset`.
    pub fn to_diagnostic(&self, offset: TextSize) -> Diagnostic {
        Diagnostic::new(self.code, self.range + offset, self.args.to_vec())
    }
}

/// Decoded value of a literal token.
#[derive(Clone, Debug, Default)]
pub enum TokenValue {
    #[default]
    None,
    Integer(i64),
    Float(f64),
    /// Lua strings are byte strings; escapes may produce invalid UTF-8.
    String(Box<[u8]>),
}

impl TokenValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            TokenValue::Integer(value) => Some(value as f64),
            TokenValue::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TokenValue::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::None, TokenValue::None) => true,
            (TokenValue::Integer(a), TokenValue::Integer(b)) => a == b,
            (TokenValue::Float(a), TokenValue::Float(b)) => a.to_bits() == b.to_bits(),
            (TokenValue::String(a), TokenValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TokenValue {}

impl Hash for TokenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TokenValue::None => {}
            TokenValue::Integer(value) => value.hash(state),
            TokenValue::Float(value) => value.to_bits().hash(state),
            TokenValue::String(bytes) => bytes.hash(state),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

#[derive(PartialEq, Eq, Hash)]
struct GreenNodeData {
    kind: SyntaxKind,
    width: TextSize,
    /// Leading trivia of the first token and trailing trivia of the last one,
    /// `None` when the subtree holds no tokens.
    trivia_edges: Option<(TextSize, TextSize)>,
    children: Box<[Option<GreenElement>]>,
    diagnostics: Box<[GreenDiagnostic]>,
}

impl Drop for GreenNodeData {
    fn drop(&mut self) {
        let mut stack: Vec<GreenNode> = Vec::new();
        take_child_nodes(&mut self.children, &mut stack);
        while let Some(mut node) = stack.pop() {
            if let Some(data) = Arc::get_mut(&mut node.data) {
                take_child_nodes(&mut data.children, &mut stack);
            }
        }
    }
}

fn take_child_nodes(children: &mut [Option<GreenElement>], stack: &mut Vec<GreenNode>) {
    for slot in children.iter_mut() {
        if let Some(NodeOrToken::Node(node)) = slot.take() {
            stack.push(node);
        }
    }
}

impl GreenNode {
    /// `None` children are absent slots: optional grammar elements that were
    /// not written.
    pub fn new(
        kind: SyntaxKind,
        children: Vec<Option<GreenElement>>,
        diagnostics: Vec<GreenDiagnostic>,
    ) -> Self {
        debug_assert!(kind.is_node(), "{kind:?} is not a node kind");

        let width = children.iter().flatten().map(GreenElement::width).sum();
        debug_assert!(diagnostics.iter().all(|diagnostic| diagnostic.range.end() <= width));

        let leading = children.iter().flatten().find_map(|child| match child {
            NodeOrToken::Node(node) => node.data.trivia_edges.map(|(leading, _)| leading),
            NodeOrToken::Token(token) => Some(token.leading().len()),
        });
        let trailing = children.iter().rev().flatten().find_map(|child| match child {
            NodeOrToken::Node(node) => node.data.trivia_edges.map(|(_, trailing)| trailing),
            NodeOrToken::Token(token) => Some(token.trailing().len()),
        });

        let data = GreenNodeData {
            kind,
            width,
            trivia_edges: leading.zip(trailing),
            children: children.into_boxed_slice(),
            diagnostics: diagnostics.into_boxed_slice(),
        };
        Self { data: Arc::new(data) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn width(&self) -> TextSize {
        self.data.width
    }

    /// All child slots, absent ones included.
    pub fn slots(&self) -> &[Option<GreenElement>] {
        &self.data.children
    }

    pub fn children(&self) -> impl Iterator<Item = &GreenElement> {
        self.data.children.iter().flatten()
    }

    /// Diagnostics raised for this node itself, not its descendants.
    pub fn diagnostics(&self) -> &[GreenDiagnostic] {
        &self.data.diagnostics
    }

    /// Whether any token, missing ones included, sits below this node.
    pub fn has_tokens(&self) -> bool {
        self.data.trivia_edges.is_some()
    }

    pub fn first_token(&self) -> Option<&GreenToken> {
        let mut node = self;
        loop {
            let child = node.children().find(|child| match child {
                NodeOrToken::Node(node) => node.has_tokens(),
                NodeOrToken::Token(_) => true,
            })?;
            match child {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    pub fn last_token(&self) -> Option<&GreenToken> {
        let mut node = self;
        loop {
            let child = node.data.children.iter().rev().flatten().find(|child| match child {
                NodeOrToken::Node(node) => node.has_tokens(),
                NodeOrToken::Token(_) => true,
            })?;
            match child {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    /// Range covered by the node without its outermost trivia.
    pub fn trimmed_range(&self) -> TextRange {
        let (leading, trailing) = self.data.trivia_edges.unwrap_or_default();

        let end = self.width() - trailing;
        TextRange::new(leading.min(end), end)
    }

    pub fn write_text(&self, buf: &mut String) {
        let mut stack: Vec<&GreenElement> = self.data.children.iter().rev().flatten().collect();
        while let Some(element) = stack.pop() {
            match element {
                NodeOrToken::Node(node) => stack.extend(node.data.children.iter().rev().flatten()),
                NodeOrToken::Token(token) => buf.push_str(token.text()),
            }
        }
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.data).cast()
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::with_capacity(self.width().into());
        self.write_text(&mut text);
        f.write_str(&text)
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("width", &self.width())
            .field("slots", &self.slots().len())
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

#[derive(PartialEq, Eq, Hash)]
struct GreenTokenData {
    kind: SyntaxKind,
    /// Full text, trivia included.
    text: Box<str>,
    leading: GreenTrivia,
    trailing: GreenTrivia,
    value: TokenValue,
    diagnostics: Box<[GreenDiagnostic]>,
}

impl GreenToken {
    pub fn new(
        kind: SyntaxKind,
        text: &str,
        leading: GreenTrivia,
        trailing: GreenTrivia,
        value: TokenValue,
        diagnostics: Vec<GreenDiagnostic>,
    ) -> Self {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        debug_assert!(leading.len() + trailing.len() <= text.text_len());
        debug_assert!(
            diagnostics.iter().all(|diagnostic| diagnostic.range.end() <= text.text_len())
        );

        let data = GreenTokenData {
            kind,
            text: text.into(),
            leading,
            trailing,
            value,
            diagnostics: diagnostics.into_boxed_slice(),
        };
        Self { data: Arc::new(data) }
    }

    /// A zero-width token standing in for one the parser expected but did
    /// not find.
    pub fn missing(kind: SyntaxKind, diagnostics: Vec<GreenDiagnostic>) -> Self {
        Self::new(
            kind,
            "",
            GreenTrivia::empty(),
            GreenTrivia::empty(),
            TokenValue::None,
            diagnostics,
        )
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    /// Full text, including leading and trailing trivia.
    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn text_trimmed(&self) -> &str {
        let range = self.trimmed_range();
        &self.data.text[range]
    }

    /// Range of the token proper, relative to the start of its leading trivia.
    pub fn trimmed_range(&self) -> TextRange {
        TextRange::new(self.leading().len(), self.width() - self.trailing().len())
    }

    pub fn width(&self) -> TextSize {
        self.data.text.text_len()
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }

    pub fn value(&self) -> &TokenValue {
        &self.data.value
    }

    pub fn diagnostics(&self) -> &[GreenDiagnostic] {
        &self.data.diagnostics
    }

    pub fn is_missing(&self) -> bool {
        self.kind() != SyntaxKind::EOF && self.width() == TextSize::new(0)
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.data).cast()
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .field("value", self.value())
            .finish()
    }
}
