//! Incremental builder for green trees.

use lunar_errors::{Diagnostic, ErrorCode};
use text_size::{TextLen, TextRange, TextSize};

use crate::cache::NodeCache;
use crate::green::{GreenDiagnostic, GreenElement, GreenNode, GreenToken, TokenValue};
use crate::{GreenTrivia, NodeOrToken, SyntaxKind};

struct OpenNode {
    kind: SyntaxKind,
    first_child: usize,
    errors: Vec<(ErrorCode, Vec<String>)>,
}

/// Builds a green tree bottom-up from a stream of start, token and finish
/// calls. Diagnostics are passed in with absolute ranges and stored relative
/// to the element that owns them.
#[derive(Default)]
pub struct Builder {
    cache: NodeCache,
    parents: Vec<OpenNode>,
    children: Vec<Option<GreenElement>>,
    text_len: TextSize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute end of the text pushed so far.
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push(OpenNode { kind, first_child: self.children.len(), errors: Vec::new() });
    }

    /// Attaches an error to the innermost open node. Its range is the node's
    /// trimmed range, resolved once the node is finished.
    #[track_caller]
    pub fn node_error(&mut self, code: ErrorCode, args: Vec<String>) {
        let Some(node) = self.parents.last_mut() else {
            panic!("`node_error` called with no open node");
        };
        node.errors.push((code, args));
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let Some(OpenNode { kind, first_child, errors }) = self.parents.pop() else {
            panic!("`finish_node` called with no open node");
        };

        let children: Vec<_> = self.children.drain(first_child..).collect();
        let node = if errors.is_empty() {
            self.cache.node(kind, children, Vec::new())
        } else {
            // Node errors are never interned, so the range can be computed
            // from a throwaway node first.
            let range = GreenNode::new(kind, children.clone(), Vec::new()).trimmed_range();
            let diagnostics = errors
                .into_iter()
                .map(|(code, args)| GreenDiagnostic::new(code, range, args))
                .collect();
            self.cache.node(kind, children, diagnostics)
        };

        self.children.push(Some(NodeOrToken::Node(node)));
    }

    /// Adds a token. `text` is the full text, trivia included, and must
    /// start at [`Builder::text_len`].
    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: &str,
        leading: GreenTrivia,
        trailing: GreenTrivia,
        value: TokenValue,
        diagnostics: &[Diagnostic],
    ) {
        let diagnostics = self.relative(diagnostics);
        let token = self.cache.token(kind, text, leading, trailing, value, diagnostics);

        self.text_len += text.text_len();
        self.children.push(Some(NodeOrToken::Token(token)));
    }

    /// Adds a zero-width placeholder for a token that should have been here.
    pub fn missing(&mut self, kind: SyntaxKind, diagnostics: &[Diagnostic]) {
        let diagnostics = self.relative(diagnostics);
        self.children.push(Some(NodeOrToken::Token(GreenToken::missing(kind, diagnostics))));
    }

    /// Adds an absent slot for an optional element that was not written.
    pub fn absent(&mut self) {
        self.children.push(None);
    }

    /// Finishes building and returns the root node.
    #[track_caller]
    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unfinished nodes: {}", self.parents.len());

        match (self.children.pop(), self.children.is_empty()) {
            (Some(Some(NodeOrToken::Node(root))), true) => root,
            _ => panic!("the builder must produce exactly one root node"),
        }
    }

    fn relative(&self, diagnostics: &[Diagnostic]) -> Vec<GreenDiagnostic> {
        diagnostics
            .iter()
            .map(|diagnostic| {
                let range = diagnostic.range();
                debug_assert!(range.start() >= self.text_len, "diagnostic before its token");
                let range = TextRange::new(
                    range.start().max(self.text_len) - self.text_len,
                    range.end().max(self.text_len) - self.text_len,
                );
                GreenDiagnostic::new(diagnostic.code(), range, diagnostic.args().to_vec())
            })
            .collect()
    }
}
