//! Public syntax tree API: a lazily materialized, position-aware layer over
//! the green tree.
//!
//! A red node is created the first time its slot is visited and cached in
//! the node that owns the slot, so handles are `Copy`, borrow the tree, and
//! visiting the same slot twice yields the same node.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;
use std::sync::{Arc, OnceLock};

use lunar_errors::Diagnostic;
use lunar_inputs::{LuaSyntaxOptions, SourceRange, SourceText};
use text_size::{TextRange, TextSize};

use crate::green::{GreenNode, GreenToken, TokenValue};
use crate::{SyntaxKind, TriviaPiece};

/// Owned result of a parse.
#[derive(Clone)]
pub struct SyntaxTree {
    inner: Arc<TreeInner>,
}

struct TreeInner {
    text: SourceText,
    green: GreenNode,
    options: LuaSyntaxOptions,
    diagnostics: Box<[Diagnostic]>,
    root: OnceLock<RedNodeData>,
}

impl SyntaxTree {
    /// Bundles a green root with the text it was parsed from. The tree's
    /// diagnostics are collected from every element and ordered by position.
    #[track_caller]
    pub fn new(text: SourceText, green: GreenNode, options: LuaSyntaxOptions) -> Self {
        assert_eq!(green.width(), text.len(), "the tree must cover the whole source text");

        let mut diagnostics = Vec::new();
        collect_diagnostics(&green, TextSize::new(0), &mut diagnostics);
        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());

        let inner = TreeInner {
            text,
            green,
            options,
            diagnostics: diagnostics.into_boxed_slice(),
            root: OnceLock::new(),
        };
        Self { inner: Arc::new(inner) }
    }

    /// Returns the root syntax node.
    pub fn root(&self) -> SyntaxNode<'_> {
        let data = self
            .inner
            .root
            .get_or_init(|| RedNodeData::new(self.inner.green.clone(), TextSize::new(0), 0, None));
        SyntaxNode { tree: &self.inner, data }
    }

    pub fn text(&self) -> &SourceText {
        &self.inner.text
    }

    pub fn green(&self) -> &GreenNode {
        &self.inner.green
    }

    pub fn options(&self) -> LuaSyntaxOptions {
        self.inner.options
    }

    /// Every diagnostic in the tree, ordered by start offset.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.inner.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_error)
    }

    pub fn debug_dump(&self) -> String {
        self.root().debug_dump()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("diagnostics", &self.diagnostics().len())
            .finish_non_exhaustive()
    }
}

unsafe impl salsa::Update for SyntaxTree {
    unsafe fn maybe_update(old_pointer: *mut Self, new_value: Self) -> bool {
        let old_value = unsafe { &mut *old_pointer };
        if old_value.text() == new_value.text() && old_value.options() == new_value.options() {
            false
        } else {
            *old_value = new_value;
            true
        }
    }
}

struct RedNodeData {
    green: GreenNode,
    offset: TextSize,
    index: u32,
    parent: Option<NonNull<RedNodeData>>,
    child_offsets: Box<[TextSize]>,
    children: Box<[OnceLock<Box<RedNodeData>>]>,
}

// SAFETY: `parent` points at the node owning this one through `children`.
// Published nodes are never moved, mutated or dropped before the tree, and
// the pointer is only turned into a shared reference, so it is as thread
// safe as a `&RedNodeData` would be.
unsafe impl Send for RedNodeData {}
unsafe impl Sync for RedNodeData {}

impl RedNodeData {
    fn new(green: GreenNode, offset: TextSize, index: u32, parent: Option<NonNull<Self>>) -> Self {
        let mut next = offset;
        let child_offsets = green
            .slots()
            .iter()
            .map(|slot| {
                let start = next;
                if let Some(child) = slot {
                    next += child.width();
                }
                start
            })
            .collect();
        let children = green.slots().iter().map(|_| OnceLock::new()).collect();

        Self { green, offset, index, parent, child_offsets, children }
    }
}

impl Drop for RedNodeData {
    fn drop(&mut self) {
        let mut stack: Vec<Box<RedNodeData>> =
            self.children.iter_mut().filter_map(OnceLock::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(OnceLock::take));
        }
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    data: &'a RedNodeData,
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data.green.kind()
    }

    #[inline]
    pub fn green(self) -> &'a GreenNode {
        &self.data.green
    }

    /// Returns the range covered by this node, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        TextRange::at(self.data.offset, self.data.green.width())
    }

    /// Returns the range with leading/trailing trivia trimmed away.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.data.green.trimmed_range() + self.data.offset
    }

    /// Line and column span of the trimmed range.
    pub fn span(self) -> SourceRange {
        self.tree.text.range(self.trimmed_range())
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        self.tree.text.slice(self.text_range())
    }

    /// Returns the text slice excluding leading/trailing trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        self.tree.text.slice(self.trimmed_range())
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = self.data.parent?;
        // SAFETY: see `RedNodeData`; a parent lives as long as its children.
        let data = unsafe { parent.as_ref() };
        Some(Self { tree: self.tree, data })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Slot index of this node in its parent.
    #[inline]
    pub fn index(self) -> usize {
        self.data.index as usize
    }

    /// Number of child slots, absent ones included.
    #[inline]
    pub fn slot_count(self) -> usize {
        self.data.green.slots().len()
    }

    /// Returns the element in slot `index`, or `None` if the slot is absent
    /// or out of bounds.
    pub fn child_at(self, index: usize) -> Option<SyntaxElement<'a>> {
        let slot = self.data.green.slots().get(index)?.as_ref()?;
        let offset = self.data.child_offsets[index];

        let element = match slot {
            NodeOrToken::Node(green) => {
                let data: &RedNodeData = self.data.children[index].get_or_init(|| {
                    Box::new(RedNodeData::new(
                        green.clone(),
                        offset,
                        index as u32,
                        Some(NonNull::from(self.data)),
                    ))
                });
                NodeOrToken::Node(SyntaxNode { tree: self.tree, data })
            }
            NodeOrToken::Token(green) => NodeOrToken::Token(SyntaxToken {
                tree: self.tree,
                parent: self.data,
                index: index as u32,
                green,
                offset,
            }),
        };
        Some(element)
    }

    /// Iterates present children including tokens.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { node: self, slots: 0..self.slot_count() }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> Children<'a> {
        Children { inner: self.children_with_tokens() }
    }

    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    /// Returns the first token spanned by this node.
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        let mut node = self;
        loop {
            let child = node.children_with_tokens().find(|child| match child {
                NodeOrToken::Node(node) => node.green().has_tokens(),
                NodeOrToken::Token(_) => true,
            })?;
            match child {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    /// Returns the last token spanned by this node.
    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        let mut node = self;
        loop {
            let child = node.children_with_tokens().rev().find(|child| match child {
                NodeOrToken::Node(node) => node.green().has_tokens(),
                NodeOrToken::Token(_) => true,
            })?;
            match child {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    /// Every token under this node, in document order.
    pub fn descendant_tokens(self) -> impl Iterator<Item = SyntaxToken<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            _ => None,
        })
    }

    /// Every node under this node, itself included, in document order.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }

    /// Returns the token at the given offset, if any.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        let range = self.text_range();
        if range.is_empty() || offset < range.start() || offset > range.end() {
            return TokenAtOffset::None;
        }

        let mut children = self.children_with_tokens().filter(|child| {
            let range = child.text_range();
            !range.is_empty() && range.start() <= offset && offset <= range.end()
        });

        let Some(left) = children.next() else {
            return TokenAtOffset::None;
        };
        let Some(right) = children.next() else {
            return left.token_at_offset(offset);
        };

        let left = left.token_at_offset(offset).left_biased();
        let right = right.token_at_offset(offset).right_biased();
        match (left, right) {
            (Some(left), Some(right)) => TokenAtOffset::Between(left, right),
            (Some(token), None) | (None, Some(token)) => TokenAtOffset::Single(token),
            (None, None) => TokenAtOffset::None,
        }
    }

    /// Returns the smallest element that fully covers `range`.
    pub fn covering_element(self, range: TextRange) -> SyntaxElement<'a> {
        let mut element = NodeOrToken::Node(self);
        loop {
            let NodeOrToken::Node(node) = element else {
                return element;
            };
            let child =
                node.children_with_tokens().find(|child| child.text_range().contains_range(range));
            match child {
                Some(child) => element = child,
                None => return element,
            }
        }
    }

    /// Diagnostics of this node and everything below it, ordered by
    /// start offset.
    pub fn diagnostics(self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        collect_diagnostics(&self.data.green, self.data.offset, &mut diagnostics);
        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
        diagnostics
    }

    /// Indented dump of the subtree: one line per node and token, with
    /// trimmed ranges. Skipped tokens are shown before the token that
    /// carries them.
    pub fn debug_dump(self) -> String {
        let mut buf = String::new();
        let mut indent = 0;

        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    _ = writeln!(buf, "{:indent$}{:?}@{:?}", "", node.kind(), node.trimmed_range());
                    indent += 2;
                }
                WalkEventWithTokens::LeaveNode(_) => indent -= 2,
                WalkEventWithTokens::Token(token) => {
                    for trivia in token.leading_trivia() {
                        if trivia.kind() == SyntaxKind::SKIPPED_TOKEN {
                            _ = writeln!(
                                buf,
                                "{:indent$}{:?}@{:?} {:?}",
                                "",
                                trivia.kind(),
                                trivia.text_range(),
                                trivia.text()
                            );
                        }
                    }

                    if token.is_missing() {
                        _ = writeln!(
                            buf,
                            "{:indent$}{:?}@{:?} (missing)",
                            "",
                            token.kind(),
                            token.trimmed_range()
                        );
                    } else {
                        _ = writeln!(
                            buf,
                            "{:indent$}{:?}@{:?} {:?}",
                            "",
                            token.kind(),
                            token.trimmed_range(),
                            token.text()
                        );
                    }
                }
            }
        }

        buf
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.data, state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Token handle tied to the lifetime of the tree. Tokens are not cached;
/// they are cheap views of a parent slot.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    parent: &'a RedNodeData,
    index: u32,
    green: &'a GreenToken,
    offset: TextSize,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.green.kind()
    }

    #[inline]
    pub fn green(self) -> &'a GreenToken {
        self.green
    }

    /// Returns the token text range including attached trivia.
    #[inline]
    pub fn text_range(self) -> TextRange {
        TextRange::at(self.offset, self.green.width())
    }

    /// Returns the token text range excluding trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.green.trimmed_range() + self.offset
    }

    pub fn span(self) -> SourceRange {
        self.tree.text.range(self.trimmed_range())
    }

    /// Returns the token text excluding trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        self.green.text_trimmed()
    }

    /// Returns the token text including trivia.
    #[inline]
    pub fn full_text(self) -> &'a str {
        self.green.text()
    }

    /// Decoded literal value, for numbers and strings.
    #[inline]
    pub fn value(self) -> &'a TokenValue {
        self.green.value()
    }

    #[inline]
    pub fn is_missing(self) -> bool {
        self.green.is_missing()
    }

    /// Iterates over leading trivia.
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        TriviaIter {
            text: self.tree.text.as_str(),
            pieces: self.green.leading().pieces().iter(),
            offset: self.offset,
        }
    }

    /// Iterates over trailing trivia.
    pub fn trailing_trivia(self) -> TriviaIter<'a> {
        TriviaIter {
            text: self.tree.text.as_str(),
            pieces: self.green.trailing().pieces().iter(),
            offset: self.trimmed_range().end(),
        }
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, data: self.parent }
    }

    /// Slot index of this token in its parent.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the next token if any.
    pub fn next_token(self) -> Option<Self> {
        let mut node = self.parent();
        let mut start = self.index() + 1;
        loop {
            for index in start..node.slot_count() {
                match node.child_at(index) {
                    Some(NodeOrToken::Token(token)) => return Some(token),
                    Some(NodeOrToken::Node(child)) => {
                        if let Some(token) = child.first_token() {
                            return Some(token);
                        }
                    }
                    None => {}
                }
            }
            start = node.index() + 1;
            node = node.parent()?;
        }
    }

    /// Returns the previous token if any.
    pub fn prev_token(self) -> Option<Self> {
        let mut node = self.parent();
        let mut end = self.index();
        loop {
            for index in (0..end).rev() {
                match node.child_at(index) {
                    Some(NodeOrToken::Token(token)) => return Some(token),
                    Some(NodeOrToken::Node(child)) => {
                        if let Some(token) = child.last_token() {
                            return Some(token);
                        }
                    }
                    None => {}
                }
            }
            end = node.index();
            node = node.parent()?;
        }
    }

    /// Lexical diagnostics of this token, with absolute ranges.
    pub fn diagnostics(self) -> impl Iterator<Item = Diagnostic> + 'a {
        let offset = self.offset;
        self.green.diagnostics().iter().map(move |diagnostic| diagnostic.to_diagnostic(offset))
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.parent, other.parent) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.parent, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.trimmed_range(), self.text())
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A single trivia piece with its absolute position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntaxTrivia<'a> {
    kind: SyntaxKind,
    range: TextRange,
    text: &'a str,
}

impl<'a> SyntaxTrivia<'a> {
    pub fn kind(self) -> SyntaxKind {
        self.kind
    }

    pub fn text_range(self) -> TextRange {
        self.range
    }

    pub fn text(self) -> &'a str {
        self.text
    }
}

/// Iterator over trivia pieces.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    text: &'a str,
    pieces: std::slice::Iter<'a, TriviaPiece>,
    offset: TextSize,
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = SyntaxTrivia<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let piece = self.pieces.next()?;
        let range = TextRange::at(self.offset, piece.len);
        self.offset += piece.len;
        Some(SyntaxTrivia { kind: piece.kind, range, text: &self.text[range] })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl ExactSizeIterator for TriviaIter<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.pieces.len()
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    pub fn trimmed_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.trimmed_range(),
            NodeOrToken::Token(token) => token.trimmed_range(),
        }
    }

    pub fn parent(self) -> Option<SyntaxNode<'a>> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }

    fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        match self {
            NodeOrToken::Node(node) => node.token_at_offset(offset),
            NodeOrToken::Token(token) => TokenAtOffset::Single(token),
        }
    }
}

/// Iterator over the present children of a node, tokens included.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    node: SyntaxNode<'a>,
    slots: std::ops::Range<usize>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node;
        self.slots.find_map(|index| node.child_at(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let node = self.node;
        self.slots.by_ref().rev().find_map(|index| node.child_at(index))
    }
}

/// Iterator over child nodes only.
#[derive(Clone)]
pub struct Children<'a> {
    inner: ChildrenWithTokens<'a>,
}

impl<'a> Iterator for Children<'a> {
    type Item = SyntaxNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(NodeOrToken::into_node)
    }
}

impl DoubleEndedIterator for Children<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().find_map(NodeOrToken::into_node)
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    #[track_caller]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };

        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Maps tokens to a different type.
    pub fn map<F: Fn(T) -> U, U>(self, f: F) -> TokenAtOffset<U> {
        match self {
            TokenAtOffset::None => TokenAtOffset::None,
            TokenAtOffset::Single(it) => TokenAtOffset::Single(f(it)),
            TokenAtOffset::Between(l, r) => TokenAtOffset::Between(f(l), f(r)),
        }
    }

    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(_, right) => Some(right),
        }
    }

    /// Convert to option, preferring the left token in case of a tie.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, _) => Some(left),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}

/// Gathers diagnostics below `root` in document order, a node's own before
/// those of its children.
fn collect_diagnostics(root: &GreenNode, offset: TextSize, out: &mut Vec<Diagnostic>) {
    let mut stack = vec![(NodeOrToken::<&GreenNode, &GreenToken>::Node(root), offset)];
    while let Some((element, offset)) = stack.pop() {
        let node = match element {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => {
                out.extend(
                    token.diagnostics().iter().map(|diagnostic| diagnostic.to_diagnostic(offset)),
                );
                continue;
            }
        };
        out.extend(node.diagnostics().iter().map(|diagnostic| diagnostic.to_diagnostic(offset)));

        let first = stack.len();
        let mut child_offset = offset;
        for child in node.children() {
            let child_ref: NodeOrToken<&GreenNode, &GreenToken> = match child {
                NodeOrToken::Node(node) => NodeOrToken::Node(node),
                NodeOrToken::Token(token) => NodeOrToken::Token(token),
            };
            stack.push((child_ref, child_offset));
            child_offset += child.width();
        }
        stack[first..].reverse();
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use lunar_errors::ErrorCode;

    use super::*;
    use crate::SyntaxKind::*;
    use crate::{Builder, GreenTrivia};

    fn trivia(pieces: &[(SyntaxKind, u32)]) -> GreenTrivia {
        let pieces: Vec<_> =
            pieces.iter().map(|&(kind, len)| TriviaPiece::new(kind, TextSize::new(len))).collect();
        GreenTrivia::new(&pieces)
    }

    fn whitespace(len: u32) -> GreenTrivia {
        if len > 0 { trivia(&[(WHITESPACE, len)]) } else { GreenTrivia::empty() }
    }

    fn token(builder: &mut Builder, kind: SyntaxKind, text: &str, leading: u32, trailing: u32) {
        builder.token(
            kind,
            text,
            whitespace(leading),
            whitespace(trailing),
            TokenValue::None,
            &[],
        );
    }

    /// `local x = y` followed by a missing `;` placeholder.
    fn sample() -> SyntaxTree {
        let text = "local x = y";
        let mut builder = Builder::new();
        builder.start_node(CHUNK);
        builder.start_node(BLOCK);
        builder.start_node(LOCAL_VARIABLE_DECLARATION_STATEMENT);
        token(&mut builder, LOCAL_KW, "local ", 0, 1);
        builder.start_node(LOCAL_DECLARATION_NAME);
        token(&mut builder, NAME, "x ", 0, 1);
        builder.absent();
        builder.finish_node();
        builder.start_node(EQUALS_VALUES_CLAUSE);
        token(&mut builder, EQ, "= ", 0, 1);
        builder.start_node(NAME_EXPRESSION);
        token(&mut builder, NAME, "y", 0, 0);
        builder.finish_node();
        builder.finish_node();
        builder.absent();
        builder.finish_node();
        builder.finish_node();
        let diagnostic =
            Diagnostic::error(ErrorCode::ExpressionExpected, TextRange::empty(TextSize::new(11)));
        builder.missing(SEMICOLON, &[diagnostic]);
        token(&mut builder, EOF, "", 0, 0);
        builder.finish_node();

        SyntaxTree::new(text.into(), builder.finish(), LuaSyntaxOptions::ALL)
    }

    #[test]
    fn dump() {
        let tree = sample();
        expect![[r#"
            CHUNK@0..11
              BLOCK@0..11
                LOCAL_VARIABLE_DECLARATION_STATEMENT@0..11
                  LOCAL_KW@0..5 "local"
                  LOCAL_DECLARATION_NAME@6..7
                    NAME@6..7 "x"
                  EQUALS_VALUES_CLAUSE@8..11
                    EQ@8..9 "="
                    NAME_EXPRESSION@10..11
                      NAME@10..11 "y"
              SEMICOLON@11..11 (missing)
              EOF@11..11 ""
        "#]]
        .assert_eq(&tree.debug_dump());
    }

    #[test]
    fn children_are_positioned_by_preceding_widths() {
        let tree = sample();
        let root = tree.root();

        for node in root.descendants() {
            let mut offset = node.text_range().start();
            for index in 0..node.slot_count() {
                if let Some(child) = node.child_at(index) {
                    assert_eq!(child.text_range().start(), offset);
                    assert_eq!(child.parent(), Some(node));
                    offset += child.text_range().len();
                }
            }
            assert_eq!(offset, node.text_range().end());
        }
    }

    #[test]
    fn child_nodes_are_cached() {
        let tree = sample();
        let block = tree.root().first_child().unwrap();
        let again = tree.root().child_at(0).and_then(NodeOrToken::into_node).unwrap();

        assert_eq!(block, again);
        assert!(std::ptr::eq(block.data, again.data));
        assert_eq!(block.parent(), Some(tree.root()));
        assert_eq!(block.index(), 0);
    }

    #[test]
    fn absent_slots() {
        let tree = sample();
        let statement = tree.root().descendants().nth(2).unwrap();
        assert_eq!(statement.kind(), LOCAL_VARIABLE_DECLARATION_STATEMENT);
        assert_eq!(statement.slot_count(), 4);
        assert!(statement.child_at(3).is_none());
        assert!(statement.child_at(42).is_none());
    }

    #[test]
    fn token_navigation() {
        let tree = sample();
        let tokens: Vec<_> = tree.root().descendant_tokens().collect();
        let texts: Vec<_> = tokens.iter().map(|token| token.full_text()).collect();
        assert_eq!(texts, ["local ", "x ", "= ", "y", "", ""]);

        for pair in tokens.windows(2) {
            assert_eq!(pair[0].next_token(), Some(pair[1]));
            assert_eq!(pair[1].prev_token(), Some(pair[0]));
        }
        assert_eq!(tokens[0].prev_token(), None);
        assert_eq!(tokens[5].next_token(), None);

        let trailing: Vec<_> = tokens[0].trailing_trivia().collect();
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing[0].kind(), WHITESPACE);
        assert_eq!(trailing[0].text_range(), TextRange::new(TextSize::new(5), TextSize::new(6)));
        assert_eq!(trailing[0].text(), " ");
    }

    #[test]
    fn offsets() {
        let tree = sample();
        let root = tree.root();

        let at = |offset: u32| -> Vec<&str> {
            root.token_at_offset(TextSize::new(offset)).map(SyntaxToken::text).collect()
        };
        assert_eq!(at(0), ["local"]);
        assert_eq!(at(6), ["local", "x"]);
        assert_eq!(at(7), ["x"]);

        let element = root.covering_element(TextRange::new(TextSize::new(8), TextSize::new(11)));
        assert_eq!(element.kind(), EQUALS_VALUES_CLAUSE);
        let element = root.covering_element(TextRange::new(TextSize::new(6), TextSize::new(7)));
        assert_eq!(element.kind(), NAME);
    }

    #[test]
    fn diagnostics_are_absolute() {
        let tree = sample();
        assert_eq!(tree.diagnostics().len(), 1);
        assert_eq!(tree.diagnostics()[0].range(), TextRange::empty(TextSize::new(11)));
        assert!(tree.has_errors());
        assert_eq!(tree.root().diagnostics(), tree.diagnostics());
        assert_eq!(tree.root().span().end.column, 11);
    }

    #[test]
    fn tree_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyntaxTree>();

        let tree = sample();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let count = tree.root().descendant_tokens().count();
                    assert_eq!(count, 6);
                });
            }
        });
    }

    #[test]
    fn skipped_subtrees_are_not_entered() {
        let tree = sample();

        let mut entered = Vec::new();
        let mut left = Vec::new();
        let mut preorder = tree.root().preorder();
        while let Some(event) = preorder.next() {
            match event {
                WalkEvent::Enter(node) => {
                    entered.push(node.kind());
                    if node.kind() == LOCAL_VARIABLE_DECLARATION_STATEMENT {
                        preorder.skip_subtree();
                    }
                }
                WalkEvent::Leave(node) => left.push(node.kind()),
            }
        }
        assert_eq!(entered, [CHUNK, BLOCK, LOCAL_VARIABLE_DECLARATION_STATEMENT]);
        assert_eq!(left, [BLOCK, CHUNK]);

        let mut tokens = Vec::new();
        let mut preorder = tree.root().preorder_with_tokens();
        while let Some(event) = preorder.next() {
            match event {
                WalkEventWithTokens::EnterNode(node) if node.kind() == LOCAL_DECLARATION_NAME => {
                    preorder.skip_subtree();
                }
                WalkEventWithTokens::Token(token) => tokens.push(token.kind()),
                _ => {}
            }
        }
        assert_eq!(tokens, [LOCAL_KW, EQ, NAME, SEMICOLON, EOF]);
    }

    #[test]
    fn deep_trees_are_walked_and_dropped() {
        const DEPTH: usize = 100_000;

        let mut builder = Builder::new();
        builder.start_node(CHUNK);
        for _ in 0..DEPTH {
            builder.start_node(BINARY_EXPRESSION);
        }
        builder.start_node(NAME_EXPRESSION);
        token(&mut builder, NAME, " a", 1, 0);
        builder.node_error(ErrorCode::ExpressionExpected, Vec::new());
        builder.finish_node();
        for _ in 0..DEPTH {
            token(&mut builder, PLUS, "+", 0, 0);
            builder.start_node(NAME_EXPRESSION);
            token(&mut builder, NAME, "a", 0, 0);
            builder.finish_node();
            builder.finish_node();
        }
        token(&mut builder, EOF, "", 0, 0);
        builder.finish_node();

        let text = format!(" a{}", "+a".repeat(DEPTH));
        let tree = SyntaxTree::new(text.as_str().into(), builder.finish(), LuaSyntaxOptions::ALL);
        let root = tree.root();

        assert_eq!(root.first_token().map(|token| token.kind()), Some(NAME));
        assert_eq!(root.last_token().map(|token| token.kind()), Some(EOF));
        assert_eq!(root.trimmed_range(), TextRange::new(TextSize::new(1), TextSize::of(text.as_str())));
        assert_eq!(root.descendants().count(), 2 + 2 * DEPTH);
        assert_eq!(root.to_string(), text);

        let diagnostics = root.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range(), TextRange::new(TextSize::new(1), TextSize::new(2)));
        drop(tree);
    }
}
