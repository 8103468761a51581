//! Lossless, immutable syntax tree for Lua.
//!
//! The green tree is position-free and shareable; trivia and diagnostics hang
//! off the element that owns them. The red layer on top adds absolute offsets
//! and parent links, materialized lazily as the tree is walked.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod cache;
mod green;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for green trees.
pub use builder::Builder;
/// Hash-consing table used while building.
pub use cache::NodeCache;
/// Position-free tree elements.
pub use green::{GreenDiagnostic, GreenElement, GreenNode, GreenToken, TokenValue};
/// Primary syntax tree API types and adapters.
pub use syntax::{
    Children, ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement,
    SyntaxNode, SyntaxToken, SyntaxTree, SyntaxTrivia, TokenAtOffset, TriviaIter, WalkEvent,
    WalkEventWithTokens,
};
/// Token and node kinds, with their static facts.
pub use syntax_kind::{SyntaxKind, UNARY_PRECEDENCE};
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{GreenTrivia, TriviaPiece};
