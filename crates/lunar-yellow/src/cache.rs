//! Hash-consing of green tokens and small green nodes.

use rustc_hash::FxHashMap;

use crate::green::{GreenDiagnostic, GreenElement, GreenNode, GreenToken, TokenValue};
use crate::{GreenTrivia, NodeOrToken, SyntaxKind};

const MAX_CACHED_CHILDREN: usize = 3;

#[derive(PartialEq, Eq, Hash)]
struct TokenKey {
    kind: SyntaxKind,
    text: Box<str>,
    leading: GreenTrivia,
    trailing: GreenTrivia,
}

/// Children are identified by address: every cached node keeps its children
/// alive, so an address in a key can never be reused while the key exists.
#[derive(PartialEq, Eq, Hash)]
struct NodeKey {
    kind: SyntaxKind,
    children: Box<[Option<usize>]>,
}

/// Interns elements created during one parse. Elements carrying diagnostics
/// are never interned.
#[derive(Default)]
pub struct NodeCache {
    tokens: FxHashMap<TokenKey, GreenToken>,
    nodes: FxHashMap<NodeKey, GreenNode>,
}

impl NodeCache {
    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: &str,
        leading: GreenTrivia,
        trailing: GreenTrivia,
        value: TokenValue,
        diagnostics: Vec<GreenDiagnostic>,
    ) -> GreenToken {
        if !diagnostics.is_empty() {
            return GreenToken::new(kind, text, leading, trailing, value, diagnostics);
        }

        let key = TokenKey { kind, text: text.into(), leading, trailing };
        if let Some(token) = self.tokens.get(&key) {
            return token.clone();
        }

        let token =
            GreenToken::new(kind, text, key.leading.clone(), key.trailing.clone(), value, diagnostics);
        self.tokens.insert(key, token.clone());
        token
    }

    pub fn node(
        &mut self,
        kind: SyntaxKind,
        children: Vec<Option<GreenElement>>,
        diagnostics: Vec<GreenDiagnostic>,
    ) -> GreenNode {
        if !diagnostics.is_empty() || children.len() > MAX_CACHED_CHILDREN {
            return GreenNode::new(kind, children, diagnostics);
        }

        let key = NodeKey {
            kind,
            children: children
                .iter()
                .map(|child| {
                    child.as_ref().map(|child| match child {
                        NodeOrToken::Node(node) => node.as_ptr() as usize,
                        NodeOrToken::Token(token) => token.as_ptr() as usize,
                    })
                })
                .collect(),
        };

        self.nodes.entry(key).or_insert_with(|| GreenNode::new(kind, children, diagnostics)).clone()
    }

    pub fn len(&self) -> usize {
        self.tokens.len() + self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    fn token(cache: &mut NodeCache, kind: SyntaxKind, text: &str) -> GreenToken {
        cache.token(
            kind,
            text,
            GreenTrivia::empty(),
            GreenTrivia::empty(),
            TokenValue::None,
            Vec::new(),
        )
    }

    #[test]
    fn identical_tokens_are_shared() {
        let mut cache = NodeCache::default();
        let a = token(&mut cache, COMMA, ",");
        let b = token(&mut cache, COMMA, ",");

        assert_eq!(a.as_ptr(), b.as_ptr());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn identical_small_nodes_are_shared() {
        let mut cache = NodeCache::default();
        let name = NodeOrToken::Token(token(&mut cache, NAME, "x"));

        let a = cache.node(NAME_EXPRESSION, vec![Some(name.clone())], Vec::new());
        let b = cache.node(NAME_EXPRESSION, vec![Some(name)], Vec::new());
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn tokens_with_diagnostics_are_not_shared() {
        let mut cache = NodeCache::default();
        let diagnostic = || {
            vec![GreenDiagnostic::new(
                lunar_errors::ErrorCode::BadCharacter,
                text_size::TextRange::up_to(1.into()),
                vec!["@".into()],
            )]
        };

        let a = cache.token(
            UNKNOWN,
            "@",
            GreenTrivia::empty(),
            GreenTrivia::empty(),
            TokenValue::None,
            diagnostic(),
        );
        let b = cache.token(
            UNKNOWN,
            "@",
            GreenTrivia::empty(),
            GreenTrivia::empty(),
            TokenValue::None,
            diagnostic(),
        );
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert!(cache.is_empty());
    }
}
