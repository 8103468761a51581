//! Trivia pieces attached to tokens.

use std::fmt;

use text_size::TextSize;
use triomphe::ThinArc;

use crate::SyntaxKind;

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: SyntaxKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: SyntaxKind, len: TextSize) -> Self {
        debug_assert!(kind.is_trivia(), "{kind:?} is not a trivia kind");
        Self { kind, len }
    }
}

/// Shared, immutable list of trivia pieces. The empty list does not allocate.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl GreenTrivia {
    pub fn new(pieces: &[TriviaPiece]) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }

        let total_len = pieces.iter().map(|piece| piece.len).sum();
        Self { ptr: Some(ThinArc::from_header_and_slice(total_len, pieces)) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn len(&self) -> TextSize {
        match self.ptr {
            None => TextSize::new(0),
            Some(ref ptr) => ptr.header.header,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }

    pub fn contains(&self, kind: SyntaxKind) -> bool {
        self.pieces().iter().any(|piece| piece.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn total_len() {
        let trivia = GreenTrivia::new(&[
            TriviaPiece::new(WHITESPACE, TextSize::new(2)),
            TriviaPiece::new(SINGLE_LINE_COMMENT, TextSize::new(5)),
            TriviaPiece::new(END_OF_LINE, TextSize::new(1)),
        ]);

        assert_eq!(trivia.len(), TextSize::new(8));
        assert_eq!(trivia.pieces().len(), 3);
        assert!(trivia.contains(END_OF_LINE));
        assert!(!trivia.contains(SHEBANG));
    }

    #[test]
    fn empty_trivia_does_not_allocate() {
        let trivia = GreenTrivia::new(&[]);
        assert!(trivia.is_empty());
        assert_eq!(trivia, GreenTrivia::empty());
        assert_eq!(trivia.len(), TextSize::new(0));
    }
}
