use std::fmt;
use std::sync::{Arc, OnceLock};

use line_index::LineIndex;
use text_size::{TextLen, TextRange, TextSize};

/// A position in the source. `line` and `column` are zero based, `column` and
/// `offset` are measured in UTF-8 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub offset: TextSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn text_range(&self) -> TextRange {
        TextRange::new(self.start.offset, self.end.offset)
    }
}

/// Immutable, cheaply clonable source buffer.
#[derive(Clone)]
pub struct SourceText {
    inner: Arc<SourceTextInner>,
}

struct SourceTextInner {
    text: Box<str>,
    line_index: OnceLock<LineIndex>,
}

impl SourceText {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        Self { inner: Arc::new(SourceTextInner { text: text.into(), line_index: OnceLock::new() }) }
    }

    pub fn as_str(&self) -> &str {
        &self.inner.text
    }

    pub fn len(&self) -> TextSize {
        self.inner.text.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.text.is_empty()
    }

    pub fn slice(&self, range: TextRange) -> &str {
        &self.inner.text[range]
    }

    pub fn line_index(&self) -> &LineIndex {
        self.inner.line_index.get_or_init(|| LineIndex::new(&self.inner.text))
    }

    /// Line and column of `offset`. Offsets past the end are clamped.
    pub fn location(&self, offset: TextSize) -> SourceLocation {
        let offset = offset.min(self.len());
        let line_col = self.line_index().line_col(offset);
        SourceLocation { line: line_col.line, column: line_col.col, offset }
    }

    pub fn range(&self, range: TextRange) -> SourceRange {
        SourceRange { start: self.location(range.start()), end: self.location(range.end()) }
    }

    /// Number of lines, counting a trailing partial line.
    pub fn line_count(&self) -> u32 {
        self.location(self.len()).line + 1
    }
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.as_str() == other.as_str()
    }
}

impl Eq for SourceText {}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText").field("len", &self.len()).finish_non_exhaustive()
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations() {
        let text = SourceText::new("local x = 1\nreturn x\n");

        let start = text.location(TextSize::new(0));
        assert_eq!((start.line, start.column), (0, 0));

        let ret = text.location(TextSize::new(12));
        assert_eq!((ret.line, ret.column), (1, 0));

        let x = text.location(TextSize::new(19));
        assert_eq!((x.line, x.column), (1, 7));

        assert_eq!(text.line_count(), 3);
    }

    #[test]
    fn range_round_trips() {
        let text = SourceText::new("a\nbc");
        let range = TextRange::new(TextSize::new(1), TextSize::new(4));
        let source_range = text.range(range);

        assert_eq!(source_range.text_range(), range);
        assert_eq!(source_range.end.line, 1);
        assert_eq!(source_range.end.column, 2);
    }

    #[test]
    fn offsets_past_the_end_are_clamped() {
        let text = SourceText::new("abc");
        assert_eq!(text.location(TextSize::new(10)).offset, TextSize::new(3));
    }
}
