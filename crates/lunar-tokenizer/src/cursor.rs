use std::str::Chars;

use text_size::{TextLen, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

pub(crate) struct Cursor<'db> {
    chars: Chars<'db>,
    len: TextSize,
    token_start: TextSize,
}

impl<'db> Cursor<'db> {
    pub(crate) fn new(text: &'db str) -> Self {
        Self { chars: text.chars(), len: text.text_len(), token_start: TextSize::new(0) }
    }

    /// Absolute offset of the next character.
    pub(crate) fn offset(&self) -> TextSize {
        self.len - TextSize::new(self.chars.as_str().len() as u32)
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.offset() - self.token_start
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.token_start = self.offset();
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        self.nth(1)
    }

    pub(crate) fn nth(&self, n: usize) -> char {
        self.chars.clone().nth(n).unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        !self.is_eof() && self.peek() == c
    }

    pub(crate) fn rest(&self) -> &'db str {
        self.chars.as_str()
    }

    pub(crate) fn advance(&mut self) -> char {
        self.chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn eat(&mut self, c: char) -> bool {
        let matched = self.matches(c);
        if matched {
            self.advance();
        }
        matched
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Consumes one line break (`\n`, `\r`, `\r\n` or `\n\r`), if present.
    pub(crate) fn eat_end_of_line(&mut self) -> bool {
        match self.peek() {
            first @ ('\n' | '\r') => {
                self.advance();
                let second = self.peek();
                if matches!(second, '\n' | '\r') && second != first {
                    self.advance();
                }
                true
            }
            _ => false,
        }
    }

    /// Level of a long bracket (`[[`, `[=[`, ...) starting at the cursor.
    pub(crate) fn long_bracket_level(&self) -> Option<usize> {
        let mut chars = self.chars.clone();
        if chars.next() != Some('[') {
            return None;
        }

        let mut level = 0;
        loop {
            match chars.next() {
                Some('=') => level += 1,
                Some('[') => return Some(level),
                _ => return None,
            }
        }
    }

    /// Consumes an opening long bracket of `level` and everything up to and
    /// including the matching closing bracket. Returns the range of the
    /// contents relative to the bracket start, and whether the closing
    /// bracket was found.
    pub(crate) fn long_bracket(&mut self, level: usize) -> (std::ops::Range<usize>, bool) {
        let start = self.offset();
        for _ in 0..level + 2 {
            self.advance();
        }
        let contents_start = usize::from(self.offset() - start);

        loop {
            if self.is_eof() {
                let end = usize::from(self.offset() - start);
                return (contents_start..end, false);
            }

            if self.peek() == ']' && self.closes(level) {
                let end = usize::from(self.offset() - start);
                for _ in 0..level + 2 {
                    self.advance();
                }
                return (contents_start..end, true);
            }

            self.advance();
        }
    }

    fn closes(&self, level: usize) -> bool {
        let rest = self.rest().as_bytes();
        rest.len() >= level + 2
            && rest[1..=level].iter().all(|&b| b == b'=')
            && rest[level + 1] == b']'
    }
}
