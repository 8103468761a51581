//! Lexer for Lua and its dialects.
//!
//! Every token owns the trivia around it: leading trivia runs from the end of
//! the previous token, trailing trivia stops after the first line break.
//! Concatenating the full text of every token reproduces the input exactly.

mod cursor;
mod numbers;
mod strings;

use std::collections::VecDeque;

use cursor::Cursor;
use lunar_errors::{Diagnostic, ErrorCode};
use lunar_inputs::{ContinueType, LuaSyntaxOptions};
pub use lunar_yellow::SyntaxKind;
use lunar_yellow::SyntaxKind::*;
use lunar_yellow::{GreenTrivia, TokenValue, TriviaPiece};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    /// Absolute range of the token without its trivia.
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
    pub value: TokenValue,
    /// Lexical errors found in the token or its trivia, with absolute ranges.
    pub diagnostics: Vec<Diagnostic>,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: GreenTrivia::empty(),
        trailing: GreenTrivia::empty(),
        value: TokenValue::None,
        diagnostics: Vec::new(),
    };

    /// Absolute range of the token including its trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.kind_range]
    }

    pub fn full_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.full_range()]
    }
}

pub struct Tokenizer<'db> {
    text: &'db str,
    options: LuaSyntaxOptions,
    cursor: Cursor<'db>,
    current: Token,
    ahead: VecDeque<Token>,
    trivia_pieces: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
}

impl<'db> Tokenizer<'db> {
    pub fn new(text: &'db str, options: LuaSyntaxOptions) -> Self {
        let mut tokenizer = Self {
            text,
            options,
            cursor: Cursor::new(text),
            current: Token::EOF,
            ahead: VecDeque::new(),
            trivia_pieces: Vec::with_capacity(4),
            diagnostics: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn text(&self) -> &'db str {
        self.text
    }

    pub fn options(&self) -> LuaSyntaxOptions {
        self.options
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// The token `n` positions after the current one; `0` is the current token.
    pub fn peek_nth(&mut self, n: usize) -> &Token {
        if n == 0 {
            return &self.current;
        }

        while self.ahead.len() < n {
            let token = self.lex_token();
            self.ahead.push_back(token);
        }
        &self.ahead[n - 1]
    }

    /// Returns the current token and moves to the next one. Once the input
    /// is exhausted this keeps returning empty `EOF` tokens.
    pub fn next_token(&mut self) -> Token {
        let next = match self.ahead.pop_front() {
            Some(token) => token,
            None => self.lex_token(),
        };
        std::mem::replace(&mut self.current, next)
    }

    fn lex_token(&mut self) -> Token {
        self.cursor.reset_pos_within_token();
        self.trivia(false);
        let trailing_start = self.trivia_pieces.len();

        let (kind, value) = self.syntax_kind();
        let kind_range = self.range();
        self.cursor.reset_pos_within_token();

        self.trivia(true);

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = GreenTrivia::new(leading);
        let trailing = GreenTrivia::new(trailing);
        self.trivia_pieces.clear();

        Token {
            leading,
            kind,
            kind_range,
            trailing,
            value,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    fn offset(&self) -> TextSize {
        self.cursor.offset()
    }

    /// Range of the token or trivia piece being lexed.
    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn token_text(&self) -> &'db str {
        let text = self.text;
        &text[self.range()]
    }

    fn error(&mut self, code: ErrorCode, args: Vec<String>) {
        let range = self.range();
        self.error_at(range, code, args);
    }

    fn error_at(&mut self, range: TextRange, code: ErrorCode, args: Vec<String>) {
        self.diagnostics.push(Diagnostic::new(code, range, args));
    }

    /// Reports `code` over the current token unless the dialect accepts it.
    fn gate(&mut self, accepted: bool, code: ErrorCode) {
        if !accepted {
            self.error(code, Vec::new());
        }
    }

    fn trivia(&mut self, trailing: bool) {
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                ' ' | '\t' | '\u{b}' | '\u{c}' => {
                    self.cursor.advance_while(is_whitespace);
                    WHITESPACE
                }
                '\n' | '\r' => {
                    self.cursor.eat_end_of_line();
                    END_OF_LINE
                }
                '-' if self.cursor.second() == '-' => self.comment(),
                '/' if self.options.accept_c_comments && self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| !is_end_of_line(c));
                    SINGLE_LINE_COMMENT
                }
                '/' if self.options.accept_c_comments && self.cursor.second() == '*' => {
                    self.c_comment()
                }
                '#' if !trailing && self.offset() == TextSize::new(0) && self.cursor.second() == '!' =>
                {
                    self.cursor.advance_while(|c| !is_end_of_line(c));
                    self.gate(self.options.accept_shebang, ErrorCode::ShebangNotSupportedInLuaVersion);
                    SHEBANG
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();

            if trailing && kind == END_OF_LINE {
                break;
            }
        }
    }

    fn comment(&mut self) -> SyntaxKind {
        self.cursor.advance();
        self.cursor.advance();

        match self.cursor.long_bracket_level() {
            Some(level) => {
                let (_, terminated) = self.cursor.long_bracket(level);
                if !terminated {
                    self.error(ErrorCode::UnfinishedLongComment, Vec::new());
                }
                MULTI_LINE_COMMENT
            }
            None => {
                self.cursor.advance_while(|c| !is_end_of_line(c));
                SINGLE_LINE_COMMENT
            }
        }
    }

    fn c_comment(&mut self) -> SyntaxKind {
        self.cursor.advance();
        self.cursor.advance();

        loop {
            if self.cursor.is_eof() {
                self.error(ErrorCode::UnfinishedLongComment, Vec::new());
                break;
            }
            if self.cursor.rest().starts_with("*/") {
                self.cursor.advance();
                self.cursor.advance();
                break;
            }
            self.cursor.advance();
        }

        MULTI_LINE_COMMENT
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TokenValue) {
        if self.cursor.is_eof() {
            return (EOF, TokenValue::None);
        }

        if let Some(level) = self.cursor.long_bracket_level() {
            return (STRING, self.long_string(level));
        }

        let options = self.options;
        let kind = match self.cursor.advance() {
            ';' => SEMICOLON,
            ',' => COMMA,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            '#' => HASH,
            ':' => self.either(':', COLON_COLON, COLON),
            '.' => {
                if self.cursor.eat('.') {
                    if self.cursor.eat('.') {
                        DOT_DOT_DOT
                    } else {
                        self.either('=', DOT_DOT_EQ, DOT_DOT)
                    }
                } else if self.cursor.peek().is_ascii_digit() {
                    return (NUMBER, self.number('.'));
                } else {
                    DOT
                }
            }
            '+' => self.either('=', PLUS_EQ, PLUS),
            '-' => self.either('=', MINUS_EQ, MINUS),
            '*' => self.either('=', STAR_EQ, STAR),
            '^' => self.either('=', CARET_EQ, CARET),
            '%' => self.either('=', PERCENT_EQ, PERCENT),
            '=' => self.either('=', EQ_EQ, EQ),
            '/' => {
                if self.cursor.eat('=') {
                    SLASH_EQ
                } else if self.cursor.eat('/') {
                    self.gate(options.accept_floor_division, ErrorCode::FloorDivisionNotSupportedInVersion);
                    SLASH_SLASH
                } else {
                    SLASH
                }
            }
            '~' => {
                if self.cursor.eat('=') {
                    TILDE_EQ
                } else {
                    self.bitwise(TILDE)
                }
            }
            '!' => {
                let kind = self.either('=', BANG_EQ, BANG);
                self.gate(options.accept_c_boolean_operators, ErrorCode::CBooleanOperatorsNotSupportedInVersion);
                kind
            }
            '<' => {
                if self.cursor.eat('=') {
                    LT_EQ
                } else if self.cursor.eat('<') {
                    self.bitwise(LT_LT)
                } else {
                    LT
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    GT_EQ
                } else if self.cursor.eat('>') {
                    self.bitwise(GT_GT)
                } else {
                    GT
                }
            }
            '&' => {
                if self.cursor.eat('&') {
                    self.gate(options.accept_c_boolean_operators, ErrorCode::CBooleanOperatorsNotSupportedInVersion);
                    AMP_AMP
                } else {
                    self.bitwise(AMP)
                }
            }
            '|' => {
                if self.cursor.eat('|') {
                    self.gate(options.accept_c_boolean_operators, ErrorCode::CBooleanOperatorsNotSupportedInVersion);
                    PIPE_PIPE
                } else {
                    self.bitwise(PIPE)
                }
            }
            quote @ ('"' | '\'') => return (STRING, self.short_string(quote)),
            first_char @ '0'..='9' => return (NUMBER, self.number(first_char)),
            first_char if is_identifier_start(first_char) => self.identifier(),
            _ => {
                let text = self.token_text().to_owned();
                self.error(ErrorCode::BadCharacter, vec![text]);
                UNKNOWN
            }
        };

        (kind, TokenValue::None)
    }

    fn either(&mut self, next: char, matched: SyntaxKind, otherwise: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat(next) { matched } else { otherwise }
    }

    fn bitwise(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.gate(self.options.accept_bitwise_operators, ErrorCode::BitwiseOperatorsNotSupportedInVersion);
        kind
    }

    fn identifier(&mut self) -> SyntaxKind {
        self.cursor.advance_while(is_identifier_continue);
        let text = self.token_text();

        if !text.is_ascii() {
            self.gate(
                self.options.use_luajit_identifier_rules,
                ErrorCode::LuajitIdentifierRulesNotSupportedInVersion,
            );
        }

        match SyntaxKind::from_keyword(text) {
            Some(GOTO_KW) if !self.options.accept_goto => NAME,
            Some(CONTINUE_KW) if self.options.continue_type != ContinueType::Keyword => NAME,
            Some(kind) => kind,
            None => NAME,
        }
    }
}

/// Lexes `text` into tokens. The last token is always `EOF`.
pub fn lex(text: &str, options: LuaSyntaxOptions) -> impl Iterator<Item = Token> + '_ {
    let mut tokenizer = Tokenizer::new(text, options);
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let token = tokenizer.next_token();
        done = token.kind == EOF;
        Some(token)
    })
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{b}' | '\u{c}')
}

fn is_end_of_line(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use expect_test::{Expect, expect};

    use super::*;

    fn dump(text: &str, options: LuaSyntaxOptions) -> String {
        let mut out = String::new();

        for token in lex(text, options) {
            let mut offset = token.full_range().start();
            for piece in token.leading.pieces() {
                let range = TextRange::at(offset, piece.len);
                writeln!(out, "  {:?}@{:?} {:?}", piece.kind, range, &text[range]).unwrap();
                offset += piece.len;
            }

            write!(out, "{:?}@{:?} {:?}", token.kind, token.kind_range, token.text(text)).unwrap();
            match &token.value {
                TokenValue::None => {}
                TokenValue::Integer(value) => write!(out, " = {value}").unwrap(),
                TokenValue::Float(value) => write!(out, " = {value:?}").unwrap(),
                TokenValue::String(bytes) => {
                    write!(out, " = {:?}", String::from_utf8_lossy(bytes)).unwrap()
                }
            }
            writeln!(out).unwrap();

            let mut offset = token.kind_range.end();
            for piece in token.trailing.pieces() {
                let range = TextRange::at(offset, piece.len);
                writeln!(out, "  {:?}@{:?} {:?}", piece.kind, range, &text[range]).unwrap();
                offset += piece.len;
            }

            for diagnostic in &token.diagnostics {
                writeln!(out, "  ! {}", diagnostic).unwrap();
            }
        }

        out
    }

    fn check(text: &str, expect: Expect) {
        expect.assert_eq(&dump(text, LuaSyntaxOptions::ALL));
    }

    fn kinds(text: &str, options: LuaSyntaxOptions) -> Vec<SyntaxKind> {
        lex(text, options).map(|token| token.kind).collect()
    }

    fn single(text: &str, options: LuaSyntaxOptions) -> Token {
        let mut tokens: Vec<_> = lex(text, options).collect();
        assert_eq!(tokens.len(), 2, "{text:?} lexed to {tokens:?}");
        assert_eq!(tokens[1].kind, EOF);
        tokens.swap_remove(0)
    }

    fn codes(token: &Token) -> Vec<ErrorCode> {
        token.diagnostics.iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn trivia_attachment() {
        check(
            "local x = 1 -- one\n\n  print(x)",
            expect![[r#"
                LOCAL_KW@0..5 "local"
                  WHITESPACE@5..6 " "
                NAME@6..7 "x"
                  WHITESPACE@7..8 " "
                EQ@8..9 "="
                  WHITESPACE@9..10 " "
                NUMBER@10..11 "1" = 1
                  WHITESPACE@11..12 " "
                  SINGLE_LINE_COMMENT@12..18 "-- one"
                  END_OF_LINE@18..19 "\n"
                  END_OF_LINE@19..20 "\n"
                  WHITESPACE@20..22 "  "
                NAME@22..27 "print"
                LEFT_PAREN@27..28 "("
                NAME@28..29 "x"
                RIGHT_PAREN@29..30 ")"
                EOF@30..30 ""
            "#]],
        );
    }

    #[test]
    fn round_trip() {
        let text = "#!/usr/bin/lua\nlocal s = [[\nx]] --[==[ long\n]==] a.b:c'd' /* c */ // e\n";
        let rebuilt: String =
            lex(text, LuaSyntaxOptions::ALL).map(|token| token.full_text(text).to_owned()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn shebang_only_at_start() {
        let tokens: Vec<_> = lex("#!/bin/lua\n", LuaSyntaxOptions::ALL).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].leading.pieces()[0].kind, SHEBANG);
        assert!(tokens[0].diagnostics.is_empty());

        let tokens: Vec<_> = lex("#!/bin/lua", LuaSyntaxOptions::LUA54).collect();
        assert_eq!(codes(&tokens[0]), [ErrorCode::ShebangNotSupportedInLuaVersion]);

        assert_eq!(kinds(" #!x", LuaSyntaxOptions::ALL), [HASH, BANG, NAME, EOF]);
    }

    #[test]
    fn long_comments() {
        check(
            "--[[ a\n]] x --[=[ b",
            expect![[r#"
                  MULTI_LINE_COMMENT@0..9 "--[[ a\n]]"
                  WHITESPACE@9..10 " "
                NAME@10..11 "x"
                  WHITESPACE@11..12 " "
                  MULTI_LINE_COMMENT@12..19 "--[=[ b"
                  ! error[LUA0006]: unfinished long comment at 12..19
                EOF@19..19 ""
            "#]],
        );
    }

    #[test]
    fn c_comments_are_dialect_specific() {
        assert_eq!(kinds("a // b", LuaSyntaxOptions::GMOD), [NAME, EOF]);
        assert_eq!(kinds("a /* b */ c", LuaSyntaxOptions::GMOD), [NAME, NAME, EOF]);
        assert_eq!(kinds("a // b", LuaSyntaxOptions::LUA53), [NAME, SLASH_SLASH, NAME, EOF]);
        assert_eq!(kinds("a /* b */", LuaSyntaxOptions::LUA53), [
            NAME, SLASH, STAR, NAME, STAR, SLASH, EOF
        ]);
    }

    #[test]
    fn punctuation() {
        let text = "; , ( ) [ ] { } # : :: . .. ... ..= + += - -= * *= / /= // ^ ^= % %= = == \
                    ~ ~= ! != < <= << > >= >> & && | ||";
        let options = LuaSyntaxOptions { accept_c_comments: false, ..LuaSyntaxOptions::ALL };
        assert_eq!(kinds(text, options), [
            SEMICOLON,
            COMMA,
            LEFT_PAREN,
            RIGHT_PAREN,
            LEFT_BRACKET,
            RIGHT_BRACKET,
            LEFT_BRACE,
            RIGHT_BRACE,
            HASH,
            COLON,
            COLON_COLON,
            DOT,
            DOT_DOT,
            DOT_DOT_DOT,
            DOT_DOT_EQ,
            PLUS,
            PLUS_EQ,
            MINUS,
            MINUS_EQ,
            STAR,
            STAR_EQ,
            SLASH,
            SLASH_EQ,
            SLASH_SLASH,
            CARET,
            CARET_EQ,
            PERCENT,
            PERCENT_EQ,
            EQ,
            EQ_EQ,
            TILDE,
            TILDE_EQ,
            BANG,
            BANG_EQ,
            LT,
            LT_EQ,
            LT_LT,
            GT,
            GT_EQ,
            GT_GT,
            AMP,
            AMP_AMP,
            PIPE,
            PIPE_PIPE,
            EOF,
        ]);
    }

    #[test]
    fn gated_operators_still_lex() {
        let lua51 = LuaSyntaxOptions::LUA51;

        let token = single("&", lua51);
        assert_eq!(token.kind, AMP);
        assert_eq!(codes(&token), [ErrorCode::BitwiseOperatorsNotSupportedInVersion]);

        let token = single("//", lua51);
        assert_eq!(token.kind, SLASH_SLASH);
        assert_eq!(codes(&token), [ErrorCode::FloorDivisionNotSupportedInVersion]);

        let token = single("!=", lua51);
        assert_eq!(token.kind, BANG_EQ);
        assert_eq!(codes(&token), [ErrorCode::CBooleanOperatorsNotSupportedInVersion]);

        assert!(single("~=", lua51).diagnostics.is_empty());
        assert!(single("&&", LuaSyntaxOptions::GMOD).diagnostics.is_empty());
        assert!(single(">>", LuaSyntaxOptions::LUA53).diagnostics.is_empty());
    }

    #[test]
    fn keywords_follow_the_dialect() {
        assert_eq!(single("goto", LuaSyntaxOptions::LUA52).kind, GOTO_KW);
        assert_eq!(single("goto", LuaSyntaxOptions::LUA51).kind, NAME);
        assert_eq!(single("continue", LuaSyntaxOptions::GMOD).kind, CONTINUE_KW);
        assert_eq!(single("continue", LuaSyntaxOptions::ROBLOX).kind, NAME);
        assert_eq!(single("continue", LuaSyntaxOptions::LUA54).kind, NAME);
        assert_eq!(single("elseif", LuaSyntaxOptions::LUA51).kind, ELSEIF_KW);
        assert_eq!(single("_end1", LuaSyntaxOptions::LUA51).kind, NAME);
    }

    #[test]
    fn unicode_identifiers() {
        let token = single("olá", LuaSyntaxOptions::LUAJIT20);
        assert_eq!(token.kind, NAME);
        assert!(token.diagnostics.is_empty());

        let token = single("olá", LuaSyntaxOptions::LUA53);
        assert_eq!(token.kind, NAME);
        assert_eq!(codes(&token), [ErrorCode::LuajitIdentifierRulesNotSupportedInVersion]);
    }

    #[test]
    fn bad_characters() {
        check(
            "a @ $",
            expect![[r#"
                NAME@0..1 "a"
                  WHITESPACE@1..2 " "
                UNKNOWN@2..3 "@"
                  WHITESPACE@3..4 " "
                  ! error[LUA0014]: bad character '@' at 2..3
                UNKNOWN@4..5 "$"
                  ! error[LUA0014]: bad character '$' at 4..5
                EOF@5..5 ""
            "#]],
        );
    }

    #[test]
    fn lookahead() {
        let mut tokenizer = Tokenizer::new("a = b", LuaSyntaxOptions::ALL);
        assert_eq!(tokenizer.peek().kind, NAME);
        assert_eq!(tokenizer.peek_nth(1).kind, EQ);
        assert_eq!(tokenizer.peek_nth(3).kind, EOF);

        assert_eq!(tokenizer.next_token().kind, NAME);
        assert_eq!(tokenizer.next_token().kind, EQ);
        assert_eq!(tokenizer.peek().kind, NAME);
        assert_eq!(tokenizer.next_token().kind, NAME);
        assert_eq!(tokenizer.next_token().kind, EOF);
        assert_eq!(tokenizer.next_token().kind, EOF);
    }

    #[test]
    fn empty_input() {
        check("", expect![[r#"
            EOF@0..0 ""
        "#]]);
    }
}
