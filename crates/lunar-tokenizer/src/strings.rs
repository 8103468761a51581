//! Short and long string literals. Values are byte strings since escapes can
//! produce arbitrary bytes.

use lunar_errors::ErrorCode;
use lunar_yellow::TokenValue;
use text_size::{TextRange, TextSize};

use crate::Tokenizer;

const MAX_CODEPOINT: u32 = 0x10FFFF;

impl Tokenizer<'_> {
    pub(crate) fn short_string(&mut self, quote: char) -> TokenValue {
        let mut value = Vec::new();

        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => {
                    self.error(ErrorCode::UnfinishedString, Vec::new());
                    break;
                }
                c if c == quote => {
                    self.cursor.advance();
                    break;
                }
                '\\' => self.escape(&mut value),
                '\n' | '\r' => {
                    let start = self.offset();
                    self.cursor.eat_end_of_line();
                    let range = TextRange::new(start, self.offset());
                    value.extend_from_slice(self.text[range].as_bytes());
                    self.error_at(range, ErrorCode::UnescapedLineBreakInString, Vec::new());
                }
                c => {
                    self.cursor.advance();
                    let mut buf = [0; 4];
                    value.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }

        TokenValue::String(value.into_boxed_slice())
    }

    /// Contents between the brackets, minus a line break right after the
    /// opening one.
    pub(crate) fn long_string(&mut self, level: usize) -> TokenValue {
        let start = usize::from(self.offset());
        let (contents, terminated) = self.cursor.long_bracket(level);
        if !terminated {
            self.error(ErrorCode::UnfinishedString, Vec::new());
        }

        let contents = &self.text[start + contents.start..start + contents.end];
        let contents = ["\r\n", "\n\r", "\n", "\r"]
            .iter()
            .find_map(|eol| contents.strip_prefix(eol))
            .unwrap_or(contents);

        TokenValue::String(contents.as_bytes().into())
    }

    fn escape(&mut self, value: &mut Vec<u8>) {
        let start = self.offset();
        self.cursor.advance();

        let simple = match self.cursor.peek() {
            _ if self.cursor.is_eof() => return,
            '\n' | '\r' => {
                self.cursor.eat_end_of_line();
                value.push(b'\n');
                return;
            }
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0C,
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            'v' => 0x0B,
            '\\' => b'\\',
            '"' => b'"',
            '\'' => b'\'',
            'z' => {
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_whitespace() || c == '\u{b}');
                if !self.options.accept_whitespace_escape {
                    self.escape_error(start, ErrorCode::WhitespaceEscapeNotSupportedInVersion);
                }
                return;
            }
            '0'..='9' => {
                self.decimal_escape(start, value);
                return;
            }
            'x' => {
                self.cursor.advance();
                self.hex_escape(start, value);
                return;
            }
            'u' => {
                self.cursor.advance();
                self.unicode_escape(start, value);
                return;
            }
            _ => {
                self.cursor.advance();
                self.escape_error(start, ErrorCode::InvalidStringEscape);
                return;
            }
        };

        self.cursor.advance();
        value.push(simple);
    }

    fn escape_error(&mut self, start: TextSize, code: ErrorCode) {
        let range = TextRange::new(start, self.offset());
        let args = match code {
            ErrorCode::InvalidStringEscape => vec![self.text[range].to_owned()],
            ErrorCode::EscapeTooLarge => vec![format!("{MAX_CODEPOINT:X}")],
            _ => Vec::new(),
        };
        self.error_at(range, code, args);
    }

    /// `\ddd`, at most three digits with a value up to 255.
    fn decimal_escape(&mut self, start: TextSize, value: &mut Vec<u8>) {
        let mut byte = 0u32;
        for _ in 0..3 {
            match self.cursor.peek().to_digit(10) {
                Some(digit) => {
                    self.cursor.advance();
                    byte = byte * 10 + digit;
                }
                None => break,
            }
        }

        match u8::try_from(byte) {
            Ok(byte) => value.push(byte),
            Err(_) => self.escape_error(start, ErrorCode::InvalidStringEscape),
        }
    }

    /// `\xXX`, one or two hex digits.
    fn hex_escape(&mut self, start: TextSize, value: &mut Vec<u8>) {
        let mut byte = 0u8;
        let mut digits = 0;
        while digits < 2 {
            let Some(digit) = self.cursor.peek().to_digit(16) else {
                break;
            };
            self.cursor.advance();
            byte = byte * 16 + digit as u8;
            digits += 1;
        }

        if digits == 0 {
            self.escape_error(start, ErrorCode::InvalidStringEscape);
        } else {
            value.push(byte);
        }

        if !self.options.accept_hex_escapes_in_strings {
            self.escape_error(start, ErrorCode::HexStringEscapesNotSupportedInVersion);
        }
    }

    /// `\u{XXX}`, encoded as UTF-8 even for surrogates.
    fn unicode_escape(&mut self, start: TextSize, value: &mut Vec<u8>) {
        let open = self.cursor.eat('{');

        let mut codepoint = 0u32;
        let mut digits = 0;
        while let Some(digit) = self.cursor.peek().to_digit(16) {
            self.cursor.advance();
            codepoint = codepoint.saturating_mul(16).saturating_add(digit);
            digits += 1;
        }

        let close = self.cursor.eat('}');

        if digits == 0 {
            self.escape_error(start, ErrorCode::HexDigitExpected);
        }
        if !open {
            self.escape_error(start, ErrorCode::UnicodeEscapeMissingOpenBrace);
        }
        if !close {
            self.escape_error(start, ErrorCode::UnicodeEscapeMissingCloseBrace);
        }
        if codepoint > MAX_CODEPOINT {
            self.escape_error(start, ErrorCode::EscapeTooLarge);
            codepoint = MAX_CODEPOINT;
        }
        if !self.options.accept_unicode_escape {
            self.escape_error(start, ErrorCode::UnicodeEscapesNotSupportedInVersion);
        }

        if digits > 0 {
            encode_utf8(codepoint, value);
        }
    }
}

fn encode_utf8(codepoint: u32, out: &mut Vec<u8>) {
    match codepoint {
        0..=0x7F => out.push(codepoint as u8),
        0x80..=0x7FF => {
            out.push(0xC0 | (codepoint >> 6) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
        0x800..=0xFFFF => {
            out.push(0xE0 | (codepoint >> 12) as u8);
            out.push(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
        _ => {
            out.push(0xF0 | (codepoint >> 18) as u8);
            out.push(0x80 | ((codepoint >> 12) & 0x3F) as u8);
            out.push(0x80 | ((codepoint >> 6) & 0x3F) as u8);
            out.push(0x80 | (codepoint & 0x3F) as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use lunar_errors::Diagnostic;
    use lunar_inputs::LuaSyntaxOptions;
    use lunar_yellow::SyntaxKind::*;

    use crate::{Token, lex};

    use super::*;

    fn string(text: &str, options: LuaSyntaxOptions) -> Token {
        let tokens: Vec<_> = lex(text, options).collect();
        assert_eq!(tokens.len(), 2, "{text:?} lexed to {tokens:?}");
        assert_eq!(tokens[0].kind, STRING, "{text:?}");
        assert_eq!(tokens[0].kind_range.len(), TextSize::of(text), "{text:?}");
        tokens.into_iter().next().unwrap()
    }

    fn codes(token: &Token) -> Vec<ErrorCode> {
        token.diagnostics.iter().map(Diagnostic::code).collect()
    }

    #[track_caller]
    fn check(text: &str, expected: &[u8]) {
        let token = string(text, LuaSyntaxOptions::ALL);
        assert_eq!(token.value.as_bytes(), Some(expected), "{text:?}");
        assert!(token.diagnostics.is_empty(), "{text:?}: {:?}", token.diagnostics);
    }

    #[test]
    fn simple_escapes() {
        check(r#""abc""#, b"abc");
        check(r"'it\'s'", b"it's");
        check(r#""\a\b\f\n\r\t\v\\\"""#, b"\x07\x08\x0C\n\r\t\x0B\\\"");
        check("\"a\\\nb\"", b"a\nb");
        check("\"a\\\r\nb\"", b"a\nb");
    }

    #[test]
    fn numeric_escapes() {
        check(r#""\65\066\0""#, b"AB\0");
        check(r#""\x41\x7a""#, b"Az");
        check(r#""\u{48}\u{e9}\u{20AC}""#, "Hé€".as_bytes());
        check(r#""\255""#, &[255]);
    }

    #[test]
    fn whitespace_escape() {
        check("\"a\\z  \n  b\"", b"ab");

        let token = string("\"a\\z b\"", LuaSyntaxOptions::LUA51);
        assert_eq!(token.value.as_bytes(), Some(&b"ab"[..]));
        assert_eq!(codes(&token), [ErrorCode::WhitespaceEscapeNotSupportedInVersion]);
    }

    #[test]
    fn invalid_escapes() {
        let token = string(r#""\q\256""#, LuaSyntaxOptions::ALL);
        let messages: Vec<_> =
            token.diagnostics.iter().map(|diagnostic| diagnostic.message().to_owned()).collect();
        assert_eq!(messages, ["invalid escape sequence '\\q'", "invalid escape sequence '\\256'"]);

        let token = string(r#""\u{110000}""#, LuaSyntaxOptions::ALL);
        assert_eq!(
            token.diagnostics[0].message(),
            "escape sequence value is too large (maximum is 10FFFF)"
        );
        assert_eq!(token.value.as_bytes(), Some("\u{10FFFF}".as_bytes()));

        let token = string(r#""\u48""#, LuaSyntaxOptions::ALL);
        assert_eq!(codes(&token), [
            ErrorCode::UnicodeEscapeMissingOpenBrace,
            ErrorCode::UnicodeEscapeMissingCloseBrace
        ]);
    }

    #[test]
    fn gated_escapes() {
        let token = string(r#""\x41""#, LuaSyntaxOptions::LUA51);
        assert_eq!(token.value.as_bytes(), Some(&b"A"[..]));
        assert_eq!(codes(&token), [ErrorCode::HexStringEscapesNotSupportedInVersion]);

        let token = string(r#""\u{41}""#, LuaSyntaxOptions::LUA52);
        assert_eq!(codes(&token), [ErrorCode::UnicodeEscapesNotSupportedInVersion]);
    }

    #[test]
    fn unfinished_strings() {
        let token = string("\"abc", LuaSyntaxOptions::ALL);
        assert_eq!(token.value.as_bytes(), Some(&b"abc"[..]));
        assert_eq!(codes(&token), [ErrorCode::UnfinishedString]);

        let token = string("'a\nb'", LuaSyntaxOptions::ALL);
        assert_eq!(token.value.as_bytes(), Some(&b"a\nb"[..]));
        assert_eq!(codes(&token), [ErrorCode::UnescapedLineBreakInString]);
        assert_eq!(token.diagnostics[0].range(), TextRange::at(2.into(), 1.into()));
    }

    #[test]
    fn long_strings() {
        check("[[abc]]", b"abc");
        check("[==[abc]==]", b"abc");
        check("[=[a]]b]=]", b"a]]b");
        check("[[\nline]]", b"line");
        check("[[\r\n\nline]]", b"\nline");
        check("[[\\n]]", b"\\n");
    }

    #[test]
    fn long_string_level_must_match() {
        let token = string("[==[abc]=]", LuaSyntaxOptions::ALL);
        assert_eq!(codes(&token), [ErrorCode::UnfinishedString]);
        assert_eq!(token.kind_range, TextRange::up_to(10.into()));
    }

    #[test]
    fn open_bracket_without_level() {
        let kinds: Vec<_> = lex("a[=b", LuaSyntaxOptions::ALL).map(|token| token.kind).collect();
        assert_eq!(kinds, [NAME, LEFT_BRACKET, EQ, NAME, EOF]);
    }
}
