//! Numeric literals.

use lunar_errors::ErrorCode;
use lunar_yellow::TokenValue;

use crate::{Tokenizer, is_identifier_continue};

impl Tokenizer<'_> {
    /// Lexes the rest of a number whose first character (a digit or `.`)
    /// was already consumed.
    pub(crate) fn number(&mut self, first_char: char) -> TokenValue {
        let value = match (first_char, self.cursor.peek()) {
            ('0', 'x' | 'X') => {
                self.cursor.advance();
                self.hexadecimal()
            }
            ('0', 'b' | 'B') => {
                self.cursor.advance();
                self.gate(
                    self.options.accept_binary_numbers,
                    ErrorCode::BinaryNumericLiteralNotSupportedInVersion,
                );
                self.radix_integer(2)
            }
            ('0', 'o' | 'O') => {
                self.cursor.advance();
                self.gate(
                    self.options.accept_octal_numbers,
                    ErrorCode::OctalNumericLiteralNotSupportedInVersion,
                );
                self.radix_integer(8)
            }
            _ => self.decimal(first_char),
        };

        if self.token_text().contains('_') {
            self.gate(
                self.options.accept_underscore_in_number_literals,
                ErrorCode::UnderscoreInNumericLiteralNotSupportedInVersion,
            );
        }

        match value {
            Some(value) if !is_identifier_continue(self.cursor.peek()) => value,
            _ => {
                self.cursor.advance_while(is_identifier_continue);
                self.error(ErrorCode::InvalidNumber, Vec::new());
                TokenValue::Integer(0)
            }
        }
    }

    /// Consumes digits of `radix` and `_` separators, returning how many
    /// digits there were.
    fn digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        loop {
            match self.cursor.peek() {
                '_' => {}
                c if c.is_digit(radix) => count += 1,
                _ => return count,
            }
            self.cursor.advance();
        }
    }

    /// Whether a `.` at the cursor starts a fraction rather than `..`.
    fn at_fraction(&self) -> bool {
        self.cursor.matches('.') && self.cursor.second() != '.'
    }

    fn exponent(&mut self) -> Option<()> {
        self.cursor.advance();
        if matches!(self.cursor.peek(), '+' | '-') {
            self.cursor.advance();
        }
        (self.digits(10) > 0).then_some(())
    }

    fn decimal(&mut self, first_char: char) -> Option<TokenValue> {
        let mut is_float = first_char == '.';
        self.digits(10);

        if !is_float && self.at_fraction() {
            self.cursor.advance();
            self.digits(10);
            is_float = true;
        }

        if matches!(self.cursor.peek(), 'e' | 'E') {
            self.exponent()?;
            is_float = true;
        }

        let text: String = self.token_text().chars().filter(|&c| c != '_').collect();
        if !is_float {
            if let Ok(value) = text.parse::<i64>() {
                return Some(TokenValue::Integer(value));
            }
        }

        let value = text.parse::<f64>().ok()?;
        if value.is_infinite() {
            self.error(ErrorCode::DoubleOverflow, Vec::new());
        }
        Some(TokenValue::Float(value))
    }

    fn hexadecimal(&mut self) -> Option<TokenValue> {
        let int_digits = self.digits(16);
        let mut is_float = false;
        let mut frac_digits = 0;

        if self.at_fraction() {
            self.cursor.advance();
            frac_digits = self.digits(16);
            is_float = true;
        }
        if int_digits + frac_digits == 0 {
            return None;
        }

        let mantissa_end = self.offset();
        if matches!(self.cursor.peek(), 'p' | 'P') {
            self.exponent()?;
            is_float = true;
        }

        let text = self.token_text();
        let mantissa_len = usize::from(mantissa_end - self.range().start());
        let (mantissa, exponent) = text.split_at(mantissa_len);
        let mantissa = mantissa[2..].chars().filter_map(|c| c.to_digit(16));

        if !is_float {
            let value = mantissa.fold(0u64, |acc, digit| {
                acc.wrapping_mul(16).wrapping_add(u64::from(digit))
            });
            return Some(TokenValue::Integer(value as i64));
        }

        self.gate(
            self.options.accept_hex_float_literals,
            ErrorCode::HexFloatLiteralNotSupportedInVersion,
        );

        let mantissa = mantissa.fold(0f64, |acc, digit| acc * 16.0 + f64::from(digit));
        let exponent = binary_exponent(exponent) - 4 * frac_digits as i64;
        let exponent = exponent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let value = mantissa * 2f64.powi(exponent);
        if value.is_infinite() {
            self.error(ErrorCode::DoubleOverflow, Vec::new());
        }
        Some(TokenValue::Float(value))
    }

    fn radix_integer(&mut self, radix: u32) -> Option<TokenValue> {
        if self.digits(radix) == 0 {
            return None;
        }

        let digits: String = self.token_text()[2..].chars().filter(|&c| c != '_').collect();
        match i64::from_str_radix(&digits, radix) {
            Ok(value) => Some(TokenValue::Integer(value)),
            Err(_) => {
                self.error(ErrorCode::NumericLiteralTooLarge, Vec::new());
                Some(TokenValue::Integer(0))
            }
        }
    }
}

/// Value of a `p[+-]digits` suffix, saturating on overflow.
fn binary_exponent(text: &str) -> i64 {
    let Some(text) = text.get(1..) else {
        return 0;
    };

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add(i64::from(digit)));

    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use lunar_inputs::LuaSyntaxOptions;
    use lunar_yellow::SyntaxKind::*;

    use crate::{Token, lex};

    use super::*;

    fn number(text: &str, options: LuaSyntaxOptions) -> Token {
        let tokens: Vec<_> = lex(text, options).collect();
        assert_eq!(tokens.len(), 2, "{text:?} lexed to {tokens:?}");
        assert_eq!(tokens[0].kind, NUMBER, "{text:?}");
        tokens.into_iter().next().unwrap()
    }

    fn codes(token: &Token) -> Vec<ErrorCode> {
        token.diagnostics.iter().map(|diagnostic| diagnostic.code()).collect()
    }

    #[track_caller]
    fn check(text: &str, expected: TokenValue) {
        let token = number(text, LuaSyntaxOptions::ALL);
        assert_eq!(token.value, expected, "{text:?}");
        assert!(token.diagnostics.is_empty(), "{text:?}: {:?}", token.diagnostics);
    }

    #[test]
    fn decimal() {
        check("10", TokenValue::Integer(10));
        check("0", TokenValue::Integer(0));
        check("1e10", TokenValue::Float(1e10));
        check("1.5e-3", TokenValue::Float(1.5e-3));
        check("3.", TokenValue::Float(3.0));
        check(".5", TokenValue::Float(0.5));
        check("2E+2", TokenValue::Float(200.0));
        check("1_000", TokenValue::Integer(1000));
    }

    #[test]
    fn decimal_overflow_becomes_float() {
        check("9223372036854775808", TokenValue::Float(9223372036854775808.0));
        check("9223372036854775807", TokenValue::Integer(i64::MAX));
    }

    #[test]
    fn hexadecimal() {
        check("0x1F", TokenValue::Integer(31));
        check("0XfF", TokenValue::Integer(255));
        check("0xffffffffffffffff", TokenValue::Integer(-1));
        check("0x10000000000000000", TokenValue::Integer(0));
        check("0x1p4", TokenValue::Float(16.0));
        check("0x.8", TokenValue::Float(0.5));
        check("0xA.8p1", TokenValue::Float(21.0));
        check("0x1P-1", TokenValue::Float(0.5));
    }

    #[test]
    fn hex_floats_are_gated() {
        let token = number("0x1p4", LuaSyntaxOptions::LUA51);
        assert_eq!(token.value, TokenValue::Float(16.0));
        assert_eq!(codes(&token), [ErrorCode::HexFloatLiteralNotSupportedInVersion]);

        let token = number("0x1p4", LuaSyntaxOptions::LUA52);
        assert!(token.diagnostics.is_empty());
    }

    #[test]
    fn binary_and_octal() {
        check("0b101", TokenValue::Integer(5));
        check("0B1_1", TokenValue::Integer(3));
        check("0o17", TokenValue::Integer(15));

        let token = number("0b101", LuaSyntaxOptions::LUA53);
        assert_eq!(token.value, TokenValue::Integer(5));
        assert_eq!(codes(&token), [ErrorCode::BinaryNumericLiteralNotSupportedInVersion]);

        let token = number("0o7", LuaSyntaxOptions::LUAJIT21);
        assert_eq!(codes(&token), [ErrorCode::OctalNumericLiteralNotSupportedInVersion]);

        let too_large = format!("0b1{}", "0".repeat(63));
        let token = number(&too_large, LuaSyntaxOptions::ALL);
        assert_eq!(token.value, TokenValue::Integer(0));
        assert_eq!(codes(&token), [ErrorCode::NumericLiteralTooLarge]);
    }

    #[test]
    fn underscores_are_gated() {
        let token = number("1_0", LuaSyntaxOptions::LUA54);
        assert_eq!(token.value, TokenValue::Integer(10));
        assert_eq!(codes(&token), [ErrorCode::UnderscoreInNumericLiteralNotSupportedInVersion]);
    }

    #[test]
    fn malformed() {
        for text in ["3x", "0x", "0b", "0b12", "1e", "1e+", "0x1p", "12abc"] {
            let token = number(text, LuaSyntaxOptions::ALL);
            assert_eq!(token.kind_range.len(), text_size::TextSize::of(text), "{text:?}");
            assert_eq!(codes(&token), [ErrorCode::InvalidNumber], "{text:?}");
        }
    }

    #[test]
    fn concatenation_is_not_a_fraction() {
        let kinds: Vec<_> = lex("1..2", LuaSyntaxOptions::ALL).map(|token| token.kind).collect();
        assert_eq!(kinds, [NUMBER, DOT_DOT, NUMBER, EOF]);
    }

    #[test]
    fn double_overflow() {
        let token = number("1e999", LuaSyntaxOptions::ALL);
        assert_eq!(token.value, TokenValue::Float(f64::INFINITY));
        assert_eq!(codes(&token), [ErrorCode::DoubleOverflow]);
    }
}
