use std::fmt;

/// How seriously a diagnostic should be taken by a consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// Stable identifiers for every diagnostic the front end can produce.
///
/// Lexical codes live below 1000, syntactic ones from 1000 up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ErrorCode {
    InvalidStringEscape = 1,
    UnescapedLineBreakInString = 2,
    UnfinishedString = 3,
    InvalidNumber = 4,
    NumericLiteralTooLarge = 5,
    UnfinishedLongComment = 6,
    ShebangNotSupportedInLuaVersion = 7,
    BinaryNumericLiteralNotSupportedInVersion = 8,
    OctalNumericLiteralNotSupportedInVersion = 9,
    HexFloatLiteralNotSupportedInVersion = 10,
    UnderscoreInNumericLiteralNotSupportedInVersion = 11,
    /// Reserved. With C comments disabled, `//` lexes as floor division and
    /// `/*` as two operators, so the tokenizer never reports this.
    CCommentsNotSupportedInVersion = 12,
    LuajitIdentifierRulesNotSupportedInVersion = 13,
    BadCharacter = 14,
    HexStringEscapesNotSupportedInVersion = 16,
    AmbiguousFunctionCallOrNewStatement = 17,
    NonFunctionCallBeingUsedAsStatement = 18,
    CannotBeAssignedTo = 19,
    DoubleOverflow = 20,
    WhitespaceEscapeNotSupportedInVersion = 21,
    UnicodeEscapesNotSupportedInVersion = 22,
    HexDigitExpected = 23,
    UnicodeEscapeMissingOpenBrace = 24,
    UnicodeEscapeMissingCloseBrace = 25,
    EscapeTooLarge = 26,
    BitwiseOperatorsNotSupportedInVersion = 27,
    FloorDivisionNotSupportedInVersion = 28,
    CBooleanOperatorsNotSupportedInVersion = 29,
    CompoundAssignmentNotSupportedInLuaVersion = 30,
    EmptyStatementsNotSupportedInVersion = 31,
    GotoNotSupportedInVersion = 32,
    LocalVariableAttributesNotSupportedInVersion = 33,

    IdentifierExpectedKw = 1000,
    IdentifierExpected = 1001,
    TokenExpected = 1002,
    ExpressionExpected = 1003,
    InvalidExpressionPart = 1004,
    InvalidStatement = 1005,
    UnexpectedToken = 1006,
    InsufficientStack = 1007,
}

impl ErrorCode {
    pub const fn number(self) -> u16 {
        self as u16
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::AmbiguousFunctionCallOrNewStatement => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message template, `{0}`, `{1}`, ... are replaced by the diagnostic arguments.
    pub const fn template(self) -> &'static str {
        match self {
            Self::InvalidStringEscape => "invalid escape sequence '{0}'",
            Self::UnescapedLineBreakInString => "unescaped line break in string",
            Self::UnfinishedString => "unfinished string",
            Self::InvalidNumber => "invalid number",
            Self::NumericLiteralTooLarge => "numeric literal is too large",
            Self::UnfinishedLongComment => "unfinished long comment",
            Self::ShebangNotSupportedInLuaVersion => {
                "shebangs are not supported in this lua version"
            }
            Self::BinaryNumericLiteralNotSupportedInVersion => {
                "binary numeric literals are not supported in this lua version"
            }
            Self::OctalNumericLiteralNotSupportedInVersion => {
                "octal numeric literals are not supported in this lua version"
            }
            Self::HexFloatLiteralNotSupportedInVersion => {
                "hexadecimal floating point literals are not supported in this lua version"
            }
            Self::UnderscoreInNumericLiteralNotSupportedInVersion => {
                "underscores in numeric literals are not supported in this lua version"
            }
            Self::CCommentsNotSupportedInVersion => {
                "c-style comments are not supported in this lua version"
            }
            Self::LuajitIdentifierRulesNotSupportedInVersion => {
                "characters outside the ASCII range are not allowed in identifiers in this lua version"
            }
            Self::BadCharacter => "bad character '{0}'",
            Self::HexStringEscapesNotSupportedInVersion => {
                "hexadecimal string escapes are not supported in this lua version"
            }
            Self::AmbiguousFunctionCallOrNewStatement => {
                "ambiguous syntax (function call x new statement)"
            }
            Self::NonFunctionCallBeingUsedAsStatement => {
                "only function calls can be used as statements"
            }
            Self::CannotBeAssignedTo => "expression cannot be assigned to",
            Self::DoubleOverflow => "numeric literal does not fit in a double",
            Self::WhitespaceEscapeNotSupportedInVersion => {
                "'\\z' escapes are not supported in this lua version"
            }
            Self::UnicodeEscapesNotSupportedInVersion => {
                "unicode escapes are not supported in this lua version"
            }
            Self::HexDigitExpected => "hexadecimal digit expected",
            Self::UnicodeEscapeMissingOpenBrace => "missing '{' in unicode escape",
            Self::UnicodeEscapeMissingCloseBrace => "missing '}' in unicode escape",
            Self::EscapeTooLarge => "escape sequence value is too large (maximum is {0})",
            Self::BitwiseOperatorsNotSupportedInVersion => {
                "bitwise operators are not supported in this lua version"
            }
            Self::FloorDivisionNotSupportedInVersion => {
                "floor division is not supported in this lua version"
            }
            Self::CBooleanOperatorsNotSupportedInVersion => {
                "c-style boolean operators are not supported in this lua version"
            }
            Self::CompoundAssignmentNotSupportedInLuaVersion => {
                "compound assignment is not supported in this lua version"
            }
            Self::EmptyStatementsNotSupportedInVersion => {
                "empty statements are not supported in this lua version"
            }
            Self::GotoNotSupportedInVersion => {
                "goto labels are not supported in this lua version"
            }
            Self::LocalVariableAttributesNotSupportedInVersion => {
                "local variable attributes are not supported in this lua version"
            }
            Self::IdentifierExpectedKw => "identifier expected; '{0}' is a keyword",
            Self::IdentifierExpected => "identifier expected",
            Self::TokenExpected => "expected '{0}'",
            Self::ExpressionExpected => "expected expression",
            Self::InvalidExpressionPart => "invalid expression term '{0}'",
            Self::InvalidStatement => "invalid statement starting at '{0}'",
            Self::UnexpectedToken => "unexpected token '{0}'",
            Self::InsufficientStack => "expression is nested too deeply",
        }
    }

    /// Substitutes `args` into the template.
    pub fn format<S: AsRef<str>>(self, args: &[S]) -> String {
        let template = self.template();
        let mut message = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            message.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after
                .find('}')
                .and_then(|close| after[..close].parse::<usize>().ok().map(|index| (index, close)));

            match placeholder {
                Some((index, close)) => {
                    if let Some(arg) = args.get(index) {
                        message.push_str(arg.as_ref());
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    message.push('{');
                    rest = after;
                }
            }
        }

        message.push_str(rest);
        message
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LUA{:04}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_arguments() {
        assert_eq!(ErrorCode::TokenExpected.format(&["end"]), "expected 'end'");
        assert_eq!(
            ErrorCode::EscapeTooLarge.format(&["255"]),
            "escape sequence value is too large (maximum is 255)"
        );
    }

    #[test]
    fn literal_braces_survive() {
        assert_eq!(
            ErrorCode::UnicodeEscapeMissingOpenBrace.format::<&str>(&[]),
            "missing '{' in unicode escape"
        );
        assert_eq!(
            ErrorCode::UnicodeEscapeMissingCloseBrace.format::<&str>(&[]),
            "missing '}' in unicode escape"
        );
    }

    #[test]
    fn ids() {
        assert_eq!(ErrorCode::InvalidStringEscape.to_string(), "LUA0001");
        assert_eq!(ErrorCode::UnexpectedToken.to_string(), "LUA1006");
        assert_eq!(ErrorCode::AmbiguousFunctionCallOrNewStatement.severity(), Severity::Warning);
    }

    #[test]
    fn reserved_code_keeps_its_number() {
        assert_eq!(ErrorCode::CCommentsNotSupportedInVersion.to_string(), "LUA0012");
        assert_eq!(ErrorCode::CCommentsNotSupportedInVersion.severity(), Severity::Error);
    }
}
