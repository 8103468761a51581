//! Every token, trivia and node kind, plus the static facts the lexer and
//! parser look up about them.

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COLON,
    COLON_COLON,
    COMMA,
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
    PERCENT,
    PERCENT_EQ,
    CARET,
    CARET_EQ,
    HASH,
    AMP,
    AMP_AMP,
    PIPE,
    PIPE_PIPE,
    TILDE,
    TILDE_EQ,
    BANG,
    BANG_EQ,
    EQ,
    EQ_EQ,
    LT,
    LT_EQ,
    LT_LT,
    GT,
    GT_EQ,
    GT_GT,

    AND_KW,
    BREAK_KW,
    DO_KW,
    ELSE_KW,
    ELSEIF_KW,
    END_KW,
    FALSE_KW,
    FOR_KW,
    FUNCTION_KW,
    GOTO_KW,
    IF_KW,
    IN_KW,
    LOCAL_KW,
    NIL_KW,
    NOT_KW,
    OR_KW,
    REPEAT_KW,
    RETURN_KW,
    THEN_KW,
    TRUE_KW,
    UNTIL_KW,
    WHILE_KW,
    CONTINUE_KW,

    NAME,
    NUMBER,
    STRING,
    UNKNOWN,
    EOF,

    WHITESPACE,
    END_OF_LINE,
    SINGLE_LINE_COMMENT,
    MULTI_LINE_COMMENT,
    SHEBANG,
    SKIPPED_TOKEN,

    TOMBSTONE,
    CHUNK,
    BLOCK,

    LOCAL_VARIABLE_DECLARATION_STATEMENT,
    LOCAL_DECLARATION_NAME,
    VARIABLE_ATTRIBUTE,
    EQUALS_VALUES_CLAUSE,
    LOCAL_FUNCTION_DECLARATION_STATEMENT,
    NUMERIC_FOR_STATEMENT,
    GENERIC_FOR_STATEMENT,
    IF_STATEMENT,
    ELSE_IF_CLAUSE,
    ELSE_CLAUSE,
    REPEAT_UNTIL_STATEMENT,
    WHILE_STATEMENT,
    DO_STATEMENT,
    GOTO_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    GOTO_LABEL_STATEMENT,
    FUNCTION_DECLARATION_STATEMENT,
    SIMPLE_FUNCTION_NAME,
    MEMBER_FUNCTION_NAME,
    METHOD_FUNCTION_NAME,
    RETURN_STATEMENT,
    ASSIGNMENT_STATEMENT,
    COMPOUND_ASSIGNMENT_STATEMENT,
    EXPRESSION_STATEMENT,
    EMPTY_STATEMENT,
    PARAMETER_LIST,
    NAMED_PARAMETER,
    VARARG_PARAMETER,

    LITERAL_EXPRESSION,
    VARARG_EXPRESSION,
    TABLE_CONSTRUCTOR_EXPRESSION,
    IDENTIFIER_KEYED_TABLE_FIELD,
    EXPRESSION_KEYED_TABLE_FIELD,
    UNKEYED_TABLE_FIELD,
    ANONYMOUS_FUNCTION_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    NAME_EXPRESSION,
    MEMBER_ACCESS_EXPRESSION,
    ELEMENT_ACCESS_EXPRESSION,
    METHOD_CALL_EXPRESSION,
    FUNCTION_CALL_EXPRESSION,
    EXPRESSION_LIST_FUNCTION_ARGUMENT,
    STRING_FUNCTION_ARGUMENT,
    TABLE_CONSTRUCTOR_FUNCTION_ARGUMENT,
    UNARY_EXPRESSION,
    BINARY_EXPRESSION,
}

use SyntaxKind::*;

/// Precedence of unary operators. Only `^` binds tighter.
pub const UNARY_PRECEDENCE: u8 = 11;

impl SyntaxKind {
    pub const fn is_token(self) -> bool {
        (self as u16) <= (EOF as u16)
    }

    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            WHITESPACE
                | END_OF_LINE
                | SINGLE_LINE_COMMENT
                | MULTI_LINE_COMMENT
                | SHEBANG
                | SKIPPED_TOKEN
        )
    }

    pub const fn is_node(self) -> bool {
        (self as u16) >= (TOMBSTONE as u16)
    }

    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (AND_KW as u16) && (self as u16) <= (CONTINUE_KW as u16)
    }

    pub const fn is_punctuation(self) -> bool {
        (self as u16) <= (GT_GT as u16)
    }

    /// Keyword kind for `text`, regardless of dialect.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "and" => AND_KW,
            "break" => BREAK_KW,
            "do" => DO_KW,
            "else" => ELSE_KW,
            "elseif" => ELSEIF_KW,
            "end" => END_KW,
            "false" => FALSE_KW,
            "for" => FOR_KW,
            "function" => FUNCTION_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "in" => IN_KW,
            "local" => LOCAL_KW,
            "nil" => NIL_KW,
            "not" => NOT_KW,
            "or" => OR_KW,
            "repeat" => REPEAT_KW,
            "return" => RETURN_KW,
            "then" => THEN_KW,
            "true" => TRUE_KW,
            "until" => UNTIL_KW,
            "while" => WHILE_KW,
            "continue" => CONTINUE_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Spelling of kinds whose text never varies.
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            LEFT_BRACKET => "[",
            RIGHT_BRACKET => "]",
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            SEMICOLON => ";",
            COLON => ":",
            COLON_COLON => "::",
            COMMA => ",",
            DOT => ".",
            DOT_DOT => "..",
            DOT_DOT_DOT => "...",
            DOT_DOT_EQ => "..=",
            PLUS => "+",
            PLUS_EQ => "+=",
            MINUS => "-",
            MINUS_EQ => "-=",
            STAR => "*",
            STAR_EQ => "*=",
            SLASH => "/",
            SLASH_EQ => "/=",
            SLASH_SLASH => "//",
            PERCENT => "%",
            PERCENT_EQ => "%=",
            CARET => "^",
            CARET_EQ => "^=",
            HASH => "#",
            AMP => "&",
            AMP_AMP => "&&",
            PIPE => "|",
            PIPE_PIPE => "||",
            TILDE => "~",
            TILDE_EQ => "~=",
            BANG => "!",
            BANG_EQ => "!=",
            EQ => "=",
            EQ_EQ => "==",
            LT => "<",
            LT_EQ => "<=",
            LT_LT => "<<",
            GT => ">",
            GT_EQ => ">=",
            GT_GT => ">>",
            AND_KW => "and",
            BREAK_KW => "break",
            DO_KW => "do",
            ELSE_KW => "else",
            ELSEIF_KW => "elseif",
            END_KW => "end",
            FALSE_KW => "false",
            FOR_KW => "for",
            FUNCTION_KW => "function",
            GOTO_KW => "goto",
            IF_KW => "if",
            IN_KW => "in",
            LOCAL_KW => "local",
            NIL_KW => "nil",
            NOT_KW => "not",
            OR_KW => "or",
            REPEAT_KW => "repeat",
            RETURN_KW => "return",
            THEN_KW => "then",
            TRUE_KW => "true",
            UNTIL_KW => "until",
            WHILE_KW => "while",
            CONTINUE_KW => "continue",
            _ => return None,
        };
        Some(text)
    }

    /// Human readable name used in diagnostics.
    pub const fn describe(self) -> &'static str {
        match self.fixed_text() {
            Some(text) => text,
            None => match self {
                NAME => "identifier",
                NUMBER => "number",
                STRING => "string",
                EOF => "end of file",
                _ => "token",
            },
        }
    }

    pub const fn unary_precedence(self) -> Option<u8> {
        match self {
            NOT_KW | MINUS | HASH | TILDE | BANG => Some(UNARY_PRECEDENCE),
            _ => None,
        }
    }

    pub const fn binary_precedence(self) -> Option<u8> {
        let precedence = match self {
            OR_KW | PIPE_PIPE => 1,
            AND_KW | AMP_AMP => 2,
            LT | GT | LT_EQ | GT_EQ | TILDE_EQ | BANG_EQ | EQ_EQ => 3,
            PIPE => 4,
            TILDE => 5,
            AMP => 6,
            LT_LT | GT_GT => 7,
            DOT_DOT => 8,
            PLUS | MINUS => 9,
            STAR | SLASH | SLASH_SLASH | PERCENT => 10,
            CARET => 12,
            _ => return None,
        };
        Some(precedence)
    }

    pub const fn is_right_associative(self) -> bool {
        matches!(self, CARET | DOT_DOT)
    }

    pub const fn is_compound_assignment_operator(self) -> bool {
        matches!(self, PLUS_EQ | MINUS_EQ | STAR_EQ | SLASH_EQ | PERCENT_EQ | CARET_EQ | DOT_DOT_EQ)
    }

    /// Expressions that may appear on the left of an assignment.
    pub const fn is_variable_expression(self) -> bool {
        matches!(self, NAME_EXPRESSION | MEMBER_ACCESS_EXPRESSION | ELEMENT_ACCESS_EXPRESSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert!(PLUS.is_token() && PLUS.is_punctuation());
        assert!(EOF.is_token() && !EOF.is_trivia());
        assert!(END_OF_LINE.is_trivia() && !END_OF_LINE.is_token());
        assert!(BLOCK.is_node() && !BLOCK.is_token());
        assert!(CONTINUE_KW.is_keyword() && !NAME.is_keyword());
    }

    #[test]
    fn keywords_round_trip_through_fixed_text() {
        for (i, text) in ALL_KEYWORDS.iter().enumerate() {
            let kind = SyntaxKind::from_keyword(text).unwrap();
            assert_eq!(kind as u16, AND_KW as u16 + i as u16);
            assert_eq!(kind.fixed_text(), Some(*text));
        }
    }

    const ALL_KEYWORDS: [&str; 23] = [
        "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
        "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
        "continue",
    ];

    #[test]
    fn precedence() {
        assert!(CARET.binary_precedence() > MINUS.unary_precedence());
        assert!(MINUS.unary_precedence() > STAR.binary_precedence());
        assert!(DOT_DOT.binary_precedence() < PLUS.binary_precedence());
        assert!(AND_KW.binary_precedence() > OR_KW.binary_precedence());
        assert!(CARET.is_right_associative() && DOT_DOT.is_right_associative());
        assert!(!PLUS.is_right_associative());
        assert_eq!(NAME.binary_precedence(), None);
    }
}
