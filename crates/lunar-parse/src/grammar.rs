use lunar_errors::ErrorCode;
use lunar_yellow::SyntaxKind::{self, *};
use lunar_yellow::SyntaxSet;

use crate::parser::Parser;

mod exprs;
mod stmts;

pub(crate) use exprs::expr;

/// Tokens that can start an expression.
pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    NIL_KW,
    TRUE_KW,
    FALSE_KW,
    NUMBER,
    STRING,
    DOT_DOT_DOT,
    LEFT_BRACE,
    FUNCTION_KW,
    LEFT_PAREN,
    NAME,
    NOT_KW,
    MINUS,
    HASH,
    TILDE,
    BANG,
]);

pub(crate) const ARGUMENT_SEPARATOR: SyntaxSet = SyntaxSet::new([COMMA]);

/// Tokens that end a block.
pub(crate) const BLOCK_END: SyntaxSet = SyntaxSet::new([END_KW, ELSE_KW, ELSEIF_KW, UNTIL_KW]);

/// Tokens a broken list gives up at instead of skipping.
const RECOVERY: SyntaxSet = SyntaxSet::new([
    LOCAL_KW,
    FOR_KW,
    IF_KW,
    REPEAT_KW,
    WHILE_KW,
    DO_KW,
    GOTO_KW,
    BREAK_KW,
    CONTINUE_KW,
    COLON_COLON,
    FUNCTION_KW,
    RETURN_KW,
    SEMICOLON,
    THEN_KW,
    IN_KW,
    EOF,
])
.union(&BLOCK_END);

pub(crate) fn chunk(p: &mut Parser<'_>) {
    let m = p.start();
    block(p, &SyntaxSet::EMPTY);
    p.finish_input();
    m.complete(p, CHUNK);
}

/// Statements up to `EOF` or one of `terminators`.
pub(crate) fn block(p: &mut Parser<'_>, terminators: &SyntaxSet) {
    let m = p.start();
    while !p.at(EOF) && !p.at_set(terminators) {
        stmts::stmt(p);
    }
    m.complete(p, BLOCK);
}

/// Body of a function or a loop, closed by `end`.
pub(crate) fn body(p: &mut Parser<'_>) {
    block(p, &BLOCK_END);
    p.expect(END_KW);
}

/// `bra element (delimiter element)* ket`. The element parser returns
/// `false` to end the list early.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    (bra, ket): (SyntaxKind, SyntaxKind),
    delimiters: &SyntaxSet,
    first_set: &SyntaxSet,
    allow_trailing: bool,
    mut element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    if !p.expect(bra) {
        p.missing(ket);
        return;
    }

    if !p.at_set(first_set) && (p.at(ket) || p.at_set(&RECOVERY)) {
        p.expect(ket);
        return;
    }

    'elements: while element(p) {
        loop {
            if p.at_set(delimiters) {
                p.advance();
                if allow_trailing && p.at(ket) {
                    break 'elements;
                }
                continue 'elements;
            }
            if p.at_set(first_set) {
                p.expect(COMMA);
                continue 'elements;
            }
            if p.at(ket) || p.at_set(&RECOVERY) {
                break 'elements;
            }
            p.skip(ErrorCode::UnexpectedToken, vec![p.peek_text().to_owned()]);
        }
    }

    p.expect(ket);
}
