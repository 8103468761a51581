use lunar_errors::ErrorCode;
use lunar_yellow::SyntaxKind::*;
use lunar_yellow::SyntaxSet;

use super::stmts::parameter_list;
use super::{ARGUMENT_SEPARATOR, EXPR_FIRST, body, delimited};
use crate::parser::{CompletedMarker, Parser};

const FIELD_SEPARATOR: SyntaxSet = SyntaxSet::new([COMMA, SEMICOLON]);
const FIELD_FIRST: SyntaxSet = EXPR_FIRST.union(&SyntaxSet::new([LEFT_BRACKET]));

pub(crate) fn expr(p: &mut Parser<'_>) -> CompletedMarker {
    expr_bp(p, 0)
}

/// Comma separated expressions.
pub(super) fn expr_list(p: &mut Parser<'_>) {
    expr(p);
    while p.eat(COMMA) {
        expr(p);
    }
}

/// Precedence climbing. Operators binding no tighter than `min_precedence`
/// are left to the caller.
///
/// Chains of a right associative operator are collected in a loop with their
/// markers held open, so `a .. b .. c` nests to the right without one level of
/// recursion per operand.
fn expr_bp(p: &mut Parser<'_>, min_precedence: u8) -> CompletedMarker {
    if !p.enter() {
        return too_deep(p);
    }

    let mut lhs = match p.peek_kind().unary_precedence() {
        Some(precedence) => {
            let m = p.start();
            p.advance();
            expr_bp(p, precedence);
            m.complete(p, UNARY_EXPRESSION)
        }
        None => primary_expr(p),
    };

    loop {
        let operator = p.peek_kind();
        let Some(precedence) = operator.binary_precedence() else {
            break;
        };
        if precedence <= min_precedence {
            break;
        }

        let m = lhs.precede(p);
        p.advance();
        if !operator.is_right_associative() {
            expr_bp(p, precedence);
            lhs = m.complete(p, BINARY_EXPRESSION);
            continue;
        }

        let mut open = vec![m];
        loop {
            let operand = expr_bp(p, precedence);
            if p.peek_kind().binary_precedence() != Some(precedence) {
                break;
            }
            open.push(operand.precede(p));
            p.advance();
        }
        while let Some(m) = open.pop() {
            lhs = m.complete(p, BINARY_EXPRESSION);
        }
    }

    p.leave();
    lhs
}

fn too_deep(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at(EOF) {
        p.missing_with_error(NAME, ErrorCode::InsufficientStack, Vec::new());
    } else {
        p.skip(ErrorCode::InsufficientStack, Vec::new());
        p.missing(NAME);
    }
    m.complete(p, NAME_EXPRESSION)
}

fn primary_expr(p: &mut Parser<'_>) -> CompletedMarker {
    match p.peek_kind() {
        NIL_KW | TRUE_KW | FALSE_KW | NUMBER | STRING => {
            let m = p.start();
            p.advance();
            m.complete(p, LITERAL_EXPRESSION)
        }
        DOT_DOT_DOT => {
            let m = p.start();
            p.advance();
            m.complete(p, VARARG_EXPRESSION)
        }
        LEFT_BRACE => table_constructor(p),
        FUNCTION_KW => {
            let m = p.start();
            p.advance();
            parameter_list(p);
            body(p);
            m.complete(p, ANONYMOUS_FUNCTION_EXPRESSION)
        }
        _ => prefix_expr(p),
    }
}

/// A name or parenthesised expression followed by any number of member
/// accesses, indexings and calls.
pub(super) fn prefix_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let mut lhs = match p.peek_kind() {
        LEFT_PAREN => {
            let m = p.start();
            p.advance();
            expr(p);
            p.expect(RIGHT_PAREN);
            m.complete(p, PARENTHESIZED_EXPRESSION)
        }
        NAME => {
            let m = p.start();
            p.advance();
            m.complete(p, NAME_EXPRESSION)
        }
        _ => return missing_expr(p),
    };

    loop {
        lhs = match p.peek_kind() {
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                p.expect(NAME);
                m.complete(p, MEMBER_ACCESS_EXPRESSION)
            }
            LEFT_BRACKET => {
                let m = lhs.precede(p);
                p.advance();
                expr(p);
                p.expect(RIGHT_BRACKET);
                m.complete(p, ELEMENT_ACCESS_EXPRESSION)
            }
            COLON => {
                let m = lhs.precede(p);
                p.advance();
                p.expect(NAME);
                function_argument(p);
                m.complete(p, METHOD_CALL_EXPRESSION)
            }
            LEFT_PAREN | STRING | LEFT_BRACE => {
                let ambiguous = p.at(LEFT_PAREN) && p.after_line_break();
                let m = lhs.precede(p);
                function_argument(p);
                let call = m.complete(p, FUNCTION_CALL_EXPRESSION);
                if ambiguous {
                    call.error(p, ErrorCode::AmbiguousFunctionCallOrNewStatement);
                }
                call
            }
            _ => return lhs,
        };
    }
}

/// Stands in for an expression that is not there.
fn missing_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at(EOF) {
        p.missing_with_error(NAME, ErrorCode::ExpressionExpected, Vec::new());
    } else {
        let text = p.peek_text().to_owned();
        p.missing_with_error(NAME, ErrorCode::InvalidExpressionPart, vec![text]);
    }
    m.complete(p, NAME_EXPRESSION)
}

fn function_argument(p: &mut Parser<'_>) {
    let m = p.start();
    match p.peek_kind() {
        STRING => {
            p.advance();
            m.complete(p, STRING_FUNCTION_ARGUMENT);
        }
        LEFT_BRACE => {
            table_constructor(p);
            m.complete(p, TABLE_CONSTRUCTOR_FUNCTION_ARGUMENT);
        }
        _ => {
            delimited(p, (LEFT_PAREN, RIGHT_PAREN), &ARGUMENT_SEPARATOR, &EXPR_FIRST, false, |p| {
                expr(p);
                true
            });
            m.complete(p, EXPRESSION_LIST_FUNCTION_ARGUMENT);
        }
    }
}

fn table_constructor(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    delimited(p, (LEFT_BRACE, RIGHT_BRACE), &FIELD_SEPARATOR, &FIELD_FIRST, true, |p| {
        table_field(p);
        true
    });
    m.complete(p, TABLE_CONSTRUCTOR_EXPRESSION)
}

fn table_field(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(NAME) && p.nth(1) == EQ {
        p.advance();
        p.advance();
        expr(p);
        m.complete(p, IDENTIFIER_KEYED_TABLE_FIELD);
    } else if p.at(LEFT_BRACKET) {
        p.advance();
        expr(p);
        p.expect(RIGHT_BRACKET);
        p.expect(EQ);
        expr(p);
        m.complete(p, EXPRESSION_KEYED_TABLE_FIELD);
    } else {
        expr(p);
        m.complete(p, UNKEYED_TABLE_FIELD);
    }
}
