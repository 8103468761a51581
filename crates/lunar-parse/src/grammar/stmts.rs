use lunar_errors::ErrorCode;
use lunar_inputs::ContinueType;
use lunar_yellow::SyntaxKind::{self, *};
use lunar_yellow::SyntaxSet;

use super::exprs::{expr_list, prefix_expr};
use super::{ARGUMENT_SEPARATOR, BLOCK_END, block, body, delimited, expr};
use crate::parser::{CompletedMarker, Parser};

/// Tokens after which a contextual `continue` is still an identifier.
const CONTINUE_AS_NAME: SyntaxSet = SyntaxSet::new([
    DOT,
    LEFT_BRACKET,
    COLON,
    LEFT_PAREN,
    STRING,
    LEFT_BRACE,
    EQ,
    COMMA,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    CARET_EQ,
    DOT_DOT_EQ,
]);

const PARAMETER_FIRST: SyntaxSet = SyntaxSet::new([NAME, DOT_DOT_DOT]);

pub(super) fn stmt(p: &mut Parser<'_>) {
    if !p.enter() {
        p.skip(ErrorCode::InsufficientStack, Vec::new());
        return;
    }

    match p.peek_kind() {
        LOCAL_KW if p.nth(1) == FUNCTION_KW => local_function(p),
        LOCAL_KW => local_variables(p),
        FOR_KW if p.nth(2) == EQ => numeric_for(p),
        FOR_KW => generic_for(p),
        IF_KW => if_(p),
        REPEAT_KW => repeat_until(p),
        WHILE_KW => while_(p),
        DO_KW => do_(p),
        GOTO_KW => goto(p),
        BREAK_KW => keyword_stmt(p, BREAK_STATEMENT),
        CONTINUE_KW => keyword_stmt(p, CONTINUE_STATEMENT),
        COLON_COLON => label(p),
        FUNCTION_KW => function_declaration(p),
        RETURN_KW => return_(p),
        SEMICOLON => empty(p),
        NAME if at_contextual_continue(p) => {
            let m = p.start();
            p.advance_as(CONTINUE_KW);
            p.eat_semicolon();
            m.complete(p, CONTINUE_STATEMENT);
        }
        _ => expr_or_assignment(p),
    }

    p.leave();
}

fn at_contextual_continue(p: &mut Parser<'_>) -> bool {
    p.options().continue_type == ContinueType::ContextualKeyword
        && p.peek_text() == "continue"
        && !CONTINUE_AS_NAME.contains(p.nth(1))
}

fn local_function(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.advance();
    p.expect(NAME);
    parameter_list(p);
    body(p);
    p.eat_semicolon();
    m.complete(p, LOCAL_FUNCTION_DECLARATION_STATEMENT);
}

fn local_variables(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    loop {
        local_name(p);
        if !p.eat(COMMA) {
            break;
        }
    }

    if p.at(EQ) {
        let values = p.start();
        p.advance();
        expr_list(p);
        values.complete(p, EQUALS_VALUES_CLAUSE);
    } else {
        p.absent();
    }

    p.eat_semicolon();
    m.complete(p, LOCAL_VARIABLE_DECLARATION_STATEMENT);
}

fn local_name(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(NAME);

    if p.at(LT) {
        let attribute = p.start();
        p.advance();
        p.expect(NAME);
        p.expect(GT);
        let attribute = attribute.complete(p, VARIABLE_ATTRIBUTE);
        if !p.options().accept_local_variable_attributes {
            attribute.error(p, ErrorCode::LocalVariableAttributesNotSupportedInVersion);
        }
    } else {
        p.absent();
    }

    m.complete(p, LOCAL_DECLARATION_NAME);
}

fn numeric_for(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.expect(NAME);
    p.expect(EQ);
    expr(p);
    p.expect(COMMA);
    expr(p);

    if p.eat(COMMA) {
        expr(p);
    } else {
        p.absent();
        p.absent();
    }

    p.expect(DO_KW);
    body(p);
    p.eat_semicolon();
    m.complete(p, NUMERIC_FOR_STATEMENT);
}

fn generic_for(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    p.expect(NAME);
    while p.eat(COMMA) {
        p.expect(NAME);
    }

    p.expect(IN_KW);
    expr_list(p);
    p.expect(DO_KW);
    body(p);
    p.eat_semicolon();
    m.complete(p, GENERIC_FOR_STATEMENT);
}

fn if_(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    expr(p);
    p.expect(THEN_KW);
    block(p, &BLOCK_END);

    while p.at(ELSEIF_KW) {
        let clause = p.start();
        p.advance();
        expr(p);
        p.expect(THEN_KW);
        block(p, &BLOCK_END);
        clause.complete(p, ELSE_IF_CLAUSE);
    }

    if p.at(ELSE_KW) {
        let clause = p.start();
        p.advance();
        block(p, &BLOCK_END);
        clause.complete(p, ELSE_CLAUSE);
    } else {
        p.absent();
    }

    p.expect(END_KW);
    p.eat_semicolon();
    m.complete(p, IF_STATEMENT);
}

fn repeat_until(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    block(p, &BLOCK_END);
    p.expect(UNTIL_KW);
    expr(p);
    p.eat_semicolon();
    m.complete(p, REPEAT_UNTIL_STATEMENT);
}

fn while_(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    expr(p);
    p.expect(DO_KW);
    body(p);
    p.eat_semicolon();
    m.complete(p, WHILE_STATEMENT);
}

fn do_(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    body(p);
    p.eat_semicolon();
    m.complete(p, DO_STATEMENT);
}

fn goto(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.expect(NAME);
    p.eat_semicolon();
    m.complete(p, GOTO_STATEMENT);
}

fn keyword_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    p.eat_semicolon();
    m.complete(p, kind);
}

fn label(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.expect(NAME);
    p.expect(COLON_COLON);
    p.eat_semicolon();
    let label = m.complete(p, GOTO_LABEL_STATEMENT);
    if !p.options().accept_goto {
        label.error(p, ErrorCode::GotoNotSupportedInVersion);
    }
}

fn function_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    function_name(p);
    parameter_list(p);
    body(p);
    p.eat_semicolon();
    m.complete(p, FUNCTION_DECLARATION_STATEMENT);
}

/// `a.b.c:d`, nested left to right.
fn function_name(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(NAME);
    let mut name = m.complete(p, SIMPLE_FUNCTION_NAME);

    while p.at(DOT) {
        let m = name.precede(p);
        p.advance();
        p.expect(NAME);
        name = m.complete(p, MEMBER_FUNCTION_NAME);
    }

    if p.at(COLON) {
        let m = name.precede(p);
        p.advance();
        p.expect(NAME);
        m.complete(p, METHOD_FUNCTION_NAME);
    }
}

fn return_(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if !p.at_set(&BLOCK_END) && !p.at(EOF) && !p.at(SEMICOLON) {
        expr_list(p);
    }
    p.eat_semicolon();
    m.complete(p, RETURN_STATEMENT);
}

fn empty(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    let empty = m.complete(p, EMPTY_STATEMENT);
    if !p.options().accept_empty_statements {
        empty.error(p, ErrorCode::EmptyStatementsNotSupportedInVersion);
    }
}

fn expr_or_assignment(p: &mut Parser<'_>) {
    if !p.at(NAME) && !p.at(LEFT_PAREN) {
        p.skip(ErrorCode::InvalidStatement, vec![p.peek_text().to_owned()]);
        return;
    }

    let target = prefix_expr(p);
    match p.peek_kind() {
        COMMA | EQ => assignment(p, target),
        kind if kind.is_compound_assignment_operator() => compound_assignment(p, target),
        _ => {
            let m = target.precede(p);
            p.eat_semicolon();
            let stmt = m.complete(p, EXPRESSION_STATEMENT);
            if !matches!(target.kind(), FUNCTION_CALL_EXPRESSION | METHOD_CALL_EXPRESSION) {
                stmt.error(p, ErrorCode::NonFunctionCallBeingUsedAsStatement);
            }
        }
    }
}

fn assignable(p: &mut Parser<'_>, target: CompletedMarker) {
    if !target.kind().is_variable_expression() {
        target.error(p, ErrorCode::CannotBeAssignedTo);
    }
}

fn assignment(p: &mut Parser<'_>, target: CompletedMarker) {
    assignable(p, target);
    let m = target.precede(p);

    while p.eat(COMMA) {
        let target = prefix_expr(p);
        assignable(p, target);
    }

    p.expect(EQ);
    expr_list(p);
    p.eat_semicolon();
    m.complete(p, ASSIGNMENT_STATEMENT);
}

fn compound_assignment(p: &mut Parser<'_>, target: CompletedMarker) {
    assignable(p, target);
    let m = target.precede(p);
    p.advance();
    expr(p);
    p.eat_semicolon();
    let stmt = m.complete(p, COMPOUND_ASSIGNMENT_STATEMENT);
    if !p.options().accept_compound_assignment {
        stmt.error(p, ErrorCode::CompoundAssignmentNotSupportedInLuaVersion);
    }
}

pub(super) fn parameter_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, (LEFT_PAREN, RIGHT_PAREN), &ARGUMENT_SEPARATOR, &PARAMETER_FIRST, false, |p| {
        let parameter = p.start();
        if p.at(DOT_DOT_DOT) {
            p.advance();
            parameter.complete(p, VARARG_PARAMETER);
            return false;
        }

        p.expect(NAME);
        parameter.complete(p, NAMED_PARAMETER);
        true
    });
    m.complete(p, PARAMETER_LIST);
}
