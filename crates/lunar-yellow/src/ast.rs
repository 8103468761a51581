use crate::SyntaxKind::*;
use crate::{NodeOrToken, SyntaxKind, SyntaxNode, SyntaxToken, TokenValue};

pub trait Node<'a>: Copy {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_nodes {
    ($($name:ident = $kind:ident;)*) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> Node<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_nodes! {
    Chunk = CHUNK;
    Block = BLOCK;

    LocalVariableDeclaration = LOCAL_VARIABLE_DECLARATION_STATEMENT;
    LocalDeclarationName = LOCAL_DECLARATION_NAME;
    VariableAttribute = VARIABLE_ATTRIBUTE;
    EqualsValuesClause = EQUALS_VALUES_CLAUSE;
    LocalFunctionDeclaration = LOCAL_FUNCTION_DECLARATION_STATEMENT;
    NumericFor = NUMERIC_FOR_STATEMENT;
    GenericFor = GENERIC_FOR_STATEMENT;
    If = IF_STATEMENT;
    ElseIfClause = ELSE_IF_CLAUSE;
    ElseClause = ELSE_CLAUSE;
    RepeatUntil = REPEAT_UNTIL_STATEMENT;
    While = WHILE_STATEMENT;
    Do = DO_STATEMENT;
    Goto = GOTO_STATEMENT;
    Break = BREAK_STATEMENT;
    Continue = CONTINUE_STATEMENT;
    GotoLabel = GOTO_LABEL_STATEMENT;
    FunctionDeclaration = FUNCTION_DECLARATION_STATEMENT;
    SimpleFunctionName = SIMPLE_FUNCTION_NAME;
    MemberFunctionName = MEMBER_FUNCTION_NAME;
    MethodFunctionName = METHOD_FUNCTION_NAME;
    Return = RETURN_STATEMENT;
    Assignment = ASSIGNMENT_STATEMENT;
    CompoundAssignment = COMPOUND_ASSIGNMENT_STATEMENT;
    ExpressionStatement = EXPRESSION_STATEMENT;
    Empty = EMPTY_STATEMENT;
    ParameterList = PARAMETER_LIST;
    NamedParameter = NAMED_PARAMETER;
    VarargParameter = VARARG_PARAMETER;

    Literal = LITERAL_EXPRESSION;
    Vararg = VARARG_EXPRESSION;
    TableConstructor = TABLE_CONSTRUCTOR_EXPRESSION;
    IdentifierKeyedField = IDENTIFIER_KEYED_TABLE_FIELD;
    ExpressionKeyedField = EXPRESSION_KEYED_TABLE_FIELD;
    UnkeyedField = UNKEYED_TABLE_FIELD;
    AnonymousFunction = ANONYMOUS_FUNCTION_EXPRESSION;
    Parenthesized = PARENTHESIZED_EXPRESSION;
    Name = NAME_EXPRESSION;
    MemberAccess = MEMBER_ACCESS_EXPRESSION;
    ElementAccess = ELEMENT_ACCESS_EXPRESSION;
    MethodCall = METHOD_CALL_EXPRESSION;
    FunctionCall = FUNCTION_CALL_EXPRESSION;
    ExpressionListArgument = EXPRESSION_LIST_FUNCTION_ARGUMENT;
    StringArgument = STRING_FUNCTION_ARGUMENT;
    TableArgument = TABLE_CONSTRUCTOR_FUNCTION_ARGUMENT;
    Unary = UNARY_EXPRESSION;
    Binary = BINARY_EXPRESSION;
}

fn child<'a, N: Node<'a>>(parent: SyntaxNode<'a>) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<'a, N: Node<'a> + 'a>(parent: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

fn token<'a>(parent: SyntaxNode<'a>, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
    tokens(parent).find(|token| token.kind() == kind)
}

fn tokens<'a>(parent: SyntaxNode<'a>) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
    parent.children_with_tokens().filter_map(NodeOrToken::into_token)
}

/// Child expressions split around the first `=` token.
fn split_at_eq<'a>(parent: SyntaxNode<'a>, after: bool) -> impl Iterator<Item = Expr<'a>> + 'a {
    let mut seen_eq = false;
    parent.children_with_tokens().filter_map(move |child| match child {
        NodeOrToken::Token(token) => {
            seen_eq |= token.kind() == EQ;
            None
        }
        NodeOrToken::Node(node) if seen_eq == after => Expr::cast(node),
        NodeOrToken::Node(_) => None,
    })
}

impl<'a> Chunk<'a> {
    pub fn block(self) -> Option<Block<'a>> {
        child(self.0)
    }

    pub fn eof(self) -> Option<SyntaxToken<'a>> {
        token(self.0, EOF)
    }
}

impl<'a> Block<'a> {
    pub fn statements(self) -> impl Iterator<Item = Stmt<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stmt<'a> {
    LocalVariableDeclaration(LocalVariableDeclaration<'a>),
    LocalFunctionDeclaration(LocalFunctionDeclaration<'a>),
    NumericFor(NumericFor<'a>),
    GenericFor(GenericFor<'a>),
    If(If<'a>),
    RepeatUntil(RepeatUntil<'a>),
    While(While<'a>),
    Do(Do<'a>),
    Goto(Goto<'a>),
    Break(Break<'a>),
    Continue(Continue<'a>),
    GotoLabel(GotoLabel<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    Return(Return<'a>),
    Assignment(Assignment<'a>),
    CompoundAssignment(CompoundAssignment<'a>),
    Expression(ExpressionStatement<'a>),
    Empty(Empty<'a>),
}

impl<'a> Node<'a> for Stmt<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        let stmt = match syntax.kind() {
            LOCAL_VARIABLE_DECLARATION_STATEMENT => {
                Stmt::LocalVariableDeclaration(LocalVariableDeclaration(syntax))
            }
            LOCAL_FUNCTION_DECLARATION_STATEMENT => {
                Stmt::LocalFunctionDeclaration(LocalFunctionDeclaration(syntax))
            }
            NUMERIC_FOR_STATEMENT => Stmt::NumericFor(NumericFor(syntax)),
            GENERIC_FOR_STATEMENT => Stmt::GenericFor(GenericFor(syntax)),
            IF_STATEMENT => Stmt::If(If(syntax)),
            REPEAT_UNTIL_STATEMENT => Stmt::RepeatUntil(RepeatUntil(syntax)),
            WHILE_STATEMENT => Stmt::While(While(syntax)),
            DO_STATEMENT => Stmt::Do(Do(syntax)),
            GOTO_STATEMENT => Stmt::Goto(Goto(syntax)),
            BREAK_STATEMENT => Stmt::Break(Break(syntax)),
            CONTINUE_STATEMENT => Stmt::Continue(Continue(syntax)),
            GOTO_LABEL_STATEMENT => Stmt::GotoLabel(GotoLabel(syntax)),
            FUNCTION_DECLARATION_STATEMENT => Stmt::FunctionDeclaration(FunctionDeclaration(syntax)),
            RETURN_STATEMENT => Stmt::Return(Return(syntax)),
            ASSIGNMENT_STATEMENT => Stmt::Assignment(Assignment(syntax)),
            COMPOUND_ASSIGNMENT_STATEMENT => Stmt::CompoundAssignment(CompoundAssignment(syntax)),
            EXPRESSION_STATEMENT => Stmt::Expression(ExpressionStatement(syntax)),
            EMPTY_STATEMENT => Stmt::Empty(Empty(syntax)),
            _ => return None,
        };
        Some(stmt)
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Stmt::LocalVariableDeclaration(it) => it.0,
            Stmt::LocalFunctionDeclaration(it) => it.0,
            Stmt::NumericFor(it) => it.0,
            Stmt::GenericFor(it) => it.0,
            Stmt::If(it) => it.0,
            Stmt::RepeatUntil(it) => it.0,
            Stmt::While(it) => it.0,
            Stmt::Do(it) => it.0,
            Stmt::Goto(it) => it.0,
            Stmt::Break(it) => it.0,
            Stmt::Continue(it) => it.0,
            Stmt::GotoLabel(it) => it.0,
            Stmt::FunctionDeclaration(it) => it.0,
            Stmt::Return(it) => it.0,
            Stmt::Assignment(it) => it.0,
            Stmt::CompoundAssignment(it) => it.0,
            Stmt::Expression(it) => it.0,
            Stmt::Empty(it) => it.0,
        }
    }
}

impl<'a> Stmt<'a> {
    /// The optional `;` that ends most statements.
    pub fn semicolon(self) -> Option<SyntaxToken<'a>> {
        let syntax = self.syntax();
        let last = syntax.child_at(syntax.slot_count().checked_sub(1)?)?;
        last.into_token().filter(|token| token.kind() == SEMICOLON)
    }
}

impl<'a> LocalVariableDeclaration<'a> {
    pub fn names(self) -> impl Iterator<Item = LocalDeclarationName<'a>> + 'a {
        children(self.0)
    }

    pub fn values(self) -> Option<EqualsValuesClause<'a>> {
        child(self.0)
    }
}

impl<'a> LocalDeclarationName<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }

    pub fn attribute(self) -> Option<VariableAttribute<'a>> {
        child(self.0)
    }
}

impl<'a> VariableAttribute<'a> {
    /// `const` or `close`.
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> EqualsValuesClause<'a> {
    pub fn values(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> LocalFunctionDeclaration<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }

    pub fn parameters(self) -> Option<ParameterList<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> NumericFor<'a> {
    pub fn variable(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }

    pub fn start(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn end(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }

    pub fn step(self) -> Option<Expr<'a>> {
        children(self.0).nth(2)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> GenericFor<'a> {
    pub fn variables(self) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
        tokens(self.0).filter(|token| token.kind() == NAME)
    }

    pub fn expressions(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> If<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }

    pub fn else_ifs(self) -> impl Iterator<Item = ElseIfClause<'a>> + 'a {
        children(self.0)
    }

    pub fn else_clause(self) -> Option<ElseClause<'a>> {
        child(self.0)
    }
}

impl<'a> ElseIfClause<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> ElseClause<'a> {
    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> RepeatUntil<'a> {
    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }

    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> While<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> Do<'a> {
    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> Goto<'a> {
    pub fn label(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> GotoLabel<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> FunctionDeclaration<'a> {
    pub fn name(self) -> Option<FunctionName<'a>> {
        child(self.0)
    }

    pub fn parameters(self) -> Option<ParameterList<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

/// `a`, `a.b.c` or `a.b:c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName<'a> {
    Simple(SimpleFunctionName<'a>),
    Member(MemberFunctionName<'a>),
    Method(MethodFunctionName<'a>),
}

impl<'a> Node<'a> for FunctionName<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            SIMPLE_FUNCTION_NAME => Some(Self::Simple(SimpleFunctionName(syntax))),
            MEMBER_FUNCTION_NAME => Some(Self::Member(MemberFunctionName(syntax))),
            METHOD_FUNCTION_NAME => Some(Self::Method(MethodFunctionName(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Self::Simple(it) => it.0,
            Self::Member(it) => it.0,
            Self::Method(it) => it.0,
        }
    }
}

impl<'a> FunctionName<'a> {
    /// The last name in the path.
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.syntax(), NAME)
    }

    pub fn is_method(self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl<'a> SimpleFunctionName<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> MemberFunctionName<'a> {
    pub fn base(self) -> Option<FunctionName<'a>> {
        child(self.0)
    }

    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> MethodFunctionName<'a> {
    pub fn base(self) -> Option<FunctionName<'a>> {
        child(self.0)
    }

    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> Return<'a> {
    pub fn values(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> Assignment<'a> {
    pub fn targets(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        split_at_eq(self.0, false)
    }

    pub fn values(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        split_at_eq(self.0, true)
    }
}

impl<'a> CompoundAssignment<'a> {
    pub fn target(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        tokens(self.0).find(|token| token.kind().is_compound_assignment_operator())
    }

    pub fn value(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }
}

impl<'a> ExpressionStatement<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> ParameterList<'a> {
    pub fn parameters(self) -> impl Iterator<Item = Parameter<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter<'a> {
    Named(NamedParameter<'a>),
    Vararg(VarargParameter<'a>),
}

impl<'a> Node<'a> for Parameter<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            NAMED_PARAMETER => Some(Self::Named(NamedParameter(syntax))),
            VARARG_PARAMETER => Some(Self::Vararg(VarargParameter(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Self::Named(it) => it.0,
            Self::Vararg(it) => it.0,
        }
    }
}

impl<'a> NamedParameter<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expr<'a> {
    Literal(Literal<'a>),
    Vararg(Vararg<'a>),
    TableConstructor(TableConstructor<'a>),
    AnonymousFunction(AnonymousFunction<'a>),
    Parenthesized(Parenthesized<'a>),
    Name(Name<'a>),
    MemberAccess(MemberAccess<'a>),
    ElementAccess(ElementAccess<'a>),
    MethodCall(MethodCall<'a>),
    FunctionCall(FunctionCall<'a>),
    Unary(Unary<'a>),
    Binary(Binary<'a>),
}

impl<'a> Node<'a> for Expr<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        let expr = match syntax.kind() {
            LITERAL_EXPRESSION => Expr::Literal(Literal(syntax)),
            VARARG_EXPRESSION => Expr::Vararg(Vararg(syntax)),
            TABLE_CONSTRUCTOR_EXPRESSION => Expr::TableConstructor(TableConstructor(syntax)),
            ANONYMOUS_FUNCTION_EXPRESSION => Expr::AnonymousFunction(AnonymousFunction(syntax)),
            PARENTHESIZED_EXPRESSION => Expr::Parenthesized(Parenthesized(syntax)),
            NAME_EXPRESSION => Expr::Name(Name(syntax)),
            MEMBER_ACCESS_EXPRESSION => Expr::MemberAccess(MemberAccess(syntax)),
            ELEMENT_ACCESS_EXPRESSION => Expr::ElementAccess(ElementAccess(syntax)),
            METHOD_CALL_EXPRESSION => Expr::MethodCall(MethodCall(syntax)),
            FUNCTION_CALL_EXPRESSION => Expr::FunctionCall(FunctionCall(syntax)),
            UNARY_EXPRESSION => Expr::Unary(Unary(syntax)),
            BINARY_EXPRESSION => Expr::Binary(Binary(syntax)),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Expr::Literal(it) => it.0,
            Expr::Vararg(it) => it.0,
            Expr::TableConstructor(it) => it.0,
            Expr::AnonymousFunction(it) => it.0,
            Expr::Parenthesized(it) => it.0,
            Expr::Name(it) => it.0,
            Expr::MemberAccess(it) => it.0,
            Expr::ElementAccess(it) => it.0,
            Expr::MethodCall(it) => it.0,
            Expr::FunctionCall(it) => it.0,
            Expr::Unary(it) => it.0,
            Expr::Binary(it) => it.0,
        }
    }
}

impl<'a> Literal<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        tokens(self.0).next()
    }

    pub fn value(self) -> Option<&'a TokenValue> {
        self.token().map(SyntaxToken::value)
    }
}

impl<'a> TableConstructor<'a> {
    pub fn fields(self) -> impl Iterator<Item = TableField<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableField<'a> {
    IdentifierKeyed(IdentifierKeyedField<'a>),
    ExpressionKeyed(ExpressionKeyedField<'a>),
    Unkeyed(UnkeyedField<'a>),
}

impl<'a> Node<'a> for TableField<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            IDENTIFIER_KEYED_TABLE_FIELD => Some(Self::IdentifierKeyed(IdentifierKeyedField(syntax))),
            EXPRESSION_KEYED_TABLE_FIELD => Some(Self::ExpressionKeyed(ExpressionKeyedField(syntax))),
            UNKEYED_TABLE_FIELD => Some(Self::Unkeyed(UnkeyedField(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Self::IdentifierKeyed(it) => it.0,
            Self::ExpressionKeyed(it) => it.0,
            Self::Unkeyed(it) => it.0,
        }
    }
}

impl<'a> IdentifierKeyedField<'a> {
    pub fn key(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> ExpressionKeyedField<'a> {
    pub fn key(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn value(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }
}

impl<'a> UnkeyedField<'a> {
    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> AnonymousFunction<'a> {
    pub fn parameters(self) -> Option<ParameterList<'a>> {
        child(self.0)
    }

    pub fn body(self) -> Option<Block<'a>> {
        child(self.0)
    }
}

impl<'a> Parenthesized<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> Name<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> MemberAccess<'a> {
    pub fn base(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn member(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }
}

impl<'a> ElementAccess<'a> {
    pub fn base(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn key(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }
}

impl<'a> MethodCall<'a> {
    pub fn receiver(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn method(self) -> Option<SyntaxToken<'a>> {
        token(self.0, NAME)
    }

    pub fn argument(self) -> Option<FunctionArgument<'a>> {
        child(self.0)
    }
}

impl<'a> FunctionCall<'a> {
    pub fn callee(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn argument(self) -> Option<FunctionArgument<'a>> {
        child(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionArgument<'a> {
    ExpressionList(ExpressionListArgument<'a>),
    String(StringArgument<'a>),
    Table(TableArgument<'a>),
}

impl<'a> Node<'a> for FunctionArgument<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            EXPRESSION_LIST_FUNCTION_ARGUMENT => {
                Some(Self::ExpressionList(ExpressionListArgument(syntax)))
            }
            STRING_FUNCTION_ARGUMENT => Some(Self::String(StringArgument(syntax))),
            TABLE_CONSTRUCTOR_FUNCTION_ARGUMENT => Some(Self::Table(TableArgument(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Self::ExpressionList(it) => it.0,
            Self::String(it) => it.0,
            Self::Table(it) => it.0,
        }
    }
}

impl<'a> ExpressionListArgument<'a> {
    pub fn values(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> StringArgument<'a> {
    pub fn string(self) -> Option<SyntaxToken<'a>> {
        token(self.0, STRING)
    }
}

impl<'a> TableArgument<'a> {
    pub fn table(self) -> Option<TableConstructor<'a>> {
        child(self.0)
    }
}

impl<'a> Unary<'a> {
    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        tokens(self.0).next()
    }

    pub fn operand(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> Binary<'a> {
    pub fn lhs(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        tokens(self.0).next()
    }

    pub fn rhs(self) -> Option<Expr<'a>> {
        children(self.0).nth(1)
    }
}
