//! Statement parsers: declarations, function declarations, blocks, returns

use lachs::Span;

use crate::ast::expression::{Function, FunctionBody};
use crate::ast::statement::{
    Block, DeclarationKind, ExpressionStatement, ReturnStatement, Statement, VariableDeclaration,
    VariableDeclarator,
};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, expect_comma, expect_equals, expect_function, expect_lbrace, expect_rbrace,
    expect_return, expect_semicolon, many, optional,
};
use crate::parser::state::{ParseResult, ParseState, Parser};

use super::expression::{expression, parameter_list};
use super::literal::ident;

/// Consume a trailing `;` if there is one, widening `position` over it.
fn terminated(state: &mut ParseState, position: Span) -> ParseResult<Span> {
    Ok(match optional(expect_semicolon()).parse(state)? {
        Some(semicolon) => position.merge(&semicolon.pos()),
        None => position,
    })
}

/// declarator := ident ("=" expression)?
fn declarator() -> BoxedParser<VariableDeclarator> {
    BoxedParser::new(|state: &mut ParseState| {
        let name = ident().label("variable name").parse(state)?;
        let init = optional(expect_equals() * expression()).parse(state)?;
        let position = match &init {
            Some(init) => name.position.merge(init.position()),
            None => name.position.clone(),
        };
        Ok(VariableDeclarator {
            name,
            init,
            id: state.next_node_id(),
            position,
        })
    })
}

/// declaration := ("const" | "let" | "var") declarator ("," declarator)* ";"?
pub fn declaration() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let (kind, start) = match state.peek() {
            Some(Token::Const(token)) => (DeclarationKind::Const, token.position.clone()),
            Some(Token::Let(token)) => (DeclarationKind::Let, token.position.clone()),
            Some(Token::Var(token)) => (DeclarationKind::Var, token.position.clone()),
            _ => {
                let err = state
                    .error_here("unexpected token")
                    .expected("'const', 'let' or 'var'");
                state.record_error(err.clone());
                return Err(err);
            }
        };
        state.advance();

        let first = declarator().parse(state)?;
        let rest = many(expect_comma() * declarator()).parse(state)?;
        let mut declarators = vec![first];
        declarators.extend(rest);

        let last = declarators
            .last()
            .map(|declarator| declarator.position.clone())
            .unwrap_or_else(|| start.clone());
        let position = terminated(state, start.merge(&last))?;

        Ok(Statement::Declaration(VariableDeclaration {
            kind,
            declarators,
            id: state.next_node_id(),
            position,
        }))
    })
}

/// function_declaration := "function" ident "(" params ")" block
pub fn function_declaration() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_function().parse(state)?.pos();
        let name = ident().label("function name").parse(state)?;
        let params = parameter_list().parse(state)?;
        let body = block().parse(state)?;
        let position = start.merge(&body.position);

        Ok(Statement::Function(Function {
            name: Some(name),
            params,
            body: FunctionBody::Block(body),
            id: state.next_node_id(),
            position,
        }))
    })
}

/// return := "return" expression? ";"?
pub fn return_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_return().parse(state)?.pos();
        let argument = optional(expression()).parse(state)?;
        let end = match &argument {
            Some(argument) => start.merge(argument.position()),
            None => start,
        };
        let position = terminated(state, end)?;

        Ok(Statement::Return(ReturnStatement {
            argument,
            id: state.next_node_id(),
            position,
        }))
    })
}

/// block := "{" statement* "}"
pub fn block() -> BoxedParser<Block> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lbrace().parse(state)?.pos();
        let body = many(statement()).parse(state)?;
        let end = expect_rbrace().parse(state)?.pos();

        Ok(Block {
            body,
            id: state.next_node_id(),
            position: start.merge(&end),
        })
    })
}

/// expression_statement := expression ";"?
fn expression_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let expression = expression().parse(state)?;
        let position = terminated(state, expression.position().clone())?;

        Ok(Statement::Expression(ExpressionStatement {
            expression,
            id: state.next_node_id(),
            position,
        }))
    })
}

/// statement := declaration | function_declaration | return | block | expression_statement
///
/// The leading token decides; a `{` at statement level always opens a block.
pub fn statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Const(_) | Token::Let(_) | Token::Var(_)) => declaration().parse(state),
        Some(Token::Function(_)) => function_declaration().parse(state),
        Some(Token::Return(_)) => return_statement().parse(state),
        Some(Token::LBrace(_)) => block().parse(state).map(Statement::Block),
        _ => expression_statement().parse(state),
    })
}
