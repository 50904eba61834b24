//! Expression parsers, from arrow functions down to primaries

use crate::ast::expression::{
    BinOpKind, Binary, Call, Expression, Function, FunctionBody, Ident, Object, Property,
};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, expect_arrow, expect_colon, expect_comma, expect_lparen, expect_rbrace,
    expect_rparen, operator, separated,
};
use crate::parser::state::{ParseResult, ParseState, Parser};

use super::literal::{boolean, ident, null, number, string_literal};
use super::statement::block;

/// expression := arrow | logical_or
pub fn expression() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let pos = state.position();
        if let Ok(arrow) = arrow().parse(state) {
            return Ok(arrow);
        }
        state.restore(pos);
        logical_or().parse(state)
    })
}

/// params := ident | "(" (ident ("," ident)*)? ")"
fn arrow_params() -> BoxedParser<Vec<Ident>> {
    let single = ident() >> |param| vec![param];
    parameter_list() | single
}

/// params := "(" (ident ("," ident)*)? ")"
pub fn parameter_list() -> BoxedParser<Vec<Ident>> {
    expect_lparen() * separated(ident(), expect_comma()) - expect_rparen()
}

/// arrow := params "=>" (block | expression)
pub fn arrow() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = state
            .peek()
            .map(Token::pos)
            .ok_or_else(|| state.error_here("unexpected end of input"))?;
        let params = arrow_params().parse(state)?;
        expect_arrow().parse(state)?;

        let body = if matches!(state.peek(), Some(Token::LBrace(_))) {
            FunctionBody::Block(block().parse(state)?)
        } else {
            FunctionBody::Expression(Box::new(expression().parse(state)?))
        };
        let end = match &body {
            FunctionBody::Block(block) => block.position.clone(),
            FunctionBody::Expression(expr) => expr.position().clone(),
        };

        Ok(Expression::Function(Function {
            name: None,
            params,
            body,
            id: state.next_node_id(),
            position: start.merge(&end),
        }))
    })
}

/// Left-associative chain of `operand (op operand)*`
fn binary_level(
    operand: fn() -> BoxedParser<Expression>,
    select: fn(&Token) -> Option<BinOpKind>,
    expected: &'static str,
) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut left = operand().parse(state)?;
        loop {
            let pos = state.position();
            let Ok(op) = operator(select, expected).parse(state) else {
                state.restore(pos);
                break;
            };
            let right = operand().parse(state)?;
            let position = left.position().merge(right.position());
            left = Expression::Binary(Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                id: state.next_node_id(),
                position,
            });
        }
        Ok(left)
    })
}

/// logical_or := logical_and ("||" logical_and)*
fn logical_or() -> BoxedParser<Expression> {
    binary_level(
        logical_and,
        |tok| matches!(tok, Token::LogicalOr(_)).then_some(BinOpKind::Or),
        "'||'",
    )
}

/// logical_and := equality ("&&" equality)*
fn logical_and() -> BoxedParser<Expression> {
    binary_level(
        equality,
        |tok| matches!(tok, Token::LogicalAnd(_)).then_some(BinOpKind::And),
        "'&&'",
    )
}

fn equality() -> BoxedParser<Expression> {
    binary_level(
        comparison,
        |tok| match tok {
            Token::DoubleEquals(_) => Some(BinOpKind::Eq),
            Token::NotEquals(_) => Some(BinOpKind::NotEq),
            Token::StrictEquals(_) => Some(BinOpKind::StrictEq),
            Token::StrictNotEquals(_) => Some(BinOpKind::StrictNotEq),
            _ => None,
        },
        "equality operator",
    )
}

fn comparison() -> BoxedParser<Expression> {
    binary_level(
        additive,
        |tok| match tok {
            Token::LessThan(_) => Some(BinOpKind::Lt),
            Token::GreaterThan(_) => Some(BinOpKind::Gt),
            Token::LessEquals(_) => Some(BinOpKind::LtEq),
            Token::GreaterEquals(_) => Some(BinOpKind::GtEq),
            _ => None,
        },
        "comparison operator",
    )
}

fn additive() -> BoxedParser<Expression> {
    binary_level(
        multiplicative,
        |tok| match tok {
            Token::Plus(_) => Some(BinOpKind::Add),
            Token::Minus(_) => Some(BinOpKind::Sub),
            _ => None,
        },
        "'+' or '-'",
    )
}

fn multiplicative() -> BoxedParser<Expression> {
    binary_level(
        call,
        |tok| match tok {
            Token::Star(_) => Some(BinOpKind::Mul),
            Token::Slash(_) => Some(BinOpKind::Div),
            _ => None,
        },
        "'*' or '/'",
    )
}

/// call := primary ("(" (expression ("," expression)*)? ")")*
fn call() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut callee = primary().parse(state)?;
        while matches!(state.peek(), Some(Token::LParen(_))) {
            expect_lparen().parse(state)?;
            let args = separated(expression(), expect_comma()).parse(state)?;
            let end = expect_rparen().parse(state)?.pos();
            let position = callee.position().merge(&end);
            callee = Expression::Call(Call {
                callee: Box::new(callee),
                args,
                id: state.next_node_id(),
                position,
            });
        }
        Ok(callee)
    })
}

/// property := ident ":" expression
fn property() -> BoxedParser<Property> {
    BoxedParser::new(|state: &mut ParseState| {
        let key = ident().label("property name").parse(state)?;
        expect_colon().parse(state)?;
        let value = expression().parse(state)?;
        let position = key.position.merge(value.position());
        Ok(Property {
            key,
            value,
            id: state.next_node_id(),
            position,
        })
    })
}

/// object := "{" (property ("," property)*)? "}"
pub fn object() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Expression> {
        let start = match state.peek() {
            Some(Token::LBrace(token)) => token.position.clone(),
            _ => {
                let err = state.error_here("unexpected token").expected("'{'");
                state.record_error(err.clone());
                return Err(err);
            }
        };
        state.advance();
        let properties = separated(property(), expect_comma()).parse(state)?;
        let end = expect_rbrace().parse(state)?.pos();
        Ok(Expression::Object(Object {
            properties,
            id: state.next_node_id(),
            position: start.merge(&end),
        }))
    })
}

/// primary := number | string | boolean | null | ident | object | "(" expression ")"
fn primary() -> BoxedParser<Expression> {
    let number = number() >> Expression::Number;
    let string = string_literal() >> Expression::String;
    let boolean = boolean() >> Expression::Boolean;
    let null = null() >> Expression::Null;
    let ident = ident() >> Expression::Ident;
    let grouped = expect_lparen() * expression() - expect_rparen();

    (number | string | boolean | null | ident | object() | grouped).label("expression")
}
