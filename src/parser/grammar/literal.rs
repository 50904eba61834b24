//! Literal parsers: identifiers, numbers, strings, booleans and `null`

use crate::ast::expression::{Boolean, Ident, Null, Number, StringLiteral};
use crate::lexer::Token;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseResult, ParseState};

fn unexpected(state: &mut ParseState, expected: &'static str) -> ParseError {
    let err = match state.peek() {
        Some(tok) => ParseError::new("unexpected token")
            .expected(expected)
            .found(tok.describe())
            .at(tok.pos()),
        None => ParseError::new("unexpected end of input").expected(expected),
    };
    state.record_error(err.clone());
    err
}

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Ident> {
        let Some(Token::Ident(_)) = state.peek() else {
            return Err(unexpected(state, "identifier"));
        };
        let Some(Token::Ident(token)) = state.advance() else {
            return Err(unexpected(state, "identifier"));
        };
        Ok(Ident {
            value: token.value,
            id: state.next_node_id(),
            position: token.position,
        })
    })
}

/// Parse an integer literal. Literals outside the `i64` range are rejected.
pub fn number() -> BoxedParser<Number> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Number> {
        let Some(Token::Integer(_)) = state.peek() else {
            return Err(unexpected(state, "number"));
        };
        let Some(Token::Integer(token)) = state.advance() else {
            return Err(unexpected(state, "number"));
        };
        let value = token.value.parse::<i64>().map_err(|_| {
            ParseError::new("integer literal out of range")
                .found(token.value.clone())
                .at(token.position.clone())
        })?;
        Ok(Number {
            value,
            id: state.next_node_id(),
            position: token.position,
        })
    })
}

/// Parse a single or double quoted string. The quotes are not part of the value.
pub fn string_literal() -> BoxedParser<StringLiteral> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<StringLiteral> {
        let Some(Token::StringLiteral(_)) = state.peek() else {
            return Err(unexpected(state, "string"));
        };
        let Some(Token::StringLiteral(token)) = state.advance() else {
            return Err(unexpected(state, "string"));
        };
        let raw = token.value.as_str();
        let value = raw
            .get(1..raw.len().saturating_sub(1))
            .unwrap_or_default()
            .to_string();
        Ok(StringLiteral {
            value,
            id: state.next_node_id(),
            position: token.position,
        })
    })
}

/// Parse `true` or `false`
pub fn boolean() -> BoxedParser<Boolean> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Boolean> {
        let (value, position) = match state.peek() {
            Some(Token::True(token)) => (true, token.position.clone()),
            Some(Token::False(token)) => (false, token.position.clone()),
            _ => return Err(unexpected(state, "boolean")),
        };
        state.advance();
        Ok(Boolean {
            value,
            id: state.next_node_id(),
            position,
        })
    })
}

pub fn null() -> BoxedParser<Null> {
    BoxedParser::new(|state: &mut ParseState| -> ParseResult<Null> {
        let Some(Token::Null(token)) = state.peek() else {
            return Err(unexpected(state, "'null'"));
        };
        let position = token.position.clone();
        state.advance();
        Ok(Null {
            id: state.next_node_id(),
            position,
        })
    })
}
