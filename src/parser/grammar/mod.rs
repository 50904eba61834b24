//! Grammar for the JavaScript subset
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: identifiers, numbers, strings, booleans and `null`
//! - `expression`: arrow functions, binary operators, calls, objects
//! - `statement`: declarations, function declarations, blocks, returns

mod expression;
mod literal;
mod statement;

use lachs::Span;

use crate::ast::Program;
use crate::lexer::Token;

use super::state::{ParseError, ParseState, Parser};

use statement::statement;

/// Skip past the statement that failed to parse: up to and including the
/// next `;` or closing `}` that is not nested inside it.
fn skip_to_next_statement(state: &mut ParseState) {
    let mut depth = 0usize;
    while let Some(tok) = state.advance() {
        match tok {
            Token::LBrace(_) | Token::LParen(_) => depth += 1,
            Token::RBrace(_) | Token::RParen(_) if depth > 0 => depth -= 1,
            Token::Semicolon(_) | Token::RBrace(_) if depth == 0 => break,
            _ => {}
        }
    }
}

fn empty_span() -> Span {
    Span {
        start: (0, 0),
        end: (0, 0),
        source: String::new(),
    }
}

/// program := statement*
///
/// A statement that fails to parse is reported and skipped so the rest of
/// the program is still checked.
pub fn parse_program(state: &mut ParseState) -> Program {
    let mut body = Vec::new();

    while state.has_next() {
        let pos = state.position();
        match statement().parse(state) {
            Ok(stmt) => body.push(stmt),
            Err(err) => {
                let furthest = state.get_furthest_error().cloned().unwrap_or(err);
                state.collect_error(furthest);
                state.restore(pos);
                skip_to_next_statement(state);
            }
        }
    }

    let position = match (body.first(), body.last()) {
        (Some(first), Some(last)) => first.position().merge(last.position()),
        _ => empty_span(),
    };

    Program {
        body,
        id: state.next_node_id(),
        position,
    }
}

/// Parse a complete program from the token stream.
/// Returns the program along with every collected error; the program is
/// absent only when nothing at all could be parsed from a non-empty input.
pub fn parse(state: &mut ParseState) -> (Option<Program>, Vec<ParseError>) {
    let had_input = state.has_next();
    let program = parse_program(state);
    let errors = state.take_errors();

    if had_input && program.body.is_empty() && !errors.is_empty() {
        (None, errors)
    } else {
        (Some(program), errors)
    }
}
