//! # tyscript - Hindley-Milner inference for a functional JavaScript subset
//!
//! tyscript infers static types for programs written in a small, functional
//! slice of JavaScript: `const`/`let`/`var` declarations, arrow functions,
//! function declarations, calls, object literals, binary operators and
//! literals. No annotations are needed; types come from use.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [strip_comments] → same text, comments blanked out
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → AST (ast::Program), every node carrying a NodeId and a Span
//!     ↓
//! [Inference] → types::Inference (one cached result per visited node)
//! ```
//!
//! ## Type Errors Are Values
//!
//! Inference never stops at the first mismatch. A failed unification binds
//! the offending type to an `Err` type recording what was expected and what
//! was found, and the walk carries on. Every node whose type is an error is
//! reported afterwards by [`types::Inference::type_errors`]. Only programs the
//! engine cannot handle at all (an undefined identifier, a node kind without
//! a rule) end the pass with a [`types::EngineError`].
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokenization using lachs, plus comment stripping
//! - [`parser`] - Parsing using combinator-based grammar
//! - [`ast`] - Syntax tree definitions and the uniform [`ast::Node`] view
//! - [`types`] - Types, substitutions, unification, schemes and the engine
//!
//! ## Example
//!
//! ```no_run
//! let checked = tyscript::check_source("const id = x => x; const n = id(1);")?;
//! let n = checked.inference.binding("n").map(tyscript::types::pretty);
//! assert_eq!(n.as_deref(), Some("int"));
//! # Ok::<(), tyscript::CheckError>(())
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod types;

use thiserror::Error;
use log::debug;

use ast::Program;
use lexer::Token;
use parser::{ParseError, ParseState};
use types::{EngineError, Inference};

/// Why a source text could not be checked.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("lexing failed: {0}")]
    Lex(String),

    #[error("{}", render_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn render_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A parsed program together with everything inference learned about it.
#[derive(Debug)]
pub struct Checked {
    pub program: Program,
    pub inference: Inference,
}

/// Lex `source` with comments removed.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CheckError> {
    let stripped = lexer::strip_comments(source);
    Token::lex(&stripped).map_err(|err| CheckError::Lex(err.to_string()))
}

/// Lex and parse `source`. Any parse error fails the whole program.
pub fn parse_source(source: &str) -> Result<Program, CheckError> {
    let tokens = tokenize(source)?;
    debug!("lexed {} tokens", tokens.len());

    let mut state = ParseState::new(tokens);
    match parser::parse(&mut state) {
        (Some(program), errors) if errors.is_empty() => Ok(program),
        (_, errors) => Err(CheckError::Parse(errors)),
    }
}

/// Parse `source` and run inference over the whole program.
pub fn check_source(source: &str) -> Result<Checked, CheckError> {
    let program = parse_source(source)?;
    let inference = types::infer(&program)?;
    Ok(Checked { program, inference })
}
