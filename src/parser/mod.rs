mod combinators;
mod grammar;
mod state;

pub use combinators::{BoxedParser, many, optional, separated};
pub use grammar::{parse, parse_program};
pub use state::{ParseError, ParseResult, ParseState, Parser};
