//! Surface-syntax parsing
//!
//! The grammar (see `grammar.lalrpop`) is the ground-sugar rule form:
//!
//! ```text
//! rule := term ( ':-' term (',' term)* )? '.'
//! term := '~'? identifier (identifier | '?' identifier)*
//! ```
//!
//! Identifiers are `[0-9A-Za-z_]+`, `?name` denotes a logic variable, `#`
//! starts a comment running to end of line, and whitespace is free. Facts
//! are body-less rules.

mod ast;

pub use ast::{RawArg, RawRule, RawTerm};

use crate::error::ParseError;
use std::fmt;

// Lalrpop-generated parser module (generated in OUT_DIR at build time)
#[allow(clippy::all)]
mod grammar {
    #![allow(clippy::all)]
    #![allow(dead_code)]
    #![allow(unused_imports)]
    include!(concat!(env!("OUT_DIR"), "/parse/grammar.rs"));
}

/// Parse a full program into raw rules.
pub fn program(input: &str) -> Result<Vec<RawRule>, ParseError> {
    grammar::ProgramParser::new()
        .parse(input)
        .map_err(from_lalrpop)
}

/// Flatten a lalrpop error into [`ParseError`], keeping the byte position.
fn from_lalrpop<T, E>(err: lalrpop_util::ParseError<usize, T, E>) -> ParseError
where
    T: fmt::Display,
    E: fmt::Display,
{
    use lalrpop_util::ParseError as Lp;
    match err {
        Lp::InvalidToken { location } => ParseError::InvalidSyntax {
            message: "invalid token".to_string(),
            position: Some(location),
        },
        Lp::UnrecognizedEof { location, expected } => ParseError::InvalidSyntax {
            message: format!("unexpected end of input, expected {}", one_of(&expected)),
            position: Some(location),
        },
        Lp::UnrecognizedToken {
            token: (start, tok, _),
            expected,
        } => ParseError::InvalidSyntax {
            message: format!("unexpected token `{}`, expected {}", tok, one_of(&expected)),
            position: Some(start),
        },
        Lp::ExtraToken {
            token: (start, tok, _),
        } => ParseError::InvalidSyntax {
            message: format!("extra token `{}`", tok),
            position: Some(start),
        },
        Lp::User { error } => ParseError::InvalidSyntax {
            message: error.to_string(),
            position: None,
        },
    }
}

fn one_of(expected: &[String]) -> String {
    if expected.is_empty() {
        "nothing".to_string()
    } else {
        expected.join(" or ")
    }
}
