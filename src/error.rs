//! Error types for program loading
//!
//! Each failure source has its own enum; [`ProgramError`] combines the ones
//! that can surface from loading a program. Everything converts into
//! `io::Error` so callers that only deal in IO errors can use `?` freely.

use std::fmt;
use std::io;

/// Errors produced by the surface-syntax parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not match the grammar
    InvalidSyntax {
        /// Human-readable description from the parser
        message: String,
        /// Byte offset into the source, when known
        position: Option<usize>,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSyntax { message, position } => {
                if let Some(pos) = position {
                    write!(f, "Failed to parse program at byte {}: {}", pos, message)
                } else {
                    write!(f, "Failed to parse program: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// Errors produced while compiling parsed rules into BDD form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Proof matrices were requested for a rule with a negated head or body
    ProofWithNegation,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::ProofWithNegation => write!(
                f,
                "proof extraction is unsupported for rules with negation or deletion"
            ),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<CompileError> for io::Error {
    fn from(err: CompileError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Errors that can occur when loading a program
///
/// Returned by `Program::parse` and `Program::parse_with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Surface-syntax error
    Parse(ParseError),
    /// Rule compilation error
    Compile(CompileError),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Parse(e) => write!(f, "{}", e),
            ProgramError::Compile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Parse(e) => Some(e),
            ProgramError::Compile(e) => Some(e),
        }
    }
}

impl From<ParseError> for ProgramError {
    fn from(err: ParseError) -> Self {
        ProgramError::Parse(err)
    }
}

impl From<CompileError> for ProgramError {
    fn from(err: CompileError) -> Self {
        ProgramError::Compile(err)
    }
}

impl From<ProgramError> for io::Error {
    fn from(err: ProgramError) -> Self {
        match err {
            ProgramError::Parse(e) => e.into(),
            ProgramError::Compile(e) => e.into(),
        }
    }
}
