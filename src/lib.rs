//! # tml
//!
//! A bottom-up evaluator for datalog with negation under **partial
//! fixed-point (PFP) semantics**, with relations represented symbolically as
//! **binary decision diagrams**.
//!
//! ## Overview
//!
//! A program is a set of facts and rules over a single padded relation
//! space. Every identifier is interned to a small integer and every tuple is
//! bit-packed into boolean variables, so the whole database is one BDD and
//! rule application is a handful of BDD operations: selection, equality
//! joins, existential quantification, variable renaming and projection.
//!
//! Evaluation repeats synchronous steps. Each step fires every rule against
//! the current database, collects added and deleted tuple sets, and commits
//! `new_db = (db \ del) | (add \ del)`. The run ends when a step changes
//! nothing (**SAT**) or when a previously seen non-fixed database recurs
//! (**UNSAT**, oscillation).
//!
//! ## Quick start
//!
//! ```
//! use tml::{Outcome, Program};
//!
//! let src = "
//!     e 1 2. e 2 3. e 3 4.
//!     t ?x ?y :- e ?x ?y.
//!     t ?x ?z :- e ?x ?y, t ?y ?z.
//! ";
//! let mut p = Program::parse(src).unwrap();
//! assert_eq!(p.pfp(), Outcome::Sat);
//!
//! let mut out = Vec::new();
//! p.dump(&mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("t 1 4"));
//! ```
//!
//! ## Surface syntax
//!
//! ```text
//! rule := term ( ':-' term (',' term)* )? '.'
//! term := '~'? identifier (identifier | '?' identifier)*
//! ```
//!
//! `?name` is a logic variable, `~` negates a term (a negated body is
//! negation as failure, a negated head deletes), `#` starts a comment.
//! Facts have no body.
//!
//! ## Modules
//!
//! - [`bdd`]: the hash-consed BDD store and its operations
//! - [`dict`]: identifier interning
//! - [`parse`]: the surface-syntax parser
//! - [`rule`]: rule compilation and firing
//! - [`prog`]: the program driver
//!
//! The library logs through [`tracing`]; install a subscriber to see
//! per-step diagnostics.

pub mod bdd;
pub mod dict;
pub mod error;
pub mod parse;
pub mod prog;
pub mod rule;

pub use dict::{Dict, Matrix, SymId, Term};
pub use error::{CompileError, ParseError, ProgramError};
pub use prog::{Options, Outcome, Program};
pub use rule::ProofMatrices;
