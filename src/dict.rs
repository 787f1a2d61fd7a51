//! Symbol dictionary: identifiers as small integers
//!
//! Every identifier in a program is represented by one signed integer.
//! Interned constants get dense non-negative ids; logic variables get
//! negative ids, distinct across the whole program. Id `0` is the padding
//! symbol used to extend every term to the program-wide maximum arity.
//!
//! A handful of constants are reserved at construction and never reclaimed:
//! the padding symbol (printed `*`), the parenthesis symbols framing proof
//! matrices, and `null`.

use lasso::{Key, Rodeo, Spur};

/// Identifier: non-negative for interned constants, negative for variables.
pub type SymId = i32;

/// A term: sign (`+1`/`-1`) followed by argument identifiers, the relation
/// symbol first among them.
pub type Term = Vec<SymId>;

/// A rule as a matrix of terms, head first. A single-term matrix is a fact.
pub type Matrix = Vec<Term>;

/// The padding symbol
pub const PAD: SymId = 0;

/// Opening parenthesis, reserved for proof encoding
pub const OPEN_PAREN: SymId = 1;

/// Closing parenthesis, reserved for proof encoding
pub const CLOSE_PAREN: SymId = 2;

/// The reserved `null` constant
pub const NULL: SymId = 3;

/// Bijection between source identifiers and dense integer ids.
///
/// Created before parsing; the core never mutates it after program load.
/// Lookups are idempotent: interning the same spelling twice yields the same
/// id.
#[derive(Debug)]
pub struct Dict {
    syms: Rodeo,
    vars: Rodeo,
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

impl Dict {
    /// A dictionary holding only the reserved constants.
    pub fn new() -> Self {
        let mut syms = Rodeo::default();
        syms.get_or_intern("*");
        syms.get_or_intern("(");
        syms.get_or_intern(")");
        syms.get_or_intern("null");
        Dict {
            syms,
            vars: Rodeo::default(),
        }
    }

    /// Intern a constant, returning its non-negative id.
    pub fn sym(&mut self, name: &str) -> SymId {
        self.syms.get_or_intern(name).into_usize() as SymId
    }

    /// Intern a variable, returning its negative id.
    pub fn var(&mut self, name: &str) -> SymId {
        -(self.vars.get_or_intern(name).into_usize() as SymId) - 1
    }

    /// The spelling of a constant id, if interned.
    pub fn sym_name(&self, id: SymId) -> Option<&str> {
        if id < 0 {
            return None;
        }
        Spur::try_from_usize(id as usize).and_then(|k| self.syms.try_resolve(&k))
    }

    /// The spelling of a variable id, if interned.
    pub fn var_name(&self, id: SymId) -> Option<&str> {
        if id >= 0 {
            return None;
        }
        Spur::try_from_usize((-id - 1) as usize).and_then(|k| self.vars.try_resolve(&k))
    }

    /// Number of interned constants, reserved ones included.
    pub fn nsyms(&self) -> usize {
        self.syms.len()
    }

    /// Bits per argument: `ceil(log2(nsyms)) + 1`.
    pub fn bits(&self) -> usize {
        let n = self.nsyms();
        let ceil_log2 = if n <= 1 {
            0
        } else {
            (n - 1).ilog2() as usize + 1
        };
        ceil_log2 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ids_are_stable() {
        let d = Dict::new();
        assert_eq!(d.sym_name(PAD), Some("*"));
        assert_eq!(d.sym_name(OPEN_PAREN), Some("("));
        assert_eq!(d.sym_name(CLOSE_PAREN), Some(")"));
        assert_eq!(d.sym_name(NULL), Some("null"));
        assert_eq!(d.nsyms(), 4);
    }

    #[test]
    fn constants_are_dense_and_idempotent() {
        let mut d = Dict::new();
        let e = d.sym("e");
        let one = d.sym("1");
        assert_eq!(e, 4);
        assert_eq!(one, 5);
        assert_eq!(d.sym("e"), e);
        assert_eq!(d.sym_name(e), Some("e"));
        assert_eq!(d.nsyms(), 6);
    }

    #[test]
    fn variables_are_negative_and_distinct() {
        let mut d = Dict::new();
        let x = d.var("x");
        let y = d.var("y");
        assert_eq!(x, -1);
        assert_eq!(y, -2);
        assert_eq!(d.var("x"), x);
        assert_eq!(d.var_name(x), Some("x"));
        assert_eq!(d.sym_name(x), None);
    }

    #[test]
    fn bits_covers_the_universe() {
        let mut d = Dict::new();
        assert_eq!(d.bits(), 3); // 4 symbols
        for i in 0..5 {
            d.sym(&format!("s{i}"));
        }
        assert_eq!(d.nsyms(), 9);
        assert_eq!(d.bits(), 5); // ceil(log2(9)) + 1
        assert!((1usize << d.bits()) >= d.nsyms());
    }
}
