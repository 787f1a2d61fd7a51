//! Logic programs and the partial-fixed-point driver
//!
//! A [`Program`] owns the symbol dictionary, the BDD store, the compiled
//! rules and the database root. Loading a program interns every identifier,
//! pads all terms to the maximum arity, seeds the database from the facts
//! and compiles the remaining matrices. Evaluation then repeats
//! [`Program::step`] until either a fixed point is reached
//! ([`Outcome::Sat`]) or a previously seen non-fixed database recurs
//! ([`Outcome::Unsat`]).
//!
//! # Examples
//!
//! ```
//! use tml::{Outcome, Program};
//!
//! let mut p = Program::parse("e 1 2. e 2 3. t ?x ?y :- e ?x ?y. t ?x ?z :- e ?x ?y, t ?y ?z.")
//!     .unwrap();
//! assert_eq!(p.pfp(), Outcome::Sat);
//! let mut out = Vec::new();
//! p.dump(&mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("t 1 3"));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::io;

use tracing::{debug, trace};

use crate::bdd::{BddStore, NodeId, F};
use crate::dict::{Dict, Matrix, SymId, Term, PAD};
use crate::error::ProgramError;
use crate::parse::{self, RawArg, RawRule};
use crate::rule::{self, ProofMatrices, Rule, StepCache};

/// Program-load options
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Build proof matrices and record firing roots per rule. Rejected for
    /// programs whose rules use negation.
    pub proof: bool,
}

/// How a PFP run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A true fixed point was reached
    Sat,
    /// The same non-fixed database recurred (oscillation)
    Unsat,
    /// The step limit or break predicate stopped the run
    Interrupted,
}

/// A loaded logic program with its database
#[derive(Debug)]
pub struct Program {
    dict: Dict,
    store: BddStore,
    rules: Vec<Rule>,
    /// recorded pre-projection firing roots, per rule, when proofs are on
    proof_roots: Vec<BTreeSet<NodeId>>,
    db: NodeId,
    bits: usize,
    ar: usize,
    steps: usize,
    contradiction: bool,
    record_proofs: bool,
}

impl Program {
    /// Load a program from source text.
    pub fn parse(source: &str) -> Result<Program, ProgramError> {
        Self::parse_with(source, Options::default())
    }

    /// Load a program with explicit [`Options`].
    pub fn parse_with(source: &str, opts: Options) -> Result<Program, ProgramError> {
        let raw = parse::program(source)?;
        let mut dict = Dict::new();
        let mut matrices: Vec<Matrix> = Vec::with_capacity(raw.len());
        let mut ar = 0;
        for rr in &raw {
            matrices.push(intern_rule(&mut dict, rr, &mut ar));
        }
        for mat in &mut matrices {
            for t in mat.iter_mut() {
                t.resize(ar + 1, PAD);
            }
        }
        let bits = dict.bits();
        let dsz = dict.nsyms();
        debug!(rules = matrices.len(), ar, bits, dsz, "program read");

        let mut store = BddStore::new();
        let mut db = F;
        let mut rules = Vec::new();
        for mat in matrices {
            if mat.len() == 1 {
                let (neg, r) = rule::fact(&mut store, &mat[0], bits);
                db = if neg {
                    store.and_not(db, r)
                } else {
                    store.or(db, r)
                };
            } else {
                rules.push(Rule::compile(&mut store, mat, bits, dsz, opts.proof)?);
            }
        }
        let proof_roots = vec![BTreeSet::new(); rules.len()];
        Ok(Program {
            dict,
            store,
            rules,
            proof_roots,
            db,
            bits,
            ar,
            steps: 0,
            contradiction: false,
            record_proofs: opts.proof,
        })
    }

    /// One PFP step: fire every rule against the current database, then
    /// commit `new_db = (db \ del) | (add \ del)`. A step whose additions
    /// are entirely deleted again records a contradiction and clears the
    /// database.
    pub fn step(&mut self) {
        let mut cache = StepCache::new();
        let (mut add, mut del) = (F, F);
        for i in 0..self.rules.len() {
            let (z, vars) =
                self.rules[i].fire(&mut self.store, self.db, &mut cache, self.bits, self.ar);
            let fired = z != F;
            trace!(rule = i, fired, "rule evaluated");
            if self.record_proofs && vars != F {
                self.proof_roots[i].insert(vars);
            }
            let neg = self.rules[i].neg;
            let tgt = if neg { del } else { add };
            let merged = self.store.or(tgt, z);
            if neg {
                del = merged;
            } else {
                add = merged;
            }
        }
        let surviving = self.store.and_not(add, del);
        if surviving == F && add != F {
            debug!("contradictory step, clearing database");
            self.contradiction = true;
            self.db = F;
        } else {
            let kept = self.store.and_not(self.db, del);
            self.db = self.store.or(kept, surviving);
        }
        self.steps += 1;
    }

    /// Run to completion: SAT on a fixed point, UNSAT on oscillation.
    pub fn pfp(&mut self) -> Outcome {
        self.pfp_with(None, |_| false)
    }

    /// Run with an optional step limit and a break predicate consulted at
    /// step boundaries (given the number of completed steps). Either
    /// trigger ends the run with [`Outcome::Interrupted`].
    pub fn pfp_with<B>(&mut self, limit: Option<usize>, mut break_on: B) -> Outcome
    where
        B: FnMut(usize) -> bool,
    {
        let mut seen: HashSet<NodeId> = HashSet::new();
        loop {
            let prev = self.db;
            seen.insert(prev);
            debug!(
                step = self.steps + 1,
                nodes = self.store.node_count(),
                "pfp step"
            );
            self.step();
            if seen.contains(&self.db) {
                return if self.db == prev {
                    Outcome::Sat
                } else {
                    Outcome::Unsat
                };
            }
            if limit.is_some_and(|l| self.steps >= l) {
                return Outcome::Interrupted;
            }
            if break_on(self.steps) {
                return Outcome::Interrupted;
            }
        }
    }

    /// Decode the database into ground tuples, sorted for determinism.
    /// Padding positions carry [`PAD`].
    pub fn tuples(&self) -> Vec<Term> {
        let sats = self.store.allsat(self.db, self.bits * self.ar);
        let mut out: Vec<Term> = sats
            .iter()
            .map(|a| {
                (0..self.ar)
                    .map(|j| {
                        let mut val: SymId = 0;
                        for b in 0..self.bits {
                            if a[j * self.bits + b] {
                                val |= 1 << b;
                            }
                        }
                        val
                    })
                    .collect()
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Write the database, one decoded tuple per line: padding renders as
    /// `*`, interned symbols by name, out-of-dictionary ids as `[id]`.
    pub fn dump<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        for t in self.tuples() {
            for (i, &k) in t.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                if k == PAD {
                    write!(w, "*")?;
                } else if let Some(name) = self.dict.sym_name(k) {
                    write!(w, "{}", name)?;
                } else {
                    write!(w, "[{}]", k)?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Did any step so far derive and delete the same tuple?
    pub fn contradiction(&self) -> bool {
        self.contradiction
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Is the database empty?
    pub fn is_empty(&self) -> bool {
        self.db == F
    }

    /// Size of the BDD node arena.
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of compiled rules (facts excluded).
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The proof matrices of rule `i`, when loaded with proofs on.
    pub fn proof_matrices(&self, i: usize) -> Option<&ProofMatrices> {
        self.rules.get(i).and_then(|r| r.proof_matrices())
    }

    /// The disjoined, padded variables BDD recorded for rule `i`, for the
    /// external proof layer.
    pub fn proof_bdd(&mut self, i: usize) -> NodeId {
        let roots: Vec<NodeId> = self.proof_roots[i].iter().copied().collect();
        self.rules[i].varbdd(&mut self.store, &roots, self.bits, self.ar)
    }
}

/// Intern one raw rule into a matrix of signed terms, tracking the maximum
/// arity seen so far.
fn intern_rule(dict: &mut Dict, rr: &RawRule, ar: &mut usize) -> Matrix {
    let mut mat = Matrix::with_capacity(1 + rr.body.len());
    for term in std::iter::once(&rr.head).chain(rr.body.iter()) {
        let mut t: Term = Vec::with_capacity(term.args.len() + 1);
        t.push(if term.neg { -1 } else { 1 });
        for a in &term.args {
            t.push(match a {
                RawArg::Sym(s) => dict.sym(s),
                RawArg::Var(n) => dict.var(n),
            });
        }
        *ar = (*ar).max(t.len() - 1);
        mat.push(t);
    }
    mat
}

#[cfg(test)]
mod tests;
