//! Rule compilation and firing
//!
//! A parsed rule is a matrix of integer terms, head first, every term padded
//! to the program-wide arity. Compilation turns the matrix into an object
//! made entirely of BDD-level artifacts:
//!
//! - per body, a *selection* BDD (`sel`) fixing constant arguments and
//!   constraining first-occurrence variables to the symbol universe, an
//!   *existential mask* (`ex`) over positions that carry no information
//!   after selection, equality constraints for repeated variables, and a
//!   variable permutation aligning the body with the head;
//! - for the head, a symbol BDD (`hsym`) fixing its constants and equality
//!   constraints for variables repeated inside the head.
//!
//! Firing a compiled rule against the database intersects each body
//! selection with the database (or its complement for negated bodies),
//! quantifies the masked positions away, permutes into the rule's combined
//! variable space, conjoins everything with `hsym`, and finally projects
//! down to head positions. Per-step memoization is keyed on `(sel, ex)`
//! *before* permutation so that bodies sharing a pattern across rules share
//! the work.

use std::collections::HashMap;

use crate::bdd::{BddStore, NodeId, F, T};
use crate::dict::{Matrix, SymId, Term, CLOSE_PAREN, OPEN_PAREN, PAD};
use crate::error::CompileError;

/// Equality constraints are conjoined in batches of this many bit pairs;
/// one oversized conjunction makes the apply frontier blow up.
const EQ_BATCH: usize = 8;

/// Per-step memo of body matches against the database, keyed on the
/// selection BDD and existential mask, split by body polarity. Cleared
/// between steps by dropping the value.
#[derive(Debug, Default)]
pub struct StepCache {
    pos: HashMap<(NodeId, Vec<bool>), NodeId>,
    neg: HashMap<(NodeId, Vec<bool>), NodeId>,
}

impl StepCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pos.len() + self.neg.len()
    }
}

/// One compiled body atom
#[derive(Debug)]
pub(crate) struct Body {
    neg: bool,
    sel: NodeId,
    ex: Vec<bool>,
    perm: Vec<usize>,
    eqs: Vec<NodeId>,
}

impl Body {
    fn compile(
        store: &mut BddStore,
        args: &[SymId],
        neg: bool,
        bits: usize,
        dsz: usize,
        nvars: usize,
    ) -> Body {
        let ar = args.len();
        let mut sel = T;
        for (j, &a) in args.iter().enumerate() {
            if a >= 0 {
                let enc = store.from_sym(a as u32, bits, j * bits);
                sel = store.and(sel, enc);
            }
        }
        let mut ex = vec![false; bits * ar];
        let mut seen: HashMap<SymId, usize> = HashMap::new();
        let mut eq_pairs: Vec<(usize, usize)> = Vec::new();
        let exclude = [PAD as u32, OPEN_PAREN as u32, CLOSE_PAREN as u32];
        for (j, &a) in args.iter().enumerate() {
            if a >= 0 {
                ex[j * bits..(j + 1) * bits].fill(true);
            } else if let Some(&j0) = seen.get(&a) {
                ex[j * bits..(j + 1) * bits].fill(true);
                for b in 0..bits {
                    eq_pairs.push((j * bits + b, j0 * bits + b));
                }
            } else {
                seen.insert(a, j);
                let range = store.from_range(dsz, bits, j * bits, &exclude);
                sel = store.and(sel, range);
            }
        }
        let eqs = batch_eqs(store, &eq_pairs);
        Body {
            neg,
            sel,
            ex,
            perm: (0..(ar + nvars) * bits).collect(),
            eqs,
        }
    }

    /// Match this body against the database, going through the step cache.
    /// Returns the body's contribution in the rule's combined variable
    /// space, or [`F`] when the body cannot be satisfied.
    fn bdd(&self, store: &mut BddStore, db: NodeId, cache: &mut StepCache) -> NodeId {
        let map = if self.neg { &mut cache.neg } else { &mut cache.pos };
        let key = (self.sel, self.ex.clone());
        if let Some(&r) = map.get(&key) {
            return if r == F { F } else { store.permute(r, &self.perm) };
        }
        let mut r = if self.neg {
            store.and_not(self.sel, db)
        } else {
            store.and(self.sel, db)
        };
        if r != F {
            for &eq in &self.eqs {
                r = store.and(r, eq);
                if r == F {
                    break;
                }
            }
        }
        if r != F {
            r = store.exists(r, &self.ex);
        }
        // cached before permutation: the key is rule-independent
        map.insert(key, r);
        if r == F {
            F
        } else {
            store.permute(r, &self.perm)
        }
    }
}

/// Matrices handed to an external proof layer, framed with the reserved
/// parenthesis symbols.
#[derive(Debug, Clone)]
pub struct ProofMatrices {
    pub proof1: Matrix,
    pub proof2: Vec<Matrix>,
}

/// A compiled rule, immutable once built
#[derive(Debug)]
pub struct Rule {
    pub(crate) neg: bool,
    hsym: NodeId,
    bodies: Vec<Body>,
    eqs: Vec<NodeId>,
    pub(crate) vars_arity: usize,
    proof: Option<ProofMatrices>,
}

impl Rule {
    /// Compile a matrix with at least one body. `dsz` is the symbol-universe
    /// size used for range constraints; `proof` requests proof matrices and
    /// is rejected for rules with any negation.
    pub fn compile(
        store: &mut BddStore,
        v: Matrix,
        bits: usize,
        dsz: usize,
        proof: bool,
    ) -> Result<Rule, CompileError> {
        debug_assert!(v.len() > 1);
        let ar = v[0].len() - 1;
        let neg = v[0][0] < 0;
        if proof && (neg || v[1..].iter().any(|t| t[0] < 0)) {
            return Err(CompileError::ProofWithNegation);
        }
        let nvars = varcount(&v[1..]);
        let mut bodies: Vec<Body> = v[1..]
            .iter()
            .map(|t| Body::compile(store, &t[1..], t[0] < 0, bits, dsz, nvars))
            .collect();

        // head constants and head-internal equalities
        let head = &v[0][1..];
        let mut hsym = T;
        let mut m: HashMap<SymId, usize> = HashMap::new();
        let mut heq: Vec<(usize, usize)> = Vec::new();
        for (j, &a) in head.iter().enumerate() {
            if a >= 0 {
                let enc = store.from_sym(a as u32, bits, j * bits);
                hsym = store.and(hsym, enc);
            } else if let Some(&j0) = m.get(&a) {
                for b in 0..bits {
                    heq.push((j * bits + b, j0 * bits + b));
                }
            } else {
                m.insert(a, j);
            }
        }
        let eqs = batch_eqs(store, &heq);

        // body variables permute to their head position, or to a fresh slot
        // above the arity shared across the whole rule
        let mut k = ar;
        for (i, t) in v[1..].iter().enumerate() {
            for (j, &a) in t[1..].iter().enumerate() {
                if a < 0 {
                    let slot = *m.entry(a).or_insert_with(|| {
                        let s = k;
                        k += 1;
                        s
                    });
                    for b in 0..bits {
                        bodies[i].perm[j * bits + b] = slot * bits + b;
                    }
                }
            }
        }

        let proof = proof.then(|| build_proof(&v));
        Ok(Rule {
            neg,
            hsym,
            bodies,
            eqs,
            vars_arity: k,
            proof,
        })
    }

    /// Fire this rule against `db`. Returns the contribution projected to
    /// head positions plus the pre-projection variables BDD (for proof
    /// recording); both are [`F`] when the rule does not fire.
    pub fn fire(
        &self,
        store: &mut BddStore,
        db: NodeId,
        cache: &mut StepCache,
        bits: usize,
        ar: usize,
    ) -> (NodeId, NodeId) {
        let mut conj = Vec::with_capacity(self.bodies.len() + self.eqs.len() + 1);
        for b in &self.bodies {
            let r = b.bdd(store, db, cache);
            if r == F {
                return (F, F);
            }
            conj.push(r);
        }
        conj.extend_from_slice(&self.eqs);
        conj.push(self.hsym);
        let vars = store.and_many(&conj);
        if vars == F {
            return (F, F);
        }
        (store.deltail(vars, bits * ar), vars)
    }

    /// The proof matrices, when compiled with proofs on.
    pub fn proof_matrices(&self) -> Option<&ProofMatrices> {
        self.proof.as_ref()
    }

    /// Disjoin recorded firing roots and pad the unused slots, yielding the
    /// rule's variables BDD for the proof layer.
    pub fn varbdd(&self, store: &mut BddStore, roots: &[NodeId], bits: usize, ar: usize) -> NodeId {
        let mut y = F;
        for &z in roots {
            y = store.or(y, z);
        }
        let mut x = T;
        for n in self.vars_arity..ar {
            let enc = store.from_sym(PAD as u32, bits, n * bits);
            x = store.and(x, enc);
        }
        store.and(x, y)
    }
}

/// Number of distinct variables across the body terms.
fn varcount(bodies: &[Term]) -> usize {
    let mut vars = std::collections::HashSet::new();
    for t in bodies {
        for &a in &t[1..] {
            if a < 0 {
                vars.insert(a);
            }
        }
    }
    vars.len()
}

/// Conjoin equality constraints for the given bit pairs, packaged in
/// batches of [`EQ_BATCH`] so joins can apply them incrementally.
fn batch_eqs(store: &mut BddStore, pairs: &[(usize, usize)]) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    for (i, &(x, y)) in pairs.iter().enumerate() {
        if i % EQ_BATCH == 0 {
            out.push(T);
        }
        let eq = store.from_eq(x, y);
        let last = out.last_mut().expect("batch opened above");
        *last = store.and(*last, eq);
    }
    out
}

/// Encode a fact term: constants fix their bits, repeated variables add
/// equality constraints, first-occurrence variables stay unconstrained.
/// Returns the head polarity (a negated fact subtracts from the database)
/// and the tuple-set BDD.
pub fn fact(store: &mut BddStore, t: &Term, bits: usize) -> (bool, NodeId) {
    let mut r = T;
    let mut seen: HashMap<SymId, usize> = HashMap::new();
    for (j, &a) in t[1..].iter().enumerate() {
        if a >= 0 {
            let enc = store.from_sym(a as u32, bits, j * bits);
            r = store.and(r, enc);
        } else if let Some(&j0) = seen.get(&a) {
            for b in 0..bits {
                let eq = store.from_eq(j * bits + b, j0 * bits + b);
                r = store.and(r, eq);
            }
        } else {
            seen.insert(a, j);
        }
    }
    (t[0] < 0, r)
}

/// Build the derivation-encoding matrices for a negation-free rule. Terms
/// are framed with the reserved parenthesis symbols; the proof layer pads
/// and interprets them.
fn build_proof(v: &Matrix) -> ProofMatrices {
    let strip = |t: &Term| t[1..].to_vec();
    let head = strip(&v[0]);

    // all rule variables: head first, then body variables in order of
    // first appearance
    let mut vars: Term = vec![1];
    vars.extend_from_slice(&head);
    let mut seen: std::collections::HashSet<SymId> =
        head.iter().copied().filter(|&a| a < 0).collect();
    for t in &v[1..] {
        for &a in &strip(t) {
            if a < 0 && seen.insert(a) {
                vars.push(a);
            }
        }
    }

    // the whole rule framed: [( head body1 .. bodym )]
    let mut prule: Term = vec![1, OPEN_PAREN];
    for t in v {
        prule.extend_from_slice(&strip(t));
    }
    prule.push(CLOSE_PAREN);

    // head up front, bodies framed: [head ( body1 .. bodym )]
    let mut bprule: Term = vec![1];
    bprule.extend_from_slice(&head);
    bprule.push(OPEN_PAREN);
    for t in &v[1..] {
        bprule.extend_from_slice(&strip(t));
    }
    bprule.push(CLOSE_PAREN);

    let framed = |args: &[SymId]| {
        let mut t: Term = vec![1, OPEN_PAREN];
        t.extend_from_slice(args);
        t.push(CLOSE_PAREN);
        t
    };
    let fhead = framed(&head);

    let proof1: Matrix = vec![prule.clone(), vars];
    let mut proof2: Vec<Matrix> = Vec::new();
    let mut all: Matrix = vec![bprule, prule.clone(), fhead.clone()];
    for t in &v[1..] {
        let fb = framed(&strip(t));
        proof2.push(vec![fb.clone(), prule.clone(), fhead.clone()]);
        all.push(fb);
    }
    proof2.push(all);
    ProofMatrices { proof1, proof2 }
}
