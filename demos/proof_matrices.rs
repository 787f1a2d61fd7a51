//! Load a negation-free program with proofs on and inspect the derivation
//! matrices a proof layer would consume.

use tml::{Options, Outcome, Program};

fn main() {
    let src = "e 1 2. e 2 3. t ?x ?y :- e ?x ?y. t ?x ?z :- e ?x ?y, t ?y ?z.";
    let mut p = Program::parse_with(src, Options { proof: true }).expect("program loads");
    assert_eq!(p.pfp(), Outcome::Sat);

    for i in 0..p.rule_count() {
        let pm = p.proof_matrices(i).expect("proofs were requested");
        println!("rule {i}:");
        println!("  rule/variable matrix: {:?}", pm.proof1);
        println!("  {} derivation matrices", pm.proof2.len());
        let root = p.proof_bdd(i);
        println!("  recorded firings root: {root}");
    }
}
