//! Tests for program loading and the PFP driver

use super::*;
use crate::error::{CompileError, ParseError};

fn lines(p: &Program) -> Vec<String> {
    let mut out = Vec::new();
    p.dump(&mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn parse_errors_surface() {
    let err = Program::parse("p 1").unwrap_err();
    assert!(matches!(err, ProgramError::Parse(ParseError::InvalidSyntax { .. })));
}

#[test]
fn proof_mode_rejects_negation() {
    let err = Program::parse_with("q ?x :- ~p ?x.", Options { proof: true }).unwrap_err();
    assert_eq!(
        err,
        ProgramError::Compile(CompileError::ProofWithNegation)
    );

    // negation-free programs load fine with proofs on
    let p = Program::parse_with("e 1. t ?x :- e ?x.", Options { proof: true }).unwrap();
    assert_eq!(p.rule_count(), 1);
    assert!(p.proof_matrices(0).is_some());
}

#[test]
fn facts_only_fixpoint_in_one_step() {
    let mut p = Program::parse("a 1. b 2.").unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    assert_eq!(p.steps(), 1);
    assert_eq!(lines(&p), vec!["a 1", "b 2"]);
}

#[test]
fn negated_fact_subtracts() {
    let mut p = Program::parse("p 1. p 2. ~p 1.").unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    assert_eq!(lines(&p), vec!["p 2"]);
}

#[test]
fn variable_fact_spans_the_bit_space() {
    let p = Program::parse("p ?x.").unwrap();
    // one free argument position, every bit pattern is a tuple
    let ts = p.tuples();
    assert_eq!(ts.len(), 1 << 4);
    assert!(ts.contains(&vec![4, 0]));
    // out-of-dictionary values render as bracketed ids
    assert!(lines(&p).iter().any(|l| l.contains('[')));
}

#[test]
fn empty_program_has_empty_database() {
    let mut p = Program::parse("# nothing\n").unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    assert!(p.is_empty());
    assert!(p.tuples().is_empty());
}

#[test]
fn contradiction_is_observable() {
    let mut p = Program::parse("p 1. q 1 :- p 1. ~q 1 :- p 1.").unwrap();
    assert!(!p.contradiction());
    assert_eq!(p.pfp(), Outcome::Sat);
    assert!(p.contradiction());
    assert!(p.is_empty());
}

#[test]
fn deletion_without_addition_is_not_a_contradiction() {
    let mut p = Program::parse("p 1. ~p 1 :- p 1.").unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    assert!(!p.contradiction());
    assert!(p.is_empty());
}

#[test]
fn step_limit_interrupts() {
    let src = "e 1 2. e 2 3. e 3 4. t ?x ?y :- e ?x ?y. t ?x ?z :- e ?x ?y, t ?y ?z.";
    let mut p = Program::parse(src).unwrap();
    assert_eq!(p.pfp_with(Some(1), |_| false), Outcome::Interrupted);
    assert_eq!(p.steps(), 1);
}

#[test]
fn break_predicate_interrupts() {
    let src = "e 1 2. e 2 3. e 3 4. t ?x ?y :- e ?x ?y. t ?x ?z :- e ?x ?y, t ?y ?z.";
    let mut p = Program::parse(src).unwrap();
    assert_eq!(p.pfp_with(None, |steps| steps >= 1), Outcome::Interrupted);
}

#[test]
fn dump_renders_padding() {
    let mut p = Program::parse("a 1. b 2 3.").unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    assert_eq!(lines(&p), vec!["a 1 *", "b 2 3"]);
}

#[test]
fn proof_bdd_collects_firings() {
    let mut p = Program::parse_with("e 1. t ?x :- e ?x.", Options { proof: true }).unwrap();
    assert_eq!(p.pfp(), Outcome::Sat);
    let root = p.proof_bdd(0);
    assert_ne!(root, crate::bdd::F);
}
