//! Negation as failure in a body, and deletion through a negated head.

use tml::{Outcome, Program};

fn main() {
    // q holds for the p-tuples with no matching r-tuple
    let stable = "p 1. p 2. r 1. q ?x :- p ?x, ~r ?x.";
    let mut p = Program::parse(stable).expect("program loads");
    assert_eq!(p.pfp(), Outcome::Sat);
    println!("stable program:");
    let stdout = std::io::stdout();
    p.dump(&mut stdout.lock()).expect("write database");

    // deleting p re-enables deriving it: the database oscillates
    let toggling = "p. ~p :- p. p :- ~p.";
    let mut p = Program::parse(toggling).expect("program loads");
    match p.pfp() {
        Outcome::Unsat => println!("toggling program: unsat (oscillation)"),
        other => println!("toggling program: {:?}", other),
    }
}
