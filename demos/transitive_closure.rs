//! Compute the transitive closure of a small edge relation and print the
//! database at the fixed point.

use tml::{Outcome, Program};

fn main() {
    let src = "
        e 1 2. e 2 3. e 3 4.
        t ?x ?y :- e ?x ?y.
        t ?x ?z :- e ?x ?y, t ?y ?z.
    ";
    let mut p = Program::parse(src).expect("program loads");
    match p.pfp() {
        Outcome::Sat => {
            println!("fixed point after {} steps:", p.steps());
            let stdout = std::io::stdout();
            p.dump(&mut stdout.lock()).expect("write database");
        }
        Outcome::Unsat => println!("unsat"),
        Outcome::Interrupted => println!("interrupted"),
    }
}
