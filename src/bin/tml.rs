//! Command-line front-end
//!
//! Reads a program from a file or standard input, runs it to its partial
//! fixed point and prints the database, or `unsat` on oscillation.

use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use tml::{Options, Outcome, Program};

#[derive(Parser, Debug)]
#[command(name = "tml")]
#[command(about = "PFP datalog engine over binary decision diagrams", long_about = None)]
#[command(version)]
struct Args {
    /// Program file (standard input when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Stop after at most this many steps
    #[arg(short, long, value_name = "N")]
    steps: Option<usize>,

    /// Build proof matrices while loading (rejects negation)
    #[arg(long)]
    proof: bool,

    /// Suppress the database print
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = match read_source(args.input.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading program: {}", e);
            process::exit(1);
        }
    };

    let mut prog = match Program::parse_with(&source, Options { proof: args.proof }) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let outcome = prog.pfp_with(args.steps, |_| false);
    match outcome {
        Outcome::Unsat => {
            println!("unsat");
            return;
        }
        Outcome::Interrupted => {
            eprintln!("stopped after {} steps", prog.steps());
        }
        Outcome::Sat => {}
    }

    if prog.contradiction() {
        eprintln!("contradiction: a step derived and deleted the same tuples");
    }

    if !args.quiet {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = prog.dump(&mut handle) {
            eprintln!("Error writing database: {}", e);
            process::exit(1);
        }
        let _ = handle.flush();
    }
}

fn read_source(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
