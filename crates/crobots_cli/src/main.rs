use std::io::{self, BufRead, IsTerminal};
use std::process;

use crobots_ast::diagnostic::{Severity, SourceMap};
use crobots_cli::session::Session;
use crobots_interp::{Fault, Interpreter, MathApi, NullRobot, Outcome, Primitives};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    // Check for --vi flag
    let vi_mode = args.iter().any(|a| a == "--vi");
    let args: Vec<&str> = args
        .iter()
        .filter(|a| *a != "--vi")
        .map(|s| s.as_str())
        .collect();

    match args.first().copied() {
        Some("run") => run_command(&args[1..]),
        Some("check") => check_command(&args[1..]),
        Some(other) => {
            eprintln!("unknown subcommand: {}", other);
            eprintln!("usage: crobots [--vi] [run <robot.r> | check <files...>]");
            process::exit(1);
        }
        None => {
            if io::stdin().is_terminal() {
                crobots_cli::repl::run_repl(vi_mode);
            } else {
                run_pipe();
            }
        }
    }
}

/// Pipe mode: read raw lines from stdin, no reedline.
fn run_pipe() {
    let stdin = io::stdin();
    let mut session = Session::new();
    let mut had_error = false;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("read error: {}", e);
                process::exit(1);
            }
        };

        let result = session.exec(&line);

        for out in session.take_output() {
            println!("{}", out);
        }

        if let Err(e) = result {
            eprintln!("{}", e);
            had_error = true;
        }
    }

    if had_error {
        process::exit(1);
    }
}

/// `crobots run <file> [--gas <n>] [--seed <n>]`
fn run_command(args: &[&str]) {
    let mut gas: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            flag @ ("--gas" | "--seed") => {
                let value = args.get(i + 1).and_then(|v| v.parse::<u64>().ok());
                let Some(value) = value else {
                    eprintln!("{} expects a number", flag);
                    process::exit(1);
                };
                if flag == "--gas" {
                    gas = Some(value);
                } else {
                    seed = Some(value);
                }
                i += 2;
            }
            p if path.is_none() => {
                path = Some(p);
                i += 1;
            }
            other => {
                eprintln!("unexpected argument: {}", other);
                process::exit(1);
            }
        }
    }

    let Some(path) = path else {
        eprintln!("usage: crobots run <robot.r> [--gas <n>] [--seed <n>]");
        process::exit(1);
    };

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };

    let (program, diagnostics) = crobots_parser::parse_program(&source);
    if !diagnostics.is_empty() {
        let map = SourceMap::new(&source);
        for diag in &diagnostics {
            eprintln!("{}", map.render(diag));
        }
        process::exit(1);
    }

    let math = match seed {
        Some(seed) => MathApi::with_seed(seed),
        None => MathApi::new(),
    };
    let mut interp = Interpreter::new(&program, Primitives::new(Box::new(NullRobot), math));

    match interp.run(gas) {
        Ok(Outcome::Done(Some(value))) => println!("{}", value),
        Ok(Outcome::Done(None)) => {}
        Ok(Outcome::OutOfGas) => {
            eprintln!("gas limit exceeded");
            process::exit(1);
        }
        Err(fault) => {
            eprintln!("runtime fault: {}", fault);
            if matches!(fault, Fault::NoMainFunction) {
                eprintln!("a robot program starts at a zero-argument `main` function");
            }
            process::exit(1);
        }
    }
}

/// `crobots check [<files...> | -c <source> | -]`
fn check_command(args: &[&str]) {
    let sources: Vec<(String, String)> = if args.first().copied() == Some("-c") {
        if args.len() != 2 {
            eprintln!("usage: crobots check -c <source>");
            process::exit(1);
        }
        vec![("<string>".to_string(), args[1].to_string())]
    } else if args.is_empty() || args == ["-"] {
        if args.is_empty() && io::stdin().is_terminal() {
            eprintln!("usage: crobots check <files...>");
            process::exit(1);
        }
        let source = io::read_to_string(io::stdin()).unwrap_or_else(|e| {
            eprintln!("read error: {}", e);
            process::exit(1);
        });
        vec![("<stdin>".to_string(), source)]
    } else {
        let mut sources = Vec::new();
        for path in args {
            match std::fs::read_to_string(path) {
                Ok(content) => sources.push((path.to_string(), content)),
                Err(e) => {
                    eprintln!("cannot read '{}': {}", path, e);
                    process::exit(1);
                }
            }
        }
        sources
    };

    let mut error_count = 0;
    let mut warning_count = 0;

    for (name, source) in &sources {
        let (program, mut diagnostics) = crobots_parser::parse_program(source);
        let resolution = crobots_scope::resolve(&program);
        diagnostics.extend(resolution.diagnostics);

        if diagnostics.is_empty() {
            continue;
        }
        if sources.len() > 1 {
            eprintln!("{}:", name);
        }
        let map = SourceMap::new(source);
        for diag in &diagnostics {
            match diag.severity {
                Severity::Error => error_count += 1,
                Severity::Warning => warning_count += 1,
            }
            eprintln!("{}", map.render(diag));
        }
    }

    if error_count > 0 {
        eprintln!(
            "{} error{}, {} warning{}",
            error_count,
            if error_count == 1 { "" } else { "s" },
            warning_count,
            if warning_count == 1 { "" } else { "s" },
        );
        process::exit(1);
    } else if warning_count > 0 {
        eprintln!(
            "{} warning{}",
            warning_count,
            if warning_count == 1 { "" } else { "s" },
        );
    }
}

/// Print CLI usage and exit.
fn print_usage() {
    println!(
        "\
crobots — robot-language interpreter

USAGE:
  crobots [--vi]                     Start interactive REPL
  crobots run <robot.r>              Execute a robot program (calls main)
  crobots run <robot.r> --gas <n>    Stop after n reduction steps
  crobots run <robot.r> --seed <n>   Seed the rand() generator
  crobots check <files...>           Parse and resolve, report diagnostics
  crobots check -c <source>          Check a source string
  echo <code> | crobots              Pipe mode (no line editing)

FLAGS:
  --vi                               Use vi keybindings in REPL
  -h, --help                         Show this help

REPL:
  Type 'help' inside the REPL for a list of commands."
    );
}
