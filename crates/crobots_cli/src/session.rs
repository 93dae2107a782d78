//! A persistent evaluation session for the REPL and pipe mode.
//!
//! One `Session` holds a run state and primitive table across inputs,
//! so variables and functions defined on earlier lines stay available.

use crobots_ast::{Diagnostic, SourceMap};
use crobots_interp::{Flow, Machine, MathApi, NullRobot, Primitives, RunState};
use crobots_parser::{parse_expression, parse_program, parse_statement};

pub struct Session {
    state: RunState,
    prims: Primitives,
    output: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: RunState::new(),
            prims: Primitives::new(Box::new(NullRobot), MathApi::new()),
            output: Vec::new(),
        }
    }

    /// Drain the lines produced by the last `exec`.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Execute one line of input: a session command, or robot code.
    pub fn exec(&mut self, line: &str) -> Result<(), String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("help") => {
                self.output.push(HELP.trim_end().to_string());
                Ok(())
            }
            Some("seed") => match words.next().map(str::parse::<u64>) {
                Some(Ok(seed)) if words.next().is_none() => {
                    self.prims.reseed(seed);
                    Ok(())
                }
                _ => Err("usage: seed <number>".to_string()),
            },
            _ => self.exec_code(trimmed),
        }
    }

    /// Try the input as an expression, then a statement, then a
    /// top-level declaration sequence; report whichever parse came
    /// closest if all three fail.
    fn exec_code(&mut self, source: &str) -> Result<(), String> {
        let (expr, expr_diags) = parse_expression(source);
        if expr_diags.is_empty() {
            if let Some(expr) = expr {
                let mut machine = Machine::new(&mut self.state, &mut self.prims);
                let value = machine.eval_expr(&expr).map_err(|f| f.to_string())?;
                if let Some(value) = value {
                    self.output.push(value.to_string());
                }
                return Ok(());
            }
        }

        let (stmt, stmt_diags) = parse_statement(source);
        if stmt_diags.is_empty() {
            if let Some(stmt) = stmt {
                let mut machine = Machine::new(&mut self.state, &mut self.prims);
                let flow = machine.eval_stmt(&stmt).map_err(|f| f.to_string())?;
                if let Flow::Returned(Some(value)) = flow {
                    self.output.push(value.to_string());
                }
                return Ok(());
            }
        }

        let (program, prog_diags) = parse_program(source);
        if prog_diags.is_empty() {
            let mut machine = Machine::new(&mut self.state, &mut self.prims);
            for item in &program.items {
                machine.eval_stmt(item).map_err(|f| f.to_string())?;
            }
            return Ok(());
        }

        let diags = [expr_diags, stmt_diags, prog_diags]
            .into_iter()
            .min_by_key(Vec::len)
            .unwrap_or_default();
        Err(render_all(source, &diags))
    }
}

fn render_all(source: &str, diags: &[Diagnostic]) -> String {
    let map = SourceMap::new(source);
    diags
        .iter()
        .map(|d| map.render(d))
        .collect::<Vec<_>>()
        .join("\n")
}

const HELP: &str = "\
Enter robot-language code to evaluate it against the session state:
  2 + 2                      expressions print their value
  int course = 90;           statements mutate the session
  turn(d) { drive(d, 0); }   function declarations persist

Session commands:
  help                       show this text
  seed <number>              reseed the rand() generator
";

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_ok(session: &mut Session, line: &str) -> Vec<String> {
        session.exec(line).unwrap();
        session.take_output()
    }

    #[test]
    fn expressions_print_their_value() {
        let mut session = Session::new();
        assert_eq!(exec_ok(&mut session, "2 + 2 * 2"), ["6"]);
    }

    #[test]
    fn state_persists_between_lines() {
        let mut session = Session::new();
        assert_eq!(exec_ok(&mut session, "int x = 40;"), Vec::<String>::new());
        assert_eq!(exec_ok(&mut session, "x += 2"), ["42"]);
        assert_eq!(exec_ok(&mut session, "x"), ["42"]);
    }

    #[test]
    fn functions_defined_earlier_are_callable_later() {
        let mut session = Session::new();
        exec_ok(&mut session, "twice(n) { return n * 2; }");
        assert_eq!(exec_ok(&mut session, "twice(21)"), ["42"]);
    }

    #[test]
    fn faults_come_back_as_errors() {
        let mut session = Session::new();
        let err = session.exec("nope").unwrap_err();
        assert!(err.contains("nope"));
        let err = session.exec("1 / 0").unwrap_err();
        assert!(err.contains("division by zero"));
    }

    #[test]
    fn parse_errors_are_rendered_with_a_caret() {
        let mut session = Session::new();
        let err = session.exec("1 +").unwrap_err();
        assert!(err.contains("error:"));
        assert!(err.contains("^"));
    }

    #[test]
    fn seed_makes_rand_repeatable() {
        let mut a = Session::new();
        let mut b = Session::new();
        a.exec("seed 7").unwrap();
        b.exec("seed 7").unwrap();
        assert_eq!(exec_ok(&mut a, "rand(1000)"), exec_ok(&mut b, "rand(1000)"));
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut session = Session::new();
        assert_eq!(exec_ok(&mut session, "   "), Vec::<String>::new());
    }
}
