//! End-to-end execution tests driven through the parser.

use crobots_ast::ast::{Expr, Program};
use crobots_ast::{Name, Span};
use crobots_interp::{
    ExprStep, Fault, Interpreter, Machine, MathApi, NullRobot, Outcome, Primitives, RunState,
    Term,
};
use crobots_parser::{parse_expression, parse_program};

fn expr(source: &str) -> Expr {
    let (expr, diagnostics) = parse_expression(source);
    assert!(diagnostics.is_empty(), "parse errors: {diagnostics:?}");
    expr.expect("an expression")
}

fn program(source: &str) -> Program {
    let (program, diagnostics) = parse_program(source);
    assert!(diagnostics.is_empty(), "parse errors: {diagnostics:?}");
    program
}

fn null_prims() -> Primitives {
    Primitives::new(Box::new(NullRobot), MathApi::with_seed(0))
}

/// Big-step evaluation of a standalone expression in a fresh state.
fn eval(source: &str) -> Result<Option<i64>, Fault> {
    let mut state = RunState::new();
    let mut prims = null_prims();
    Machine::new(&mut state, &mut prims).eval_expr(&expr(source))
}

/// Small-step reduction of a standalone expression to its final value.
fn step_to_value(source: &str, state: &mut RunState) -> Result<Term, Fault> {
    let mut prims = null_prims();
    let mut machine = Machine::new(state, &mut prims);
    let mut term = Term::from(&expr(source));
    while !term.is_value() {
        match machine.step_expr(term)? {
            ExprStep::Reduced(next) => term = next,
            ExprStep::Terminal => unreachable!("term was not a value"),
        }
    }
    Ok(term)
}

fn run(source: &str) -> Result<Outcome, Fault> {
    let prog = program(source);
    Interpreter::with_null_robot(&prog).run(Some(1_000_000))
}

// ── Expression arithmetic ────────────────────────────────────────

#[test]
fn arithmetic_follows_precedence_and_grouping() {
    assert_eq!(eval("2 + 2"), Ok(Some(4)));
    assert_eq!(eval("2 + 2 * 2"), Ok(Some(6)));
    assert_eq!(eval("(2 + 2) * 2"), Ok(Some(8)));
    assert_eq!(eval("(8 % 10) / (-2 + -2)"), Ok(Some(-2)));
}

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(eval("361 / 360"), Ok(Some(1)));
    assert_eq!(eval("-361 / 360"), Ok(Some(-1)));
    assert_eq!(eval("359 / 360"), Ok(Some(0)));
    assert_eq!(eval("-359 / 360"), Ok(Some(0)));
}

#[test]
fn logical_operators_are_bitwise_not_boolean() {
    // 5 & 2 has no common bits.
    assert_eq!(eval("5 && 2"), Ok(Some(0)));
    assert_eq!(eval("5 || 2"), Ok(Some(7)));
    assert_eq!(eval("!0"), Ok(Some(-1)));
}

#[test]
fn comparisons_chain_left_to_right() {
    // (1 < 2) yields 1, then 1 == 1 yields 1.
    assert_eq!(eval("1 < 2 == 1"), Ok(Some(1)));
}

#[test]
fn division_by_zero_faults() {
    assert_eq!(eval("1 / 0"), Err(Fault::DivisionByZero));
    assert_eq!(eval("1 % (2 - 2)"), Err(Fault::DivisionByZero));
}

#[test]
fn math_primitives_evaluate_inline() {
    assert_eq!(eval("sqrt(81)"), Ok(Some(9)));
    assert_eq!(eval("sqrt(-81)"), Ok(Some(9)));
    assert_eq!(eval("atan(100000)"), Ok(Some(45)));
    assert_eq!(eval("sin(90)"), Ok(Some(100000)));
}

#[test]
fn null_robot_answers_zero() {
    assert_eq!(eval("scan(90, 10)"), Ok(Some(0)));
    assert_eq!(eval("damage() + speed()"), Ok(Some(0)));
}

#[test]
fn void_primitive_results_coerce_to_zero_in_arithmetic() {
    assert_eq!(eval("drive(90, 50) + 1"), Ok(Some(1)));
}

// ── Small-step reduction ─────────────────────────────────────────

#[test]
fn small_and_big_step_agree_on_expressions() {
    for source in ["2 + 2 * 2", "(8 % 10) / (-2 + -2)", "-3 * !0", "1 << 4 >> 2"] {
        let mut state = RunState::new();
        let stepped = step_to_value(source, &mut state).unwrap();
        assert_eq!(stepped.coerced(), eval(source).unwrap(), "{source}");
    }
}

#[test]
fn a_fully_reduced_term_steps_to_terminal_repeatedly() {
    let mut state = RunState::new();
    let mut prims = null_prims();
    let mut machine = Machine::new(&mut state, &mut prims);
    let term = Term::int(4, Span::dummy());
    assert_eq!(machine.step_expr(term.clone()), Ok(ExprStep::Terminal));
    assert_eq!(machine.step_expr(term), Ok(ExprStep::Terminal));
}

#[test]
fn assignment_chains_write_rightmost_target_first() {
    let setup = program("int o = 22, p = 3, q = 0;");
    let mut state = RunState::new();
    {
        let mut prims = null_prims();
        let mut machine = Machine::new(&mut state, &mut prims);
        for item in &setup.items {
            machine.eval_stmt(item).unwrap();
        }
    }
    let result = step_to_value("o += q = p *= 2", &mut state).unwrap();
    assert_eq!(result.coerced(), Some(28));
    assert_eq!(state.read_var(&Name::from("o")), Ok(28));
    assert_eq!(state.read_var(&Name::from("p")), Ok(6));
    assert_eq!(state.read_var(&Name::from("q")), Ok(6));
}

#[test]
fn assignment_chain_agrees_under_big_step() {
    let outcome = run(
        "main() {\
           int o = 22, p = 3, q = 0;\
           o += q = p *= 2;\
           return o * 1000000 + p * 1000 + q;\
         }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(28_006_006))));
}

// ── Whole programs ───────────────────────────────────────────────

#[test]
fn functions_compose_through_calls() {
    let outcome = run("foo(x){return x+42;} main(){return foo(3)+3;}");
    assert_eq!(outcome, Ok(Outcome::Done(Some(48))));
}

#[test]
fn a_distance_helper_combines_user_code_and_math_primitives() {
    let outcome = run(
        "distance(x1, y1, x2, y2) {\
           return sqrt((x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2));\
         }\
         main() { return distance(0, 0, 3, 4); }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(5))));
}

#[test]
fn functions_may_be_called_before_their_declaration() {
    let outcome = run(
        "main() { return later(); }\
         later() { return 7; }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(7))));
}

#[test]
fn a_bounded_while_loop_accumulates() {
    let outcome = run(
        "main() {\
           int i = 0;\
           int sum = 0;\
           while (i < 10) { sum += i; i += 1; }\
           return sum;\
         }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(45))));
}

#[test]
fn do_while_runs_the_body_at_least_once() {
    let outcome = run("main() { int n = 0; do { n += 1; } while (0); return n; }");
    assert_eq!(outcome, Ok(Outcome::Done(Some(1))));
}

#[test]
fn increment_statements_advance_the_variable() {
    let outcome = run("main() { int course = 89; ++course; ++course; --course; return course; }");
    assert_eq!(outcome, Ok(Outcome::Done(Some(90))));
}

#[test]
fn return_without_a_value_yields_none() {
    assert_eq!(run("main() { return; }"), Ok(Outcome::Done(None)));
}

#[test]
fn falling_off_the_end_yields_none() {
    assert_eq!(run("main() { int x = 1; }"), Ok(Outcome::Done(None)));
}

#[test]
fn return_exits_nested_blocks_and_loops() {
    let outcome = run(
        "main() {\
           int i = 0;\
           while (1) {\
             if (i >= 3) { return i; }\
             i += 1;\
           }\
         }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(3))));
}

// ── Frames and visibility ────────────────────────────────────────

#[test]
fn caller_locals_are_invisible_in_the_callee() {
    let outcome = run(
        "probe() { return hidden; }\
         main() { int hidden = 5; return probe(); }",
    );
    assert_eq!(outcome, Err(Fault::UndefinedVariable(Name::from("hidden"))));
}

#[test]
fn globals_are_shared_between_caller_and_callee() {
    let outcome = run(
        "int g = 1;\
         bump() { g += 10; return 0; }\
         main() { bump(); return g; }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(11))));
}

#[test]
fn block_locals_shadow_and_then_unwind() {
    let outcome = run(
        "main() {\
           int x = 1;\
           { int x = 100; x += 1; }\
           return x;\
         }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(1))));
}

#[test]
fn block_writes_to_outer_variables_persist() {
    let outcome = run(
        "main() {\
           int x = 1;\
           { x = 100; }\
           return x;\
         }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(100))));
}

#[test]
fn recursion_terminates_with_its_base_case() {
    let outcome = run(
        "fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); }\
         main() { return fact(6); }",
    );
    assert_eq!(outcome, Ok(Outcome::Done(Some(720))));
}

// ── Faults through whole programs ────────────────────────────────

#[test]
fn calling_a_user_function_with_the_wrong_arity_faults() {
    let outcome = run(
        "f(a, b) { return a + b; }\
         main() { return f(1); }",
    );
    assert_eq!(
        outcome,
        Err(Fault::ArgumentMismatch {
            name: Name::from("f"),
            expected: 2,
            actual: 1,
        })
    );
}

#[test]
fn calling_a_primitive_with_the_wrong_arity_faults() {
    let outcome = run("main() { return damage(1); }");
    assert_eq!(
        outcome,
        Err(Fault::ArgumentMismatch {
            name: Name::from("damage"),
            expected: 0,
            actual: 1,
        })
    );
}

#[test]
fn calling_a_variable_faults() {
    let outcome = run("main() { int x = 1; return x(); }");
    assert_eq!(outcome, Err(Fault::NotAFunction(Name::from("x"))));
}

#[test]
fn reading_a_function_as_a_variable_faults() {
    let outcome = run(
        "f() { return 0; }\
         main() { return f + 1; }",
    );
    assert_eq!(outcome, Err(Fault::NotAVariable(Name::from("f"))));
}
