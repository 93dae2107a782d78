pub mod cst;
pub mod lower;
pub mod parser;
mod expr;

use crobots_ast::ast::{Expr, Program, Stmt};
use crobots_ast::Diagnostic;
use crobots_lexer::TokenKind;
use parser::Parser;

/// Parse a whole compilation unit. Always returns a best-effort tree;
/// lexical and syntactic problems come back as diagnostics.
pub fn parse_program(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let cst = parser.parse_program();
    (lower::lower_program(cst), parser.into_diagnostics())
}

/// Parse a single expression. `None` if no expression could be
/// recognized at all.
pub fn parse_expression(source: &str) -> (Option<Expr>, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let expr = parser.parse_expr().ok().map(lower::lower_expr);
    parser.expect_eof();
    (expr, parser.into_diagnostics())
}

/// Parse a single statement.
pub fn parse_statement(source: &str) -> (Option<Stmt>, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let stmt = parser.parse_stmt().ok().map(lower::lower_stmt);
    parser.expect_eof();
    (stmt, parser.into_diagnostics())
}

impl Parser {
    fn expect_eof(&mut self) {
        if !matches!(self.peek(), TokenKind::Eof) {
            self.error(format!(
                "unexpected trailing input: {}",
                self.peek().describe()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crobots_ast::ast::{BinOp, ExprKind, StmtKind};

    fn expr(source: &str) -> Expr {
        let (expr, diagnostics) = parse_expression(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        expr.unwrap()
    }

    fn stmt(source: &str) -> Stmt {
        let (stmt, diagnostics) = parse_statement(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        stmt.unwrap()
    }

    #[test]
    fn same_level_operators_stay_in_one_chain() {
        let ExprKind::Chain { lhs, links } = expr("1 - 2 + 3").node else {
            panic!("expected chain");
        };
        assert_eq!(lhs.node, ExprKind::Const(1));
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].op, BinOp::Sub);
        assert_eq!(links[1].op, BinOp::Add);
    }

    #[test]
    fn tighter_level_nests_inside_looser() {
        let ExprKind::Chain { lhs, links } = expr("1 + 2 * 3").node else {
            panic!("expected chain");
        };
        assert_eq!(lhs.node, ExprKind::Const(1));
        assert_eq!(links.len(), 1);
        assert!(matches!(links[0].expr.node, ExprKind::Chain { .. }));
    }

    #[test]
    fn equality_is_not_an_assignment() {
        assert!(matches!(expr("x == y").node, ExprKind::Chain { .. }));
        assert!(matches!(expr("x = y").node, ExprKind::Assign { .. }));
    }

    #[test]
    fn assignment_targets_keep_source_order() {
        let ExprKind::Assign { targets, rhs } = expr("o += q = p *= 2").node else {
            panic!("expected assignment");
        };
        let names: Vec<&str> = targets.iter().map(|t| t.name.node.as_str()).collect();
        assert_eq!(names, ["o", "q", "p"]);
        assert_eq!(targets[0].op, Some(BinOp::Add));
        assert_eq!(targets[1].op, None);
        assert_eq!(targets[2].op, Some(BinOp::Mul));
        assert_eq!(rhs.node, ExprKind::Const(2));
    }

    #[test]
    fn increment_lowers_to_compound_assignment() {
        let ExprKind::Assign { targets, rhs } = expr("++x").node else {
            panic!("expected assignment");
        };
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].op, Some(BinOp::Add));
        assert_eq!(rhs.node, ExprKind::Const(1));

        let ExprKind::Assign { targets, .. } = expr("--x").node else {
            panic!("expected assignment");
        };
        assert_eq!(targets[0].op, Some(BinOp::Sub));
    }

    #[test]
    fn do_while_lowers_to_body_then_while() {
        let StmtKind::Block(body) = stmt("do x = x + 1; while (x < 3);").node else {
            panic!("expected block");
        };
        assert_eq!(body.len(), 2);
        assert!(matches!(body[0].node, StmtKind::Expr(_)));
        assert!(matches!(body[1].node, StmtKind::While { .. }));
    }

    #[test]
    fn missing_else_yields_no_node() {
        let StmtKind::If { else_branch, .. } = stmt("if (x) return;").node else {
            panic!("expected if");
        };
        assert!(else_branch.is_none());
    }

    #[test]
    fn child_spans_are_contained_in_parents() {
        let chain = expr("10 + 20");
        let ExprKind::Chain { ref lhs, ref links } = chain.node else {
            panic!("expected chain");
        };
        assert!(chain.span.contains(lhs.span));
        assert!(chain.span.contains(links[0].expr.span));
    }

    #[test]
    fn parenthesized_node_takes_the_outer_range() {
        let inner = expr("(2 + 2)");
        assert_eq!(inner.span.start, 0);
        assert_eq!(inner.span.end, 7);
    }

    #[test]
    fn doc_comment_attaches_to_function() {
        let (program, diagnostics) = parse_program("/** spins in place */\nmain() { }\n");
        assert!(diagnostics.is_empty());
        let StmtKind::FunctionDecl(ref decl) = program.items[0].node else {
            panic!("expected function");
        };
        assert_eq!(decl.doc.as_deref(), Some("spins in place"));
    }

    #[test]
    fn recovery_keeps_the_rest_of_the_function() {
        let (program, diagnostics) = parse_program("main() { int x = ; x = 1; }");
        assert!(!diagnostics.is_empty());
        let StmtKind::FunctionDecl(ref decl) = program.items[0].node else {
            panic!("expected function");
        };
        assert_eq!(decl.body.len(), 1);
        assert!(matches!(decl.body[0].node, StmtKind::Expr(_)));
    }

    #[test]
    fn recovery_keeps_later_top_level_items() {
        let (program, diagnostics) = parse_program("??? garbage\nmain() { return 1; }");
        assert!(!diagnostics.is_empty());
        assert!(program
            .items
            .iter()
            .any(|item| matches!(item.node, StmtKind::FunctionDecl(_))));
    }
}
