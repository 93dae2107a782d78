use crate::cst::{CstAssignTarget, CstExpr, CstExprKind};
use crate::parser::Parser;
use crobots_ast::ast::{BinOp, UnOp};
use crobots_ast::Spanned;
use crobots_lexer::TokenKind;

/// Binary precedence table, loosest level first. One parse routine
/// walks this table instead of spelling out a rule per level; each row
/// is parsed as a flat left-associative chain.
const BIN_LEVELS: &[&[BinOp]] = &[
    &[BinOp::Or],
    &[BinOp::And],
    &[BinOp::Eq, BinOp::NotEq],
    &[BinOp::Lt, BinOp::Gt, BinOp::LtEq, BinOp::GtEq],
    &[BinOp::Shl, BinOp::Shr],
    &[BinOp::Add, BinOp::Sub],
    &[BinOp::Mul, BinOp::Div, BinOp::Rem],
];

fn binop_of(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::NotEq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::LtEq => BinOp::LtEq,
        TokenKind::GtEq => BinOp::GtEq,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        _ => return None,
    })
}

/// `None` for plain `=`, the arithmetic op for a compound form.
fn assign_op_of(kind: &TokenKind) -> Option<Option<BinOp>> {
    Some(match kind {
        TokenKind::Eq => None,
        TokenKind::PlusEq => Some(BinOp::Add),
        TokenKind::MinusEq => Some(BinOp::Sub),
        TokenKind::StarEq => Some(BinOp::Mul),
        TokenKind::SlashEq => Some(BinOp::Div),
        TokenKind::PercentEq => Some(BinOp::Rem),
        _ => return None,
    })
}

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<CstExpr, ()> {
        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            return self.parse_incr();
        }
        self.parse_assign()
    }

    /// `++x` / `--x`.
    fn parse_incr(&mut self) -> Result<CstExpr, ()> {
        let start = self.start_span();
        let decrement = matches!(self.peek(), TokenKind::MinusMinus);
        self.advance();
        let name = self.expect_ident()?;
        Ok(Spanned::new(
            CstExprKind::Incr { decrement, name },
            self.end_span(start),
        ))
    }

    /// Gather `name op=` target pairs by lookahead, then parse one
    /// right-hand expression. Zero targets elides the wrapper.
    fn parse_assign(&mut self) -> Result<CstExpr, ()> {
        let start = self.start_span();
        let mut targets = Vec::new();
        while matches!(self.peek(), TokenKind::Ident(_)) {
            let Some(op) = assign_op_of(self.peek_at(1)) else {
                break;
            };
            let name = self.expect_ident()?;
            self.advance(); // the assignment operator
            targets.push(CstAssignTarget { op, name });
        }

        let rhs = if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            self.parse_incr()?
        } else {
            self.parse_binary(0)?
        };

        if targets.is_empty() {
            Ok(rhs)
        } else {
            Ok(Spanned::new(
                CstExprKind::Assign {
                    targets,
                    rhs: Box::new(rhs),
                },
                self.end_span(start),
            ))
        }
    }

    /// Parse one level of the precedence table as a left-associative
    /// chain; levels past the end of the table fall through to unary.
    fn parse_binary(&mut self, level: usize) -> Result<CstExpr, ()> {
        let Some(ops) = BIN_LEVELS.get(level) else {
            return self.parse_unary();
        };

        let start = self.start_span();
        let lhs = self.parse_binary(level + 1)?;
        let mut pairs = Vec::new();
        while let Some(op) = binop_of(self.peek()).filter(|op| ops.contains(op)) {
            self.advance();
            let rhs = self.parse_binary(level + 1)?;
            pairs.push((op, rhs));
        }

        if pairs.is_empty() {
            Ok(lhs)
        } else {
            Ok(Spanned::new(
                CstExprKind::Binary {
                    lhs: Box::new(lhs),
                    pairs,
                },
                self.end_span(start),
            ))
        }
    }

    fn parse_unary(&mut self) -> Result<CstExpr, ()> {
        let start = self.start_span();
        let op = match self.peek() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Spanned::new(
                CstExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.end_span(start),
            ));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<CstExpr, ()> {
        let start = self.start_span();
        match self.peek().clone() {
            TokenKind::Int(value) => {
                let tok = self.advance();
                Ok(Spanned::new(CstExprKind::Int(value), tok.span))
            }

            TokenKind::Ident(_) if matches!(self.peek_at(1), TokenKind::LParen) => {
                let callee = self.expect_ident()?;
                self.advance(); // (
                let mut args = Vec::new();
                if !matches!(self.peek(), TokenKind::RParen) {
                    args.push(self.parse_expr()?);
                    while matches!(self.peek(), TokenKind::Comma) {
                        self.advance();
                        args.push(self.parse_expr()?);
                    }
                }
                self.expect(&TokenKind::RParen)?;
                Ok(Spanned::new(
                    CstExprKind::Call { callee, args },
                    self.end_span(start),
                ))
            }

            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                let span = name.span;
                Ok(Spanned::new(CstExprKind::Ident(name.node), span))
            }

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Spanned::new(
                    CstExprKind::Paren(Box::new(inner)),
                    self.end_span(start),
                ))
            }

            other => {
                self.error(format!("expected expression, found {}", other.describe()));
                Err(())
            }
        }
    }
}
