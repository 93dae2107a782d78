//! Integer operator semantics.
//!
//! Arithmetic wraps on `i64`. `/` and `%` truncate toward zero,
//! comparisons yield 1/0, and `&&`/`||`/`!` are plain bitwise
//! operations with no short-circuiting.

use crate::fault::Fault;
use crobots_ast::ast::{BinOp, UnOp};

pub fn apply_binop(op: BinOp, lhs: i64, rhs: i64) -> Result<i64, Fault> {
    Ok(match op {
        BinOp::Add => lhs.wrapping_add(rhs),
        BinOp::Sub => lhs.wrapping_sub(rhs),
        BinOp::Mul => lhs.wrapping_mul(rhs),
        BinOp::Div => {
            if rhs == 0 {
                return Err(Fault::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        BinOp::Rem => {
            if rhs == 0 {
                return Err(Fault::DivisionByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        BinOp::Eq => (lhs == rhs) as i64,
        BinOp::NotEq => (lhs != rhs) as i64,
        BinOp::Lt => (lhs < rhs) as i64,
        BinOp::Gt => (lhs > rhs) as i64,
        BinOp::LtEq => (lhs <= rhs) as i64,
        BinOp::GtEq => (lhs >= rhs) as i64,
        BinOp::And => lhs & rhs,
        BinOp::Or => lhs | rhs,
        BinOp::Shl => lhs.wrapping_shl(rhs as u32),
        BinOp::Shr => lhs.wrapping_shr(rhs as u32),
    })
}

pub fn apply_unop(op: UnOp, value: i64) -> i64 {
    match op {
        UnOp::Neg => value.wrapping_neg(),
        UnOp::Not => !value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(apply_binop(BinOp::Div, 361, 360), Ok(1));
        assert_eq!(apply_binop(BinOp::Div, -361, 360), Ok(-1));
        assert_eq!(apply_binop(BinOp::Div, 359, 360), Ok(0));
        assert_eq!(apply_binop(BinOp::Div, -359, 360), Ok(0));
    }

    #[test]
    fn remainder_follows_the_dividend_sign() {
        assert_eq!(apply_binop(BinOp::Rem, 8, 10), Ok(8));
        assert_eq!(apply_binop(BinOp::Rem, -8, 10), Ok(-8));
    }

    #[test]
    fn division_by_zero_is_a_fault() {
        assert_eq!(apply_binop(BinOp::Div, 1, 0), Err(Fault::DivisionByZero));
        assert_eq!(apply_binop(BinOp::Rem, 1, 0), Err(Fault::DivisionByZero));
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        assert_eq!(apply_binop(BinOp::Lt, 1, 2), Ok(1));
        assert_eq!(apply_binop(BinOp::GtEq, 1, 2), Ok(0));
        assert_eq!(apply_binop(BinOp::Eq, 5, 5), Ok(1));
    }

    #[test]
    fn logical_operators_are_bitwise() {
        assert_eq!(apply_binop(BinOp::And, 6, 3), Ok(2));
        assert_eq!(apply_binop(BinOp::Or, 6, 3), Ok(7));
        assert_eq!(apply_unop(UnOp::Not, 0), -1);
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(apply_binop(BinOp::Add, i64::MAX, 1), Ok(i64::MIN));
        assert_eq!(apply_unop(UnOp::Neg, i64::MIN), i64::MIN);
    }
}
