//! numexpr writer.
//!
//! numexpr has no arrays, aggregates or named constants; constants are
//! written as their values.

use super::{RenderOptions, Target, render};
use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::trace::Tracer;
use crate::traits::{RenderError, Writer};

/// Static instance of the numexpr writer for registry.
pub static NUMEXPR_WRITER: NumexprWriter = NumexprWriter;

/// numexpr writer implementing the Writer trait.
pub struct NumexprWriter;

impl Writer for NumexprWriter {
    fn dialects(&self) -> &'static [Dialect] {
        &[Dialect::Numexpr]
    }

    fn write_with(
        &self,
        expr: &Expr,
        options: &RenderOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<String, RenderError> {
        render(expr, Dialect::Numexpr, options, tracer)
    }
}

pub(crate) struct NumexprTarget;

impl Target for NumexprTarget {
    fn dialect(&self) -> Dialect {
        Dialect::Numexpr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{BinaryOp, Constant, Function, UnaryOp};

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_operators() {
        let expr = Expr::binary(sym("a"), BinaryOp::Pow, sym("b"));
        assert_eq!(NUMEXPR_WRITER.write(&expr).unwrap(), "a**b");
        let expr = Expr::binary(sym("a"), BinaryOp::BitXor, sym("b"));
        assert_eq!(expr.to_numexpr().unwrap(), "a ^ b");
        let expr = Expr::unary(UnaryOp::BitNot, sym("a"));
        assert_eq!(expr.to_numexpr().unwrap(), "~a");
    }

    #[test]
    fn test_constants_become_numbers() {
        let expr = Expr::binary(Expr::literal(2.0), BinaryOp::Mul, Expr::constant(Constant::Pi));
        assert_eq!(expr.to_numexpr().unwrap(), "2 * 3.141592653589793");
        assert_eq!(Expr::constant(Constant::C).to_numexpr().unwrap(), "299792458");
        assert!(Expr::constant(Constant::Infinity).to_numexpr().is_err());
    }

    #[test]
    fn test_calls() {
        let expr = Expr::call(
            Function::Where,
            vec![
                Expr::binary(sym("x"), BinaryOp::Gt, Expr::literal(0.0)),
                sym("x"),
                Expr::literal(0.0),
            ],
        );
        assert_eq!(expr.to_numexpr().unwrap(), "where(x > 0, x, 0)");
    }

    #[test]
    fn test_unsupported_constructs() {
        let cases = [
            Expr::matrix(sym("a"), vec![Expr::literal(0.0)]),
            Expr::call(Function::Sum, vec![sym("a")]),
            Expr::call(Function::Floor, vec![sym("a")]),
            Expr::call(Function::MultiOutput, vec![sym("a"), sym("b")]),
        ];
        for expr in cases {
            assert!(
                matches!(expr.to_numexpr(), Err(RenderError::Unsupported { .. })),
                "{expr}"
            );
        }
    }
}
