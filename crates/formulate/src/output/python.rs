//! Python writer: vectorized NumPy source.
//!
//! Jagged-array aggregates use Awkward Array (`ak.sum(x, axis=-1)`);
//! special functions come from `scipy.special`.

use super::{Emitter, RenderOptions, Target, render};
use crate::identifiers::{Dialect, Function};
use crate::ir::Expr;
use crate::trace::Tracer;
use crate::traits::{RenderError, Writer};

/// Static instance of the Python writer for registry.
pub static PYTHON_WRITER: PythonWriter = PythonWriter;

/// Python writer implementing the Writer trait.
pub struct PythonWriter;

impl Writer for PythonWriter {
    fn dialects(&self) -> &'static [Dialect] {
        &[Dialect::Python]
    }

    fn write_with(
        &self,
        expr: &Expr,
        options: &RenderOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<String, RenderError> {
        render(expr, Dialect::Python, options, tracer)
    }
}

pub(crate) struct PythonTarget;

impl Target for PythonTarget {
    fn dialect(&self) -> Dialect {
        Dialect::Python
    }

    fn call(
        &self,
        emitter: &mut Emitter<'_>,
        function: Function,
        args: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        let name = function
            .spell(Dialect::Python)
            .ok_or_else(|| emitter.unsupported(function.name()))?;

        match (function, args) {
            (Function::MinIf | Function::MaxIf, [values, condition]) => {
                // ak.min(x[cond], axis=-1)
                emitter.push(name);
                emitter.push("(");
                emitter.write_operand(values, depth)?;
                emitter.push("[");
                emitter.write_child(condition, false, depth)?;
                emitter.push("], axis=-1)");
                Ok(())
            }
            (_, [values]) if function.is_aggregate() => {
                emitter.push(name);
                emitter.push("(");
                emitter.write_child(values, false, depth)?;
                emitter.push(", axis=-1)");
                Ok(())
            }
            _ if function.is_aggregate() => Err(emitter.unsupported(function.name())),
            _ => emitter.write_call_named(name, args.iter(), depth),
        }
    }

    fn matrix(
        &self,
        emitter: &mut Emitter<'_>,
        base: &Expr,
        indices: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        // The first axis is the event axis.
        emitter.write_operand(base, depth)?;
        emitter.push("[:");
        for index in indices {
            emitter.push(", ");
            emitter.write_child(index, false, depth)?;
        }
        emitter.push("]");
        Ok(())
    }

    fn multi_output(
        &self,
        emitter: &mut Emitter<'_>,
        outputs: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        emitter.write_separated(outputs.iter(), ", ", depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{BinaryOp, Constant, UnaryOp};

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_logical_operators_are_keywords() {
        let expr = Expr::binary(
            Expr::unary(UnaryOp::Not, sym("a")),
            BinaryOp::And,
            Expr::binary(sym("b"), BinaryOp::Lt, Expr::literal(1.0)),
        );
        assert_eq!(PYTHON_WRITER.write(&expr).unwrap(), "not a and b < 1");
    }

    #[test]
    fn test_bitwise_operators_are_calls() {
        let expr = Expr::binary(sym("a"), BinaryOp::BitAnd, sym("b"));
        assert_eq!(expr.to_python().unwrap(), "np.bitwise_and(a, b)");
        let expr = Expr::binary(sym("a"), BinaryOp::BitXor, sym("b"));
        assert_eq!(expr.to_python().unwrap(), "np.bitwise_xor(a, b)");
        let expr = Expr::unary(UnaryOp::BitNot, sym("a"));
        assert_eq!(expr.to_python().unwrap(), "np.invert(a)");
    }

    #[test]
    fn test_functions_and_constants() {
        let expr = Expr::call(
            Function::Sqrt,
            vec![Expr::binary(
                Expr::constant(Constant::Pi),
                BinaryOp::Mul,
                Expr::constant(Constant::Sqrt2),
            )],
        );
        assert_eq!(expr.to_python().unwrap(), "np.sqrt(np.pi * 1.4142135623730951)");
        let expr = Expr::call(Function::Erf, vec![sym("x")]);
        assert_eq!(expr.to_python().unwrap(), "scipy.special.erf(x)");
        assert_eq!(Expr::constant(Constant::QuietNaN).to_python().unwrap(), "np.nan");
    }

    #[test]
    fn test_aggregates() {
        let expr = Expr::call(Function::Sum, vec![sym("pt")]);
        assert_eq!(expr.to_python().unwrap(), "ak.sum(pt, axis=-1)");
        let expr = Expr::call(Function::Length, vec![sym("pt")]);
        assert_eq!(expr.to_python().unwrap(), "ak.num(pt, axis=-1)");
        let expr = Expr::call(
            Function::MaxIf,
            vec![
                Expr::binary(sym("pt"), BinaryOp::Mul, Expr::literal(2.0)),
                Expr::binary(sym("eta"), BinaryOp::Lt, Expr::literal(2.4)),
            ],
        );
        assert_eq!(expr.to_python().unwrap(), "ak.max((pt * 2)[eta < 2.4], axis=-1)");
    }

    #[test]
    fn test_matrix_and_multi_output() {
        let expr = Expr::matrix(sym("jets"), vec![Expr::literal(0.0), sym("i")]);
        assert_eq!(expr.to_python().unwrap(), "jets[:, 0, i]");
        let expr = Expr::call(Function::MultiOutput, vec![sym("x"), sym("y")]);
        assert_eq!(expr.to_python().unwrap(), "x, y");
    }
}
