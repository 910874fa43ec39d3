//! ROOT writer (TFormula and TTreeFormula).

use super::{Emitter, PowerStyle, RenderOptions, Target, render};
use crate::identifiers::{BinaryOp, Dialect, Spelling};
use crate::ir::Expr;
use crate::trace::Tracer;
use crate::traits::{RenderError, Writer};

/// Static instance of the ROOT writer for registry.
pub static ROOT_WRITER: RootWriter = RootWriter;

/// ROOT writer implementing the Writer trait.
pub struct RootWriter;

impl Writer for RootWriter {
    fn dialects(&self) -> &'static [Dialect] {
        &[Dialect::Root, Dialect::TTreeFormula]
    }

    fn write_with(
        &self,
        expr: &Expr,
        options: &RenderOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<String, RenderError> {
        render(expr, Dialect::Root, options, tracer)
    }
}

pub(crate) struct RootTarget {
    pub(crate) dialect: Dialect,
    pub(crate) power: PowerStyle,
}

impl Target for RootTarget {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn binary(&self, op: BinaryOp) -> Option<Spelling> {
        match (op, self.power) {
            (BinaryOp::Pow, PowerStyle::Caret) => Some(Spelling::Operator("^")),
            (BinaryOp::Pow, PowerStyle::DoubleStar) => Some(Spelling::Operator("**")),
            _ => op.spell(self.dialect),
        }
    }

    fn matrix(
        &self,
        emitter: &mut Emitter<'_>,
        base: &Expr,
        indices: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        emitter.write_operand(base, depth)?;
        for index in indices {
            emitter.push("[");
            emitter.write_child(index, false, depth)?;
            emitter.push("]");
        }
        Ok(())
    }

    fn multi_output(
        &self,
        emitter: &mut Emitter<'_>,
        outputs: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        emitter.write_separated(outputs.iter(), ":", depth)
    }
}
