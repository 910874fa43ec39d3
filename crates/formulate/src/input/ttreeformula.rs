//! TTreeFormula reader: TFormula plus `$` aggregates and `a:b` outputs.

use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::lower::LowerOptions;
use crate::trace::Tracer;
use crate::traits::{ParseError, Reader};

/// Static instance of the TTreeFormula reader for registry.
pub static TTREEFORMULA_READER: TTreeFormulaReader = TTreeFormulaReader;

/// TTreeFormula reader implementing the Reader trait.
pub struct TTreeFormulaReader;

impl Reader for TTreeFormulaReader {
    fn dialect(&self) -> Dialect {
        Dialect::TTreeFormula
    }

    fn read_with(
        &self,
        source: &str,
        options: &LowerOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<Expr, ParseError> {
        super::read(Dialect::TTreeFormula, source, options, tracer)
    }
}

/// Parse a TTreeFormula expression.
pub fn read_ttreeformula(source: &str) -> Result<Expr, ParseError> {
    TTREEFORMULA_READER.read(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates_and_outputs() {
        let expr = read_ttreeformula("Sum$(pt > 20):Length$(pt)").unwrap();
        assert_eq!(
            expr.to_string(),
            "MultiOutput(Sum(Gt(Symbol(pt), Literal(20))), Length(Symbol(pt)))"
        );
        assert_eq!(expr.to_root().unwrap(), "Sum$(pt > 20):Length$(pt)");

        let expr = read_ttreeformula("MaxIf$(pt, abs(eta) < 2.4)").unwrap();
        assert_eq!(
            expr.to_python().unwrap(),
            "ak.max(pt[np.abs(eta) < 2.4], axis=-1)"
        );
    }
}
