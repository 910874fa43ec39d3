//! numexpr reader.

use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::lower::LowerOptions;
use crate::trace::Tracer;
use crate::traits::{ParseError, Reader};

/// Static instance of the numexpr reader for registry.
pub static NUMEXPR_READER: NumexprReader = NumexprReader;

/// numexpr reader implementing the Reader trait.
pub struct NumexprReader;

impl Reader for NumexprReader {
    fn dialect(&self) -> Dialect {
        Dialect::Numexpr
    }

    fn read_with(
        &self,
        source: &str,
        options: &LowerOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<Expr, ParseError> {
        super::read(Dialect::Numexpr, source, options, tracer)
    }
}

/// Parse a numexpr expression.
pub fn read_numexpr(source: &str) -> Result<Expr, ParseError> {
    NUMEXPR_READER.read(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_numexpr() {
        let expr = read_numexpr("where(x > 0, sqrt(x), -x)").unwrap();
        assert_eq!(
            expr.to_string(),
            "Where(Gt(Symbol(x), Literal(0)), Sqrt(Symbol(x)), Neg(Symbol(x)))"
        );
    }

    #[test]
    fn test_root_only_syntax_is_rejected() {
        assert!(read_numexpr("a && b").is_err());
        assert!(read_numexpr("TMath::Sqrt(x)").is_err());
        assert!(read_numexpr("x[0]").is_err());
    }
}
