//! ROOT TFormula reader.

use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::lower::LowerOptions;
use crate::trace::Tracer;
use crate::traits::{ParseError, Reader};

/// Static instance of the ROOT reader for registry.
pub static ROOT_READER: RootReader = RootReader;

/// ROOT reader implementing the Reader trait.
pub struct RootReader;

impl Reader for RootReader {
    fn dialect(&self) -> Dialect {
        Dialect::Root
    }

    fn read_with(
        &self,
        source: &str,
        options: &LowerOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<Expr, ParseError> {
        super::read(Dialect::Root, source, options, tracer)
    }
}

/// Parse a TFormula expression.
pub fn read_root(source: &str) -> Result<Expr, ParseError> {
    ROOT_READER.read(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_root() {
        let expr = read_root("TMath::Sqrt(x) + TMath::Pi()").unwrap();
        assert_eq!(expr.to_string(), "Add(Sqrt(Symbol(x)), Constant(Pi))");
    }

    #[test]
    fn test_syntax_error_offset() {
        assert_eq!(
            read_root("1 +"),
            Err(ParseError::Syntax {
                message: "unexpected end of input".into(),
                offset: 3
            })
        );
    }

    #[test]
    fn test_lowering_errors_are_wrapped() {
        assert!(matches!(
            read_root("TMath::Nope(1)"),
            Err(ParseError::Lowering(_))
        ));
    }
}
