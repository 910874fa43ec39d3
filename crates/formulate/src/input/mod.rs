//! Input readers - parse formula text into the AST.

pub mod numexpr;
pub mod root;
pub mod ttreeformula;

pub use numexpr::{NUMEXPR_READER, NumexprReader, read_numexpr};
pub use root::{ROOT_READER, RootReader, read_root};
pub use ttreeformula::{TTREEFORMULA_READER, TTreeFormulaReader, read_ttreeformula};

use crate::grammar;
use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::lower::{self, LowerOptions};
use crate::trace::Tracer;
use crate::traits::ParseError;

/// Tokenize, parse and lower `source` as `dialect`.
pub(crate) fn read(
    dialect: Dialect,
    source: &str,
    options: &LowerOptions,
    tracer: Option<&dyn Tracer>,
) -> Result<Expr, ParseError> {
    let tree = grammar::parse(dialect, source, options.max_depth)?;
    tracing::debug!(%dialect, height = tree.height, "parsed formula");
    Ok(lower::lower(&tree, dialect, options, tracer)?)
}
