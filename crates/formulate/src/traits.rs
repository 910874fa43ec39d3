//! Traits for dialect readers and writers.

use crate::identifiers::Dialect;
use crate::ir::Expr;
use crate::lower::{LowerOptions, LoweringError};
use crate::output::RenderOptions;
use crate::trace::Tracer;

/// Error that can occur when reading a formula into the AST.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at {offset}: {message}")]
    Syntax { message: String, offset: usize },

    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error(transparent)]
    Lowering(#[from] LoweringError),
}

/// Error that can occur when rendering the AST in a dialect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("{construct} is not supported in {dialect}")]
    Unsupported {
        construct: String,
        dialect: Dialect,
    },

    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Error from a one-shot translation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("no reader for {0}")]
    NoReader(Dialect),

    #[error("no writer for {0}")]
    NoWriter(Dialect),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A reader parses formula text into the canonical AST.
pub trait Reader: Send + Sync {
    /// Dialect this reader accepts.
    fn dialect(&self) -> Dialect;

    /// Parse with default options and no tracing.
    fn read(&self, source: &str) -> Result<Expr, ParseError> {
        self.read_with(source, &LowerOptions::default(), None)
    }

    /// Parse with explicit options.
    fn read_with(
        &self,
        source: &str,
        options: &LowerOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<Expr, ParseError>;
}

/// A writer renders the canonical AST as formula text.
pub trait Writer: Send + Sync {
    /// Dialects this writer can produce (ROOT and TTreeFormula share one).
    fn dialects(&self) -> &'static [Dialect];

    /// Render with default options and no tracing.
    fn write(&self, expr: &Expr) -> Result<String, RenderError> {
        self.write_with(expr, &RenderOptions::default(), None)
    }

    /// Render with explicit options.
    fn write_with(
        &self,
        expr: &Expr,
        options: &RenderOptions,
        tracer: Option<&dyn Tracer>,
    ) -> Result<String, RenderError>;
}
