//! Formula translation between analysis dialects.
//!
//! `formulate` reads mathematical and boolean expressions written for ROOT
//! (`TFormula`), `TTreeFormula` or `numexpr`, lowers them into one canonical
//! AST, and renders that AST back into any of those dialects or into
//! vectorized NumPy source.
//!
//! # Architecture
//!
//! ```text
//! Source dialects          Canonical AST          Target dialects
//! ───────────────    ─────────────────────    ─────────────────
//! ROOT           ─┐                          ┌─> ROOT
//! numexpr        ─┼─> grammar ─> lower ─> Expr ─> numexpr
//! TTreeFormula   ─┘   (nom)     (tree.rs)    └─> Python
//! ```
//!
//! # Example
//!
//! ```
//! let expr = formulate::parse_root("A && B || C").unwrap();
//! assert_eq!(expr.to_string(), "Or(And(Symbol(A), Symbol(B)), Symbol(C))");
//! assert_eq!(expr.to_numexpr().unwrap(), "(A & B) | C");
//! ```
//!
//! # Operator identity
//!
//! The same token means different things in different dialects: `^` is power
//! in ROOT and exclusive-or in numexpr, `&` is bitwise in ROOT and logical in
//! numexpr. Readers fix the meaning when lowering; writers only ever spell
//! the canonical operator.

pub mod config;
pub mod grammar;
pub mod identifiers;
pub mod input;
pub mod ir;
pub mod lower;
pub mod output;
pub mod precedence;
pub mod registry;
pub mod trace;
pub mod traits;
pub mod tree;

// Re-exports: AST
pub use identifiers::{BinaryOp, Constant, Dialect, Function, UnaryOp};
pub use ir::{Expr, StructureEq};

// Re-exports: options, errors, traits
pub use config::{ConfigError, FormulateConfig};
pub use lower::{LowerOptions, LoweringError};
pub use output::{PowerStyle, RenderOptions};
pub use registry::translate;
pub use trace::{LogTracer, TraceEvent, Tracer};
pub use traits::{ParseError, Reader, RenderError, TranslateError, Writer};

/// Parse `source` as `dialect` with explicit options and an optional tracer.
pub fn parse(
    dialect: Dialect,
    source: &str,
    options: &LowerOptions,
    tracer: Option<&dyn Tracer>,
) -> Result<Expr, ParseError> {
    input::read(dialect, source, options, tracer)
}

/// Parse a ROOT `TFormula` expression.
pub fn parse_root(source: &str) -> Result<Expr, ParseError> {
    input::read_root(source)
}

/// Parse a `numexpr` expression.
pub fn parse_numexpr(source: &str) -> Result<Expr, ParseError> {
    input::read_numexpr(source)
}

/// Parse a ROOT `TTreeFormula` expression.
pub fn parse_ttreeformula(source: &str) -> Result<Expr, ParseError> {
    input::read_ttreeformula(source)
}

pub use parse_numexpr as from_numexpr;
pub use parse_root as from_root;
pub use parse_ttreeformula as from_ttreeformula;
