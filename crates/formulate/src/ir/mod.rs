//! Canonical, dialect-independent formula AST.
//!
//! Readers lower into [`Expr`]; writers render from it. The tree owns its
//! children and is never mutated after lowering. `index` fields record the
//! source byte offset and are ignored by [`StructureEq`].

mod structure_eq;

pub use structure_eq::StructureEq;

use crate::identifiers::{BinaryOp, Constant, Dialect, Function, UnaryOp};
use crate::output::{self, RenderOptions};
use crate::traits::RenderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A formula expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Symbol {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// A named constant, read from a zero-argument call such as `TMath::Pi()`.
    Constant {
        id: Constant,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// Array indexing, `base[i][j]`.
    Matrix {
        base: Box<Expr>,
        indices: Vec<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// Explicit grouping kept from source parentheses.
    Slice {
        inner: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// Blank input.
    Empty,
}

// Constructors
impl Expr {
    pub fn literal(value: f64) -> Self {
        Expr::Literal { value, index: None }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol {
            name: name.into(),
            index: None,
        }
    }

    pub fn constant(id: Constant) -> Self {
        Expr::Constant { id, index: None }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
            index: None,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            index: None,
        }
    }

    pub fn call(function: Function, args: Vec<Expr>) -> Self {
        Expr::Call {
            function,
            args,
            index: None,
        }
    }

    pub fn matrix(base: Expr, indices: Vec<Expr>) -> Self {
        Expr::Matrix {
            base: Box::new(base),
            indices,
            index: None,
        }
    }

    pub fn slice(inner: Expr) -> Self {
        Expr::Slice {
            inner: Box::new(inner),
            index: None,
        }
    }

    pub fn empty() -> Self {
        Expr::Empty
    }

    /// Attach a source offset. No effect on `Empty`.
    pub fn with_index(mut self, offset: usize) -> Self {
        match &mut self {
            Expr::Literal { index, .. }
            | Expr::Symbol { index, .. }
            | Expr::Constant { index, .. }
            | Expr::Unary { index, .. }
            | Expr::Binary { index, .. }
            | Expr::Call { index, .. }
            | Expr::Matrix { index, .. }
            | Expr::Slice { index, .. } => *index = Some(offset),
            Expr::Empty => {}
        }
        self
    }

    /// Source offset, if the node came from a reader.
    pub fn index(&self) -> Option<usize> {
        match self {
            Expr::Literal { index, .. }
            | Expr::Symbol { index, .. }
            | Expr::Constant { index, .. }
            | Expr::Unary { index, .. }
            | Expr::Binary { index, .. }
            | Expr::Call { index, .. }
            | Expr::Matrix { index, .. }
            | Expr::Slice { index, .. } => *index,
            Expr::Empty => None,
        }
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal { .. } | Expr::Symbol { .. } | Expr::Constant { .. } | Expr::Empty => {
                Vec::new()
            }
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Call { args, .. } => args.iter().collect(),
            Expr::Matrix { base, indices, .. } => {
                std::iter::once(base.as_ref()).chain(indices).collect()
            }
            Expr::Slice { inner, .. } => vec![inner.as_ref()],
        }
    }

    /// Names of every symbol in the expression, sorted.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if let Expr::Symbol { name, .. } = expr {
                names.insert(name.clone());
            }
            stack.extend(expr.children());
        }
        names
    }
}

// Rendering
impl Expr {
    pub fn render(&self, dialect: Dialect, options: &RenderOptions) -> Result<String, RenderError> {
        output::render(self, dialect, options, None)
    }

    pub fn to_root(&self) -> Result<String, RenderError> {
        self.render(Dialect::Root, &RenderOptions::default())
    }

    pub fn to_numexpr(&self) -> Result<String, RenderError> {
        self.render(Dialect::Numexpr, &RenderOptions::default())
    }

    pub fn to_python(&self) -> Result<String, RenderError> {
        self.render(Dialect::Python, &RenderOptions::default())
    }
}

/// Canonical form: `Add(Literal(1), Symbol(x))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => write!(f, "Literal({})", format_number(*value)),
            Expr::Symbol { name, .. } => write!(f, "Symbol({name})"),
            Expr::Constant { id, .. } => write!(f, "Constant({})", id.name()),
            Expr::Unary { op, operand, .. } => write!(f, "{}({operand})", op.name()),
            Expr::Binary {
                op, left, right, ..
            } => write!(f, "{}({left}, {right})", op.name()),
            Expr::Call { function, args, .. } => {
                write!(f, "{}(", function.name())?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Matrix { base, indices, .. } => {
                write!(f, "Matrix({base}, ")?;
                write_list(f, indices)?;
                f.write_str(")")
            }
            Expr::Slice { inner, .. } => write!(f, "Slice({inner})"),
            Expr::Empty => f.write_str("Empty"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Shortest text for a finite number: `1`, `0.5`, `1e300`.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < 1e16 {
        return format!("{}", value as i64);
    }
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-5) {
        return format!("{value:e}");
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_form() {
        let expr = Expr::binary(Expr::literal(1.0), BinaryOp::Add, Expr::symbol("x"));
        assert_eq!(expr.to_string(), "Add(Literal(1), Symbol(x))");

        let expr = Expr::call(Function::Sqrt, vec![Expr::literal(4.0)]);
        assert_eq!(expr.to_string(), "Sqrt(Literal(4))");

        let expr = Expr::matrix(Expr::symbol("a"), vec![Expr::literal(0.0), Expr::symbol("i")]);
        assert_eq!(expr.to_string(), "Matrix(Symbol(a), Literal(0), Symbol(i))");

        assert_eq!(Expr::constant(Constant::Pi).to_string(), "Constant(Pi)");
        assert_eq!(Expr::empty().to_string(), "Empty");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(2.5e-7), "2.5e-7");
        assert_eq!(format_number(299_792_458.0), "299792458");
    }

    #[test]
    fn test_free_variables() {
        let expr = Expr::binary(
            Expr::call(Function::Sqrt, vec![Expr::symbol("y")]),
            BinaryOp::Mul,
            Expr::binary(Expr::symbol("x"), BinaryOp::Add, Expr::symbol("y")),
        );
        let names: Vec<_> = expr.free_variables().into_iter().collect();
        assert_eq!(names, ["x", "y"]);
        assert!(Expr::constant(Constant::E).free_variables().is_empty());
    }

    #[test]
    fn test_with_index_is_recorded() {
        let expr = Expr::symbol("x").with_index(7);
        assert_eq!(expr.index(), Some(7));
        assert_eq!(Expr::empty().with_index(3).index(), None);
    }

    #[test]
    fn test_serde_skips_missing_index() {
        let expr = Expr::binary(Expr::symbol("a"), BinaryOp::Pow, Expr::literal(2.0));
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "binary",
                "op": "Pow",
                "left": {"type": "symbol", "name": "a"},
                "right": {"type": "literal", "value": 2.0}
            })
        );
        let back: Expr = serde_json::from_value(json).unwrap();
        assert_eq!(back, expr);
    }
}
