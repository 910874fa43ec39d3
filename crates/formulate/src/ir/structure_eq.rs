//! Structural equality for the formula AST.
//!
//! `structure_eq` compares trees ignoring source offsets (`index`), which
//! differ whenever the same formula is written in another dialect.
//!
//! # Core Fields (must match exactly)
//!
//! - Operators, functions and constants
//! - Symbol names and literal values
//! - Tree shape, including `Slice` grouping

use super::Expr;

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores the `index` offsets.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Expr {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Literal { value: a, .. }, Expr::Literal { value: b, .. }) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (Expr::Symbol { name: a, .. }, Expr::Symbol { name: b, .. }) => a == b,
            (Expr::Constant { id: a, .. }, Expr::Constant { id: b, .. }) => a == b,
            (
                Expr::Unary {
                    op: o1, operand: e1, ..
                },
                Expr::Unary {
                    op: o2, operand: e2, ..
                },
            ) => o1 == o2 && e1.structure_eq(e2),
            (
                Expr::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                    ..
                },
                Expr::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                    ..
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),
            (
                Expr::Call {
                    function: f1,
                    args: a1,
                    ..
                },
                Expr::Call {
                    function: f2,
                    args: a2,
                    ..
                },
            ) => f1 == f2 && vec_structure_eq(a1, a2),
            (
                Expr::Matrix {
                    base: b1,
                    indices: i1,
                    ..
                },
                Expr::Matrix {
                    base: b2,
                    indices: i2,
                    ..
                },
            ) => b1.structure_eq(b2) && vec_structure_eq(i1, i2),
            (Expr::Slice { inner: a, .. }, Expr::Slice { inner: b, .. }) => a.structure_eq(b),
            (Expr::Empty, Expr::Empty) => true,
            _ => false,
        }
    }
}

impl<T: StructureEq + ?Sized> StructureEq for Box<T> {
    fn structure_eq(&self, other: &Self) -> bool {
        (**self).structure_eq(&**other)
    }
}

fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}
