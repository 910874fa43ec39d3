//! Operator binding tables.
//!
//! The parser and the renderers read the same table, so a rendered formula
//! re-parses to the tree it came from. Higher levels bind tighter.
//!
//! ROOT and TTreeFormula follow C, except that power (`^`, `**`) sits at the
//! unary level and is right-associative. numexpr and Python follow Python:
//! `not` sits below comparisons, comparisons do not chain, and `**` binds
//! tighter than unary minus on its left.

use crate::identifiers::Dialect;

/// Associativity of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    /// `a < b < c` is rejected.
    NonAssoc,
}

/// Binding strength of a binary operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub level: u8,
    pub assoc: Assoc,
}

impl Binding {
    const fn left(level: u8) -> Self {
        Self {
            level,
            assoc: Assoc::Left,
        }
    }

    const fn right(level: u8) -> Self {
        Self {
            level,
            assoc: Assoc::Right,
        }
    }

    const fn non_assoc(level: u8) -> Self {
        Self {
            level,
            assoc: Assoc::NonAssoc,
        }
    }
}

/// Level of an atom or call: binds tighter than any operator.
pub const ATOM: u8 = u8::MAX;

/// Binding for a binary operator token in `dialect`, if it is one.
pub fn binary(dialect: Dialect, token: &str) -> Option<Binding> {
    if dialect.is_root_family() {
        c_binary(token)
    } else {
        python_binary(token)
    }
}

/// Level of a prefix operator token in `dialect`, if it is one.
pub fn unary(dialect: Dialect, token: &str) -> Option<u8> {
    if dialect.is_root_family() {
        matches!(token, "+" | "-" | "!" | "~").then_some(11)
    } else {
        match token {
            "not" => Some(3),
            "+" | "-" | "~" => Some(11),
            _ => None,
        }
    }
}

fn c_binary(token: &str) -> Option<Binding> {
    Some(match token {
        "||" => Binding::left(1),
        "&&" => Binding::left(2),
        "|" => Binding::left(3),
        "&" => Binding::left(5),
        "==" | "!=" => Binding::left(6),
        "<" | "<=" | ">" | ">=" => Binding::left(7),
        "<<" | ">>" => Binding::left(8),
        "+" | "-" => Binding::left(9),
        "*" | "/" | "%" => Binding::left(10),
        "^" | "**" => Binding::right(11),
        _ => return None,
    })
}

fn python_binary(token: &str) -> Option<Binding> {
    Some(match token {
        "or" => Binding::left(1),
        "and" => Binding::left(2),
        "==" | "!=" | "<" | "<=" | ">" | ">=" => Binding::non_assoc(4),
        "|" => Binding::left(5),
        "^" => Binding::left(6),
        "&" => Binding::left(7),
        "<<" | ">>" => Binding::left(8),
        "+" | "-" => Binding::left(9),
        "*" | "/" | "%" => Binding::left(10),
        "**" => Binding::right(12),
        _ => return None,
    })
}
