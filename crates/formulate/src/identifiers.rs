//! Canonical identifiers and the per-dialect spelling tables.
//!
//! Every operator, function and constant has one dialect-independent id.
//! Each dialect maps its surface spellings onto those ids (`resolve`) and
//! picks one preferred spelling per id for output (`spell`). A `None`
//! spelling means the dialect cannot express the id at all.
//!
//! Function names are matched case-insensitively on the bare name, after the
//! namespace (`TMath::`, `ROOT::Math::`, dotted `TMath.`) has been checked
//! against the dialect's allow-list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

// ============================================================================
// Dialects
// ============================================================================

/// A formula dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ROOT `TFormula` expressions.
    Root,
    /// `numexpr` expressions (Python operator grammar, no arrays).
    Numexpr,
    /// ROOT `TTreeFormula`: TFormula plus `$` aggregates and `:` multi-output.
    #[serde(rename = "ttreeformula")]
    TTreeFormula,
    /// Vectorized NumPy source. Output only.
    Python,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Root,
        Dialect::Numexpr,
        Dialect::TTreeFormula,
        Dialect::Python,
    ];

    /// Lower-case dialect name, as accepted by [`Dialect::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Root => "root",
            Dialect::Numexpr => "numexpr",
            Dialect::TTreeFormula => "ttreeformula",
            Dialect::Python => "python",
        }
    }

    /// Look up a dialect by name (case-insensitive, a few common aliases).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "root" | "tformula" => Some(Dialect::Root),
            "numexpr" => Some(Dialect::Numexpr),
            "ttreeformula" | "ttree" => Some(Dialect::TTreeFormula),
            "python" | "numpy" => Some(Dialect::Python),
            _ => None,
        }
    }

    /// ROOT and TTreeFormula share operators, functions and output syntax.
    pub fn is_root_family(self) -> bool {
        matches!(self, Dialect::Root | Dialect::TTreeFormula)
    }

    /// Whether `x[i]` array indexing exists in this dialect.
    pub fn allows_indexing(self) -> bool {
        !matches!(self, Dialect::Numexpr)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Binary operators.
///
/// `And`/`Or` are logical and `BitAnd`/`BitOr` are bitwise. The distinction
/// is fixed when a formula is read; writers never guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

/// Unary (prefix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Pos,
    Neg,
    /// Logical negation.
    Not,
    /// Bitwise inversion.
    BitNot,
}

/// Operator families. Nesting two different operators of a grouped family
/// is always parenthesized on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Arithmetic,
    Power,
    Comparison,
    Logical,
    Bitwise,
    Shift,
}

impl Family {
    pub fn is_grouped(self) -> bool {
        matches!(self, Family::Comparison | Family::Logical | Family::Bitwise)
    }
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::Mul => "Mul",
            BinaryOp::Div => "Div",
            BinaryOp::Mod => "Mod",
            BinaryOp::Pow => "Pow",
            BinaryOp::Eq => "Eq",
            BinaryOp::Ne => "Ne",
            BinaryOp::Lt => "Lt",
            BinaryOp::Le => "Le",
            BinaryOp::Gt => "Gt",
            BinaryOp::Ge => "Ge",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::BitAnd => "BitAnd",
            BinaryOp::BitOr => "BitOr",
            BinaryOp::BitXor => "BitXor",
            BinaryOp::LShift => "LShift",
            BinaryOp::RShift => "RShift",
        }
    }

    pub fn family(self) -> Family {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                Family::Arithmetic
            }
            BinaryOp::Pow => Family::Power,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => Family::Comparison,
            BinaryOp::And | BinaryOp::Or => Family::Logical,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => Family::Bitwise,
            BinaryOp::LShift | BinaryOp::RShift => Family::Shift,
        }
    }

    /// Preferred spelling in `dialect`, or `None` when it has no such operator.
    ///
    /// ROOT spells `Pow` as `TMath::Power`; writers may switch to an infix
    /// form (see `PowerStyle`).
    pub fn spell(self, dialect: Dialect) -> Option<Spelling> {
        use Spelling::{Function, Operator};
        let common = match self {
            BinaryOp::Add => Some(Operator("+")),
            BinaryOp::Sub => Some(Operator("-")),
            BinaryOp::Mul => Some(Operator("*")),
            BinaryOp::Div => Some(Operator("/")),
            BinaryOp::Mod => Some(Operator("%")),
            BinaryOp::Eq => Some(Operator("==")),
            BinaryOp::Ne => Some(Operator("!=")),
            BinaryOp::Lt => Some(Operator("<")),
            BinaryOp::Le => Some(Operator("<=")),
            BinaryOp::Gt => Some(Operator(">")),
            BinaryOp::Ge => Some(Operator(">=")),
            BinaryOp::LShift => Some(Operator("<<")),
            BinaryOp::RShift => Some(Operator(">>")),
            _ => None,
        };
        if common.is_some() {
            return common;
        }
        match (dialect, self) {
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::Pow) => Some(Function("TMath::Power")),
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::And) => Some(Operator("&&")),
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::Or) => Some(Operator("||")),
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::BitAnd) => Some(Operator("&")),
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::BitOr) => Some(Operator("|")),
            // `^` is already power in ROOT.
            (Dialect::Root | Dialect::TTreeFormula, BinaryOp::BitXor) => None,

            (Dialect::Numexpr, BinaryOp::Pow) => Some(Operator("**")),
            (Dialect::Numexpr, BinaryOp::And | BinaryOp::BitAnd) => Some(Operator("&")),
            (Dialect::Numexpr, BinaryOp::Or | BinaryOp::BitOr) => Some(Operator("|")),
            (Dialect::Numexpr, BinaryOp::BitXor) => Some(Operator("^")),

            (Dialect::Python, BinaryOp::Pow) => Some(Operator("**")),
            (Dialect::Python, BinaryOp::And) => Some(Operator("and")),
            (Dialect::Python, BinaryOp::Or) => Some(Operator("or")),
            (Dialect::Python, BinaryOp::BitAnd) => Some(Function("np.bitwise_and")),
            (Dialect::Python, BinaryOp::BitOr) => Some(Function("np.bitwise_or")),
            (Dialect::Python, BinaryOp::BitXor) => Some(Function("np.bitwise_xor")),

            _ => None,
        }
    }
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Pos => "Pos",
            UnaryOp::Neg => "Neg",
            UnaryOp::Not => "Not",
            UnaryOp::BitNot => "BitNot",
        }
    }

    pub fn spell(self, dialect: Dialect) -> Option<Spelling> {
        use Spelling::{Function, Operator};
        match (dialect, self) {
            (_, UnaryOp::Pos) => Some(Operator("+")),
            (_, UnaryOp::Neg) => Some(Operator("-")),
            (Dialect::Root | Dialect::TTreeFormula, UnaryOp::Not) => Some(Operator("!")),
            (Dialect::Root | Dialect::TTreeFormula, UnaryOp::BitNot) => Some(Operator("~")),
            (Dialect::Numexpr, UnaryOp::Not | UnaryOp::BitNot) => Some(Operator("~")),
            (Dialect::Python, UnaryOp::Not) => Some(Operator("not")),
            (Dialect::Python, UnaryOp::BitNot) => Some(Function("np.invert")),
        }
    }
}

/// How a dialect writes an operator: as an operator token, or as a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    Operator(&'static str),
    Function(&'static str),
}

/// Resolve a binary operator token read from `dialect` source.
pub fn resolve_binary(dialect: Dialect, token: &str) -> Option<BinaryOp> {
    let op = match token {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "**" => BinaryOp::Pow,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "<<" => BinaryOp::LShift,
        ">>" => BinaryOp::RShift,
        _ => {
            return match (dialect, token) {
                (Dialect::Root | Dialect::TTreeFormula, "^") => Some(BinaryOp::Pow),
                (Dialect::Root | Dialect::TTreeFormula, "&&") => Some(BinaryOp::And),
                (Dialect::Root | Dialect::TTreeFormula, "||") => Some(BinaryOp::Or),
                (Dialect::Root | Dialect::TTreeFormula, "&") => Some(BinaryOp::BitAnd),
                (Dialect::Root | Dialect::TTreeFormula, "|") => Some(BinaryOp::BitOr),
                (Dialect::Numexpr, "^") => Some(BinaryOp::BitXor),
                (Dialect::Numexpr, "&") => Some(BinaryOp::And),
                (Dialect::Numexpr, "|") => Some(BinaryOp::Or),
                _ => None,
            };
        }
    };
    (dialect != Dialect::Python).then_some(op)
}

/// Resolve a prefix operator token read from `dialect` source.
pub fn resolve_unary(dialect: Dialect, token: &str) -> Option<UnaryOp> {
    match (dialect, token) {
        (Dialect::Python, _) => None,
        (_, "+") => Some(UnaryOp::Pos),
        (_, "-") => Some(UnaryOp::Neg),
        (Dialect::Root | Dialect::TTreeFormula, "!") => Some(UnaryOp::Not),
        (Dialect::Root | Dialect::TTreeFormula, "~") => Some(UnaryOp::BitNot),
        (Dialect::Numexpr, "~") => Some(UnaryOp::Not),
        _ => None,
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Functions known to at least one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    Sqrt,
    Abs,
    Exp,
    Log,
    Log10,
    Log2,
    Log1p,
    Expm1,
    Sin,
    Cos,
    Tan,
    ArcSin,
    ArcCos,
    ArcTan,
    ArcTan2,
    Sinh,
    Cosh,
    Tanh,
    ArcSinh,
    ArcCosh,
    ArcTanh,
    Floor,
    Ceil,
    Min,
    Max,
    Where,
    Factorial,
    Erf,
    Erfc,
    Sign,
    Hypot,
    /// `Sum$(x)`: sum over the innermost array dimension.
    Sum,
    /// `Min$(x)`
    Minimum,
    /// `Max$(x)`
    Maximum,
    /// `Length$(x)`
    Length,
    /// `MinIf$(x, cond)`
    MinIf,
    /// `MaxIf$(x, cond)`
    MaxIf,
    /// Top-level `a:b:c` list of outputs.
    MultiOutput,
}

impl Function {
    pub const ALL: [Function; 38] = [
        Function::Sqrt,
        Function::Abs,
        Function::Exp,
        Function::Log,
        Function::Log10,
        Function::Log2,
        Function::Log1p,
        Function::Expm1,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::ArcSin,
        Function::ArcCos,
        Function::ArcTan,
        Function::ArcTan2,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::ArcSinh,
        Function::ArcCosh,
        Function::ArcTanh,
        Function::Floor,
        Function::Ceil,
        Function::Min,
        Function::Max,
        Function::Where,
        Function::Factorial,
        Function::Erf,
        Function::Erfc,
        Function::Sign,
        Function::Hypot,
        Function::Sum,
        Function::Minimum,
        Function::Maximum,
        Function::Length,
        Function::MinIf,
        Function::MaxIf,
        Function::MultiOutput,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sqrt => "Sqrt",
            Function::Abs => "Abs",
            Function::Exp => "Exp",
            Function::Log => "Log",
            Function::Log10 => "Log10",
            Function::Log2 => "Log2",
            Function::Log1p => "Log1p",
            Function::Expm1 => "Expm1",
            Function::Sin => "Sin",
            Function::Cos => "Cos",
            Function::Tan => "Tan",
            Function::ArcSin => "ArcSin",
            Function::ArcCos => "ArcCos",
            Function::ArcTan => "ArcTan",
            Function::ArcTan2 => "ArcTan2",
            Function::Sinh => "Sinh",
            Function::Cosh => "Cosh",
            Function::Tanh => "Tanh",
            Function::ArcSinh => "ArcSinh",
            Function::ArcCosh => "ArcCosh",
            Function::ArcTanh => "ArcTanh",
            Function::Floor => "Floor",
            Function::Ceil => "Ceil",
            Function::Min => "Min",
            Function::Max => "Max",
            Function::Where => "Where",
            Function::Factorial => "Factorial",
            Function::Erf => "Erf",
            Function::Erfc => "Erfc",
            Function::Sign => "Sign",
            Function::Hypot => "Hypot",
            Function::Sum => "Sum",
            Function::Minimum => "Minimum",
            Function::Maximum => "Maximum",
            Function::Length => "Length",
            Function::MinIf => "MinIf",
            Function::MaxIf => "MaxIf",
            Function::MultiOutput => "MultiOutput",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Function::ArcTan2
            | Function::Min
            | Function::Max
            | Function::Sign
            | Function::Hypot
            | Function::MinIf
            | Function::MaxIf => Arity::Exact(2),
            Function::Where => Arity::Exact(3),
            Function::MultiOutput => Arity::AtLeast(2),
            _ => Arity::Exact(1),
        }
    }

    /// TTreeFormula `$` aggregates over the innermost array dimension.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            Function::Sum
                | Function::Minimum
                | Function::Maximum
                | Function::Length
                | Function::MinIf
                | Function::MaxIf
        )
    }

    /// Preferred spelling in `dialect`, or `None` when unsupported there.
    ///
    /// `MultiOutput` has no call spelling in any dialect; writers handle it.
    pub fn spell(self, dialect: Dialect) -> Option<&'static str> {
        match dialect {
            Dialect::Root | Dialect::TTreeFormula => self.root_spelling(),
            Dialect::Numexpr => self.numexpr_spelling(),
            Dialect::Python => self.python_spelling(),
        }
    }

    fn root_spelling(self) -> Option<&'static str> {
        Some(match self {
            Function::Sqrt => "TMath::Sqrt",
            Function::Abs => "TMath::Abs",
            Function::Exp => "TMath::Exp",
            Function::Log => "TMath::Log",
            Function::Log10 => "TMath::Log10",
            Function::Log2 => "TMath::Log2",
            Function::Sin => "TMath::Sin",
            Function::Cos => "TMath::Cos",
            Function::Tan => "TMath::Tan",
            Function::ArcSin => "TMath::ASin",
            Function::ArcCos => "TMath::ACos",
            Function::ArcTan => "TMath::ATan",
            Function::ArcTan2 => "TMath::ATan2",
            Function::Sinh => "TMath::SinH",
            Function::Cosh => "TMath::CosH",
            Function::Tanh => "TMath::TanH",
            Function::ArcSinh => "TMath::ASinH",
            Function::ArcCosh => "TMath::ACosH",
            Function::ArcTanh => "TMath::ATanH",
            Function::Floor => "TMath::Floor",
            Function::Ceil => "TMath::Ceil",
            Function::Min => "TMath::Min",
            Function::Max => "TMath::Max",
            Function::Factorial => "TMath::Factorial",
            Function::Erf => "TMath::Erf",
            Function::Erfc => "TMath::Erfc",
            Function::Sign => "TMath::Sign",
            Function::Hypot => "TMath::Hypot",
            Function::Sum => "Sum$",
            Function::Minimum => "Min$",
            Function::Maximum => "Max$",
            Function::Length => "Length$",
            Function::MinIf => "MinIf$",
            Function::MaxIf => "MaxIf$",
            Function::Log1p | Function::Expm1 | Function::Where | Function::MultiOutput => {
                return None;
            }
        })
    }

    fn numexpr_spelling(self) -> Option<&'static str> {
        Some(match self {
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Log1p => "log1p",
            Function::Expm1 => "expm1",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::ArcSin => "arcsin",
            Function::ArcCos => "arccos",
            Function::ArcTan => "arctan",
            Function::ArcTan2 => "arctan2",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::ArcSinh => "arcsinh",
            Function::ArcCosh => "arccosh",
            Function::ArcTanh => "arctanh",
            Function::Where => "where",
            _ => return None,
        })
    }

    fn python_spelling(self) -> Option<&'static str> {
        Some(match self {
            Function::Sqrt => "np.sqrt",
            Function::Abs => "np.abs",
            Function::Exp => "np.exp",
            Function::Log => "np.log",
            Function::Log10 => "np.log10",
            Function::Log2 => "np.log2",
            Function::Log1p => "np.log1p",
            Function::Expm1 => "np.expm1",
            Function::Sin => "np.sin",
            Function::Cos => "np.cos",
            Function::Tan => "np.tan",
            Function::ArcSin => "np.arcsin",
            Function::ArcCos => "np.arccos",
            Function::ArcTan => "np.arctan",
            Function::ArcTan2 => "np.arctan2",
            Function::Sinh => "np.sinh",
            Function::Cosh => "np.cosh",
            Function::Tanh => "np.tanh",
            Function::ArcSinh => "np.arcsinh",
            Function::ArcCosh => "np.arccosh",
            Function::ArcTanh => "np.arctanh",
            Function::Floor => "np.floor",
            Function::Ceil => "np.ceil",
            Function::Min => "np.minimum",
            Function::Max => "np.maximum",
            Function::Where => "np.where",
            Function::Factorial => "scipy.special.factorial",
            Function::Erf => "scipy.special.erf",
            Function::Erfc => "scipy.special.erfc",
            Function::Sign => "np.copysign",
            Function::Hypot => "np.hypot",
            Function::Sum => "ak.sum",
            Function::Minimum | Function::MinIf => "ak.min",
            Function::Maximum | Function::MaxIf => "ak.max",
            Function::Length => "ak.num",
            Function::MultiOutput => return None,
        })
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Named constants (zero-argument identifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    E,
    Sqrt2,
    Ln10,
    LogE,
    /// Speed of light in m/s.
    C,
    /// Gravitational constant.
    G,
    /// Planck constant.
    H,
    /// Boltzmann constant.
    K,
    /// Avogadro constant.
    Na,
    /// Molar gas constant.
    R,
    Infinity,
    QuietNaN,
}

impl Constant {
    pub const ALL: [Constant; 13] = [
        Constant::Pi,
        Constant::E,
        Constant::Sqrt2,
        Constant::Ln10,
        Constant::LogE,
        Constant::C,
        Constant::G,
        Constant::H,
        Constant::K,
        Constant::Na,
        Constant::R,
        Constant::Infinity,
        Constant::QuietNaN,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "Pi",
            Constant::E => "E",
            Constant::Sqrt2 => "Sqrt2",
            Constant::Ln10 => "Ln10",
            Constant::LogE => "LogE",
            Constant::C => "C",
            Constant::G => "G",
            Constant::H => "H",
            Constant::K => "K",
            Constant::Na => "Na",
            Constant::R => "R",
            Constant::Infinity => "Infinity",
            Constant::QuietNaN => "QuietNaN",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Sqrt2 => std::f64::consts::SQRT_2,
            Constant::Ln10 => std::f64::consts::LN_10,
            Constant::LogE => std::f64::consts::LOG10_E,
            Constant::C => 299_792_458.0,
            Constant::G => 6.674_30e-11,
            Constant::H => 6.626_070_15e-34,
            Constant::K => 1.380_649e-23,
            Constant::Na => 6.022_140_76e23,
            Constant::R => 8.314_462_618_153_24,
            Constant::Infinity => f64::INFINITY,
            Constant::QuietNaN => f64::NAN,
        }
    }

    /// Named spelling in `dialect`. `None` means the dialect writes the
    /// numeric value instead.
    pub fn spell(self, dialect: Dialect) -> Option<&'static str> {
        match dialect {
            Dialect::Root | Dialect::TTreeFormula => Some(match self {
                Constant::Pi => "TMath::Pi()",
                Constant::E => "TMath::E()",
                Constant::Sqrt2 => "TMath::Sqrt2()",
                Constant::Ln10 => "TMath::Ln10()",
                Constant::LogE => "TMath::LogE()",
                Constant::C => "TMath::C()",
                Constant::G => "TMath::G()",
                Constant::H => "TMath::H()",
                Constant::K => "TMath::K()",
                Constant::Na => "TMath::Na()",
                Constant::R => "TMath::R()",
                Constant::Infinity => "TMath::Infinity()",
                Constant::QuietNaN => "TMath::QuietNaN()",
            }),
            Dialect::Python => match self {
                Constant::Pi => Some("np.pi"),
                Constant::E => Some("np.e"),
                Constant::Infinity => Some("np.inf"),
                Constant::QuietNaN => Some("np.nan"),
                _ => None,
            },
            Dialect::Numexpr => None,
        }
    }
}

// ============================================================================
// Name resolution
// ============================================================================

/// What a function-call name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier {
    Function(Function),
    Constant(Constant),
    /// An operator spelled as a two-argument function (`TMath::Power`, `pow`).
    Operator(BinaryOp),
}

/// Which part of a qualified name failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    Name,
    Namespace,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::Name => f.write_str("identifier"),
            Unresolved::Namespace => f.write_str("namespace"),
        }
    }
}

/// A spelling that is not in the dialect's tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {reason} `{name}` in {dialect}")]
pub struct UnknownIdentifier {
    pub name: String,
    pub dialect: Dialect,
    pub reason: Unresolved,
}

const ROOT_NAMESPACES: &[&str] = &["tmath", "root", "root::math", "root::tmath", "std"];

const ROOT_ALIASES: &[(&str, Identifier)] = &[
    ("fabs", Identifier::Function(Function::Abs)),
    ("arcsin", Identifier::Function(Function::ArcSin)),
    ("arccos", Identifier::Function(Function::ArcCos)),
    ("arctan", Identifier::Function(Function::ArcTan)),
    ("arctan2", Identifier::Function(Function::ArcTan2)),
    ("arcsinh", Identifier::Function(Function::ArcSinh)),
    ("arccosh", Identifier::Function(Function::ArcCosh)),
    ("arctanh", Identifier::Function(Function::ArcTanh)),
    ("pow", Identifier::Operator(BinaryOp::Pow)),
];

type Table = HashMap<String, Identifier>;

static ROOT_TABLE: LazyLock<Table> = LazyLock::new(|| build_table(Dialect::Root));
static TTREEFORMULA_TABLE: LazyLock<Table> =
    LazyLock::new(|| build_table(Dialect::TTreeFormula));
static NUMEXPR_TABLE: LazyLock<Table> = LazyLock::new(|| build_table(Dialect::Numexpr));

/// Bare, lower-cased lookup key for a preferred spelling.
fn table_key(spelling: &str) -> String {
    let bare = spelling.rsplit("::").next().unwrap_or(spelling);
    bare.trim_end_matches("()").to_ascii_lowercase()
}

fn build_table(dialect: Dialect) -> Table {
    let mut table = Table::new();

    for function in Function::ALL {
        if function.is_aggregate() && dialect != Dialect::TTreeFormula {
            continue;
        }
        if let Some(spelling) = function.spell(dialect) {
            table.insert(table_key(spelling), Identifier::Function(function));
        }
    }

    if dialect.is_root_family() {
        for constant in Constant::ALL {
            if let Some(spelling) = constant.spell(dialect) {
                table.insert(table_key(spelling), Identifier::Constant(constant));
            }
        }
        if let Some(Spelling::Function(spelling)) = BinaryOp::Pow.spell(dialect) {
            table.insert(table_key(spelling), Identifier::Operator(BinaryOp::Pow));
        }
        for (alias, id) in ROOT_ALIASES {
            table.insert((*alias).to_string(), *id);
        }
    }

    table
}

fn table(dialect: Dialect) -> Option<&'static Table> {
    match dialect {
        Dialect::Root => Some(&ROOT_TABLE),
        Dialect::TTreeFormula => Some(&TTREEFORMULA_TABLE),
        Dialect::Numexpr => Some(&NUMEXPR_TABLE),
        Dialect::Python => None,
    }
}

fn namespaces(dialect: Dialect) -> &'static [&'static str] {
    if dialect.is_root_family() {
        ROOT_NAMESPACES
    } else {
        &[]
    }
}

/// Resolve a (possibly `::`- or `.`-qualified) function or constant name.
pub fn resolve(dialect: Dialect, spelling: &str) -> Result<Identifier, UnknownIdentifier> {
    let unknown = |reason| UnknownIdentifier {
        name: spelling.to_string(),
        dialect,
        reason,
    };

    let normalized = spelling.replace('.', "::");
    let bare = match normalized.rsplit_once("::") {
        Some((namespace, bare)) => {
            let namespace = namespace.to_ascii_lowercase();
            if !namespaces(dialect).contains(&namespace.as_str()) {
                return Err(unknown(Unresolved::Namespace));
            }
            bare
        }
        None => normalized.as_str(),
    };

    table(dialect)
        .and_then(|table| table.get(&bare.to_ascii_lowercase()))
        .copied()
        .ok_or_else(|| unknown(Unresolved::Name))
}

// ============================================================================
// Symbols
// ============================================================================

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Reserved words of the Python output target.
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}
