//! Lowering: raw parse tree to canonical AST.
//!
//! Works on any [`SyntaxNode`]. Each node kind maps to one [`Shape`]; a kind
//! outside that closed set fails with [`LoweringError::UnknownShape`].
//! Lowering is all-or-nothing: the first error aborts.

use crate::identifiers::{self, Arity, Dialect, Identifier, UnknownIdentifier, Unresolved};
use crate::ir::Expr;
use crate::trace::{self, TraceEvent, Tracer};
use crate::tree::{Leaf, LeafKind, SyntaxElement, SyntaxNode};
use serde::{Deserialize, Serialize};

/// Options for lowering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerOptions {
    /// Maximum nesting depth of the parse tree.
    pub max_depth: usize,
    /// Keep source parentheses as `Slice` nodes.
    pub keep_groups: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            keep_groups: false,
        }
    }
}

/// Error that can occur while lowering a parse tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoweringError {
    #[error("{source} at {offset}")]
    UnknownIdentifier {
        source: UnknownIdentifier,
        offset: usize,
    },

    #[error("`{name}` takes {expected} argument(s), got {got} at {offset}")]
    ArityMismatch {
        name: String,
        expected: Arity,
        got: usize,
        offset: usize,
    },

    #[error("unknown tree shape `{kind}` at {offset}")]
    UnknownShape { kind: String, offset: usize },

    #[error("malformed `{kind}` node at {offset}: {reason}")]
    Malformed {
        kind: String,
        reason: &'static str,
        offset: usize,
    },

    #[error("invalid symbol `{name}` at {offset}")]
    InvalidSymbol { name: String, offset: usize },

    #[error("invalid number `{text}` at {offset}")]
    InvalidLiteral { text: String, offset: usize },

    #[error("empty index at {offset}")]
    EmptyIndex { offset: usize },

    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Parse-tree node kinds understood by lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Start,
    Empty,
    MultiOut,
    Binary,
    Unary,
    Paren,
    Literal,
    Symbol,
    Call,
    Name,
    Arguments,
    Matrix,
    Index,
}

impl Shape {
    fn from_kind(kind: &str) -> Option<Self> {
        Some(match kind {
            "start" => Shape::Start,
            "empty" => Shape::Empty,
            "multi_out" => Shape::MultiOut,
            "binary" => Shape::Binary,
            "unary" => Shape::Unary,
            "paren" => Shape::Paren,
            "literal" => Shape::Literal,
            "symbol" => Shape::Symbol,
            "call" => Shape::Call,
            "name" => Shape::Name,
            "arguments" => Shape::Arguments,
            "matrix" => Shape::Matrix,
            "index" => Shape::Index,
            _ => return None,
        })
    }

    /// Whether `dialect` has this construct at all.
    fn exists_in(self, dialect: Dialect) -> bool {
        match self {
            Shape::MultiOut => dialect == Dialect::TTreeFormula,
            Shape::Matrix | Shape::Index => dialect.allows_indexing(),
            _ => true,
        }
    }
}

/// Lower a parse tree read from `dialect` source.
pub fn lower<N: SyntaxNode>(
    tree: &N,
    dialect: Dialect,
    options: &LowerOptions,
    tracer: Option<&dyn Tracer>,
) -> Result<Expr, LoweringError> {
    Lowerer {
        dialect,
        options,
        tracer,
    }
    .expr(tree, 1)
}

struct Lowerer<'o> {
    dialect: Dialect,
    options: &'o LowerOptions,
    tracer: Option<&'o dyn Tracer>,
}

impl Lowerer<'_> {
    fn expr<N: SyntaxNode>(&self, node: &N, depth: usize) -> Result<Expr, LoweringError> {
        if depth > self.options.max_depth {
            return Err(LoweringError::TooDeep {
                limit: self.options.max_depth,
            });
        }
        trace::emit(
            self.tracer,
            TraceEvent::Lower {
                kind: node.kind(),
                depth,
            },
        );

        let offset = node.offset();
        let shape = Shape::from_kind(node.kind())
            .filter(|shape| shape.exists_in(self.dialect))
            .ok_or_else(|| LoweringError::UnknownShape {
                kind: node.kind().to_string(),
                offset,
            })?;
        let children = node.children();

        match shape {
            Shape::Start => match children.as_slice() {
                [SyntaxElement::Node(body)] if body.kind() == "multi_out" => {
                    self.multi_out(*body, depth + 1)
                }
                [SyntaxElement::Node(body)] => self.expr(*body, depth + 1),
                _ => Err(malformed(node, "expected a single expression")),
            },

            Shape::Empty => Ok(Expr::Empty),

            Shape::MultiOut => Err(malformed(node, "multiple outputs must be the whole formula")),

            Shape::Binary => match children.as_slice() {
                [
                    SyntaxElement::Node(left),
                    SyntaxElement::Leaf(op),
                    SyntaxElement::Node(right),
                ] => {
                    let op_id = identifiers::resolve_binary(self.dialect, op.text)
                        .ok_or_else(|| self.unknown_operator(op))?;
                    let left = self.expr(*left, depth + 1)?;
                    let right = self.expr(*right, depth + 1)?;
                    Ok(Expr::binary(left, op_id, right).with_index(offset))
                }
                _ => Err(malformed(node, "expected operand, operator, operand")),
            },

            Shape::Unary => match children.as_slice() {
                [SyntaxElement::Leaf(op), SyntaxElement::Node(operand)] => {
                    let op_id = identifiers::resolve_unary(self.dialect, op.text)
                        .ok_or_else(|| self.unknown_operator(op))?;
                    let operand = self.expr(*operand, depth + 1)?;
                    Ok(Expr::unary(op_id, operand).with_index(offset))
                }
                _ => Err(malformed(node, "expected operator, operand")),
            },

            Shape::Paren => match children.as_slice() {
                [SyntaxElement::Node(inner)] => {
                    let inner = self.expr(*inner, depth + 1)?;
                    if self.options.keep_groups {
                        Ok(Expr::slice(inner).with_index(offset))
                    } else {
                        Ok(inner)
                    }
                }
                _ => Err(malformed(node, "expected a single expression")),
            },

            Shape::Literal => match children.as_slice() {
                [SyntaxElement::Leaf(leaf)] if leaf.kind == LeafKind::Number => {
                    self.literal(leaf)
                }
                _ => Err(malformed(node, "expected a number")),
            },

            Shape::Symbol => match children.as_slice() {
                [SyntaxElement::Leaf(leaf)] if leaf.kind == LeafKind::Identifier => {
                    self.symbol(leaf)
                }
                _ => Err(malformed(node, "expected an identifier")),
            },

            Shape::Call => match children.as_slice() {
                [SyntaxElement::Node(name), SyntaxElement::Node(arguments)] => {
                    self.call(*name, *arguments, offset, depth)
                }
                _ => Err(malformed(node, "expected name, arguments")),
            },

            Shape::Matrix => {
                let Some((SyntaxElement::Node(base), indices)) = children.split_first() else {
                    return Err(malformed(node, "expected a base expression"));
                };
                if indices.is_empty() {
                    return Err(malformed(node, "expected at least one index"));
                }
                let base = self.expr(*base, depth + 1)?;
                let indices = indices
                    .iter()
                    .map(|index| match index {
                        SyntaxElement::Node(index) => self.index(*index, depth + 1),
                        SyntaxElement::Leaf(leaf) => Err(LoweringError::Malformed {
                            kind: node.kind().to_string(),
                            reason: "expected an index",
                            offset: leaf.offset,
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::matrix(base, indices).with_index(offset))
            }

            Shape::Name | Shape::Arguments | Shape::Index => {
                Err(malformed(node, "not an expression"))
            }
        }
    }

    /// `a:b:c` at the top of a TTreeFormula.
    fn multi_out<N: SyntaxNode>(&self, node: &N, depth: usize) -> Result<Expr, LoweringError> {
        if self.dialect != Dialect::TTreeFormula {
            return Err(LoweringError::UnknownShape {
                kind: node.kind().to_string(),
                offset: node.offset(),
            });
        }
        trace::emit(
            self.tracer,
            TraceEvent::Lower {
                kind: node.kind(),
                depth,
            },
        );
        let outputs = self.expressions(node, depth)?;
        if outputs.len() < 2 {
            return Err(malformed(node, "expected at least two outputs"));
        }
        Ok(Expr::call(identifiers::Function::MultiOutput, outputs).with_index(node.offset()))
    }

    fn index<N: SyntaxNode>(&self, node: &N, depth: usize) -> Result<Expr, LoweringError> {
        if node.kind() != "index" {
            return Err(malformed(node, "expected an index"));
        }
        match node.children().as_slice() {
            [] => Err(LoweringError::EmptyIndex {
                offset: node.offset(),
            }),
            [SyntaxElement::Node(inner)] => self.expr(*inner, depth + 1),
            _ => Err(malformed(node, "expected a single index expression")),
        }
    }

    fn call<N: SyntaxNode>(
        &self,
        name: &N,
        arguments: &N,
        offset: usize,
        depth: usize,
    ) -> Result<Expr, LoweringError> {
        let spelled = qualified_name(name)?;
        let id = identifiers::resolve(self.dialect, &spelled)
            .map_err(|source| LoweringError::UnknownIdentifier { source, offset })?;

        if arguments.kind() != "arguments" {
            return Err(malformed(arguments, "expected an argument list"));
        }
        let got = arguments.children().len();
        let expected = match id {
            Identifier::Constant(_) => Arity::Exact(0),
            Identifier::Operator(_) => Arity::Exact(2),
            Identifier::Function(function) => function.arity(),
        };
        if !expected.accepts(got) {
            return Err(LoweringError::ArityMismatch {
                name: spelled,
                expected,
                got,
                offset,
            });
        }

        let mut args = self.expressions(arguments, depth)?;
        let expr = match id {
            Identifier::Constant(constant) => Expr::constant(constant),
            Identifier::Operator(op) => {
                let right = args.pop();
                let left = args.pop();
                match (left, right) {
                    (Some(left), Some(right)) => Expr::binary(left, op, right),
                    _ => return Err(malformed(arguments, "expected two arguments")),
                }
            }
            Identifier::Function(function) => Expr::call(function, args),
        };
        Ok(expr.with_index(offset))
    }

    /// Lower every child of a list-like node (`arguments`, `multi_out`).
    fn expressions<N: SyntaxNode>(&self, node: &N, depth: usize) -> Result<Vec<Expr>, LoweringError> {
        node.children()
            .into_iter()
            .map(|child| match child {
                SyntaxElement::Node(child) => self.expr(child, depth + 1),
                SyntaxElement::Leaf(_) => Err(malformed(node, "expected only expressions")),
            })
            .collect()
    }

    fn literal(&self, leaf: &Leaf<'_>) -> Result<Expr, LoweringError> {
        let invalid = || LoweringError::InvalidLiteral {
            text: leaf.text.to_string(),
            offset: leaf.offset,
        };
        let value: f64 = leaf.text.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(Expr::literal(value).with_index(leaf.offset))
    }

    fn symbol(&self, leaf: &Leaf<'_>) -> Result<Expr, LoweringError> {
        let name = match self.dialect {
            Dialect::TTreeFormula => leaf.text.strip_suffix('$').unwrap_or(leaf.text),
            _ => leaf.text,
        };
        if !identifiers::is_valid_identifier(name) || identifiers::is_python_keyword(name) {
            return Err(LoweringError::InvalidSymbol {
                name: leaf.text.to_string(),
                offset: leaf.offset,
            });
        }
        Ok(Expr::symbol(name).with_index(leaf.offset))
    }

    fn unknown_operator(&self, op: &Leaf<'_>) -> LoweringError {
        LoweringError::UnknownIdentifier {
            source: UnknownIdentifier {
                name: op.text.to_string(),
                dialect: self.dialect,
                reason: Unresolved::Name,
            },
            offset: op.offset,
        }
    }
}

/// Rebuild `ROOT::Math::sqrt` from the left-recursive `name` chain.
fn qualified_name<N: SyntaxNode>(node: &N) -> Result<String, LoweringError> {
    let mut parts = Vec::new();
    let mut current = node;
    loop {
        if current.kind() != "name" {
            return Err(malformed(current, "expected a name"));
        }
        match current.children().as_slice() {
            [SyntaxElement::Leaf(part)] => {
                parts.push(part.text);
                break;
            }
            [
                SyntaxElement::Node(prefix),
                SyntaxElement::Leaf(separator),
                SyntaxElement::Leaf(part),
            ] => {
                parts.push(part.text);
                parts.push(separator.text);
                current = *prefix;
            }
            _ => return Err(malformed(current, "expected name, separator, identifier")),
        }
    }
    parts.reverse();
    Ok(parts.concat())
}

fn malformed<N: SyntaxNode>(node: &N, reason: &'static str) -> LoweringError {
    LoweringError::Malformed {
        kind: node.kind().to_string(),
        reason,
        offset: node.offset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{self, ParseElement, ParseTree};
    use crate::identifiers::BinaryOp;

    fn lower_with(dialect: Dialect, source: &str, options: &LowerOptions) -> Result<Expr, LoweringError> {
        let tree = grammar::parse(dialect, source, options.max_depth).unwrap();
        lower(&tree, dialect, options, None)
    }

    fn show(dialect: Dialect, source: &str) -> String {
        lower_with(dialect, source, &LowerOptions::default())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_binary_and_calls() {
        assert_eq!(show(Dialect::Numexpr, "1 + 1"), "Add(Literal(1), Literal(1))");
        assert_eq!(show(Dialect::Root, "TMath::Sqrt(4)"), "Sqrt(Literal(4))");
        assert_eq!(show(Dialect::Root, "sqrt(4)"), "Sqrt(Literal(4))");
        assert_eq!(
            show(Dialect::Root, "ROOT::Math::atan2(y, x)"),
            "ArcTan2(Symbol(y), Symbol(x))"
        );
    }

    #[test]
    fn test_operator_identity_depends_on_dialect() {
        assert_eq!(show(Dialect::Root, "a & b"), "BitAnd(Symbol(a), Symbol(b))");
        assert_eq!(show(Dialect::Numexpr, "a & b"), "And(Symbol(a), Symbol(b))");
        assert_eq!(show(Dialect::Root, "a^b"), "Pow(Symbol(a), Symbol(b))");
        assert_eq!(show(Dialect::Numexpr, "a^b"), "BitXor(Symbol(a), Symbol(b))");
        assert_eq!(show(Dialect::Numexpr, "~a"), "Not(Symbol(a))");
        assert_eq!(show(Dialect::Root, "!a"), "Not(Symbol(a))");
    }

    #[test]
    fn test_constants() {
        assert_eq!(show(Dialect::Root, "TMath::Pi()"), "Constant(Pi)");
        assert_eq!(
            lower_with(Dialect::Root, "TMath::Pi(1)", &LowerOptions::default()),
            Err(LoweringError::ArityMismatch {
                name: "TMath::Pi".into(),
                expected: Arity::Exact(0),
                got: 1,
                offset: 0,
            })
        );
    }

    #[test]
    fn test_function_spelled_operator() {
        assert_eq!(show(Dialect::Root, "pow(a, 2)"), "Pow(Symbol(a), Literal(2))");
        assert_eq!(show(Dialect::Root, "TMath::Power(a, 2)"), "Pow(Symbol(a), Literal(2))");
        assert!(matches!(
            lower_with(Dialect::Root, "pow(a)", &LowerOptions::default()),
            Err(LoweringError::ArityMismatch { got: 1, .. })
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            lower_with(Dialect::Root, "TMath::Sqrt(1, 2)", &LowerOptions::default()),
            Err(LoweringError::ArityMismatch {
                name: "TMath::Sqrt".into(),
                expected: Arity::Exact(1),
                got: 2,
                offset: 0,
            })
        );
    }

    #[test]
    fn test_unknown_identifier() {
        let err = lower_with(Dialect::Numexpr, "1 + frob(x)", &LowerOptions::default()).unwrap_err();
        let LoweringError::UnknownIdentifier { source, offset } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(source.name, "frob");
        assert_eq!(offset, 4);
    }

    #[test]
    fn test_ttreeformula_specifics() {
        assert_eq!(show(Dialect::TTreeFormula, "Sum$(x)"), "Sum(Symbol(x))");
        assert_eq!(show(Dialect::TTreeFormula, "Entry$"), "Symbol(Entry)");
        assert_eq!(
            show(Dialect::TTreeFormula, "x:y"),
            "MultiOutput(Symbol(x), Symbol(y))"
        );
        assert_eq!(
            lower_with(Dialect::TTreeFormula, "x[]", &LowerOptions::default()),
            Err(LoweringError::EmptyIndex { offset: 1 })
        );
    }

    #[test]
    fn test_matrix() {
        assert_eq!(
            show(Dialect::Root, "arr[0][i]"),
            "Matrix(Symbol(arr), Literal(0), Symbol(i))"
        );
    }

    #[test]
    fn test_invalid_symbol_and_literal() {
        assert_eq!(
            lower_with(Dialect::Numexpr, "lambda + 1", &LowerOptions::default()),
            Err(LoweringError::InvalidSymbol {
                name: "lambda".into(),
                offset: 0
            })
        );
        assert_eq!(
            lower_with(Dialect::Root, "1e400", &LowerOptions::default()),
            Err(LoweringError::InvalidLiteral {
                text: "1e400".into(),
                offset: 0
            })
        );
    }

    #[test]
    fn test_keep_groups() {
        let options = LowerOptions {
            keep_groups: true,
            ..LowerOptions::default()
        };
        assert_eq!(
            lower_with(Dialect::Root, "(a + b) * c", &options).unwrap().to_string(),
            "Mul(Slice(Add(Symbol(a), Symbol(b))), Symbol(c))"
        );
        assert_eq!(
            show(Dialect::Root, "(a + b) * c"),
            "Mul(Add(Symbol(a), Symbol(b)), Symbol(c))"
        );
    }

    #[test]
    fn test_offsets_are_recorded() {
        let expr = lower_with(Dialect::Numexpr, "a + b", &LowerOptions::default()).unwrap();
        let Expr::Binary {
            op, right, index, ..
        } = expr
        else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(index, Some(0));
        assert_eq!(right.index(), Some(4));
    }

    #[test]
    fn test_unknown_shape() {
        let tree = ParseTree::new(
            "start",
            0,
            vec![ParseElement::Tree(ParseTree::new("lambda", 3, Vec::new()))],
        );
        assert_eq!(
            lower(&tree, Dialect::Root, &LowerOptions::default(), None),
            Err(LoweringError::UnknownShape {
                kind: "lambda".into(),
                offset: 3
            })
        );
    }

    #[test]
    fn test_foreign_matrix_in_numexpr_is_unknown() {
        let tree = grammar::parse(Dialect::Root, "a[0]", 16).unwrap();
        assert!(matches!(
            lower(&tree, Dialect::Numexpr, &LowerOptions::default(), None),
            Err(LoweringError::UnknownShape { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let tree = grammar::parse(Dialect::Root, "-(-(-(-x)))", 64).unwrap();
        let options = LowerOptions {
            max_depth: 4,
            ..LowerOptions::default()
        };
        assert_eq!(
            lower(&tree, Dialect::Root, &options, None),
            Err(LoweringError::TooDeep { limit: 4 })
        );
    }

    #[test]
    fn test_tracer_sees_every_node() {
        let kinds = std::cell::RefCell::new(Vec::new());
        let tracer = |event: &TraceEvent<'_>| {
            if let TraceEvent::Lower { kind, .. } = event {
                kinds.borrow_mut().push(kind.to_string());
            }
        };
        let tree = grammar::parse(Dialect::Root, "f(x)", 16).unwrap();
        let _ = lower(&tree, Dialect::Root, &LowerOptions::default(), Some(&tracer));
        assert_eq!(*kinds.borrow(), ["start", "call"]);

        kinds.borrow_mut().clear();
        let tree = grammar::parse(Dialect::Root, "abs(x)", 16).unwrap();
        lower(&tree, Dialect::Root, &LowerOptions::default(), Some(&tracer)).unwrap();
        assert_eq!(*kinds.borrow(), ["start", "call", "symbol"]);
    }
}
