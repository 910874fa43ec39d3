//! Output writers - render the AST as formula text.
//!
//! One [`Emitter`] walks the tree for every dialect. A [`Target`] supplies
//! what differs: operator spellings, calls, constants, indexing and
//! multi-output. Parentheses are decided here, from the same binding table
//! the parser uses, so rendered text re-parses to the same tree.

pub mod numexpr;
pub mod python;
pub mod root;

pub use numexpr::{NUMEXPR_WRITER, NumexprWriter};
pub use python::{PYTHON_WRITER, PythonWriter};
pub use root::{ROOT_WRITER, RootWriter};

use crate::identifiers::{BinaryOp, Constant, Dialect, Function, Spelling, UnaryOp};
use crate::ir::{Expr, format_number};
use crate::precedence::{self, Assoc, Binding};
use crate::trace::{self, TraceEvent, Tracer};
use crate::traits::RenderError;
use serde::{Deserialize, Serialize};

/// How ROOT output spells `Pow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PowerStyle {
    /// `TMath::Power(a, b)`
    #[default]
    Function,
    /// `a^b`
    Caret,
    /// `a**b`
    DoubleStar,
}

/// Options for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub power: PowerStyle,
    /// Maximum nesting depth of the AST.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            power: PowerStyle::Function,
            max_depth: 256,
        }
    }
}

/// Render `expr` as `dialect` text.
pub fn render(
    expr: &Expr,
    dialect: Dialect,
    options: &RenderOptions,
    tracer: Option<&dyn Tracer>,
) -> Result<String, RenderError> {
    match dialect {
        Dialect::Root | Dialect::TTreeFormula => Emitter::render(
            &root::RootTarget {
                dialect,
                power: options.power,
            },
            options,
            tracer,
            expr,
        ),
        Dialect::Numexpr => Emitter::render(&numexpr::NumexprTarget, options, tracer, expr),
        Dialect::Python => Emitter::render(&python::PythonTarget, options, tracer, expr),
    }
}

// ============================================================================
// Target
// ============================================================================

/// Per-dialect rendering decisions.
pub(crate) trait Target {
    fn dialect(&self) -> Dialect;

    fn binary(&self, op: BinaryOp) -> Option<Spelling> {
        op.spell(self.dialect())
    }

    fn unary(&self, op: UnaryOp) -> Option<Spelling> {
        op.spell(self.dialect())
    }

    fn constant(&self, emitter: &mut Emitter<'_>, id: Constant) -> Result<(), RenderError> {
        match id.spell(self.dialect()) {
            Some(spelling) => {
                emitter.push(spelling);
                Ok(())
            }
            None => emitter.write_number(id.value(), id.name()),
        }
    }

    fn call(
        &self,
        emitter: &mut Emitter<'_>,
        function: Function,
        args: &[Expr],
        depth: usize,
    ) -> Result<(), RenderError> {
        let name = function
            .spell(self.dialect())
            .ok_or_else(|| emitter.unsupported(function.name()))?;
        emitter.write_call_named(name, args.iter(), depth)
    }

    fn matrix(
        &self,
        emitter: &mut Emitter<'_>,
        _base: &Expr,
        _indices: &[Expr],
        _depth: usize,
    ) -> Result<(), RenderError> {
        Err(emitter.unsupported("array indexing"))
    }

    /// Top-level list of outputs.
    fn multi_output(
        &self,
        emitter: &mut Emitter<'_>,
        _outputs: &[Expr],
        _depth: usize,
    ) -> Result<(), RenderError> {
        Err(emitter.unsupported("multiple outputs"))
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// How a rendered node binds, for deciding parentheses around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// Literals, names, calls, groups: never parenthesized.
    Atom,
    /// Prefix operator (or a negative literal) at this level.
    Prefix(u8),
    Infix { op: BinaryOp, binding: Binding },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

pub(crate) struct Emitter<'t> {
    target: &'t dyn Target,
    options: &'t RenderOptions,
    tracer: Option<&'t dyn Tracer>,
    output: String,
}

impl<'t> Emitter<'t> {
    fn render(
        target: &'t dyn Target,
        options: &'t RenderOptions,
        tracer: Option<&'t dyn Tracer>,
        expr: &Expr,
    ) -> Result<String, RenderError> {
        let mut emitter = Self {
            target,
            options,
            tracer,
            output: String::new(),
        };
        match expr {
            Expr::Call {
                function: Function::MultiOutput,
                args,
                ..
            } => {
                emitter.enter(expr, 1)?;
                target.multi_output(&mut emitter, args, 1)?;
            }
            _ => emitter.write_expr(expr, 1)?,
        }
        Ok(emitter.output)
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.target.dialect()
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub(crate) fn unsupported(&self, construct: &str) -> RenderError {
        RenderError::Unsupported {
            construct: construct.to_string(),
            dialect: self.dialect(),
        }
    }

    fn enter(&self, expr: &Expr, depth: usize) -> Result<(), RenderError> {
        if depth > self.options.max_depth {
            return Err(RenderError::TooDeep {
                limit: self.options.max_depth,
            });
        }
        trace::emit(
            self.tracer,
            TraceEvent::Render {
                dialect: self.dialect(),
                node: node_name(expr),
                depth,
            },
        );
        Ok(())
    }

    pub(crate) fn write_expr(&mut self, expr: &Expr, depth: usize) -> Result<(), RenderError> {
        self.enter(expr, depth)?;
        let target = self.target;

        match expr {
            Expr::Literal { value, .. } => self.write_number(*value, "non-finite literal"),

            Expr::Symbol { name, .. } => {
                self.push(name);
                Ok(())
            }

            Expr::Constant { id, .. } => target.constant(self, *id),

            Expr::Unary { op, operand, .. } => match target.unary(*op) {
                Some(Spelling::Operator(token)) => {
                    let level = precedence::unary(self.dialect(), token).unwrap_or(precedence::ATOM);
                    self.push(token);
                    if token.chars().all(|c| c.is_ascii_alphabetic()) {
                        self.push(" ");
                    }
                    let parens = match self.form(operand) {
                        Form::Atom => false,
                        Form::Prefix(_) => true,
                        Form::Infix { binding, .. } => binding.level <= level,
                    };
                    self.write_child(operand, parens, depth)
                }
                Some(Spelling::Function(name)) => {
                    self.write_call_named(name, std::iter::once(operand.as_ref()), depth)
                }
                None => Err(self.unsupported(op.name())),
            },

            Expr::Binary {
                op, left, right, ..
            } => match target.binary(*op) {
                Some(Spelling::Operator(token)) => {
                    let binding = precedence::binary(self.dialect(), token)
                        .ok_or_else(|| self.unsupported(op.name()))?;
                    let left_parens = needs_parens(self.form(left), *op, binding, Side::Left);
                    self.write_child(left, left_parens, depth)?;
                    if matches!(token, "**" | "^") {
                        self.push(token);
                    } else {
                        self.push(" ");
                        self.push(token);
                        self.push(" ");
                    }
                    let right_parens = needs_parens(self.form(right), *op, binding, Side::Right);
                    self.write_child(right, right_parens, depth)
                }
                Some(Spelling::Function(name)) => {
                    self.write_call_named(name, [left.as_ref(), right.as_ref()].into_iter(), depth)
                }
                None => Err(self.unsupported(op.name())),
            },

            Expr::Call {
                function: Function::MultiOutput,
                ..
            } => Err(self.unsupported("nested multiple outputs")),

            Expr::Call { function, args, .. } => target.call(self, *function, args, depth),

            Expr::Matrix { base, indices, .. } => target.matrix(self, base, indices, depth),

            Expr::Slice { inner, .. } => self.write_child(inner, true, depth),

            Expr::Empty => Ok(()),
        }
    }

    /// Write a child, wrapped in parentheses when `parens` is set.
    pub(crate) fn write_child(
        &mut self,
        expr: &Expr,
        parens: bool,
        depth: usize,
    ) -> Result<(), RenderError> {
        if parens {
            self.push("(");
        }
        self.write_expr(expr, depth + 1)?;
        if parens {
            self.push(")");
        }
        Ok(())
    }

    /// Write an operand that must bind tighter than any operator (`x` in `x[i]`).
    pub(crate) fn write_operand(&mut self, expr: &Expr, depth: usize) -> Result<(), RenderError> {
        let parens = self.form(expr) != Form::Atom;
        self.write_child(expr, parens, depth)
    }

    /// `name(arg, arg, ...)`
    pub(crate) fn write_call_named<'e>(
        &mut self,
        name: &str,
        args: impl Iterator<Item = &'e Expr>,
        depth: usize,
    ) -> Result<(), RenderError> {
        self.push(name);
        self.push("(");
        self.write_separated(args, ", ", depth)?;
        self.push(")");
        Ok(())
    }

    pub(crate) fn write_separated<'e>(
        &mut self,
        items: impl Iterator<Item = &'e Expr>,
        separator: &str,
        depth: usize,
    ) -> Result<(), RenderError> {
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.write_child(item, false, depth)?;
        }
        Ok(())
    }

    pub(crate) fn write_number(&mut self, value: f64, construct: &str) -> Result<(), RenderError> {
        if !value.is_finite() {
            return Err(self.unsupported(construct));
        }
        self.output.push_str(&format_number(value));
        Ok(())
    }

    fn form(&self, expr: &Expr) -> Form {
        let dialect = self.dialect();
        match expr {
            Expr::Literal { value, .. } if *value < 0.0 => {
                Form::Prefix(precedence::unary(dialect, "-").unwrap_or(precedence::ATOM))
            }
            Expr::Unary { op, .. } => match self.target.unary(*op) {
                Some(Spelling::Operator(token)) => precedence::unary(dialect, token)
                    .map(Form::Prefix)
                    .unwrap_or(Form::Atom),
                _ => Form::Atom,
            },
            Expr::Binary { op, .. } => match self.target.binary(*op) {
                Some(Spelling::Operator(token)) => precedence::binary(dialect, token)
                    .map(|binding| Form::Infix { op: *op, binding })
                    .unwrap_or(Form::Atom),
                _ => Form::Atom,
            },
            _ => Form::Atom,
        }
    }
}

/// Whether a child of binary `parent` needs parentheses on `side`.
fn needs_parens(child: Form, parent: BinaryOp, binding: Binding, side: Side) -> bool {
    match child {
        Form::Atom => false,
        Form::Prefix(level) => level <= binding.level,
        Form::Infix {
            op,
            binding: child_binding,
        } => {
            if child_binding.level < binding.level {
                return true;
            }
            let family = parent.family();
            if family.is_grouped() && op.family() == family && op != parent {
                return true;
            }
            if child_binding.level == binding.level {
                return match binding.assoc {
                    Assoc::Left => side == Side::Right,
                    Assoc::Right | Assoc::NonAssoc => true,
                };
            }
            false
        }
    }
}

fn node_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal { .. } => "literal",
        Expr::Symbol { .. } => "symbol",
        Expr::Constant { .. } => "constant",
        Expr::Unary { .. } => "unary",
        Expr::Binary { .. } => "binary",
        Expr::Call { .. } => "call",
        Expr::Matrix { .. } => "matrix",
        Expr::Slice { .. } => "slice",
        Expr::Empty => "empty",
    }
}
