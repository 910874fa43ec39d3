//! Tokenizer and parser producing the raw parse tree.
//!
//! The tree is untyped: every node carries a kind string and an ordered list
//! of child nodes and tokens. Lowering (see [`crate::lower`]) turns it into
//! the canonical AST. Node kinds:
//!
//! | kind        | children                                   |
//! |-------------|--------------------------------------------|
//! | `start`     | one expression, `multi_out` or `empty`     |
//! | `empty`     | none (blank input)                         |
//! | `multi_out` | two or more expressions (`a:b:c`)          |
//! | `binary`    | expression, operator token, expression     |
//! | `unary`     | operator token, expression                 |
//! | `paren`     | expression                                 |
//! | `literal`   | number token                               |
//! | `symbol`    | identifier token                           |
//! | `call`      | `name`, `arguments`                        |
//! | `name`      | identifier, or `name`, separator, identifier |
//! | `arguments` | zero or more expressions                   |
//! | `matrix`    | base expression, one or more `index`       |
//! | `index`     | zero or one expression                     |

mod lexer;
mod parser;

pub use lexer::tokenize;

use crate::identifiers::Dialect;
use crate::traits::ParseError;

/// Token categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Operator,
    /// Brackets, commas, `:`, `::` and `.`.
    Punct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset into the source.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseElement {
    Tree(ParseTree),
    Token(Token),
}

impl ParseElement {
    fn height(&self) -> usize {
        match self {
            ParseElement::Tree(tree) => tree.height,
            ParseElement::Token(_) => 0,
        }
    }
}

/// A node of the raw parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    pub kind: &'static str,
    pub children: Vec<ParseElement>,
    pub offset: usize,
    /// Longest path to a leaf; bounded by the parser's depth limit.
    pub height: usize,
}

impl ParseTree {
    pub fn new(kind: &'static str, offset: usize, children: Vec<ParseElement>) -> Self {
        let height = 1 + children.iter().map(ParseElement::height).max().unwrap_or(0);
        Self {
            kind,
            children,
            offset,
            height,
        }
    }
}

/// Parse `source` as a `dialect` formula.
///
/// Fails with [`ParseError::TooDeep`] when the tree would be taller than
/// `max_depth`.
pub fn parse(dialect: Dialect, source: &str, max_depth: usize) -> Result<ParseTree, ParseError> {
    if dialect == Dialect::Python {
        return Err(ParseError::Syntax {
            message: "python is an output-only dialect".into(),
            offset: 0,
        });
    }
    let tokens = tokenize(dialect, source)?;
    parser::Parser::new(dialect, &tokens, source.len(), max_depth).parse()
}
