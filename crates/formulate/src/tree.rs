//! Read-only view over a parse tree.
//!
//! Lowering only sees trees through [`SyntaxNode`], so any parser that can
//! present kind strings, ordered children and leaf texts can feed it.

use crate::grammar::{ParseElement, ParseTree, TokenKind};

/// Leaf categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Identifier,
    Number,
    Operator,
    Punct,
}

/// A token leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'a> {
    pub kind: LeafKind,
    pub text: &'a str,
    pub offset: usize,
}

/// A child of a syntax node: another node or a token.
#[derive(Debug)]
pub enum SyntaxElement<'a, N: ?Sized> {
    Node(&'a N),
    Leaf(Leaf<'a>),
}

impl<N: ?Sized> Clone for SyntaxElement<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for SyntaxElement<'_, N> {}

/// A node of a raw parse tree.
pub trait SyntaxNode {
    /// Grammar kind, e.g. `"binary"` or `"call"`.
    fn kind(&self) -> &str;

    /// Byte offset of the node in the source.
    fn offset(&self) -> usize;

    /// Ordered children.
    fn children(&self) -> Vec<SyntaxElement<'_, Self>>;
}

impl SyntaxNode for ParseTree {
    fn kind(&self) -> &str {
        self.kind
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn children(&self) -> Vec<SyntaxElement<'_, Self>> {
        self.children
            .iter()
            .map(|child| match child {
                ParseElement::Tree(tree) => SyntaxElement::Node(tree),
                ParseElement::Token(token) => SyntaxElement::Leaf(Leaf {
                    kind: match token.kind {
                        TokenKind::Number => LeafKind::Number,
                        TokenKind::Identifier => LeafKind::Identifier,
                        TokenKind::Operator => LeafKind::Operator,
                        TokenKind::Punct => LeafKind::Punct,
                    },
                    text: &token.text,
                    offset: token.offset,
                }),
            })
            .collect()
    }
}
