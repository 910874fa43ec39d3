//! Precedence-climbing parser over the token stream.

use super::{ParseElement, ParseTree, Token, TokenKind};
use crate::identifiers::Dialect;
use crate::precedence::{self, Assoc};
use crate::traits::ParseError;

pub(super) struct Parser<'t> {
    dialect: Dialect,
    tokens: &'t [Token],
    pos: usize,
    /// Offset reported for "unexpected end of input".
    end: usize,
    max_depth: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub(super) fn new(dialect: Dialect, tokens: &'t [Token], end: usize, max_depth: usize) -> Self {
        Self {
            dialect,
            tokens,
            pos: 0,
            end,
            max_depth,
            depth: 0,
        }
    }

    pub(super) fn parse(mut self) -> Result<ParseTree, ParseError> {
        let body = if self.tokens.is_empty() {
            self.node("empty", 0, Vec::new())?
        } else {
            let first = self.expr(0)?;
            if self.dialect == Dialect::TTreeFormula && self.peek_is(":") {
                let offset = first.offset;
                let mut outputs = vec![ParseElement::Tree(first)];
                while self.eat(":") {
                    outputs.push(ParseElement::Tree(self.expr(0)?));
                }
                self.node("multi_out", offset, outputs)?
            } else {
                first
            }
        };

        if let Some(token) = self.peek() {
            return Err(unexpected(token));
        }
        self.node("start", 0, vec![ParseElement::Tree(body)])
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// Parse an expression whose binary operators bind at `min_level` or tighter.
    fn expr(&mut self, min_level: u8) -> Result<ParseTree, ParseError> {
        self.descend()?;
        let mut lhs = self.prefix()?;

        while let Some(token) = self.peek_operator() {
            let Some(binding) = precedence::binary(self.dialect, &token.text) else {
                break;
            };
            if binding.level < min_level {
                break;
            }
            self.pos += 1;

            let next_level = match binding.assoc {
                Assoc::Right => binding.level,
                Assoc::Left | Assoc::NonAssoc => binding.level + 1,
            };
            let rhs = self.expr(next_level)?;

            if binding.assoc == Assoc::NonAssoc {
                if let Some(following) = self.peek_operator() {
                    let chained = precedence::binary(self.dialect, &following.text)
                        .is_some_and(|b| b.level == binding.level);
                    if chained {
                        return Err(ParseError::Syntax {
                            message: format!(
                                "`{}` cannot be chained with `{}`",
                                following.text, token.text
                            ),
                            offset: following.offset,
                        });
                    }
                }
            }

            let offset = lhs.offset;
            lhs = self.node(
                "binary",
                offset,
                vec![
                    ParseElement::Tree(lhs),
                    ParseElement::Token(token.clone()),
                    ParseElement::Tree(rhs),
                ],
            )?;
        }

        self.depth -= 1;
        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<ParseTree, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Operator => {
                let Some(level) = precedence::unary(self.dialect, &token.text) else {
                    return Err(unexpected(token));
                };
                let operand = self.expr(level + 1)?;
                self.node(
                    "unary",
                    token.offset,
                    vec![
                        ParseElement::Token(token.clone()),
                        ParseElement::Tree(operand),
                    ],
                )
            }
            TokenKind::Number => {
                let literal =
                    self.node("literal", token.offset, vec![ParseElement::Token(token.clone())])?;
                self.postfix(literal)
            }
            TokenKind::Identifier => {
                let atom = self.name_or_call(token)?;
                self.postfix(atom)
            }
            TokenKind::Punct if token.text == "(" => {
                let inner = self.expr(0)?;
                self.expect(")")?;
                let paren = self.node("paren", token.offset, vec![ParseElement::Tree(inner)])?;
                self.postfix(paren)
            }
            TokenKind::Punct => Err(unexpected(token)),
        }
    }

    /// A symbol, or a (possibly qualified) name followed by an argument list.
    fn name_or_call(&mut self, first: &'t Token) -> Result<ParseTree, ParseError> {
        let mut name = self.node("name", first.offset, vec![ParseElement::Token(first.clone())])?;
        let mut spelled = first.text.clone();

        loop {
            let Some(separator) = self.peek().filter(|t| self.is_separator(t)) else {
                break;
            };
            let Some(part) = self
                .tokens
                .get(self.pos + 1)
                .filter(|t| t.kind == TokenKind::Identifier)
            else {
                break;
            };
            self.pos += 2;
            spelled.push_str(&separator.text);
            spelled.push_str(&part.text);
            name = self.node(
                "name",
                first.offset,
                vec![
                    ParseElement::Tree(name),
                    ParseElement::Token(separator.clone()),
                    ParseElement::Token(part.clone()),
                ],
            )?;
        }

        if self.peek_is("(") {
            let arguments = self.arguments()?;
            return self.node(
                "call",
                first.offset,
                vec![ParseElement::Tree(name), ParseElement::Tree(arguments)],
            );
        }
        if spelled != first.text {
            return Err(ParseError::Syntax {
                message: format!("qualified name `{spelled}` must be called"),
                offset: first.offset,
            });
        }
        self.node("symbol", first.offset, vec![ParseElement::Token(first.clone())])
    }

    fn arguments(&mut self) -> Result<ParseTree, ParseError> {
        let open = self.expect("(")?;
        let mut arguments = Vec::new();
        if !self.eat(")") {
            loop {
                arguments.push(ParseElement::Tree(self.expr(0)?));
                if self.eat(",") {
                    continue;
                }
                self.expect(")")?;
                break;
            }
        }
        self.node("arguments", open.offset, arguments)
    }

    /// Trailing `[i][j]` indices, where the dialect has arrays.
    fn postfix(&mut self, base: ParseTree) -> Result<ParseTree, ParseError> {
        if !self.dialect.allows_indexing() || !self.peek_is("[") {
            return Ok(base);
        }

        let offset = base.offset;
        let mut children = vec![ParseElement::Tree(base)];
        while let Some(open) = self.peek().filter(|t| t.text == "[") {
            self.pos += 1;
            let index = if self.eat("]") {
                Vec::new()
            } else {
                let inner = self.expr(0)?;
                self.expect("]")?;
                vec![ParseElement::Tree(inner)]
            };
            children.push(ParseElement::Tree(self.node("index", open.offset, index)?));
        }
        self.node("matrix", offset, children)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn node(
        &self,
        kind: &'static str,
        offset: usize,
        children: Vec<ParseElement>,
    ) -> Result<ParseTree, ParseError> {
        let tree = ParseTree::new(kind, offset, children);
        if tree.height > self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(tree)
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn is_separator(&self, token: &Token) -> bool {
        match token.text.as_str() {
            "::" => self.dialect.is_root_family(),
            "." => true,
            _ => false,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_operator(&self) -> Option<&'t Token> {
        self.peek().filter(|t| t.kind == TokenKind::Operator)
    }

    fn peek_is(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.text == text)
    }

    fn eat(&mut self, text: &str) -> bool {
        let matched = self.peek_is(text);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn next_token(&mut self) -> Result<&'t Token, ParseError> {
        let token = self.peek().ok_or_else(|| ParseError::Syntax {
            message: "unexpected end of input".into(),
            offset: self.end,
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, text: &str) -> Result<&'t Token, ParseError> {
        match self.peek() {
            Some(token) if token.text == text => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::Syntax {
                message: format!("expected `{text}`, found `{}`", token.text),
                offset: token.offset,
            }),
            None => Err(ParseError::Syntax {
                message: format!("expected `{text}`, found end of input"),
                offset: self.end,
            }),
        }
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::Syntax {
        message: format!("unexpected `{}`", token.text),
        offset: token.offset,
    }
}
