//! Nom tokenizer shared by every readable dialect.

use super::{Token, TokenKind};
use crate::identifiers::Dialect;
use crate::traits::ParseError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Split `source` into tokens, skipping whitespace.
pub fn tokenize(dialect: Dialect, source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        let (after_space, _) = multispace0::<&str, ()>(rest).unwrap_or((rest, ""));
        rest = after_space;
        if rest.is_empty() {
            return Ok(tokens);
        }

        let offset = source.len() - rest.len();
        let (next, (kind, text)) = token(dialect, rest).map_err(|_| ParseError::Syntax {
            message: format!(
                "unexpected character `{}`",
                rest.chars().next().unwrap_or_default()
            ),
            offset,
        })?;
        tokens.push(Token {
            kind,
            text: text.to_string(),
            offset,
        });
        rest = next;
    }
}

fn token(dialect: Dialect, input: &str) -> IResult<&str, (TokenKind, &str)> {
    if let Ok((rest, text)) = number(input) {
        return Ok((rest, (TokenKind::Number, text)));
    }
    if let Ok((rest, text)) = identifier(dialect, input) {
        return Ok((rest, (TokenKind::Identifier, text)));
    }
    if let Ok((rest, text)) = punct(input) {
        return Ok((rest, (TokenKind::Punct, text)));
    }
    let (rest, text) = operator(input)?;
    Ok((rest, (TokenKind::Operator, text)))
}

/// `12`, `1.5`, `1.`, `.5`, each with an optional `e[+-]N` exponent.
fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    ))(input)
}

/// `[A-Za-z_][A-Za-z0-9_]*`, plus a trailing `$` in TTreeFormula (`Sum$`).
fn identifier(dialect: Dialect, input: &str) -> IResult<&str, &str> {
    let (rest, name) = recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)?;
    if dialect == Dialect::TTreeFormula {
        if let Ok((rest, _)) = char::<&str, ()>('$')(rest) {
            return Ok((rest, &input[..name.len() + 1]));
        }
    }
    Ok((rest, name))
}

fn punct(input: &str) -> IResult<&str, &str> {
    alt((
        tag("::"),
        tag("("),
        tag(")"),
        tag("["),
        tag("]"),
        tag(","),
        tag(":"),
        tag("."),
    ))(input)
}

fn operator(input: &str) -> IResult<&str, &str> {
    // Two-character operators first so `**` is not read as `*` `*`.
    alt((
        alt((
            tag("**"),
            tag("&&"),
            tag("||"),
            tag("<<"),
            tag(">>"),
            tag("<="),
            tag(">="),
            tag("=="),
            tag("!="),
        )),
        alt((
            tag("+"),
            tag("-"),
            tag("*"),
            tag("/"),
            tag("%"),
            tag("^"),
            tag("&"),
            tag("|"),
            tag("~"),
            tag("!"),
            tag("<"),
            tag(">"),
        )),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(dialect: Dialect, source: &str) -> Vec<String> {
        tokenize(dialect, source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            texts(Dialect::Root, "1 2.5 .5 3. 1e10 2.5E-3"),
            ["1", "2.5", ".5", "3.", "1e10", "2.5E-3"]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(texts(Dialect::Numexpr, "a**b<=c"), ["a", "**", "b", "<=", "c"]);
        assert_eq!(
            texts(Dialect::Root, "TMath::Pi()"),
            ["TMath", "::", "Pi", "(", ")"]
        );
    }

    #[test]
    fn test_dollar_suffix_only_in_ttreeformula() {
        assert_eq!(texts(Dialect::TTreeFormula, "Sum$(x)"), ["Sum$", "(", "x", ")"]);
        assert!(tokenize(Dialect::Root, "Sum$(x)").is_err());
    }

    #[test]
    fn test_offsets_and_kinds() {
        let tokens = tokenize(Dialect::Root, "  x + 10").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[2].offset, 6);
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize(Dialect::Numexpr, "a @ b").unwrap_err();
        assert_eq!(
            err,
            ParseError::Syntax {
                message: "unexpected character `@`".into(),
                offset: 2
            }
        );
    }
}
