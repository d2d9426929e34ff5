//! SPDX expression parsing
//!
//! Parses expressions such as `MIT OR Apache-2.0` or
//! `(MIT AND BSD-2-Clause) OR Apache-2.0` into a [`LicenseExpression`].
//! AND binds tighter than OR; both associate to the left.
//! `WITH` exceptions cannot be represented and are rejected.

use crate::error::{LicenseError, LicenseResult};
use crate::expression::{LicenseExpression, LicenseOperator};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Identifier(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                match word.to_uppercase().as_str() {
                    "AND" => tokens.push(Token::And),
                    "OR" => tokens.push(Token::Or),
                    "WITH" => tokens.push(Token::With),
                    _ => tokens.push(Token::Identifier(word)),
                }
            }
        }
    }

    tokens
}

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> LicenseError {
        LicenseError::malformed(self.input, reason)
    }

    fn parse_or(&self, tokens: &'a [Token]) -> LicenseResult<(LicenseExpression, &'a [Token])> {
        let (mut left, mut rest) = self.parse_and(tokens)?;

        while let Some((Token::Or, tail)) = rest.split_first() {
            let (right, r) = self.parse_and(tail)?;
            left = LicenseExpression::statement(LicenseOperator::Or, left, right);
            rest = r;
        }

        Ok((left, rest))
    }

    fn parse_and(&self, tokens: &'a [Token]) -> LicenseResult<(LicenseExpression, &'a [Token])> {
        let (mut left, mut rest) = self.parse_primary(tokens)?;

        while let Some((Token::And, tail)) = rest.split_first() {
            let (right, r) = self.parse_primary(tail)?;
            left = LicenseExpression::statement(LicenseOperator::And, left, right);
            rest = r;
        }

        Ok((left, rest))
    }

    fn parse_primary(
        &self,
        tokens: &'a [Token],
    ) -> LicenseResult<(LicenseExpression, &'a [Token])> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(self.error("unexpected end of expression"));
        };

        let (expr, rest) = match first {
            Token::LParen => {
                let (expr, rest) = self.parse_or(rest)?;
                match rest.split_first() {
                    Some((Token::RParen, rest)) => (expr, rest),
                    _ => return Err(self.error("missing closing parenthesis")),
                }
            }
            Token::Identifier(id) => (LicenseExpression::leaf(id.clone()), rest),
            Token::With => return Err(LicenseError::UnsupportedOperator("WITH".to_string())),
            other => return Err(self.error(format!("unexpected token {other:?}"))),
        };

        if let Some((Token::With, _)) = rest.split_first() {
            return Err(LicenseError::UnsupportedOperator("WITH".to_string()));
        }
        Ok((expr, rest))
    }
}

/// Parse an SPDX license expression
///
/// Blank input yields [`LicenseExpression::Empty`].
///
/// # Errors
/// - [`LicenseError::UnsupportedOperator`] if the expression uses `WITH`
/// - [`LicenseError::Malformed`] on unbalanced parentheses, dangling
///   operators or trailing tokens
pub fn parse_spdx(input: &str) -> LicenseResult<LicenseExpression> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(LicenseExpression::Empty);
    }

    let parser = Parser {
        input,
        tokens: &tokens,
    };
    let (expr, rest) = parser.parse_or(parser.tokens)?;
    if !rest.is_empty() {
        return Err(parser.error(format!("unexpected tokens after expression: {rest:?}")));
    }
    Ok(expr)
}

/// Parse an SPDX expression, keeping unparseable input as a single leaf
///
/// The leaf holds the trimmed raw text as its id.
#[must_use]
pub fn parse_spdx_lenient(input: &str) -> LicenseExpression {
    match parse_spdx(input) {
        Ok(expr) => expr,
        Err(err) => {
            tracing::debug!("falling back to single license for '{}': {}", input, err);
            LicenseExpression::leaf(input.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_identifier() {
        let expr = parse_spdx("MIT").unwrap();
        assert_eq!(expr, LicenseExpression::leaf("MIT"));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse_spdx("   ").unwrap(), LicenseExpression::Empty);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse_spdx("MIT OR Apache-2.0 AND BSD-3-Clause").unwrap();
        assert_eq!(expr.evaluate(), "( MIT OR ( Apache-2.0 AND BSD-3-Clause ) )");
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse_spdx("(MIT OR Apache-2.0) AND BSD-3-Clause").unwrap();
        assert_eq!(expr.evaluate(), "( ( MIT OR Apache-2.0 ) AND BSD-3-Clause )");
    }

    #[test]
    fn operators_are_case_insensitive() {
        let expr = parse_spdx("MIT or Apache-2.0").unwrap();
        assert_eq!(expr.operator(), Some(LicenseOperator::Or));
    }

    #[test]
    fn or_later_suffix_is_kept() {
        let expr = parse_spdx("GPL-2.0+").unwrap();
        assert_eq!(expr.evaluate(), "GPL-2.0+");
    }

    #[test]
    fn with_is_unsupported() {
        let err = parse_spdx("GPL-2.0-only WITH Classpath-exception-2.0").unwrap_err();
        assert!(matches!(err, LicenseError::UnsupportedOperator(_)));
    }

    #[test]
    fn missing_paren_is_malformed() {
        let err = parse_spdx("(MIT OR Apache-2.0").unwrap_err();
        assert!(matches!(err, LicenseError::Malformed { .. }));
    }

    #[test]
    fn dangling_operator_is_malformed() {
        assert!(matches!(
            parse_spdx("MIT AND").unwrap_err(),
            LicenseError::Malformed { .. }
        ));
    }

    #[test]
    fn lenient_falls_back_to_leaf() {
        let expr = parse_spdx_lenient("  Some (weird license ");
        assert_eq!(expr, LicenseExpression::leaf("Some (weird license"));
    }
}
