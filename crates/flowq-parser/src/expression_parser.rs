//! Expression parser
//!
//! Parses string expressions into Expression AST nodes.
//!
//! Supported syntax:
//! - Paths: `$.user.age`, `$.items[0].tags[*]`
//! - Identifiers: `status` (key lookup on the current data)
//! - Literals: `42`, `3.14`, `"string"`, `'string'`, `true`, `false`, `null`
//! - Binary operators: `||`, `&&`, `==`, `!=`, `<`, `<=`, `>`, `>=`, `+`, `-`, `*`, `/`, `%`
//! - Keyword operators: `contains`, `startsWith`, `endsWith`, `matches`
//! - Unary operators: `!`, `-`
//! - Function calls: `round($.price, 2)`, `int($.count, 0)`
//! - Templates: `{{param:id}}`, `"{{param:id}}"`, `'{{param:id}}'`
//! - Parentheses for grouping: `(a + b) * c`
//!
//! Precedence, low to high: `||`, `&&`, equality, relational (including the
//! keyword operators), additive, multiplicative, unary.

use crate::error::{ParseError, Result};
use crate::lexer::{tokenize, unquote, Token, TokenKind};
use flowq_core::ast::{Expression, Operator, UnaryOperator};
use flowq_core::Value;

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Empty expression".to_string()));
        }

        let tokens = tokenize(input)?;
        let mut cursor = TokenCursor::new(tokens);
        let expr = cursor.parse_expression(0)?;

        if let Some(token) = cursor.peek() {
            return Err(ParseError::UnexpectedToken {
                token: token.text.clone(),
                position: token.position,
            });
        }

        Ok(expr)
    }
}

/// Recursive-descent state over a token list
struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Binary operator at the cursor, if any
    fn peek_binary_operator(&self) -> Option<Operator> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Operator => Operator::from_symbol(&token.text),
            TokenKind::Identifier => {
                Operator::from_symbol(&token.text).filter(|op| op.is_keyword())
            }
            _ => None,
        }
    }

    /// Precedence climbing: parse operators binding tighter than `min_precedence`
    fn parse_expression(&mut self, min_precedence: u8) -> Result<Expression> {
        let mut left = self.parse_primary()?;

        while let Some(op) = self.peek_binary_operator() {
            let precedence = op.precedence();
            if precedence <= min_precedence {
                break;
            }
            self.pos += 1;
            let right = self.parse_expression(precedence)?;
            left = Expression::binary(left, op, right);
        }

        Ok(left)
    }

    /// Parse a primary expression
    fn parse_primary(&mut self) -> Result<Expression> {
        let token = self.next().ok_or(ParseError::UnexpectedEnd)?;

        match token.kind {
            TokenKind::Operator if token.text == "!" => Ok(Expression::unary(
                UnaryOperator::Not,
                self.parse_primary()?,
            )),
            TokenKind::Operator if token.text == "-" => match self.parse_primary()? {
                Expression::Literal(Value::Number(n)) => Ok(Expression::literal(-n)),
                operand => Ok(Expression::unary(UnaryOperator::Negate, operand)),
            },
            TokenKind::LeftParen => {
                let inner = self.parse_expression(0)?;
                match self.next() {
                    Some(t) if t.is(TokenKind::RightParen) => Ok(inner),
                    Some(t) => Err(ParseError::UnexpectedToken {
                        token: t.text,
                        position: t.position,
                    }),
                    None => Err(ParseError::UnclosedParenthesis),
                }
            }
            TokenKind::QuotedTemplate
            | TokenKind::SingleQuotedTemplate
            | TokenKind::BareTemplate => Ok(Expression::template(token.text)),
            TokenKind::Path => Ok(Expression::path(token.text)),
            TokenKind::Number => token
                .text
                .parse::<f64>()
                .map(Expression::literal)
                .map_err(|_| ParseError::InvalidExpression(format!("Invalid number: {}", token.text))),
            TokenKind::String => Ok(Expression::literal(unquote(&token.text))),
            TokenKind::Identifier => match token.text.as_str() {
                "true" => Ok(Expression::literal(true)),
                "false" => Ok(Expression::literal(false)),
                "null" => Ok(Expression::Literal(Value::Null)),
                _ if self.peek().is_some_and(|t| t.is(TokenKind::LeftParen)) => {
                    self.pos += 1;
                    self.parse_call(token.text)
                }
                _ => Ok(Expression::identifier(token.text)),
            },
            TokenKind::Operator | TokenKind::RightParen | TokenKind::Comma => {
                Err(ParseError::UnexpectedToken {
                    token: token.text,
                    position: token.position,
                })
            }
        }
    }

    /// Parse `arg, arg, ...)` after the opening parenthesis of a call
    fn parse_call(&mut self, name: String) -> Result<Expression> {
        let mut args = Vec::new();

        if self.peek().is_some_and(|t| t.is(TokenKind::RightParen)) {
            self.pos += 1;
            return Ok(Expression::function_call(name, args));
        }

        loop {
            let arg = match self.parse_expression(0) {
                Ok(arg) => arg,
                Err(ParseError::UnexpectedEnd) => return Err(ParseError::UnclosedParenthesis),
                Err(ParseError::UnexpectedToken { .. }) => {
                    return Err(ParseError::MalformedArguments(name))
                }
                Err(other) => return Err(other),
            };
            args.push(arg);

            match self.next() {
                Some(t) if t.is(TokenKind::Comma) => continue,
                Some(t) if t.is(TokenKind::RightParen) => break,
                Some(_) => return Err(ParseError::MalformedArguments(name)),
                None => return Err(ParseError::UnclosedParenthesis),
            }
        }

        Ok(Expression::function_call(name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_number_literal() {
        let expr = ExpressionParser::parse("42").unwrap();
        assert_eq!(expr, Expression::literal(42.0));

        let expr = ExpressionParser::parse("3.14").unwrap();
        assert_eq!(expr, Expression::literal(3.14));
    }

    #[test]
    fn test_parse_string_literal() {
        let expr = ExpressionParser::parse(r#""hello world""#).unwrap();
        assert_eq!(expr, Expression::literal("hello world"));

        let expr = ExpressionParser::parse("'single'").unwrap();
        assert_eq!(expr, Expression::literal("single"));
    }

    #[test]
    fn test_parse_keyword_literals() {
        assert_eq!(ExpressionParser::parse("true").unwrap(), Expression::literal(true));
        assert_eq!(ExpressionParser::parse("false").unwrap(), Expression::literal(false));
        assert_eq!(ExpressionParser::parse("null").unwrap(), Expression::Literal(Value::Null));
    }

    #[test]
    fn test_parse_identifier_and_path() {
        assert_eq!(ExpressionParser::parse("status").unwrap(), Expression::identifier("status"));
        assert_eq!(
            ExpressionParser::parse("$.user.age").unwrap(),
            Expression::path("$.user.age")
        );
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let expr = ExpressionParser::parse("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::literal(1.0),
                Operator::Add,
                Expression::binary(Expression::literal(2.0), Operator::Mul, Expression::literal(3.0)),
            )
        );
    }

    #[test]
    fn test_left_associative() {
        let expr = ExpressionParser::parse("10 - 4 - 3").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::binary(Expression::literal(10.0), Operator::Sub, Expression::literal(4.0)),
                Operator::Sub,
                Expression::literal(3.0),
            )
        );
    }

    #[test]
    fn test_logical_precedence() {
        // a || b && c  =>  a || (b && c)
        let expr = ExpressionParser::parse("a || b && c").unwrap();
        match expr {
            Expression::Binary { op, right, .. } => {
                assert_eq!(op, Operator::Or);
                assert!(matches!(*right, Expression::Binary { op: Operator::And, .. }));
            }
            _ => panic!("Expected binary"),
        }
    }

    #[test]
    fn test_parentheses_reset_precedence() {
        let expr = ExpressionParser::parse("(1 + 2) * 3").unwrap();
        match expr {
            Expression::Binary { op, left, .. } => {
                assert_eq!(op, Operator::Mul);
                assert!(matches!(*left, Expression::Binary { op: Operator::Add, .. }));
            }
            _ => panic!("Expected binary"),
        }
    }

    #[test]
    fn test_unary_not_binds_to_primary() {
        // !a == b  =>  (!a) == b
        let expr = ExpressionParser::parse("!a == b").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::unary(UnaryOperator::Not, Expression::identifier("a")),
                Operator::Eq,
                Expression::identifier("b"),
            )
        );
    }

    #[test]
    fn test_negative_number_folds() {
        assert_eq!(ExpressionParser::parse("-1").unwrap(), Expression::literal(-1.0));
        assert_eq!(
            ExpressionParser::parse("-$.a").unwrap(),
            Expression::unary(UnaryOperator::Negate, Expression::path("$.a"))
        );
    }

    #[test]
    fn test_parse_function_call_with_nested_commas() {
        let expr = ExpressionParser::parse("max(min(1, 2), 3)").unwrap();
        match expr {
            Expression::FunctionCall { name, args } => {
                assert_eq!(name, "max");
                assert_eq!(args.len(), 2);
                assert!(matches!(&args[0], Expression::FunctionCall { name, args } if name == "min" && args.len() == 2));
            }
            _ => panic!("Expected function call"),
        }
    }

    #[test]
    fn test_parse_empty_call() {
        assert_eq!(
            ExpressionParser::parse("count()").unwrap(),
            Expression::function_call("count", vec![])
        );
    }

    #[test]
    fn test_keyword_operator() {
        let expr = ExpressionParser::parse("$.name contains 'li' && $.age > 3").unwrap();
        match expr {
            Expression::Binary { op, left, .. } => {
                assert_eq!(op, Operator::And);
                assert!(matches!(*left, Expression::Binary { op: Operator::Contains, .. }));
            }
            _ => panic!("Expected binary"),
        }
    }

    #[test]
    fn test_template_node() {
        let expr = ExpressionParser::parse("$.code == {{param:merchant_code}}").unwrap();
        assert_eq!(
            expr,
            Expression::binary(
                Expression::path("$.code"),
                Operator::Eq,
                Expression::template("{{param:merchant_code}}"),
            )
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            ExpressionParser::parse(""),
            Err(ParseError::InvalidExpression(_))
        ));
        assert_eq!(ExpressionParser::parse("1 +"), Err(ParseError::UnexpectedEnd));
        assert_eq!(ExpressionParser::parse("(1 + 2"), Err(ParseError::UnclosedParenthesis));
        assert_eq!(ExpressionParser::parse("max(1, 2"), Err(ParseError::UnclosedParenthesis));
        assert_eq!(
            ExpressionParser::parse("max(1 2)"),
            Err(ParseError::MalformedArguments("max".to_string()))
        );
        assert_eq!(
            ExpressionParser::parse("max(1,)"),
            Err(ParseError::MalformedArguments("max".to_string()))
        );
        assert!(matches!(
            ExpressionParser::parse("1 2"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }
}
