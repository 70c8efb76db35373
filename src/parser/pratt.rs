use super::tokens::{Operator, Token};
use crate::{Expr, ExprKind, PropError};

/// Parse tokens into an AST using Pratt parsing
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, PropError> {
    if tokens.is_empty() {
        return Err(PropError::UnexpectedEndOfInput);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;

    if let Some(token) = parser.current() {
        return Err(PropError::UnexpectedToken {
            expected: "end of input".to_string(),
            got: token.to_user_string(),
            span: None,
        });
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect_right_paren(&mut self) -> Result<(), PropError> {
        match self.current() {
            Some(Token::RightParen) => {
                self.advance();
                Ok(())
            }
            other => Err(PropError::UnexpectedToken {
                expected: ")".to_string(),
                got: other.map_or_else(
                    || "end of input".to_string(),
                    |t| t.to_user_string(),
                ),
                span: None,
            }),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, PropError> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(token) = self.current() {
            let precedence = match token {
                Token::Operator(op) => op.precedence(),
                _ => break,
            };

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, PropError> {
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current() {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current() {
                Some(Token::Comma) => {
                    self.advance(); // consume ,
                }
                Some(Token::RightParen) => {
                    break;
                }
                other => {
                    return Err(PropError::UnexpectedToken {
                        expected: ", or )".to_string(),
                        got: other.map_or_else(
                            || "end of input".to_string(),
                            |t| t.to_user_string(),
                        ),
                        span: None,
                    });
                }
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, PropError> {
        // Direct slice access lets us keep borrowing the token while advancing
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(PropError::UnexpectedEndOfInput)?;

        match token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();

                // An identifier followed by ( is a function call
                if let Some(Token::LeftParen) = self.current() {
                    self.advance(); // consume (
                    let args = self.parse_arguments()?;
                    self.expect_right_paren()?;

                    Ok(Expr::new(ExprKind::FunctionCall {
                        name: name.clone(),
                        args,
                    }))
                } else {
                    Ok(Expr::symbol(name))
                }
            }

            // Unary minus: precedence between Mul (20) and Pow (30)
            // This ensures -x^2 parses as -(x^2), not (-x)^2
            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(25)?;
                Ok(Expr::mul_expr(Expr::number(-1.0), expr))
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(25)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            _ => Err(PropError::invalid_token(token.to_user_string())),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: u8) -> Result<Expr, PropError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(PropError::UnexpectedEndOfInput)?;

        match token {
            Token::Operator(op) => {
                let op = *op;
                self.advance();

                // Right associative for power, left for others
                let next_precedence = if matches!(op, Operator::Pow) {
                    precedence // Right associative
                } else {
                    precedence + 1 // Left associative
                };

                let right = self.parse_expr(next_precedence)?;

                let result = match op {
                    Operator::Add => Expr::add_expr(left, right),
                    Operator::Sub => Expr::sub_expr(left, right),
                    Operator::Mul => Expr::mul_expr(left, right),
                    Operator::Div => Expr::div_expr(left, right),
                    Operator::Pow => Expr::pow(left, right),
                };

                Ok(result)
            }

            _ => Err(PropError::invalid_token(token.to_user_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let tokens = vec![Token::Number(314.0 / 100.0)];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(ast, Expr::number(314.0 / 100.0));
    }

    #[test]
    fn test_parse_symbol() {
        let tokens = vec![Token::Identifier("x".to_string())];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(ast, Expr::symbol("x"));
    }

    #[test]
    fn test_parse_addition() {
        let tokens = vec![
            Token::Number(1.0),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();
        assert!(matches!(ast.kind, ExprKind::Add(_, _)));
    }

    #[test]
    fn test_precedence() {
        // x + 2 * 3 should be x + (2 * 3)
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
            Token::Operator(Operator::Mul),
            Token::Number(3.0),
        ];
        let ast = parse_expression(&tokens).unwrap();

        match ast.kind {
            ExprKind::Add(left, right) => {
                assert!(matches!(left.kind, ExprKind::Symbol(_)));
                assert!(matches!(right.kind, ExprKind::Mul(_, _)));
            }
            _ => panic!("Expected Add at top level"),
        }
    }

    #[test]
    fn test_pow_right_associative() {
        // x ^ 2 ^ 3 should be x ^ (2 ^ 3)
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
            Token::Operator(Operator::Pow),
            Token::Number(3.0),
        ];
        let ast = parse_expression(&tokens).unwrap();

        match ast.kind {
            ExprKind::Pow(base, exp) => {
                assert!(matches!(base.kind, ExprKind::Symbol(_)));
                assert!(matches!(exp.kind, ExprKind::Pow(_, _)));
            }
            _ => panic!("Expected Pow at top level"),
        }
    }

    #[test]
    fn test_unary_minus_binds_below_pow() {
        // -x^2 parses as -(x^2)
        let tokens = vec![
            Token::Operator(Operator::Sub),
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();

        match ast.kind {
            ExprKind::Mul(neg_one, inner) => {
                assert_eq!(neg_one.as_number(), Some(-1.0));
                assert!(matches!(inner.kind, ExprKind::Pow(_, _)));
            }
            _ => panic!("Expected Mul(-1, Pow) at top level"),
        }
    }

    #[test]
    fn test_parse_function_call() {
        let tokens = vec![
            Token::Identifier("sin".to_string()),
            Token::LeftParen,
            Token::Identifier("x".to_string()),
            Token::RightParen,
        ];
        let ast = parse_expression(&tokens).unwrap();
        assert!(matches!(ast.kind, ExprKind::FunctionCall { .. }));
    }

    #[test]
    fn test_parentheses() {
        // (x + 1) * 2
        let tokens = vec![
            Token::LeftParen,
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Add),
            Token::Number(1.0),
            Token::RightParen,
            Token::Operator(Operator::Mul),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();

        match ast.kind {
            ExprKind::Mul(left, right) => {
                assert!(matches!(left.kind, ExprKind::Add(_, _)));
                assert_eq!(right.as_number(), Some(2.0));
            }
            _ => panic!("Expected Mul at top level"),
        }
    }

    #[test]
    fn test_empty_parentheses() {
        let tokens = vec![Token::LeftParen, Token::RightParen];
        let result = parse_expression(&tokens);
        assert!(
            result.is_err(),
            "Empty parentheses should fail to parse, but got: {:?}",
            result
        );
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        // "x y" has no operator between the identifiers
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Identifier("y".to_string()),
        ];
        let result = parse_expression(&tokens);
        assert!(result.is_err());
    }
}
