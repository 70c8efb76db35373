//! Lexer - converts formula text into tokens
//!
//! Accepts the crate's formula grammar and the numeric-source dialect used by
//! the extractor: `**` is a synonym for `^`, and identifiers may carry a
//! namespace qualifier (`np.sin`). Qualified names are resolved later by the
//! extractor's AST rewrite; the lexer only has to keep them intact.

use super::tokens::{Operator, Token};
use crate::{PropError, Span};

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, PropError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::with_capacity(input.len() / 2);
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos] as char;

        match c {
            ' ' | '\t' | '\r' | '\n' => {
                pos += 1;
            }
            '0'..='9' => {
                let (token, next) = lex_number(input, pos)?;
                tokens.push(token);
                pos = next;
            }
            '.' => {
                // A leading dot starts a number only when a digit follows (".5")
                if pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit() {
                    let (token, next) = lex_number(input, pos)?;
                    tokens.push(token);
                    pos = next;
                } else {
                    return Err(PropError::invalid_token_at(".", Span::at(pos)));
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (token, next) = lex_identifier(input, pos);
                tokens.push(token);
                pos = next;
            }
            '+' => {
                tokens.push(Token::Operator(Operator::Add));
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Operator(Operator::Sub));
                pos += 1;
            }
            '*' => {
                // `**` is the power operator in numeric source text
                if pos + 1 < bytes.len() && bytes[pos + 1] == b'*' {
                    tokens.push(Token::Operator(Operator::Pow));
                    pos += 2;
                } else {
                    tokens.push(Token::Operator(Operator::Mul));
                    pos += 1;
                }
            }
            '/' => {
                tokens.push(Token::Operator(Operator::Div));
                pos += 1;
            }
            '^' => {
                tokens.push(Token::Operator(Operator::Pow));
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                pos += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            other => {
                return Err(PropError::invalid_token_at(
                    other.to_string(),
                    Span::at(pos),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Lex a numeric literal: digits, optional fraction, optional exponent
fn lex_number(input: &str, start: usize) -> Result<(Token, usize), PropError> {
    let bytes = input.as_bytes();
    let mut pos = start;
    let mut seen_dot = false;

    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' => pos += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                pos += 1;
            }
            b'e' | b'E' => {
                // Exponent part: e, e+, e- followed by digits
                let mut exp_pos = pos + 1;
                if exp_pos < bytes.len() && (bytes[exp_pos] == b'+' || bytes[exp_pos] == b'-') {
                    exp_pos += 1;
                }
                if exp_pos < bytes.len() && bytes[exp_pos].is_ascii_digit() {
                    pos = exp_pos;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
                break;
            }
            _ => break,
        }
    }

    let text = &input[start..pos];
    match text.parse::<f64>() {
        Ok(n) => Ok((Token::Number(n), pos)),
        Err(_) => Err(PropError::InvalidNumber {
            value: text.to_string(),
            span: Some(Span::new(start, pos)),
        }),
    }
}

/// Lex a (possibly namespace-qualified) identifier
fn lex_identifier(input: &str, start: usize) -> (Token, usize) {
    let bytes = input.as_bytes();
    let mut pos = start;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_alphanumeric() || b == b'_' {
            pos += 1;
        } else if b == b'.'
            && pos + 1 < bytes.len()
            && (bytes[pos + 1].is_ascii_alphabetic() || bytes[pos + 1] == b'_')
        {
            // Qualified segment: "np.sin"
            pos += 2;
        } else {
            break;
        }
    }

    (Token::Identifier(input[start..pos].to_string()), pos)
}
