//! Parser module - converts formula strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::{Expr, PropError};

/// Parse a formula string into an expression AST
///
/// The grammar covers numbers (integer, decimal, scientific), identifiers,
/// `+ - * / ^` with `**` as a power synonym, parentheses, and function calls
/// with comma-separated arguments. Symbols are created for every identifier
/// that is not followed by `(`; unknown function names are kept symbolic and
/// differentiate to partial-derivative notation.
///
/// # Example
/// ```ignore
/// use errprop::parse;
///
/// let expr = parse("x^2 + sin(x)").unwrap();
/// println!("Parsed: {}", expr);
/// ```
///
/// # Errors
/// Returns `PropError` if the input is empty, contains an invalid token or
/// number, or is not a single well-formed expression.
pub fn parse(input: &str) -> Result<Expr, PropError> {
    if input.trim().is_empty() {
        return Err(PropError::EmptyFormula);
    }

    let tokens = lexer::lex(input)?;
    pratt::parse_expression(&tokens)
}
