//! Simplification framework - reduces expressions
//!
//! Runs the rule pass bottom-up until a fixpoint (bounded by `MAX_PASSES`).
//! The rules are deliberately conservative: numeric folding, identity
//! elements, like-term collection, power laws, and the root/absolute-value
//! rewrites that keep propagation output readable. Nothing here changes the
//! domain of an expression except `sqrt(u^2) -> |u|`, which is exact.

pub(crate) mod rules;

use crate::Expr;

/// Pass cap: every rule strictly reduces or canonicalizes, so a handful of
/// passes reaches the fixpoint for any expression the crate produces
const MAX_PASSES: usize = 10;

/// Simplify an expression
pub fn simplify_expr(expr: Expr) -> Expr {
    let mut current = expr;

    for _ in 0..MAX_PASSES {
        let next = rules::simplify_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn simplify_str(input: &str) -> String {
        format!("{}", simplify_expr(parse(input).unwrap()))
    }

    #[test]
    fn test_identity_elements() {
        assert_eq!(simplify_str("x + 0"), "x");
        assert_eq!(simplify_str("0 + x"), "x");
        assert_eq!(simplify_str("x * 1"), "x");
        assert_eq!(simplify_str("1 * x"), "x");
        assert_eq!(simplify_str("x / 1"), "x");
        assert_eq!(simplify_str("0 * x"), "0");
    }

    #[test]
    fn test_like_terms() {
        assert_eq!(simplify_str("x + x"), "2 * x");
        assert_eq!(simplify_str("x - x"), "0");
        assert_eq!(simplify_str("x * x"), "x^2");
        assert_eq!(simplify_str("x / x"), "1");
    }

    #[test]
    fn test_power_laws() {
        assert_eq!(simplify_str("x^0"), "1");
        assert_eq!(simplify_str("x^1"), "x");
        assert_eq!(simplify_str("1^x"), "1");
        assert_eq!(simplify_str("(x^2)^3"), "x^6");
    }

    #[test]
    fn test_numeric_folding() {
        assert_eq!(simplify_str("2 + 3"), "5");
        assert_eq!(simplify_str("2 * 3 + 1"), "7");
        assert_eq!(simplify_str("2^3"), "8");
        assert_eq!(simplify_str("6 / 2 * x"), "3 * x");
        // Division only folds when the quotient is exact
        assert_eq!(simplify_str("7 / 2"), "7 / 2");
    }

    #[test]
    fn test_coefficient_normalization() {
        assert_eq!(simplify_str("x * 2"), "2 * x");
        assert_eq!(simplify_str("2 * (3 * x)"), "6 * x");
    }

    #[test]
    fn test_sqrt_of_square_is_abs() {
        assert_eq!(simplify_str("sqrt(x^2)"), "abs(x)");
    }

    #[test]
    fn test_abs_splits_over_products() {
        assert_eq!(simplify_str("abs(2 * x)"), "2 * abs(x)");
        assert_eq!(simplify_str("abs(abs(x))"), "abs(x)");
        assert_eq!(simplify_str("abs(x^2)"), "x^2");
    }

    #[test]
    fn test_function_constant_folding() {
        assert_eq!(simplify_str("sqrt(4)"), "2");
        assert_eq!(simplify_str("cbrt(27)"), "3");
        assert_eq!(simplify_str("ln(1)"), "0");
        assert_eq!(simplify_str("abs(-2.5)"), "2.5");
        // Non-clean values stay symbolic
        assert_eq!(simplify_str("sqrt(2)"), "sqrt(2)");
    }

    #[test]
    fn test_log_exp_inverses() {
        assert_eq!(simplify_str("exp(ln(x))"), "x");
        assert_eq!(simplify_str("ln(exp(x))"), "x");
        assert_eq!(simplify_str("ln(e)"), "1");
    }

    #[test]
    fn test_reciprocal_power_collapse() {
        assert_eq!(simplify_str("y / y^2"), "1 / y");
    }

    #[test]
    fn test_idempotent() {
        let once = simplify_expr(parse("sqrt((2 * x)^2) + 0").unwrap());
        let twice = simplify_expr(once.clone());
        assert_eq!(once, twice);
    }
}
