// Differentiation engine - applies calculus rules
//
// This module contains inline simplification checks (e.g., 0 + x -> x,
// 1 * x -> x) during derivative computation. This is intentional and not
// redundant with the simplification module: without inline shortcuts,
// differentiating something like sin(x^5) creates large intermediate trees
// before simplification runs, and the inline checks are O(1) pattern matches
// on immediate operands.

use rustc_hash::FxHashSet;

use crate::{Expr, ExprKind};

impl Expr {
    /// Differentiate this expression with respect to a variable
    ///
    /// # Arguments
    /// * `var` - Variable to differentiate with respect to
    /// * `fixed_vars` - Set of symbol names that are constants
    pub(crate) fn derive(&self, var: &str, fixed_vars: &FxHashSet<String>) -> Expr {
        match &self.kind {
            // Base cases
            ExprKind::Number(_) => Expr::number(0.0),

            ExprKind::Symbol(name) => {
                if name == var && !fixed_vars.contains(name.as_ref()) {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            // Function call: registry rule, or symbolic partial for unknowns
            ExprKind::FunctionCall { name, args } => {
                if args.is_empty() {
                    return Expr::number(0.0);
                }

                if let Some(def) = crate::functions::registry::Registry::get(name) {
                    if def.validate_arity(args.len()) {
                        let arg_primes: Vec<Expr> =
                            args.iter().map(|arg| arg.derive(var, fixed_vars)).collect();
                        return (def.derivative)(args, &arg_primes);
                    }
                }

                // Unknown function - multi-variable chain rule with symbolic
                // partial-derivative notation:
                // d/dx f(u1, u2, ...) = sum( (df/du_i) * (du_i/dx) )
                let mut terms = Vec::new();

                for arg in args.iter() {
                    let arg_prime = arg.derive(var, fixed_vars);

                    if arg_prime.is_zero_num() {
                        continue;
                    }

                    let inner_func = Expr::func_multi(name.clone(), args.clone());
                    let partial_derivative = Expr::derivative(inner_func, var.to_string(), 1);

                    terms.push(Expr::mul_expr(partial_derivative, arg_prime));
                }

                sum_terms(terms)
            }

            // Sum rule: (u + v)' = u' + v'
            ExprKind::Add(u, v) => {
                let u_prime = u.derive(var, fixed_vars);
                let v_prime = v.derive(var, fixed_vars);
                if u_prime.is_zero_num() {
                    v_prime
                } else if v_prime.is_zero_num() {
                    u_prime
                } else {
                    Expr::add_expr(u_prime, v_prime)
                }
            }

            // Subtraction rule: (u - v)' = u' - v'
            ExprKind::Sub(u, v) => {
                let u_prime = u.derive(var, fixed_vars);
                let v_prime = v.derive(var, fixed_vars);
                if v_prime.is_zero_num() {
                    u_prime
                } else if u_prime.is_zero_num() {
                    Expr::mul_expr(Expr::number(-1.0), v_prime)
                } else {
                    Expr::sub_expr(u_prime, v_prime)
                }
            }

            // Product rule: (u * v)' = u' * v + u * v'
            ExprKind::Mul(u, v) => {
                let u_prime = u.derive(var, fixed_vars);
                let v_prime = v.derive(var, fixed_vars);

                let term1 = mul_term(&u_prime, v);
                let term2 = mul_term(&v_prime, u);

                if term1.is_zero_num() {
                    term2
                } else if term2.is_zero_num() {
                    term1
                } else {
                    Expr::add_expr(term1, term2)
                }
            }

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            ExprKind::Div(u, v) => {
                let u_prime = u.derive(var, fixed_vars);
                let v_prime = v.derive(var, fixed_vars);

                if u_prime.is_zero_num() && v_prime.is_zero_num() {
                    return Expr::number(0.0);
                }

                let term1 = mul_term(&u_prime, v);
                let term2 = mul_term(&v_prime, u);

                let numerator = if term2.is_zero_num() {
                    term1
                } else if term1.is_zero_num() {
                    Expr::mul_expr(Expr::number(-1.0), term2)
                } else {
                    Expr::sub_expr(term1, term2)
                };

                if numerator.is_zero_num() {
                    Expr::number(0.0)
                } else if v.is_one_num() {
                    numerator
                } else {
                    let denominator = Expr::pow((**v).clone(), Expr::number(2.0));
                    Expr::div_expr(numerator, denominator)
                }
            }

            // Power rule, with logarithmic differentiation for variable exponents
            ExprKind::Pow(u, v) => {
                if !v.has_free_variables(fixed_vars) {
                    // Constant exponent: (u^n)' = n * u^(n-1) * u'
                    let u_prime = u.derive(var, fixed_vars);

                    if u_prime.is_zero_num() {
                        return Expr::number(0.0);
                    }

                    let n = (**v).clone();
                    if let Some(n_val) = n.as_number() {
                        if n_val == 0.0 {
                            // (u^0)' = 0
                            Expr::number(0.0)
                        } else if n_val == 1.0 {
                            // (u^1)' = u'
                            u_prime
                        } else {
                            let u_pow_n_minus_1 = if u.is_one_num() {
                                Expr::number(1.0)
                            } else if u.is_zero_num() {
                                Expr::number(0.0)
                            } else {
                                Expr::pow((**u).clone(), Expr::number(n_val - 1.0))
                            };

                            if u_prime.is_one_num() {
                                Expr::mul_expr(n, u_pow_n_minus_1)
                            } else {
                                Expr::mul_expr(n, Expr::mul_expr(u_pow_n_minus_1, u_prime))
                            }
                        }
                    } else {
                        // Non-numeric constant exponent
                        let n_minus_1 = Expr::sub_expr((**v).clone(), Expr::number(1.0));
                        let u_pow_n_minus_1 = Expr::pow((**u).clone(), n_minus_1);

                        if u_prime.is_one_num() {
                            Expr::mul_expr((**v).clone(), u_pow_n_minus_1)
                        } else {
                            Expr::mul_expr(
                                (**v).clone(),
                                Expr::mul_expr(u_pow_n_minus_1, u_prime),
                            )
                        }
                    }
                } else {
                    // Variable exponent - logarithmic differentiation:
                    // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                    let u_prime = u.derive(var, fixed_vars);
                    let v_prime = v.derive(var, fixed_vars);

                    if u_prime.is_zero_num() && v_prime.is_zero_num() {
                        return Expr::number(0.0);
                    }

                    // Term 1: v' * ln(u)
                    let ln_u = if matches!(&u.kind, ExprKind::Symbol(name) if name == "e")
                        && !fixed_vars.contains("e")
                    {
                        // ln(e) = 1
                        Expr::number(1.0)
                    } else if u.is_one_num() {
                        // ln(1) = 0
                        Expr::number(0.0)
                    } else {
                        Expr::func("ln", (**u).clone())
                    };
                    let term1 = crate::functions::mul_opt(v_prime.clone(), ln_u);

                    // Term 2: v * (u'/u)
                    let u_ratio = if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else if u.is_one_num() {
                        u_prime.clone()
                    } else if u_prime.is_one_num() {
                        Expr::pow((**u).clone(), Expr::number(-1.0))
                    } else {
                        Expr::div_expr(u_prime, (**u).clone())
                    };
                    let term2 = crate::functions::mul_opt((**v).clone(), u_ratio);

                    let sum = if term1.is_zero_num() {
                        term2
                    } else if term2.is_zero_num() {
                        term1
                    } else {
                        Expr::add_expr(term1, term2)
                    };

                    crate::functions::mul_opt(Expr::pow((**u).clone(), (**v).clone()), sum)
                }
            }

            // Derivative expressions: d/dx (d^n f / dx^n) = d^(n+1) f / dx^(n+1)
            ExprKind::Derivative {
                inner,
                var: deriv_var,
                order,
            } => {
                if deriv_var == var {
                    // Same variable: increment order
                    Expr::derivative((**inner).clone(), deriv_var.clone(), order + 1)
                } else if !inner.contains_var(var) {
                    Expr::number(0.0)
                } else {
                    // Mixed partial, represented as nested derivatives
                    Expr::derivative(
                        Expr::new(ExprKind::Derivative {
                            inner: inner.clone(),
                            var: deriv_var.clone(),
                            order: *order,
                        }),
                        var.to_string(),
                        1,
                    )
                }
            }
        }
    }
}

/// Build `a * b` with the inline 0/1 shortcuts
fn mul_term(a: &Expr, b: &Expr) -> Expr {
    if a.is_zero_num() || b.is_zero_num() {
        Expr::number(0.0)
    } else if a.is_one_num() {
        b.clone()
    } else if b.is_one_num() {
        a.clone()
    } else {
        Expr::mul_expr(a.clone(), b.clone())
    }
}

/// Sum a list of derivative terms, avoiding empty and single-element Adds
fn sum_terms(mut terms: Vec<Expr>) -> Expr {
    if terms.is_empty() {
        Expr::number(0.0)
    } else if terms.len() == 1 {
        terms.remove(0)
    } else {
        let mut result = terms.remove(0);
        for term in terms {
            result = Expr::add_expr(result, term);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_fixed() -> FxHashSet<String> {
        FxHashSet::default()
    }

    #[test]
    fn test_derive_symbol() {
        let x = Expr::symbol("x");
        assert_eq!(x.derive("x", &no_fixed()).as_number(), Some(1.0));
        assert_eq!(x.derive("y", &no_fixed()).as_number(), Some(0.0));
    }

    #[test]
    fn test_derive_fixed_var_is_constant() {
        let a = Expr::symbol("a");
        let mut fixed = FxHashSet::default();
        fixed.insert("a".to_string());
        assert_eq!(a.derive("a", &fixed).as_number(), Some(0.0));
    }

    #[test]
    fn test_derive_product() {
        // (x * y)' wrt x = y
        let expr = Expr::mul_expr(Expr::symbol("x"), Expr::symbol("y"));
        let result = expr.derive("x", &no_fixed());
        assert_eq!(result, Expr::symbol("y"));
    }

    #[test]
    fn test_derive_subtraction() {
        // (x - 1)' = 1
        let expr = Expr::sub_expr(Expr::symbol("x"), Expr::number(1.0));
        let result = expr.derive("x", &no_fixed());
        assert_eq!(result.as_number(), Some(1.0));
    }

    #[test]
    fn test_derive_division() {
        // (x / 2)' = 2 / 2^2
        let expr = Expr::div_expr(Expr::symbol("x"), Expr::number(2.0));
        let result = expr.derive("x", &no_fixed());
        assert!(matches!(result.kind, ExprKind::Div(_, _)));
    }

    #[test]
    fn test_derive_sinh() {
        let expr = Expr::func("sinh", Expr::symbol("x"));
        let result = expr.derive("x", &no_fixed());
        match result.kind {
            ExprKind::FunctionCall { name, .. } => assert_eq!(name, "cosh"),
            other => panic!("Expected cosh, got {:?}", other),
        }
    }

    #[test]
    fn test_derive_power_rule() {
        // (x^3)' = 3 * x^2
        let expr = Expr::pow(Expr::symbol("x"), Expr::number(3.0));
        let result = expr.derive("x", &no_fixed());
        assert_eq!(format!("{}", result), "3 * x^2");
    }

    #[test]
    fn test_logarithmic_differentiation() {
        // x^x uses logarithmic differentiation
        let expr = Expr::pow(Expr::symbol("x"), Expr::symbol("x"));
        let result = expr.derive("x", &no_fixed());
        assert!(matches!(result.kind, ExprKind::Mul(_, _)));
        let s = format!("{}", result);
        assert!(s.contains("ln"), "expected ln in {}", s);
    }

    #[test]
    fn test_unknown_function_produces_partial_notation() {
        let expr = Expr::func("f", Expr::symbol("x"));
        let result = expr.derive("x", &no_fixed());
        assert!(matches!(result.kind, ExprKind::Derivative { .. }));
    }

    #[test]
    fn test_derivative_order_increment() {
        let inner = Expr::func("f", Expr::symbol("x"));
        let first = Expr::derivative(inner, "x".to_string(), 1);
        let result = first.derive("x", &no_fixed());
        match result.kind {
            ExprKind::Derivative { order, var, .. } => {
                assert_eq!(order, 2);
                assert_eq!(var, "x");
            }
            other => panic!("Expected Derivative, got {:?}", other),
        }
    }

    #[test]
    fn test_derivative_unrelated_var_is_zero() {
        let inner = Expr::func("f", Expr::symbol("x"));
        let first = Expr::derivative(inner, "x".to_string(), 1);
        let result = first.derive("y", &no_fixed());
        assert_eq!(result.as_number(), Some(0.0));
    }

    #[test]
    fn test_constant_pi_differentiates_to_zero() {
        // pi * x wrt x = pi
        let expr = Expr::mul_expr(Expr::symbol("pi"), Expr::symbol("x"));
        let result = expr.derive("x", &no_fixed());
        assert_eq!(result, Expr::symbol("pi"));
    }
}
