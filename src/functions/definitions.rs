//! Mathematical function definitions for the function registry
//!
//! Contains evaluation rules, symbolic derivatives, and numeric-namespace
//! aliases for all supported functions. Derivative formulas follow standard
//! calculus (DLMF §4.21-4.37 for the trigonometric and hyperbolic families).

use super::registry::FunctionDefinition;
use super::{func, mul_opt, neg, recip};
use crate::Expr;

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            numeric_aliases: &["np.sin"],
            eval: |args| Some(args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                mul_opt(func("cos", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            numeric_aliases: &["np.cos"],
            eval: |args| Some(args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul_opt(neg(func("sin", args[0].clone())), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            numeric_aliases: &["np.tan"],
            eval: |args| Some(args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = u' / cos(u)^2
                mul_opt(
                    recip(Expr::pow(func("cos", args[0].clone()), Expr::number(2.0))),
                    arg_primes[0].clone(),
                )
            },
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            numeric_aliases: &["np.arcsin"],
            eval: |args| Some(args[0].asin()),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                mul_opt(
                    recip(func(
                        "sqrt",
                        Expr::sub_expr(
                            Expr::number(1.0),
                            Expr::pow(args[0].clone(), Expr::number(2.0)),
                        ),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            numeric_aliases: &["np.arccos"],
            eval: |args| Some(args[0].acos()),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                mul_opt(
                    neg(recip(func(
                        "sqrt",
                        Expr::sub_expr(
                            Expr::number(1.0),
                            Expr::pow(args[0].clone(), Expr::number(2.0)),
                        ),
                    ))),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            numeric_aliases: &["np.arctan"],
            eval: |args| Some(args[0].atan()),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                mul_opt(
                    recip(Expr::add_expr(
                        Expr::number(1.0),
                        Expr::pow(args[0].clone(), Expr::number(2.0)),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            numeric_aliases: &["np.sinh"],
            eval: |args| Some(args[0].sinh()),
            derivative: |args, arg_primes| {
                // d/dx sinh(u) = cosh(u) * u'
                mul_opt(func("cosh", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            numeric_aliases: &["np.cosh"],
            eval: |args| Some(args[0].cosh()),
            derivative: |args, arg_primes| {
                // d/dx cosh(u) = sinh(u) * u'
                mul_opt(func("sinh", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            numeric_aliases: &["np.tanh"],
            eval: |args| Some(args[0].tanh()),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = u' / cosh(u)^2
                mul_opt(
                    recip(Expr::pow(func("cosh", args[0].clone()), Expr::number(2.0))),
                    arg_primes[0].clone(),
                )
            },
        },
        // Inverse hyperbolic
        FunctionDefinition {
            name: "asinh",
            arity: 1..=1,
            numeric_aliases: &["np.arcsinh"],
            eval: |args| Some(args[0].asinh()),
            derivative: |args, arg_primes| {
                // d/dx asinh(u) = u' / sqrt(u^2 + 1)
                mul_opt(
                    recip(func(
                        "sqrt",
                        Expr::add_expr(
                            Expr::pow(args[0].clone(), Expr::number(2.0)),
                            Expr::number(1.0),
                        ),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1..=1,
            numeric_aliases: &["np.arccosh"],
            eval: |args| Some(args[0].acosh()),
            derivative: |args, arg_primes| {
                // d/dx acosh(u) = u' / sqrt(u^2 - 1)
                mul_opt(
                    recip(func(
                        "sqrt",
                        Expr::sub_expr(
                            Expr::pow(args[0].clone(), Expr::number(2.0)),
                            Expr::number(1.0),
                        ),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1..=1,
            numeric_aliases: &["np.arctanh"],
            eval: |args| Some(args[0].atanh()),
            derivative: |args, arg_primes| {
                // d/dx atanh(u) = u' / (1 - u^2)
                mul_opt(
                    recip(Expr::sub_expr(
                        Expr::number(1.0),
                        Expr::pow(args[0].clone(), Expr::number(2.0)),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        // Exponential and logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            numeric_aliases: &["np.exp"],
            eval: |args| Some(args[0].exp()),
            derivative: |args, arg_primes| {
                // d/dx exp(u) = exp(u) * u'
                mul_opt(func("exp", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            // NumPy's natural log is spelled "log"
            numeric_aliases: &["np.log"],
            eval: |args| Some(args[0].ln()),
            derivative: |args, arg_primes| {
                // d/dx ln(u) = u' / u
                mul_opt(recip(args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "log10",
            arity: 1..=1,
            numeric_aliases: &["np.log10"],
            eval: |args| Some(args[0].log10()),
            derivative: |args, arg_primes| {
                // d/dx log10(u) = u' / (u * ln(10))
                mul_opt(
                    recip(Expr::mul_expr(
                        args[0].clone(),
                        func("ln", Expr::number(10.0)),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "log2",
            arity: 1..=1,
            numeric_aliases: &["np.log2"],
            eval: |args| Some(args[0].log2()),
            derivative: |args, arg_primes| {
                // d/dx log2(u) = u' / (u * ln(2))
                mul_opt(
                    recip(Expr::mul_expr(
                        args[0].clone(),
                        func("ln", Expr::number(2.0)),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        // Roots
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            numeric_aliases: &["np.sqrt"],
            eval: |args| Some(args[0].sqrt()),
            derivative: |args, arg_primes| {
                // d/dx sqrt(u) = u' / (2 * sqrt(u))
                mul_opt(
                    recip(Expr::mul_expr(
                        Expr::number(2.0),
                        func("sqrt", args[0].clone()),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "cbrt",
            arity: 1..=1,
            numeric_aliases: &["np.cbrt"],
            eval: |args| Some(args[0].cbrt()),
            derivative: |args, arg_primes| {
                // d/dx cbrt(u) = u' / (3 * cbrt(u)^2)
                mul_opt(
                    recip(Expr::mul_expr(
                        Expr::number(3.0),
                        Expr::pow(func("cbrt", args[0].clone()), Expr::number(2.0)),
                    )),
                    arg_primes[0].clone(),
                )
            },
        },
        // Absolute value and sign
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            numeric_aliases: &["np.abs", "np.absolute", "np.fabs"],
            eval: |args| Some(args[0].abs()),
            derivative: |args, arg_primes| {
                // d/dx |u| = sign(u) * u'  (away from u = 0)
                mul_opt(func("sign", args[0].clone()), arg_primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            numeric_aliases: &["np.sign"],
            eval: |args| {
                let x = args[0];
                Some(if x == 0.0 { 0.0 } else { x.signum() })
            },
            derivative: |_args, _arg_primes| {
                // Zero almost everywhere
                Expr::number(0.0)
            },
        },
    ]
}
