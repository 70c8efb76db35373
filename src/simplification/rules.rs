//! Rewrite rules applied by the simplification engine
//!
//! `simplify_once` walks the tree bottom-up, rebuilding each node from its
//! simplified children and then trying the node-local rules. The engine in
//! `mod.rs` repeats the pass until nothing changes.

use crate::functions::registry::Registry;
use crate::traits::{is_integer, is_zero};
use crate::{Expr, ExprKind};

/// One bottom-up simplification pass
pub(crate) fn simplify_once(expr: &Expr) -> Expr {
    let rebuilt = match &expr.kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => expr.clone(),
        ExprKind::FunctionCall { name, args } => Expr::func_multi(
            name.clone(),
            args.iter().map(simplify_once).collect::<Vec<_>>(),
        ),
        ExprKind::Add(u, v) => Expr::add_expr(simplify_once(u), simplify_once(v)),
        ExprKind::Sub(u, v) => Expr::sub_expr(simplify_once(u), simplify_once(v)),
        ExprKind::Mul(u, v) => Expr::mul_expr(simplify_once(u), simplify_once(v)),
        ExprKind::Div(u, v) => Expr::div_expr(simplify_once(u), simplify_once(v)),
        ExprKind::Pow(u, v) => Expr::pow(simplify_once(u), simplify_once(v)),
        ExprKind::Derivative { inner, var, order } => {
            Expr::derivative(simplify_once(inner), var.clone(), *order)
        }
    };

    rewrite_node(rebuilt)
}

fn rewrite_node(expr: Expr) -> Expr {
    let replacement = match &expr.kind {
        ExprKind::Add(u, v) => simplify_add(u, v),
        ExprKind::Sub(u, v) => simplify_sub(u, v),
        ExprKind::Mul(u, v) => simplify_mul(u, v),
        ExprKind::Div(u, v) => simplify_div(u, v),
        ExprKind::Pow(u, v) => simplify_pow(u, v),
        ExprKind::FunctionCall { name, args } => simplify_call(name, args),
        _ => None,
    };
    replacement.unwrap_or(expr)
}

fn simplify_add(u: &Expr, v: &Expr) -> Option<Expr> {
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        return Some(Expr::number(a + b));
    }
    if u.is_zero_num() {
        return Some(v.clone());
    }
    if v.is_zero_num() {
        return Some(u.clone());
    }
    // u + u -> 2u
    if u == v {
        return Some(Expr::mul_expr(Expr::number(2.0), u.clone()));
    }
    None
}

fn simplify_sub(u: &Expr, v: &Expr) -> Option<Expr> {
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        return Some(Expr::number(a - b));
    }
    if v.is_zero_num() {
        return Some(u.clone());
    }
    if u == v {
        return Some(Expr::number(0.0));
    }
    if u.is_zero_num() {
        return Some(Expr::mul_expr(Expr::number(-1.0), v.clone()));
    }
    None
}

fn simplify_mul(u: &Expr, v: &Expr) -> Option<Expr> {
    if u.is_zero_num() || v.is_zero_num() {
        return Some(Expr::number(0.0));
    }
    if u.is_one_num() {
        return Some(v.clone());
    }
    if v.is_one_num() {
        return Some(u.clone());
    }
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        return Some(Expr::number(a * b));
    }

    // Canonicalize numeric coefficients to the left and fold nested ones
    match (&u.kind, &v.kind) {
        (ExprKind::Number(a), ExprKind::Mul(m, n)) => {
            // a * (b * x) -> (a*b) * x; a * (x * y) keeps its leading coefficient
            if let Some(b) = m.as_number() {
                return Some(Expr::mul_expr(Expr::number(a * b), (**n).clone()));
            }
        }
        (ExprKind::Mul(m, n), ExprKind::Number(b)) => {
            if let Some(a) = m.as_number() {
                // (a * x) * b -> (a*b) * x
                return Some(Expr::mul_expr(Expr::number(a * b), (**n).clone()));
            }
            // (x * y) * b -> b * (x * y)
            return Some(Expr::mul_expr(Expr::number(*b), u.clone()));
        }
        (ExprKind::Mul(m, n), _) => {
            if m.as_number().is_some() {
                // (a * x) * y -> a * (x * y)
                return Some(Expr::mul_expr(
                    (**m).clone(),
                    Expr::mul_expr((**n).clone(), v.clone()),
                ));
            }
        }
        (_, ExprKind::Number(b)) => {
            // x * b -> b * x
            return Some(Expr::mul_expr(Expr::number(*b), u.clone()));
        }
        (_, ExprKind::Mul(m, n)) => {
            if m.as_number().is_some() {
                // x * (a * y) -> a * (x * y)
                return Some(Expr::mul_expr(
                    (**m).clone(),
                    Expr::mul_expr(u.clone(), (**n).clone()),
                ));
            }
        }
        _ => {}
    }

    // u * u -> u^2
    if u == v {
        return Some(Expr::pow(u.clone(), Expr::number(2.0)));
    }
    None
}

fn simplify_div(u: &Expr, v: &Expr) -> Option<Expr> {
    if v.is_one_num() {
        return Some(u.clone());
    }
    if u.is_zero_num() && !v.is_zero_num() {
        return Some(Expr::number(0.0));
    }
    if u == v {
        return Some(Expr::number(1.0));
    }
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        // Fold only exact quotients; 7/2 stays a fraction
        if !is_zero(b) {
            let q = a / b;
            if is_integer(q) {
                return Some(Expr::number(q.round()));
            }
        }
    }
    // u / u^n -> 1 / u^(n-1)
    if let ExprKind::Pow(base, exp) = &v.kind {
        if let Some(n) = exp.as_number() {
            if u == base.as_ref() {
                return Some(Expr::div_expr(
                    Expr::number(1.0),
                    Expr::pow((**base).clone(), Expr::number(n - 1.0)),
                ));
            }
        }
    }
    None
}

fn simplify_pow(u: &Expr, v: &Expr) -> Option<Expr> {
    if v.is_zero_num() {
        // 0^0 evaluates to 1 following IEEE 754 powf behavior
        return Some(Expr::number(1.0));
    }
    if v.is_one_num() {
        return Some(u.clone());
    }
    if u.is_one_num() {
        return Some(Expr::number(1.0));
    }
    if u.is_zero_num() {
        if let Some(n) = v.as_number() {
            if n > 0.0 {
                return Some(Expr::number(0.0));
            }
        }
    }
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        let r = a.powf(b);
        if r.is_finite() && is_integer(r) {
            return Some(Expr::number(r.round()));
        }
    }
    // (u^a)^b -> u^(a*b)
    if let ExprKind::Pow(base, inner_exp) = &u.kind {
        if let (Some(a), Some(b)) = (inner_exp.as_number(), v.as_number()) {
            return Some(Expr::pow((**base).clone(), Expr::number(a * b)));
        }
    }
    None
}

fn simplify_call(name: &str, args: &[Expr]) -> Option<Expr> {
    // Constant folding through the registry: always for abs/sign, otherwise
    // only when the result is exact (sqrt(4) -> 2, but sqrt(2) stays)
    let numeric_args: Option<Vec<f64>> = args.iter().map(Expr::as_number).collect();
    if let Some(values) = numeric_args {
        if let Some(def) = Registry::get(name) {
            if def.validate_arity(values.len()) {
                if let Some(r) = (def.eval)(&values) {
                    let fold_always = matches!(name, "abs" | "sign");
                    if r.is_finite() && (fold_always || is_integer(r)) {
                        return Some(Expr::number(if fold_always { r } else { r.round() }));
                    }
                }
            }
        }
    }

    if args.len() != 1 {
        return None;
    }
    let arg = &args[0];

    match name {
        "sqrt" => {
            // sqrt(u^2) -> |u|
            if let ExprKind::Pow(base, exp) = &arg.kind {
                if exp.as_number() == Some(2.0) {
                    return Some(Expr::func("abs", (**base).clone()));
                }
            }
            None
        }
        "abs" => match &arg.kind {
            // |a * b| -> |a| * |b|
            ExprKind::Mul(a, b) => Some(Expr::mul_expr(
                Expr::func("abs", (**a).clone()),
                Expr::func("abs", (**b).clone()),
            )),
            // ||u|| -> |u|
            ExprKind::FunctionCall {
                name: inner_name, ..
            } if inner_name == "abs" => Some(arg.clone()),
            // |u^even| -> u^even
            ExprKind::Pow(_, exp) => match exp.as_number() {
                Some(n) if is_integer(n) && (n.round() as i64) % 2 == 0 => Some(arg.clone()),
                _ => None,
            },
            _ => None,
        },
        "exp" => {
            // exp(ln(u)) -> u
            if let ExprKind::FunctionCall {
                name: inner_name,
                args: inner_args,
            } = &arg.kind
            {
                if inner_name == "ln" && inner_args.len() == 1 {
                    return Some(inner_args[0].clone());
                }
            }
            None
        }
        "ln" => {
            // ln(exp(u)) -> u
            if let ExprKind::FunctionCall {
                name: inner_name,
                args: inner_args,
            } = &arg.kind
            {
                if inner_name == "exp" && inner_args.len() == 1 {
                    return Some(inner_args[0].clone());
                }
            }
            // ln(e) -> 1
            if matches!(&arg.kind, ExprKind::Symbol(s) if s == "e") {
                return Some(Expr::number(1.0));
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pass_rebuilds_children_first() {
        // (x * 1) + 0 simplifies fully in one pass because children are
        // rewritten before the parent
        let expr = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::number(1.0)),
            Expr::number(0.0),
        );
        let result = simplify_once(&expr);
        assert_eq!(result, Expr::symbol("x"));
    }

    #[test]
    fn test_mul_coefficient_floats_left() {
        // (2 * x) * y -> 2 * (x * y)
        let expr = Expr::mul_expr(
            Expr::mul_expr(Expr::number(2.0), Expr::symbol("x")),
            Expr::symbol("y"),
        );
        let result = simplify_once(&expr);
        assert_eq!(format!("{}", result), "2 * x * y");
    }

    #[test]
    fn test_abs_of_even_power() {
        let expr = Expr::func(
            "abs",
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
        );
        let result = simplify_once(&expr);
        assert_eq!(format!("{}", result), "x^2");
    }
}
