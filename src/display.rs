//! Display formatting for expressions
//!
//! Two output formats:
//!
//! - Standard `Display` (`{}`): human-readable math text, e.g.
//!   `sqrt((y * delta_x)^2 + (x * delta_y)^2)`
//! - [`Expr::to_latex`]: typeset markup, e.g.
//!   `\sqrt{\left(y \cdot \delta_{x}\right)^{2} + ...}`
//!
//! Symbol names map to Greek letters where they match (`delta_x` becomes
//! `\delta_{x}`), `e^x` always renders as `exp(x)` in plain text, and
//! negative factors fold into subtraction signs.

use crate::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write_number(f, *n),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::FunctionCall { name, args } => {
                if args.is_empty() {
                    write!(f, "{}()", name)
                } else {
                    let args_str: Vec<String> = args.iter().map(|arg| format!("{}", arg)).collect();
                    write!(f, "{}({})", name, args_str.join(", "))
                }
            }

            ExprKind::Add(u, v) => {
                // Fold a negative right term (Mul with -1) into subtraction
                if let Some(positive) = negated_operand(v) {
                    write!(f, "{} - {}", u, format_mul_operand(&positive))
                } else {
                    write!(f, "{} + {}", u, v)
                }
            }

            ExprKind::Sub(u, v) => {
                // Parenthesize the RHS when it is an addition or subtraction to
                // preserve grouping: `a - (b + c)` instead of `a - b + c`
                let right_str = match &v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", v),
                    _ => format!("{}", v),
                };
                write!(f, "{} - {}", u, right_str)
            }

            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    write!(f, "{} * {}", format_mul_operand(u), format_mul_operand(v))
                }
            }

            ExprKind::Div(u, v) => {
                // Parenthesize sums in the numerator, and anything but a simple
                // operand in the denominator
                let formatted_num = match &u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_denom = match &v.kind {
                    ExprKind::Symbol(_)
                    | ExprKind::Number(_)
                    | ExprKind::Pow(_, _)
                    | ExprKind::FunctionCall { .. } => format!("{}", v),
                    _ => format!("({})", v),
                };
                write!(f, "{} / {}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                // Special case: e^x displays as exp(x)
                if matches!(&u.kind, ExprKind::Symbol(s) if s == "e") {
                    return write!(f, "exp({})", v);
                }

                // Mul and Div bases MUST be parenthesized to avoid ambiguity:
                // (C * R)^2 should display as "(C * R)^2", not "C * R^2"
                let formatted_base = match &u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _) => format!("({})", u),
                    ExprKind::Number(n) if *n < 0.0 => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_exp = match &v.kind {
                    ExprKind::Number(n) if *n >= 0.0 => format!("{}", v),
                    ExprKind::Symbol(_) => format!("{}", v),
                    _ => format!("({})", v),
                };
                write!(f, "{}^{}", formatted_base, formatted_exp)
            }

            ExprKind::Derivative { inner, var, order } => {
                if *order == 1 {
                    write!(f, "∂({})/∂{}", inner, var)
                } else {
                    write!(f, "∂^{}({})/∂{}^{}", order, inner, var, order)
                }
            }
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        // Display as integer if no fractional part
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// If the expression is `-1 * x`, return `x`
fn negated_operand(expr: &Expr) -> Option<Expr> {
    if let ExprKind::Mul(left, right) = &expr.kind {
        if left.is_neg_one_num() {
            return Some((**right).clone());
        }
    }
    None
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", expr),
        _ => format!("{}", expr),
    }
}

// ============================================================================
// LaTeX rendering
// ============================================================================

impl Expr {
    /// Render the expression as LaTeX math markup
    pub fn to_latex(&self) -> String {
        format!("{}", LatexFormatter { expr: self })
    }
}

struct LatexFormatter<'a> {
    expr: &'a Expr,
}

impl<'a> LatexFormatter<'a> {
    fn wrap(expr: &'a Expr) -> Self {
        LatexFormatter { expr }
    }
}

impl fmt::Display for LatexFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr.kind {
            ExprKind::Number(n) => write_number(f, *n),

            ExprKind::Symbol(s) => write_latex_symbol(f, s.name()),

            ExprKind::FunctionCall { name, args } => write_latex_call(f, name, args),

            ExprKind::Add(u, v) => {
                if let Some(positive) = negated_operand(v) {
                    write!(f, "{} - ", LatexFormatter::wrap(u))?;
                    write_latex_product_operand(f, &positive)
                } else {
                    write!(
                        f,
                        "{} + {}",
                        LatexFormatter::wrap(u),
                        LatexFormatter::wrap(v)
                    )
                }
            }

            ExprKind::Sub(u, v) => {
                write!(f, "{} - ", LatexFormatter::wrap(u))?;
                match &v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => {
                        write!(f, r"\left({}\right)", LatexFormatter::wrap(v))
                    }
                    _ => write!(f, "{}", LatexFormatter::wrap(v)),
                }
            }

            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    write!(f, "-")?;
                    write_latex_product_operand(f, v)
                } else {
                    write_latex_product_operand(f, u)?;
                    write!(f, r" \cdot ")?;
                    write_latex_product_operand(f, v)
                }
            }

            ExprKind::Div(u, v) => {
                write!(
                    f,
                    r"\frac{{{}}}{{{}}}",
                    LatexFormatter::wrap(u),
                    LatexFormatter::wrap(v)
                )
            }

            ExprKind::Pow(u, v) => {
                match &u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _) => {
                        write!(f, r"\left({}\right)", LatexFormatter::wrap(u))?;
                    }
                    ExprKind::Number(n) if *n < 0.0 => {
                        write!(f, r"\left({}\right)", LatexFormatter::wrap(u))?;
                    }
                    _ => write!(f, "{}", LatexFormatter::wrap(u))?,
                }
                write!(f, "^{{{}}}", LatexFormatter::wrap(v))
            }

            ExprKind::Derivative { inner, var, order } => {
                if *order == 1 {
                    write!(f, r"\frac{{\partial}}{{\partial ")?;
                    write_latex_symbol(f, var)?;
                    write!(f, r"}}\left({}\right)", LatexFormatter::wrap(inner))
                } else {
                    write!(f, r"\frac{{\partial^{{{}}}}}{{\partial ", order)?;
                    write_latex_symbol(f, var)?;
                    write!(
                        f,
                        r"^{{{}}}}}\left({}\right)",
                        order,
                        LatexFormatter::wrap(inner)
                    )
                }
            }
        }
    }
}

fn write_latex_product_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match &expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => {
            write!(f, r"\left({}\right)", LatexFormatter::wrap(expr))
        }
        _ => write!(f, "{}", LatexFormatter::wrap(expr)),
    }
}

/// Render a symbol name: Greek letters map to commands, and a `head_tail`
/// name renders the tail as a subscript (`delta_x` becomes `\delta_{x}`)
fn write_latex_symbol(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if let Some(greek) = greek_to_latex(name) {
        return write!(f, "{}", greek);
    }
    if let Some((head, tail)) = name.split_once('_') {
        if !tail.is_empty() {
            if let Some(greek) = greek_to_latex(head) {
                return write!(f, "{}_{{{}}}", greek, tail);
            }
            return write!(f, "{}_{{{}}}", head, tail);
        }
    }
    write!(f, "{}", name)
}

fn greek_to_latex(name: &str) -> Option<&'static str> {
    let cmd = match name {
        "alpha" => r"\alpha",
        "beta" => r"\beta",
        "gamma" => r"\gamma",
        "delta" => r"\delta",
        "epsilon" => r"\epsilon",
        "zeta" => r"\zeta",
        "eta" => r"\eta",
        "theta" => r"\theta",
        "kappa" => r"\kappa",
        "lambda" => r"\lambda",
        "mu" => r"\mu",
        "nu" => r"\nu",
        "xi" => r"\xi",
        "pi" => r"\pi",
        "rho" => r"\rho",
        "sigma" => r"\sigma",
        "tau" => r"\tau",
        "phi" => r"\phi",
        "chi" => r"\chi",
        "psi" => r"\psi",
        "omega" => r"\omega",
        "Gamma" => r"\Gamma",
        "Delta" => r"\Delta",
        "Theta" => r"\Theta",
        "Lambda" => r"\Lambda",
        "Sigma" => r"\Sigma",
        "Phi" => r"\Phi",
        "Psi" => r"\Psi",
        "Omega" => r"\Omega",
        _ => return None,
    };
    Some(cmd)
}

fn write_latex_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[Expr]) -> fmt::Result {
    if args.len() == 1 {
        match name {
            "sqrt" => return write!(f, r"\sqrt{{{}}}", LatexFormatter::wrap(&args[0])),
            "cbrt" => return write!(f, r"\sqrt[3]{{{}}}", LatexFormatter::wrap(&args[0])),
            "abs" => {
                return write!(f, r"\left|{}\right|", LatexFormatter::wrap(&args[0]));
            }
            "log10" => {
                return write!(
                    f,
                    r"\log_{{10}}\left({}\right)",
                    LatexFormatter::wrap(&args[0])
                );
            }
            "log2" => {
                return write!(
                    f,
                    r"\log_{{2}}\left({}\right)",
                    LatexFormatter::wrap(&args[0])
                );
            }
            _ => {}
        }
    }

    let prefix = latex_function_name(name);
    write!(f, "{}", prefix)?;
    write!(f, r"\left(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", LatexFormatter::wrap(arg))?;
    }
    write!(f, r"\right)")
}

/// LaTeX command for a function name; unknown names use `\operatorname`
fn latex_function_name(name: &str) -> String {
    match name {
        "sin" | "cos" | "tan" | "sinh" | "cosh" | "tanh" | "exp" | "ln" => {
            format!(r"\{}", name)
        }
        "asin" => r"\arcsin".to_string(),
        "acos" => r"\arccos".to_string(),
        "atan" => r"\arctan".to_string(),
        "asinh" | "acosh" | "atanh" | "sign" => {
            format!(r"\operatorname{{{}}}", name)
        }
        other => format!(r"\operatorname{{{}}}", other),
    }
}
