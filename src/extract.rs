//! Recover a symbolic expression from numeric function source text
//!
//! The input is the source of a Python-style function whose body computes
//! `result = <expression>` from its parameters through the `np` numeric
//! namespace:
//!
//! ```text
//! def resistance(v, i):
//!     result = v / i
//!     return result
//! ```
//!
//! The parameter list is read in declaration order, the first top-level
//! `result = ...` assignment is located, and its right-hand side is parsed
//! with the crate grammar. Numeric-namespace calls are then resolved on the
//! AST: `np.sin` becomes the registry function `sin`, `np.power(a, b)`
//! becomes a power node, `np.pi`/`np.e` become the known constants. The
//! rewrite is name-based on call nodes, never a text substitution, so an
//! alias appearing inside an unrelated identifier cannot be corrupted.
//!
//! Only top-level statements are scanned: a `result` assignment nested in a
//! conditional branch is not found and reports the same descriptive error as
//! a missing one.

use rustc_hash::FxHashSet;

use crate::functions::registry::Registry;
use crate::{parse, Expr, ExprKind, PropError};

/// A function recovered from numeric source text
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicFunction {
    /// Function name from the definition header
    pub name: String,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// The expression bound to `result`, over symbols named after the
    /// parameters
    pub expr: Expr,
}

/// Convert numeric function source text into a symbolic expression
///
/// # Errors
/// - [`PropError::InvalidSource`] when the text has no readable
///   `def name(params):` header
/// - [`PropError::MissingResult`] when no top-level `result = <expr>`
///   assignment exists
/// - [`PropError::UnknownNumericFunction`] for a numeric-namespace call with
///   no symbolic equivalent
/// - [`PropError::UnresolvedName`] for any other name that is not a declared
///   parameter
/// - Parser errors from the right-hand side bubble up unchanged
pub fn symbolic_from_source(source: &str) -> Result<SymbolicFunction, PropError> {
    let lines: Vec<&str> = source.lines().collect();

    let (header_idx, name, params) = parse_header(&lines)?;
    let rhs = find_result_assignment(&lines, header_idx, &name)?;

    let raw = parse(rhs)?;
    let param_set: FxHashSet<String> = params.iter().cloned().collect();
    let expr = resolve_names(&raw, &param_set)?;

    Ok(SymbolicFunction { name, params, expr })
}

/// Locate and parse the `def name(params):` header
fn parse_header(lines: &[&str]) -> Result<(usize, String, Vec<String>), PropError> {
    for (idx, line) in lines.iter().enumerate() {
        let stripped = strip_comment(line);
        let trimmed = stripped.trim();
        if trimmed.is_empty() || trimmed.starts_with('@') {
            // Blank lines and decorators may precede the definition
            continue;
        }

        let Some(rest) = trimmed.strip_prefix("def ") else {
            return Err(PropError::invalid_source(
                "expected a 'def name(params):' header",
            ));
        };

        let open = rest
            .find('(')
            .ok_or_else(|| PropError::invalid_source("missing '(' in function header"))?;
        let close = rest
            .rfind(')')
            .ok_or_else(|| PropError::invalid_source("missing ')' in function header"))?;
        if close < open || !rest[close + 1..].trim_start().starts_with(':') {
            return Err(PropError::invalid_source("malformed function header"));
        }

        let name = rest[..open].trim().to_string();
        if !is_identifier(&name) {
            return Err(PropError::invalid_source(format!(
                "invalid function name '{}'",
                name
            )));
        }

        let mut params = Vec::new();
        for piece in rest[open + 1..close].split(',') {
            // Strip annotations and default values: "x: float = 1.0" -> "x"
            let bare = piece
                .split(|c| c == ':' || c == '=')
                .next()
                .unwrap_or("")
                .trim();
            if bare.is_empty() {
                continue;
            }
            if !is_identifier(bare) {
                return Err(PropError::invalid_source(format!(
                    "invalid parameter name '{}'",
                    bare
                )));
            }
            params.push(bare.to_string());
        }

        return Ok((idx, name, params));
    }

    Err(PropError::invalid_source(
        "no function definition found in source text",
    ))
}

/// Scan top-level body statements for `result = <expr>` and return the
/// right-hand side text
fn find_result_assignment<'a>(
    lines: &[&'a str],
    header_idx: usize,
    function: &str,
) -> Result<&'a str, PropError> {
    let mut base_indent: Option<usize> = None;

    for line in lines.iter().skip(header_idx + 1) {
        let stripped = strip_comment(line);
        if stripped.trim().is_empty() {
            continue;
        }

        let indent = indent_width(stripped);
        let base = *base_indent.get_or_insert(indent);

        if indent < base {
            // Dedent past the function body: anything after is not ours
            break;
        }
        if indent > base {
            // Nested block (conditional, loop): top-level scan skips it
            continue;
        }

        if let Some((target, rhs)) = split_assignment(stripped.trim()) {
            if target == "result" {
                return Ok(rhs);
            }
        }
    }

    Err(PropError::MissingResult {
        function: function.to_string(),
    })
}

/// Split a statement at its assignment operator, rejecting comparison and
/// augmented-assignment operators
fn split_assignment(stmt: &str) -> Option<(&str, &str)> {
    let bytes = stmt.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'=' {
            continue;
        }
        if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
            return None; // comparison
        }
        if i > 0 && matches!(bytes[i - 1], b'<' | b'>' | b'!' | b'+' | b'-' | b'*' | b'/' | b'%') {
            return None; // comparison or augmented assignment
        }
        return Some((stmt[..i].trim(), stmt[i + 1..].trim()));
    }
    None
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Resolve every name in the parsed right-hand side: parameters stay
/// symbolic, numeric-namespace calls map to registry functions, everything
/// else is an error
fn resolve_names(expr: &Expr, params: &FxHashSet<String>) -> Result<Expr, PropError> {
    match &expr.kind {
        ExprKind::Number(_) => Ok(expr.clone()),

        ExprKind::Symbol(s) => {
            let name = s.name();
            if params.contains(name) {
                Ok(expr.clone())
            } else if name == "np.pi" {
                Ok(Expr::symbol("pi"))
            } else if name == "np.e" {
                Ok(Expr::symbol("e"))
            } else {
                Err(PropError::UnresolvedName {
                    name: name.to_string(),
                })
            }
        }

        ExprKind::FunctionCall { name, args } => {
            if name == "np.power" && args.len() == 2 {
                let base = resolve_names(&args[0], params)?;
                let exp = resolve_names(&args[1], params)?;
                return Ok(Expr::pow(base, exp));
            }

            if name.starts_with("np.") {
                let def = Registry::resolve_numeric_alias(name).ok_or_else(|| {
                    PropError::UnknownNumericFunction {
                        name: name.clone(),
                    }
                })?;
                if !def.validate_arity(args.len()) {
                    return Err(PropError::UnsupportedOperation(format!(
                        "'{}' called with {} argument(s)",
                        name,
                        args.len()
                    )));
                }
                let resolved: Vec<Expr> = args
                    .iter()
                    .map(|a| resolve_names(a, params))
                    .collect::<Result<_, _>>()?;
                return Ok(Expr::func_multi(def.name, resolved));
            }

            // The numeric source can only resolve parameters and the numeric
            // namespace; a bare call would be an undefined name at eval time
            Err(PropError::UnresolvedName { name: name.clone() })
        }

        ExprKind::Add(u, v) => Ok(Expr::add_expr(
            resolve_names(u, params)?,
            resolve_names(v, params)?,
        )),
        ExprKind::Sub(u, v) => Ok(Expr::sub_expr(
            resolve_names(u, params)?,
            resolve_names(v, params)?,
        )),
        ExprKind::Mul(u, v) => Ok(Expr::mul_expr(
            resolve_names(u, params)?,
            resolve_names(v, params)?,
        )),
        ExprKind::Div(u, v) => Ok(Expr::div_expr(
            resolve_names(u, params)?,
            resolve_names(v, params)?,
        )),
        ExprKind::Pow(u, v) => Ok(Expr::pow(
            resolve_names(u, params)?,
            resolve_names(v, params)?,
        )),

        ExprKind::Derivative { inner, var, order } => Ok(Expr::derivative(
            resolve_names(inner, params)?,
            var.clone(),
            *order,
        )),
    }
}
