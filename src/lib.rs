//! Symbolic Error-Propagation Library
//!
//! Derives, for a formula of several independent variables, the standard
//! first-order error-propagation expression (the "delta rule"):
//!
//! σ_f = sqrt( Σᵢ (∂f/∂xᵢ · δxᵢ)² )
//!
//! both as a symbolic expression and as LaTeX markup. The crate carries its
//! own small symbolic core: expression trees, a Pratt-parsed formula grammar,
//! rule-based differentiation, and a bounded simplifier.
//!
//! # Usage Examples
//!
//! ## Type-safe expression building
//! ```ignore
//! use errprop::{sym, Propagator};
//!
//! let x = sym("x");
//! let y = sym("y");
//! let result = Propagator::new().propagate(&(x * y))?;
//! assert_eq!(result.formula.to_string(), "sqrt((y * delta_x)^2 + (x * delta_y)^2)");
//! ```
//!
//! ## From numeric function source text
//! ```ignore
//! use errprop::propagate_error_from_source;
//!
//! let source = "
//! def kinetic_energy(m, v):
//!     result = m * v**2 / 2
//!     return result
//! ";
//! let (formula, latex) = propagate_error_from_source(source)?;
//! ```

mod ast;
mod differentiation;
mod display;
mod error;
pub mod extract;
mod functions;
mod parser;
mod propagate;
mod simplification;
mod symbol;
mod traits;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Expr, ExprKind};
pub use error::{PropError, Span};
pub use extract::{symbolic_from_source, SymbolicFunction};
pub use parser::parse;
pub use propagate::{gradient, Propagation, Propagator, ERROR_PREFIX};
pub use simplification::simplify_expr;
pub use symbol::{sym, symbol_count, InternedSymbol, Symbol};

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

fn default_propagator() -> Propagator {
    Propagator::new()
        .max_depth(DEFAULT_MAX_DEPTH)
        .max_nodes(DEFAULT_MAX_NODES)
}

fn emit(result: &Propagation) -> (Expr, String) {
    println!("Error propagation formula: {}", result.formula);
    println!("LaTeX form: {}", result.latex);
    (result.formula.clone(), result.latex.clone())
}

/// Derive the error-propagation formula for a symbolic expression
///
/// Prints the plain formula and its LaTeX form to stdout and returns the
/// pair. For a non-printing API with more control (error-symbol prefix,
/// fixed constants, limits), use the [`Propagator`] builder.
///
/// # Example
/// ```ignore
/// use errprop::{propagate_error, sym};
///
/// let x = sym("x");
/// let (formula, latex) = propagate_error(&x.pow(2.0))?;
/// ```
pub fn propagate_error(expr: &Expr) -> Result<(Expr, String), PropError> {
    let result = default_propagator().propagate(expr)?;
    Ok(emit(&result))
}

/// Parse a formula string and derive its error-propagation formula
///
/// Prints the plain formula and its LaTeX form to stdout and returns the
/// pair.
///
/// # Example
/// ```ignore
/// let (formula, latex) = errprop::propagate_error_str("x * y")?;
/// ```
pub fn propagate_error_str(formula: &str) -> Result<(Expr, String), PropError> {
    let result = default_propagator().propagate_str(formula)?;
    Ok(emit(&result))
}

/// Recover a symbolic expression from numeric function source text and
/// derive its error-propagation formula
///
/// This is the conversion path: the source is run through
/// [`symbolic_from_source`] first, and any extraction failure propagates
/// unchanged. Prints the plain formula and its LaTeX form to stdout and
/// returns the pair.
pub fn propagate_error_from_source(source: &str) -> Result<(Expr, String), PropError> {
    let result = default_propagator().propagate_source(source)?;
    Ok(emit(&result))
}
