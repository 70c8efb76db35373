//! Error-propagation formula derivation
//!
//! Implements the first-order, uncorrelated-variables propagation formula:
//!
//! σ_f = sqrt( Σᵢ (∂f/∂xᵢ · δxᵢ)² )
//!
//! One error symbol is synthesized per free variable by prefixing the
//! variable name (default prefix `delta_`). The gradient and the error
//! symbols are built from one ordered pass over the free variables, sorted
//! lexically by name, so a partial derivative can never be paired with the
//! wrong error term.
//!
//! # Reference
//!
//! JCGM 100:2008 "Evaluation of measurement data — Guide to the expression
//! of uncertainty in measurement" (GUM), Section 5.1.2
//! <https://www.bipm.org/documents/20126/2071204/JCGM_100_2008_E.pdf>

use rustc_hash::FxHashSet;

use crate::functions::mul_opt;
use crate::simplification::simplify_expr;
use crate::symbol::Symbol;
use crate::{extract, parse, Expr, PropError};

/// Default prefix for synthesized error symbols
pub const ERROR_PREFIX: &str = "delta_";

/// Result of a propagation run
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// The propagated-error expression, sqrt of the summed squared terms
    pub formula: Expr,
    /// LaTeX rendering of `formula`
    pub latex: String,
    /// Free variables in canonical (lexical) order
    pub variables: Vec<String>,
    /// Synthesized error symbols, paired index-by-index with `variables`
    pub error_symbols: Vec<String>,
}

/// Builder for error-propagation runs
///
/// # Example
/// ```ignore
/// use errprop::{sym, Propagator};
///
/// let x = sym("x");
/// let y = sym("y");
/// let result = Propagator::new().propagate(&(x * y))?;
/// println!("{}", result.formula);  // sqrt((y * delta_x)^2 + (x * delta_y)^2)
/// ```
#[derive(Clone, Default)]
pub struct Propagator {
    prefix: Option<String>,
    fixed_vars: FxHashSet<String>,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
}

impl Propagator {
    /// Create a new propagation builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the error-symbol prefix (default `delta_`)
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Treat a symbol as an exact constant: it gets no error term and is
    /// held fixed during differentiation
    pub fn fixed_var(mut self, var: &Symbol) -> Self {
        self.fixed_vars.insert(var.name().to_string());
        self
    }

    /// Treat multiple symbols as exact constants
    pub fn fixed_vars(mut self, vars: &[&Symbol]) -> Self {
        for v in vars {
            self.fixed_vars.insert(v.name().to_string());
        }
        self
    }

    /// Set maximum AST depth accepted by this builder
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum AST node count accepted by this builder
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Derive the propagated-error expression for a symbolic expression
    ///
    /// With no free variables the propagated error is the number zero.
    pub fn propagate(&self, expr: &Expr) -> Result<Propagation, PropError> {
        // Check limits
        if let Some(max_d) = self.max_depth {
            if expr.max_depth() > max_d {
                return Err(PropError::MaxDepthExceeded);
            }
        }
        if let Some(max_n) = self.max_nodes {
            if expr.node_count() > max_n {
                return Err(PropError::MaxNodesExceeded);
            }
        }

        let prefix = self.prefix.as_deref().unwrap_or(ERROR_PREFIX);

        // Canonical ordering: lexical sort of free-variable names, minus the
        // caller's fixed constants
        let variables: Vec<String> = expr
            .free_variables()
            .into_iter()
            .filter(|name| !self.fixed_vars.contains(name))
            .collect();

        if variables.is_empty() {
            let formula = Expr::number(0.0);
            let latex = formula.to_latex();
            return Ok(Propagation {
                formula,
                latex,
                variables,
                error_symbols: Vec::new(),
            });
        }

        // One pass builds the error symbols and the gradient in lockstep, so
        // pairing cannot drift
        let mut error_symbols = Vec::with_capacity(variables.len());
        let mut terms = Vec::with_capacity(variables.len());

        for var in &variables {
            let error_name = format!("{}{}", prefix, var);
            let error_symbol = Expr::symbol(&error_name);
            error_symbols.push(error_name);

            let partial = simplify_expr(expr.derive(var, &self.fixed_vars));
            let term = Expr::pow(mul_opt(partial, error_symbol), Expr::number(2.0));
            terms.push(term);
        }

        let sum = terms
            .into_iter()
            .reduce(Expr::add_expr)
            .unwrap_or_else(|| Expr::number(0.0));
        let formula = simplify_expr(Expr::func("sqrt", sum));
        let latex = formula.to_latex();

        Ok(Propagation {
            formula,
            latex,
            variables,
            error_symbols,
        })
    }

    /// Parse a formula string and derive its propagated error
    pub fn propagate_str(&self, formula: &str) -> Result<Propagation, PropError> {
        let expr = parse(formula)?;
        self.propagate(&expr)
    }

    /// Recover a symbolic expression from numeric function source text and
    /// derive its propagated error
    ///
    /// Extraction failures propagate unchanged.
    pub fn propagate_source(&self, source: &str) -> Result<Propagation, PropError> {
        let function = extract::symbolic_from_source(source)?;
        self.propagate(&function.expr)
    }
}

/// Compute the gradient of an expression with respect to multiple variables
///
/// Returns a vector of simplified partial derivatives
/// `[∂f/∂x₁, ∂f/∂x₂, ...]` in the order the variables were given.
///
/// # Example
/// ```ignore
/// let expr = errprop::parse("x^2 + y^2")?;
/// let grad = errprop::gradient(&expr, &["x", "y"]);
/// // grad = [2 * x, 2 * y]
/// ```
pub fn gradient(expr: &Expr, vars: &[&str]) -> Vec<Expr> {
    let fixed = FxHashSet::default();
    vars.iter()
        .map(|var| simplify_expr(expr.derive(var, &fixed)))
        .collect()
}
