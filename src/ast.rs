//! Abstract Syntax Tree for mathematical expressions

use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashSet;

use crate::symbol::{get_or_intern, is_known_constant, InternedSymbol};

/// Global counter for expression IDs
static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID for debugging (not used in equality comparisons)
    pub id: u64,
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Implement Eq and Hash based on KIND only for structural equality
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// Variable or constant symbol (e.g., "x", "delta_x", "pi")
    /// Uses InternedSymbol for O(1) equality comparisons
    Symbol(InternedSymbol),

    /// Function call through the registry (e.g., sin, sqrt, abs)
    FunctionCall { name: String, args: Vec<Expr> },

    // Binary operations
    /// Addition
    Add(Arc<Expr>, Arc<Expr>),

    /// Subtraction
    Sub(Arc<Expr>, Arc<Expr>),

    /// Multiplication
    Mul(Arc<Expr>, Arc<Expr>),

    /// Division
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation
    Pow(Arc<Expr>, Arc<Expr>),

    /// Partial derivative notation: ∂^order/∂var^order of inner expression
    /// Used for representing derivatives of unknown functions
    Derivative {
        inner: Arc<Expr>,
        var: String,
        order: u32,
    },
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: next_id(),
            kind,
        }
    }

    // Accessor methods

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this expression is the number zero (with tolerance)
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_zero)
    }

    /// Check if this expression is the number one (with tolerance)
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_one)
    }

    /// Check if this expression is the number negative one (with tolerance)
    #[inline]
    pub fn is_neg_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_neg_one)
    }

    // Convenience constructors

    /// Create a number expression
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// Create a symbol expression
    ///
    /// The symbol name is automatically interned for O(1) comparisons.
    pub fn symbol(s: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Symbol(get_or_intern(s.as_ref())))
    }

    /// Create an addition expression
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    /// Create a subtraction expression
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    /// Create a division expression
    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Create a function call expression (single argument convenience)
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![content],
        })
    }

    /// Create a multi-argument function call expression
    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    /// Create a partial derivative expression
    pub fn derivative(inner: Expr, var: String, order: u32) -> Self {
        Expr::new(ExprKind::Derivative {
            inner: Arc::new(inner),
            var,
            order,
        })
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
            ExprKind::Derivative { inner, .. } => 1 + inner.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
            ExprKind::Derivative { inner, .. } => 1 + inner.max_depth(),
        }
    }

    /// Check if the expression contains a specific variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(s) => s == var,
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
            ExprKind::Derivative { inner, var: v, .. } => v == var || inner.contains_var(var),
        }
    }

    /// Check if the expression contains any free variables (symbols outside
    /// the excluded set and the known constants)
    ///
    /// This determines whether an expression is "constant" with respect to a
    /// set of fixed variables during differentiation.
    pub fn has_free_variables(&self, excluded: &FxHashSet<String>) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(name) => {
                !excluded.contains(name.as_ref()) && !is_known_constant(name.as_ref())
            }
            ExprKind::Add(u, v)
            | ExprKind::Sub(u, v)
            | ExprKind::Mul(u, v)
            | ExprKind::Div(u, v)
            | ExprKind::Pow(u, v) => {
                u.has_free_variables(excluded) || v.has_free_variables(excluded)
            }
            ExprKind::FunctionCall { args, .. } => {
                args.iter().any(|arg| arg.has_free_variables(excluded))
            }
            ExprKind::Derivative { inner, var, .. } => {
                !excluded.contains(var) || inner.has_free_variables(excluded)
            }
        }
    }

    /// Collect all symbol names appearing in the expression
    pub fn variables(&self) -> FxHashSet<String> {
        let mut vars = FxHashSet::default();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut FxHashSet<String>) {
        match &self.kind {
            ExprKind::Symbol(s) => {
                vars.insert(s.name().to_string());
            }
            ExprKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
            ExprKind::Derivative { inner, var, .. } => {
                vars.insert(var.clone());
                inner.collect_variables(vars);
            }
            ExprKind::Number(_) => {}
        }
    }

    /// Collect the free variables of the expression in lexical name order
    ///
    /// Known constants (`pi`, `e`) are excluded. The returned order is the
    /// canonical variable ordering used to pair gradient entries with error
    /// symbols, so it must be deterministic and independent of how the
    /// expression was built.
    pub fn free_variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = self
            .variables()
            .into_iter()
            .filter(|name| !is_known_constant(name))
            .collect();
        vars.sort_unstable();
        vars
    }

    /// Simplify this expression (convenience wrapper)
    pub fn simplified(&self) -> Expr {
        crate::simplification::simplify_expr(self.clone())
    }

    /// Differentiate with respect to a variable and simplify (convenience)
    ///
    /// All other symbols are treated as independent variables. For fixed
    /// constants, use [`crate::Propagator::fixed_var`] on the propagation
    /// builder instead.
    pub fn diff(&self, var: &str) -> Expr {
        self.derive(var, &FxHashSet::default()).simplified()
    }
}

// Manual Hash implementation for ExprKind
// Needed for HashSet<Expr> and structural-equality-based caching
impl std::hash::Hash for ExprKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ExprKind::Number(n) => {
                // Hash the bit representation of f64
                n.to_bits().hash(state);
            }
            ExprKind::Symbol(s) => s.hash(state),
            ExprKind::FunctionCall { name, args } => {
                name.hash(state);
                args.hash(state);
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.hash(state);
                r.hash(state);
            }
            ExprKind::Derivative { inner, var, order } => {
                inner.hash(state);
                var.hash(state);
                order.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let val = 314.0 / 100.0;
        let num = Expr::number(val);
        match &num.kind {
            ExprKind::Number(n) => assert_eq!(*n, val),
            _ => panic!("Expected Number variant"),
        }

        let sym = Expr::symbol("x");
        match &sym.kind {
            ExprKind::Symbol(s) => assert_eq!(s, "x"),
            _ => panic!("Expected Symbol variant"),
        }

        let add = Expr::add_expr(Expr::number(1.0), Expr::number(2.0));
        match &add.kind {
            ExprKind::Add(_, _) => (),
            _ => panic!("Expected Add variant"),
        }
    }

    #[test]
    fn test_ids() {
        let e1 = Expr::number(1.0);
        let e2 = Expr::number(1.0);
        let e3 = Expr::number(2.0);

        assert_ne!(e1.id, e2.id); // IDs must be unique
        assert_eq!(e1, e2); // Structural equality should pass
        assert_ne!(e1, e3); // Different values
    }

    #[test]
    fn test_node_count() {
        let x = Expr::symbol("x");
        assert_eq!(x.node_count(), 1);

        let x_plus_1 = Expr::add_expr(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(x_plus_1.node_count(), 3); // Add + x + 1

        let complex = Expr::mul_expr(
            Expr::add_expr(Expr::symbol("x"), Expr::number(1.0)),
            Expr::symbol("y"),
        );
        assert_eq!(complex.node_count(), 5); // Mul + (Add + x + 1) + y
    }

    #[test]
    fn test_max_depth() {
        let x = Expr::symbol("x");
        assert_eq!(x.max_depth(), 1);

        let nested = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::symbol("y")),
            Expr::number(1.0),
        );
        assert_eq!(nested.max_depth(), 3); // Add -> Mul -> x/y
    }

    #[test]
    fn test_contains_var() {
        let expr = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::symbol("y")),
            Expr::number(1.0),
        );

        assert!(expr.contains_var("x"));
        assert!(expr.contains_var("y"));
        assert!(!expr.contains_var("z"));
    }

    #[test]
    fn test_free_variables_sorted() {
        // Built in reverse order on purpose: the canonical order is lexical
        let expr = Expr::mul_expr(
            Expr::symbol("zeta"),
            Expr::add_expr(Expr::symbol("beta"), Expr::symbol("alpha")),
        );
        assert_eq!(expr.free_variables(), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_diff_convenience() {
        let expr = Expr::pow(Expr::symbol("x"), Expr::number(2.0));
        assert_eq!(format!("{}", expr.diff("x")), "2 * x");
        assert_eq!(format!("{}", expr.diff("y")), "0");
    }

    #[test]
    fn test_free_variables_exclude_constants() {
        let expr = Expr::mul_expr(
            Expr::symbol("pi"),
            Expr::pow(Expr::symbol("r"), Expr::number(2.0)),
        );
        assert_eq!(expr.free_variables(), vec!["r"]);
    }
}
