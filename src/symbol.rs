//! Symbol interning and type-safe expression building
//!
//! Symbol names are interned in a global registry so equality checks during
//! differentiation and simplification compare slot keys instead of strings.
//! The registry is append-only and name-keyed: interning the same name twice
//! always yields the same key, so results never depend on interning history.
//!
//! The [`Symbol`] type provides operator overloading for building expressions
//! directly in Rust:
//!
//! ```ignore
//! use errprop::{sym, Expr};
//!
//! let x = sym("x");
//! let expr = x.clone().pow(2.0) + x.sin();  // x^2 + sin(x)
//! ```

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::{Arc, LazyLock, RwLock};

use rustc_hash::FxHashMap;
use slotmap::{DefaultKey, SlotMap};

use crate::Expr;

// ============================================================================
// Interner
// ============================================================================

/// A symbol name interned in the global registry
///
/// Equality and hashing use the registry key (O(1)); the name is carried
/// alongside so display never needs a registry lookup.
#[derive(Debug, Clone)]
pub struct InternedSymbol {
    key: DefaultKey,
    name: Arc<str>,
}

impl InternedSymbol {
    /// The symbol's name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for InternedSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for InternedSymbol {}

impl std::hash::Hash for InternedSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialEq<str> for InternedSymbol {
    fn eq(&self, other: &str) -> bool {
        self.name.as_ref() == other
    }
}

impl PartialEq<&str> for InternedSymbol {
    fn eq(&self, other: &&str) -> bool {
        self.name.as_ref() == *other
    }
}

impl AsRef<str> for InternedSymbol {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for InternedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

struct Interner {
    names: SlotMap<DefaultKey, Arc<str>>,
    index: FxHashMap<Arc<str>, DefaultKey>,
}

static INTERNER: LazyLock<RwLock<Interner>> = LazyLock::new(|| {
    RwLock::new(Interner {
        names: SlotMap::with_key(),
        index: FxHashMap::default(),
    })
});

/// Get or create the interned symbol for a name
///
/// # Panics
///
/// Panics if the global interner lock is poisoned.
pub(crate) fn get_or_intern(name: &str) -> InternedSymbol {
    {
        let interner = INTERNER.read().expect("Global symbol interner poisoned");
        if let Some(&key) = interner.index.get(name) {
            return InternedSymbol {
                key,
                name: Arc::clone(&interner.names[key]),
            };
        }
    }

    let mut interner = INTERNER.write().expect("Global symbol interner poisoned");
    // Another thread may have interned the name between the read and write locks
    if let Some(&key) = interner.index.get(name) {
        return InternedSymbol {
            key,
            name: Arc::clone(&interner.names[key]),
        };
    }

    let arc: Arc<str> = Arc::from(name);
    let key = interner.names.insert(Arc::clone(&arc));
    interner.index.insert(Arc::clone(&arc), key);
    InternedSymbol { key, name: arc }
}

/// Get the number of interned symbol names
///
/// # Panics
///
/// Panics if the global interner lock is poisoned.
pub fn symbol_count() -> usize {
    INTERNER
        .read()
        .expect("Global symbol interner poisoned")
        .names
        .len()
}

// ============================================================================
// Known constants
// ============================================================================

/// Mathematical constants recognized as symbols but never treated as free
/// variables: they receive no error term and differentiate to zero.
pub(crate) fn is_known_constant(name: &str) -> bool {
    matches!(name, "pi" | "e")
}

// ============================================================================
// Type-safe symbol for ergonomic expression building
// ============================================================================

/// Type-safe symbol for building expressions ergonomically
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    /// Get the name of the symbol
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Convert to an Expr
    pub fn to_expr(&self) -> Expr {
        Expr::symbol(&self.0)
    }

    /// Raise to a power
    pub fn pow(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow(self.to_expr(), exp.into())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ===== Unified macro for generating math function methods =====
// Single macro handles both Symbol and Expr with a converter expression

macro_rules! impl_math_functions {
    ($type:ty, $converter:expr, $($fn_name:ident => $func_str:literal),* $(,)?) => {
        impl $type {
            $(
                pub fn $fn_name(self) -> Expr {
                    Expr::func($func_str, $converter(self))
                }
            )*
        }
    };
}

macro_rules! math_function_list {
    ($macro_name:ident, $type:ty, $converter:expr) => {
        $macro_name!($type, $converter,
            // Trigonometric functions
            sin => "sin", cos => "cos", tan => "tan",
            // Inverse trigonometric functions
            asin => "asin", acos => "acos", atan => "atan",
            // Hyperbolic functions
            sinh => "sinh", cosh => "cosh", tanh => "tanh",
            // Inverse hyperbolic functions
            asinh => "asinh", acosh => "acosh", atanh => "atanh",
            // Exponential and logarithmic functions
            exp => "exp", ln => "ln", log10 => "log10", log2 => "log2",
            // Root functions
            sqrt => "sqrt", cbrt => "cbrt",
            // Absolute value and sign
            abs => "abs", sign => "sign",
        );
    };
}

// Apply to Symbol (convert via to_expr())
math_function_list!(impl_math_functions, Symbol, |s: Symbol| s.to_expr());

// Apply to Expr (use directly)
math_function_list!(impl_math_functions, Expr, |e: Expr| e);

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.to_expr()
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::number(n as f64)
    }
}

// ===== Macro for generating operator implementations =====

macro_rules! impl_binary_ops {
    ($lhs:ty, $rhs:ty, $to_lhs:expr, $to_rhs:expr) => {
        impl Add<$rhs> for $lhs {
            type Output = Expr;
            fn add(self, rhs: $rhs) -> Expr {
                Expr::add_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Sub<$rhs> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: $rhs) -> Expr {
                Expr::sub_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Mul<$rhs> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: $rhs) -> Expr {
                Expr::mul_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Div<$rhs> for $lhs {
            type Output = Expr;
            fn div(self, rhs: $rhs) -> Expr {
                Expr::div_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
    };
}

// Symbol operations
impl_binary_ops!(Symbol, Symbol, |s: Symbol| s.to_expr(), |r: Symbol| r.to_expr());
impl_binary_ops!(Symbol, Expr, |s: Symbol| s.to_expr(), |r: Expr| r);
impl_binary_ops!(Symbol, f64, |s: Symbol| s.to_expr(), |r: f64| Expr::number(r));

// Expr operations
impl_binary_ops!(Expr, Expr, |s: Expr| s, |r: Expr| r);
impl_binary_ops!(Expr, Symbol, |s: Expr| s, |r: Symbol| r.to_expr());
impl_binary_ops!(Expr, f64, |s: Expr| s, |r: f64| Expr::number(r));

// f64 on left side
impl Add<Expr> for f64 {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::add_expr(Expr::number(self), rhs)
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sub_expr(Expr::number(self), rhs)
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul_expr(Expr::number(self), rhs)
    }
}

impl Add<Symbol> for f64 {
    type Output = Expr;
    fn add(self, rhs: Symbol) -> Expr {
        Expr::add_expr(Expr::number(self), rhs.to_expr())
    }
}

impl Sub<Symbol> for f64 {
    type Output = Expr;
    fn sub(self, rhs: Symbol) -> Expr {
        Expr::sub_expr(Expr::number(self), rhs.to_expr())
    }
}

impl Mul<Symbol> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Symbol) -> Expr {
        Expr::mul_expr(Expr::number(self), rhs.to_expr())
    }
}

// Negation
impl Neg for Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul_expr(Expr::number(-1.0), self.to_expr())
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul_expr(Expr::number(-1.0), self)
    }
}

impl Expr {
    /// Raise to a power (since Rust ^ is XOR, not power)
    ///
    /// Note: This is an instance method that consumes self.
    /// For constructing from two expressions, use `Expr::pow(base, exp)`.
    #[inline]
    pub fn pow_expr(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow(self, exp.into())
    }
}

/// Convenience function to create a Symbol
pub fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}
