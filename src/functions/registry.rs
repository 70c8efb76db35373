use std::ops::RangeInclusive;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::Expr;

/// Definition of a mathematical function including its evaluation and
/// differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "sqrt")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Names the function goes by in numeric source text (e.g., "np.sin").
    /// Used by the extractor's AST rewrite; never consulted while parsing
    /// plain formulas.
    pub numeric_aliases: &'static [&'static str],

    /// Numerical evaluation, used for constant folding during simplification
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation function
    /// Arguments: (args of the function call, derivatives of the arguments)
    /// Returns the total derivative dA/dx = sum( (dA/d_arg_i) * (d_arg_i/dx) )
    pub derivative: fn(&[Expr], &[Expr]) -> Expr,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Numeric alias index: "np.arcsin" -> "asin"
static ALIASES: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let mut map = FxHashMap::default();
    for def in crate::functions::definitions::all_definitions() {
        map.insert(def.name, def);
    }
    map
}

fn init_aliases() -> FxHashMap<&'static str, &'static str> {
    let mut map = FxHashMap::default();
    for def in Registry::all() {
        for alias in def.numeric_aliases {
            map.insert(*alias, def.name);
        }
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by canonical name - O(1) lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Resolve a numeric-namespace alias (e.g. "np.log") to its definition
    pub(crate) fn resolve_numeric_alias(alias: &str) -> Option<&'static FunctionDefinition> {
        ALIASES
            .get_or_init(init_aliases)
            .get(alias)
            .and_then(|name| Registry::get(name))
    }

    /// Iterate over all function definitions
    pub(crate) fn all() -> impl Iterator<Item = &'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).values()
    }
}
