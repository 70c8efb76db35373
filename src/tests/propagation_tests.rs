//! End-to-end tests for error-propagation derivation

use crate::{parse, propagate_error, sym, Expr, Propagator};

#[test]
fn test_product_formula() {
    // f = x * y
    let x = sym("x");
    let y = sym("y");
    let result = Propagator::new().propagate(&(x * y)).unwrap();

    assert_eq!(
        format!("{}", result.formula),
        "sqrt((y * delta_x)^2 + (x * delta_y)^2)"
    );
    assert_eq!(result.variables, vec!["x", "y"]);
    assert_eq!(result.error_symbols, vec!["delta_x", "delta_y"]);
}

#[test]
fn test_single_variable_square() {
    // f = x^2: the root collapses over the single squared term
    let x = sym("x");
    let result = Propagator::new().propagate(&x.pow(2.0)).unwrap();

    assert_eq!(format!("{}", result.formula), "2 * abs(x) * abs(delta_x)");
    assert_eq!(result.error_symbols, vec!["delta_x"]);
}

#[test]
fn test_sum_formula() {
    let result = Propagator::new().propagate_str("x + y").unwrap();
    assert_eq!(format!("{}", result.formula), "sqrt(delta_x^2 + delta_y^2)");
}

#[test]
fn test_quotient_formula() {
    // Ohm's law: R = v / i
    let result = Propagator::new().propagate_str("v / i").unwrap();

    let display = format!("{}", result.formula);
    assert!(display.starts_with("sqrt("), "got {}", display);
    assert!(display.contains("delta_i"), "got {}", display);
    assert!(display.contains("delta_v"), "got {}", display);
    assert_eq!(result.variables, vec!["i", "v"]);
}

#[test]
fn test_canonical_order_ignores_declaration_order() {
    // Parameters declared (y, x); the propagation order is lexical
    let source = "\
def f(y, x):
    result = x * y
";
    let result = Propagator::new().propagate_source(source).unwrap();
    assert_eq!(result.variables, vec!["x", "y"]);
    assert_eq!(result.error_symbols, vec!["delta_x", "delta_y"]);
}

#[test]
fn test_idempotence() {
    let expr = parse("x * sin(y) + z^2").unwrap();
    let first = Propagator::new().propagate(&expr).unwrap();
    let second = Propagator::new().propagate(&expr).unwrap();

    assert_eq!(first.formula, second.formula);
    assert_eq!(first.latex, second.latex);
    assert_eq!(first.variables, second.variables);
}

#[test]
fn test_fixed_vars_get_no_error_term() {
    let a = sym("a");
    let expr = parse("a * x").unwrap();
    let result = Propagator::new().fixed_var(&a).propagate(&expr).unwrap();

    assert_eq!(result.variables, vec!["x"]);
    assert_eq!(result.error_symbols, vec!["delta_x"]);
    assert_eq!(format!("{}", result.formula), "abs(a) * abs(delta_x)");
}

#[test]
fn test_known_constants_get_no_error_term() {
    // Circle area: only r carries uncertainty, pi is exact
    let result = Propagator::new().propagate_str("pi * r^2").unwrap();
    assert_eq!(result.variables, vec!["r"]);
    assert_eq!(result.error_symbols, vec!["delta_r"]);
}

#[test]
fn test_no_free_variables_gives_zero() {
    let result = Propagator::new().propagate(&Expr::number(5.0)).unwrap();
    assert_eq!(result.formula, Expr::number(0.0));
    assert!(result.variables.is_empty());
    assert!(result.error_symbols.is_empty());
    assert_eq!(result.latex, "0");
}

#[test]
fn test_latex_output() {
    let result = Propagator::new().propagate_str("x * y").unwrap();

    assert!(result.latex.starts_with(r"\sqrt{"), "got {}", result.latex);
    assert!(result.latex.contains(r"\delta_{x}"), "got {}", result.latex);
    assert!(result.latex.contains(r"\delta_{y}"), "got {}", result.latex);
    assert!(result.latex.contains(r"\cdot"), "got {}", result.latex);
}

#[test]
fn test_console_entry_returns_pair() {
    let x = sym("x");
    let y = sym("y");
    let expr = x * y;

    let (formula, latex) = propagate_error(&expr).unwrap();
    let reference = Propagator::new()
        .max_depth(crate::DEFAULT_MAX_DEPTH)
        .max_nodes(crate::DEFAULT_MAX_NODES)
        .propagate(&expr)
        .unwrap();

    assert_eq!(formula, reference.formula);
    assert_eq!(latex, reference.latex);
}

#[test]
fn test_source_conversion_path() {
    // Kinetic energy: E = m v^2 / 2
    let source = "\
def kinetic_energy(m, v):
    result = m * v**2 / 2
    return result
";
    let result = Propagator::new().propagate_source(source).unwrap();

    assert_eq!(result.variables, vec!["m", "v"]);
    let display = format!("{}", result.formula);
    assert!(display.contains("delta_m"), "got {}", display);
    assert!(display.contains("delta_v"), "got {}", display);
}

#[test]
fn test_trig_chain_rule() {
    // f = sin(x^2): df/dx = cos(x^2) * 2x
    let result = Propagator::new().propagate_str("sin(x^2)").unwrap();
    let display = format!("{}", result.formula);
    assert!(display.contains("cos(x^2)"), "got {}", display);
    assert!(display.contains("delta_x"), "got {}", display);
}

#[test]
fn test_propagated_formula_reparses() {
    // The plain rendering is itself a valid formula
    let result = Propagator::new().propagate_str("x * y + sqrt(z)").unwrap();
    let reparsed = parse(&format!("{}", result.formula));
    assert!(reparsed.is_ok(), "failed to reparse: {:?}", reparsed);
}
