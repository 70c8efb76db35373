//! End-to-end tests for expression recovery from numeric source text

use crate::extract::symbolic_from_source;
use crate::{parse, PropError};

#[test]
fn test_extract_polynomial() {
    let source = "\
def f(x, y):
    result = x**2 + y**2
    return result
";
    let function = symbolic_from_source(source).unwrap();

    assert_eq!(function.name, "f");
    assert_eq!(function.params, vec!["x", "y"]);
    assert_eq!(function.expr, parse("x^2 + y^2").unwrap());

    let mut vars = function.expr.free_variables();
    vars.sort();
    assert_eq!(vars, vec!["x", "y"]);
}

#[test]
fn test_parameter_declaration_order_preserved() {
    let source = "\
def g(b, a):
    result = a + b
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(function.params, vec!["b", "a"]);
}

#[test]
fn test_numeric_namespace_mapping() {
    let source = "\
def h(x, y):
    result = np.sin(x) * np.exp(y)
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(format!("{}", function.expr), "sin(x) * exp(y)");
}

#[test]
fn test_numpy_log_is_natural_log() {
    let source = "\
def f(x):
    result = np.log(x)
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(format!("{}", function.expr), "ln(x)");
}

#[test]
fn test_np_power_becomes_pow() {
    let source = "\
def f(x):
    result = np.power(x, 3)
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(function.expr, parse("x^3").unwrap());
}

#[test]
fn test_np_constants() {
    let source = "\
def area(r):
    result = np.pi * r**2
";
    let function = symbolic_from_source(source).unwrap();

    assert!(function.expr.contains_var("pi"));
    // pi is a known constant, not a free variable
    assert_eq!(function.expr.free_variables(), vec!["r"]);
}

#[test]
fn test_double_star_power() {
    let source = "\
def f(v):
    result = v**2 / 2
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(format!("{}", function.expr), "v^2 / 2");
}

#[test]
fn test_missing_result_is_descriptive_error() {
    // The body computes the value but never binds `result`
    let source = "\
def f(x, y):
    return x + y
";
    let err = symbolic_from_source(source).unwrap_err();
    match err {
        PropError::MissingResult { ref function } => assert_eq!(function, "f"),
        other => panic!("Expected MissingResult, got {:?}", other),
    }
    assert!(err.to_string().contains("No valid expression found"));
}

#[test]
fn test_nested_result_is_not_found() {
    // Only top-level statements are scanned; a conditional branch is nested
    let source = "\
def f(x):
    if x > 0:
        result = x
    return x
";
    let err = symbolic_from_source(source).unwrap_err();
    assert!(matches!(err, PropError::MissingResult { .. }));
}

#[test]
fn test_unknown_numeric_function_is_error() {
    let source = "\
def f(x):
    result = np.frobnicate(x)
";
    let err = symbolic_from_source(source).unwrap_err();
    match err {
        PropError::UnknownNumericFunction { ref name } => assert_eq!(name, "np.frobnicate"),
        other => panic!("Expected UnknownNumericFunction, got {:?}", other),
    }
}

#[test]
fn test_unresolved_name_is_error() {
    let source = "\
def f(x):
    result = x + q
";
    let err = symbolic_from_source(source).unwrap_err();
    match err {
        PropError::UnresolvedName { ref name } => assert_eq!(name, "q"),
        other => panic!("Expected UnresolvedName, got {:?}", other),
    }
}

#[test]
fn test_bare_function_call_is_unresolved() {
    // Only the numeric namespace resolves; a bare call would be an undefined
    // name when the original evaluated the rewritten expression
    let source = "\
def f(x):
    result = sin(x)
";
    let err = symbolic_from_source(source).unwrap_err();
    assert!(matches!(err, PropError::UnresolvedName { .. }));
}

#[test]
fn test_first_result_assignment_wins() {
    let source = "\
def f(x):
    result = x
    result = x**2
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(function.expr, parse("x").unwrap());
}

#[test]
fn test_comments_and_blank_lines_ignored() {
    let source = "
# compute the hypotenuse

def hyp(a, b):
    # intermediate squares
    result = np.sqrt(a**2 + b**2)  # root-sum-square
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(function.name, "hyp");
    assert_eq!(format!("{}", function.expr), "sqrt(a^2 + b^2)");
}

#[test]
fn test_annotations_and_defaults_stripped() {
    let source = "\
def f(x: float, y = 2.0):
    result = x * y
";
    let function = symbolic_from_source(source).unwrap();
    assert_eq!(function.params, vec!["x", "y"]);
}

#[test]
fn test_not_a_definition_is_invalid_source() {
    let err = symbolic_from_source("x = 1\n").unwrap_err();
    assert!(matches!(err, PropError::InvalidSource { .. }));

    let err = symbolic_from_source("").unwrap_err();
    assert!(matches!(err, PropError::InvalidSource { .. }));
}

#[test]
fn test_comparison_is_not_an_assignment() {
    let source = "\
def f(x):
    result == x
";
    let err = symbolic_from_source(source).unwrap_err();
    assert!(matches!(err, PropError::MissingResult { .. }));
}
