#[cfg(test)]
use super::*;
use std::f64::consts::PI;

fn ns_with(pairs: &[(&str, Value)]) -> Namespace {
    let mut ns = Namespace::builtin();
    for (k, v) in pairs {
        ns.define(k.to_string(), v.clone());
    }
    ns
}

fn eval(raw: &str) -> Value {
    infer_value(raw, &Namespace::builtin(), Scope::Section).expect("evaluation failed")
}

fn eval_err(raw: &str) -> EvalError {
    infer_value(raw, &Namespace::builtin(), Scope::Section).expect_err("expected an error")
}

// ===== Literal inference =====

#[test]
fn test_boolean_literals() {
    assert_eq!(eval("true"), Value::Boolean(true));
    assert_eq!(eval("FALSE"), Value::Boolean(false));
    assert_eq!(eval("  True  "), Value::Boolean(true));
    assert_eq!(eval("truely"), Value::String("truely".into()));
}

#[test]
fn test_integer_literals() {
    assert_eq!(eval("0"), Value::Integer(0));
    assert_eq!(eval("-1"), Value::Integer(-1));
    assert_eq!(eval("+42"), Value::Integer(42));
    assert_eq!(eval("007"), Value::Integer(7));
}

#[test]
fn test_real_literals() {
    assert_eq!(eval("1.5"), Value::Real(1.5));
    assert_eq!(eval("-.5"), Value::Real(-0.5));
    assert_eq!(eval("2."), Value::Real(2.0));
    assert_eq!(eval("1e3"), Value::Real(1000.0));
    assert_eq!(eval("-2.5E-1"), Value::Real(-0.25));
}

#[test]
fn test_huge_integer_literal_is_real() {
    assert_eq!(eval("123456789012345678901234"), Value::Real(1.2345678901234568e23));
}

#[test]
fn test_plain_strings() {
    assert_eq!(eval("custom"), Value::String("custom".into()));
    assert_eq!(eval("  hello world  "), Value::String("hello world".into()));
    assert_eq!(eval(""), Value::String("".into()));
    assert_eq!(eval("/tmp/data.csv"), Value::String("/tmp/data.csv".into()));
    assert_eq!(eval("1 + "), Value::String("1 +".into()));
}

// ===== Expressions =====

#[test]
fn test_integer_arithmetic_stays_integer() {
    assert_eq!(eval("3 * 10 ** 8"), Value::Integer(300_000_000));
    assert_eq!(eval("(1 + 2) * 3 - 4"), Value::Integer(5));
    assert_eq!(eval("-2 ** 2"), Value::Integer(-4));
    assert_eq!(eval("2 ** 3 ** 2"), Value::Integer(512));
    assert_eq!(eval("abs(-3)"), Value::Integer(3));
    assert_eq!(eval("sum(1, 2, 3)"), Value::Integer(6));
    assert_eq!(eval("sum()"), Value::Integer(0));
    assert_eq!(eval("pow(2, 10)"), Value::Integer(1024));
}

#[test]
fn test_division_is_always_real() {
    assert_eq!(eval("4 / 2"), Value::Real(2.0));
    assert_eq!(eval("1 / 4"), Value::Real(0.25));
}

#[test]
fn test_floor_division_and_modulo() {
    assert_eq!(eval("7 // 2"), Value::Integer(3));
    assert_eq!(eval("-7 // 2"), Value::Integer(-4));
    assert_eq!(eval("7 % 3"), Value::Integer(1));
    assert_eq!(eval("-7 % 3"), Value::Integer(2));
    assert_eq!(eval("7 % -3"), Value::Integer(-2));
    assert_eq!(eval("7.5 // 2"), Value::Real(3.0));
    assert_eq!(eval("-1.5 % 1"), Value::Real(0.5));
}

#[test]
fn test_mixed_operands_become_real() {
    assert_eq!(eval("1.5 * 2"), Value::Real(3.0));
    assert_eq!(eval("2 ** -1"), Value::Real(0.5));
    assert_eq!(eval("float(3)"), Value::Real(3.0));
    assert_eq!(eval("int(2.9)"), Value::Integer(2));
    assert_eq!(eval("int(-2.9)"), Value::Integer(-2));
}

#[test]
fn test_integer_overflow_promotes_to_real() {
    assert_eq!(eval("2 ** 64"), Value::Real(18446744073709551616.0));
    assert_eq!(eval("9223372036854775807 + 1"), Value::Real(9223372036854775808.0));
}

#[test]
fn test_builtin_constants_and_functions() {
    assert_eq!(eval("sin(pi / 4)"), Value::Real((PI / 4.0).sin()));
    assert_eq!(eval("cos(0)"), Value::Real(1.0));
    assert_eq!(eval("sqrt(16)"), Value::Real(4.0));
    assert_eq!(eval("root(2.25)"), Value::Real(1.5));
    assert_eq!(eval("log(1)"), Value::Real(0.0));
    assert_eq!(eval("exp(0)"), Value::Real(1.0));
    assert_eq!(eval("PI"), Value::Real(PI));
}

#[test]
fn test_user_constants() {
    let ns = ns_with(&[("c", Value::Integer(300_000_000))]);
    assert_eq!(
        infer_value("c / 2", &ns, Scope::Section),
        Ok(Value::Real(150_000_000.0))
    );
    assert_eq!(infer_value("c", &ns, Scope::Section), Ok(Value::Integer(300_000_000)));
}

#[test]
fn test_bare_identifier_yields_constant_of_any_kind() {
    let ns = ns_with(&[("label", Value::String("det".into())), ("on", Value::Boolean(true))]);
    assert_eq!(infer_value("label", &ns, Scope::Section), Ok(Value::String("det".into())));
    assert_eq!(infer_value("on", &ns, Scope::Section), Ok(Value::Boolean(true)));
}

#[test]
fn test_arithmetic_on_non_numbers_is_error() {
    let ns = ns_with(&[("label", Value::String("det".into())), ("on", Value::Boolean(true))]);
    assert!(matches!(
        infer_value("label * 2", &ns, Scope::Section),
        Err(EvalError::Invalid(_))
    ));
    assert!(matches!(
        infer_value("sin(on)", &ns, Scope::Section),
        Err(EvalError::Invalid(_))
    ));
}

#[test]
fn test_unknown_names_fall_back_to_string_outside_constants() {
    assert_eq!(eval("width * 2"), Value::String("width * 2".into()));
    assert_eq!(eval("foo(1)"), Value::String("foo(1)".into()));
}

#[test]
fn test_unknown_names_fail_inside_constants() {
    assert_eq!(
        infer_value("width * 2", &Namespace::builtin(), Scope::Constants),
        Err(EvalError::Unresolved("width".into()))
    );
    // syntax errors still fall through to strings
    assert_eq!(
        infer_value("detector A", &Namespace::builtin(), Scope::Constants),
        Ok(Value::String("detector A".into()))
    );
}

#[test]
fn test_evaluation_errors() {
    assert!(matches!(eval_err("1 / 0"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("5 % 0"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("sqrt(-1)"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("ln(0)"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("sin(1, 2)"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("pow(2)"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("pi(2)"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("(-8) ** 0.5"), EvalError::Invalid(_)));
    assert!(matches!(eval_err("0 ** -1"), EvalError::Invalid(_)));
}

#[test]
fn test_bare_function_name_is_a_string() {
    assert_eq!(eval("float"), Value::String("float".into()));
    assert_eq!(eval("sum"), Value::String("sum".into()));
    assert_eq!(eval("sin + 1"), Value::String("sin + 1".into()));
    assert_eq!(
        infer_value("abs", &Namespace::builtin(), Scope::Constants),
        Err(EvalError::Unresolved("abs".into()))
    );
}

#[test]
fn test_shadowed_function_is_not_callable() {
    let ns = ns_with(&[("sin", Value::Integer(2))]);
    assert_eq!(infer_value("sin * 3", &ns, Scope::Section), Ok(Value::Integer(6)));
    assert!(matches!(
        infer_value("sin(1)", &ns, Scope::Section),
        Err(EvalError::Invalid(_))
    ));
}

#[test]
fn test_evaluate_is_pure() {
    let ns = ns_with(&[("c", Value::Integer(3))]);
    for raw in ["c ** 2 / 7", "sin(c)", "hello", "TRUE", "1.25"] {
        assert_eq!(evaluate(raw, &ns), evaluate(raw, &ns));
    }
}

#[test]
fn test_public_evaluate_error() {
    match evaluate("1 // 0", &Namespace::builtin()) {
        Err(ConfigError::EvaluationError { reason, .. }) => assert!(reason.contains("by zero")),
        other => panic!("expected EvaluationError, got {:?}", other),
    }
}

#[test]
fn test_deep_expressions_fall_back_to_string() {
    let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    assert_eq!(eval(&deep), Value::String(deep.clone()));

    let chain = vec!["1"; 1000].join("+");
    assert_eq!(eval(&chain), Value::String(chain.clone()));

    assert_eq!(eval(&vec!["1"; 150].join("+")), Value::Integer(150));
}

#[test]
fn test_leading_zeros_are_not_arithmetic() {
    assert_eq!(eval("2024-01-15"), Value::String("2024-01-15".into()));
    assert_eq!(eval("08 * 2"), Value::String("08 * 2".into()));
    assert_eq!(eval("2024-1-15"), Value::Integer(2008));
}
