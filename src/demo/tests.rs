use super::*;
use crate::runtime::invoker::Invoker;
use crate::runtime::value::{ArrayValue, ListValue};

#[test]
fn registry_exposes_every_demo() {
    let registry = registry().expect("registry");
    assert_eq!(registry.names(), vec!["div", "fac", "sum", "triangle"]);
}

#[test]
fn factorial_and_triangle() {
    let registry = registry().expect("registry");
    let fac = registry.find("fac", "(int) -> int").expect("fac");
    assert_eq!(fac.invoke_exact(&[Value::Int(6)]).expect("fac 6"), Value::Int(720));
    let triangle = registry.lookup("triangle").expect("triangle");
    assert_eq!(
        triangle.invoke_exact(&[Value::Int(4)]).expect("triangle 4"),
        Value::Int(10)
    );
}

#[test]
fn factorial_overflow_is_thrown() {
    let fac = factorial().expect("fac");
    let err = fac.invoke_exact(&[Value::Int(20)]).unwrap_err();
    assert_eq!(err.to_failure().kind, "ArithmeticException");
}

#[test]
fn sum_accepts_loose_and_exact_calls() {
    let sum = sum().expect("sum");
    assert!(sum.is_varargs());
    let loose = Invoker::default()
        .invoke(&sum, &[Value::Int(1), Value::Int(2), Value::Int(3)])
        .expect("loose");
    assert_eq!(loose, Value::Long(6));
    let array = ArrayValue::from_vec(Component::Int, vec![Value::Int(5)]);
    let exact = Invoker::exact()
        .invoke(&sum, &[Value::Array(array)])
        .expect("exact");
    assert_eq!(exact, Value::Long(5));
}

#[test]
fn divide_rethrows_after_cleanup() {
    let div = divide().expect("div");
    assert_eq!(
        div.invoke_exact(&[Value::Int(7), Value::Int(2)]).expect("7 / 2"),
        Value::Int(3)
    );
    let err = div
        .invoke_exact(&[Value::Int(7), Value::Int(0)])
        .unwrap_err();
    assert_eq!(err.to_string(), "ArithmeticException: / by zero");
}

#[test]
fn division_overflow_is_thrown_after_cleanup() {
    let seen = ListValue::new();
    let sink = seen.clone();
    let cleanup = Handle::new(
        "record",
        Signature::new([Kind::Reference, Kind::Int], Kind::Int),
        move |args| {
            sink.push(args[0].clone());
            Ok(args[1].clone())
        },
    );
    let div = guarded_division(&cleanup).expect("div");
    let err = div
        .invoke_exact(&[Value::Int(i32::MIN), Value::Int(-1)])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Thrown { .. }), "{err:?}");
    assert_eq!(err.to_failure().message, "int overflow");
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen.get(0), Some(Value::Throwable(_))));

    let err = divide()
        .expect("div")
        .invoke_exact(&[Value::Int(i32::MIN), Value::Int(-1)])
        .unwrap_err();
    assert_eq!(err.to_failure().kind, "ArithmeticException");
}

#[test]
fn triangle_overflow_is_thrown() {
    let triangle = triangle().expect("triangle");
    let err = triangle
        .invoke_exact(&[Value::Int(100_000)])
        .unwrap_err();
    assert_eq!(err.to_failure().kind, "ArithmeticException");
    assert_eq!(err.to_failure().message, "int overflow");
}
