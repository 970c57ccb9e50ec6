use super::*;
use crate::language::kind::Component;
use crate::runtime::value::{ArrayValue, ListValue};
use pretty_assertions::assert_eq;

fn prepend_upper() -> Handle {
    Handle::new(
        "prepend_upper",
        Signature::new([Kind::Reference, Kind::Reference], Kind::Reference),
        |args| {
            let Value::List(acc) = &args[0] else {
                return Err(RuntimeError::TypeMismatch {
                    message: "accumulator must be a list".into(),
                });
            };
            let text = args[1].as_str().unwrap_or_default().to_uppercase();
            acc.insert(0, Value::string(text));
            Ok(args[0].clone())
        },
    )
}

fn new_list() -> Handle {
    Handle::new("new_list", Signature::returning(Kind::Reference), |_| {
        Ok(Value::List(ListValue::new()))
    })
}

fn words(items: &[&str]) -> Vec<Value> {
    items.iter().map(Value::string).collect()
}

#[test]
fn prepending_reverses_the_input() {
    let handle = iterated_loop(None, Some(&new_list()), &prepend_upper()).expect("loop");
    assert_eq!(handle.signature().to_string(), "(ref) -> ref");
    let input = Value::List(ListValue::from_vec(words(&["a", "b", "c", "d", "e"])));
    let Value::List(result) = handle.invoke_exact(&[input]).expect("run") else {
        panic!("expected a list");
    };
    assert_eq!(result.snapshot(), words(&["E", "D", "C", "B", "A"]));
}

#[test]
fn explicit_iterator_source_feeds_the_body() {
    let source = Handle::new(
        "range",
        Signature::new([Kind::Int], Kind::Reference),
        |args| {
            let n = args[0].as_int()?;
            Ok(Value::Iterator(IteratorValue::from_source(
                (1..=n).map(Value::Int).collect::<Vec<_>>(),
            )))
        },
    );
    let sum = Handle::new(
        "sum",
        Signature::new([Kind::Long, Kind::Int], Kind::Long),
        |args| {
            let Value::Long(acc) = args[0] else {
                return Err(RuntimeError::TypeMismatch {
                    message: "accumulator".into(),
                });
            };
            Ok(Value::Long(acc + i64::from(args[1].as_int()?)))
        },
    );
    let handle = iterated_loop(Some(&source), None, &sum).expect("loop");
    assert_eq!(handle.signature().to_string(), "(int) -> long");
    assert_eq!(handle.invoke_exact(&[Value::Int(4)]).expect("run"), Value::Long(10));
}

#[test]
fn arrays_are_iterable_and_void_bodies_return_void() {
    let seen = ListValue::new();
    let sink = seen.clone();
    let body = Handle::new(
        "collect",
        Signature::new([Kind::Int, Kind::Reference], Kind::Void),
        move |args| {
            sink.push(args[0].clone());
            Ok(Value::Void)
        },
    );
    let handle = iterated_loop(None, None, &body).expect("loop");
    let array = ArrayValue::from_vec(Component::Int, vec![Value::Int(3), Value::Int(4)]);
    assert_eq!(handle.invoke_exact(&[Value::Array(array)]).expect("run"), Value::Void);
    assert_eq!(seen.snapshot(), vec![Value::Int(3), Value::Int(4)]);
}

#[test]
fn null_iterable_is_a_null_reference() {
    let handle = iterated_loop(None, Some(&new_list()), &prepend_upper()).expect("loop");
    assert!(matches!(
        handle.invoke_exact(&[Value::Null]),
        Err(RuntimeError::NullReference { .. })
    ));
}

#[test]
fn iterable_argument_must_be_a_reference() {
    let body = Handle::new(
        "b",
        Signature::new([Kind::Int, Kind::Long, Kind::Int], Kind::Int),
        |args| Ok(args[0].clone()),
    );
    assert!(matches!(
        iterated_loop(None, None, &body),
        Err(ShapeError::SignatureMismatch { .. })
    ));
}

#[test]
fn iterator_source_must_return_a_reference() {
    assert!(matches!(
        iterated_loop(Some(&Handle::zero(Kind::Int)), None, &prepend_upper()),
        Err(ShapeError::SignatureMismatch { .. })
    ));
}

#[test]
fn void_body_needs_an_element_parameter() {
    let body = Handle::new("b", Signature::returning(Kind::Void), |_| Ok(Value::Void));
    assert!(matches!(
        iterated_loop(None, None, &body),
        Err(ShapeError::ArityShape { .. })
    ));
}
