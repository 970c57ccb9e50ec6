use super::*;
use crate::combinators::error::ShapeError;
use crate::language::signature::Signature;
use crate::runtime::value::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn halve() -> Handle {
    Handle::new("halve", Signature::new([Kind::Int], Kind::Int), |args| {
        Ok(Value::Int(args[0].as_int()? / 2))
    })
}

fn above(limit: i32) -> Handle {
    Handle::new("above", Signature::new([Kind::Int], Kind::Boolean), move |args| {
        Ok(Value::Boolean(args[0].as_int()? > limit))
    })
}

#[test]
fn while_checks_before_the_body() {
    let handle = while_loop(Some(&Handle::identity(Kind::Int)), &above(1), &halve()).expect("loop");
    assert_eq!(handle.signature().to_string(), "(int) -> int");
    assert_eq!(handle.invoke_exact(&[Value::Int(40)]).expect("run"), Value::Int(1));
    assert_eq!(handle.invoke_exact(&[Value::Int(0)]).expect("run"), Value::Int(0));
}

#[test]
fn do_while_runs_the_body_at_least_once() {
    let handle =
        do_while_loop(Some(&Handle::identity(Kind::Int)), &halve(), &above(1)).expect("loop");
    assert_eq!(handle.invoke_exact(&[Value::Int(0)]).expect("run"), Value::Int(0));
    assert_eq!(handle.invoke_exact(&[Value::Int(5)]).expect("run"), Value::Int(1));
}

#[test]
fn void_body_runs_for_effect() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let body = Handle::new("tick", Signature::returning(Kind::Void), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Void)
    });
    let probe = Arc::clone(&calls);
    let pred = Handle::new("under3", Signature::returning(Kind::Boolean), move |_| {
        Ok(Value::Boolean(probe.load(Ordering::SeqCst) < 3))
    });
    let handle = do_while_loop(None, &body, &pred).expect("loop");
    assert_eq!(handle.signature().to_string(), "() -> void");
    assert_eq!(handle.invoke_exact(&[]).expect("run"), Value::Void);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn body_must_take_its_variable_first() {
    let body = Handle::new("b", Signature::new([Kind::Long], Kind::Int), |_| {
        Ok(Value::Int(0))
    });
    assert!(matches!(
        while_loop(None, &above(0), &body),
        Err(ShapeError::PrefixMismatch { .. })
    ));
}

#[test]
fn init_must_match_body() {
    assert!(matches!(
        while_loop(Some(&Handle::zero(Kind::Long)), &above(0), &halve()),
        Err(ShapeError::InconsistentReturnType { .. })
    ));
}

#[test]
fn predicate_must_return_boolean() {
    assert!(matches!(
        do_while_loop(None, &halve(), &halve()),
        Err(ShapeError::SignatureMismatch { .. })
    ));
}
