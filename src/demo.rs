//! Handles exposed by the `run` subcommand, each built from the combinators.

use crate::combinators::{
    counted_loop_n, iterated_loop, loop_handle, try_finally, with_varargs, Clause,
};
use crate::language::{
    kind::{Component, Kind},
    signature::Signature,
};
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    handle::Handle,
    registry::Registry,
    value::Value,
};
use miette::IntoDiagnostic;

fn int_op(name: &str, arity: usize, f: fn(&[i32]) -> RuntimeResult<i32>) -> Handle {
    Handle::new(name, Signature::new(vec![Kind::Int; arity], Kind::Int), move |args| {
        let ints = args
            .iter()
            .map(Value::as_int)
            .collect::<RuntimeResult<Vec<_>>>()?;
        Ok(Value::Int(f(&ints)?))
    })
}

/// `fac(int k) -> int` as a two-clause loop: a counter and an accumulator.
pub fn factorial() -> miette::Result<Handle> {
    let counter = Clause::default()
        .with_init(Handle::zero(Kind::Int))
        .with_step(int_op("fac.next", 1, |v| Ok(v[0] + 1)));
    let below = Handle::new(
        "fac.below",
        Signature::new([Kind::Int, Kind::Int, Kind::Int], Kind::Boolean),
        |args| Ok(Value::Boolean(args[0].as_int()? < args[2].as_int()?)),
    );
    let accumulator = Clause::default()
        .with_init(Handle::constant(Value::Int(1)))
        .with_step(int_op("fac.mult", 2, |v| {
            v[0].checked_mul(v[1])
                .ok_or_else(|| RuntimeError::thrown("ArithmeticException", "int overflow"))
        }))
        .with_pred(below)
        .with_fini(int_op("fac.result", 2, |v| Ok(v[1])));
    Ok(loop_handle(&[counter, accumulator])?)
}

/// `triangle(int n) -> int`: `1 + 2 + ... + n` as a counted loop.
pub fn triangle() -> miette::Result<Handle> {
    let body = int_op("triangle.add", 2, |v| {
        v[0].checked_add(v[1])
            .and_then(|sum| sum.checked_add(1))
            .ok_or_else(|| RuntimeError::thrown("ArithmeticException", "int overflow"))
    });
    Ok(counted_loop_n(&Handle::identity(Kind::Int), None, &body)?)
}

/// `sum(int... values) -> long` as an iterated loop.
pub fn sum() -> miette::Result<Handle> {
    let body = Handle::new(
        "sum.add",
        Signature::new([Kind::Long, Kind::Int], Kind::Long),
        |args| match &args[0] {
            Value::Long(acc) => Ok(Value::Long(acc + i64::from(args[1].as_int()?))),
            other => Err(RuntimeError::TypeMismatch {
                message: format!("expected long accumulator, found {}", other.type_name()),
            }),
        },
    );
    let looped = iterated_loop(None, None, &body)?;
    let sum = Handle::new(
        "sum",
        Signature::new([Kind::array_of(Component::Int)], Kind::Long),
        move |args| looped.invoke_exact(args),
    );
    Ok(with_varargs(&sum, true)?)
}

/// `div(int a, int b) -> int`, with a cleanup that observes every outcome.
pub fn divide() -> miette::Result<Handle> {
    let cleanup = Handle::new(
        "div.finally",
        Signature::new([Kind::Reference, Kind::Int], Kind::Int),
        |args| {
            if let Value::Throwable(failure) = &args[0] {
                tracing::warn!(%failure, "div failed");
            }
            Ok(args[1].clone())
        },
    );
    guarded_division(&cleanup)
}

fn guarded_division(cleanup: &Handle) -> miette::Result<Handle> {
    let target = int_op("div", 2, |v| {
        if v[1] == 0 {
            return Err(RuntimeError::thrown("ArithmeticException", "/ by zero"));
        }
        v[0].checked_div(v[1])
            .ok_or_else(|| RuntimeError::thrown("ArithmeticException", "int overflow"))
    });
    Ok(try_finally(&target, cleanup)?)
}

pub fn registry() -> miette::Result<Registry> {
    let mut registry = Registry::new();
    let handles = [
        factorial()?.renamed("fac"),
        triangle()?.renamed("triangle"),
        sum()?,
        divide()?.renamed("div"),
    ];
    for handle in handles {
        registry.register(handle).into_diagnostic()?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests;
