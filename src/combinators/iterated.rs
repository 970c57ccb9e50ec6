//! Iterator-driven loops, built on the generalized loop.
//!
//! Loop variables are laid out as `(it, v?)`. The first clause produces the
//! iterator and checks `has_next`; the second pulls one element per
//! iteration and hands it to the body.

use crate::combinators::error::{ShapeError, ShapeResult};
use crate::combinators::loops::{build_loop, Check, Clause};
use crate::combinators::shape::{self, BodyShape};
use crate::language::{kind::Kind, signature::Signature};
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    handle::Handle,
    value::{IteratorValue, Value},
};

/// `iterated_loop(iterator, init, body)`.
///
/// With no `iterator`, the produced handle's first external parameter is
/// the iterable itself (a list, array or iterator value).
pub fn iterated_loop(
    iterator: Option<&Handle>,
    init: Option<&Handle>,
    body: &Handle,
) -> ShapeResult<Handle> {
    let body_shape = shape::check_iterated_body(body)?;
    shape::check_init(init, body_shape.var)?;
    let source = match iterator {
        Some(iterator) => {
            shape::require_returns("iterator source", iterator, Kind::Reference)?;
            iterator.clone()
        }
        None => {
            if let Some(first) = body_shape.externals.first() {
                if *first != Kind::Reference {
                    return Err(ShapeError::SignatureMismatch {
                        role: "iterable argument".into(),
                        expected: Kind::Reference.to_string(),
                        found: first.to_string(),
                    });
                }
            }
            Handle::identity(Kind::Reference)
        }
    };

    let clauses = iterated_clauses(&source, init, body, &body_shape);
    build_loop("iterated_loop", Some(clauses.as_slice()), Check::BeforeSteps)
}

/// Turns an iterable reference into the iterator that drives the loop.
pub fn iterator_of(value: &Value) -> RuntimeResult<IteratorValue> {
    match value {
        Value::Iterator(iterator) => Ok(iterator.clone()),
        Value::List(list) => Ok(list.iter_value()),
        Value::Array(array) => Ok(IteratorValue::new(array.items.to_vec())),
        Value::Null => Err(RuntimeError::NullReference {
            message: "iterated loop over null".into(),
        }),
        other => Err(RuntimeError::TypeMismatch {
            message: format!("{} is not iterable", other.type_name()),
        }),
    }
}

fn iterated_clauses(
    source: &Handle,
    init: Option<&Handle>,
    body: &Handle,
    body_shape: &BodyShape,
) -> Vec<Option<Clause>> {
    let producer = source.clone();
    let start = Handle::new(
        "iterated_loop.iterator",
        source.signature().with_returns(Kind::Reference),
        move |args| Ok(Value::Iterator(iterator_of(&producer.invoke_exact(args)?)?)),
    );
    let has_next = Handle::new(
        "iterated_loop.has_next",
        Signature::new([Kind::Reference], Kind::Boolean),
        |args| Ok(Value::Boolean(iterator_of(&args[0])?.has_next())),
    );
    let iterator_clause = Clause::default().with_init(start).with_pred(has_next);

    let mut vars = vec![Kind::Reference];
    vars.extend(body_shape.var);
    let threads_var = body_shape.var.is_some();
    let mut step_params = vars.clone();
    step_params.extend_from_slice(&body_shape.externals);
    let target = body.clone();
    let step = Handle::new(
        body.name(),
        Signature::new(step_params, body.returns()),
        move |args| {
            // (it, v?, A...) -> (v?, e, A...)
            let element = iterator_of(&args[0])?.next_value()?;
            let rest = if threads_var { 2 } else { 1 };
            let mut forwarded = Vec::with_capacity(args.len());
            forwarded.extend_from_slice(&args[1..rest]);
            forwarded.push(element);
            forwarded.extend_from_slice(&args[rest..]);
            target.invoke_exact(&forwarded)
        },
    );
    let mut body_clause = Clause::default().with_step(step);
    body_clause.init = init.cloned();
    if let Some(var) = body_shape.var {
        body_clause.fini = Some(Handle::new(
            "iterated_loop.result",
            Signature::new([Kind::Reference, var], var),
            |args| Ok(args[1].clone()),
        ));
    }

    vec![Some(iterator_clause), Some(body_clause)]
}

#[cfg(test)]
mod tests;
