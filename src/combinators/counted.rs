//! Counted loops, built on the generalized loop.
//!
//! Loop variables are laid out as `(v?, i, limit)`: the body clause comes
//! first so its step observes the counter before the increment, and the
//! limit clause carries the `i < limit` predicate.

use crate::combinators::error::ShapeResult;
use crate::combinators::loops::{build_loop, Check, Clause};
use crate::combinators::shape::{self, BodyShape};
use crate::language::{kind::Kind, signature::Signature};
use crate::runtime::{handle::Handle, value::Value};

/// `counted_loop(start, end, init, body)`: runs `body` for `i` in
/// `start..end`. A void body receives `(i, A...)`, a non-void body
/// `(v, i, A...)`; the result is the final `v`.
pub fn counted_loop(
    start: &Handle,
    end: &Handle,
    init: Option<&Handle>,
    body: &Handle,
) -> ShapeResult<Handle> {
    shape::require_returns("loop start", start, Kind::Int)?;
    shape::require_returns("loop end", end, Kind::Int)?;
    let body_shape = shape::check_counted_body(body)?;
    shape::check_init(init, body_shape.var)?;

    let clauses = counted_clauses(start, end, init, body, &body_shape);
    build_loop("counted_loop", Some(clauses.as_slice()), Check::BeforeSteps)
}

/// `counted_loop(count, init, body)`: the same loop with `start = 0`.
pub fn counted_loop_n(count: &Handle, init: Option<&Handle>, body: &Handle) -> ShapeResult<Handle> {
    shape::require_returns("loop count", count, Kind::Int)?;
    counted_loop(&Handle::zero(Kind::Int), count, init, body)
}

fn counted_clauses(
    start: &Handle,
    end: &Handle,
    init: Option<&Handle>,
    body: &Handle,
    body_shape: &BodyShape,
) -> Vec<Option<Clause>> {
    let counter = usize::from(body_shape.var.is_some());
    let mut vars: Vec<Kind> = body_shape.var.into_iter().collect();
    vars.extend([Kind::Int, Kind::Int]);

    let mut step_params = vars.clone();
    step_params.extend_from_slice(&body_shape.externals);
    let target = body.clone();
    let step = Handle::new(
        body.name(),
        Signature::new(step_params, body.returns()),
        move |args| {
            // (v?, i, limit, A...) -> (v?, i, A...)
            let mut forwarded = Vec::with_capacity(args.len() - 1);
            forwarded.extend_from_slice(&args[..=counter]);
            forwarded.extend_from_slice(&args[counter + 2..]);
            target.invoke_exact(&forwarded)
        },
    );
    let mut body_clause = Clause::default().with_step(step);
    body_clause.init = init.cloned();

    let increment = Handle::new(
        "counted_loop.increment",
        Signature::new(&vars[..=counter], Kind::Int),
        move |args| Ok(Value::Int(args[counter].as_int()?.wrapping_add(1))),
    );
    let counter_clause = Clause::default()
        .with_init(start.clone())
        .with_step(increment);

    let below = Handle::new(
        "counted_loop.below_limit",
        Signature::new(vars.clone(), Kind::Boolean),
        move |args| {
            Ok(Value::Boolean(
                args[counter].as_int()? < args[counter + 1].as_int()?,
            ))
        },
    );
    let mut limit_clause = Clause::default().with_init(end.clone()).with_pred(below);
    if let Some(var) = body_shape.var {
        limit_clause.fini = Some(Handle::identity(var));
    }

    vec![Some(body_clause), Some(counter_clause), Some(limit_clause)]
}
