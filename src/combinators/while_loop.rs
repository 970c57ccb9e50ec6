//! Single-clause `while` and `do-while` loops.

use crate::combinators::error::ShapeResult;
use crate::combinators::loops::{build_loop, Check, Clause};
use crate::combinators::shape;
use crate::language::kind::Kind;
use crate::runtime::handle::Handle;

/// `while_loop(init, pred, body)`: `pred` is checked before every body step.
pub fn while_loop(init: Option<&Handle>, pred: &Handle, body: &Handle) -> ShapeResult<Handle> {
    single_clause("while_loop", init, pred, body, Check::BeforeSteps)
}

/// `do_while_loop(init, body, pred)`: the body runs at least once and `pred`
/// is checked after every step.
pub fn do_while_loop(init: Option<&Handle>, body: &Handle, pred: &Handle) -> ShapeResult<Handle> {
    single_clause("do_while_loop", init, pred, body, Check::AfterSteps)
}

fn single_clause(
    name: &str,
    init: Option<&Handle>,
    pred: &Handle,
    body: &Handle,
    check: Check,
) -> ShapeResult<Handle> {
    let body_shape = shape::check_while_body(body)?;
    shape::check_init(init, body_shape.var)?;
    shape::require_returns("loop predicate", pred, Kind::Boolean)?;

    let mut clause = Clause::default()
        .with_step(body.clone())
        .with_pred(pred.clone());
    clause.init = init.cloned();
    clause.fini = body_shape.var.map(Handle::identity);
    build_loop(name, Some(&[Some(clause)][..]), check)
}

#[cfg(test)]
mod tests;
