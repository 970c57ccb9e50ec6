use crate::combinators::error::{ShapeError, ShapeResult};
use crate::combinators::shape;
use crate::language::kind::Kind;
use crate::runtime::{
    handle::Handle,
    value::{Outcome, Value},
};

/// `try_finally(target, cleanup)`.
///
/// `cleanup` takes `(failure, [result], A...)`: the failure is `null` on
/// success, the result slot is present only when `target` returns a value
/// (its zero stands in after a failure), and `A...` is any prefix of
/// `target`'s parameters. The produced handle has `target`'s signature and
/// returns whatever `cleanup` returns. After a failure the original error is
/// rethrown once `cleanup` completes, unless `cleanup` fails itself.
pub fn try_finally(target: &Handle, cleanup: &Handle) -> ShapeResult<Handle> {
    let result_kind = target.returns();
    let mut leading = vec![Kind::Reference];
    if !result_kind.is_void() {
        leading.push(result_kind);
    }
    let params = cleanup.params();
    if params.len() < leading.len() {
        return Err(ShapeError::SignatureMismatch {
            role: "cleanup".into(),
            expected: format!("leading parameters {}", shape::kinds(&leading)),
            found: shape::kinds(params),
        });
    }
    shape::require_prefix("cleanup", params, &leading)?;
    shape::require_same_return("try and cleanup", result_kind, cleanup.returns())?;
    let passed = &params[leading.len()..];
    if passed.len() > target.arity() || passed != &target.params()[..passed.len()] {
        return Err(ShapeError::PrefixMismatch {
            role: "cleanup arguments".into(),
            expected: shape::kinds(target.params()),
            found: shape::kinds(passed),
        });
    }

    tracing::debug!(
        handle = target.name(),
        cleanup = cleanup.name(),
        signature = %target.signature(),
        "built try_finally handle"
    );
    let body = target.clone();
    let finalizer = cleanup.clone();
    let forwarded = passed.len();
    Ok(Handle::new(
        format!("try_finally({})", target.name()),
        target.signature().clone(),
        move |args| {
            let result = body.invoke_exact(args);
            let outcome = match &result {
                Ok(value) => Outcome::Success(value.clone()),
                Err(err) => Outcome::Failure(err.to_failure()),
            };
            tracing::trace!(success = outcome.is_success(), "try_finally outcome");

            let mut cleanup_args = Vec::with_capacity(2 + forwarded);
            match outcome {
                Outcome::Success(value) => {
                    cleanup_args.push(Value::Null);
                    if !result_kind.is_void() {
                        cleanup_args.push(value);
                    }
                }
                Outcome::Failure(failure) => {
                    cleanup_args.push(Value::Throwable(failure));
                    if !result_kind.is_void() {
                        cleanup_args.push(Value::zero(result_kind));
                    }
                }
            }
            cleanup_args.extend_from_slice(&args[..forwarded]);

            let cleaned = finalizer.invoke_exact(&cleanup_args)?;
            result.map(|_| cleaned)
        },
    ))
}
