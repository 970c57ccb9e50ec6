//! Argument adapters: collect individual arguments into an array, spread an
//! array into individual arguments, fold a combiner's result into the
//! argument list, and toggle varargs collection.

use crate::combinators::error::{ShapeError, ShapeResult};
use crate::combinators::shape;
use crate::language::kind::{Component, Kind};
use crate::runtime::{
    error::RuntimeError,
    handle::Handle,
    value::{ArrayValue, Value},
};

fn array_param(
    role: &str,
    target: &Handle,
    position: usize,
    component: Component,
) -> ShapeResult<()> {
    let Some(found) = target.signature().param(position) else {
        return Err(ShapeError::PositionOutOfRange {
            position,
            arity: target.arity(),
        });
    };
    match found.component() {
        Some(actual) if actual == component => Ok(()),
        Some(_) => Err(ShapeError::SignatureMismatch {
            role: role.to_string(),
            expected: Kind::array_of(component).to_string(),
            found: found.to_string(),
        }),
        None => Err(ShapeError::NotAnArray {
            role: role.to_string(),
            position,
            found,
        }),
    }
}

/// Replaces the `component[]` parameter at `position` with `count`
/// individual `component` parameters.
pub fn as_collector(
    target: &Handle,
    position: usize,
    component: Component,
    count: usize,
) -> ShapeResult<Handle> {
    array_param("collector", target, position, component)?;
    let element = component.kind();
    let signature = target
        .signature()
        .replacing(position, 1, &vec![element; count][..]);
    tracing::debug!(
        handle = target.name(),
        position,
        count,
        signature = %signature,
        "built collector"
    );
    let inner = target.clone();
    Ok(Handle::new(target.name(), signature, move |args| {
        let mut forwarded = Vec::with_capacity(args.len() + 1 - count);
        forwarded.extend_from_slice(&args[..position]);
        forwarded.push(Value::Array(ArrayValue::from_vec(
            component,
            args[position..position + count].to_vec(),
        )));
        forwarded.extend_from_slice(&args[position + count..]);
        inner.invoke_exact(&forwarded)
    }))
}

/// [`as_collector`] on the last parameter.
pub fn as_collector_trailing(
    target: &Handle,
    component: Component,
    count: usize,
) -> ShapeResult<Handle> {
    let position = last_position(target)?;
    as_collector(target, position, component, count)
}

/// Replaces `count` `component` parameters starting at `position` with one
/// `component[]` parameter. The array must hold at least `count` elements.
pub fn as_spreader(
    target: &Handle,
    position: usize,
    component: Component,
    count: usize,
) -> ShapeResult<Handle> {
    if position + count > target.arity() {
        return Err(ShapeError::CountMismatch {
            role: "spreader".into(),
            expected: count,
            found: target.arity().saturating_sub(position),
        });
    }
    let element = component.kind();
    if let Some((offset, found)) = target.params()[position..position + count]
        .iter()
        .enumerate()
        .find(|(_, kind)| **kind != element)
    {
        return Err(ShapeError::SignatureMismatch {
            role: format!("spread parameter {}", position + offset),
            expected: element.to_string(),
            found: found.to_string(),
        });
    }
    let signature = target
        .signature()
        .replacing(position, count, &[Kind::array_of(component)]);
    tracing::debug!(
        handle = target.name(),
        position,
        count,
        signature = %signature,
        "built spreader"
    );
    let inner = target.clone();
    Ok(Handle::new(target.name(), signature, move |args| {
        let items: Vec<Value> = match &args[position] {
            Value::Array(array) if array.len() >= count => array.items[..count].to_vec(),
            Value::Array(array) => {
                return Err(RuntimeError::SpreadLength {
                    expected: count,
                    actual: array.len(),
                })
            }
            Value::Null if count == 0 => Vec::new(),
            Value::Null => {
                return Err(RuntimeError::NullReference {
                    message: format!("cannot spread null into {count} arguments"),
                })
            }
            other => {
                return Err(RuntimeError::TypeMismatch {
                    message: format!("expected {component}[], found {}", other.type_name()),
                })
            }
        };
        let mut forwarded = Vec::with_capacity(args.len() + count);
        forwarded.extend_from_slice(&args[..position]);
        forwarded.extend(items);
        forwarded.extend_from_slice(&args[position + 1..]);
        inner.invoke_exact(&forwarded)
    }))
}

/// [`as_spreader`] over the last `count` parameters.
pub fn as_spreader_trailing(
    target: &Handle,
    component: Component,
    count: usize,
) -> ShapeResult<Handle> {
    let position = target
        .arity()
        .checked_sub(count)
        .ok_or(ShapeError::CountMismatch {
            role: "spreader".into(),
            expected: count,
            found: target.arity(),
        })?;
    as_spreader(target, position, component, count)
}

fn last_position(target: &Handle) -> ShapeResult<usize> {
    target
        .arity()
        .checked_sub(1)
        .ok_or(ShapeError::PositionOutOfRange {
            position: 0,
            arity: 0,
        })
}

/// Runs `combiner` on the target's arguments starting at `fold_position` and,
/// when it returns a value, inserts that value at `fold_position`.
pub fn fold_arguments(
    target: &Handle,
    fold_position: usize,
    combiner: &Handle,
) -> ShapeResult<Handle> {
    let first = if combiner.returns().is_void() {
        fold_position
    } else {
        fold_position + 1
    };
    let positions: Vec<usize> = (first..first + combiner.arity()).collect();
    fold(target, fold_position, combiner, &positions)
}

/// Like [`fold_arguments`], but `arg_positions` picks (by target parameter
/// index) which arguments feed the combiner. `fold_position` itself may not
/// be picked.
pub fn fold_arguments_with(
    target: &Handle,
    fold_position: usize,
    combiner: &Handle,
    arg_positions: &[usize],
) -> ShapeResult<Handle> {
    if arg_positions.contains(&fold_position) {
        return Err(ShapeError::FoldSelectsPosition {
            position: fold_position,
        });
    }
    fold(target, fold_position, combiner, arg_positions)
}

fn fold(
    target: &Handle,
    fold_position: usize,
    combiner: &Handle,
    arg_positions: &[usize],
) -> ShapeResult<Handle> {
    let inserts = !combiner.returns().is_void();
    if fold_position > target.arity() || (inserts && fold_position == target.arity()) {
        return Err(ShapeError::PositionOutOfRange {
            position: fold_position,
            arity: target.arity(),
        });
    }
    if arg_positions.len() != combiner.arity() {
        return Err(ShapeError::CountMismatch {
            role: "combiner".into(),
            expected: combiner.arity(),
            found: arg_positions.len(),
        });
    }
    if inserts {
        shape::require_returns("combiner", combiner, target.params()[fold_position])?;
    }
    for (idx, position) in arg_positions.iter().enumerate() {
        let Some(kind) = target.signature().param(*position) else {
            return Err(ShapeError::PositionOutOfRange {
                position: *position,
                arity: target.arity(),
            });
        };
        if combiner.params()[idx] != kind {
            return Err(ShapeError::SignatureMismatch {
                role: format!("combiner parameter {idx}"),
                expected: kind.to_string(),
                found: combiner.params()[idx].to_string(),
            });
        }
    }

    let signature = if inserts {
        target.signature().dropping(fold_position, 1)
    } else {
        target.signature().clone()
    };
    // Adapter argument index for each target parameter index.
    let selected: Vec<usize> = arg_positions
        .iter()
        .map(|&position| {
            if inserts && position > fold_position {
                position - 1
            } else {
                position
            }
        })
        .collect();
    tracing::debug!(
        handle = target.name(),
        combiner = combiner.name(),
        fold_position,
        signature = %signature,
        "built folder"
    );
    let inner = target.clone();
    let combine = combiner.clone();
    Ok(Handle::new(target.name(), signature, move |args| {
        let picked: Vec<Value> = selected.iter().map(|&idx| args[idx].clone()).collect();
        let folded = combine.invoke_exact(&picked)?;
        if !inserts {
            return inner.invoke_exact(args);
        }
        let mut forwarded = Vec::with_capacity(args.len() + 1);
        forwarded.extend_from_slice(&args[..fold_position]);
        forwarded.push(folded);
        forwarded.extend_from_slice(&args[fold_position..]);
        inner.invoke_exact(&forwarded)
    }))
}

/// Turns varargs collection on or off. Returns `target` itself when it is
/// already in the requested mode.
pub fn with_varargs(target: &Handle, enable: bool) -> ShapeResult<Handle> {
    if target.is_varargs() == enable {
        return Ok(target.clone());
    }
    if enable && !matches!(target.signature().last_param(), Some(Kind::Array(_))) {
        return Err(ShapeError::NotVarargsCapable {
            found: target.signature().to_string(),
        });
    }
    tracing::debug!(handle = target.name(), enable, "toggled varargs");
    Ok(target.with_varargs_flag(enable))
}

#[cfg(test)]
mod tests;
