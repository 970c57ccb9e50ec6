use super::*;
use crate::language::signature::Signature;
use crate::runtime::error::RuntimeResult;
use pretty_assertions::assert_eq;

fn sum_ints(args: &[Value]) -> RuntimeResult<i64> {
    let mut total = 0i64;
    for arg in args {
        match arg {
            Value::Int(v) => total += i64::from(*v),
            Value::Array(array) => {
                for item in array.items.iter() {
                    total += i64::from(item.as_int()?);
                }
            }
            _ => {}
        }
    }
    Ok(total)
}

/// `(ref, int[], long) -> long`: sums the array and adds the long.
fn array_target() -> Handle {
    Handle::new(
        "array_target",
        Signature::new(
            [Kind::Reference, Kind::array_of(Component::Int), Kind::Long],
            Kind::Long,
        ),
        |args| {
            let Value::Long(extra) = args[2] else {
                return Ok(Value::Long(-1));
            };
            Ok(Value::Long(sum_ints(&args[1..2])? + extra))
        },
    )
}

/// Echoes every argument back as a list.
fn echo(params: &[Kind]) -> Handle {
    Handle::new("echo", Signature::new(params, Kind::Reference), |args| {
        Ok(Value::List(crate::runtime::value::ListValue::from_vec(args.to_vec())))
    })
}

fn echoed(value: Value) -> Vec<Value> {
    match value {
        Value::List(list) => list.snapshot(),
        other => panic!("expected a list, found {other}"),
    }
}

#[test]
fn collector_builds_the_array() {
    let collector = as_collector(&array_target(), 1, Component::Int, 3).expect("collector");
    assert_eq!(
        collector.signature().to_string(),
        "(ref, int, int, int, long) -> long"
    );
    let result = collector
        .invoke_exact(&[
            Value::Null,
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Long(10),
        ])
        .expect("run");
    assert_eq!(result, Value::Long(16));
}

#[test]
fn collecting_zero_arguments_passes_an_empty_array() {
    let target = echo(&[Kind::array_of(Component::Reference)]);
    let collector = as_collector_trailing(&target, Component::Reference, 0).expect("collector");
    assert_eq!(collector.arity(), 0);
    assert_eq!(
        echoed(collector.invoke_exact(&[]).expect("run")),
        vec![Value::Array(ArrayValue::empty(Component::Reference))]
    );
}

#[test]
fn collector_rejects_non_array_positions() {
    assert!(matches!(
        as_collector(&array_target(), 2, Component::Long, 1),
        Err(ShapeError::NotAnArray { position: 2, .. })
    ));
    assert!(matches!(
        as_collector(&array_target(), 1, Component::Long, 1),
        Err(ShapeError::SignatureMismatch { .. })
    ));
    assert!(matches!(
        as_collector(&array_target(), 3, Component::Int, 1),
        Err(ShapeError::PositionOutOfRange { .. })
    ));
}

#[test]
fn spreader_reads_leading_elements() {
    let target = echo(&[Kind::Long, Kind::Int, Kind::Int]);
    let spreader = as_spreader_trailing(&target, Component::Int, 2).expect("spreader");
    assert_eq!(spreader.signature().to_string(), "(long, int[]) -> ref");
    let array = ArrayValue::from_vec(
        Component::Int,
        vec![Value::Int(4), Value::Int(5), Value::Int(6)],
    );
    assert_eq!(
        echoed(
            spreader
                .invoke_exact(&[Value::Long(1), Value::Array(array)])
                .expect("run")
        ),
        vec![Value::Long(1), Value::Int(4), Value::Int(5)]
    );
}

#[test]
fn short_arrays_fail_at_invocation() {
    let target = echo(&[Kind::Int, Kind::Int]);
    let spreader = as_spreader(&target, 0, Component::Int, 2).expect("spreader");
    let short = ArrayValue::from_vec(Component::Int, vec![Value::Int(1)]);
    assert!(matches!(
        spreader.invoke_exact(&[Value::Array(short)]),
        Err(RuntimeError::SpreadLength {
            expected: 2,
            actual: 1
        })
    ));
    assert!(matches!(
        spreader.invoke_exact(&[Value::Null]),
        Err(RuntimeError::NullReference { .. })
    ));
}

#[test]
fn spreading_zero_accepts_null() {
    let target = echo(&[Kind::Long]);
    let spreader = as_spreader(&target, 1, Component::Int, 0).expect("spreader");
    assert_eq!(spreader.signature().to_string(), "(long, int[]) -> ref");
    assert_eq!(
        echoed(spreader.invoke_exact(&[Value::Long(3), Value::Null]).expect("run")),
        vec![Value::Long(3)]
    );
}

#[test]
fn spreader_validates_its_range() {
    let target = echo(&[Kind::Int, Kind::Long]);
    assert!(matches!(
        as_spreader(&target, 0, Component::Int, 2),
        Err(ShapeError::SignatureMismatch { .. })
    ));
    assert!(matches!(
        as_spreader(&target, 1, Component::Long, 2),
        Err(ShapeError::CountMismatch { .. })
    ));
    assert!(matches!(
        as_spreader_trailing(&target, Component::Int, 3),
        Err(ShapeError::CountMismatch { .. })
    ));
}

fn add() -> Handle {
    Handle::new(
        "add",
        Signature::new([Kind::Int, Kind::Int], Kind::Int),
        |args| Ok(Value::Int(args[0].as_int()? + args[1].as_int()?)),
    )
}

#[test]
fn fold_inserts_the_combined_value() {
    let target = echo(&[Kind::Int, Kind::Int, Kind::Int]);
    let folded = fold_arguments(&target, 0, &add()).expect("fold");
    assert_eq!(folded.signature().to_string(), "(int, int) -> ref");
    assert_eq!(
        echoed(folded.invoke_exact(&[Value::Int(2), Value::Int(3)]).expect("run")),
        vec![Value::Int(5), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn fold_with_positions_selects_target_indices() {
    let target = echo(&[Kind::Int, Kind::Long, Kind::Int, Kind::Int]);
    let folded = fold_arguments_with(&target, 2, &add(), &[3, 0]).expect("fold");
    assert_eq!(folded.signature().to_string(), "(int, long, int) -> ref");
    assert_eq!(
        echoed(
            folded
                .invoke_exact(&[Value::Int(1), Value::Long(7), Value::Int(10)])
                .expect("run")
        ),
        vec![Value::Int(1), Value::Long(7), Value::Int(11), Value::Int(10)]
    );
}

#[test]
fn void_combiner_leaves_arguments_alone() {
    let seen = crate::runtime::value::ListValue::new();
    let sink = seen.clone();
    let observe = Handle::new("observe", Signature::new([Kind::Int], Kind::Void), move |args| {
        sink.push(args[0].clone());
        Ok(Value::Void)
    });
    let target = echo(&[Kind::Int, Kind::Long]);
    let folded = fold_arguments(&target, 0, &observe).expect("fold");
    assert_eq!(folded.signature(), target.signature());
    assert_eq!(
        echoed(folded.invoke_exact(&[Value::Int(4), Value::Long(5)]).expect("run")),
        vec![Value::Int(4), Value::Long(5)]
    );
    assert_eq!(seen.snapshot(), vec![Value::Int(4)]);
}

#[test]
fn fold_may_not_select_its_own_position() {
    let target = echo(&[Kind::Int, Kind::Int, Kind::Int]);
    assert_eq!(
        fold_arguments_with(&target, 1, &add(), &[1, 2]).unwrap_err(),
        ShapeError::FoldSelectsPosition { position: 1 }
    );
}

#[test]
fn fold_validates_combiner_shape() {
    let target = echo(&[Kind::Long, Kind::Int, Kind::Int]);
    assert!(matches!(
        fold_arguments(&target, 0, &add()),
        Err(ShapeError::SignatureMismatch { .. })
    ));
    assert!(matches!(
        fold_arguments_with(&target, 0, &add(), &[1]),
        Err(ShapeError::CountMismatch { .. })
    ));
    assert!(matches!(
        fold_arguments(&target, 3, &add()),
        Err(ShapeError::PositionOutOfRange { .. })
    ));
    assert!(matches!(
        fold_arguments_with(&echo(&[Kind::Int, Kind::Int]), 0, &add(), &[1, 5]),
        Err(ShapeError::PositionOutOfRange { position: 5, .. })
    ));
}

#[test]
fn varargs_toggle() {
    let target = echo(&[Kind::Long, Kind::array_of(Component::Int)]);
    let plain = with_varargs(&target, false).expect("noop");
    assert!(plain.same_as(&target));

    let varargs = with_varargs(&target, true).expect("enable");
    assert!(varargs.is_varargs());
    assert!(with_varargs(&varargs, true).expect("noop").same_as(&varargs));
    assert_eq!(
        echoed(
            varargs
                .invoke(&[Value::Long(1), Value::Int(2), Value::Int(3)])
                .expect("loose")
        ),
        vec![
            Value::Long(1),
            Value::Array(ArrayValue::from_vec(
                Component::Int,
                vec![Value::Int(2), Value::Int(3)]
            )),
        ]
    );

    let reverted = with_varargs(&varargs, false).expect("disable");
    assert!(!reverted.is_varargs());
    assert!(reverted
        .invoke(&[Value::Long(1), Value::Int(2), Value::Int(3)])
        .is_err());

    assert!(matches!(
        with_varargs(&echo(&[Kind::Int]), true),
        Err(ShapeError::NotVarargsCapable { .. })
    ));
}
