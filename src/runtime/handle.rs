use crate::combinators::error::{ShapeError, ShapeResult};
use crate::language::{kind::Kind, signature::Signature};
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    value::{ArrayValue, Value},
};
use std::fmt;
use std::sync::Arc;

/// The callable behind a [`Handle`]. Receives arguments already checked
/// against the handle's signature.
pub type NativeFn = dyn Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync;

/// An opaque, strongly-typed callable.
///
/// Handles are immutable and cheap to clone; every combinator returns a new
/// handle wrapping its inputs. A handle may be invoked concurrently from any
/// number of threads.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    name: String,
    signature: Signature,
    target: Arc<NativeFn>,
    varargs: bool,
}

impl Handle {
    pub fn new<F>(name: impl Into<String>, signature: Signature, target: F) -> Self
    where
        F: Fn(&[Value]) -> RuntimeResult<Value> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(HandleInner {
                name: name.into(),
                signature,
                target: Arc::new(target),
                varargs: false,
            }),
        }
    }

    /// Same callable and signature, different varargs mode.
    pub(crate) fn with_varargs_flag(&self, varargs: bool) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name: self.inner.name.clone(),
                signature: self.inner.signature.clone(),
                target: Arc::clone(&self.inner.target),
                varargs,
            }),
        }
    }

    /// Same callable, signature and varargs mode under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name: name.into(),
                signature: self.inner.signature.clone(),
                target: Arc::clone(&self.inner.target),
                varargs: self.inner.varargs,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    pub fn params(&self) -> &[Kind] {
        self.inner.signature.params()
    }

    pub fn returns(&self) -> Kind {
        self.inner.signature.returns()
    }

    pub fn arity(&self) -> usize {
        self.inner.signature.arity()
    }

    pub fn is_varargs(&self) -> bool {
        self.inner.varargs
    }

    /// Identity comparison: true when both values are the same handle.
    pub fn same_as(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Strict invocation: argument count and every argument kind must match
    /// the signature exactly.
    pub fn invoke_exact(&self, args: &[Value]) -> RuntimeResult<Value> {
        let params = self.params();
        if args.len() != params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: self.name().to_string(),
                expected: params.len(),
                received: args.len(),
            });
        }
        for (idx, (param, arg)) in params.iter().zip(args).enumerate() {
            if !arg.conforms_to(*param) {
                return Err(RuntimeError::TypeMismatch {
                    message: format!(
                        "argument {idx} of `{}` expects {param}, found {}",
                        self.name(),
                        arg.type_name()
                    ),
                });
            }
        }
        let result = (self.inner.target)(args)?;
        if !result.conforms_to(self.returns()) {
            return Err(RuntimeError::TypeMismatch {
                message: format!(
                    "`{}` returned {} but declares {}",
                    self.name(),
                    result.type_name(),
                    self.returns()
                ),
            });
        }
        Ok(result)
    }

    /// Invokes with as many leading arguments as this handle accepts.
    /// Combinators use it for handles whose trailing parameters were omitted.
    pub(crate) fn invoke_prefix(&self, args: &[Value]) -> RuntimeResult<Value> {
        let take = self.arity().min(args.len());
        self.invoke_exact(&args[..take])
    }

    /// Loose invocation. Identical to [`Handle::invoke_exact`] except that a
    /// varargs handle collects trailing arguments into its array parameter.
    pub fn invoke(&self, args: &[Value]) -> RuntimeResult<Value> {
        if !self.is_varargs() {
            return self.invoke_exact(args);
        }
        let arity = self.arity();
        let Some(array_kind) = self.signature().last_param() else {
            return self.invoke_exact(args);
        };
        if args.len() == arity && args.last().is_some_and(|last| last.conforms_to(array_kind)) {
            return self.invoke_exact(args);
        }
        let fixed = arity - 1;
        if args.len() < fixed {
            return Err(RuntimeError::ArityMismatch {
                name: self.name().to_string(),
                expected: fixed,
                received: args.len(),
            });
        }
        let Some(component) = array_kind.component() else {
            return self.invoke_exact(args);
        };
        let (leading, trailing) = args.split_at(fixed);
        if let Some((idx, bad)) = trailing
            .iter()
            .enumerate()
            .find(|(_, value)| !value.conforms_to(component.kind()))
        {
            return Err(RuntimeError::TypeMismatch {
                message: format!(
                    "varargs element {idx} of `{}` expects {component}, found {}",
                    self.name(),
                    bad.type_name()
                ),
            });
        }
        let mut collected = leading.to_vec();
        collected.push(Value::Array(ArrayValue::from_vec(
            component,
            trailing.to_vec(),
        )));
        self.invoke_exact(&collected)
    }

    /// `() -> value.kind()`, always producing `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(
            format!("constant({value})"),
            Signature::returning(value.kind()),
            move |_| Ok(value.clone()),
        )
    }

    /// `() -> kind`, producing the kind's zero value.
    pub fn zero(kind: Kind) -> Self {
        Self::new(
            format!("zero({kind})"),
            Signature::returning(kind),
            move |_| Ok(Value::zero(kind)),
        )
    }

    /// `(kind) -> kind`. The identity of `void` is the no-op `() -> void`.
    pub fn identity(kind: Kind) -> Self {
        if kind.is_void() {
            return Self::new("identity(void)", Signature::returning(Kind::Void), |_| {
                Ok(Value::Void)
            });
        }
        Self::new(
            format!("identity({kind})"),
            Signature::new(vec![kind], kind),
            |args| Ok(args[0].clone()),
        )
    }

    /// A handle accepting extra ignored parameters of `kinds` at `position`.
    pub fn drop_arguments(&self, position: usize, kinds: &[Kind]) -> ShapeResult<Handle> {
        if position > self.arity() {
            return Err(ShapeError::PositionOutOfRange {
                position,
                arity: self.arity(),
            });
        }
        if kinds.is_empty() {
            return Ok(self.clone());
        }
        if let Some(void) = kinds.iter().find(|kind| kind.is_void()) {
            return Err(ShapeError::SignatureMismatch {
                role: "dropped argument".into(),
                expected: "a non-void kind".into(),
                found: void.to_string(),
            });
        }
        let target = self.clone();
        let count = kinds.len();
        let signature = self.signature().inserting(position, kinds);
        Ok(Handle::new(self.name(), signature, move |args| {
            let mut kept = Vec::with_capacity(args.len() - count);
            kept.extend_from_slice(&args[..position]);
            kept.extend_from_slice(&args[position + count..]);
            target.invoke_exact(&kept)
        }))
    }

    /// Binds `value` to the parameter at `position`, producing a handle with
    /// that parameter removed.
    pub fn bind(&self, position: usize, value: Value) -> ShapeResult<Handle> {
        let Some(kind) = self.signature().param(position) else {
            return Err(ShapeError::PositionOutOfRange {
                position,
                arity: self.arity(),
            });
        };
        if !value.conforms_to(kind) {
            return Err(ShapeError::SignatureMismatch {
                role: format!("bound argument {position}"),
                expected: kind.to_string(),
                found: value.type_name().to_string(),
            });
        }
        let target = self.clone();
        let signature = self.signature().dropping(position, 1);
        Ok(Handle::new(self.name(), signature, move |args| {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.extend_from_slice(&args[..position]);
            full.push(value.clone());
            full.extend_from_slice(&args[position..]);
            target.invoke_exact(&full)
        }))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({} {}", self.name(), self.signature())?;
        if self.is_varargs() {
            write!(f, " varargs")?;
        }
        write!(f, ")")
    }
}
