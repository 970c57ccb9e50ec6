use crate::language::kind::{Component, Kind};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use std::fmt;
use std::iter::Peekable;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub enum Value {
    Void,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Null,
    String(Arc<str>),
    List(ListValue),
    Iterator(IteratorValue),
    Array(ArrayValue),
    Throwable(Failure),
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Arc::from(text.as_ref()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Void => Kind::Void,
            Value::Boolean(_) => Kind::Boolean,
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Char(_) => Kind::Char,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Array(array) => Kind::Array(array.component),
            Value::Null
            | Value::String(_)
            | Value::List(_)
            | Value::Iterator(_)
            | Value::Throwable(_) => Kind::Reference,
        }
    }

    /// Exact-kind conformance. `Null` conforms to every reference kind,
    /// arrays included; nothing else is converted.
    pub fn conforms_to(&self, kind: Kind) -> bool {
        match self {
            Value::Null => kind.is_reference(),
            Value::Array(_) => self.kind() == kind || kind == Kind::Reference,
            other => other.kind() == kind,
        }
    }

    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::Void => Value::Void,
            Kind::Boolean => Value::Boolean(false),
            Kind::Byte => Value::Byte(0),
            Kind::Short => Value::Short(0),
            Kind::Char => Value::Char(0),
            Kind::Int => Value::Int(0),
            Kind::Long => Value::Long(0),
            Kind::Float => Value::Float(0.0),
            Kind::Double => Value::Double(0.0),
            Kind::Reference | Kind::Array(_) => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(RuntimeError::TypeMismatch {
                message: format!("expected boolean, found {}", other.type_name()),
            }),
        }
    }

    pub fn as_int(&self) -> RuntimeResult<i32> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(RuntimeError::TypeMismatch {
                message: format!("expected int, found {}", other.type_name()),
            }),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parses command-line text into a value of the requested kind.
    pub fn parse_as(kind: Kind, text: &str) -> RuntimeResult<Self> {
        let mismatch = || RuntimeError::TypeMismatch {
            message: format!("`{text}` is not a valid {kind}"),
        };
        let value = match kind {
            Kind::Boolean => Value::Boolean(text.parse().map_err(|_| mismatch())?),
            Kind::Byte => Value::Byte(text.parse().map_err(|_| mismatch())?),
            Kind::Short => Value::Short(text.parse().map_err(|_| mismatch())?),
            Kind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if (c as u32) <= u32::from(u16::MAX) => Value::Char(c as u16),
                    _ => return Err(mismatch()),
                }
            }
            Kind::Int => Value::Int(text.parse().map_err(|_| mismatch())?),
            Kind::Long => Value::Long(text.parse().map_err(|_| mismatch())?),
            Kind::Float => Value::Float(text.parse().map_err(|_| mismatch())?),
            Kind::Double => Value::Double(text.parse().map_err(|_| mismatch())?),
            Kind::Reference if text == "null" => Value::Null,
            Kind::Reference => Value::string(text),
            Kind::Array(component) => {
                let items = text
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::parse_as(component.kind(), item))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                Value::Array(ArrayValue::from_vec(component, items))
            }
            Kind::Void => return Err(mismatch()),
        };
        Ok(value)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Null => "null",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Iterator(_) => "iterator",
            Value::Array(_) => "array",
            Value::Throwable(_) => "throwable",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                Arc::ptr_eq(&a.items, &b.items) || a.snapshot() == b.snapshot()
            }
            (Value::Array(a), Value::Array(b)) => {
                a.component == b.component && a.items == b.items
            }
            (Value::Iterator(a), Value::Iterator(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            (Value::Throwable(a), Value::Throwable(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "()"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "\\u{v:04x}"),
            },
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
            Value::String(v) => write!(f, "{v}"),
            Value::List(list) => write_items(f, &list.snapshot()),
            Value::Array(array) => write_items(f, &array.items),
            Value::Iterator(_) => write!(f, "<iterator>"),
            Value::Throwable(failure) => write!(f, "{failure}"),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (idx, value) in items.iter().enumerate() {
        if idx > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    write!(f, "]")
}

/// A growable shared list; the iterable reference type.
#[derive(Clone, Debug, Default)]
pub struct ListValue {
    pub items: Arc<Mutex<Vec<Value>>>,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }

    pub fn push(&self, value: Value) {
        lock(&self.items).push(value);
    }

    pub fn insert(&self, index: usize, value: Value) {
        let mut items = lock(&self.items);
        let at = index.min(items.len());
        items.insert(at, value);
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        lock(&self.items).get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<Value> {
        lock(&self.items).clone()
    }

    /// Iterator over a snapshot of the current contents.
    pub fn iter_value(&self) -> IteratorValue {
        IteratorValue::new(self.snapshot())
    }
}

/// Fixed-size array of a single component kind.
#[derive(Clone, Debug)]
pub struct ArrayValue {
    pub component: Component,
    pub items: Arc<[Value]>,
}

impl ArrayValue {
    pub fn from_vec(component: Component, items: Vec<Value>) -> Self {
        Self {
            component,
            items: items.into(),
        }
    }

    pub fn empty(component: Component) -> Self {
        Self::from_vec(component, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }
}

type BoxedIter = Box<dyn Iterator<Item = Value> + Send>;

/// Stateful cursor shared by every clone. Drives `iterated_loop`.
#[derive(Clone)]
pub struct IteratorValue {
    inner: Arc<Mutex<Peekable<BoxedIter>>>,
}

impl IteratorValue {
    pub fn new(items: Vec<Value>) -> Self {
        Self::from_source(items)
    }

    pub fn from_source<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        let boxed: BoxedIter = Box::new(iter.into_iter());
        Self {
            inner: Arc::new(Mutex::new(boxed.peekable())),
        }
    }

    pub fn has_next(&self) -> bool {
        lock(&self.inner).peek().is_some()
    }

    pub fn next_value(&self) -> RuntimeResult<Value> {
        lock(&self.inner)
            .next()
            .ok_or_else(|| RuntimeError::Unsupported {
                message: "iterator has no more elements".into(),
            })
    }
}

impl fmt::Debug for IteratorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorValue")
            .field("has_next", &self.has_next())
            .finish()
    }
}

/// Throwable representation carried through `try_finally`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: String,
    pub message: String,
}

impl Failure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of running a try body.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
