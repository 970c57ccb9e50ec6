use crate::runtime::{error::RuntimeResult, handle::Handle, value::Value};
use std::fmt;
use std::str::FromStr;

/// How arguments are matched against a handle's signature. Neither mode
/// widens or converts arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallMode {
    /// Argument count and kinds must match exactly; varargs handles need
    /// their array argument spelled out.
    Exact,
    /// Like `Exact`, but varargs handles collect trailing arguments.
    #[default]
    Loose,
}

impl CallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMode::Exact => "exact",
            CallMode::Loose => "loose",
        }
    }
}

impl fmt::Display for CallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallMode {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(CallMode::Exact),
            "loose" => Ok(CallMode::Loose),
            other => Err(format!("unknown call mode `{other}`")),
        }
    }
}

/// Executes composed handles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Invoker {
    mode: CallMode,
}

impl Invoker {
    pub fn new(mode: CallMode) -> Self {
        Self { mode }
    }

    pub fn exact() -> Self {
        Self::new(CallMode::Exact)
    }

    pub fn mode(&self) -> CallMode {
        self.mode
    }

    pub fn invoke(&self, handle: &Handle, args: &[Value]) -> RuntimeResult<Value> {
        tracing::trace!(
            handle = handle.name(),
            mode = %self.mode,
            args = args.len(),
            "invoke"
        );
        match self.mode {
            CallMode::Exact => handle.invoke_exact(args),
            CallMode::Loose => handle.invoke(args),
        }
    }
}
