use crate::runtime::invoker::{CallMode, Invoker};
use std::env;

/// Environment variable selecting the default call mode.
pub const CALL_MODE_ENV: &str = "PRIME_HANDLES_CALL_MODE";
/// Environment variable holding the `tracing` filter used by the CLI.
pub const LOG_ENV: &str = "PRIME_HANDLES_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Invocation settings shared by the CLI and embedding callers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    pub mode: CallMode,
}

impl InvokeOptions {
    /// Call mode from an explicit flag, else `PRIME_HANDLES_CALL_MODE`, else
    /// loose. Unrecognized values fall back to the default.
    pub fn from_flag_or_env(flag: Option<String>) -> Self {
        let requested = flag
            .or_else(|| env::var(CALL_MODE_ENV).ok())
            .filter(|mode| !mode.trim().is_empty());
        let mode = match requested {
            Some(text) => text.parse().unwrap_or_else(|err| {
                tracing::warn!("{err}; using {}", CallMode::default());
                CallMode::default()
            }),
            None => CallMode::default(),
        };
        Self { mode }
    }

    pub fn invoker(&self) -> Invoker {
        Invoker::new(self.mode)
    }
}

/// Log filter directive for the CLI subscriber.
pub fn log_filter() -> String {
    env::var(LOG_ENV)
        .ok()
        .filter(|filter| !filter.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
