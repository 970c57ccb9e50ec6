pub mod combinators;
pub mod config;
pub mod demo;
pub mod diagnostics;
pub mod language;
pub mod runtime;
