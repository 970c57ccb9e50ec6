use crate::language::kind::Kind;
use miette::Diagnostic;
use thiserror::Error;

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Construction-time failures. Every combinator reports one of these before
/// it returns a handle; none of them can occur during invocation.
#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Missing required handle: {role}")]
    #[diagnostic(
        code(shape::missing_handle),
        help("every clause needs at least one handle and some clause must carry a predicate")
    )]
    MissingHandle { role: String },

    #[error("Signature mismatch for {role}: expected {expected}, found {found}")]
    #[diagnostic(code(shape::signature_mismatch))]
    SignatureMismatch {
        role: String,
        expected: String,
        found: String,
    },

    #[error("Inconsistent return types for {context}: {expected} vs {found}")]
    #[diagnostic(
        code(shape::inconsistent_return),
        help("init, step and body handles of one loop variable must return the same kind")
    )]
    InconsistentReturnType {
        context: String,
        expected: Kind,
        found: Kind,
    },

    #[error("Leading parameters of {role} must be {expected}, found {found}")]
    #[diagnostic(code(shape::prefix_mismatch))]
    PrefixMismatch {
        role: String,
        expected: String,
        found: String,
    },

    #[error("External parameters of {role} must be a prefix of {expected}, found {found}")]
    #[diagnostic(
        code(shape::suffix_mismatch),
        help("handles may omit trailing external parameters but must agree on the rest")
    )]
    SuffixMismatch {
        role: String,
        expected: String,
        found: String,
    },

    #[error("Void loop body must take the int induction variable first, found {found}")]
    #[diagnostic(code(shape::void_body))]
    VoidBodyShape { found: String },

    #[error("Loop body has an invalid shape: {message}")]
    #[diagnostic(code(shape::body_arity))]
    ArityShape { message: String },

    #[error("Clause list is empty")]
    #[diagnostic(code(shape::empty_clauses))]
    EmptyClauses,

    #[error("{}", null_clause_message(.index))]
    #[diagnostic(code(shape::null_clause))]
    NullClause { index: Option<usize> },

    #[error("Position {position} is out of range for arity {arity}")]
    #[diagnostic(code(shape::position_out_of_range))]
    PositionOutOfRange { position: usize, arity: usize },

    #[error("Parameter {position} must be an array for {role}, found {found}")]
    #[diagnostic(code(shape::not_an_array))]
    NotAnArray {
        role: String,
        position: usize,
        found: Kind,
    },

    #[error("Combiner arguments may not include the fold position {position}")]
    #[diagnostic(
        code(shape::fold_selects_position),
        help("the fold position receives the combiner's result and cannot also feed it")
    )]
    FoldSelectsPosition { position: usize },

    #[error("Varargs requires a trailing array parameter, found {found}")]
    #[diagnostic(code(shape::not_varargs_capable))]
    NotVarargsCapable { found: String },

    #[error("Expected {expected} arguments for {role}, found {found}")]
    #[diagnostic(code(shape::count_mismatch))]
    CountMismatch {
        role: String,
        expected: usize,
        found: usize,
    },
}

fn null_clause_message(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!("Clause {index} is null"),
        None => "Clause list is null".to_string(),
    }
}
