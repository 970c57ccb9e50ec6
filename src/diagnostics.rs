use crate::{language::errors::DescriptorError, runtime::error::RuntimeError};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(descriptor::parse))]
pub struct SignatureDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
}

impl SignatureDiagnostic {
    pub fn from_error(source: &str, err: DescriptorError) -> Self {
        Self {
            src: NamedSource::new("signature", source.to_string()),
            span: err.to_source_span(),
            help: err.help.clone(),
            message: err.message,
        }
    }
}

pub fn emit_descriptor_error(source: &str, err: DescriptorError) {
    let diagnostic = SignatureDiagnostic::from_error(source, err);
    eprintln!("{:?}", Report::new(diagnostic));
}

pub fn report_runtime_error(error: &RuntimeError) {
    eprintln!("Runtime error [{}]: {}", error.code(), error);
}
