use miette::IntoDiagnostic;
use prime_handles::{
    config::{self, InvokeOptions},
    demo, diagnostics,
    language::{descriptor::parse_signature, kind::Kind},
    runtime::{error::RuntimeResult, handle::Handle, value::Value},
};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: prime-handles sig <descriptor>
       prime-handles run [--exact|--loose] <name> [args...]";

fn main() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    match command.as_str() {
        "sig" => {
            let [source] = rest else {
                eprintln!("{USAGE}");
                return Ok(ExitCode::FAILURE);
            };
            match parse_signature(source) {
                Ok(signature) => {
                    println!("{signature}");
                    println!("{}", signature.descriptor());
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    diagnostics::emit_descriptor_error(source, err);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        "run" => run(rest),
        _ => {
            eprintln!("Invalid command.\n{USAGE}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(rest: &[String]) -> miette::Result<ExitCode> {
    let mut flag = None;
    let mut positional = Vec::new();
    for arg in rest {
        match arg.as_str() {
            "--exact" => flag = Some("exact".to_string()),
            "--loose" => flag = Some("loose".to_string()),
            _ => positional.push(arg.as_str()),
        }
    }
    let Some((name, inputs)) = positional.split_first() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let options = InvokeOptions::from_flag_or_env(flag);
    let registry = demo::registry()?;
    let handle = registry.lookup(name).into_diagnostic()?;
    let values = parse_arguments(&handle, inputs).into_diagnostic()?;
    match options.invoker().invoke(&handle, &values) {
        Ok(Value::Void) => Ok(ExitCode::SUCCESS),
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            diagnostics::report_runtime_error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parses each argument by the kind of the parameter it lands in. Arguments
/// past the fixed parameters of a varargs handle use the array's component.
fn parse_arguments(handle: &Handle, inputs: &[&str]) -> RuntimeResult<Vec<Value>> {
    let params = handle.params();
    let trailing: Option<Kind> = handle
        .is_varargs()
        .then(|| params.last().and_then(Kind::component))
        .flatten()
        .map(|component| component.kind());
    let collects = trailing.is_some() && inputs.len() != params.len();
    inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let kind = match trailing {
                Some(component) if collects && idx + 1 >= params.len() => component,
                _ => params.get(idx).copied().unwrap_or(Kind::Reference),
            };
            Value::parse_as(kind, input)
        })
        .collect()
}
