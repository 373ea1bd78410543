use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use codec::{CodecError, ElementKind, TypedArray, Value};
use notebook_rpc::{ClientConfig, ClientError, Kwargs, Notebook, Resolved};
use tracing::Level;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Codec(#[from] CodecError),
    #[error("invalid JSON value: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected `key=value`, got `{0}`")]
    InvalidAssignment(String),
    #[error("expected `kind:v1,v2,...`, got `{0}`")]
    InvalidArray(String),
}

#[derive(Parser, Debug)]
#[command(name = "notebook-cli", about = "Read variables from and call functions in a remote notebook")]
struct Cli {
    #[arg(long, env = "NOTEBOOK_HOST", default_value = notebook_rpc::DEFAULT_HOST)]
    host: String,

    #[arg(long, env = "NOTEBOOK_FILE")]
    notebook: String,

    #[arg(long, env = "NOTEBOOK_TIMEOUT_SECS", help = "Whole-request deadline; none by default")]
    timeout_secs: Option<u64>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value of a variable, optionally under substituted inputs.
    Eval(EvalArgs),
    /// Call a notebook function and print the full response.
    Call(CallArgs),
    /// Print a variable's value, or report that the name is a function.
    Resolve { name: String },
}

#[derive(Args, Debug)]
struct EvalArgs {
    name: String,

    #[arg(long = "input", value_name = "KEY=JSON")]
    inputs: Vec<String>,

    #[arg(long = "array", value_name = "KEY=KIND:V1,V2,...")]
    arrays: Vec<String>,
}

#[derive(Args, Debug)]
struct CallArgs {
    symbol: String,

    #[arg(long = "arg", value_name = "JSON")]
    args: Vec<String>,

    #[arg(long = "array-arg", value_name = "KIND:V1,V2,...")]
    array_args: Vec<String>,

    #[arg(long = "kwarg", value_name = "KEY=JSON")]
    kwargs: Vec<String>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = ClientConfig::default().with_host(cli.host);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let nb = Notebook::with_config(cli.notebook, config)?;

    match cli.command {
        Command::Eval(args) => run_eval(&nb, args),
        Command::Call(args) => run_call(&nb, args),
        Command::Resolve { name } => run_resolve(&nb, &name),
    }
}

fn run_eval(nb: &Notebook, args: EvalArgs) -> Result<(), CliError> {
    let inputs = collect_inputs(&args.inputs, &args.arrays)?;
    let value = if inputs.is_empty() {
        nb.get(&args.name)?
    } else {
        nb.with_inputs(inputs).get(&args.name)?
    };
    print_json(&value)
}

fn run_call(nb: &Notebook, args: CallArgs) -> Result<(), CliError> {
    let mut positional = args
        .args
        .iter()
        .map(|raw| parse_json_value(raw))
        .collect::<Result<Vec<_>, _>>()?;
    for raw in &args.array_args {
        positional.push(Value::TypedArray(parse_typed_array(raw)?));
    }
    let kwargs = collect_inputs(&args.kwargs, &[])?;

    let response = nb.function(&args.symbol).call(&positional, &kwargs)?;
    print_json(&response)
}

fn run_resolve(nb: &Notebook, name: &str) -> Result<(), CliError> {
    match nb.resolve(name)? {
        Resolved::Value(value) => print_json(&value),
        Resolved::Function(pending) => {
            eprintln!("`{}` is a function; use `call`", pending.symbol());
            Ok(())
        }
    }
}

fn collect_inputs(json_inputs: &[String], array_inputs: &[String]) -> Result<Kwargs, CliError> {
    let mut inputs = Kwargs::new();
    for raw in json_inputs {
        let (key, value) = split_assignment(raw)?;
        inputs.insert(key.to_owned(), parse_json_value(value)?);
    }
    for raw in array_inputs {
        let (key, value) = split_assignment(raw)?;
        inputs.insert(key.to_owned(), Value::TypedArray(parse_typed_array(value)?));
    }
    Ok(inputs)
}

fn split_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(CliError::InvalidAssignment(raw.to_owned())),
    }
}

fn parse_json_value(raw: &str) -> Result<Value, CliError> {
    let json = serde_json::from_str::<serde_json::Value>(raw)?;
    Ok(Value::from_json(&json))
}

/// `float64:1,1,2` -> `TypedArray::Float64([1.0, 1.0, 2.0])`
fn parse_typed_array(raw: &str) -> Result<TypedArray, CliError> {
    let (kind, list) = raw
        .split_once(':')
        .ok_or_else(|| CliError::InvalidArray(raw.to_owned()))?;
    let kind = kind.trim().parse::<ElementKind>()?;
    Ok(TypedArray::parse_list(kind, list)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(&value.to_json())?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
