// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use std::env;
use std::process;
use wasm_invoker::config::{load_and_validate_config, HostConfig};
use wasm_invoker::host::{HostValue, InvocationRequest, InvocationResult, WasmHost};
use wasm_invoker::suite::SuiteRunner;

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Command {
    Invoke {
        module: String,
        function: String,
        args: Vec<String>,
    },
    Suite {
        path: String,
    },
    ListExports {
        module: String,
    },
}

#[derive(Debug, PartialEq)]
struct CliOptions {
    config: Option<String>,
    json: bool,
    command: Command,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} [--config host.yaml] [--json] <module.wasm> <function> [args...]",
        program
    );
    eprintln!("       {} [--config host.yaml] [--json] --suite <suite.yaml>", program);
    eprintln!("       {} --list-exports <module.wasm>", program);
    eprintln!("Example: {} math.wasm add 2 3", program);
    eprintln!("Example: {} --suite suites/math.yaml", program);
}

/// Parses everything after the program name.
///
/// Options are only recognised before the module path, so guest arguments
/// such as `-5` or `--json` pass through untouched.
fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config = None;
    let mut json = false;
    let mut rest = args;

    while let Some(first) = rest.first() {
        match first.as_str() {
            "--config" => {
                let path = rest.get(1).ok_or("--config requires a file path")?;
                config = Some(path.clone());
                rest = &rest[2..];
            }
            "--json" => {
                json = true;
                rest = &rest[1..];
            }
            "--suite" => {
                let path = rest.get(1).ok_or("--suite requires a file path")?;
                if rest.len() > 2 {
                    return Err(format!("Unexpected arguments after suite: {:?}", &rest[2..]));
                }
                return Ok(CliOptions {
                    config,
                    json,
                    command: Command::Suite { path: path.clone() },
                });
            }
            "--list-exports" => {
                let module = rest.get(1).ok_or("--list-exports requires a module path")?;
                return Ok(CliOptions {
                    config,
                    json,
                    command: Command::ListExports {
                        module: module.clone(),
                    },
                });
            }
            _ => break,
        }
    }

    match rest {
        [module, function, args @ ..] => Ok(CliOptions {
            config,
            json,
            command: Command::Invoke {
                module: module.clone(),
                function: function.clone(),
                args: args.to_vec(),
            },
        }),
        _ => Err("Expected a module path and a function name".to_string()),
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn json_value(value: &HostValue) -> serde_json::Value {
    match *value {
        HostValue::I32(v) => v.into(),
        HostValue::I64(v) => v.into(),
        HostValue::F32(v) => json_float(f64::from(v), value),
        HostValue::F64(v) => json_float(v, value),
    }
}

// JSON has no NaN or infinity; those fall back to their text form.
fn json_float(v: f64, value: &HostValue) -> serde_json::Value {
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(value.to_string()))
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("wasm-invoker");

    let options = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            print_usage(program);
            process::exit(1);
        }
    };

    init_logging();

    match run(options).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether everything that ran succeeded.
async fn run(options: CliOptions) -> anyhow::Result<bool> {
    let config = match &options.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => HostConfig::default(),
    };
    let host = WasmHost::from_config(&config.engine).context("Failed to create engine")?;

    match options.command {
        Command::Invoke {
            module,
            function,
            args,
        } => {
            let loaded = host
                .load_file(&module)
                .with_context(|| format!("Failed to load module '{}'", module))?;
            let result = host.call_once(&loaded, &InvocationRequest::new(function.as_str(), args));
            report_invocation(&function, result, options.json)
        }
        Command::Suite { path } => {
            let runner = SuiteRunner::new(host, config.suite.get_max_concurrency());
            let report = runner
                .run_file(&path)
                .await
                .with_context(|| format!("Failed to run suite '{}'", path))?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
            Ok(report.all_passed())
        }
        Command::ListExports { module } => {
            let loaded = host
                .load_file(&module)
                .with_context(|| format!("Failed to load module '{}'", module))?;
            let descriptor = loaded.descriptor();
            for export in descriptor.exports() {
                println!("{}: {}", export.name, export.ty);
            }
            for import in descriptor.imports() {
                println!("import {}.{}: {}", import.module, import.name, import.kind);
            }
            Ok(true)
        }
    }
}

fn report_invocation(function: &str, result: InvocationResult, json: bool) -> anyhow::Result<bool> {
    match result {
        InvocationResult::Completed(values) => {
            if json {
                let out: Vec<serde_json::Value> = values.iter().map(json_value).collect();
                println!("{}", serde_json::to_string(&out)?);
            } else {
                for value in &values {
                    println!("{}", value);
                }
            }
            Ok(true)
        }
        InvocationResult::Trapped(trap) => {
            if json {
                println!("{}", serde_json::json!({ "trap": trap.as_str() }));
            } else {
                eprintln!("Trap in '{}': {}", function, trap);
            }
            Ok(false)
        }
        InvocationResult::Failed { stage, error } => {
            bail!("Invocation of '{}' failed after {}: {}", function, stage, error)
        }
    }
}
