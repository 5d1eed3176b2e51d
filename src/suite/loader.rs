// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{HostError, HostResult};
use crate::host::trap::TrapKind;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Suite file as written on disk.
///
/// # Example
/// ```yaml
/// module: math.wasm
/// cases:
///   - function: add
///     args: [2, 3]
///     expect: [5]
///   - function: divide
///     args: ["7", "0"]
///     expect_trap: integer_division_by_zero
/// ```
#[derive(Debug, Deserialize)]
pub struct SuiteConfig {
    pub module: String,
    #[serde(default)]
    pub cases: Vec<CaseConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CaseConfig {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
    pub expect: Option<Vec<Value>>,
    pub expect_trap: Option<String>,
}

/// What a case must produce to pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Completes with exactly these values, given in textual form.
    Values(Vec<String>),
    /// Traps with this kind.
    Trap(TrapKind),
    /// Completes, whatever the results.
    Completes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteCase {
    pub function: String,
    pub args: Vec<String>,
    pub expectation: Expectation,
}

/// A validated suite, with the module path resolved against the suite file.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteDefinition {
    pub module: PathBuf,
    pub cases: Vec<SuiteCase>,
}

/// Load and validate a suite from a YAML file.
pub fn load_suite<P: AsRef<Path>>(path: P) -> HostResult<SuiteDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_suite(&content, base_dir)
}

/// Parse suite YAML; a relative `module` path is taken relative to `base_dir`.
pub fn parse_suite(content: &str, base_dir: &Path) -> HostResult<SuiteDefinition> {
    let cfg: SuiteConfig = serde_yaml::from_str(content)?;

    if cfg.cases.is_empty() {
        return Err(HostError::Config("Suite defines no cases".to_string()));
    }

    let cases = cfg
        .cases
        .into_iter()
        .enumerate()
        .map(|(index, case)| build_case(index, case))
        .collect::<HostResult<Vec<_>>>()?;

    Ok(SuiteDefinition {
        module: base_dir.join(cfg.module),
        cases,
    })
}

fn build_case(index: usize, case: CaseConfig) -> HostResult<SuiteCase> {
    let args = case
        .args
        .iter()
        .map(|v| scalar_text(index, v))
        .collect::<HostResult<Vec<_>>>()?;

    let expectation = match (case.expect, case.expect_trap) {
        (Some(_), Some(_)) => {
            return Err(HostError::Config(format!(
                "Case #{} ({}) sets both 'expect' and 'expect_trap'",
                index, case.function
            )))
        }
        (Some(values), None) => Expectation::Values(
            values
                .iter()
                .map(|v| scalar_text(index, v))
                .collect::<HostResult<Vec<_>>>()?,
        ),
        (None, Some(trap)) => Expectation::Trap(trap.parse::<TrapKind>().map_err(|e| {
            HostError::Config(format!("Case #{} ({}): {}", index, case.function, e))
        })?),
        (None, None) => Expectation::Completes,
    };

    Ok(SuiteCase {
        function: case.function,
        args,
        expectation,
    })
}

/// Textual form of a YAML scalar, so `3`, `"3"` and `-.inf` all work as values.
fn scalar_text(index: usize, value: &Value) -> HostResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_nan() => Ok("nan".to_string()),
            Some(f) if n.is_f64() && f.is_infinite() => {
                Ok(if f > 0.0 { "inf" } else { "-inf" }.to_string())
            }
            _ => Ok(n.to_string()),
        },
        other => Err(HostError::Config(format!(
            "Case #{}: values must be numbers or strings, got {:?}",
            index, other
        ))),
    }
}
