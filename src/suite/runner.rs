// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concurrent suite execution.
//!
//! ## Concurrency Control
//! - Uses `tokio::sync::Semaphore` to bound the number of cases in flight
//! - Each case runs on the blocking pool with its own fresh instance
//! - The compiled module is shared read-only by every case
//!
//! Cases are independent: one trapping or failing never affects another.

use crate::config::consts::MAX_SUITE_CONCURRENCY;
use crate::errors::{HostError, HostResult};
use crate::host::marshal::parse_value;
use crate::host::pipeline::{InvocationRequest, InvocationResult};
use crate::host::runtime::{LoadedModule, WasmHost};
use crate::observability::messages::suite::{
    CaseFinished, CaseTaskFailed, SuiteFinished, SuiteStarted,
};
use crate::suite::loader::{load_suite, Expectation, SuiteCase};
use crate::traits::engine::ExecutionEngine;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub index: usize,
    pub function: String,
    pub passed: bool,
    /// What the case expected, in the suite's own terms.
    pub expected: String,
    /// What actually happened.
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub module: String,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            let verdict = if case.passed { "ok" } else { "FAIL" };
            write!(f, "[{}] #{} {}: {}", verdict, case.index, case.function, case.actual)?;
            if !case.passed {
                write!(f, " (expected {})", case.expected)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{}: {} passed, {} failed",
            self.module,
            self.passed(),
            self.failed()
        )
    }
}

pub struct SuiteRunner<E: ExecutionEngine> {
    host: WasmHost<E>,
    max_concurrency: usize,
}

impl<E> SuiteRunner<E>
where
    E: ExecutionEngine + 'static,
    E::Module: 'static,
{
    /// `max_concurrency` is kept within `[1, MAX_SUITE_CONCURRENCY]`.
    pub fn new(host: WasmHost<E>, max_concurrency: usize) -> Self {
        Self {
            host,
            max_concurrency: max_concurrency.clamp(1, MAX_SUITE_CONCURRENCY),
        }
    }

    /// Loads the suite at `path`, then the module it names, and runs it.
    pub async fn run_file<P: AsRef<Path>>(&self, path: P) -> HostResult<SuiteReport> {
        let suite = load_suite(path)?;
        let module = self.host.load_file(&suite.module)?;
        Ok(self.run(&module, suite.cases).await)
    }

    /// Runs every case against `module` and reports them in input order.
    pub async fn run(&self, module: &LoadedModule<E>, cases: Vec<SuiteCase>) -> SuiteReport {
        tracing::info!(
            "{}",
            SuiteStarted {
                module: module.source(),
                case_count: cases.len(),
                max_concurrency: self.max_concurrency,
            }
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = Vec::with_capacity(cases.len());

        for (index, case) in cases.into_iter().enumerate() {
            let host = self.host.clone();
            let module = module.clone();
            let semaphore = semaphore.clone();
            let function = case.function.clone();

            let task = tokio::spawn(async move {
                let permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| HostError::Engine(format!("Semaphore closed: {}", e)))?;

                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    let request =
                        InvocationRequest::new(case.function.as_str(), case.args.iter().cloned());
                    let result = host.call_once(&module, &request);
                    evaluate(index, &case, &result)
                })
                .await
                .map_err(|e| HostError::Engine(format!("Case task did not complete: {}", e)))
            });

            tasks.push((index, function, task));
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for (index, function, task) in tasks {
            let outcome = match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    Err(HostError::Engine(format!("Task join error: {}", join_error)))
                }
            };

            let report = match outcome {
                Ok(report) => report,
                Err(error) => {
                    tracing::error!("{}", CaseTaskFailed { index, error: &error });
                    CaseReport {
                        index,
                        function,
                        passed: false,
                        expected: "case to run".to_string(),
                        actual: error.to_string(),
                    }
                }
            };

            let finished = CaseFinished {
                index,
                function: &report.function,
                passed: report.passed,
            };
            if report.passed {
                tracing::debug!("{}", finished);
            } else {
                tracing::warn!("{}", finished);
            }
            reports.push(report);
        }

        let report = SuiteReport {
            module: module.source().to_string(),
            cases: reports,
        };
        tracing::info!(
            "{}",
            SuiteFinished {
                module: &report.module,
                passed: report.passed(),
                failed: report.failed(),
            }
        );
        report
    }
}

fn evaluate(index: usize, case: &SuiteCase, result: &InvocationResult) -> CaseReport {
    let passed = match (&case.expectation, result) {
        (Expectation::Values(expected), InvocationResult::Completed(actual)) => {
            expected.len() == actual.len()
                && expected.iter().zip(actual).all(|(raw, value)| {
                    parse_value(raw, value.value_type())
                        .map(|want| want.same_value(value))
                        .unwrap_or(false)
                })
        }
        (Expectation::Trap(expected), InvocationResult::Trapped(actual)) => expected == actual,
        (Expectation::Completes, InvocationResult::Completed(_)) => true,
        _ => false,
    };

    CaseReport {
        index,
        function: case.function.clone(),
        passed,
        expected: describe_expectation(&case.expectation),
        actual: describe_result(result),
    }
}

fn describe_expectation(expectation: &Expectation) -> String {
    match expectation {
        Expectation::Values(values) => format!("[{}]", values.join(", ")),
        Expectation::Trap(kind) => format!("trap {}", kind),
        Expectation::Completes => "completion".to_string(),
    }
}

/// One-line rendering of an invocation result.
pub fn describe_result(result: &InvocationResult) -> String {
    match result {
        InvocationResult::Completed(values) => format!(
            "[{}]",
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        InvocationResult::Trapped(kind) => format!("trap {}", kind),
        InvocationResult::Failed { stage, error } => {
            format!("failed after {}: {}", stage, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::host::test_modules::math_module;
    use crate::host::trap::TrapKind;
    use crate::host::values::HostValue;
    use crate::host::pipeline::Stage;
    use std::fs;

    const SUITE_YAML: &str = r#"
module: math.wasm
cases:
  - function: add
    args: [2, 3]
    expect: [5]
  - function: divide
    args: ["7", "0"]
    expect_trap: integer_division_by_zero
  - function: swap
    args: [1, 2]
    expect: [2, 1]
  - function: identity_f64
    args: [.nan]
    expect: [.nan]
  - function: add
    args: [1, 1]
    expect: [3]
  - function: boom
  - function: doesNotExist
    expect_trap: unreachable
"#;

    fn host() -> WasmHost {
        WasmHost::from_config(&EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_run_file_reports_each_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("math.wasm"), math_module()).unwrap();
        let suite_path = dir.path().join("suite.yaml");
        fs::write(&suite_path, SUITE_YAML).unwrap();

        let runner = SuiteRunner::new(host(), 2);
        let report = runner.run_file(&suite_path).await.unwrap();

        let verdicts: Vec<bool> = report.cases.iter().map(|c| c.passed).collect();
        assert_eq!(verdicts, vec![true, true, true, true, false, false, false]);
        assert_eq!(report.passed(), 4);
        assert_eq!(report.failed(), 3);
        assert!(!report.all_passed());

        let indices: Vec<usize> = report.cases.iter().map(|c| c.index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());

        assert_eq!(report.cases[4].actual, "[2]");
        assert_eq!(report.cases[4].expected, "[3]");
        assert_eq!(report.cases[5].actual, "trap unreachable");
        assert!(report.cases[6].actual.starts_with("failed after loaded"));
    }

    #[tokio::test]
    async fn test_run_file_missing_module() {
        let dir = tempfile::tempdir().unwrap();
        let suite_path = dir.path().join("suite.yaml");
        fs::write(&suite_path, SUITE_YAML).unwrap();

        let runner = SuiteRunner::new(host(), 1);
        assert!(matches!(
            runner.run_file(&suite_path).await,
            Err(HostError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_cases_get_fresh_instances() {
        let host = host();
        let module = host.load_bytes("math", &math_module()).unwrap();
        let cases = (0..4)
            .map(|_| SuiteCase {
                function: "bump".to_string(),
                args: Vec::new(),
                expectation: Expectation::Values(vec!["1".to_string()]),
            })
            .collect();

        let report = SuiteRunner::new(host, 4).run(&module, cases).await;
        assert!(report.all_passed());
        assert_eq!(report.module, "math");
    }

    #[tokio::test]
    async fn test_unbounded_concurrency_is_capped() {
        let host = host();
        let module = host.load_bytes("math", &math_module()).unwrap();
        let cases = vec![SuiteCase {
            function: "add".to_string(),
            args: vec!["2".to_string(), "3".to_string()],
            expectation: Expectation::Values(vec!["5".to_string()]),
        }];

        let runner = SuiteRunner::new(host, usize::MAX);
        assert_eq!(runner.max_concurrency, MAX_SUITE_CONCURRENCY);
        assert!(runner.run(&module, cases).await.all_passed());
    }

    #[test]
    fn test_describe_result() {
        assert_eq!(
            describe_result(&InvocationResult::Completed(vec![
                HostValue::I32(1),
                HostValue::F64(2.5)
            ])),
            "[1, 2.5]"
        );
        assert_eq!(
            describe_result(&InvocationResult::Trapped(TrapKind::OutOfFuel)),
            "trap out_of_fuel"
        );
        assert_eq!(
            describe_result(&InvocationResult::Failed {
                stage: Stage::Resolved,
                error: HostError::ArityMismatch {
                    expected: 1,
                    actual: 0
                },
            }),
            "failed after resolved: Expected 1 argument(s), got 0"
        );
    }

    #[test]
    fn test_report_display() {
        let report = SuiteReport {
            module: "math.wasm".to_string(),
            cases: vec![CaseReport {
                index: 0,
                function: "add".to_string(),
                passed: false,
                expected: "[3]".to_string(),
                actual: "[2]".to_string(),
            }],
        };
        assert_eq!(
            report.to_string(),
            "[FAIL] #0 add: [2] (expected [3])\nmath.wasm: 0 passed, 1 failed"
        );
    }
}
