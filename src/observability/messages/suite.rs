// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for batch suite execution.

use std::fmt::{Display, Formatter};

/// Suite execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::suite::SuiteStarted;
///
/// let msg = SuiteStarted {
///     module: "math.wasm",
///     case_count: 12,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct SuiteStarted<'a> {
    pub module: &'a str,
    pub case_count: usize,
    pub max_concurrency: usize,
}

impl Display for SuiteStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running {} case(s) against '{}' (max_concurrency={})",
            self.case_count, self.module, self.max_concurrency
        )
    }
}

/// A single case finished.
///
/// # Log Level
/// `debug!` on pass, `warn!` on failure
pub struct CaseFinished<'a> {
    pub index: usize,
    pub function: &'a str,
    pub passed: bool,
}

impl Display for CaseFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let verdict = if self.passed { "passed" } else { "FAILED" };
        write!(f, "Case #{} ({}) {}", self.index, self.function, verdict)
    }
}

/// A case task did not run to completion.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct CaseTaskFailed<'a> {
    pub index: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for CaseTaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Case #{} task failed: {}", self.index, self.error)
    }
}

/// Suite execution finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SuiteFinished<'a> {
    pub module: &'a str,
    pub passed: usize,
    pub failed: usize,
}

impl Display for SuiteFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Suite for '{}' finished: {} passed, {} failed",
            self.module, self.passed, self.failed
        )
    }
}
