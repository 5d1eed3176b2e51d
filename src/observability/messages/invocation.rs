// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the per-invocation lifecycle.
//!
//! One invocation walks `Loaded -> Resolved -> Marshalled -> Invoked` and
//! ends `Completed`, `Trapped` or `Failed`; each of these has a message here.

use crate::host::pipeline::Stage;
use crate::host::trap::TrapKind;
use std::fmt::{Display, Formatter};

/// Invocation started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::invocation::InvocationStarted;
///
/// let msg = InvocationStarted {
///     function: "add",
///     arg_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct InvocationStarted<'a> {
    pub function: &'a str,
    pub arg_count: usize,
}

impl Display for InvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoking '{}' with {} argument(s)",
            self.function, self.arg_count
        )
    }
}

/// Invocation advanced to a new stage.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct StageReached<'a> {
    pub function: &'a str,
    pub stage: Stage,
}

impl Display for StageReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invocation of '{}' reached {}", self.function, self.stage)
    }
}

/// Invocation completed with results.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InvocationCompleted<'a> {
    pub function: &'a str,
    pub result_count: usize,
}

impl Display for InvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' completed with {} result(s)",
            self.function, self.result_count
        )
    }
}

/// Guest trapped during the call.
///
/// # Log Level
/// `warn!` - Guest fault, host unaffected
///
/// # Example
/// ```
/// use wasm_invoker::host::TrapKind;
/// use wasm_invoker::observability::messages::invocation::InvocationTrapped;
///
/// let msg = InvocationTrapped {
///     function: "divide",
///     trap: &TrapKind::IntegerDivisionByZero,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct InvocationTrapped<'a> {
    pub function: &'a str,
    pub trap: &'a TrapKind,
}

impl Display for InvocationTrapped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invocation of '{}' trapped: {}", self.function, self.trap)
    }
}

/// Invocation failed before or outside guest execution.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct InvocationFailed<'a> {
    pub function: &'a str,
    pub stage: Stage,
    pub error: &'a dyn std::error::Error,
}

impl Display for InvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' failed after {}: {}",
            self.function, self.stage, self.error
        )
    }
}
