// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-invocation state machine.
//!
//! ```text
//! Loaded -> Resolved -> Marshalled -> Invoked -> { Completed | Trapped | Failed }
//! ```
//!
//! Every invocation enters at `Loaded` (the module descriptor exists) and
//! advances one stage at a time; a failure at any step ends it as `Failed`,
//! recording the last stage that was reached.

use crate::errors::HostError;
use crate::host::descriptor::ModuleDescriptor;
use crate::host::invoke::invoke;
use crate::host::marshal::marshal;
use crate::host::resolver::resolve;
use crate::host::trap::TrapKind;
use crate::host::values::HostValue;
use crate::observability::messages::invocation::{
    InvocationCompleted, InvocationFailed, InvocationStarted, InvocationTrapped, StageReached,
};
use crate::traits::engine::ExecutionEngine;
use std::fmt;

/// Stage of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Resolved,
    Marshalled,
    Invoked,
    Completed,
    Trapped,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Trapped | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::Resolved => "resolved",
            Stage::Marshalled => "marshalled",
            Stage::Invoked => "invoked",
            Stage::Completed => "completed",
            Stage::Trapped => "trapped",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A call by name with textual arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub function: String,
    pub raw_args: Vec<String>,
}

impl InvocationRequest {
    pub fn new<F, I, S>(function: F, raw_args: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            raw_args: raw_args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Terminal outcome of one invocation.
#[derive(Debug)]
pub enum InvocationResult {
    /// Results in declaration order.
    Completed(Vec<HostValue>),
    /// The guest trapped; the host and the instance's module are unaffected.
    Trapped(TrapKind),
    /// A host-side error; `stage` is the last stage reached before it.
    Failed { stage: Stage, error: HostError },
}

impl InvocationResult {
    pub(crate) fn failed(stage: Stage, error: HostError) -> Self {
        InvocationResult::Failed { stage, error }
    }

    /// The terminal stage this result represents.
    pub fn stage(&self) -> Stage {
        match self {
            InvocationResult::Completed(_) => Stage::Completed,
            InvocationResult::Trapped(_) => Stage::Trapped,
            InvocationResult::Failed { .. } => Stage::Failed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, InvocationResult::Completed(_))
    }

    pub fn values(&self) -> Option<&[HostValue]> {
        match self {
            InvocationResult::Completed(values) => Some(values),
            _ => None,
        }
    }

    pub fn trap(&self) -> Option<&TrapKind> {
        match self {
            InvocationResult::Trapped(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&HostError> {
        match self {
            InvocationResult::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

fn reached(function: &str, stage: Stage) {
    tracing::debug!("{}", StageReached { function, stage });
}

/// Drives `request` through resolve, marshal and invoke on `instance`.
pub fn run<E: ExecutionEngine>(
    engine: &E,
    descriptor: &ModuleDescriptor,
    instance: &mut E::Instance,
    request: &InvocationRequest,
) -> InvocationResult {
    let function = request.function.as_str();
    tracing::info!(
        "{}",
        InvocationStarted {
            function,
            arg_count: request.raw_args.len(),
        }
    );
    reached(function, Stage::Loaded);

    let result = advance(engine, descriptor, instance, request);

    match &result {
        InvocationResult::Completed(values) => tracing::info!(
            "{}",
            InvocationCompleted {
                function,
                result_count: values.len(),
            }
        ),
        InvocationResult::Trapped(trap) => {
            tracing::warn!("{}", InvocationTrapped { function, trap })
        }
        InvocationResult::Failed { stage, error } => tracing::error!(
            "{}",
            InvocationFailed {
                function,
                stage: *stage,
                error,
            }
        ),
    }
    reached(function, result.stage());

    result
}

fn advance<E: ExecutionEngine>(
    engine: &E,
    descriptor: &ModuleDescriptor,
    instance: &mut E::Instance,
    request: &InvocationRequest,
) -> InvocationResult {
    let function = request.function.as_str();

    let handle = match resolve(descriptor, function) {
        Ok(handle) => handle,
        Err(error) => return InvocationResult::failed(Stage::Loaded, error),
    };
    reached(function, Stage::Resolved);

    let args = match marshal(&handle, &request.raw_args) {
        Ok(args) => args,
        Err(error) => return InvocationResult::failed(Stage::Resolved, error),
    };
    reached(function, Stage::Marshalled);

    invoke(engine, instance, &handle, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::host::engine::WasmtimeEngine;
    use crate::host::test_modules::math_module;
    use crate::host::values::TypedArgument;

    fn setup() -> (WasmtimeEngine, ModuleDescriptor, wasmtime::Module) {
        let bytes = math_module();
        let engine = WasmtimeEngine::new(&EngineConfig::default()).unwrap();
        let descriptor = ModuleDescriptor::parse(&bytes).unwrap();
        let module = engine.compile(&bytes).unwrap();
        (engine, descriptor, module)
    }

    #[test]
    fn test_request_new() {
        let request = InvocationRequest::new("add", ["2", "3"]);
        assert_eq!(request.function, "add");
        assert_eq!(request.raw_args, vec!["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_completed() {
        let (engine, descriptor, module) = setup();
        let mut instance = engine.instantiate(&module).unwrap();

        let result = run(
            &engine,
            &descriptor,
            &mut instance,
            &InvocationRequest::new("add", ["2", "3"]),
        );
        assert_eq!(result.stage(), Stage::Completed);
        assert_eq!(result.values(), Some(&[TypedArgument::I32(5)][..]));
    }

    #[test]
    fn test_resolve_failure_stops_at_loaded() {
        let (engine, descriptor, module) = setup();
        let mut instance = engine.instantiate(&module).unwrap();

        let result = run(
            &engine,
            &descriptor,
            &mut instance,
            &InvocationRequest::new("doesNotExist", Vec::<String>::new()),
        );
        match result {
            InvocationResult::Failed {
                stage: Stage::Loaded,
                error: HostError::NotFound { name },
            } => assert_eq!(name, "doesNotExist"),
            other => panic!("Expected NotFound after Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_marshal_failure_stops_at_resolved() {
        let (engine, descriptor, module) = setup();
        let mut instance = engine.instantiate(&module).unwrap();

        let result = run(
            &engine,
            &descriptor,
            &mut instance,
            &InvocationRequest::new("add", ["2", "three"]),
        );
        match result {
            InvocationResult::Failed {
                stage: Stage::Resolved,
                error: HostError::TypeMismatch { index: 1, .. },
            } => {}
            other => panic!("Expected TypeMismatch after Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_trap_is_terminal() {
        let (engine, descriptor, module) = setup();
        let mut instance = engine.instantiate(&module).unwrap();

        let result = run(
            &engine,
            &descriptor,
            &mut instance,
            &InvocationRequest::new("divide", ["7", "0"]),
        );
        assert_eq!(result.trap(), Some(&TrapKind::IntegerDivisionByZero));
        assert!(result.stage().is_terminal());
        assert!(result.error().is_none());
    }
}
