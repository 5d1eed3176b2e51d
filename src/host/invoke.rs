// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Invocation engine: runs one marshalled call on an instance.

use crate::errors::HostError;
use crate::host::pipeline::{InvocationResult, Stage};
use crate::host::resolver::ExportHandle;
use crate::host::unmarshal::unmarshal;
use crate::host::values::TypedArgument;
use crate::observability::messages::invocation::StageReached;
use crate::traits::engine::{EngineFault, ExecutionEngine};

/// Calls the function behind `handle` with `args`.
///
/// The handle kind and the argument count and types are checked again here;
/// a mismatch fails without calling into the guest. Traps become
/// `InvocationResult::Trapped`, never an error.
pub fn invoke<E: ExecutionEngine>(
    engine: &E,
    instance: &mut E::Instance,
    handle: &ExportHandle<'_>,
    args: &[TypedArgument],
) -> InvocationResult {
    if let Err(error) = check_arguments(handle, args) {
        return InvocationResult::failed(Stage::Marshalled, error);
    }

    let raw_results = match engine.call_exported_function(instance, handle.name(), args) {
        Ok(raw) => raw,
        Err(EngineFault::Trap(kind)) => return InvocationResult::Trapped(kind),
        Err(EngineFault::Error(error)) => return InvocationResult::failed(Stage::Invoked, error),
    };
    tracing::debug!(
        "{}",
        StageReached {
            function: handle.name(),
            stage: Stage::Invoked,
        }
    );

    match unmarshal(&raw_results) {
        Ok(values) => InvocationResult::Completed(values),
        Err(error) => InvocationResult::failed(Stage::Invoked, error),
    }
}

fn check_arguments(handle: &ExportHandle<'_>, args: &[TypedArgument]) -> Result<(), HostError> {
    let signature = handle.require_function()?;

    if signature.params.len() != args.len() {
        return Err(HostError::ArityMismatch {
            expected: signature.params.len(),
            actual: args.len(),
        });
    }

    for (index, (expected, arg)) in signature.params.iter().zip(args).enumerate() {
        if arg.value_type() != *expected {
            return Err(HostError::TypeMismatch {
                index,
                expected: *expected,
                raw: arg.to_string(),
            });
        }
    }
    Ok(())
}
