// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The execution engine collaborator.
//!
//! The host never interprets or compiles WebAssembly itself. Everything below
//! the export table (validation, compilation, memory layout, execution) is
//! delegated to an implementation of [`ExecutionEngine`]; the host only issues
//! the four calls defined here.

use crate::errors::HostError;
use crate::host::trap::TrapKind;
use crate::host::types::ExportType;
use crate::host::values::{RawValue, TypedArgument};

/// An export as reported by the engine for a compiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineExport {
    pub name: String,
    pub ty: ExportType,
}

/// Why an engine call did not produce results.
#[derive(Debug)]
pub enum EngineFault {
    /// Guest-side fault; terminal for the call, not for the host.
    Trap(TrapKind),
    /// Host-side failure (instantiation, configuration, engine misuse).
    Error(HostError),
}

impl From<HostError> for EngineFault {
    fn from(error: HostError) -> Self {
        EngineFault::Error(error)
    }
}

/// A WebAssembly compilation and execution engine.
///
/// Compiled modules are shared read-only between invocations; instances hold
/// mutable guest state (linear memory, globals) and must be used by one
/// invocation at a time, which `&mut Self::Instance` enforces.
pub trait ExecutionEngine: Send + Sync {
    type Module: Clone + Send + Sync;
    type Instance: Send;

    /// Validates and compiles a module binary.
    fn compile(&self, bytes: &[u8]) -> Result<Self::Module, HostError>;

    /// Lists the compiled module's exports in declaration order.
    fn list_exports(&self, module: &Self::Module) -> Vec<EngineExport>;

    /// Instantiates the module with an empty import object.
    ///
    /// A trapping start function yields `EngineFault::Trap`.
    fn instantiate(&self, module: &Self::Module) -> Result<Self::Instance, EngineFault>;

    /// Calls the exported function `name` with already-typed arguments.
    fn call_exported_function(
        &self,
        instance: &mut Self::Instance,
        name: &str,
        args: &[TypedArgument],
    ) -> Result<Vec<RawValue>, EngineFault>;
}
