// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Loading, resolving, marshalling and invoking WebAssembly modules.
//!
//! The host never interprets guest code. It parses a module's export table
//! ([`descriptor`]), resolves exports by name ([`resolver`]), converts textual
//! arguments into typed values ([`marshal`]), delegates the call to an
//! [`ExecutionEngine`](crate::traits::ExecutionEngine) ([`invoke`]) and turns
//! raw engine results back into host numbers ([`unmarshal`]).
//!
//! [`pipeline`] ties those steps into the per-invocation state machine and
//! [`runtime::WasmHost`] is the embedding entry point.

pub mod descriptor;
pub mod engine;
pub mod invoke;
pub mod loader;
pub mod marshal;
pub mod pipeline;
pub mod resolver;
pub mod runtime;
pub mod trap;
pub mod types;
pub mod unmarshal;
pub mod values;

#[cfg(test)]
pub(crate) mod test_modules;

pub use descriptor::{ExportEntry, ImportRequirement, ModuleDescriptor};
pub use engine::{WasmtimeEngine, WasmtimeInstance};
pub use pipeline::{InvocationRequest, InvocationResult, Stage};
pub use resolver::{resolve, resolve_function, ExportHandle};
pub use runtime::{LoadedModule, WasmHost};
pub use trap::TrapKind;
pub use types::{ExportKind, ExportType, FunctionSignature, ValueType};
pub use values::{HostValue, RawValue, TypedArgument};
