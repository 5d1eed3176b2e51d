// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The embeddable host: one engine, any number of loaded modules.
//!
//! ```no_run
//! use wasm_invoker::config::EngineConfig;
//! use wasm_invoker::host::{InvocationRequest, WasmHost};
//!
//! let host = WasmHost::from_config(&EngineConfig::default())?;
//! let module = host.load_file("math.wasm")?;
//! let result = host.call_once(&module, &InvocationRequest::new("add", ["2", "3"]));
//! println!("{:?}", result);
//! # Ok::<(), wasm_invoker::errors::HostError>(())
//! ```

use crate::config::EngineConfig;
use crate::errors::{HostError, HostResult};
use crate::host::descriptor::ModuleDescriptor;
use crate::host::engine::WasmtimeEngine;
use crate::host::loader::load_module_bytes;
use crate::host::pipeline::{self, InvocationRequest, InvocationResult, Stage};
use crate::observability::messages::module::{
    DescriptorParsed, ModuleCompiled, ModuleLoadFailed, UnsatisfiedImports,
};
use crate::traits::engine::{EngineFault, ExecutionEngine};
use std::path::Path;
use std::sync::Arc;

/// A module that has been parsed and compiled, ready to instantiate.
///
/// Immutable; clone it freely to share between threads.
pub struct LoadedModule<E: ExecutionEngine> {
    source: Arc<str>,
    descriptor: Arc<ModuleDescriptor>,
    module: E::Module,
}

impl<E: ExecutionEngine> Clone for LoadedModule<E> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            descriptor: Arc::clone(&self.descriptor),
            module: self.module.clone(),
        }
    }
}

impl<E: ExecutionEngine> LoadedModule<E> {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn compiled(&self) -> &E::Module {
        &self.module
    }
}

pub struct WasmHost<E: ExecutionEngine = WasmtimeEngine> {
    engine: Arc<E>,
    max_module_bytes: usize,
}

impl<E: ExecutionEngine> Clone for WasmHost<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            max_module_bytes: self.max_module_bytes,
        }
    }
}

impl WasmHost<WasmtimeEngine> {
    /// Creates a host backed by wasmtime with the given sandbox limits.
    pub fn from_config(config: &EngineConfig) -> HostResult<Self> {
        let engine = WasmtimeEngine::new(config)?;
        Ok(Self::with_engine(engine, config.get_max_module_bytes()))
    }
}

impl<E: ExecutionEngine> WasmHost<E> {
    pub fn with_engine(engine: E, max_module_bytes: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            max_module_bytes,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Reads, parses and compiles the module at `path`.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> HostResult<LoadedModule<E>> {
        let path = path.as_ref();
        let bytes = load_module_bytes(path, self.max_module_bytes)?;
        self.load_bytes(&path.display().to_string(), &bytes)
    }

    /// Parses and compiles an in-memory module binary.
    ///
    /// The descriptor is built first, so malformed input is reported as a
    /// `ParseError` before the engine sees it.
    pub fn load_bytes(&self, source: &str, bytes: &[u8]) -> HostResult<LoadedModule<E>> {
        self.try_load(source, bytes).map_err(|error| {
            tracing::error!(
                "{}",
                ModuleLoadFailed {
                    source,
                    error: &error,
                }
            );
            error
        })
    }

    fn try_load(&self, source: &str, bytes: &[u8]) -> HostResult<LoadedModule<E>> {
        if bytes.len() > self.max_module_bytes {
            return Err(HostError::ModuleTooLarge {
                size: bytes.len(),
                max: self.max_module_bytes,
            });
        }

        let descriptor = ModuleDescriptor::parse(bytes)?;
        tracing::debug!(
            "{}",
            DescriptorParsed {
                source,
                export_count: descriptor.exports().len(),
                import_count: descriptor.imports().len(),
            }
        );
        if !descriptor.imports().is_empty() {
            tracing::warn!(
                "{}",
                UnsatisfiedImports {
                    source,
                    import_count: descriptor.imports().len(),
                }
            );
        }

        let module = self.engine.compile(bytes)?;
        tracing::debug!(
            "{}",
            ModuleCompiled {
                source,
                engine_export_count: self.engine.list_exports(&module).len(),
            }
        );

        Ok(LoadedModule {
            source: Arc::from(source),
            descriptor: Arc::new(descriptor),
            module,
        })
    }

    /// Creates a fresh instance of `module`.
    pub fn instantiate(&self, module: &LoadedModule<E>) -> Result<E::Instance, EngineFault> {
        self.engine.instantiate(&module.module)
    }

    /// Runs one invocation on an existing instance.
    ///
    /// Guest state (memory, globals) persists across calls on the same
    /// instance, including after a trap.
    pub fn call(
        &self,
        module: &LoadedModule<E>,
        instance: &mut E::Instance,
        request: &InvocationRequest,
    ) -> InvocationResult {
        pipeline::run(&*self.engine, &module.descriptor, instance, request)
    }

    /// Runs one invocation on a fresh instance.
    ///
    /// A start function that traps yields `Trapped`; failing to instantiate
    /// yields `Failed` at the `Loaded` stage.
    pub fn call_once(
        &self,
        module: &LoadedModule<E>,
        request: &InvocationRequest,
    ) -> InvocationResult {
        match self.instantiate(module) {
            Ok(mut instance) => self.call(module, &mut instance, request),
            Err(EngineFault::Trap(kind)) => InvocationResult::Trapped(kind),
            Err(EngineFault::Error(error)) => InvocationResult::failed(Stage::Loaded, error),
        }
    }
}
