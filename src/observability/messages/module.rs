// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for module loading, parsing and compilation events.

use std::fmt::{Display, Formatter};

/// Module bytes read successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::module::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     source: "math.wasm",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub source: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes)",
            self.source, self.size_bytes
        )
    }
}

/// Module loading, parsing or compilation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::module::ModuleLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = ModuleLoadFailed {
///     source: "missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleLoadFailed<'a> {
    pub source: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM module '{}': {}",
            self.source, self.error
        )
    }
}

/// Module descriptor parsed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct DescriptorParsed<'a> {
    pub source: &'a str,
    pub export_count: usize,
    pub import_count: usize,
}

impl Display for DescriptorParsed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Parsed descriptor for '{}': {} export(s), {} import(s)",
            self.source, self.export_count, self.import_count
        )
    }
}

/// Module compiled by the execution engine.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ModuleCompiled<'a> {
    pub source: &'a str,
    pub engine_export_count: usize,
}

impl Display for ModuleCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled WASM module '{}' ({} engine-reported export(s))",
            self.source, self.engine_export_count
        )
    }
}

/// Module declares imports that an empty import object cannot satisfy.
///
/// # Log Level
/// `warn!` - Instantiation will fail
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::module::UnsatisfiedImports;
///
/// let msg = UnsatisfiedImports {
///     source: "plugin.wasm",
///     import_count: 2,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct UnsatisfiedImports<'a> {
    pub source: &'a str,
    pub import_count: usize,
}

impl Display for UnsatisfiedImports<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' requires {} import(s); instantiation uses an empty import object",
            self.source, self.import_count
        )
    }
}

/// Execution engine created.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_invoker::observability::messages::module::EngineCreated;
///
/// let msg = EngineCreated {
///     fuel_level: 100_000_000,
///     max_memory_bytes: 64 * 1024 * 1024,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EngineCreated {
    pub fuel_level: u64,
    pub max_memory_bytes: usize,
}

impl Display for EngineCreated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created wasmtime engine with fuel_level={} max_memory_bytes={}",
            self.fuel_level, self.max_memory_bytes
        )
    }
}
