// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error type for every failing stage of loading and invoking a module.
//!
//! Guest traps are deliberately absent: a trap is a terminal *result* of an
//! invocation (`InvocationResult::Trapped`), not a host error.

use crate::errors::ParseError;
use crate::host::types::{ExportKind, ValueType};
use thiserror::Error;

/// Failures a caller can branch on.
///
/// `NotFound`, `KindMismatch`, `ArityMismatch` and `TypeMismatch` are caused
/// by caller input and are fatal only for the request that produced them.
/// The remaining variants describe the module, the engine or the environment.
#[derive(Error, Debug)]
pub enum HostError {
    /// Malformed module binary.
    #[error("Malformed module: {0}")]
    Parse(#[from] ParseError),

    /// Requested export is absent from the module.
    #[error("Export '{name}' does not exist in module")]
    NotFound { name: String },

    /// Export exists but is not callable.
    #[error("Export '{name}' is a {kind}, not a function")]
    KindMismatch { name: String, kind: ExportKind },

    /// Wrong number of arguments for the function's declared parameters.
    #[error("Expected {expected} argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Argument text is not a valid value of the declared parameter type.
    #[error("Argument {index} ('{raw}') is not a valid {expected}")]
    TypeMismatch {
        index: usize,
        expected: ValueType,
        raw: String,
    },

    /// The execution engine rejected the module during compilation.
    #[error("Module compilation failed: {0}")]
    Compile(String),

    /// The module could not be instantiated (unsatisfied imports, limits).
    #[error("Instantiation failed: {0}")]
    Instantiation(String),

    /// Engine creation, configuration or a non-trap call failure.
    #[error("Execution engine error: {0}")]
    Engine(String),

    /// The guest returned a value with no host numeric representation.
    #[error("Result of type {0} cannot be represented on the host")]
    UnsupportedResult(ValueType),

    /// File I/O error while reading a module, config or suite.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Module binary exceeds the configured size limit.
    #[error("Module too large: {size} bytes (max: {max} bytes)")]
    ModuleTooLarge { size: usize, max: usize },

    /// YAML deserialization failure.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Semantically invalid configuration or suite definition.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;
