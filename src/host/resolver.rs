// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Export resolution by name.

use crate::errors::{HostError, HostResult};
use crate::host::descriptor::{ExportEntry, ModuleDescriptor};
use crate::host::types::{ExportKind, ExportType, FunctionSignature, ValueType};

/// A resolved export, borrowed from its [`ModuleDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct ExportHandle<'a> {
    export: &'a ExportEntry,
}

impl<'a> ExportHandle<'a> {
    pub fn name(&self) -> &'a str {
        &self.export.name
    }

    pub fn kind(&self) -> ExportKind {
        self.export.kind()
    }

    pub fn export_type(&self) -> &'a ExportType {
        &self.export.ty
    }

    /// The function signature, or `None` for non-function exports.
    pub fn signature(&self) -> Option<&'a FunctionSignature> {
        match &self.export.ty {
            ExportType::Function(signature) => Some(signature),
            _ => None,
        }
    }

    /// Declared parameter types; empty for non-function exports.
    pub fn param_types(&self) -> &'a [ValueType] {
        self.signature().map(|s| s.params.as_slice()).unwrap_or(&[])
    }

    /// Declared result types; empty for non-function exports.
    pub fn result_types(&self) -> &'a [ValueType] {
        self.signature().map(|s| s.results.as_slice()).unwrap_or(&[])
    }

    /// Fails with `KindMismatch` unless this export is a function.
    pub fn require_function(&self) -> HostResult<&'a FunctionSignature> {
        self.signature().ok_or_else(|| HostError::KindMismatch {
            name: self.export.name.clone(),
            kind: self.kind(),
        })
    }
}

/// Finds the export called `name`, whatever its kind.
///
/// Export names are unique (the descriptor parser rejects duplicates), so the
/// first exact match is the only one.
pub fn resolve<'a>(descriptor: &'a ModuleDescriptor, name: &str) -> HostResult<ExportHandle<'a>> {
    descriptor
        .exports()
        .iter()
        .find(|export| export.name == name)
        .map(|export| ExportHandle { export })
        .ok_or_else(|| HostError::NotFound {
            name: name.to_string(),
        })
}

/// Like [`resolve`], but additionally requires a function export.
pub fn resolve_function<'a>(
    descriptor: &'a ModuleDescriptor,
    name: &str,
) -> HostResult<ExportHandle<'a>> {
    let handle = resolve(descriptor, name)?;
    handle.require_function()?;
    Ok(handle)
}
