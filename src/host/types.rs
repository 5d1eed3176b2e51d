// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine-independent descriptions of module types.

use std::fmt;

/// A WebAssembly value type.
///
/// Only the four numeric types can cross the host boundary; `V128` and `Ref`
/// are recognised so that signatures can be described faithfully, but any
/// parameter or result of those types is rejected by the marshaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
    V128,
    Ref,
}

impl ValueType {
    /// Returns true for the four types that have a host numeric representation.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::I32 | Self::I64 | Self::F32 | Self::F64)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
            ValueType::Ref => "ref",
        };
        f.write_str(name)
    }
}

impl From<wasmparser::ValType> for ValueType {
    fn from(ty: wasmparser::ValType) -> Self {
        match ty {
            wasmparser::ValType::I32 => ValueType::I32,
            wasmparser::ValType::I64 => ValueType::I64,
            wasmparser::ValType::F32 => ValueType::F32,
            wasmparser::ValType::F64 => ValueType::F64,
            wasmparser::ValType::V128 => ValueType::V128,
            wasmparser::ValType::Ref(_) => ValueType::Ref,
        }
    }
}

/// What kind of item an export (or import) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Function,
    Memory,
    Global,
    Table,
    Tag,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportKind::Function => "function",
            ExportKind::Memory => "memory",
            ExportKind::Global => "global",
            ExportKind::Table => "table",
            ExportKind::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// Parameter and result types of a function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionSignature {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl FunctionSignature {
    pub fn new(params: Vec<ValueType>, results: Vec<ValueType>) -> Self {
        Self { params, results }
    }
}

impl From<&wasmparser::FuncType> for FunctionSignature {
    fn from(ty: &wasmparser::FuncType) -> Self {
        Self {
            params: ty.params().iter().copied().map(ValueType::from).collect(),
            results: ty.results().iter().copied().map(ValueType::from).collect(),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[ValueType]| {
            types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}

/// Initial and maximum size of a memory (in pages) or table (in elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub initial: u64,
    pub maximum: Option<u64>,
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.maximum {
            Some(max) => write!(f, "{}..{}", self.initial, max),
            None => write!(f, "{}..", self.initial),
        }
    }
}

/// Type of a global: its value type and mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSignature {
    pub content: ValueType,
    pub mutable: bool,
}

/// Full type of an exported item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportType {
    Function(FunctionSignature),
    Memory(Limits),
    Global(GlobalSignature),
    Table(Limits),
    Tag,
}

impl ExportType {
    pub fn kind(&self) -> ExportKind {
        match self {
            ExportType::Function(_) => ExportKind::Function,
            ExportType::Memory(_) => ExportKind::Memory,
            ExportType::Global(_) => ExportKind::Global,
            ExportType::Table(_) => ExportKind::Table,
            ExportType::Tag => ExportKind::Tag,
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportType::Function(sig) => write!(f, "function {}", sig),
            ExportType::Memory(limits) => write!(f, "memory {} pages", limits),
            ExportType::Global(global) if global.mutable => {
                write!(f, "global mut {}", global.content)
            }
            ExportType::Global(global) => write!(f, "global {}", global.content),
            ExportType::Table(limits) => write!(f, "table {} elements", limits),
            ExportType::Tag => f.write_str("tag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_types() {
        assert!(ValueType::I32.is_numeric());
        assert!(ValueType::F64.is_numeric());
        assert!(!ValueType::V128.is_numeric());
        assert!(!ValueType::Ref.is_numeric());
    }

    #[test]
    fn test_signature_display() {
        let sig = FunctionSignature::new(
            vec![ValueType::I32, ValueType::I64],
            vec![ValueType::F32],
        );
        assert_eq!(sig.to_string(), "(i32, i64) -> (f32)");
        assert_eq!(FunctionSignature::default().to_string(), "() -> ()");
    }

    #[test]
    fn test_export_type_kind() {
        let limits = Limits {
            initial: 1,
            maximum: Some(2),
        };
        assert_eq!(ExportType::Memory(limits).kind(), ExportKind::Memory);
        assert_eq!(ExportType::Table(limits).kind(), ExportKind::Table);
        assert_eq!(
            ExportType::Function(FunctionSignature::default()).kind(),
            ExportKind::Function
        );
        assert_eq!(ExportType::Memory(limits).to_string(), "memory 1..2 pages");
    }
}
