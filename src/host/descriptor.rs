// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Module descriptor parsing
//!
//! Turns a module binary into a [`ModuleDescriptor`]: the ordered export
//! table with each export's full type, the module's import requirements, and
//! its memory and table limits. Parsing is purely structural (via
//! `wasmparser`) and never executes guest code; semantic validation is left to
//! the execution engine's compiler.
//!
//! Index spaces follow the binary format: imported functions, memories,
//! tables and globals come first, followed by the module's own definitions.

use crate::errors::ParseError;
use crate::host::types::{
    ExportKind, ExportType, FunctionSignature, GlobalSignature, Limits, ValueType,
};
use std::collections::HashSet;
use wasmparser::{ExternalKind, Parser, Payload, TypeRef};

const WASM_MAGIC: &[u8; 4] = b"\0asm";
const SUPPORTED_VERSION: u32 = 1;

/// One entry of the export table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    /// Index into the export kind's index space.
    pub index: u32,
    pub ty: ExportType,
}

impl ExportEntry {
    #[inline]
    pub fn kind(&self) -> ExportKind {
        self.ty.kind()
    }
}

/// Something the module expects the host to provide at instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequirement {
    pub module: String,
    pub name: String,
    pub kind: ExportKind,
}

/// Immutable, parsed view of a module binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    exports: Vec<ExportEntry>,
    imports: Vec<ImportRequirement>,
    memories: Vec<Limits>,
    tables: Vec<Limits>,
}

impl ModuleDescriptor {
    /// Parses `bytes` into a descriptor.
    ///
    /// # Errors
    /// - [`ParseError::MalformedHeader`] for a short input or bad magic
    /// - [`ParseError::UnsupportedVersion`] for any version but 1
    /// - [`ParseError::TruncatedSection`] when the input ends early
    /// - [`ParseError::DuplicateExport`] when two exports share a name
    /// - [`ParseError::Malformed`] for any other structural defect
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        check_header(bytes)?;

        let mut spaces = IndexSpaces::default();
        let mut imports = Vec::new();
        let mut raw_exports = Vec::new();

        for payload in Parser::new(0).parse_all(bytes) {
            match payload? {
                Payload::TypeSection(reader) => {
                    for func_type in reader.into_iter_err_on_gc_types() {
                        spaces.types.push(FunctionSignature::from(&func_type?));
                    }
                }
                Payload::ImportSection(reader) => {
                    for import in reader {
                        let import = import?;
                        let kind = spaces.declare_import(import.ty);
                        imports.push(ImportRequirement {
                            module: import.module.to_string(),
                            name: import.name.to_string(),
                            kind,
                        });
                    }
                }
                Payload::FunctionSection(reader) => {
                    for type_index in reader {
                        spaces.functions.push(type_index?);
                    }
                }
                Payload::TableSection(reader) => {
                    for table in reader {
                        let table = table?;
                        spaces.tables.push(Limits {
                            initial: table.ty.initial.into(),
                            maximum: table.ty.maximum.map(Into::into),
                        });
                    }
                }
                Payload::MemorySection(reader) => {
                    for memory in reader {
                        let memory = memory?;
                        spaces.memories.push(Limits {
                            initial: memory.initial.into(),
                            maximum: memory.maximum.map(Into::into),
                        });
                    }
                }
                Payload::GlobalSection(reader) => {
                    for global in reader {
                        let global = global?;
                        spaces.globals.push(GlobalSignature {
                            content: ValueType::from(global.ty.content_type),
                            mutable: global.ty.mutable,
                        });
                    }
                }
                Payload::ExportSection(reader) => {
                    let offset = reader.range().start;
                    for export in reader {
                        let export = export?;
                        raw_exports.push((
                            export.name.to_string(),
                            export.kind,
                            export.index,
                            offset,
                        ));
                    }
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        let mut exports = Vec::with_capacity(raw_exports.len());
        for (name, kind, index, offset) in raw_exports {
            if !seen.insert(name.clone()) {
                return Err(ParseError::DuplicateExport(name));
            }
            let ty = spaces.export_type(kind, index, offset)?;
            exports.push(ExportEntry { name, index, ty });
        }

        Ok(Self {
            exports,
            imports,
            memories: spaces.memories,
            tables: spaces.tables,
        })
    }

    /// Exports in declaration order.
    pub fn exports(&self) -> &[ExportEntry] {
        &self.exports
    }

    pub fn imports(&self) -> &[ImportRequirement] {
        &self.imports
    }

    /// Memory limits, imported memories first.
    pub fn memories(&self) -> &[Limits] {
        &self.memories
    }

    /// Table limits, imported tables first.
    pub fn tables(&self) -> &[Limits] {
        &self.tables
    }

    pub fn function_exports(&self) -> impl Iterator<Item = &ExportEntry> {
        self.exports
            .iter()
            .filter(|export| export.kind() == ExportKind::Function)
    }
}

fn check_header(bytes: &[u8]) -> Result<(), ParseError> {
    if bytes.len() < 8 || &bytes[0..4] != WASM_MAGIC {
        return Err(ParseError::MalformedHeader);
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != SUPPORTED_VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }

    Ok(())
}

/// Per-kind index spaces accumulated while walking the sections.
#[derive(Default)]
struct IndexSpaces {
    types: Vec<FunctionSignature>,
    /// Type index of every function, imports first.
    functions: Vec<u32>,
    memories: Vec<Limits>,
    tables: Vec<Limits>,
    globals: Vec<GlobalSignature>,
}

impl IndexSpaces {
    fn declare_import(&mut self, ty: TypeRef) -> ExportKind {
        match ty {
            TypeRef::Func(type_index) => {
                self.functions.push(type_index);
                ExportKind::Function
            }
            TypeRef::Table(table) => {
                self.tables.push(Limits {
                    initial: table.initial.into(),
                    maximum: table.maximum.map(Into::into),
                });
                ExportKind::Table
            }
            TypeRef::Memory(memory) => {
                self.memories.push(Limits {
                    initial: memory.initial.into(),
                    maximum: memory.maximum.map(Into::into),
                });
                ExportKind::Memory
            }
            TypeRef::Global(global) => {
                self.globals.push(GlobalSignature {
                    content: ValueType::from(global.content_type),
                    mutable: global.mutable,
                });
                ExportKind::Global
            }
            TypeRef::Tag(_) => ExportKind::Tag,
        }
    }

    fn export_type(
        &self,
        kind: ExternalKind,
        index: u32,
        offset: usize,
    ) -> Result<ExportType, ParseError> {
        let out_of_range = |space: &str| ParseError::Malformed {
            message: format!("exported {} index {} out of range", space, index),
            offset,
        };
        let slot = index as usize;

        match kind {
            ExternalKind::Func => {
                let type_index = *self
                    .functions
                    .get(slot)
                    .ok_or_else(|| out_of_range("function"))?;
                let signature =
                    self.types
                        .get(type_index as usize)
                        .ok_or_else(|| ParseError::Malformed {
                            message: format!("function type index {} out of range", type_index),
                            offset,
                        })?;
                Ok(ExportType::Function(signature.clone()))
            }
            ExternalKind::Table => self
                .tables
                .get(slot)
                .map(|limits| ExportType::Table(*limits))
                .ok_or_else(|| out_of_range("table")),
            ExternalKind::Memory => self
                .memories
                .get(slot)
                .map(|limits| ExportType::Memory(*limits))
                .ok_or_else(|| out_of_range("memory")),
            ExternalKind::Global => self
                .globals
                .get(slot)
                .map(|global| ExportType::Global(*global))
                .ok_or_else(|| out_of_range("global")),
            ExternalKind::Tag => Ok(ExportType::Tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::test_modules::{duplicate_export_module, importing_module, math_module};

    #[test]
    fn test_export_table_in_declaration_order() {
        let descriptor = ModuleDescriptor::parse(&math_module()).unwrap();
        let names: Vec<_> = descriptor.exports().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(&names[..5], &["memory", "counter", "table", "add", "divide"]);
        assert_eq!(descriptor.exports()[0].kind(), ExportKind::Memory);
        assert_eq!(descriptor.exports()[1].kind(), ExportKind::Global);
        assert_eq!(descriptor.exports()[2].kind(), ExportKind::Table);
        assert!(descriptor.imports().is_empty());
    }

    #[test]
    fn test_function_signatures() {
        let descriptor = ModuleDescriptor::parse(&math_module()).unwrap();
        let swap = descriptor
            .exports()
            .iter()
            .find(|e| e.name == "swap")
            .unwrap();

        assert_eq!(
            swap.ty,
            ExportType::Function(FunctionSignature::new(
                vec![ValueType::I32, ValueType::I64],
                vec![ValueType::I64, ValueType::I32],
            ))
        );
    }

    #[test]
    fn test_memory_and_global_types() {
        let descriptor = ModuleDescriptor::parse(&math_module()).unwrap();

        assert_eq!(
            descriptor.memories(),
            &[Limits {
                initial: 1,
                maximum: Some(2)
            }]
        );
        assert_eq!(
            descriptor.exports()[1].ty,
            ExportType::Global(GlobalSignature {
                content: ValueType::I32,
                mutable: true
            })
        );
        assert_eq!(descriptor.tables().len(), 1);
    }

    #[test]
    fn test_imports_shift_function_index_space() {
        let descriptor = ModuleDescriptor::parse(&importing_module()).unwrap();

        assert_eq!(descriptor.imports().len(), 2);
        assert_eq!(descriptor.imports()[0].module, "env");
        assert_eq!(descriptor.imports()[0].kind, ExportKind::Function);
        assert_eq!(descriptor.imports()[1].kind, ExportKind::Memory);

        let local = &descriptor.exports()[0];
        assert_eq!(local.index, 1);
        assert_eq!(
            local.ty,
            ExportType::Function(FunctionSignature::new(
                vec![ValueType::F64],
                vec![ValueType::F64]
            ))
        );

        let reexported = &descriptor.exports()[1];
        assert_eq!(reexported.index, 0);
        assert_eq!(
            reexported.ty,
            ExportType::Function(FunctionSignature::new(vec![ValueType::I32], vec![]))
        );
    }

    #[test]
    fn test_function_exports_filter() {
        let descriptor = ModuleDescriptor::parse(&math_module()).unwrap();
        assert!(descriptor
            .function_exports()
            .all(|e| e.kind() == ExportKind::Function));
        assert_eq!(descriptor.function_exports().count(), descriptor.exports().len() - 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(ModuleDescriptor::parse(&[]), Err(ParseError::MalformedHeader));
    }

    #[test]
    fn test_bad_magic() {
        let bytes = b"\x00\x00\x00\x00\x01\x00\x00\x00";
        assert_eq!(ModuleDescriptor::parse(bytes), Err(ParseError::MalformedHeader));
    }

    #[test]
    fn test_unsupported_version() {
        let bytes = b"\x00asm\x02\x00\x00\x00";
        assert_eq!(
            ModuleDescriptor::parse(bytes),
            Err(ParseError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_component_binary_rejected_as_version() {
        let bytes = b"\x00asm\x0d\x00\x01\x00";
        assert!(matches!(
            ModuleDescriptor::parse(bytes),
            Err(ParseError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_header_only_module_is_empty() {
        let descriptor = ModuleDescriptor::parse(b"\x00asm\x01\x00\x00\x00").unwrap();
        assert!(descriptor.exports().is_empty());
        assert!(descriptor.memories().is_empty());
    }

    #[test]
    fn test_truncated_module() {
        let bytes = math_module();
        let truncated = &bytes[..bytes.len() - 3];

        assert!(matches!(
            ModuleDescriptor::parse(truncated),
            Err(ParseError::TruncatedSection { .. })
        ));
    }

    #[test]
    fn test_duplicate_export_rejected() {
        assert_eq!(
            ModuleDescriptor::parse(&duplicate_export_module()),
            Err(ParseError::DuplicateExport("a".to_string()))
        );
    }
}
