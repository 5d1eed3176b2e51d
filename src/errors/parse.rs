// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced while parsing a module binary into a descriptor.

use thiserror::Error;

/// Structural problems found in a module binary.
///
/// Parsing never executes guest code, so every variant describes the bytes
/// themselves rather than anything the module would do at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input shorter than the 8-byte preamble or missing the `\0asm` magic.
    #[error("missing or invalid WebAssembly magic header")]
    MalformedHeader,

    /// Binary version other than 1 (component-model binaries land here too).
    #[error("unsupported binary version {0:#x} (expected 0x1)")]
    UnsupportedVersion(u32),

    /// The module or one of its sections ends before its declared size.
    #[error("truncated section at offset {offset}")]
    TruncatedSection { offset: usize },

    /// Two exports share a name.
    #[error("duplicate export name '{0}'")]
    DuplicateExport(String),

    /// Any other structural error.
    #[error("{message} (at offset {offset})")]
    Malformed { message: String, offset: usize },
}

impl From<wasmparser::BinaryReaderError> for ParseError {
    fn from(error: wasmparser::BinaryReaderError) -> Self {
        let message = error.message().to_string();
        let offset = error.offset();

        if message.contains("unexpected end") {
            ParseError::TruncatedSection { offset }
        } else {
            ParseError::Malformed { message, offset }
        }
    }
}
