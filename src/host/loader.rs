// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Module file loading
//!
//! Reads a module binary from disk and enforces the configured size limit.
//! It does not parse the binary; that is [`ModuleDescriptor::parse`]'s job.
//!
//! [`ModuleDescriptor::parse`]: crate::host::descriptor::ModuleDescriptor::parse

use crate::errors::{HostError, HostResult};
use crate::observability::messages::module::{ModuleLoadFailed, ModuleLoaded};
use std::path::Path;

/// Loads module bytes from `path`, rejecting files larger than `max_bytes`.
///
/// # Returns
/// * `Ok(Vec<u8>)` - The module binary
/// * `Err(HostError::Io)` - The file cannot be read
/// * `Err(HostError::ModuleTooLarge)` - The file exceeds `max_bytes`
pub fn load_module_bytes<P: AsRef<Path>>(path: P, max_bytes: usize) -> HostResult<Vec<u8>> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|e| {
        let error = HostError::Io(e);
        tracing::error!(
            "{}",
            ModuleLoadFailed {
                source: &source,
                error: &error,
            }
        );
        error
    })?;

    if bytes.len() > max_bytes {
        let error = HostError::ModuleTooLarge {
            size: bytes.len(),
            max: max_bytes,
        };
        tracing::error!(
            "{}",
            ModuleLoadFailed {
                source: &source,
                error: &error,
            }
        );
        return Err(error);
    }

    tracing::info!(
        "{}",
        ModuleLoaded {
            source: &source,
            size_bytes: bytes.len(),
        }
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LIMIT: usize = 1024;

    #[test]
    fn test_load_small_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let test_data = b"\0asm\x01\0\0\0";
        temp_file.write_all(test_data).unwrap();

        let result = load_module_bytes(temp_file.path(), LIMIT);
        assert_eq!(result.unwrap(), test_data);
    }

    #[test]
    fn test_file_too_large() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&vec![0u8; LIMIT + 1]).unwrap();

        match load_module_bytes(temp_file.path(), LIMIT) {
            Err(HostError::ModuleTooLarge { size, max }) => {
                assert_eq!(size, LIMIT + 1);
                assert_eq!(max, LIMIT);
            }
            other => panic!("Expected ModuleTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_max_size_boundary() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&vec![0u8; LIMIT]).unwrap();

        let result = load_module_bytes(temp_file.path(), LIMIT);
        assert_eq!(result.unwrap().len(), LIMIT);
    }

    #[test]
    fn test_nonexistent_file() {
        let result = load_module_bytes("/nonexistent/path/to/file.wasm", LIMIT);
        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
