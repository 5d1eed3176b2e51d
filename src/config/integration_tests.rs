// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration files driving a real host.

use super::*;
use crate::host::{HostValue, InvocationRequest, TrapKind, WasmHost};
use std::io::Write;
use tempfile::NamedTempFile;

const GROWER_WAT: &str = r#"
(module
  (memory 1)
  (func (export "grow") (param i32) (result i32)
    local.get 0
    memory.grow)
  (func (export "spin")
    (loop $forever
      br $forever))
)
"#;

fn host_from_yaml(yaml: &str) -> WasmHost {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();
    let config = load_and_validate_config(temp_file.path()).unwrap();
    WasmHost::from_config(&config.engine).unwrap()
}

#[test]
fn test_memory_limit_denies_growth() {
    // Two pages: the initial one plus room for one more.
    let host = host_from_yaml("engine:\n  max_memory_bytes: 131072\n");
    let module = host
        .load_bytes("grower", &wat::parse_str(GROWER_WAT).unwrap())
        .unwrap();
    let mut instance = host.instantiate(&module).unwrap();

    let grown = host.call(&module, &mut instance, &InvocationRequest::new("grow", ["1"]));
    assert_eq!(grown.values(), Some(&[HostValue::I32(1)][..]));

    let denied = host.call(&module, &mut instance, &InvocationRequest::new("grow", ["1"]));
    assert_eq!(denied.values(), Some(&[HostValue::I32(-1)][..]));
}

#[test]
fn test_requested_fuel_is_clamped() {
    let host = host_from_yaml("engine:\n  fuel:\n    default: 10\n");
    assert_eq!(host.engine().fuel_per_call(), consts::MIN_FUEL_LEVEL);

    let module = host
        .load_bytes("grower", &wat::parse_str(GROWER_WAT).unwrap())
        .unwrap();
    let result = host.call_once(&module, &InvocationRequest::new("spin", Vec::<String>::new()));
    assert_eq!(result.trap(), Some(&TrapKind::OutOfFuel));
}

#[test]
fn test_module_size_limit_applies_to_files() {
    let host = host_from_yaml("engine:\n  max_module_bytes: 8\n");
    let mut module_file = NamedTempFile::new().unwrap();
    module_file
        .write_all(&wat::parse_str(GROWER_WAT).unwrap())
        .unwrap();

    assert!(matches!(
        host.load_file(module_file.path()),
        Err(crate::errors::HostError::ModuleTooLarge { max: 8, .. })
    ));
}
