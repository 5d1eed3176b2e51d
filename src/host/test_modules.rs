// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WAT fixtures shared by the host tests.

/// Arithmetic, identities and one function per trap kind we care about.
pub const MATH_WAT: &str = r#"
(module
  (memory (export "memory") 1 2)
  (global $counter (export "counter") (mut i32) (i32.const 0))
  (table (export "table") 1 funcref)

  (func (export "add") (param i32 i32) (result i32)
    local.get 0
    local.get 1
    i32.add)

  (func (export "divide") (param i32 i32) (result i32)
    local.get 0
    local.get 1
    i32.div_s)

  (func (export "identity") (param i32) (result i32)
    local.get 0)

  (func (export "identity_i64") (param i64) (result i64)
    local.get 0)

  (func (export "identity_f32") (param f32) (result f32)
    local.get 0)

  (func (export "identity_f64") (param f64) (result f64)
    local.get 0)

  (func (export "swap") (param i32 i64) (result i64 i32)
    local.get 1
    local.get 0)

  (func (export "nothing"))

  (func (export "bump") (result i32)
    global.get $counter
    i32.const 1
    i32.add
    global.set $counter
    global.get $counter)

  (func (export "boom")
    unreachable)

  (func (export "oob") (result i32)
    i32.const 200000
    i32.load)

  (func (export "spin")
    (loop $forever
      br $forever))

  (func $recurse (export "recurse") (result i32)
    call $recurse)

  (func (export "truncate") (param f64) (result i32)
    local.get 0
    i32.trunc_f64_s)

  (func (export "vector") (result v128)
    v128.const i32x4 0 0 0 0)
)
"#;

/// Imports come first in the function index space; `local` must still
/// resolve to its own signature.
pub const IMPORTING_WAT: &str = r#"
(module
  (import "env" "log" (func $log (param i32)))
  (import "env" "mem" (memory 1))
  (func (export "local") (param f64) (result f64)
    local.get 0)
  (export "log_again" (func $log))
)
"#;

pub fn math_module() -> Vec<u8> {
    wat::parse_str(MATH_WAT).unwrap()
}

pub fn importing_module() -> Vec<u8> {
    wat::parse_str(IMPORTING_WAT).unwrap()
}

/// One empty function exported twice under the name `a`.
/// Structurally valid, but not a valid module.
pub fn duplicate_export_module() -> Vec<u8> {
    vec![
        0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, // header
        0x01, 0x04, 0x01, 0x60, 0x00, 0x00, // type: () -> ()
        0x03, 0x02, 0x01, 0x00, // function: type 0
        0x07, 0x09, 0x02, // export section, 2 entries
        0x01, b'a', 0x00, 0x00, // "a" -> func 0
        0x01, b'a', 0x00, 0x00, // "a" -> func 0
        0x0a, 0x04, 0x01, 0x02, 0x00, 0x0b, // code: empty body
    ]
}
