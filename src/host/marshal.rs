// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Argument marshalling
//!
//! Converts raw textual arguments into values of the function's declared
//! parameter types, failing fast on arity or type errors:
//!
//! - `i32`/`i64`: base-10 signed integers with an optional sign; overflow and
//!   fractional text are rejected
//! - `f32`/`f64`: decimal or scientific notation, plus `inf`, `-inf` and
//!   `nan`; finite text too large for the type is rejected as overflow
//!
//! Surrounding whitespace is never trimmed.

use crate::errors::{HostError, HostResult};
use crate::host::resolver::ExportHandle;
use crate::host::types::ValueType;
use crate::host::values::TypedArgument;

/// Marshals `raw_args` against the parameters of `handle`.
///
/// # Errors
/// - `KindMismatch` if `handle` is not a function
/// - `ArityMismatch` if the argument count differs from the parameter count
/// - `TypeMismatch` for the first argument that does not parse
pub fn marshal<S: AsRef<str>>(
    handle: &ExportHandle<'_>,
    raw_args: &[S],
) -> HostResult<Vec<TypedArgument>> {
    let signature = handle.require_function()?;

    if raw_args.len() != signature.params.len() {
        return Err(HostError::ArityMismatch {
            expected: signature.params.len(),
            actual: raw_args.len(),
        });
    }

    signature
        .params
        .iter()
        .zip(raw_args)
        .enumerate()
        .map(|(index, (ty, raw))| {
            let raw = raw.as_ref();
            parse_value(raw, *ty).ok_or_else(|| HostError::TypeMismatch {
                index,
                expected: *ty,
                raw: raw.to_string(),
            })
        })
        .collect()
}

/// Parses `raw` as a value of type `ty` using its canonical textual form.
///
/// Returns `None` when the text is not a valid value of that type, and always
/// for `v128` and reference types.
pub fn parse_value(raw: &str, ty: ValueType) -> Option<TypedArgument> {
    match ty {
        ValueType::I32 => raw.parse::<i32>().ok().map(TypedArgument::I32),
        ValueType::I64 => raw.parse::<i64>().ok().map(TypedArgument::I64),
        ValueType::F32 => parse_float::<f32>(raw).map(TypedArgument::F32),
        ValueType::F64 => parse_float::<f64>(raw).map(TypedArgument::F64),
        ValueType::V128 | ValueType::Ref => None,
    }
}

trait Float: std::str::FromStr + Copy {
    fn is_infinite(self) -> bool;
}

impl Float for f32 {
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
}

impl Float for f64 {
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
}

fn parse_float<F: Float>(raw: &str) -> Option<F> {
    let value = raw.parse::<F>().ok()?;

    // Finite text that rounds to infinity overflowed the type.
    if value.is_infinite() && !raw.to_ascii_lowercase().contains("inf") {
        return None;
    }

    Some(value)
}
