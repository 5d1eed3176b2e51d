// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Result unmarshalling: engine values back into host numbers.

use crate::errors::{HostError, HostResult};
use crate::host::values::{HostValue, RawValue};

/// Converts raw engine results into host values, preserving order.
///
/// Multi-value results come back in declaration order. A `v128` or reference
/// result fails the whole conversion with `UnsupportedResult`.
pub fn unmarshal(raw_results: &[RawValue]) -> HostResult<Vec<HostValue>> {
    raw_results
        .iter()
        .map(|raw| match *raw {
            RawValue::I32(v) => Ok(HostValue::I32(v)),
            RawValue::I64(v) => Ok(HostValue::I64(v)),
            RawValue::F32(bits) => Ok(HostValue::F32(f32::from_bits(bits))),
            RawValue::F64(bits) => Ok(HostValue::F64(f64::from_bits(bits))),
            RawValue::Unsupported(ty) => Err(HostError::UnsupportedResult(ty)),
        })
        .collect()
}
