// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::host::types::ValueType;
use std::fmt;

/// A numeric value typed for the guest.
///
/// Produced by the argument marshaller and consumed by the invocation engine.
/// The same shape carries unmarshalled results back to the host (see
/// [`HostValue`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedArgument {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// A guest result converted into host numeric form.
pub type HostValue = TypedArgument;

impl TypedArgument {
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedArgument::I32(_) => ValueType::I32,
            TypedArgument::I64(_) => ValueType::I64,
            TypedArgument::F32(_) => ValueType::F32,
            TypedArgument::F64(_) => ValueType::F64,
        }
    }

    /// Value equality that treats two NaNs of the same type as equal.
    pub fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedArgument::F32(a), TypedArgument::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
            (TypedArgument::F64(a), TypedArgument::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

impl fmt::Display for TypedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedArgument::I32(v) => write!(f, "{}", v),
            TypedArgument::I64(v) => write!(f, "{}", v),
            TypedArgument::F32(v) => write!(f, "{}", v),
            TypedArgument::F64(v) => write!(f, "{}", v),
        }
    }
}

/// A result value as the execution engine hands it back.
///
/// Floats travel as their IEEE-754 bit patterns, the representation engines
/// use on the wire between host and guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    I32(i32),
    I64(i64),
    F32(u32),
    F64(u64),
    Unsupported(ValueType),
}
