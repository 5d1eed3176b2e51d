// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

/// Why a guest call was aborted.
///
/// A trap ends the current invocation only; the instance it ran on may still
/// serve later, independent invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapKind {
    OutOfBoundsMemoryAccess,
    IntegerDivisionByZero,
    IntegerOverflow,
    Unreachable,
    StackExhausted,
    /// The per-invocation instruction budget ran out.
    OutOfFuel,
    /// Float-to-integer conversion of NaN or an out-of-range value.
    InvalidConversion,
    /// Indirect call through a null entry or with the wrong signature.
    IndirectCallFault,
    TableOutOfBounds,
    /// Any other engine-reported trap, with its description.
    Other(String),
}

impl TrapKind {
    /// Stable snake_case identifier, as used in suite files.
    pub fn as_str(&self) -> &str {
        match self {
            TrapKind::OutOfBoundsMemoryAccess => "out_of_bounds_memory_access",
            TrapKind::IntegerDivisionByZero => "integer_division_by_zero",
            TrapKind::IntegerOverflow => "integer_overflow",
            TrapKind::Unreachable => "unreachable",
            TrapKind::StackExhausted => "stack_exhausted",
            TrapKind::OutOfFuel => "out_of_fuel",
            TrapKind::InvalidConversion => "invalid_conversion",
            TrapKind::IndirectCallFault => "indirect_call_fault",
            TrapKind::TableOutOfBounds => "table_out_of_bounds",
            TrapKind::Other(_) => "other",
        }
    }
}

impl fmt::Display for TrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrapKind::Other(description) => write!(f, "other ({})", description),
            kind => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for TrapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "out_of_bounds_memory_access" => TrapKind::OutOfBoundsMemoryAccess,
            "integer_division_by_zero" => TrapKind::IntegerDivisionByZero,
            "integer_overflow" => TrapKind::IntegerOverflow,
            "unreachable" => TrapKind::Unreachable,
            "stack_exhausted" => TrapKind::StackExhausted,
            "out_of_fuel" => TrapKind::OutOfFuel,
            "invalid_conversion" => TrapKind::InvalidConversion,
            "indirect_call_fault" => TrapKind::IndirectCallFault,
            "table_out_of_bounds" => TrapKind::TableOutOfBounds,
            other => return Err(format!("Unknown trap kind '{}'", other)),
        };
        Ok(kind)
    }
}
