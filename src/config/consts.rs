// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default fuel level per invocation (100 million instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 100_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (500 million instructions) - security limit
pub const MAX_FUEL_LEVEL: u64 = 500_000_000;
/// Default cap on an instance's linear memory (64 MiB)
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 64 * 1024 * 1024;
/// Maximum accepted module binary size (16 MiB)
pub const DEFAULT_MAX_MODULE_BYTES: usize = 16 * 1024 * 1024;
/// Default native stack available to guest code (512 KiB)
pub const DEFAULT_MAX_STACK_BYTES: usize = 512 * 1024;
/// Smallest stack the engine may be configured with (64 KiB)
pub const MIN_STACK_BYTES: usize = 64 * 1024;
/// Largest stack the engine may be configured with (1 MiB); guests run on
/// blocking-pool threads with 2 MiB native stacks
pub const MAX_STACK_BYTES: usize = 1024 * 1024;
/// Upper bound on concurrently running suite cases
pub const MAX_SUITE_CONCURRENCY: usize = 1024;
