// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // host configuration
pub mod errors;     // error handling
pub mod host;       // module loading, marshalling, invocation
pub mod observability;
pub mod suite;      // batch invocation suites
pub mod traits;     // execution engine seam
