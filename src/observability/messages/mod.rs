// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` so log call sites stay free of
//! format strings:
//!
//! * `module` - loading, parsing and compiling module binaries
//! * `invocation` - the per-invocation stage lifecycle
//! * `suite` - batch suite execution
//!
//! # Usage Pattern
//!
//! ```rust
//! use wasm_invoker::observability::messages::invocation::InvocationStarted;
//!
//! let msg = InvocationStarted {
//!     function: "add",
//!     arg_count: 2,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod invocation;
pub mod module;
pub mod suite;
