// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! All diagnostic and operational log lines are built from the message types
//! in [`messages`] and emitted through `tracing`. The binary installs a
//! `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! # Usage
//!
//! ```rust
//! use wasm_invoker::observability::messages::module::ModuleLoadFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ModuleLoadFailed {
//!     source: "math.wasm",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
