// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod host;
mod parse;

pub use host::{HostError, HostResult};
pub use parse::ParseError;
