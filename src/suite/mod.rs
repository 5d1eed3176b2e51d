// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Batch invocation suites: many independent calls against one module, each
//! checked against an expected result or trap.

mod loader;
mod runner;

pub use loader::{
    load_suite, parse_suite, CaseConfig, Expectation, SuiteCase, SuiteConfig, SuiteDefinition,
};
pub use runner::{describe_result, CaseReport, SuiteReport, SuiteRunner};
