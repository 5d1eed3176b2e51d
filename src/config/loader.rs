// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_FUEL_LEVEL, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_MAX_MODULE_BYTES,
    DEFAULT_MAX_STACK_BYTES, MAX_FUEL_LEVEL, MAX_STACK_BYTES, MAX_SUITE_CONCURRENCY,
    MIN_FUEL_LEVEL, MIN_STACK_BYTES,
};
use crate::errors::{HostError, HostResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level host configuration.
///
/// Every section is optional; an empty file (or no file at all) yields the
/// built-in defaults.
///
/// # Example
/// ```yaml
/// engine:
///   fuel:
///     default: 100000000
///     maximum: 500000000
///   max_memory_bytes: 67108864
///   max_module_bytes: 16777216
/// suite:
///   max_concurrency: 4
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub suite: SuiteOptions,
}

/// Sandbox limits applied to every instance.
///
/// # Fields
/// * `fuel` - Instruction budget per invocation
/// * `max_memory_bytes` - Cap on linear memory growth per instance
/// * `max_module_bytes` - Largest module binary the host will load
/// * `max_stack_bytes` - Native stack available to guest code
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
    pub max_memory_bytes: Option<usize>,
    pub max_module_bytes: Option<usize>,
    pub max_stack_bytes: Option<usize>,
}

impl EngineConfig {
    /// Fuel granted to each invocation: the configured default, clamped.
    pub fn fuel_per_invocation(&self) -> u64 {
        self.fuel.validate_and_clamp(self.fuel.get_default())
    }

    pub fn get_max_memory_bytes(&self) -> usize {
        self.max_memory_bytes.unwrap_or(DEFAULT_MAX_MEMORY_BYTES)
    }

    pub fn get_max_module_bytes(&self) -> usize {
        self.max_module_bytes.unwrap_or(DEFAULT_MAX_MODULE_BYTES)
    }

    /// Configured guest stack, kept within `[MIN_STACK_BYTES, MAX_STACK_BYTES]`.
    pub fn get_max_stack_bytes(&self) -> usize {
        self.max_stack_bytes
            .unwrap_or(DEFAULT_MAX_STACK_BYTES)
            .clamp(MIN_STACK_BYTES, MAX_STACK_BYTES)
    }

    /// Problems that make these limits unusable; empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.fuel.get_minimum() > self.fuel.get_maximum() {
            problems.push(format!(
                "fuel minimum {} exceeds fuel maximum {}",
                self.fuel.get_minimum(),
                self.fuel.get_maximum()
            ));
        }
        if self.get_max_memory_bytes() == 0 {
            problems.push("max_memory_bytes must be greater than zero".to_string());
        }
        if self.get_max_module_bytes() == 0 {
            problems.push("max_module_bytes must be greater than zero".to_string());
        }
        if let Some(stack) = self.max_stack_bytes {
            if stack > MAX_STACK_BYTES {
                problems.push(format!(
                    "max_stack_bytes {} exceeds the limit of {}",
                    stack, MAX_STACK_BYTES
                ));
            }
        }
        problems
    }

    /// Fails with `HostError::Config` listing every problem.
    pub fn validate(&self) -> HostResult<()> {
        config_result(self.problems())
    }
}

/// Fuel consumption configuration.
///
/// Fuel limits prevent infinite loops by bounding the number of instructions
/// a single invocation may execute. When fuel runs out the call traps with
/// `out_of_fuel`.
///
/// # Example
/// ```yaml
/// fuel:
///   default: 100000000   # 100 million instructions
///   minimum: 1000000     # 1 million instructions
///   maximum: 500000000   # 500 million instructions (hard limit)
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the default fuel level, using built-in default if not configured.
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    /// Get the minimum fuel level, using built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamp a fuel level to the configured bounds.
    ///
    /// # Example
    /// ```
    /// use wasm_invoker::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// let fuel = config.validate_and_clamp(1_000_000_000); // Too high
    /// assert_eq!(fuel, 500_000_000); // Clamped to maximum
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        let min = self.get_minimum();
        let max = self.get_maximum();

        if requested < min || requested > max {
            tracing::warn!(
                "Requested fuel level {} is outside [{}, {}], clamping",
                requested,
                min,
                max
            );
        }
        // Inverted bounds resolve to the maximum.
        requested.max(min).min(max)
    }
}

/// Options for batch suite execution.
#[derive(Debug, Default, Deserialize)]
pub struct SuiteOptions {
    pub max_concurrency: Option<usize>,
}

impl SuiteOptions {
    /// Configured concurrency, defaulting to the number of available cores.
    ///
    /// Always within `[1, MAX_SUITE_CONCURRENCY]`.
    pub fn get_max_concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .clamp(1, MAX_SUITE_CONCURRENCY)
    }
}

/// Load a host config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> HostResult<HostConfig> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HostConfig::default());
    }
    let cfg: HostConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a host config and check that its bounds are consistent
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> HostResult<HostConfig> {
    let cfg = load_config(path)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Reject configurations whose limits contradict each other.
pub fn validate_config(cfg: &HostConfig) -> HostResult<()> {
    let mut problems = cfg.engine.problems();

    match cfg.suite.max_concurrency {
        Some(0) => problems.push("suite max_concurrency must be at least 1".to_string()),
        Some(n) if n > MAX_SUITE_CONCURRENCY => problems.push(format!(
            "suite max_concurrency {} exceeds the limit of {}",
            n, MAX_SUITE_CONCURRENCY
        )),
        _ => {}
    }

    config_result(problems)
}

fn config_result(problems: Vec<String>) -> HostResult<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(HostError::Config(format!(
            "Configuration validation failed:\n{}",
            problems.join("\n")
        )))
    }
}
