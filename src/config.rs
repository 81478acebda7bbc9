//! Harness configuration.
//!
//! Everything has a default reproducing the classic run (N = 1000, A = B = 1,
//! report-only exit code). Each field can be overridden through a `MATCHECK_*`
//! environment variable.

use std::str::FromStr;

use log::LevelFilter;

use crate::error::{config_error, Result};
use crate::harness::TestCase;

pub const DEFAULT_SIZE: usize = 1000;

pub const ENV_SIZE: &str = "MATCHECK_SIZE";
pub const ENV_FILL_A: &str = "MATCHECK_FILL_A";
pub const ENV_FILL_B: &str = "MATCHECK_FILL_B";
pub const ENV_SEED: &str = "MATCHECK_SEED";
pub const ENV_STRICT: &str = "MATCHECK_STRICT";
pub const ENV_ABORT: &str = "MATCHECK_ABORT";
pub const ENV_COLOR: &str = "MATCHECK_COLOR";
pub const ENV_LOG: &str = "MATCHECK_LOG";

/// What a suite does after a failed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Run every case (in parallel) and report all outcomes.
    #[default]
    Continue,
    /// Run cases in order and stop at the first failure or error.
    Abort,
}

/// How the process exit code reflects the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Mismatches are only reported; the exit code is 0 unless a case errored.
    #[default]
    Lenient,
    /// Any failed comparison also yields a non-zero exit code.
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Side length N of every square buffer.
    pub size: usize,
    pub fill_a: u8,
    pub fill_b: u8,
    /// When set, a random-input case seeded with this value is added.
    pub seed: Option<u64>,
    pub mismatch: MismatchPolicy,
    pub exit: ExitPolicy,
    /// Colour report lines with ANSI escapes.
    pub color: bool,
    pub log_level: LevelFilter,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            size: DEFAULT_SIZE,
            fill_a: 1,
            fill_b: 1,
            seed: None,
            mismatch: MismatchPolicy::default(),
            exit: ExitPolicy::default(),
            color: true,
            log_level: LevelFilter::Info,
        }
    }
}

impl HarnessConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its
    /// value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HarnessConfig::default();

        if let Some(raw) = lookup(ENV_SIZE) {
            let size: usize = parse(ENV_SIZE, &raw, "expected a positive integer")?;
            if size == 0 {
                return Err(config_error(ENV_SIZE, raw, "size must be greater than zero"));
            }
            config.size = size;
        }
        if let Some(raw) = lookup(ENV_FILL_A) {
            config.fill_a = parse(ENV_FILL_A, &raw, "expected an integer in 0..=255")?;
        }
        if let Some(raw) = lookup(ENV_FILL_B) {
            config.fill_b = parse(ENV_FILL_B, &raw, "expected an integer in 0..=255")?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(parse(ENV_SEED, &raw, "expected an unsigned 64-bit integer")?);
        }
        if let Some(raw) = lookup(ENV_STRICT) {
            if parse_flag(ENV_STRICT, &raw)? {
                config.exit = ExitPolicy::Strict;
            }
        }
        if let Some(raw) = lookup(ENV_ABORT) {
            if parse_flag(ENV_ABORT, &raw)? {
                config.mismatch = MismatchPolicy::Abort;
            }
        }
        if let Some(raw) = lookup(ENV_COLOR) {
            config.color = parse_flag(ENV_COLOR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG) {
            config.log_level = parse(ENV_LOG, &raw, "expected off, error, warn, info, debug or trace")?;
        }

        Ok(config)
    }

    /// The cases this configuration asks for: the constant-fill `matmul` case,
    /// then a random-input case when a seed is set.
    pub fn test_cases(&self) -> Vec<TestCase> {
        let mut cases = vec![TestCase::constant("matmul", self.size, self.fill_a, self.fill_b)];
        if let Some(seed) = self.seed {
            cases.push(TestCase::random(format!("matmul_random_{seed}"), self.size, seed));
        }
        cases
    }
}

fn parse<T: FromStr>(key: &str, raw: &str, message: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| config_error(key, raw, message))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_error(key, raw, "expected 1/0, true/false, yes/no or on/off")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::harness::Input;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_classic_run() {
        let config = HarnessConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.size, 1000);
        assert_eq!((config.fill_a, config.fill_b), (1, 1));
        assert_eq!(config.exit, ExitPolicy::Lenient);
        assert_eq!(config.mismatch, MismatchPolicy::Continue);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (ENV_SIZE, "64"),
            (ENV_FILL_A, "3"),
            (ENV_FILL_B, " 255 "),
            (ENV_SEED, "42"),
            (ENV_STRICT, "true"),
            (ENV_ABORT, "YES"),
            (ENV_COLOR, "0"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.size, 64);
        assert_eq!((config.fill_a, config.fill_b), (3, 255));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.exit, ExitPolicy::Strict);
        assert_eq!(config.mismatch, MismatchPolicy::Abort);
        assert!(!config.color);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_SIZE, "0")])).unwrap_err();
        assert!(err.is_setup());
        assert!(matches!(err, HarnessError::Config { ref key, .. } if key == ENV_SIZE));
    }

    #[test]
    fn test_out_of_range_fill_is_rejected() {
        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_FILL_A, "256")])).unwrap_err();
        assert!(matches!(err, HarnessError::Config { ref value, .. } if value == "256"));
    }

    #[test]
    fn test_garbage_flag_is_rejected() {
        assert!(HarnessConfig::from_lookup(lookup_from(&[(ENV_STRICT, "maybe")])).is_err());
        assert!(HarnessConfig::from_lookup(lookup_from(&[(ENV_LOG, "loud")])).is_err());
    }

    #[test]
    fn test_cases_include_random_case_when_seeded() {
        let mut config = HarnessConfig {
            size: 8,
            ..HarnessConfig::default()
        };
        let cases = config.test_cases();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "matmul");
        assert_eq!(cases[0].input, Input::Constant { a: 1, b: 1 });

        config.seed = Some(7);
        let cases = config.test_cases();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].name, "matmul_random_7");
        assert_eq!(cases[1].input, Input::Random { seed: 7 });
    }
}
