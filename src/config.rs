//! Compiler configuration

use crate::consts::DEFAULT_LIMIT;
use crate::error::{Error, Result};

/// Environment variable overriding [`Config::limit_stack`]
pub const ENV_LIMIT_STACK: &str = "JMMC_LIMIT_STACK";
/// Environment variable overriding [`Config::limit_locals`]
pub const ENV_LIMIT_LOCALS: &str = "JMMC_LIMIT_LOCALS";

/// Options consumed by the bytecode generator.
///
/// Stack and locals limits are emitted verbatim as `.limit` directives; no
/// bound is computed from the instruction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub limit_stack: u16,
    pub limit_locals: u16,
    /// Access modifier written on the `.class` directive
    pub class_access: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit_stack: DEFAULT_LIMIT,
            limit_locals: DEFAULT_LIMIT,
            class_access: "public".to_string(),
        }
    }
}

impl Config {
    /// Default configuration with `JMMC_LIMIT_*` overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = read_limit(ENV_LIMIT_STACK)? {
            config.limit_stack = v;
        }
        if let Some(v) = read_limit(ENV_LIMIT_LOCALS)? {
            config.limit_locals = v;
        }
        log::debug!(
            "config: limit_stack={} limit_locals={}",
            config.limit_stack,
            config.limit_locals
        );
        Ok(config)
    }

    pub fn with_limits(mut self, stack: u16, locals: u16) -> Self {
        self.limit_stack = stack;
        self.limit_locals = locals;
        self
    }
}

fn read_limit(var: &str) -> Result<Option<u16>> {
    match std::env::var(var) {
        Ok(raw) => parse_limit(var, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_limit(var: &str, raw: &str) -> Result<u16> {
    let value: u16 = raw
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} must be an integer in 1..=65535, got '{}'", var, raw)))?;
    if value == 0 {
        return Err(Error::config(format!("{} must be positive", var)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let c = Config::default();
        assert_eq!(c.limit_stack, 99);
        assert_eq!(c.limit_locals, 99);
        assert_eq!(c.class_access, "public");
    }

    #[test]
    fn parse_limit_rejects_garbage_and_zero() {
        assert_eq!(parse_limit("X", " 12 ").unwrap(), 12);
        assert!(matches!(parse_limit("X", "abc"), Err(Error::Config { .. })));
        assert!(matches!(parse_limit("X", "0"), Err(Error::Config { .. })));
        assert!(matches!(parse_limit("X", "70000"), Err(Error::Config { .. })));
    }
}
