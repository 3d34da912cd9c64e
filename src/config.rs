//! Runner configuration.
//!
//! Values come from an optional TOML file, then environment overrides:
//!
//! ```toml
//! simulated_latency_ms = 150
//! rate_limit = 3
//! pool_size = 2
//! color = true
//! ```

use crate::error::{PatternError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_LATENCY_MS: &str = "PATTERN_CATALOG_LATENCY_MS";
pub const ENV_RATE_LIMIT: &str = "PATTERN_CATALOG_RATE_LIMIT";
pub const ENV_COLOR: &str = "PATTERN_CATALOG_COLOR";

/// Upper bound on `rate_limit`; the proxy demo issues a request per unit.
pub const MAX_RATE_LIMIT: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Delay used by the async demos to fake a remote call.
    pub simulated_latency_ms: u64,
    /// Requests per window allowed by the rate-limiting proxy.
    pub rate_limit: u32,
    /// Connections in the injected pool built by the singleton demo.
    pub pool_size: usize,
    pub color: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 150,
            rate_limit: 3,
            pool_size: 2,
            color: true,
        }
    }
}

impl CatalogConfig {
    /// Zero latency, no colour. What the tests run with.
    pub fn quiet() -> Self {
        Self {
            simulated_latency_ms: 0,
            color: false,
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file (if any), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup; `load` passes `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_LATENCY_MS) {
            self.simulated_latency_ms = raw
                .trim()
                .parse()
                .map_err(|_| PatternError::Validation(format!("{ENV_LATENCY_MS}={raw} is not a number")))?;
        }
        if let Some(raw) = lookup(ENV_RATE_LIMIT) {
            self.rate_limit = raw
                .trim()
                .parse()
                .map_err(|_| PatternError::Validation(format!("{ENV_RATE_LIMIT}={raw} is not a number")))?;
        }
        if let Some(raw) = lookup(ENV_COLOR) {
            self.color = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if lookup("NO_COLOR").is_some() {
            self.color = false;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate_limit == 0 {
            return Err(PatternError::Validation("rate_limit must be at least 1".into()));
        }
        if self.rate_limit > MAX_RATE_LIMIT {
            return Err(PatternError::Validation(format!(
                "rate_limit must be at most {MAX_RATE_LIMIT}, got {}",
                self.rate_limit
            )));
        }
        if self.pool_size == 0 {
            return Err(PatternError::Validation("pool_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}
