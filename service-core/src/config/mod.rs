use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read an environment variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable; unset or unparsable values yield `default`.
pub fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a mandatory environment variable.
pub fn env_required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_on_garbage() {
        // SAFETY: test-local variable names, no other thread reads them.
        unsafe {
            env::set_var("SERVICE_CORE_TEST_PARSE", "not-a-number");
        }
        assert_eq!(env_parse_or("SERVICE_CORE_TEST_PARSE", 7u32), 7);
        unsafe {
            env::set_var("SERVICE_CORE_TEST_PARSE", " 12 ");
        }
        assert_eq!(env_parse_or("SERVICE_CORE_TEST_PARSE", 7u32), 12);
    }

    #[test]
    fn required_reports_missing_key() {
        let err = env_required("SERVICE_CORE_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("SERVICE_CORE_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn env_or_uses_default() {
        assert_eq!(env_or("SERVICE_CORE_TEST_ALSO_UNSET", "fallback"), "fallback");
    }
}
