//! Configuration module for inventory-service.

use service_core::config::{self as core_config, env_or, env_parse_or, env_required};
use service_core::error::AppError;
use std::env;

/// Row cap for document listings when the caller gives none.
pub const DEFAULT_LIST_TAKE: i64 = 500;

/// Row cap for audit log listings when the caller gives none.
pub const DEFAULT_AUDIT_LOG_TAKE: i64 = 200;

#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub default_list_take: i64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl InventoryConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env_or("SERVICE_NAME", "inventory-service"),
            service_version: env_or("SERVICE_VERSION", env!("CARGO_PKG_VERSION")),
            log_level: env_or("LOG_LEVEL", "info"),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.trim().is_empty()),
            database: DatabaseConfig {
                url: env_required("DATABASE_URL")?,
                max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: env_parse_or("DATABASE_MIN_CONNECTIONS", 2),
            },
            default_list_take: env_parse_or("DEFAULT_LIST_TAKE", DEFAULT_LIST_TAKE),
        })
    }
}
