//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Missing or blank variables fall back to defaults; resolution never fails.
//! - Validation of the log level and directory is left to `init_logging`.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, LogTarget};
use rusqlite::Connection;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SHOWBILL_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SHOWBILL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SHOWBILL_LOG_DIR";

pub const DEFAULT_DB_FILE: &str = "showbill.sqlite";
pub const IN_MEMORY_DB: &str = ":memory:";

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db: DbLocation,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db: DbLocation::File(PathBuf::from(DEFAULT_DB_FILE)),
            log_level: default_log_level().to_string(),
            log_target: LogTarget::Stderr,
        }
    }
}

impl CoreConfig {
    /// Reads `SHOWBILL_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let db = match read(ENV_DB_PATH) {
            Some(value) if value == IN_MEMORY_DB => DbLocation::InMemory,
            Some(value) => DbLocation::File(PathBuf::from(value)),
            None => defaults.db,
        };
        let log_target = read(ENV_LOG_DIR)
            .map(|dir| LogTarget::Directory(PathBuf::from(dir)))
            .unwrap_or(defaults.log_target);

        Self {
            db,
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_target,
        }
    }

    /// Opens the configured store with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db {
            DbLocation::File(path) => open_db(path),
            DbLocation::InMemory => open_db_in_memory(),
        }
    }
}
