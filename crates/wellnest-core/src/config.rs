//! Runtime configuration loaded from the environment.

use std::path::PathBuf;

/// Default log filter when `WELLNEST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Core configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
    /// `tracing` filter directive (e.g. `info`, `wellnest_core=debug`).
    pub log_filter: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default     |
    /// |--------------------|-------------|
    /// | `WELLNEST_DB_PATH` | (in-memory) |
    /// | `WELLNEST_LOG`     | `info`      |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("WELLNEST_DB_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let log_filter = lookup("WELLNEST_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        Self {
            database_path,
            log_filter,
        }
    }
}
