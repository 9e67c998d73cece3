//! Engine and server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::{DEFAULT_MIN_GAMES, FilterState};
use crate::results::DEFAULT_BATCH_SIZE;

/// Configuration parameters for a trip result session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of trips revealed per batch.
    pub batch_size: usize,

    /// How long a session snapshot stays restorable (minutes).
    pub snapshot_ttl_mins: i64,

    /// How long remembered search-form values stay valid (minutes).
    pub form_defaults_ttl_mins: i64,

    /// Minimum game count of the default filter.
    pub default_min_games: u32,

    /// Delays before each attempt to restore the scroll position (ms).
    /// Layout settles asynchronously, so later attempts wait longer.
    pub scroll_retry_delays_ms: Vec<u64>,

    /// How long restoration waits for the renderer to become ready (ms).
    pub ready_timeout_ms: u64,
}

impl EngineConfig {
    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the snapshot lifetime.
    pub fn with_snapshot_ttl_mins(mut self, mins: i64) -> Self {
        self.snapshot_ttl_mins = mins;
        self
    }

    /// Set the scroll retry schedule.
    pub fn with_scroll_retry_delays_ms(mut self, delays: Vec<u64>) -> Self {
        self.scroll_retry_delays_ms = delays;
        self
    }

    /// Set the readiness timeout.
    pub fn with_ready_timeout_ms(mut self, ms: u64) -> Self {
        self.ready_timeout_ms = ms;
        self
    }

    /// Returns the snapshot lifetime as a Duration.
    pub fn snapshot_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.snapshot_ttl_mins)
    }

    /// Returns the form-defaults lifetime as a Duration.
    pub fn form_defaults_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.form_defaults_ttl_mins)
    }

    /// Returns the readiness timeout as a Duration.
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Returns the scroll retry schedule as Durations.
    pub fn scroll_retry_delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.scroll_retry_delays_ms
            .iter()
            .map(|&ms| Duration::from_millis(ms))
    }

    /// The filter state that `clear` returns to.
    pub fn default_filters(&self) -> FilterState {
        FilterState::with_min_games(self.default_min_games)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            snapshot_ttl_mins: 30,
            form_defaults_ttl_mins: 30,
            default_min_games: DEFAULT_MIN_GAMES,
            scroll_retry_delays_ms: vec![0, 50, 150, 300, 600, 1000],
            ready_timeout_ms: 5000,
        }
    }
}

/// Environment variable holding the listen address.
pub const ADDR_VAR: &str = "TRIP_SERVER_ADDR";

/// Environment variable naming the snapshot directory.
pub const DATA_DIR_VAR: &str = "TRIP_SERVER_DATA_DIR";

/// Errors reading the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var} {value:?}: {source}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Where the HTTP host listens and keeps snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,

    /// Directory for file-backed snapshots. Kept in memory when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read from `lookup`, falling back to defaults for unset or empty values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let set = |var: &str| lookup(var).filter(|v: &String| !v.trim().is_empty());

        if let Some(value) = set(ADDR_VAR) {
            config.addr = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidAddr {
                    var: ADDR_VAR,
                    value,
                    source,
                })?;
        }
        config.data_dir = set(DATA_DIR_VAR).map(PathBuf::from);

        Ok(config)
    }
}
