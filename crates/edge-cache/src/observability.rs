//! Tracing setup for processes embedding the caches.
//!
//! The level comes from [`LoggingConfig`] unless `RUST_LOG` is set, and can
//! be swapped at runtime through the returned [`LogLevelHandle`].

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use crate::config::LoggingConfig;
use crate::{CacheError, CacheResult};

/// Levels accepted by `logging.level` and [`LogLevelHandle::set_level`].
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Builds the filter for one of [`LOG_LEVELS`], case-insensitively.
pub fn level_filter(level: &str) -> CacheResult<EnvFilter> {
    let level = level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(CacheError::invalid_argument(format!(
            "logging.level must be one of {LOG_LEVELS:?}, got {level:?}"
        )));
    }
    EnvFilter::try_new(&level).map_err(|err| CacheError::logging(err.to_string()))
}

/// Runtime control over the level of an installed filter.
#[derive(Debug, Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Wraps `filter` in a reloadable layer. The handle only works while the
    /// layer is part of a live subscriber.
    pub fn reloadable(filter: EnvFilter) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let (layer, inner) = reload::Layer::new(filter);
        (layer, Self { inner })
    }

    pub fn set_level(&self, level: &str) -> CacheResult<()> {
        let filter = level_filter(level)?;
        self.inner
            .reload(filter)
            .map_err(|err| CacheError::logging(err.to_string()))?;
        tracing::info!(level, "log level changed");
        Ok(())
    }

    /// Most verbose level the current filter lets through.
    pub fn current_level(&self) -> Option<LevelFilter> {
        self.inner
            .with_current(|filter| filter.max_level_hint())
            .ok()
            .flatten()
    }
}

/// Installs the global subscriber. Returns `None` when the process already
/// has one, in which case the cache logs through it.
pub fn init_tracing_from_config(logging: &LoggingConfig) -> CacheResult<Option<LogLevelHandle>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&logging.level)?,
    };
    let (layer, handle) = LogLevelHandle::reloadable(filter);
    match tracing_subscriber::registry()
        .with(layer)
        .with(fmt::layer())
        .try_init()
    {
        Ok(()) => Ok(Some(handle)),
        Err(err) => {
            tracing::debug!(%err, "global subscriber already installed");
            Ok(None)
        }
    }
}
