//! Logger configuration.
//!
//! [`LoggerConfig`] collects the options used by
//! [`new_json_logger`](crate::constructors::new_json_logger). Every option has a default,
//! so only the ones that differ need to be set:
//!
//! ```
//! use ctxlog::config::LoggerConfig;
//! use ctxlog::level::Level;
//! use std::sync::Arc;
//!
//! let config = LoggerConfig::default()
//!     .with_level(Arc::new(Level::DEBUG))
//!     .with_source_added(false)
//!     .with_writer(std::io::stdout());
//!
//! assert!(!config.add_source);
//! ```

use crate::json::TimeFactory;
use crate::level::{Level, Leveler};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Environment variable overriding the minimum level, e.g. `debug` or `warn+2`.
pub const LEVEL_ENV: &str = "CTXLOG_LEVEL";
/// Environment variable overriding whether source locations are written.
pub const ADD_SOURCE_ENV: &str = "CTXLOG_ADD_SOURCE";

pub struct LoggerConfig {
    /// Minimum level written. Defaults to [`Level::INFO`].
    pub level: Arc<dyn Leveler>,
    /// Whether the caller's file and line are written. Defaults to true.
    pub add_source: bool,
    /// Replaces the time of each record, e.g. to get stable output in doc tests.
    pub time_factory: Option<TimeFactory>,
    /// Destination of the output. Defaults to standard error.
    pub writer: Box<dyn Write + Send>,
}

impl LoggerConfig {
    /// The default configuration: INFO, source locations on, writing to standard error.
    pub fn new() -> Self {
        Self {
            level: Arc::new(Level::INFO),
            add_source: true,
            time_factory: None,
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Set the minimum level. Pass a shared [`LevelVar`](crate::level::LevelVar) to
    /// change it while the logger is in use.
    pub fn with_level(mut self, level: Arc<dyn Leveler>) -> Self {
        self.level = level;
        self
    }

    pub fn with_source_added(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    pub fn with_time_factory(mut self, time_factory: TimeFactory) -> Self {
        self.time_factory = Some(time_factory);
        self
    }

    /// Set where the JSON lines are written.
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Apply overrides from [`LEVEL_ENV`] and [`ADD_SOURCE_ENV`].
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Blank values are ignored and unparsable
    /// values are logged and ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(LEVEL_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                match trimmed.parse::<Level>() {
                    Ok(level) => {
                        self.level = Arc::new(level);
                    }
                    Err(err) => {
                        tracing::warn!("invalid {LEVEL_ENV}, ignoring: {err}");
                    }
                }
            }
        }

        if let Some(raw) = lookup(ADD_SOURCE_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                match parse_bool(trimmed) {
                    Some(add_source) => {
                        self.add_source = add_source;
                    }
                    None => {
                        tracing::warn!("invalid {ADD_SOURCE_ENV}, ignoring: {trimmed}");
                    }
                }
            }
        }

        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("level", &self.level.level())
            .field("add_source", &self.add_source)
            .field("time_factory", &self.time_factory.is_some())
            .finish_non_exhaustive()
    }
}
