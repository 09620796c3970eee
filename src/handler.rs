//! The sink contract every handler implements.
//!
//! A [`Handler`] receives [`Record`]s from a [`Logger`](crate::logger::Logger). Handlers
//! are immutable once built: `with_attrs` and `with_group` return new handlers, which lets
//! one handler be shared across threads behind an `Arc`.

use crate::context::Context;
use crate::error::Result;
use crate::level::Level;
use crate::value::Attr;
use chrono::{DateTime, Utc};
use std::panic::Location;
use std::sync::Arc;

/// Key of the record time in rendered output.
pub const TIME_KEY: &str = "time";
/// Key of the record level in rendered output.
pub const LEVEL_KEY: &str = "level";
/// Key of the record message in rendered output.
pub const MESSAGE_KEY: &str = "msg";
/// Key of the call site in rendered output.
pub const SOURCE_KEY: &str = "source";

/// A single log entry on its way to a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
    /// Call site of the logging statement, when known.
    pub source: Option<&'static Location<'static>>,
}

impl Record {
    /// Creates a record without attributes or source location.
    ///
    /// # Arguments
    ///
    /// * `time` - When the record was created
    /// * `level` - The record's severity
    /// * `message` - The log message
    pub fn new(time: DateTime<Utc>, level: Level, message: impl Into<String>) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            attrs: Vec::new(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'static Location<'static>) -> Self {
        self.source = Some(source);
        self
    }

    /// Appends `attrs` after the record's existing attributes.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// A copy of this record with the same time, level, message and source but no
    /// attributes.
    pub fn without_attrs(&self) -> Self {
        Self {
            time: self.time,
            level: self.level,
            message: self.message.clone(),
            attrs: Vec::new(),
            source: self.source,
        }
    }
}

/// Trait for log sinks.
///
/// Wrapping handlers must propagate a downstream error (adding context with
/// [`LogError::handler`](crate::error::LogError::handler)) rather than swallow it.
pub trait Handler: Send + Sync {
    /// Whether records at `level` should be built and passed to [`Handler::handle`].
    fn enabled(&self, level: Level) -> bool;

    /// Process one record. Only called when [`Handler::enabled`] returned true.
    fn handle(&self, ctx: &Context, record: Record) -> Result<()>;

    /// A handler whose records also carry `attrs` in the current group.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// A handler that nests all future attributes under `name`. An empty name leaves
    /// attributes in the current group.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}
