//! The user-facing logging front-end.

use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Record};
use crate::level::Level;
use crate::value::Attr;
use chrono::Utc;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Builds records and passes them to a [`Handler`].
///
/// Loggers are cheap to clone and safe to share between threads. Deriving a logger with
/// [`Logger::with`] or [`Logger::with_group`] never changes the logger it came from.
///
/// # Examples
///
/// ```
/// use ctxlog::memory::{MemoryHandler, RecordQuery};
/// use ctxlog::prelude::*;
/// use std::sync::Arc;
///
/// let handler = Arc::new(MemoryHandler::new(Level::DEBUG));
/// let records = handler.records();
///
/// let logger = Logger::new(handler).with(&[Attr::string("service", "billing")]);
/// logger.warn("retrying", &[Attr::int("attempt", 2)]).unwrap();
///
/// let query = RecordQuery::new(Level::WARN, "retrying")
///     .with_attr("service", "billing")
///     .with_attr("attempt", 2);
/// assert!(records.contains_exact(&query).0);
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    /// Creates a logger.
    ///
    /// # Arguments
    ///
    /// * `handler` - The handler every record is passed to
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// The handler records are passed to.
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// A logger whose records all carry `attrs`. Returns a plain clone when `attrs` is
    /// empty.
    pub fn with(&self, attrs: &[Attr]) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }

        Self::new(self.handler.with_attrs(attrs.to_vec()))
    }

    /// A logger that nests all later attributes under `name`. Returns a plain clone when
    /// `name` is empty.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }

        Self::new(self.handler.with_group(name))
    }

    /// Whether the handler accepts records at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Emit a record at `level`, recording the caller's location.
    ///
    /// Disabled levels return `Ok(())` without building a record. Errors from the
    /// handler are returned to the caller.
    #[track_caller]
    pub fn log(&self, ctx: &Context, level: Level, message: &str, attrs: &[Attr]) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let mut record = Record::new(Utc::now(), level, message).with_source(Location::caller());
        record.add_attrs(attrs.iter().cloned());

        self.handler.handle(ctx, record)
    }

    #[track_caller]
    pub fn debug(&self, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(&Context::background(), Level::DEBUG, message, attrs)
    }

    #[track_caller]
    pub fn info(&self, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(&Context::background(), Level::INFO, message, attrs)
    }

    #[track_caller]
    pub fn warn(&self, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(&Context::background(), Level::WARN, message, attrs)
    }

    #[track_caller]
    pub fn error(&self, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(&Context::background(), Level::ERROR, message, attrs)
    }

    #[track_caller]
    pub fn debug_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(ctx, Level::DEBUG, message, attrs)
    }

    #[track_caller]
    pub fn info_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(ctx, Level::INFO, message, attrs)
    }

    #[track_caller]
    pub fn warn_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(ctx, Level::WARN, message, attrs)
    }

    #[track_caller]
    pub fn error_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<()> {
        self.log(ctx, Level::ERROR, message, attrs)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
