//! Ready-made loggers.

use crate::config::LoggerConfig;
use crate::context::ContextHandler;
use crate::json::JsonHandler;
use crate::level::Leveler;
use crate::logger::Logger;
use crate::memory::{LoggedRecords, MemoryHandler};
use std::sync::Arc;

/// A context-aware logger writing JSON lines as configured.
///
/// # Examples
///
/// ```no_run
/// use ctxlog::config::LoggerConfig;
/// use ctxlog::constructors::new_json_logger;
/// use ctxlog::prelude::*;
///
/// let logger = new_json_logger(LoggerConfig::default().apply_env_overrides());
/// logger.info("started", &[Attr::string("version", "0.3.0")]).unwrap();
/// ```
pub fn new_json_logger(config: LoggerConfig) -> Logger {
    let mut handler = JsonHandler::from_boxed(config.writer)
        .with_level(config.level)
        .with_source_added(config.add_source);

    if let Some(time_factory) = config.time_factory {
        handler = handler.with_time_factory(time_factory);
    }

    Logger::new(Arc::new(ContextHandler::new(Arc::new(handler))))
}

/// A context-aware logger that captures records in memory, plus the captured records.
pub fn new_in_memory_logger(leveler: impl Leveler + 'static) -> (Logger, Arc<LoggedRecords>) {
    let handler = MemoryHandler::new(leveler);
    let records = handler.records();

    (
        Logger::new(Arc::new(ContextHandler::new(Arc::new(handler)))),
        records,
    )
}
