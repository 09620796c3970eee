//! In-memory capture of log records.
//!
//! [`MemoryHandler`] keeps every handled record in a shared [`LoggedRecords`], which
//! tests query with a [`RecordQuery`].
//!
//! # Usage Example
//!
//! ```
//! use ctxlog::memory::{MemoryHandler, RecordQuery};
//! use ctxlog::prelude::*;
//! use std::sync::Arc;
//!
//! let handler = Arc::new(MemoryHandler::new(Level::INFO));
//! let records = handler.records();
//! let logger = Logger::new(handler);
//!
//! logger.with_group("http").info("served", &[Attr::int("status", 200)]).unwrap();
//! logger.debug("ignored", &[]).unwrap();
//!
//! let query = RecordQuery::new(Level::INFO, "served").with_attr("http.status", 200);
//! let (ok, diff) = records.contains(&query);
//! assert!(ok, "{}", diff);
//! assert_eq!(records.len(), 1);
//! ```

pub mod handler;
pub mod records;

pub use handler::MemoryHandler;
pub use records::{LoggedRecord, LoggedRecords, RecordQuery, QUERY_PATH_SEPARATOR};
