//! Context-carried attributes.
//!
//! A [`Context`] travels with a request and carries attributes that should appear on
//! every record logged while handling it. [`ContextHandler`] pulls those attributes out
//! through its [`Extractor`]s and merges them with the logger's own attributes.
//!
//! # Usage Example
//!
//! ```
//! use ctxlog::context::{Context, ContextHandler};
//! use ctxlog::memory::{MemoryHandler, RecordQuery};
//! use ctxlog::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryHandler::new(Level::INFO));
//! let records = memory.records();
//! let logger = Logger::new(Arc::new(ContextHandler::new(memory)));
//!
//! let ctx = Context::background()
//!     .with_root_attrs([Attr::string("request_id", "r-1")])
//!     .with_attrs([Attr::int("attempt", 2)]);
//!
//! logger.with_group("db").info_ctx(&ctx, "query", &[Attr::int("rows", 3)]).unwrap();
//!
//! let query = RecordQuery::new(Level::INFO, "query")
//!     .with_attr("request_id", "r-1")
//!     .with_attr("db.rows", 3)
//!     .with_attr("db.attempt", 2);
//! assert!(records.contains_exact(&query).0);
//! ```

pub mod extractor;
pub mod handler;
pub mod values;

pub use extractor::{attrs_extractor, root_attrs_extractor, Extractor};
pub use handler::ContextHandler;
pub use values::Context;
