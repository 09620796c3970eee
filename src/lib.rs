//! # ctxlog
//!
//! Structured logging with persistent attribute groups, duplicate-key disambiguation and
//! attributes carried on a request [`Context`](context::Context).
//!
//! - [`attrs`]: the attribute group tree and the resolution pass that nests attributes in
//!   their groups and suffixes colliding keys (`a`, `a#01`, `a#02`)
//! - [`context`]: request-scoped values and the [`ContextHandler`](context::ContextHandler)
//!   that merges context attributes into every record
//! - [`memory`], [`json`], [`bridge`]: sinks for tests, JSON lines and `tracing`
//! - [`logger`]: the [`Logger`](logger::Logger) front-end
//!
//! # Quick start
//!
//! ```
//! use ctxlog::prelude::*;
//!
//! let (logger, records) = new_in_memory_logger(Level::INFO);
//! let ctx = Context::background().with_root_attrs([Attr::string("request_id", "r-1")]);
//!
//! logger
//!     .with_group("cart")
//!     .info_ctx(&ctx, "item added", &[Attr::int("qty", 1), Attr::int("qty", 2)])
//!     .unwrap();
//!
//! let query = RecordQuery::new(Level::INFO, "item added")
//!     .with_attr("request_id", "r-1")
//!     .with_attr("cart.qty", 1)
//!     .with_attr("cart.qty#01", 2);
//! let (ok, diff) = records.contains_exact(&query);
//! assert!(ok, "{}", diff);
//! ```

pub mod attrs;
pub mod bridge;
pub mod config;
pub mod constructors;
pub mod context;
pub mod error;
pub mod handler;
pub mod json;
pub mod level;
pub mod logger;
pub mod memory;
pub mod value;

pub use error::{LogError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::LoggerConfig;
    pub use crate::constructors::{new_in_memory_logger, new_json_logger};
    pub use crate::context::{Context, ContextHandler, Extractor};
    pub use crate::error::{LogError, Result};
    pub use crate::handler::{Handler, Record};
    pub use crate::level::{Level, LevelVar, Leveler};
    pub use crate::logger::Logger;
    pub use crate::memory::{LoggedRecords, MemoryHandler, RecordQuery};
    pub use crate::value::{Attr, Value};
}
