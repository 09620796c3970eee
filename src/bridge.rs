//! Forwarding of records into the `tracing` ecosystem.
//!
//! Applications that already install a `tracing` subscriber can route ctxlog records
//! through it with [`TracingHandler`]. Levels map onto `tracing`'s fixed levels and the
//! resolved attributes travel as a single JSON `attrs` field.

use crate::attrs::AttrGroupTree;
use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Record};
use crate::level::{Level, Leveler};
use crate::value::{attrs_to_json_map, Attr};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Target used for every forwarded event.
pub const TRACING_TARGET: &str = "ctxlog";

/// Emits each record as a `tracing` event.
///
/// Levels at or above [`Level::ERROR`] become `ERROR` events, then `WARN`, `INFO` and
/// `DEBUG` in turn; anything below [`Level::DEBUG`] becomes `TRACE`.
#[derive(Clone)]
pub struct TracingHandler {
    leveler: Arc<dyn Leveler>,
    persistent_attrs: AttrGroupTree,
}

impl TracingHandler {
    /// Creates a handler forwarding records at or above the leveler's level.
    ///
    /// # Arguments
    ///
    /// * `leveler` - A fixed [`Level`] or a shared [`LevelVar`](crate::level::LevelVar)
    pub fn new(leveler: impl Leveler + 'static) -> Self {
        Self {
            leveler: Arc::new(leveler),
            persistent_attrs: AttrGroupTree::new(),
        }
    }

    fn with_tree(&self, persistent_attrs: AttrGroupTree) -> Self {
        Self {
            leveler: Arc::clone(&self.leveler),
            persistent_attrs,
        }
    }
}

impl Default for TracingHandler {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl Handler for TracingHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.leveler.level()
    }

    fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
        let attrs = self
            .persistent_attrs
            .with_attrs(record.attrs)
            .history()
            .deduplicated_attrs();
        let attrs = JsonValue::Object(attrs_to_json_map(&attrs)).to_string();
        let message = record.message.as_str();

        match record.level {
            level if level >= Level::ERROR => {
                tracing::error!(target: TRACING_TARGET, attrs = %attrs, "{}", message)
            }
            level if level >= Level::WARN => {
                tracing::warn!(target: TRACING_TARGET, attrs = %attrs, "{}", message)
            }
            level if level >= Level::INFO => {
                tracing::info!(target: TRACING_TARGET, attrs = %attrs, "{}", message)
            }
            level if level >= Level::DEBUG => {
                tracing::debug!(target: TRACING_TARGET, attrs = %attrs, "{}", message)
            }
            _ => tracing::trace!(target: TRACING_TARGET, attrs = %attrs, "{}", message),
        }

        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_group(name)))
    }
}
