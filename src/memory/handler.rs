//! Handler that keeps records in memory.

use super::records::{LoggedRecord, LoggedRecords};
use crate::attrs::AttrGroupTree;
use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Record};
use crate::level::{Level, Leveler};
use crate::value::Attr;
use std::sync::Arc;

/// Captures handled records in a [`LoggedRecords`] for later inspection.
///
/// Handlers derived through `with_attrs` and `with_group` keep writing to the same
/// [`LoggedRecords`], so records from every derived logger can be asserted on together.
#[derive(Clone)]
pub struct MemoryHandler {
    persistent_attrs: AttrGroupTree,
    leveler: Arc<dyn Leveler>,
    logged_records: Arc<LoggedRecords>,
}

impl MemoryHandler {
    /// Create a handler that captures records at or above the leveler's current level.
    ///
    /// # Arguments
    ///
    /// * `leveler` - A fixed [`Level`] or a shared [`LevelVar`](crate::level::LevelVar)
    pub fn new(leveler: impl Leveler + 'static) -> Self {
        Self {
            persistent_attrs: AttrGroupTree::new(),
            leveler: Arc::new(leveler),
            logged_records: Arc::new(LoggedRecords::default()),
        }
    }

    /// The records captured by this handler and every handler derived from it.
    pub fn records(&self) -> Arc<LoggedRecords> {
        Arc::clone(&self.logged_records)
    }

    fn with_tree(&self, persistent_attrs: AttrGroupTree) -> Self {
        Self {
            persistent_attrs,
            leveler: Arc::clone(&self.leveler),
            logged_records: Arc::clone(&self.logged_records),
        }
    }
}

impl Handler for MemoryHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.leveler.level()
    }

    fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
        let attrs = self
            .persistent_attrs
            .with_attrs(record.attrs)
            .history()
            .deduplicated_attrs();

        self.logged_records.append(LoggedRecord {
            time: record.time,
            level: record.level,
            message: record.message,
            attrs,
        });

        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_group(name)))
    }
}
