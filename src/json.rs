//! Newline-delimited JSON output.

use crate::attrs::AttrGroupTree;
use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Record, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::level::{Level, Leveler};
use crate::value::{attrs_to_json_map, format_time, Attr};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as JsonValue};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Produces the time written for each record in place of the record's own time.
pub type TimeFactory = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Writes each record as one JSON object per line.
///
/// Keys appear in the order `time`, `level`, `msg`, `source` (when enabled and known),
/// followed by the record's attributes with groups as nested objects.
///
/// # Examples
///
/// ```
/// use ctxlog::context::Context;
/// use ctxlog::handler::{Handler, Record};
/// use ctxlog::json::JsonHandler;
/// use ctxlog::prelude::*;
/// use chrono::{TimeZone, Utc};
///
/// let handler = JsonHandler::new(std::io::sink()).with_source_added(false);
/// let time = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
/// let mut record = Record::new(time, Level::INFO, "hi");
/// record.add_attrs([Attr::int("n", 1)]);
///
/// assert_eq!(
///     handler.render(&record).to_string(),
///     r#"{"time":"2024-03-05T12:00:00Z","level":"INFO","msg":"hi","n":1}"#
/// );
/// handler.handle(&Context::background(), record).unwrap();
/// ```
#[derive(Clone)]
pub struct JsonHandler {
    writer: SharedWriter,
    leveler: Arc<dyn Leveler>,
    add_source: bool,
    time_factory: Option<TimeFactory>,
    persistent_attrs: AttrGroupTree,
}

impl JsonHandler {
    /// Create a handler writing to `writer` at INFO and above, with source locations.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::from_boxed(Box::new(writer))
    }

    pub(crate) fn from_boxed(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            leveler: Arc::new(Level::INFO),
            add_source: true,
            time_factory: None,
            persistent_attrs: AttrGroupTree::new(),
        }
    }

    /// Set the minimum level written.
    pub fn with_level(mut self, leveler: Arc<dyn Leveler>) -> Self {
        self.leveler = leveler;
        self
    }

    /// Whether to write the caller's file and line under `source`.
    pub fn with_source_added(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Write the factory's time instead of each record's own time.
    pub fn with_time_factory(mut self, time_factory: TimeFactory) -> Self {
        self.time_factory = Some(time_factory);
        self
    }

    /// Build the JSON object written for `record`, including this handler's persistent
    /// attributes.
    pub fn render(&self, record: &Record) -> JsonValue {
        let time = match &self.time_factory {
            Some(factory) => factory(),
            None => record.time,
        };

        let mut map = Map::new();
        map.insert(TIME_KEY.to_string(), JsonValue::String(format_time(&time)));
        map.insert(LEVEL_KEY.to_string(), JsonValue::String(record.level.to_string()));
        map.insert(MESSAGE_KEY.to_string(), JsonValue::String(record.message.clone()));

        if let (true, Some(source)) = (self.add_source, record.source) {
            map.insert(
                SOURCE_KEY.to_string(),
                json!({"file": source.file(), "line": source.line()}),
            );
        }

        let attrs = self
            .persistent_attrs
            .with_attrs(record.attrs.iter().cloned())
            .history()
            .deduplicated_attrs();
        map.extend(attrs_to_json_map(&attrs));

        JsonValue::Object(map)
    }

    fn with_tree(&self, persistent_attrs: AttrGroupTree) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            leveler: Arc::clone(&self.leveler),
            add_source: self.add_source,
            time_factory: self.time_factory.clone(),
            persistent_attrs,
        }
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.leveler.level()
    }

    fn handle(&self, _ctx: &Context, record: Record) -> Result<()> {
        let mut line = serde_json::to_vec(&self.render(&record))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&line).map_err(|err| {
            debug!("Failed to write log record: {}", err);
            err
        })?;

        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.with_tree(self.persistent_attrs.with_group(name)))
    }
}
