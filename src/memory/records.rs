//! Captured records and the query helpers used to assert on them.

use crate::handler::{LEVEL_KEY, MESSAGE_KEY, TIME_KEY};
use crate::level::Level;
use crate::value::{attrs_to_json_map, format_time, Attr, Value};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Separator for nested attribute paths in a [`RecordQuery`].
pub const QUERY_PATH_SEPARATOR: char = '.';

/// A single captured log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRecord {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    /// Resolved attributes, already deduplicated and nested within their groups.
    pub attrs: Vec<Attr>,
}

impl LoggedRecord {
    /// The record as a JSON object: `time`, `level`, `msg`, then the nested attributes.
    ///
    /// A top-level attribute named like one of the header keys is left out so the header
    /// stays intact; [`LoggedRecord::attrs`] still holds it.
    pub fn as_nested_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        map.insert(TIME_KEY.to_string(), JsonValue::String(format_time(&self.time)));
        map.insert(LEVEL_KEY.to_string(), JsonValue::String(self.level.to_string()));
        map.insert(MESSAGE_KEY.to_string(), JsonValue::String(self.message.clone()));

        for (key, value) in attrs_to_json_map(&self.attrs) {
            map.entry(key).or_insert(value);
        }

        map
    }

    /// Only the nested attributes, without the header keys.
    fn attrs_map(&self) -> Map<String, JsonValue> {
        attrs_to_json_map(&self.attrs)
    }
}

/// Describes a record to look for in [`LoggedRecords`].
///
/// Attribute paths are dot separated: an attribute written as
/// `Attr::group("g", [Attr::string("k", "v")])` is queried with
/// `.with_attr("g.k", "v")`. Level and message are compared against the record's own
/// fields, so attributes named `level` or `msg` can be queried like any other. Entries
/// keyed `time` are never compared, at any depth.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub level: Level,
    pub message: String,
    pub attrs: HashMap<String, Value>,
}

impl RecordQuery {
    /// Creates a query with no expected attributes.
    ///
    /// # Arguments
    ///
    /// * `level` - The exact level the record must have
    /// * `message` - The exact message the record must have
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            attrs: HashMap::new(),
        }
    }

    /// Expect `value` at the dot separated `path`.
    ///
    /// # Panics
    ///
    /// Matching panics if `value` resolves to a group; nested attributes must be
    /// addressed with dot notation instead.
    pub fn with_attr(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(path.into(), value.into());
        self
    }

    /// The expected attributes as a nested JSON object.
    fn attrs_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();

        // Sorted so conflicting paths fail the same way every time.
        let mut paths: Vec<_> = self.attrs.iter().collect();
        paths.sort_by(|a, b| a.0.cmp(b.0));

        for (path, value) in paths {
            let segments: Vec<&str> = path.split(QUERY_PATH_SEPARATOR).collect();
            set_path(&mut map, &segments, value.clone().resolve());
        }

        map
    }
}

fn set_path(map: &mut Map<String, JsonValue>, segments: &[&str], value: Value) {
    let Some((key, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        if value.is_group() {
            panic!(
                "group values cannot be used as expected values in a RecordQuery, \
                 use dot notation to address nested attributes instead"
            );
        }
        if map.insert(key.to_string(), value.to_json()).is_some() {
            panic!("RecordQuery path {:?} conflicts with another expected value", key);
        }
        return;
    }

    let nested = map
        .entry(key.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));

    match nested {
        JsonValue::Object(child) => set_path(child, rest, value),
        _ => panic!("RecordQuery path {:?} is used as both a value and a group", key),
    }
}

/// How strictly a query is compared against a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// Only the queried paths are compared.
    Subset,
    /// Every attribute of the record must be queried.
    Exact,
}

/// Records captured by a [`MemoryHandler`](super::MemoryHandler).
///
/// Appending and reading are guarded by the same lock, so one instance can be shared by
/// handlers logging from many threads.
#[derive(Debug, Default)]
pub struct LoggedRecords {
    records: Mutex<Vec<LoggedRecord>>,
}

impl LoggedRecords {
    /// A store pre-filled with `records`.
    pub fn new(records: Vec<LoggedRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LoggedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn append(&self, record: LoggedRecord) {
        self.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A snapshot of the captured records, in the order they were handled.
    pub fn records(&self) -> Vec<LoggedRecord> {
        self.lock().clone()
    }

    /// Every record as a nested JSON object, e.g. for printing captured logs.
    pub fn as_nested_maps(&self) -> Vec<Map<String, JsonValue>> {
        self.lock().iter().map(LoggedRecord::as_nested_map).collect()
    }

    /// Whether any record has the query's level and message and every queried attribute.
    /// Attributes the query does not mention are ignored.
    ///
    /// When nothing matches, the returned string describes how the records differ from
    /// the query: only the records with the queried message if there are any, otherwise
    /// every record. The string is empty on a match and meant for test failure output.
    pub fn contains(&self, query: &RecordQuery) -> (bool, String) {
        self.compare(query, MatchMode::Subset)
    }

    /// Like [`LoggedRecords::contains`], but the matching record must carry exactly the
    /// queried attributes and no others.
    pub fn contains_exact(&self, query: &RecordQuery) -> (bool, String) {
        self.compare(query, MatchMode::Exact)
    }

    fn compare(&self, query: &RecordQuery, mode: MatchMode) -> (bool, String) {
        let mut expected = query.attrs_map();
        strip_time(&mut expected);
        let records = self.lock();

        let mut diff = String::new();
        let mut message_match_diff = String::new();

        for (index, record) in records.iter().enumerate() {
            let mut differences = Vec::new();
            diff_header(
                LEVEL_KEY,
                &query.level.to_string(),
                &record.level.to_string(),
                &mut differences,
            );
            diff_header(MESSAGE_KEY, &query.message, &record.message, &mut differences);

            let mut actual = record.attrs_map();
            strip_time(&mut actual);
            diff_maps(&expected, &actual, "", mode, &mut differences);

            if differences.is_empty() {
                return (true, String::new());
            }

            let rendered = render_diff(index, &differences);
            if record.message == query.message {
                message_match_diff.push_str(&rendered);
            }
            diff.push_str(&rendered);
        }

        if !message_match_diff.is_empty() {
            return (false, message_match_diff);
        }

        if records.is_empty() {
            return (false, "no records were logged\n".to_string());
        }

        (false, diff)
    }
}

/// Drop every entry keyed `time`, at any depth.
fn strip_time(map: &mut Map<String, JsonValue>) {
    map.remove(TIME_KEY);
    for value in map.values_mut() {
        if let JsonValue::Object(child) = value {
            strip_time(child);
        }
    }
}

fn diff_header(key: &str, want: &str, got: &str, differences: &mut Vec<String>) {
    if want != got {
        differences.push(format!("-{}: {}", key, JsonValue::String(want.to_string())));
        differences.push(format!("+{}: {}", key, JsonValue::String(got.to_string())));
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, QUERY_PATH_SEPARATOR, key)
    }
}

fn diff_maps(
    expected: &Map<String, JsonValue>,
    actual: &Map<String, JsonValue>,
    prefix: &str,
    mode: MatchMode,
    differences: &mut Vec<String>,
) {
    for (key, want) in expected {
        let path = join_path(prefix, key);

        match (want, actual.get(key)) {
            (_, None) => differences.push(format!("-{}: {}", path, want)),
            (JsonValue::Object(want), Some(JsonValue::Object(got))) => {
                diff_maps(want, got, &path, mode, differences)
            }
            (want, Some(got)) if want == got => {}
            (want, Some(got)) => {
                differences.push(format!("-{}: {}", path, want));
                differences.push(format!("+{}: {}", path, got));
            }
        }
    }

    if mode == MatchMode::Exact {
        for (key, got) in actual {
            if !expected.contains_key(key) {
                differences.push(format!("+{}: {}", join_path(prefix, key), got));
            }
        }
    }
}

fn render_diff(index: usize, differences: &[String]) -> String {
    let mut rendered = String::new();
    let _ = writeln!(rendered, "record {}:", index);
    for line in differences {
        let _ = writeln!(rendered, "  {}", line);
    }
    rendered
}
