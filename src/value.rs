//! Attribute values.
//!
//! An [`Attr`] is a key paired with a [`Value`]. Values are either scalars, a nested
//! group of attributes, or a lazily computed [`LogValuer`] that is resolved when a record
//! is emitted.
//!
//! # Examples
//!
//! ```
//! use ctxlog::value::{Attr, Value};
//!
//! let request = Attr::group("request", [Attr::string("method", "GET"), Attr::int("status", 200)]);
//! assert_eq!(request.value.as_group().len(), 2);
//! assert_eq!(Attr::new("retries", 3).value, Value::Int(3));
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained [`LogValuer`] calls before resolution gives up.
const MAX_LOG_VALUE_RESOLUTIONS: usize = 100;

/// A value whose log representation is computed on demand.
///
/// Implemented for every `Fn() -> Value` closure, so expensive values can be deferred
/// until a record is actually written.
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;
}

impl<F> LogValuer for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        self()
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    Duration(Duration),
    Group(Vec<Attr>),
    Lazy(Arc<dyn LogValuer>),
}

impl Value {
    /// A group value holding `attrs` in order.
    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        Value::Group(attrs.into_iter().collect())
    }

    /// A value computed by `valuer` when the record is resolved.
    pub fn lazy(valuer: impl LogValuer + 'static) -> Self {
        Value::Lazy(Arc::new(valuer))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    /// The nested attributes of a group value, empty for every other kind.
    pub fn as_group(&self) -> &[Attr] {
        match self {
            Value::Group(attrs) => attrs,
            _ => &[],
        }
    }

    /// Follows [`Value::Lazy`] values until a concrete value is reached.
    pub fn resolve(self) -> Value {
        let mut value = self;
        for _ in 0..MAX_LOG_VALUE_RESOLUTIONS {
            match value {
                Value::Lazy(valuer) => value = valuer.log_value(),
                resolved => return resolved,
            }
        }

        Value::String(format!(
            "!ERROR: log value did not resolve after {} calls",
            MAX_LOG_VALUE_RESOLUTIONS
        ))
    }

    /// Converts the value into its JSON form.
    ///
    /// Groups become objects, times are RFC 3339 strings and durations are integer
    /// nanoseconds. Non-finite floats are rendered as strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Uint(u) => JsonValue::from(*u),
            Value::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(f.to_string())),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Time(t) => JsonValue::String(format_time(t)),
            Value::Duration(d) => JsonValue::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            Value::Group(attrs) => JsonValue::Object(attrs_to_json_map(attrs)),
            Value::Lazy(_) => self.clone().resolve().to_json(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Uint(u) => write!(f, "Uint({})", u),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Time(t) => write!(f, "Time({})", format_time(t)),
            Value::Duration(d) => write!(f, "Duration({:?})", d),
            Value::Group(attrs) => f.debug_tuple("Group").field(attrs).finish(),
            Value::Lazy(_) => write!(f, "Lazy(..)"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Uint(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(value: Vec<Attr>) -> Self {
        Value::Group(value)
    }
}

/// A key/value pair attached to a log record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// Creates an attribute from any value convertible into a [`Value`].
    ///
    /// # Arguments
    ///
    /// * `key` - The attribute key; an empty key on a group value inlines the group
    /// * `value` - The attribute value
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A string attribute.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// A signed integer attribute.
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    /// An unsigned integer attribute.
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    /// A floating point attribute.
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    /// A boolean attribute.
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// A timestamp attribute, rendered as RFC 3339.
    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    /// A duration attribute, rendered in nanoseconds.
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    /// A group attribute. An empty key makes the group inline: its children are
    /// spliced into the enclosing level when resolved.
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::group(attrs))
    }

    /// Stores the error's display string.
    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::new(key, Value::String(err.to_string()))
    }

    /// Whether this is the zero attribute (no key and no value).
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && matches!(self.value, Value::Null)
    }
}

pub(crate) fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Renders attributes as an ordered JSON object, inlining unnamed groups.
pub(crate) fn attrs_to_json_map(attrs: &[Attr]) -> Map<String, JsonValue> {
    let mut map = Map::new();
    insert_attrs(&mut map, attrs);
    map
}

fn insert_attrs(map: &mut Map<String, JsonValue>, attrs: &[Attr]) {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }

        match &attr.value {
            Value::Group(children) if attr.key.is_empty() => insert_attrs(map, children),
            value => {
                map.insert(attr.key.clone(), value.to_json());
            }
        }
    }
}
