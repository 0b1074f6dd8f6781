//! # Property Tree Values
//!
//! Theme properties are ultimately trees of [PropertyValue] nodes. The node
//! set is closed: scalars, dates, lists and records. Deep clone, deep merge
//! and path lookup in [deep](crate::deep) are written against exactly these
//! kinds.
//!
//! ## Serialized Form
//!
//! Nodes serialize as plain JSON/TOML values. Dates are the one exception:
//! they are written as `{"$date": "<RFC 3339>"}` so that a date survives a
//! round trip instead of coming back as a string.
//!
//! ```rust
//! use themekit_theme::value::PropertyValue;
//!
//! let value: PropertyValue = serde_json::from_str(r##"{"main": "#1976d2", "weight": 600}"##).unwrap();
//! let record = value.as_record().unwrap();
//! assert_eq!(record["main"].as_str(), Some("#1976d2"));
//! assert_eq!(record["weight"].as_number(), Some(600.0));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key used to tag date nodes in serialized trees.
pub const DATE_TAG: &str = "$date";

/// An insertion-ordered record of named property nodes.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// A single node in a theme property tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A number. Integers are widened to `f64`.
    Number(f64),
    /// A string (colors, font families, easing curves, ...).
    String(String),
    /// A point in time.
    Date(DateTime<Utc>),
    /// An ordered list of nodes. Lists are leaves for merging purposes.
    List(Vec<PropertyValue>),
    /// A nested record.
    Record(PropertyMap),
}

impl PropertyValue {
    /// Returns the string, if this is a string node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the number, if this is a number node.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a bool node.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a date node.
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            PropertyValue::Date(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list node.
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the record, if this is a record node.
    pub fn as_record(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Record(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this node is a record.
    pub fn is_record(&self) -> bool {
        matches!(self, PropertyValue::Record(_))
    }

    /// Whether this node is null.
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// A short name for the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::Date(_) => "date",
            PropertyValue::List(_) => "list",
            PropertyValue::Record(_) => "record",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        PropertyValue::Date(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(value: Vec<PropertyValue>) -> Self {
        PropertyValue::List(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        PropertyValue::Record(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(value) => write!(f, "{}", value),
            PropertyValue::Number(value) => write!(f, "{}", value),
            PropertyValue::String(value) => write!(f, "{}", value),
            PropertyValue::Date(value) => write!(f, "{}", value.to_rfc3339()),
            PropertyValue::List(items) => write!(f, "[{} items]", items.len()),
            PropertyValue::Record(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Bool(value) => serializer.serialize_bool(*value),
            PropertyValue::Number(value) => serializer.serialize_f64(*value),
            PropertyValue::String(value) => serializer.serialize_str(value),
            PropertyValue::Date(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DATE_TAG, &value.to_rfc3339())?;
                map.end()
            },
            PropertyValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            PropertyValue::Record(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PropertyValueVisitor)
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a theme property value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        PropertyValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(PropertyValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(PropertyValue::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(PropertyValue::String(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PropertyValue::List(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = PropertyMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, PropertyValue>()? {
            map.insert(key, value);
        }

        // A lone `$date` string is a tagged date node.
        if map.len() == 1 {
            if let Some(PropertyValue::String(raw)) = map.get(DATE_TAG) {
                let parsed = DateTime::parse_from_rfc3339(raw).map_err(de::Error::custom)?;
                return Ok(PropertyValue::Date(parsed.with_timezone(&Utc)));
            }
        }

        Ok(PropertyValue::Record(map))
    }
}

/// Serde helpers for optional timestamp fields of typed groups.
///
/// Writes the same `{"$date": ...}` node a [PropertyValue::Date] produces, so
/// typed timestamps and date leaves merged in from an override agree on one
/// shape. Reads the tagged form or a bare RFC 3339 string.
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Stamp {
///     #[serde(default, with = "themekit_theme::value::tagged_date")]
///     at: Option<DateTime<Utc>>,
/// }
///
/// let stamp: Stamp = serde_json::from_str(r#"{"at": {"$date": "2024-01-01T00:00:00Z"}}"#).unwrap();
/// assert!(serde_json::to_string(&stamp).unwrap().contains("$date"));
/// ```
pub mod tagged_date {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    use super::PropertyValue;

    /// Serialize an optional timestamp as a tagged date node.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => PropertyValue::Date(*date).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp from a tagged date node or a string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PropertyValue::deserialize(deserializer)? {
            PropertyValue::Null => Ok(None),
            PropertyValue::Date(date) => Ok(Some(date)),
            PropertyValue::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|date| Some(date.with_timezone(&Utc)))
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a date, found {}",
                other.kind()
            ))),
        }
    }
}
