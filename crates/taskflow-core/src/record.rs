use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One row of a backend table, keyed by field name.
pub type Record = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "Id";
pub const CREATED_ON_FIELD: &str = "CreatedOn";
pub const CREATED_BY_FIELD: &str = "CreatedBy";
pub const MODIFIED_ON_FIELD: &str = "ModifiedOn";

/// Opaque record identifier. The backend hands out numbers, but string ids
/// are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.clone()),
        }
    }

    /// Reads the id out of a record, if it carries one.
    pub fn from_record(record: &Record) -> Option<Self> {
        match record.get(ID_FIELD)? {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// Loose equality against a stored `Id` value: `7` matches `"7"`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (RecordId::Int(n), Value::Number(v)) => v.as_i64() == Some(*n),
            (RecordId::Int(n), Value::String(v)) => v.parse::<i64>().ok() == Some(*n),
            (RecordId::Text(s), Value::String(v)) => s == v,
            (RecordId::Text(s), Value::Number(v)) => s == &v.to_string(),
            _ => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|never| match never {})
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::from(s.as_str())
    }
}

/// A page of records as returned by a read, with the unpaged match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub total: u64,
}

impl RecordPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Builds a record from a JSON object literal; anything else yields an empty record.
pub fn record_from_value(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
