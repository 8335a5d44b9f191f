//! Opaque join keys shared across independently fetched exports.
//!
//! The advertising API emits identifiers as JSON numbers in one document and
//! numeric strings in another (sitelink mappings are keyed by string). Every
//! id is normalised to its string form so both spellings join.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    /// Interpret a loose JSON value as an id. Empty strings, zero, nulls,
    /// booleans and containers are not ids.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.as_str())),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    (v != 0).then(|| Self(v.to_string()))
                } else if let Some(v) = n.as_i64() {
                    (v != 0).then(|| Self(v.to_string()))
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f != 0.0)
                        .map(|f| Self(format!("{}", f as i64)))
                }
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric interpretation, used for ordering project buckets.
    pub fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        EntityId::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("not an entity id: {value}")))
    }
}

/// Field helper: a present-but-unusable id (null, 0, "") reads as `None`
/// instead of failing the whole record.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(EntityId::from_value))
}
