//! Record identity and payload types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::{RosterError, RosterResult};

/// Catalog identifier. Dense, 1-indexed, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    /// Create a record ID, rejecting zero.
    pub fn new(raw: u32) -> RosterResult<Self> {
        if raw == 0 {
            return Err(RosterError::invalid_argument(
                "id",
                "record ids start at 1",
            ));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RecordId {
    type Error = RosterError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RecordId> for u32 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().parse::<u32>().map_err(|e| {
            RosterError::invalid_argument("id", format!("{:?} is not a record id: {}", s, e))
        })?;
        Self::new(raw)
    }
}

/// One catalog entry.
///
/// Only `id`, `name` and `thumbnail_url` are interpreted. Every other field
/// the remote sent is kept verbatim in `extra` and handed back to callers
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub thumbnail_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(id: RecordId, name: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            thumbnail_url: thumbnail_url.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Case-insensitive exact comparison against the record name.
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.to_lowercase() == query.to_lowercase()
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary::from(self)
    }
}

/// Remote JSON shape: `{"id": 1, "name": "...", "images": {"sm": "..."}, ...}`.
#[derive(Deserialize)]
struct WireRecord {
    id: u32,
    name: String,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<WireRecord> for Record {
    type Error = String;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let id = RecordId::new(wire.id).map_err(|e| e.to_string())?;
        let thumbnail_url = match wire.thumbnail_url {
            Some(url) => url,
            None => wire
                .rest
                .get("images")
                .and_then(|images| images.get("sm"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| format!("record {} has no images.sm thumbnail", wire.id))?,
        };

        Ok(Self {
            id,
            name: wire.name,
            thumbnail_url,
            extra: wire.rest,
        })
    }
}

/// Listing projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub name: String,
    pub thumbnail_url: String,
}

impl From<&Record> for RecordSummary {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_rejects_zero() {
        assert!(RecordId::new(0).is_err());
        assert_eq!(RecordId::new(731).unwrap().get(), 731);
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!("42".parse::<RecordId>().unwrap().get(), 42);
        assert!(" 7 ".parse::<RecordId>().is_ok());
        assert!("0".parse::<RecordId>().is_err());
        assert!("abc".parse::<RecordId>().is_err());
        assert!("-1".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_decodes_remote_payload() {
        let payload = json!({
            "id": 70,
            "name": "Batman",
            "slug": "70-batman",
            "powerstats": { "intelligence": 100 },
            "images": {
                "xs": "https://cdn.test/xs/70-batman.jpg",
                "sm": "https://cdn.test/sm/70-batman.jpg"
            }
        });

        let record: Record = serde_json::from_value(payload).unwrap();
        assert_eq!(record.id.get(), 70);
        assert_eq!(record.name, "Batman");
        assert_eq!(record.thumbnail_url, "https://cdn.test/sm/70-batman.jpg");
        assert_eq!(record.extra["slug"], json!("70-batman"));
        assert_eq!(record.extra["powerstats"]["intelligence"], json!(100));
        assert!(record.extra.contains_key("images"));
    }

    #[test]
    fn test_record_without_thumbnail_is_malformed() {
        let payload = json!({ "id": 1, "name": "A-Bomb", "images": {} });
        assert!(serde_json::from_value::<Record>(payload).is_err());
    }

    #[test]
    fn test_record_with_zero_id_is_malformed() {
        let payload = json!({ "id": 0, "name": "Nobody", "images": { "sm": "x" } });
        assert!(serde_json::from_value::<Record>(payload).is_err());
    }

    #[test]
    fn test_matches_name_ignores_case() {
        let record = Record::new(RecordId::new(70).unwrap(), "Batman", "thumb");
        assert!(record.matches_name("batman"));
        assert!(record.matches_name("BATMAN"));
        assert!(!record.matches_name("bat"));
        assert!(!record.matches_name("Batman II"));
    }

    #[test]
    fn test_summary_projection() {
        let record = Record::new(RecordId::new(3).unwrap(), "Abe Sapien", "thumb-3")
            .with_extra("slug", json!("3-abe-sapien"));
        let summary = record.summary();
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.name, "Abe Sapien");
        assert_eq!(summary.thumbnail_url, "thumb-3");
    }

    #[test]
    fn test_serialized_record_decodes_again() {
        let record = Record::new(RecordId::new(9).unwrap(), "Agent Bob", "thumb-9")
            .with_extra("slug", json!("9-agent-bob"));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["thumbnail_url"], json!("thumb-9"));
        let decoded: Record = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, record);
    }
}
