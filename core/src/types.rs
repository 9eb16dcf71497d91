//! Domain DTOs for the study API.
//!
//! # Design
//! Creation payloads (`NewRecord`, `NewTopic`) have no `id`; the server
//! assigns it. Update operations take the full `StudyRecord` / `StudyTopic`,
//! whose `id` is not optional, so an update without an id does not compile.
//!
//! Every type carries a flattened `extra` map. Fields the client does not
//! model survive a decode/encode cycle unchanged, which keeps the client a
//! transparent conduit for whatever the backend adds later.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier of a study record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

/// Server-assigned identifier of a study topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

impl From<u64> for TopicId {
    fn from(id: u64) -> Self {
        TopicId(id)
    }
}

/// A study topic as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTopic {
    pub id: TopicId,
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request payload for creating a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTopic {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewTopic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }
}

/// A single study session as returned by the API.
///
/// `minutes` is time actually studied, `planned_minutes` the time planned
/// for the session. `date` is an ISO `YYYY-MM-DD` string.
///
/// Every modelled field is required on decode (`memo` may be `null`), so a
/// record written back carries only fields the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: RecordId,
    pub topic: TopicId,
    pub date: String,
    pub minutes: i64,
    pub planned_minutes: i64,
    #[serde(deserialize_with = "nullable")]
    pub memo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request payload for creating a study record. Omitted fields take the
/// server's defaults (today for `date`, zero for the minute counters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub topic: TopicId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewRecord {
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            date: None,
            minutes: None,
            planned_minutes: None,
            memo: None,
            extra: Map::new(),
        }
    }
}

/// Decode an `Option` without serde's implicit "missing means `None`".
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
