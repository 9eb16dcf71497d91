//! Stateless HTTP request builder and response parser for the study API.
//!
//! # Design
//! `StudyClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round trip, keeping this crate free of I/O.
//!
//! Collections live at `{base}/records/` and `{base}/topics/`; single items
//! at `{base}/records/{id}/`. The trailing slash is part of the backend's
//! routes and is always emitted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewRecord, NewTopic, RecordId, StudyRecord, StudyTopic, TopicId};

const RECORDS: &str = "records";
const TOPICS: &str = "topics";

/// Synchronous, stateless client for the study API.
#[derive(Debug, Clone)]
pub struct StudyClient {
    base_url: String,
}

impl StudyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- records ------------------------------------------------------------

    pub fn build_list_records(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, self.collection(RECORDS))
    }

    pub fn build_get_record(&self, id: RecordId) -> HttpRequest {
        self.bare(HttpMethod::Get, self.item(RECORDS, id))
    }

    pub fn build_create_record(&self, input: &NewRecord) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, self.collection(RECORDS), input)
    }

    /// PATCH the full record (including `id`) to `records/{id}/`.
    pub fn build_update_record(&self, record: &StudyRecord) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Patch, self.item(RECORDS, record.id), record)
    }

    /// Same as [`build_update_record`](Self::build_update_record) for an
    /// untyped payload. The `id` is read from the payload and must be present.
    pub fn build_update_record_json(&self, payload: &Value) -> Result<HttpRequest, ApiError> {
        let id = payload_id(payload, RECORDS)?;
        self.with_body(HttpMethod::Patch, self.item(RECORDS, id), payload)
    }

    pub fn build_delete_record(&self, id: RecordId) -> HttpRequest {
        self.bare(HttpMethod::Delete, self.item(RECORDS, id))
    }

    pub fn parse_list_records(&self, response: HttpResponse) -> Result<Vec<StudyRecord>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_record(&self, response: HttpResponse) -> Result<StudyRecord, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- topics -------------------------------------------------------------

    pub fn build_list_topics(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, self.collection(TOPICS))
    }

    pub fn build_get_topic(&self, id: TopicId) -> HttpRequest {
        self.bare(HttpMethod::Get, self.item(TOPICS, id))
    }

    pub fn build_create_topic(&self, input: &NewTopic) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Post, self.collection(TOPICS), input)
    }

    pub fn build_update_topic(&self, topic: &StudyTopic) -> Result<HttpRequest, ApiError> {
        self.with_body(HttpMethod::Patch, self.item(TOPICS, topic.id), topic)
    }

    pub fn build_update_topic_json(&self, payload: &Value) -> Result<HttpRequest, ApiError> {
        let id = payload_id(payload, TOPICS)?;
        self.with_body(HttpMethod::Patch, self.item(TOPICS, id), payload)
    }

    pub fn build_delete_topic(&self, id: TopicId) -> HttpRequest {
        self.bare(HttpMethod::Delete, self.item(TOPICS, id))
    }

    pub fn parse_list_topics(&self, response: HttpResponse) -> Result<Vec<StudyTopic>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_topic(&self, response: HttpResponse) -> Result<StudyTopic, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_topic(&self, response: HttpResponse) -> Result<StudyTopic, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_topic(&self, response: HttpResponse) -> Result<StudyTopic, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_topic(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- helpers ------------------------------------------------------------

    fn collection(&self, resource: &str) -> String {
        format!("{}/{resource}/", self.base_url)
    }

    fn item(&self, resource: &str, id: impl std::fmt::Display) -> String {
        format!("{}/{resource}/{id}/", self.base_url)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Read the item id out of an untyped payload. Accepts a non-negative
/// integer or a string of digits; absent and `null` are both "missing".
fn payload_id(payload: &Value, resource: &'static str) -> Result<u64, ApiError> {
    match payload.get("id") {
        None | Some(Value::Null) => Err(ApiError::MissingId { resource }),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| ApiError::InvalidId {
            resource,
            value: n.to_string(),
        }),
        Some(Value::String(s)) => s.parse::<u64>().map_err(|_| ApiError::InvalidId {
            resource,
            value: s.clone(),
        }),
        Some(other) => Err(ApiError::InvalidId {
            resource,
            value: other.to_string(),
        }),
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
