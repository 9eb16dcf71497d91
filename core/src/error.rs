//! Error types for the study API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers routinely distinguish
//! "the record is gone" from "the server returned an unexpected status".
//! Every other non-2xx response lands in `HttpError` with the raw status and
//! body. `MissingId` / `InvalidId` are raised while building a request, before
//! any I/O, so a malformed item path is never produced.

/// Errors returned by `StudyClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// An update payload carried no `id`.
    #[error("{resource} payload has no id")]
    MissingId { resource: &'static str },

    /// An update payload carried an `id` that is not a resource identifier.
    #[error("{resource} payload has invalid id {value}")]
    InvalidId { resource: &'static str, value: String },
}
