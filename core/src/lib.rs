//! Synchronous API client core for the study tracker service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round trip, so everything here is deterministic and testable.
//!
//! # Design
//! - `StudyClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Payload types keep unknown fields, so bodies pass through unchanged.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - `routes` holds the front end's static route table.

pub mod client;
pub mod error;
pub mod http;
pub mod routes;
pub mod types;

pub use client::StudyClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::{HistoryMode, Route, RouteTable, View};
pub use types::{NewRecord, NewTopic, RecordId, StudyRecord, StudyTopic, TopicId};
