//! Async client for the study tracker API.
//!
//! # Overview
//! `StudyApi` pairs the I/O-free `study_core::StudyClient` with a
//! `Transport` that performs the round trip. The default transport is
//! `reqwest`; tests swap in a fake.
//!
//! ```no_run
//! # async fn demo() -> Result<(), study_client::ClientError> {
//! use study_client::{ClientConfig, NewTopic, StudyApi};
//!
//! let api = StudyApi::new(ClientConfig::new("http://localhost:8000/api/"))?;
//! let topic = api.create_topic(&NewTopic::new("Algebra")).await?;
//! for record in api.get_records().await? {
//!     println!("{} {} min", record.date, record.minutes);
//! }
//! # let _ = topic;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - No global instance: callers construct a `StudyApi` and pass it around.
//!   It is cheap to clone and shares one connection pool.
//! - One call, one request. No retries, caching or deduplication.
//! - `with_abort` attaches an `AbortSignal` so in-flight calls can be
//!   cancelled.

pub mod abort;
pub mod api;
pub mod config;
pub mod error;
pub mod transport;

pub use abort::{AbortHandle, AbortSignal};
pub use api::StudyApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use transport::{ReqwestTransport, Transport};

pub use study_core::{
    ApiError, NewRecord, NewTopic, RecordId, RouteTable, StudyRecord, StudyTopic, TopicId,
};
