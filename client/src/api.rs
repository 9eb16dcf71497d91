//! Async operations over the study API.
//!
//! Each method builds one request with `StudyClient`, runs it through the
//! `Transport` exactly once, and parses the response. Nothing is retried or
//! cached, and inputs are never modified.

use std::sync::Arc;

use serde_json::Value;
use study_core::{
    HttpRequest, HttpResponse, NewRecord, NewTopic, RecordId, StudyClient, StudyRecord,
    StudyTopic, TopicId,
};
use tracing::{debug, warn};

use crate::abort::AbortSignal;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct StudyApi {
    core: StudyClient,
    transport: Arc<dyn Transport>,
    abort: Option<AbortSignal>,
}

impl std::fmt::Debug for StudyApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyApi")
            .field("base_url", &self.core.base_url())
            .field("abortable", &self.abort.is_some())
            .finish_non_exhaustive()
    }
}

impl StudyApi {
    /// Build an API over `reqwest` from `config`. Unset fields are filled from
    /// the environment and then defaults.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for malformed configuration and
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let config = config.resolve()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(&config.base_url, Arc::new(transport)))
    }

    /// # Errors
    ///
    /// See [`StudyApi::new`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::default())
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            core: StudyClient::new(base_url),
            transport,
            abort: None,
        }
    }

    /// A copy of this API whose calls fail with `ClientError::Aborted` once
    /// `signal`'s handle aborts.
    pub fn with_abort(&self, signal: AbortSignal) -> Self {
        Self {
            abort: Some(signal),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    // -- records ------------------------------------------------------------

    pub async fn get_records(&self) -> Result<Vec<StudyRecord>, ClientError> {
        let response = self.send(self.core.build_list_records()).await?;
        Ok(self.core.parse_list_records(response)?)
    }

    pub async fn get_record(&self, id: RecordId) -> Result<StudyRecord, ClientError> {
        let response = self.send(self.core.build_get_record(id)).await?;
        Ok(self.core.parse_get_record(response)?)
    }

    pub async fn create_record(&self, record: &NewRecord) -> Result<StudyRecord, ClientError> {
        let response = self.send(self.core.build_create_record(record)?).await?;
        Ok(self.core.parse_create_record(response)?)
    }

    pub async fn update_record(&self, record: &StudyRecord) -> Result<StudyRecord, ClientError> {
        let response = self.send(self.core.build_update_record(record)?).await?;
        Ok(self.core.parse_update_record(response)?)
    }

    /// Update from an untyped payload. Fails with `ApiError::MissingId`
    /// before any I/O if the payload has no `id`.
    pub async fn update_record_json(&self, record: &Value) -> Result<StudyRecord, ClientError> {
        let response = self.send(self.core.build_update_record_json(record)?).await?;
        Ok(self.core.parse_update_record(response)?)
    }

    pub async fn delete_record(&self, id: RecordId) -> Result<(), ClientError> {
        let response = self.send(self.core.build_delete_record(id)).await?;
        Ok(self.core.parse_delete_record(response)?)
    }

    // -- topics -------------------------------------------------------------

    pub async fn get_topics(&self) -> Result<Vec<StudyTopic>, ClientError> {
        let response = self.send(self.core.build_list_topics()).await?;
        Ok(self.core.parse_list_topics(response)?)
    }

    pub async fn get_topic(&self, id: TopicId) -> Result<StudyTopic, ClientError> {
        let response = self.send(self.core.build_get_topic(id)).await?;
        Ok(self.core.parse_get_topic(response)?)
    }

    pub async fn create_topic(&self, topic: &NewTopic) -> Result<StudyTopic, ClientError> {
        let response = self.send(self.core.build_create_topic(topic)?).await?;
        Ok(self.core.parse_create_topic(response)?)
    }

    pub async fn update_topic(&self, topic: &StudyTopic) -> Result<StudyTopic, ClientError> {
        let response = self.send(self.core.build_update_topic(topic)?).await?;
        Ok(self.core.parse_update_topic(response)?)
    }

    pub async fn update_topic_json(&self, topic: &Value) -> Result<StudyTopic, ClientError> {
        let response = self.send(self.core.build_update_topic_json(topic)?).await?;
        Ok(self.core.parse_update_topic(response)?)
    }

    pub async fn delete_topic(&self, id: TopicId) -> Result<(), ClientError> {
        let response = self.send(self.core.build_delete_topic(id)).await?;
        Ok(self.core.parse_delete_topic(response)?)
    }

    // -- transport ----------------------------------------------------------

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "sending request");

        let result = match &self.abort {
            None => self.transport.execute(request).await,
            Some(signal) if signal.is_aborted() => Err(ClientError::Aborted),
            Some(signal) => {
                let mut signal = signal.clone();
                tokio::select! {
                    biased;
                    () = signal.aborted() => Err(ClientError::Aborted),
                    result = self.transport.execute(request) => result,
                }
            }
        };

        match &result {
            Ok(response) => debug!(%method, %path, status = response.status, "response received"),
            Err(ClientError::Aborted) => warn!(%method, %path, "request aborted"),
            Err(err) => warn!(%method, %path, error = %err, "request failed"),
        }
        result
    }
}
