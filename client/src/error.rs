//! Errors surfaced by the async study API.

use study_core::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered, but not with what the operation expects, or the
    /// request could not be built.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network unreachable, DNS failure, timeout. No HTTP status exists.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call's abort signal fired before the response arrived.
    #[error("request aborted")]
    Aborted,

    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of the failure, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(ApiError::NotFound) => Some(404),
            ClientError::Api(ApiError::HttpError { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
