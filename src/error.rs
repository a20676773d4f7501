//! Error types for the node labeler

use thiserror::Error;

/// Errors raised while reconciling a node label
#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// HTTP status code returned by the API server, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::KubeError(kube::Error::Api(resp)) => Some(resp.code),
            _ => None,
        }
    }

    /// True when the API server reported the node as missing
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// True when the patch lost a race with a concurrent writer
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}
