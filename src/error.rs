// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotatorError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Registry provider rejected our credentials: {0}")]
    ProviderAuth(String),

    #[error("Failed to obtain registry authorization token: {0}")]
    TokenFetch(String),

    #[error("Failed to serialize docker config: {0}")]
    DockerConfig(#[from] serde_json::Error),

    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        name: String,
        namespace: String,
    },

    #[error("Write conflict not resolved after {attempts} attempts: {last}")]
    ConflictExhausted { attempts: usize, last: String },
}

impl RotatorError {
    /// True for a version-mismatch rejection from the API server.
    ///
    /// These are retried inside the optimistic write loop and only
    /// surfaced as [`RotatorError::ConflictExhausted`] once the retry
    /// budget runs out.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RotatorError::Kube(kube::Error::Api(ae)) if ae.code == 409)
    }
}

pub type Result<T> = std::result::Result<T, RotatorError>;
