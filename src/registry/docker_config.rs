// SPDX-License-Identifier: Apache-2.0

//! Docker config document construction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// A freshly rotated registry credential.
///
/// Lives for one rotation cycle and is never persisted by the operator;
/// the only durable form is the rendered docker config stored in each
/// namespace's pull secret.
#[derive(Debug, Clone)]
pub struct RegistryCredential {
    pub registry: String,
    pub username: String,
    pub token: String,
}

/// The `{"auths": {...}}` document consumed by container runtimes
#[derive(Debug, Serialize, Deserialize)]
pub struct DockerConfig {
    pub auths: BTreeMap<String, DockerAuthEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DockerAuthEntry {
    /// base64 of `username:token`
    pub auth: String,
}

impl RegistryCredential {
    /// Render the credential as a serialized docker config document,
    /// scoped to exactly this one registry.
    pub fn docker_config_json(&self) -> Result<String> {
        let auth = BASE64.encode(format!("{}:{}", self.username, self.token));
        let config = DockerConfig {
            auths: BTreeMap::from([(self.registry.clone(), DockerAuthEntry { auth })]),
        };
        Ok(serde_json::to_string(&config)?)
    }
}
