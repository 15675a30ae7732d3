// SPDX-License-Identifier: Apache-2.0

//! Registry credential rotation: token acquisition and docker config building.

pub mod docker_config;
pub mod ecr;

pub use docker_config::{DockerAuthEntry, DockerConfig, RegistryCredential};
pub use ecr::{EcrTokenSource, TokenSource};

use crate::error::Result;

/// Perform one credential rotation round trip.
///
/// Fetches a fresh token from the provider and renders it as the serialized
/// docker config document. No caching and no retrying happens here; every
/// call yields a materially fresh credential and any provider failure is
/// returned to the caller as-is.
pub async fn rotate_credential(source: &dyn TokenSource) -> Result<String> {
    let credential = source.registry_credentials().await?;
    credential.docker_config_json()
}
