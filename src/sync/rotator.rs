// SPDX-License-Identifier: Apache-2.0

//! Timer-driven full-cluster credential rotation.

use kube::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::constants::{DEFAULT_SERVICE_ACCOUNT, SECRET_NAME};
use crate::error::{Result, RotatorError};
use crate::kubernetes::{
    create_registry_secret, ensure_pull_secret, list_namespace_names, update_registry_secret,
};
use crate::registry::{rotate_credential, TokenSource};

/// Periodic trigger: every interval, one fresh token fanned out to the
/// secret of every namespace in the cluster.
pub struct RotationLoop {
    client: Client,
    source: Arc<dyn TokenSource>,
    interval: Duration,
}

impl RotationLoop {
    pub fn new(client: Client, source: Arc<dyn TokenSource>, interval: Duration) -> Self {
        Self {
            client,
            source,
            interval,
        }
    }

    /// Run until the shutdown signal fires. The first rotation happens
    /// immediately so a restarted operator repairs stale secrets without
    /// waiting out a full period.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        info!(interval_secs = self.interval.as_secs(), "Rotation loop started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Rotation loop stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.rotate_all().await {
                        // the next firing is the retry mechanism
                        error!("Rotation cycle failed: {}", e);
                    }
                }
            }
        }

        Ok(())
    }

    /// One full rotation cycle.
    ///
    /// A provider failure aborts the cycle before any secret is touched,
    /// leaving every namespace at its previous data. Per-namespace write
    /// failures are logged and do not stop the fan-out to the rest.
    #[instrument(skip(self))]
    pub async fn rotate_all(&self) -> Result<()> {
        let docker_config = rotate_credential(self.source.as_ref()).await?;
        let namespaces = list_namespace_names(&self.client).await?;

        info!(count = namespaces.len(), "Rotating registry secret in all namespaces");

        for namespace in &namespaces {
            if let Err(e) = self.rotate_namespace(namespace, &docker_config).await {
                error!(namespace = %namespace, "Failed to rotate registry secret: {}", e);
            }
        }

        Ok(())
    }

    async fn rotate_namespace(&self, namespace: &str, docker_config: &str) -> Result<()> {
        match update_registry_secret(&self.client, namespace, SECRET_NAME, docker_config).await {
            Ok(()) => Ok(()),
            // the secret was never bootstrapped here, create it now
            Err(RotatorError::NotFound { .. }) => {
                create_registry_secret(&self.client, namespace, SECRET_NAME, docker_config)
                    .await?;
                ensure_pull_secret(&self.client, namespace, DEFAULT_SERVICE_ACCOUNT, SECRET_NAME)
                    .await
            }
            Err(e) => Err(e),
        }
    }
}
