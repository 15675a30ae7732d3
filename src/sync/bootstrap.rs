// SPDX-License-Identifier: Apache-2.0

//! Watch-driven per-namespace credential bootstrap.

use kube::Client;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::constants::{DEFAULT_SERVICE_ACCOUNT, SECRET_NAME};
use crate::error::Result;
use crate::kubernetes::{
    create_registry_secret, ensure_pull_secret, update_registry_secret, NamespaceEvent,
};
use crate::registry::{rotate_credential, TokenSource};

/// Event trigger: every newly observed namespace gets a fresh credential
/// and its default service account wired up to pull with it.
pub struct Bootstrapper {
    client: Client,
    source: Arc<dyn TokenSource>,
    event_rx: mpsc::Receiver<NamespaceEvent>,
}

impl Bootstrapper {
    pub fn new(
        client: Client,
        source: Arc<dyn TokenSource>,
        event_rx: mpsc::Receiver<NamespaceEvent>,
    ) -> Self {
        Self {
            client,
            source,
            event_rx,
        }
    }

    /// Consume namespace events until the watcher drops the sender.
    ///
    /// A failed bootstrap is logged and not retried here; the rotation
    /// timer repairs any namespace left without a current secret.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Bootstrapper started, waiting for namespace events");

        while let Some(event) = self.event_rx.recv().await {
            match event {
                NamespaceEvent::Observed(namespace) => {
                    if let Err(e) = self.bootstrap_namespace(&namespace).await {
                        error!(namespace = %namespace, "Failed to bootstrap namespace: {}", e);
                    }
                }
                NamespaceEvent::Updated(namespace) => {
                    debug!(namespace = %namespace, "Namespace updated, nothing to do");
                }
                NamespaceEvent::Deleted(namespace) => {
                    debug!(namespace = %namespace, "Namespace deleted, its secret goes with it");
                }
            }
        }

        info!("Bootstrapper stopped");
        Ok(())
    }

    /// Bring one namespace to the desired state: a current `regcred`
    /// secret referenced by the `default` service account.
    ///
    /// A secret already present (e.g. racing a timer firing) is an
    /// expected conflict, answered by falling back to an update. The
    /// pull-secret patch only runs after a successful write.
    #[instrument(skip(self))]
    pub async fn bootstrap_namespace(&self, namespace: &str) -> Result<()> {
        let docker_config = rotate_credential(self.source.as_ref()).await?;

        let created =
            create_registry_secret(&self.client, namespace, SECRET_NAME, &docker_config).await?;
        if !created {
            update_registry_secret(&self.client, namespace, SECRET_NAME, &docker_config).await?;
        }

        ensure_pull_secret(&self.client, namespace, DEFAULT_SERVICE_ACCOUNT, SECRET_NAME).await?;

        info!(namespace, "Namespace bootstrapped with registry credentials");
        Ok(())
    }
}
