// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use quartermaster::config::Config;
use quartermaster::kubernetes::NamespaceWatcher;
use quartermaster::registry::{EcrTokenSource, TokenSource};
use quartermaster::sync::{Bootstrapper, RotationLoop};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting quartermaster operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        registry = %config.registry,
        region = %config.region,
        rotation_interval_secs = config.rotation_interval_secs,
        "Configuration loaded"
    );

    // Create Kubernetes client (KUBECONFIG or in-cluster)
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let source: Arc<dyn TokenSource> = Arc::new(EcrTokenSource::new(&config).await);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Watch trigger: namespace events feed the bootstrapper
    let (watcher, event_rx) = NamespaceWatcher::new(client.clone(), config.resync_interval());
    let bootstrapper = Bootstrapper::new(client.clone(), source.clone(), event_rx);

    // Timer trigger: periodic full-cluster rotation
    let rotation = RotationLoop::new(client, source, config.rotation_interval());

    info!("Starting reconciliation loops...");

    let watcher_task = tokio::spawn(watcher.run(shutdown_rx.clone()));
    let bootstrap_task = tokio::spawn(bootstrapper.run());
    let rotation_task = tokio::spawn(rotation.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping");

    // Stops the watcher and rotation loops; the bootstrapper drains and
    // exits once the watcher drops its event sender.
    let _ = shutdown_tx.send(true);

    let (watcher_res, bootstrap_res, rotation_res) =
        tokio::try_join!(watcher_task, bootstrap_task, rotation_task)?;
    watcher_res?;
    bootstrap_res?;
    rotation_res?;

    info!("Shutdown complete");
    Ok(())
}
