// SPDX-License-Identifier: Apache-2.0

//! Namespace listing and the deduplicating lifecycle watch.

use futures::StreamExt;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use kube_runtime::watcher::{self, Event};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Typed namespace lifecycle notification.
///
/// Decoded once at the watch boundary; consumers never see raw watch
/// events. Only `Observed` drives reconciliation, and it fires at most
/// once per namespace existence regardless of how many resyncs re-report
/// the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEvent {
    Observed(String),
    Updated(String),
    Deleted(String),
}

/// List the names of all namespaces currently in the cluster
pub async fn list_namespace_names(client: &Client) -> Result<Vec<String>> {
    let api: Api<Namespace> = Api::all(client.clone());
    let list = api.list(&ListParams::default()).await?;
    Ok(list.items.iter().map(|ns| ns.name_any()).collect())
}

/// Long-lived namespace watch with periodic full-list resync.
///
/// The kube watcher already re-lists after desyncs; the additional timed
/// resync heals events missed while the stream was degraded and prunes
/// namespaces deleted during an outage from the seen set.
pub struct NamespaceWatcher {
    client: Client,
    resync_interval: Duration,
    event_tx: mpsc::Sender<NamespaceEvent>,
    seen: HashSet<String>,
}

impl NamespaceWatcher {
    pub fn new(
        client: Client,
        resync_interval: Duration,
    ) -> (Self, mpsc::Receiver<NamespaceEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let watcher = Self {
            client,
            resync_interval,
            event_tx,
            seen: HashSet::new(),
        };
        (watcher, event_rx)
    }

    /// Run until the shutdown signal fires.
    ///
    /// Dropping the returned sender on exit closes the event channel, which
    /// is how the downstream consumer learns to stop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let mut stream = watcher::watcher(api.clone(), watcher::Config::default()).boxed();
        let mut resync = tokio::time::interval(self.resync_interval);

        info!("Namespace watcher started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Namespace watcher stopping");
                    break;
                }
                _ = resync.tick() => {
                    if let Err(e) = self.resync(&api).await {
                        warn!("Namespace resync failed: {}", e);
                    }
                }
                event = stream.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(notification) = decode_event(event, &mut self.seen) {
                            self.deliver(notification).await;
                        }
                    }
                    Some(Err(e)) => {
                        // the watcher recovers on its own, just surface it
                        warn!("Namespace watch error: {}", e);
                    }
                    None => {
                        warn!("Namespace watch stream ended");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    /// Full list pass: report unseen namespaces, forget vanished ones
    async fn resync(&mut self, api: &Api<Namespace>) -> Result<()> {
        let listed: HashSet<String> = api
            .list(&ListParams::default())
            .await?
            .items
            .iter()
            .map(|ns| ns.name_any())
            .collect();

        self.seen.retain(|name| listed.contains(name));

        for name in listed {
            if self.seen.insert(name.clone()) {
                debug!(namespace = %name, "Namespace found during resync");
                self.deliver(NamespaceEvent::Observed(name)).await;
            }
        }
        Ok(())
    }

    async fn deliver(&self, event: NamespaceEvent) {
        if self.event_tx.send(event).await.is_err() {
            warn!("Namespace event consumer is gone");
        }
    }
}

/// Turn a raw watch event into at most one typed notification.
///
/// The seen set makes `Observed` fire once per namespace existence: initial
/// population, later applies of known namespaces and re-lists all collapse
/// into `Updated`, while a delete clears the entry so a re-created
/// namespace is observed again.
fn decode_event(event: Event<Namespace>, seen: &mut HashSet<String>) -> Option<NamespaceEvent> {
    match event {
        Event::Apply(ns) | Event::InitApply(ns) => {
            let name = ns.name_any();
            if seen.insert(name.clone()) {
                Some(NamespaceEvent::Observed(name))
            } else {
                Some(NamespaceEvent::Updated(name))
            }
        }
        Event::Delete(ns) => {
            let name = ns.name_any();
            seen.remove(&name);
            Some(NamespaceEvent::Deleted(name))
        }
        Event::Init | Event::InitDone => None,
    }
}
