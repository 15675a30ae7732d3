// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access: conflict-safe writers and the namespace watch.

pub mod namespaces;
pub mod retry;
pub mod secrets;
pub mod service_accounts;

pub use namespaces::{list_namespace_names, NamespaceEvent, NamespaceWatcher};
pub use retry::with_conflict_retry;
pub use secrets::{create_registry_secret, update_registry_secret};
pub use service_accounts::ensure_pull_secret;
