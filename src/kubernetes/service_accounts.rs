// SPDX-License-Identifier: Apache-2.0

//! Service-account pull-secret patching.

use k8s_openapi::api::core::v1::{LocalObjectReference, ServiceAccount};
use kube::{api::PostParams, Api, Client};
use tracing::{debug, info};

use crate::constants::retry::MAX_CONFLICT_ATTEMPTS;
use crate::error::{Result, RotatorError};
use crate::kubernetes::retry::with_conflict_retry;

/// Check whether the service account already references the pull secret
pub fn references_pull_secret(service_account: &ServiceAccount, secret_name: &str) -> bool {
    service_account
        .image_pull_secrets
        .as_ref()
        .is_some_and(|refs| refs.iter().any(|r| r.name == secret_name))
}

/// Ensure the service account's imagePullSecrets references the secret.
///
/// Idempotent: when the reference is already present no write is
/// performed. Otherwise the name is appended to a copy of the existing
/// list, preserving order, under the same version-checked retry loop as
/// the secret writer. Existing references are never removed.
pub async fn ensure_pull_secret(
    client: &Client,
    namespace: &str,
    service_account: &str,
    secret_name: &str,
) -> Result<()> {
    let api: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);

    with_conflict_retry(MAX_CONFLICT_ATTEMPTS, || {
        let api = api.clone();
        async move {
            let mut current = match api.get(service_account).await {
                Ok(sa) => sa,
                Err(kube::Error::Api(ae)) if ae.code == 404 => {
                    return Err(RotatorError::NotFound {
                        kind: "ServiceAccount",
                        name: service_account.to_string(),
                        namespace: namespace.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            };

            if references_pull_secret(&current, secret_name) {
                debug!(
                    namespace,
                    service_account, secret = secret_name, "Pull secret already referenced"
                );
                return Ok(());
            }

            let mut pull_secrets = current.image_pull_secrets.take().unwrap_or_default();
            pull_secrets.push(LocalObjectReference {
                name: secret_name.to_string(),
            });
            current.image_pull_secrets = Some(pull_secrets);

            api.replace(service_account, &PostParams::default(), &current)
                .await?;
            info!(
                namespace,
                service_account, secret = secret_name, "Attached pull secret"
            );
            Ok(())
        }
    })
    .await
}
