// SPDX-License-Identifier: Apache-2.0

//! Pull-secret creation and conflict-safe replacement.

use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::constants::retry::MAX_CONFLICT_ATTEMPTS;
use crate::constants::{DOCKER_CONFIG_KEY, DOCKER_CONFIG_SECRET_TYPE};
use crate::error::{Result, RotatorError};
use crate::kubernetes::retry::with_conflict_retry;

fn registry_secret(name: &str, docker_config: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        string_data: Some(BTreeMap::from([(
            DOCKER_CONFIG_KEY.to_string(),
            docker_config.to_string(),
        )])),
        type_: Some(DOCKER_CONFIG_SECRET_TYPE.to_string()),
        ..Default::default()
    }
}

/// Create the registry secret in a namespace.
///
/// Returns `true` when the secret was created, `false` when one with that
/// name already exists (the caller is expected to fall back to
/// [`update_registry_secret`]). Any other API failure is an error.
pub async fn create_registry_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    docker_config: &str,
) -> Result<bool> {
    let api: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = registry_secret(name, docker_config);

    match api.create(&PostParams::default(), &secret).await {
        Ok(_) => {
            info!(namespace, secret = name, "Created registry secret");
            Ok(true)
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            debug!(namespace, secret = name, "Registry secret already exists");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace the registry secret's payload with a fresh docker config.
///
/// Each attempt re-reads the secret and submits the write under the
/// resourceVersion it just saw, so a concurrent writer is detected by the
/// API server and retried here rather than overwritten. A namespace where
/// the secret has never been created surfaces
/// [`RotatorError::NotFound`]; the caller creates instead.
pub async fn update_registry_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    docker_config: &str,
) -> Result<()> {
    let api: Api<Secret> = Api::namespaced(client.clone(), namespace);

    with_conflict_retry(MAX_CONFLICT_ATTEMPTS, || {
        let api = api.clone();
        async move {
            let mut current = match api.get(name).await {
                Ok(secret) => secret,
                Err(kube::Error::Api(ae)) if ae.code == 404 => {
                    return Err(RotatorError::NotFound {
                        kind: "Secret",
                        name: name.to_string(),
                        namespace: namespace.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            };

            // stringData takes precedence over data server-side, so the
            // stored document is replaced wholesale
            current.string_data = Some(BTreeMap::from([(
                DOCKER_CONFIG_KEY.to_string(),
                docker_config.to_string(),
            )]));

            api.replace(name, &PostParams::default(), &current).await?;
            Ok(())
        }
    })
    .await?;

    info!(namespace, secret = name, "Updated registry secret");
    Ok(())
}
