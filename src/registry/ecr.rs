// SPDX-License-Identifier: Apache-2.0

//! AWS ECR token source.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ecr::Client as EcrClient;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, RotatorError};
use crate::registry::RegistryCredential;

/// Source of short-lived registry credentials.
///
/// The trait seam exists so the rotation paths can be exercised in tests
/// without an AWS round trip.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh credential from the provider. Never cached.
    async fn registry_credentials(&self) -> Result<RegistryCredential>;
}

/// Token source backed by the ECR `GetAuthorizationToken` API
pub struct EcrTokenSource {
    client: EcrClient,
    registry: String,
}

impl EcrTokenSource {
    /// Build a source authenticating with the static key pair from config
    pub async fn new(config: &Config) -> Self {
        let credentials = aws_sdk_ecr::config::Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "static",
        );
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            client: EcrClient::new(&aws_config),
            registry: config.registry.clone(),
        }
    }
}

#[async_trait]
impl TokenSource for EcrTokenSource {
    async fn registry_credentials(&self) -> Result<RegistryCredential> {
        debug!(registry = %self.registry, "Requesting ECR authorization token");

        let response = self
            .client
            .get_authorization_token()
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let auth_data = response
            .authorization_data()
            .first()
            .ok_or_else(|| RotatorError::TokenFetch("no authorization data returned".into()))?;

        let token = auth_data
            .authorization_token()
            .ok_or_else(|| RotatorError::TokenFetch("authorization data carries no token".into()))?;

        // The ECR token is base64 of "AWS:<password>"
        let decoded = BASE64
            .decode(token)
            .map_err(|e| RotatorError::TokenFetch(format!("token is not valid base64: {}", e)))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| RotatorError::TokenFetch(format!("token is not valid UTF-8: {}", e)))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| RotatorError::TokenFetch("token is not of the form user:password".into()))?;

        Ok(RegistryCredential {
            registry: self.registry.clone(),
            username: username.to_string(),
            token: password.to_string(),
        })
    }
}

/// Split provider failures into bad-credentials vs everything else
fn classify_sdk_error<E, R>(err: aws_sdk_ecr::error::SdkError<E, R>) -> RotatorError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = err.code().unwrap_or_default().to_string();
    let message = DisplayErrorContext(err).to_string();
    match code.as_str() {
        "UnrecognizedClientException"
        | "InvalidClientTokenId"
        | "InvalidSignatureException"
        | "AccessDeniedException" => RotatorError::ProviderAuth(message),
        _ => RotatorError::TokenFetch(message),
    }
}
