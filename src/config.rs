// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::constants::{defaults, env_vars};

/// Operator configuration loaded from environment variables
///
/// Cluster access itself is not configured here: `kube::Client::try_default`
/// honors `KUBECONFIG` when set and falls back to the in-cluster service
/// account config otherwise.
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry host the rotated credentials are scoped to,
    /// e.g. `123456789012.dkr.ecr.us-east-1.amazonaws.com`
    pub registry: String,
    /// AWS region of the registry
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Period between full-cluster credential rotations
    pub rotation_interval_secs: u64,
    /// Period between namespace watch full-list resyncs
    pub resync_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let registry = env::var(env_vars::ECR_REGISTRY)
            .with_context(|| format!("{} environment variable not set", env_vars::ECR_REGISTRY))?;
        let region =
            env::var(env_vars::REGION).unwrap_or_else(|_| defaults::REGION.to_string());
        let access_key_id = env::var(env_vars::ACCESS_KEY_ID)
            .with_context(|| format!("{} environment variable not set", env_vars::ACCESS_KEY_ID))?;
        let secret_access_key = env::var(env_vars::SECRET_ACCESS_KEY).with_context(|| {
            format!("{} environment variable not set", env_vars::SECRET_ACCESS_KEY)
        })?;

        let rotation_interval_secs =
            parse_secs(env_vars::ROTATION_INTERVAL_SECS, defaults::ROTATION_INTERVAL_SECS)?;
        let resync_interval_secs =
            parse_secs(env_vars::RESYNC_INTERVAL_SECS, defaults::RESYNC_INTERVAL_SECS)?;

        Ok(Config {
            registry,
            region,
            access_key_id,
            secret_access_key,
            rotation_interval_secs,
            resync_interval_secs,
        })
    }

    pub fn rotation_interval(&self) -> Duration {
        Duration::from_secs(self.rotation_interval_secs)
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }
}

fn parse_secs(var: &str, fallback: u64) -> Result<u64> {
    match env::var(var) {
        Ok(v) => v
            .parse::<u64>()
            .with_context(|| format!("{} must be a number of seconds, got {:?}", var, v)),
        Err(_) => Ok(fallback),
    }
}
