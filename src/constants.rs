// SPDX-License-Identifier: Apache-2.0

/// Name of the pull secret maintained in every namespace
pub const SECRET_NAME: &str = "regcred";

/// Key under which the docker config document is stored in the secret
pub const DOCKER_CONFIG_KEY: &str = ".dockerconfigjson";

/// Kubernetes secret type for registry config secrets
pub const DOCKER_CONFIG_SECRET_TYPE: &str = "kubernetes.io/dockerconfigjson";

/// Service account that receives the pull-secret reference
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Environment variables read at startup
pub mod env_vars {
    pub const ECR_REGISTRY: &str = "ECR_REGISTRY";
    pub const REGION: &str = "REGION";
    pub const ACCESS_KEY_ID: &str = "ACCESS_KEY_ID";
    pub const SECRET_ACCESS_KEY: &str = "SECRET_ACCESS_KEY";
    pub const ROTATION_INTERVAL_SECS: &str = "ROTATION_INTERVAL_SECS";
    pub const RESYNC_INTERVAL_SECS: &str = "RESYNC_INTERVAL_SECS";
}

/// Fallback values for optional configuration
pub mod defaults {
    pub const REGION: &str = "us-east-1";
    /// Rotation period in seconds, well inside the 12h ECR token validity
    pub const ROTATION_INTERVAL_SECS: u64 = 660;
    /// Namespace watch full-list resync period in seconds
    pub const RESYNC_INTERVAL_SECS: u64 = 60;
}

/// Optimistic-concurrency retry configuration
pub mod retry {
    /// Maximum attempts before a write conflict is surfaced
    pub const MAX_CONFLICT_ATTEMPTS: usize = 5;
    /// Base backoff between conflict retries in milliseconds
    pub const CONFLICT_BACKOFF_MS: u64 = 100;
}
