//! Constants used throughout the IPC core crate.

/// Environment variable naming an override body-site taxonomy YAML file.
pub const TAXONOMY_ENV_VAR: &str = "IPC_BODY_SITE_TAXONOMY";

/// Environment variable for the REST server bind address.
pub const REST_ADDR_ENV_VAR: &str = "IPC_REST_ADDR";

/// Default REST server bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Largest taxonomy override file accepted at startup.
pub const MAX_TAXONOMY_FILE_BYTES: u64 = 1024 * 1024; // 1 MiB
