//! # Configuration Settings
//!
//! Settings for the extension engine. These are the knobs the engine bakes
//! into wire descriptors: the sandboxed VM runtime identifier, the placeholder
//! upstream cluster recorded on remote code sources, and the remote fetch
//! timeout. All of them have working defaults; `from_env` layers `WASMPLANE_*`
//! environment variables on top.

use crate::errors::{Error, Result};
use serde::Deserialize;
use validator::Validate;

/// Default sandboxed execution engine for wasm extensions.
pub const DEFAULT_VM_RUNTIME: &str = "envoy.wasm.runtime.v8";

/// Placeholder upstream cluster recorded on remote code sources. The binary is
/// fetched out-of-band by the discovery-subscribing agent, so the cluster is
/// never resolved by the proxy itself.
pub const DEFAULT_REMOTE_FETCH_CLUSTER: &str = "_wasm_remote_placeholder";

/// Fetch timeout attached to remote code sources, in seconds.
pub const DEFAULT_REMOTE_FETCH_TIMEOUT_SECS: u64 = 10;

/// Settings baked into extension descriptors during a generation pass.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ExtensionSettings {
    /// VM runtime identifier stamped on every descriptor
    #[validate(length(min = 1, message = "VM runtime cannot be empty"))]
    pub vm_runtime: String,

    /// Upstream cluster name recorded on remote code sources
    #[validate(length(min = 1, message = "Remote fetch cluster cannot be empty"))]
    pub remote_fetch_cluster: String,

    /// Timeout for out-of-band remote code fetches, in seconds
    #[validate(range(min = 1, max = 300, message = "Fetch timeout must be between 1 and 300 seconds"))]
    pub remote_fetch_timeout_secs: u64,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            vm_runtime: DEFAULT_VM_RUNTIME.to_string(),
            remote_fetch_cluster: DEFAULT_REMOTE_FETCH_CLUSTER.to_string(),
            remote_fetch_timeout_secs: DEFAULT_REMOTE_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ExtensionSettings {
    /// Load settings from `WASMPLANE_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let loaded = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("WASMPLANE").separator("__"))
            .build()
            .map_err(|e| Error::config(format!("Failed to read environment: {}", e)))?;

        let settings: ExtensionSettings = loaded
            .try_deserialize()
            .map_err(|e| Error::config(format!("Invalid extension settings: {}", e)))?;

        settings.validate_settings()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate_settings(&self) -> Result<()> {
        Validate::validate(self)
            .map_err(|e| Error::config(format!("Invalid extension settings: {}", e)))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing filter directive, e.g. "info" or "wasmplane=debug,info"
    pub log_level: String,

    /// Emit JSON-formatted log lines instead of the human-readable format
    pub json_format: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_format: false }
    }
}
