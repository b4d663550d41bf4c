//! Configuration source for the dispatcher.
//!
//! # Design
//! Settings come from a JSON file next to the deployment (path taken from
//! the `CALLBRIDGE_CONFIG` env var, falling back to `callbridge.json` in
//! the working directory). A missing or unparseable file silently falls
//! back to the compiled-in defaults — the host keeps running with a
//! reachable endpoint rather than failing every call over a config typo.
//! The file is read once per process behind a `OnceLock`; this is the
//! adapter's only process-wide shared state.

use std::sync::OnceLock;

use serde::Deserialize;

/// Env var naming the config file path.
pub const CONFIG_PATH_VAR: &str = "CALLBRIDGE_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "callbridge.json";

const DEFAULT_BASE_URL: &str = "https://localhost/api/index.php";
// The host kills the call at 5s; stay comfortably below it.
const DEFAULT_TIMEOUT_SECONDS: u64 = 4;
const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 2;

/// Settings for one outbound request. Immutable for the life of a call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Base URL the query string is appended to.
    pub base_url: String,
    /// Overall request timeout in seconds.
    pub timeout_seconds: u64,
    /// Connect-phase timeout in seconds.
    pub connect_timeout_seconds: u64,
    /// Verify the server's TLS certificate and hostname.
    pub verify_tls: bool,
    /// Optional PEM file used as the trust anchor instead of the system
    /// roots.
    pub tls_cert_path: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            verify_tls: true,
            tls_cert_path: None,
        }
    }
}

impl RequestConfig {
    /// Parse a config from its JSON text. Absent keys take defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Load the configuration from disk, falling back to defaults.
pub fn load() -> RequestConfig {
    let path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    match std::fs::read_to_string(&path) {
        Ok(text) => RequestConfig::from_json(&text).unwrap_or_default(),
        Err(_) => RequestConfig::default(),
    }
}

/// The process-wide configuration, loaded on first use.
pub fn get() -> &'static RequestConfig {
    static CONFIG: OnceLock<RequestConfig> = OnceLock::new();
    CONFIG.get_or_init(load)
}
