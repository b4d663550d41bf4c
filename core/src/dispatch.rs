//! Blocking HTTP dispatch for the built URL.
//!
//! # Design
//! One GET per call, on the calling thread, with a fresh agent each time —
//! there is no pooling and no state survives the call. Timeouts, redirect
//! cap, and TLS policy come from [`RequestConfig`]. Failures split into
//! two classes: the agent could not be set up (`ClientInitFailed`, today
//! only a bad trust-anchor file) and the network attempt failed
//! (`TransportFailed`). Status interpretation is left to the caller, so
//! ureq's status-as-error behavior is switched off.

use std::time::Duration;

use ureq::tls::{Certificate, RootCerts, TlsConfig};
use ureq::Agent;

use crate::config::RequestConfig;
use crate::error::AdapterError;

/// Redirect-following cap, bounded to avoid loops.
pub const MAX_REDIRECTS: u32 = 3;

/// Outcome of a successful transport round-trip. The status may still be
/// an HTTP-level failure.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Issue a GET against `url` and collect the status and full body.
pub fn dispatch(url: &str, config: &RequestConfig) -> Result<HttpReply, AdapterError> {
    let agent = build_agent(config)?;
    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| AdapterError::TransportFailed(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| AdapterError::TransportFailed(e.to_string()))?;

    Ok(HttpReply { status, body })
}

/// Construct the per-call agent from the configuration.
fn build_agent(config: &RequestConfig) -> Result<Agent, AdapterError> {
    let mut tls = TlsConfig::builder().disable_verification(!config.verify_tls);

    if let Some(path) = &config.tls_cert_path {
        let pem = std::fs::read(path).map_err(|e| {
            AdapterError::ClientInitFailed(format!("cannot read trust anchor {path}: {e}"))
        })?;
        let cert = Certificate::from_pem(&pem)
            .map_err(|e| {
                AdapterError::ClientInitFailed(format!("invalid trust anchor {path}: {e}"))
            })?
            .to_owned();
        tls = tls.root_certs(RootCerts::new_with_certs(&[cert]));
    }

    Ok(Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
        .timeout_connect(Some(Duration::from_secs(config.connect_timeout_seconds)))
        .max_redirects(MAX_REDIRECTS)
        .tls_config(tls.build())
        .build()
        .new_agent())
}
