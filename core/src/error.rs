//! Error taxonomy for the adapter.
//!
//! # Design
//! Each variant corresponds to a distinct stage of the call pipeline, and
//! each carries a stable integer status code the host runtime branches on.
//! The `Display` text is what `last_error_message` hands back to the host
//! for diagnostics, so messages name the concrete condition (status code,
//! byte counts, file path) rather than the pipeline stage.

use std::fmt;

/// Status code reported for a successful call.
pub const STATUS_SUCCESS: i32 = 0;

/// Errors produced by the call pipeline.
///
/// Variants are ordered by where in the pipeline the call stopped:
/// input decoding, client setup, the network attempt, HTTP status
/// interpretation, and finally the catch-all for panics caught at the
/// FFI boundary.
#[derive(Debug)]
pub enum AdapterError {
    /// The input buffer was null, had a non-numeric count header, or was
    /// shorter than its declared field count requires.
    InvalidInput(String),

    /// The declared field count exceeds the allowed limit.
    TooManyParameters { count: usize, limit: usize },

    /// The HTTP client could not be constructed (e.g. unreadable or
    /// malformed trust-anchor file).
    ClientInitFailed(String),

    /// The network attempt failed: DNS, connect, timeout, TLS handshake,
    /// or reading the response body.
    TransportFailed(String),

    /// Transport succeeded but the server answered outside 200-299.
    HttpStatusError(u16),

    /// A panic or other unforeseen failure caught at the entry boundary.
    UnexpectedFailure(String),
}

impl AdapterError {
    /// The integer code reported to the host for this error.
    pub fn status_code(&self) -> i32 {
        match self {
            AdapterError::InvalidInput(_) => 1,
            AdapterError::TooManyParameters { .. } => 2,
            AdapterError::ClientInitFailed(_) => 3,
            AdapterError::TransportFailed(_) => 4,
            AdapterError::HttpStatusError(_) => 5,
            AdapterError::UnexpectedFailure(_) => 6,
        }
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AdapterError::TooManyParameters { count, limit } => {
                write!(f, "too many parameters: {count} exceeds limit of {limit}")
            }
            AdapterError::ClientInitFailed(msg) => {
                write!(f, "HTTP client initialization failed: {msg}")
            }
            AdapterError::TransportFailed(msg) => write!(f, "transport error: {msg}"),
            AdapterError::HttpStatusError(status) => {
                write!(f, "HTTP error: received status code {status}")
            }
            AdapterError::UnexpectedFailure(msg) => write!(f, "unexpected failure: {msg}"),
        }
    }
}

impl std::error::Error for AdapterError {}
