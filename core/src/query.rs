//! Query-string construction from decoded fields.
//!
//! # Design
//! One reserved key, `CFResp`, is a control channel between the host and
//! the adapter: set to `"yes"` it asks for the HTTP response body back in
//! the output buffer. It is never forwarded upstream, whatever its value.
//! All other fields become `key=value` pairs on the configured base URL.
//! Values are percent-encoded with the RFC 3986 unreserved set (the same
//! set curl escapes to); keys pass through untouched — they come from the
//! host's dial plan, not from user input.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Reserved key signalling that the caller wants the response body back.
pub const RESPONSE_CONTROL_KEY: &str = "CFResp";
/// Control-key value that actually requests the body.
pub const RESPONSE_CONTROL_VALUE: &str = "yes";

/// Everything except ALPHA / DIGIT / `-` `.` `_` `~` gets escaped.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Whether the decoded fields ask for the response body.
pub fn response_requested(fields: &BTreeMap<String, String>) -> bool {
    fields
        .get(RESPONSE_CONTROL_KEY)
        .is_some_and(|value| value == RESPONSE_CONTROL_VALUE)
}

/// Build the outbound GET URL from the base URL and the decoded fields.
///
/// Parameters appear in the map's sorted key order, so the same fields
/// always produce the same URL. With no forwardable fields the result is
/// `base?`.
pub fn build_url(base_url: &str, fields: &BTreeMap<String, String>) -> String {
    let mut url = String::with_capacity(base_url.len() + 64);
    url.push_str(base_url);
    url.push('?');

    let mut first = true;
    for (key, value) in fields {
        if key == RESPONSE_CONTROL_KEY {
            continue;
        }
        if !first {
            url.push('&');
        }
        url.push_str(key);
        url.push('=');
        url.extend(utf8_percent_encode(value, QUERY_VALUE_SET));
        first = false;
    }
    url
}
