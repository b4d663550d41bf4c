//! Buffer-to-HTTP adapter core for a contact-center host runtime.
//!
//! # Overview
//! The host hands over a fixed-width key/value buffer; the adapter decodes
//! it, forwards the fields as a GET query string to a configured endpoint,
//! and — when the `CFResp` control field asks for it — copies the response
//! body back into a fixed-width output buffer. The host only sees an
//! integer status code; the descriptive message for the most recent call
//! is kept per thread and fetched on demand.
//!
//! # Design
//! - Every call is synchronous and self-contained: decode, build URL,
//!   dispatch, classify, optionally encode. No state crosses calls except
//!   the per-thread message slot and the once-per-process configuration.
//! - All failures funnel through [`AdapterError`], whose variants map 1:1
//!   to the status codes the host understands.
//! - `process` is the host-facing entry (global config); `process_call`
//!   takes an explicit config so tests can point at a local server.

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod query;

use std::cell::RefCell;

pub use config::RequestConfig;
pub use dispatch::HttpReply;
pub use error::{AdapterError, STATUS_SUCCESS};
pub use query::{RESPONSE_CONTROL_KEY, RESPONSE_CONTROL_VALUE};

/// Message reported before any call has run on the current thread.
pub const NO_CALL_MESSAGE: &str = "no call has been made on this thread";
const SUCCESS_MESSAGE: &str = "OK";

thread_local! {
    static LAST_MESSAGE: RefCell<String> = RefCell::new(String::from(NO_CALL_MESSAGE));
}

/// Process one host call using the process-wide configuration.
///
/// `input` is `None` when the host passed a null buffer. `output`, when
/// present, must provide [`buffer::OUTPUT_LEN`] bytes; it is written only
/// on a successful call that requested the response body, and left
/// untouched otherwise. Returns the status code and records the message
/// for [`last_error_message`].
pub fn process(input: Option<&[u8]>, output: Option<&mut [u8]>) -> i32 {
    process_call(input, output, config::get())
}

/// Same as [`process`] but with an explicit configuration.
pub fn process_call(
    input: Option<&[u8]>,
    output: Option<&mut [u8]>,
    config: &RequestConfig,
) -> i32 {
    let result = match input {
        None => Err(AdapterError::InvalidInput("input buffer is null".to_string())),
        Some(buf) => execute(buf, output, config),
    };
    match result {
        Ok(()) => {
            set_last_message(SUCCESS_MESSAGE.to_string());
            STATUS_SUCCESS
        }
        Err(err) => fail(err),
    }
}

/// Record `error` as the current thread's last message and return its
/// status code. Exposed so the FFI layer can report failures it detects
/// before or around the pipeline (bad pointers, caught panics).
pub fn fail(error: AdapterError) -> i32 {
    let code = error.status_code();
    set_last_message(error.to_string());
    code
}

/// The descriptive message for the most recent call on this thread.
pub fn last_error_message() -> String {
    LAST_MESSAGE.with(|slot| slot.borrow().clone())
}

fn set_last_message(message: String) {
    LAST_MESSAGE.with(|slot| *slot.borrow_mut() = message);
}

/// The call pipeline: decode, build URL, dispatch, classify, encode.
fn execute(
    input: &[u8],
    output: Option<&mut [u8]>,
    config: &RequestConfig,
) -> Result<(), AdapterError> {
    let fields = buffer::decode_fields(input)?;
    let wants_response = query::response_requested(&fields);
    let url = query::build_url(&config.base_url, &fields);

    let reply = dispatch::dispatch(&url, config)?;
    if !(200..300).contains(&reply.status) {
        return Err(AdapterError::HttpStatusError(reply.status));
    }

    if wants_response {
        if let Some(out) = output {
            buffer::encode_field(out, RESPONSE_CONTROL_KEY, &reply.body)?;
        }
    }
    Ok(())
}
