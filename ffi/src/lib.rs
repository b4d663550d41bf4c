//! C-ABI plugin surface loaded by the contact-center host runtime.
//!
//! # Overview
//! The host resolves two symbols: `CustomFunctionExample`, called once per
//! telephony call with an input buffer and an optional output buffer, and
//! `GetLastErrorMessage`, which fetches the diagnostic text for the most
//! recent call on the calling thread.
//!
//! # Design
//! - Both exports wrap their bodies in `catch_unwind`; a panic becomes
//!   status 6 (or a null pointer) instead of unwinding into the host.
//! - The input pointer carries no length, so the count header is parsed
//!   first and bounds the slice handed to the core. The host guarantees
//!   the buffer backs the count it declared; that is the wire contract.
//! - The output pointer, when non-null, is viewed as exactly
//!   `OUTPUT_LEN` bytes (the single-field buffer the host allocates).
//! - `GetLastErrorMessage` returns a pointer into a thread-local slot,
//!   valid until the next adapter call on the same thread.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_long};
use std::panic::catch_unwind;

use callbridge_core::buffer::{self, HEADER_SIZE, OUTPUT_LEN};
use callbridge_core::AdapterError;

/// Entry point the host runtime calls once per telephony call.
///
/// `data_in` holds the count header plus the declared fields; `data_out`,
/// when non-null, must provide room for one encoded field. Returns 0 on
/// success, or the failure's status code.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn CustomFunctionExample(data_in: *const c_char, data_out: *mut c_char) -> c_long {
    let status = catch_unwind(|| {
        if data_in.is_null() {
            return callbridge_core::process(None, None);
        }

        // SAFETY: the host guarantees at least HEADER_SIZE bytes behind a
        // non-null input pointer.
        let header = unsafe { std::slice::from_raw_parts(data_in.cast::<u8>(), HEADER_SIZE) };
        let count = match buffer::parse_count(header) {
            Ok(count) => count,
            Err(err) => return callbridge_core::fail(err),
        };

        // SAFETY: the wire contract obliges the host to back the count it
        // declared; the slice covers exactly the declared fields.
        let input = unsafe {
            std::slice::from_raw_parts(data_in.cast::<u8>(), buffer::required_len(count))
        };

        if data_out.is_null() {
            callbridge_core::process(Some(input), None)
        } else {
            // SAFETY: the host allocates the single-field output buffer.
            let output =
                unsafe { std::slice::from_raw_parts_mut(data_out.cast::<u8>(), OUTPUT_LEN) };
            callbridge_core::process(Some(input), Some(output))
        }
    })
    .unwrap_or_else(|_| {
        callbridge_core::fail(AdapterError::UnexpectedFailure(
            "panic caught at the call boundary".to_string(),
        ))
    });

    c_long::from(status)
}

thread_local! {
    static MESSAGE_SLOT: RefCell<CString> = RefCell::new(CString::default());
}

/// Fetch the diagnostic message for the most recent call on this thread.
///
/// The returned pointer stays valid until the next adapter call on the
/// same thread. Before any call it names that fact rather than returning
/// null.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn GetLastErrorMessage() -> *const c_char {
    catch_unwind(|| {
        let message = callbridge_core::last_error_message();
        let text = CString::new(message).unwrap_or_default();
        MESSAGE_SLOT.with(|slot| {
            *slot.borrow_mut() = text;
            slot.borrow().as_ptr()
        })
    })
    .unwrap_or(std::ptr::null())
}
