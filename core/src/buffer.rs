//! Fixed-width key/value buffer codec.
//!
//! # Wire format
//! A buffer starts with a two-character zero-padded decimal field count
//! (`"00"`..`"99"`), followed by that many fields laid out contiguously.
//! Each field occupies a fixed stride: 32 key bytes then 128 value bytes,
//! both left-justified and NUL-padded. Content stops at the first NUL or
//! at capacity, whichever comes first. The output buffer has the same
//! shape and always holds exactly one field.
//!
//! The codec never reads past `HEADER_SIZE + count * PAIR_SIZE` bytes and
//! rejects any slice shorter than that, so a lying count cannot cause an
//! out-of-bounds read.

use std::collections::BTreeMap;

use crate::error::AdapterError;

/// Bytes occupied by the decimal field count.
pub const HEADER_SIZE: usize = 2;
/// Capacity of one key slot.
pub const KEY_SIZE: usize = 32;
/// Capacity of one value slot.
pub const VALUE_SIZE: usize = 128;
/// Stride of one encoded field.
pub const PAIR_SIZE: usize = KEY_SIZE + VALUE_SIZE;
/// Safety bound on the declared field count.
pub const MAX_FIELDS: usize = 100;
/// Exact size of the single-field output buffer.
pub const OUTPUT_LEN: usize = HEADER_SIZE + PAIR_SIZE;

// The two-digit header itself caps at 99, one below MAX_FIELDS. The
// explicit bound is kept anyway as a guard against future header changes
// and to give oversized counts their own status code.
const HEADER_MAX: usize = 99;

/// Parse the two-character count header.
///
/// Both bytes must be ASCII digits; anything else is rejected rather than
/// read as zero.
pub fn parse_count(buf: &[u8]) -> Result<usize, AdapterError> {
    if buf.len() < HEADER_SIZE {
        return Err(AdapterError::InvalidInput(format!(
            "buffer holds {} bytes, count header needs {HEADER_SIZE}",
            buf.len()
        )));
    }
    let (d0, d1) = (buf[0], buf[1]);
    if !d0.is_ascii_digit() || !d1.is_ascii_digit() {
        return Err(AdapterError::InvalidInput(format!(
            "count header is not numeric: {:?}{:?}",
            d0 as char, d1 as char
        )));
    }
    let count = usize::from(d0 - b'0') * 10 + usize::from(d1 - b'0');
    validate_count(count)?;
    Ok(count)
}

/// Reject counts above [`MAX_FIELDS`].
pub fn validate_count(count: usize) -> Result<(), AdapterError> {
    if count > MAX_FIELDS {
        return Err(AdapterError::TooManyParameters { count, limit: MAX_FIELDS });
    }
    Ok(())
}

/// Total bytes a buffer declaring `count` fields must provide.
pub fn required_len(count: usize) -> usize {
    HEADER_SIZE + count * PAIR_SIZE
}

/// Decode an input buffer into its key/value fields.
///
/// Later occurrences of a key overwrite earlier ones; the map keeps keys
/// in sorted order, which also makes downstream query building
/// deterministic.
pub fn decode_fields(input: &[u8]) -> Result<BTreeMap<String, String>, AdapterError> {
    let count = parse_count(input)?;
    let needed = required_len(count);
    if input.len() < needed {
        return Err(AdapterError::InvalidInput(format!(
            "buffer holds {} bytes but {count} fields need {needed}",
            input.len()
        )));
    }

    let mut fields = BTreeMap::new();
    for i in 0..count {
        let start = HEADER_SIZE + i * PAIR_SIZE;
        let key = read_padded(&input[start..start + KEY_SIZE]);
        let value = read_padded(&input[start + KEY_SIZE..start + PAIR_SIZE]);
        fields.insert(key, value);
    }
    Ok(fields)
}

/// Encode a single field into `out` as a one-field buffer.
///
/// The count is the literal `"01"`; key and value are truncated at
/// capacity and NUL-padded. `out` must provide [`OUTPUT_LEN`] bytes.
pub fn encode_field(out: &mut [u8], key: &str, value: &str) -> Result<(), AdapterError> {
    if out.len() < OUTPUT_LEN {
        return Err(AdapterError::InvalidInput(format!(
            "output buffer holds {} bytes, one field needs {OUTPUT_LEN}",
            out.len()
        )));
    }
    out[0] = b'0';
    out[1] = b'1';
    write_padded(&mut out[HEADER_SIZE..HEADER_SIZE + KEY_SIZE], key);
    write_padded(&mut out[HEADER_SIZE + KEY_SIZE..OUTPUT_LEN], value);
    Ok(())
}

/// Encode a full buffer in the host's wire format.
///
/// Pairs are written in slice order, so duplicate keys survive encoding
/// and collapse (later wins) only on decode. More than 99 fields cannot
/// be represented in the two-digit header.
pub fn encode_fields(fields: &[(String, String)]) -> Result<Vec<u8>, AdapterError> {
    validate_count(fields.len())?;
    if fields.len() > HEADER_MAX {
        return Err(AdapterError::TooManyParameters {
            count: fields.len(),
            limit: HEADER_MAX,
        });
    }

    let mut buf = vec![0u8; required_len(fields.len())];
    buf[0] = b'0' + (fields.len() / 10) as u8;
    buf[1] = b'0' + (fields.len() % 10) as u8;
    for (i, (key, value)) in fields.iter().enumerate() {
        let start = HEADER_SIZE + i * PAIR_SIZE;
        write_padded(&mut buf[start..start + KEY_SIZE], key);
        write_padded(&mut buf[start + KEY_SIZE..start + PAIR_SIZE], value);
    }
    Ok(buf)
}

/// Read a NUL-padded slot, stopping at the first NUL or at capacity.
fn read_padded(slot: &[u8]) -> String {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    String::from_utf8_lossy(&slot[..end]).into_owned()
}

/// Write `text` left-justified into `slot`, truncated at capacity, with
/// the remainder zeroed.
fn write_padded(slot: &mut [u8], text: &str) {
    slot.fill(0);
    let n = text.len().min(slot.len());
    slot[..n].copy_from_slice(&text.as_bytes()[..n]);
}
