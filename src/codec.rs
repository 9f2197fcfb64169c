//! Stored-vector codec.
//!
//! A stored vector is one binary doc value laid out as
//!
//! ```text
//! [VInt reserved][VInt byte_length][byte_length payload bytes]
//! ```
//!
//! The payload is a little-endian array of either 8-byte IEEE-754 doubles or
//! 2-byte UTF-16 code units, depending on the distance method that reads it.
//! The reserved VInt is written by the host (it holds the value count) and
//! is skipped on read.
//!
//! Decoding never fails the query. Every problem with a document's bytes is
//! reported as a [`NoScore`] outcome and the caller scores that document
//! `0.0`.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::error::{Result as VecScoreResult, VecScoreError};
use crate::util::varint::{MAX_VINT_LEN, VIntReader, encode_vint};

/// Value written into the reserved header slot by the encoders.
pub const RESERVED_HEADER: u32 = 1;

/// Element type of a stored payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Little-endian `f64`.
    F64,
    /// Little-endian UTF-16 code unit.
    Char,
}

impl ElementKind {
    /// Width of one element in bytes.
    pub fn width(&self) -> usize {
        match self {
            ElementKind::F64 => 8,
            ElementKind::Char => 2,
        }
    }
}

/// Why a document's stored bytes produced no score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoScore {
    /// One of the two header VInts could not be read.
    #[error("malformed stored vector header")]
    MalformedHeader,

    /// Declared payload length disagrees with the query dimension.
    #[error("stored vector has {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Buffer ends before the declared payload does.
    #[error("stored vector truncated: {available} of {declared} bytes present")]
    Truncated { declared: usize, available: usize },
}

/// Validate the header and return the payload slice.
fn payload(bytes: &[u8], expected_count: usize, kind: ElementKind) -> Result<&[u8], NoScore> {
    let mut reader = VIntReader::new(bytes);
    reader.read_vint().map_err(|_| NoScore::MalformedHeader)?;
    let byte_length = reader.read_vint().map_err(|_| NoScore::MalformedHeader)? as usize;

    let expected = expected_count.saturating_mul(kind.width());
    if byte_length != expected {
        return Err(NoScore::LengthMismatch {
            expected,
            actual: byte_length,
        });
    }

    let rest = reader.remaining();
    if rest.len() < byte_length {
        return Err(NoScore::Truncated {
            declared: byte_length,
            available: rest.len(),
        });
    }

    Ok(&rest[..byte_length])
}

/// Decode `expected_count` doubles into `out`, replacing its contents.
pub fn decode_f64s_into(
    bytes: &[u8],
    expected_count: usize,
    out: &mut Vec<f64>,
) -> Result<(), NoScore> {
    let payload = payload(bytes, expected_count, ElementKind::F64)?;
    out.clear();
    out.resize(expected_count, 0.0);
    LittleEndian::read_f64_into(payload, out);
    Ok(())
}

/// Decode `expected_count` UTF-16 code units into `out`, replacing its contents.
pub fn decode_chars_into(
    bytes: &[u8],
    expected_count: usize,
    out: &mut Vec<u16>,
) -> Result<(), NoScore> {
    let payload = payload(bytes, expected_count, ElementKind::Char)?;
    out.clear();
    out.resize(expected_count, 0);
    LittleEndian::read_u16_into(payload, out);
    Ok(())
}

/// Decode a stored double vector into a fresh buffer.
pub fn decode_f64s(bytes: &[u8], expected_count: usize) -> Result<Vec<f64>, NoScore> {
    let mut out = Vec::with_capacity(expected_count);
    decode_f64s_into(bytes, expected_count, &mut out)?;
    Ok(out)
}

/// Decode a stored character sequence into a fresh buffer.
pub fn decode_chars(bytes: &[u8], expected_count: usize) -> Result<Vec<u16>, NoScore> {
    let mut out = Vec::with_capacity(expected_count);
    decode_chars_into(bytes, expected_count, &mut out)?;
    Ok(out)
}

/// Build the two header VInts. The length slot is a `u32`, so payloads
/// must stay below 4 GiB.
fn header(byte_length: usize) -> VecScoreResult<Vec<u8>> {
    let declared = u32::try_from(byte_length).map_err(|_| {
        VecScoreError::invalid_argument(format!(
            "stored vector payload of {byte_length} bytes does not fit the length header"
        ))
    })?;

    let mut out = Vec::with_capacity(byte_length + 2 * MAX_VINT_LEN);
    out.extend(encode_vint(RESERVED_HEADER));
    out.extend(encode_vint(declared));
    Ok(out)
}

/// Encode doubles in the stored-vector layout.
pub fn encode_f64s(values: &[f64]) -> VecScoreResult<Vec<u8>> {
    let byte_length = values.len() * ElementKind::F64.width();
    let mut out = header(byte_length)?;

    let start = out.len();
    out.resize(start + byte_length, 0);
    LittleEndian::write_f64_into(values, &mut out[start..]);
    Ok(out)
}

/// Encode a string as UTF-16 code units in the stored-vector layout.
pub fn encode_chars(text: &str) -> VecScoreResult<Vec<u8>> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let byte_length = units.len() * ElementKind::Char.width();
    let mut out = header(byte_length)?;

    let start = out.len();
    out.resize(start + byte_length, 0);
    LittleEndian::write_u16_into(&units, &mut out[start..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_round_trip() {
        let values = [3.0, -4.5, 0.0, f64::MAX, f64::MIN_POSITIVE, 1e-300];
        let bytes = encode_f64s(&values).unwrap();
        assert_eq!(decode_f64s(&bytes, values.len()).unwrap(), values);
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_f64s(&[1.0, 2.0]).unwrap();
        assert_eq!(bytes[0], RESERVED_HEADER as u8);
        assert_eq!(bytes[1], 16);
        assert_eq!(bytes.len(), 2 + 16);
        assert_eq!(&bytes[2..10], &1.0f64.to_le_bytes());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_payload_is_rejected() {
        let err = header(u32::MAX as usize + 1).unwrap_err();
        assert!(err.to_string().contains("does not fit the length header"));
    }

    #[test]
    fn test_reserved_field_is_ignored() {
        let mut bytes = encode_vint(987_654);
        bytes.extend(encode_vint(8));
        bytes.extend_from_slice(&2.5f64.to_le_bytes());
        assert_eq!(decode_f64s(&bytes, 1).unwrap(), vec![2.5]);
    }

    #[test]
    fn test_length_mismatch_is_no_score() {
        let bytes = encode_f64s(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            decode_f64s(&bytes, 2),
            Err(NoScore::LengthMismatch {
                expected: 16,
                actual: 24
            })
        );
    }

    #[test]
    fn test_truncated_and_malformed() {
        let bytes = encode_f64s(&[1.0, 2.0]).unwrap();
        assert_eq!(
            decode_f64s(&bytes[..10], 2),
            Err(NoScore::Truncated {
                declared: 16,
                available: 8
            })
        );
        assert_eq!(decode_f64s(&[0x80], 2), Err(NoScore::MalformedHeader));
        assert_eq!(decode_f64s(&[], 0), Err(NoScore::MalformedHeader));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = encode_f64s(&[7.0]).unwrap();
        bytes.extend_from_slice(&[0xDE, 0xAD]);
        assert_eq!(decode_f64s(&bytes, 1).unwrap(), vec![7.0]);
    }

    #[test]
    fn test_chars_round_trip() {
        let bytes = encode_chars("1011").unwrap();
        assert_eq!(bytes[1], 8);
        let units = decode_chars(&bytes, 4).unwrap();
        assert_eq!(String::from_utf16(&units).unwrap(), "1011");
        assert!(decode_chars(&bytes, 3).is_err());
    }

    #[test]
    fn test_decode_into_reuses_buffer() {
        let mut scratch = vec![9.0; 10];
        decode_f64s_into(&encode_f64s(&[1.0, 2.0]).unwrap(), 2, &mut scratch).unwrap();
        assert_eq!(scratch, vec![1.0, 2.0]);
    }
}
