//! VInt encoding for stored-vector headers.
//!
//! A VInt stores 7 bits per byte, least significant group first. The high
//! bit of every byte except the last is set as a continuation marker, so
//! values below 128 take a single byte and a `u32` takes at most five.

use crate::error::{Result, VecScoreError};

/// Maximum number of bytes a `u32` VInt may occupy.
pub const MAX_VINT_LEN: usize = 5;

/// Encode a u32 value as a VInt.
pub fn encode_vint(value: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAX_VINT_LEN);
    let mut val = value;

    while val >= 0x80 {
        bytes.push((val as u8 & 0x7F) | 0x80);
        val >>= 7;
    }
    bytes.push(val as u8);

    bytes
}

/// Forward-only VInt reader over a borrowed byte slice.
///
/// Tracks its position so that the payload following a header can be sliced
/// out without copying.
#[derive(Debug, Clone)]
pub struct VIntReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> VIntReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        VIntReader { bytes, position: 0 }
    }

    /// Current read offset into the underlying slice.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    /// Read the next VInt.
    pub fn read_vint(&mut self) -> Result<u32> {
        let mut result = 0u32;

        for i in 0..MAX_VINT_LEN {
            let byte = *self
                .bytes
                .get(self.position)
                .ok_or_else(|| VecScoreError::decode("Incomplete VInt"))?;
            self.position += 1;

            // The fifth byte only has room for the top four bits.
            if i == MAX_VINT_LEN - 1 && byte & 0xF0 != 0 {
                return Err(VecScoreError::decode("VInt overflow"));
            }

            result |= ((byte & 0x7F) as u32) << (7 * i);

            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }

        Err(VecScoreError::decode("VInt overflow"))
    }
}
