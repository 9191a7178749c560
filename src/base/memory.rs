//! Accessors over an engine's raw linear memory.
//!
//! All multi-byte values are little-endian 32-bit integers (wasm32). A string
//! view is an 8-byte record `[start, len]` where `start` is an absolute byte
//! address into the same memory.
//!
//! Every access is bounds checked. An out-of-range read is a contract
//! violation between this crate and the engine binary and is reported as a
//! [`DecodeError`]; reads never partially succeed.

use smol_str::SmolStr;
use thiserror::Error;

/// Size in bytes of a string view record.
pub const STRING_VIEW_SIZE: u32 = 8;

/// Structural failure while reading engine memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unaligned access at byte offset {offset}")]
    Unaligned { offset: u32 },

    #[error("access of {len} bytes at {offset} exceeds memory size {size}")]
    OutOfBounds { offset: u32, len: u32, size: usize },

    #[error("string view at {offset} has negative field (start {start}, len {len})")]
    NegativeStringView { offset: u32, start: i32, len: i32 },
}

/// A decoded string together with its byte offset relative to the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    pub value: SmolStr,
    pub offset: u32,
}

impl SourceSpan {
    pub fn new(value: impl Into<SmolStr>, offset: u32) -> Self {
        Self {
            value: value.into(),
            offset,
        }
    }

    /// Length of the decoded value in characters.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset one past the end of the span, relative to the input buffer.
    ///
    /// Each decoded character stands for exactly one input byte.
    pub fn end(&self) -> u32 {
        self.offset + self.char_len() as u32
    }
}

fn checked_range(
    memory_len: usize,
    offset: u32,
    len: u32,
) -> Result<std::ops::Range<usize>, DecodeError> {
    let start = offset as usize;
    let end = start.checked_add(len as usize).filter(|end| *end <= memory_len);
    match end {
        Some(end) => Ok(start..end),
        None => Err(DecodeError::OutOfBounds {
            offset,
            len,
            size: memory_len,
        }),
    }
}

fn check_aligned(offset: u32) -> Result<(), DecodeError> {
    if offset % 4 == 0 {
        Ok(())
    } else {
        Err(DecodeError::Unaligned { offset })
    }
}

/// Read a little-endian `i32` at a 4-byte aligned offset.
pub fn read_i32(memory: &[u8], offset: u32) -> Result<i32, DecodeError> {
    check_aligned(offset)?;
    let range = checked_range(memory.len(), offset, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&memory[range]);
    Ok(i32::from_le_bytes(bytes))
}

/// Read a single byte, e.g. a C `bool` field.
pub fn read_u8(memory: &[u8], offset: u32) -> Result<u8, DecodeError> {
    let range = checked_range(memory.len(), offset, 1)?;
    Ok(memory[range.start])
}

/// Read a `[start, len]` string view at `offset` and decode the bytes it names.
///
/// Bytes are decoded as single-byte characters. The reported offset is
/// `start - base`, saturating at zero.
pub fn read_string_span(memory: &[u8], offset: u32, base: u32) -> Result<SourceSpan, DecodeError> {
    let start = read_i32(memory, offset)?;
    let len = read_i32(memory, offset + 4)?;
    if start < 0 || len < 0 {
        return Err(DecodeError::NegativeStringView { offset, start, len });
    }

    let range = checked_range(memory.len(), start as u32, len as u32)?;
    let value: String = memory[range].iter().map(|&byte| char::from(byte)).collect();

    Ok(SourceSpan {
        value: SmolStr::from(value),
        offset: (start as u32).saturating_sub(base),
    })
}

/// Write a little-endian `i32` at a 4-byte aligned offset.
pub fn write_i32(memory: &mut [u8], offset: u32, value: i32) -> Result<(), DecodeError> {
    check_aligned(offset)?;
    let range = checked_range(memory.len(), offset, 4)?;
    memory[range].copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Copy `bytes` into memory starting at `offset`.
pub fn write_bytes(memory: &mut [u8], offset: u32, bytes: &[u8]) -> Result<(), DecodeError> {
    let range = checked_range(memory.len(), offset, bytes.len() as u32)?;
    memory[range].copy_from_slice(bytes);
    Ok(())
}

/// Zero `len` bytes starting at `offset`.
pub fn fill_zero(memory: &mut [u8], offset: u32, len: u32) -> Result<(), DecodeError> {
    let range = checked_range(memory.len(), offset, len)?;
    memory[range].fill(0);
    Ok(())
}
