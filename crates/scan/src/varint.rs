pub const DEFAULT_MAX_VARINT_BYTES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Continuation bits ran past `max_bytes`, or the value overflowed u64.
    Overrun { max_bytes: usize },
    /// The buffer ended mid-varint.
    Truncated,
}

impl std::fmt::Display for VarintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overrun { max_bytes } => {
                write!(f, "varint did not terminate within {} bytes", max_bytes)
            }
            Self::Truncated => write!(f, "buffer ended inside varint"),
        }
    }
}

impl std::error::Error for VarintError {}

/// Decodes a little-endian base-128 varint at `offset`.
///
/// Returns the value and the offset just past its last byte.
pub fn decode_varint(
    buf: &[u8],
    offset: usize,
    max_bytes: usize,
) -> Result<(u64, usize), VarintError> {
    let mut value = 0u64;
    for index in 0..max_bytes {
        let Some(&byte) = offset.checked_add(index).and_then(|pos| buf.get(pos)) else {
            return Err(VarintError::Truncated);
        };
        let shift = 7 * index as u32;
        let bits = u64::from(byte & 0x7f);
        if shift >= u64::BITS || bits > (u64::MAX >> shift) {
            return Err(VarintError::Overrun { max_bytes });
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Ok((value, offset + index + 1));
        }
    }
    Err(VarintError::Overrun { max_bytes })
}

pub fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(DEFAULT_MAX_VARINT_BYTES);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}
