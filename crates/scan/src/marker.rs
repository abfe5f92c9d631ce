use serde::{Deserialize, Serialize};

use crate::varint::DEFAULT_MAX_VARINT_BYTES;

/// Field 2, length-delimited, 3 bytes long, whose first inner byte is the
/// tag of varint field 1.
pub const DEFAULT_MARKER: [u8; 3] = [0x12, 0x03, 0x08];
pub const DEFAULT_WINDOW: usize = 50;
pub const DEFAULT_ASSUMED_LIMIT: u64 = 1000;
pub const DEFAULT_UNITS: &str = "credits";

/// Byte sequence that precedes a quota varint, and how far past a model name
/// it may start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPattern {
    bytes: Vec<u8>,
    window: usize,
}

impl MarkerPattern {
    pub fn new(bytes: Vec<u8>, window: usize) -> Self {
        Self { bytes, window }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Offset of the first marker starting in `[start, start + window)`.
    pub fn find(&self, buf: &[u8], start: usize) -> Option<usize> {
        if self.bytes.is_empty() {
            return None;
        }
        let end = start.saturating_add(self.window).min(buf.len());
        (start..end).find(|&pos| {
            buf.get(pos..pos + self.bytes.len())
                .is_some_and(|candidate| candidate == self.bytes.as_slice())
        })
    }
}

impl Default for MarkerPattern {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER.to_vec(), DEFAULT_WINDOW)
    }
}

/// Tunables for the heuristic scan. Format drift should only need edits here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub window: usize,
    pub marker: Vec<u8>,
    pub max_varint_bytes: usize,
    pub assumed_limit: Option<u64>,
    pub units: String,
    /// Match model names at a length-prefixed occurrence before the first
    /// raw one. Off keeps plain first-occurrence matching.
    pub prefer_length_prefixed: bool,
}

impl ScanConfig {
    pub fn marker_pattern(&self) -> MarkerPattern {
        MarkerPattern::new(self.marker.clone(), self.window)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            marker: DEFAULT_MARKER.to_vec(),
            max_varint_bytes: DEFAULT_MAX_VARINT_BYTES,
            assumed_limit: Some(DEFAULT_ASSUMED_LIMIT),
            units: DEFAULT_UNITS.to_string(),
            prefer_length_prefixed: false,
        }
    }
}
