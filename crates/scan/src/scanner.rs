use gauge_core::ModelQuotaRecord;

use crate::marker::{MarkerPattern, ScanConfig};
use crate::varint::decode_varint;

/// Best-effort quota extractor for the undocumented user-status blob.
///
/// Unknown layouts degrade to missing records or missing quotas; `scan` never
/// fails.
#[derive(Debug, Clone)]
pub struct QuotaScanner {
    catalog: Vec<String>,
    marker: MarkerPattern,
    max_varint_bytes: usize,
    assumed_limit: Option<u64>,
    units: String,
    prefer_length_prefixed: bool,
}

impl QuotaScanner {
    pub fn new(catalog: Vec<String>, config: &ScanConfig) -> Self {
        Self {
            catalog,
            marker: config.marker_pattern(),
            max_varint_bytes: config.max_varint_bytes,
            assumed_limit: config.assumed_limit,
            units: config.units.clone(),
            prefer_length_prefixed: config.prefer_length_prefixed,
        }
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// One record per catalog entry found in `buffer`, in catalog order.
    pub fn scan(&self, buffer: &[u8]) -> Vec<ModelQuotaRecord> {
        self.catalog
            .iter()
            .filter_map(|identity| {
                let name_at =
                    find_identity(buffer, identity.as_bytes(), self.prefer_length_prefixed)?;
                let remaining = self.quota_after(buffer, name_at + identity.len(), identity);
                Some(ModelQuotaRecord {
                    identity: identity.clone(),
                    limit: remaining
                        .and_then(|value| self.assumed_limit.map(|limit| limit.max(value))),
                    remaining,
                    units: self.units.clone(),
                })
            })
            .collect()
    }

    fn quota_after(&self, buffer: &[u8], start: usize, identity: &str) -> Option<u64> {
        let marker_at = self.marker.find(buffer, start)?;
        let value_at = marker_at + self.marker.bytes().len();
        match decode_varint(buffer, value_at, self.max_varint_bytes) {
            Ok((value, _)) => Some(value),
            Err(err) => {
                tracing::debug!(model = identity, offset = value_at, "quota varint: {}", err);
                None
            }
        }
    }
}

/// Offset of `name` in `buffer`: the first raw match.
///
/// With `prefer_length_prefixed`, the first occurrence preceded by its own
/// length byte wins instead, as a protobuf string field would be, so that
/// `Claude Sonnet 4.5` does not match inside `Claude Sonnet 4.5 (Thinking)`.
/// Names without a prefixed occurrence still fall back to the first match.
fn find_identity(buffer: &[u8], name: &[u8], prefer_length_prefixed: bool) -> Option<usize> {
    if name.is_empty() || name.len() > buffer.len() {
        return None;
    }
    let mut matches = buffer
        .windows(name.len())
        .enumerate()
        .filter(|(_, candidate)| *candidate == name)
        .map(|(pos, _)| pos);
    let first = matches.next()?;
    if !prefer_length_prefixed || name.len() >= 0x80 {
        return Some(first);
    }
    let prefixed = |pos: usize| pos > 0 && buffer[pos - 1] as usize == name.len();
    if prefixed(first) {
        return Some(first);
    }
    Some(matches.find(|&pos| prefixed(pos)).unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_identity_prefers_length_prefixed_match() {
        let mut buf = Vec::new();
        buf.push(28);
        buf.extend_from_slice(b"Claude Sonnet 4.5 (Thinking)");
        buf.push(17);
        buf.extend_from_slice(b"Claude Sonnet 4.5");
        let at = find_identity(&buf, b"Claude Sonnet 4.5", true).expect("match");
        assert_eq!(at, 30);
        assert_eq!(find_identity(&buf, b"Claude Sonnet 4.5", false), Some(1));
    }

    #[test]
    fn find_identity_falls_back_to_first_raw_match() {
        let buf = b"xxGemini 3 Flashyy Gemini 3 Flash";
        assert_eq!(find_identity(buf, b"Gemini 3 Flash", true), Some(2));
        assert_eq!(find_identity(buf, b"Gemini 3 Flash", false), Some(2));
        assert_eq!(find_identity(buf, b"", false), None);
        assert_eq!(find_identity(b"abc", b"abcd", false), None);
    }
}
