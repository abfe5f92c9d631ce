mod marker;
mod scanner;
mod varint;

pub use marker::{
    DEFAULT_ASSUMED_LIMIT, DEFAULT_MARKER, DEFAULT_UNITS, DEFAULT_WINDOW, MarkerPattern,
    ScanConfig,
};
pub use scanner::QuotaScanner;
pub use varint::{DEFAULT_MAX_VARINT_BYTES, VarintError, decode_varint, encode_varint};
