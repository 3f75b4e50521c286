//! CRC32 checksums for artifact payloads.
//!
//! Uses CRC32 (IEEE polynomial) via the crc32fast crate. Checksums are
//! stored as `crc32:XXXXXXXX` (lowercase hex, zero-padded) and verified
//! on every load.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a CRC32 checksum as `crc32:XXXXXXXX`.
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a formatted checksum string back to its value.
///
/// Returns `None` if the format is invalid.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let stripped = formatted.strip_prefix("crc32:")?;
    u32::from_str_radix(stripped, 16).ok()
}
