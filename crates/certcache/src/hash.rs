//! Key derivation for string identifiers
//!
//! 32-bit FNV-1a over the UTF-8 bytes of the input.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Hash a string into a fixed-size cache key.
///
/// Deterministic across runs and platforms. Not collision resistant; callers
/// that share one cache across several identifier spaces should prefix the
/// input with a namespace tag.
pub fn hash_string(s: &str) -> u32 {
    s.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
