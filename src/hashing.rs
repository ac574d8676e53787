//! Bucket hashing for the hash-table backend.

use serde::{Deserialize, Serialize};

/// Multiplier of the running hash (the classic "sdbm" constant).
pub const HASH_MULTIPLIER: u32 = 65599;

/// Bucket-array size presets. The choice only affects chain length, never results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSize {
    /// 509 buckets; fine for short word lists.
    Small,
    /// 65 521 buckets (largest prime below 2^16); sized for full English word lists.
    #[default]
    Large,
}

impl TableSize {
    #[inline]
    pub const fn bucket_count(self) -> usize {
        match self {
            TableSize::Small => 509,
            TableSize::Large => 65521,
        }
    }
}

impl TryFrom<&str> for TableSize {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "small" => Ok(TableSize::Small),
            "large" => Ok(TableSize::Large),
            other => Err(format!("unknown table size: {}", other)),
        }
    }
}

/// Returns a bucket index in `[0, bucket_count)` for a canonical word.
///
/// `h = h * 65599 + b` over every byte, in `u32` with wrapping overflow,
/// reduced modulo `bucket_count` at the end.
///
/// ```
/// use speller_dict::hashing::hash_word;
/// assert_eq!(hash_word("a", 509), 97);
/// assert!(hash_word("pneumonoultramicroscopicsilicovolcanoconiosis", 65521) < 65521);
/// ```
#[inline]
pub fn hash_word(word: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0, "bucket_count must be non-zero");
    let h = word
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(b as u32));
    (h as usize) % bucket_count
}
