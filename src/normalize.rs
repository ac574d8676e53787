//! Case normalization and load-time token validation shared by both backends.
//!
//! Every structural operation (hashing, trie indexing, comparison) works on the
//! **canonical form** of a word: an ASCII-lowercased copy. Queries are
//! normalized with [`to_canonical`]; words read from a dictionary file go
//! through [`canonicalize_token`], which additionally enforces the word
//! charset and the [`LENGTH`] limit.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Maximum length of a dictionary word
/// (e.g. *pneumonoultramicroscopicsilicovolcanoconiosis*).
pub const LENGTH: usize = 45;

/// Characters allowed in a dictionary word: ASCII letters of either case plus apostrophe.
pub const WORD_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ'";

/// Bitset over the ASCII range answering "may this byte appear in a word?".
///
/// One `u128` covers `0x00..=0x7F`; anything above is rejected outright, so
/// multi-byte UTF-8 sequences never pass.
#[derive(Copy, Clone)]
pub struct WordCharset {
    ascii_mask: u128,
}

impl WordCharset {
    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        b <= 0x7F && ((self.ascii_mask >> b) & 1) == 1
    }
}

/// Global charset built from [`WORD_CHARS`] on first use.
pub static WORD_CHARSET: Lazy<WordCharset> = Lazy::new(|| {
    let mut mask: u128 = 0;
    for b in WORD_CHARS.bytes() {
        mask |= 1u128 << b;
    }
    WordCharset { ascii_mask: mask }
});

#[inline]
pub fn is_word_char(b: u8) -> bool {
    WORD_CHARSET.contains(b)
}

/// Returns the canonical (ASCII-lowercased) copy of `word`.
///
/// The input is never mutated; non-ASCII bytes pass through untouched.
///
/// ```
/// use speller_dict::normalize::to_canonical;
/// assert_eq!(to_canonical("Don'T"), "don't");
/// ```
#[inline]
pub fn to_canonical(word: &str) -> String {
    word.to_ascii_lowercase()
}

/// What to do with a dictionary token longer than [`LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizePolicy {
    /// Skip the token entirely.
    #[default]
    Reject,
    /// Keep the first [`LENGTH`] characters.
    Truncate,
}

/// Why a dictionary token was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    Empty,
    InvalidChar { ch: char, position: usize },
    TooLong { len: usize },
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRejection::Empty => write!(f, "empty token"),
            TokenRejection::InvalidChar { ch, position } => {
                write!(f, "invalid character {:?} at position {}", ch, position)
            }
            TokenRejection::TooLong { len } => {
                write!(f, "token length {} exceeds maximum of {}", len, LENGTH)
            }
        }
    }
}

/// Validates a raw dictionary token and returns its canonical form.
///
/// The charset check runs before the length check, so a long token that also
/// contains a stray character is reported as `InvalidChar`.
pub fn canonicalize_token(token: &str, policy: OversizePolicy) -> Result<String, TokenRejection> {
    if token.is_empty() {
        return Err(TokenRejection::Empty);
    }

    if let Some((position, ch)) = token.char_indices().find(|&(_, c)| !c.is_ascii() || !is_word_char(c as u8)) {
        return Err(TokenRejection::InvalidChar { ch, position });
    }

    // All bytes are ASCII from here on, so byte length == char length.
    let kept = if token.len() > LENGTH {
        match policy {
            OversizePolicy::Reject => return Err(TokenRejection::TooLong { len: token.len() }),
            OversizePolicy::Truncate => &token[..LENGTH],
        }
    } else {
        token
    };

    Ok(to_canonical(kept))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_matches_letters_and_apostrophe() {
        for b in b'a'..=b'z' {
            assert!(is_word_char(b));
            assert!(is_word_char(b.to_ascii_uppercase()));
        }
        assert!(is_word_char(b'\''));
        for b in [b' ', b'-', b'0', b'\n', b'`', b'{', 0x7F, 0xC3] {
            assert!(!is_word_char(b), "byte {:#x} should not be a word char", b);
        }
    }

    #[test]
    fn canonical_copy_is_lowercase() {
        let original = String::from("ApPlE");
        assert_eq!(to_canonical(&original), "apple");
        assert_eq!(original, "ApPlE");
    }

    #[test]
    fn token_policy() {
        assert_eq!(canonicalize_token("Banana", OversizePolicy::Reject), Ok("banana".into()));
        assert_eq!(canonicalize_token("", OversizePolicy::Reject), Err(TokenRejection::Empty));
        assert_eq!(
            canonicalize_token("co-op", OversizePolicy::Reject),
            Err(TokenRejection::InvalidChar { ch: '-', position: 2 })
        );
        assert_eq!(
            canonicalize_token("café", OversizePolicy::Truncate),
            Err(TokenRejection::InvalidChar { ch: 'é', position: 3 })
        );
    }

    #[test]
    fn oversize_tokens_follow_policy() {
        let exact = "a".repeat(LENGTH);
        let long = "B".repeat(LENGTH + 5);

        assert_eq!(canonicalize_token(&exact, OversizePolicy::Reject), Ok(exact.clone()));
        assert_eq!(
            canonicalize_token(&long, OversizePolicy::Reject),
            Err(TokenRejection::TooLong { len: LENGTH + 5 })
        );
        assert_eq!(
            canonicalize_token(&long, OversizePolicy::Truncate),
            Ok("b".repeat(LENGTH))
        );
    }
}
