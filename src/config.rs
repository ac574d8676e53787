//! Dictionary configuration: which backend to build and how to treat odd input.
//!
//! A [`DictionaryConfig`] can be built in code, parsed from JSON, or (for the
//! C API) assembled from a numeric backend code via [`Backend::from_ffi`].
//!
//! ```
//! use speller_dict::config::{Backend, DictionaryConfig};
//!
//! let cfg = DictionaryConfig::from_json_str(r#"{ "backend": "trie" }"#).unwrap();
//! assert_eq!(cfg.backend, Backend::Trie);
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, Result};
use crate::hashing::TableSize;
use crate::normalize::OversizePolicy;

/// The two interchangeable dictionary implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Chained hash table; tokens are whitespace-delimited.
    #[default]
    HashTable,
    /// 27-way letter trie; one word per line.
    Trie,
}

impl Backend {
    /// Stable numeric code used across the C ABI.
    #[inline]
    pub const fn to_ffi(self) -> u32 {
        match self {
            Backend::HashTable => 0,
            Backend::Trie => 1,
        }
    }

    /// Inverse of [`Backend::to_ffi`]; `None` for unknown codes.
    #[inline]
    pub const fn from_ffi(code: u32) -> Option<Self> {
        match code {
            0 => Some(Backend::HashTable),
            1 => Some(Backend::Trie),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Backend::HashTable => "hash_table",
            Backend::Trie => "trie",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Backend {
    type Error = DictionaryError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "hash_table" | "hash" | "hashtable" => Ok(Backend::HashTable),
            "trie" => Ok(Backend::Trie),
            other => Err(DictionaryError::InvalidConfig(format!(
                "unknown backend: {}",
                other
            ))),
        }
    }
}

/// Build-time options for a [`crate::SpellDictionary`].
///
/// Every field has a default, so `{}` is a valid JSON config.
/// `table_size` is ignored by the trie backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub backend: Backend,
    pub table_size: TableSize,
    pub oversize: OversizePolicy,
}

impl DictionaryConfig {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn with_table_size(mut self, table_size: TableSize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_oversize(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file; I/O failures carry the path.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffi_codes_round_trip() {
        for b in [Backend::HashTable, Backend::Trie] {
            assert_eq!(Backend::from_ffi(b.to_ffi()), Some(b));
        }
        assert_eq!(Backend::from_ffi(7), None);
    }

    #[test]
    fn backend_from_str() {
        assert_eq!(Backend::try_from("Trie").unwrap(), Backend::Trie);
        assert_eq!(Backend::try_from("hash-table").unwrap(), Backend::HashTable);
        assert!(matches!(
            Backend::try_from("btree"),
            Err(DictionaryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = DictionaryConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, DictionaryConfig::default());
        assert_eq!(cfg.backend, Backend::HashTable);
        assert_eq!(cfg.table_size, TableSize::Large);
        assert_eq!(cfg.oversize, OversizePolicy::Reject);
    }

    #[test]
    fn full_json() {
        let cfg = DictionaryConfig::from_json_str(
            r#"{ "backend": "hash_table", "table_size": "small", "oversize": "truncate" }"#,
        )
        .unwrap();
        assert_eq!(
            cfg,
            DictionaryConfig::new(Backend::HashTable)
                .with_table_size(TableSize::Small)
                .with_oversize(OversizePolicy::Truncate)
        );

        let back = DictionaryConfig::from_json_str(&cfg.to_json_string().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn bad_json_is_invalid_config() {
        let err = DictionaryConfig::from_json_str(r#"{ "backend": "btree" }"#).unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidConfig(_)));
    }
}
