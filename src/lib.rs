//! # speller-dict
//!
//! A case-insensitive **word-membership dictionary** with two interchangeable
//! backends behind one [`Dictionary`] contract:
//!
//! - [`HashTableDictionary`]: fixed bucket array of singly linked chains,
//!   hashed with a multiplicative (65599) hash.
//! - [`TrieDictionary`]: 27-way letter trie (`a` to `z` plus apostrophe).
//!
//! Both support `load`, `check`, `size`, and `unload`, and both answer every
//! query identically for the same word list.
//!
//! Pick a backend at compile time by writing code generic over
//! `D: Dictionary`, or at run time through [`SpellDictionary`] and a
//! [`DictionaryConfig`].
//!
//! ## Example
//! ```
//! use std::io::Write;
//! use speller_dict::{Backend, Dictionary, DictionaryConfig, SpellDictionary};
//!
//! let mut file = tempfile::NamedTempFile::new().unwrap();
//! writeln!(file, "apple\nBanana\ncherry").unwrap();
//!
//! let config = DictionaryConfig::new(Backend::Trie);
//! let mut dict = SpellDictionary::from_path(file.path(), &config).unwrap();
//!
//! assert!(dict.check("APPLE"));
//! assert!(!dict.check("durian"));
//! assert_eq!(dict.size(), 3);
//! assert!(dict.unload());
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

pub mod config;
pub mod error;
pub mod hash_table;
pub mod hashing;
pub mod normalize;
pub mod source;
pub mod trie;

pub use crate::config::{Backend, DictionaryConfig};
pub use crate::error::{DictionaryError, Result};
pub use crate::hash_table::{HashTableDictionary, TableStats};
pub use crate::hashing::TableSize;
pub use crate::normalize::{OversizePolicy, LENGTH};
pub use crate::source::LoadReport;
pub use crate::trie::TrieDictionary;

/// The shared contract of every dictionary backend.
///
/// # Lifecycle
/// Construct empty, `load` one or more word lists, `check` as often as
/// needed, then `unload`. Before any load, `size()` is 0 and every `check`
/// is false. `load` adds to what is already there; call `unload` first for
/// a fresh start.
///
/// Mutation (`load`, `unload`) needs `&mut self` and queries need `&self`,
/// so a query can never overlap a load.
pub trait Dictionary {
    /// Which implementation this is (used in diagnostics).
    fn backend(&self) -> Backend;

    /// Loads every accepted word from `reader`.
    ///
    /// On a read error, words inserted so far stay loaded and the error is
    /// returned; `unload` remains safe.
    fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<LoadReport>;

    /// Opens `path` and loads it, reporting accepted/rejected token counts.
    fn load_with_report<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let report = self
            .load_from_reader(BufReader::new(file))
            .map_err(|err| err.with_path(path))?;

        info!(
            "loaded {} words from {} into {} ({} tokens rejected)",
            report.accepted,
            path.display(),
            self.backend(),
            report.rejected
        );
        Ok(report)
    }

    /// Builds the structure from the word list at `path`.
    fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.load_with_report(path).map(|_| ())
    }

    /// Returns true iff `word` was loaded, ignoring ASCII case.
    fn check(&self, word: &str) -> bool;

    /// Number of words loaded so far; 0 before any load and after `unload`.
    fn size(&self) -> usize;

    /// Releases every stored word. Always succeeds and may be called repeatedly.
    fn unload(&mut self) -> bool;
}

/// A dictionary whose backend is chosen at run time.
pub enum SpellDictionary {
    HashTable(HashTableDictionary),
    Trie(TrieDictionary),
}

impl SpellDictionary {
    /// Creates an empty dictionary of the configured backend.
    pub fn new(config: &DictionaryConfig) -> Self {
        debug!("creating {} dictionary ({:?})", config.backend, config);
        match config.backend {
            Backend::HashTable => SpellDictionary::HashTable(HashTableDictionary::with_policy(
                config.table_size,
                config.oversize,
            )),
            Backend::Trie => SpellDictionary::Trie(TrieDictionary::with_policy(config.oversize)),
        }
    }

    /// Creates and loads a dictionary in one step.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &DictionaryConfig) -> Result<Self> {
        let mut dict = Self::new(config);
        dict.load(path)?;
        Ok(dict)
    }

    pub fn as_hash_table(&self) -> Option<&HashTableDictionary> {
        match self {
            SpellDictionary::HashTable(d) => Some(d),
            SpellDictionary::Trie(_) => None,
        }
    }

    pub fn as_trie(&self) -> Option<&TrieDictionary> {
        match self {
            SpellDictionary::Trie(d) => Some(d),
            SpellDictionary::HashTable(_) => None,
        }
    }
}

impl Default for SpellDictionary {
    fn default() -> Self {
        Self::new(&DictionaryConfig::default())
    }
}

impl Dictionary for SpellDictionary {
    fn backend(&self) -> Backend {
        match self {
            SpellDictionary::HashTable(d) => d.backend(),
            SpellDictionary::Trie(d) => d.backend(),
        }
    }

    fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<LoadReport> {
        match self {
            SpellDictionary::HashTable(d) => d.load_from_reader(reader),
            SpellDictionary::Trie(d) => d.load_from_reader(reader),
        }
    }

    fn check(&self, word: &str) -> bool {
        match self {
            SpellDictionary::HashTable(d) => d.check(word),
            SpellDictionary::Trie(d) => d.check(word),
        }
    }

    fn size(&self) -> usize {
        match self {
            SpellDictionary::HashTable(d) => d.size(),
            SpellDictionary::Trie(d) => d.size(),
        }
    }

    fn unload(&mut self) -> bool {
        match self {
            SpellDictionary::HashTable(d) => d.unload(),
            SpellDictionary::Trie(d) => d.unload(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    /// Yields `data` once, then fails, to simulate a read error part-way through.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "disk on fire")),
                n => Ok(n),
            }
        }
    }

    fn failing(text: &str) -> BufReader<FailingReader> {
        BufReader::new(FailingReader {
            data: Cursor::new(text.as_bytes().to_vec()),
        })
    }

    #[test]
    fn config_selects_backend() {
        let trie = SpellDictionary::new(&DictionaryConfig::new(Backend::Trie));
        assert_eq!(trie.backend(), Backend::Trie);
        assert!(trie.as_trie().is_some());

        let table = SpellDictionary::new(
            &DictionaryConfig::new(Backend::HashTable).with_table_size(TableSize::Small),
        );
        assert_eq!(table.as_hash_table().map(|t| t.bucket_count()), Some(509));
    }

    #[test]
    fn read_error_keeps_partial_words_and_unloads() {
        for backend in [Backend::HashTable, Backend::Trie] {
            let mut dict = SpellDictionary::new(&DictionaryConfig::new(backend));
            let err = dict.load_from_reader(failing("alpha\nbeta\n")).unwrap_err();
            assert!(matches!(err, DictionaryError::Read(_)), "{backend}: {err}");
            assert_eq!(dict.size(), 2);
            assert!(dict.check("beta"));
            assert!(dict.unload());
            assert_eq!(dict.size(), 0);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut dict = SpellDictionary::default();
        let err = dict.load("/definitely/not/here/words.txt").unwrap_err();
        match err {
            DictionaryError::Io { path, source } => {
                assert_eq!(path, Path::new("/definitely/not/here/words.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(dict.size(), 0);
        assert!(dict.unload());
    }

    #[test]
    fn loads_accumulate_until_unload() {
        let mut dict = SpellDictionary::new(&DictionaryConfig::new(Backend::Trie));
        dict.load_from_reader(Cursor::new("one\n")).unwrap();
        dict.load_from_reader(Cursor::new("two\n")).unwrap();
        assert_eq!(dict.size(), 2);
        assert!(dict.check("one") && dict.check("two"));
    }
}
