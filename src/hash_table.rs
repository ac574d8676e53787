//! Chained hash-table dictionary backend.
//!
//! ## Layout
//!
//! A fixed array of buckets (509 or 65 521, see [`TableSize`]), each the head
//! of a singly linked list of `Entry` nodes. A word lives in bucket
//! `hash_word(word, bucket_count)`; new entries are pushed at the head, so a
//! chain lists its words most-recent-first.
//!
//! Duplicates are **not** merged: loading `apple` twice creates two entries and
//! counts two words. Merging would change what `size()` reports.
//!
//! ## Example
//! ```
//! use std::io::Cursor;
//! use speller_dict::{Dictionary, HashTableDictionary, TableSize};
//!
//! let mut dict = HashTableDictionary::new(TableSize::Small);
//! dict.load_from_reader(Cursor::new("apple Banana\ncherry\n")).unwrap();
//!
//! assert!(dict.check("BANANA"));
//! assert!(!dict.check("durian"));
//! assert_eq!(dict.size(), 3);
//! ```

use std::io::BufRead;

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::hashing::{hash_word, TableSize};
use crate::normalize::{to_canonical, OversizePolicy};
use crate::source::{LoadReport, WordTokens};
use crate::{Backend, Dictionary};

/// One stored word and the link to the next entry of its bucket.
struct Entry {
    word: Box<str>,
    next: Option<Box<Entry>>,
}

impl Drop for Entry {
    // Unlink iteratively; the default recursive drop could exhaust the stack on a long chain.
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut entry) = next {
            next = entry.next.take();
        }
    }
}

/// Borrowing iterator over the words of one bucket, head first.
struct Chain<'a> {
    cursor: Option<&'a Entry>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor?;
        self.cursor = entry.next.as_deref();
        Some(&*entry.word)
    }
}

/// Word-membership dictionary backed by a chained hash table.
///
/// # Invariants
/// - `buckets.len() == table_size.bucket_count()` for the life of the value.
/// - Every entry reachable from `buckets[i]` stores a word `w` with
///   `hash_word(w, buckets.len()) == i`.
/// - `size` equals the number of entries across all buckets.
pub struct HashTableDictionary {
    buckets: Box<[Option<Box<Entry>>]>,
    table_size: TableSize,
    oversize: OversizePolicy,
    size: usize,
}

impl HashTableDictionary {
    /// Creates an empty table; `check` returns false and `size` is 0 until a load.
    pub fn new(table_size: TableSize) -> Self {
        Self::with_policy(table_size, OversizePolicy::default())
    }

    pub fn with_policy(table_size: TableSize, oversize: OversizePolicy) -> Self {
        let buckets = std::iter::repeat_with(|| None)
            .take(table_size.bucket_count())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            buckets,
            table_size,
            oversize,
            size: 0,
        }
    }

    #[inline]
    pub fn table_size(&self) -> TableSize {
        self.table_size
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Pushes an already-canonical word onto the head of its bucket.
    fn insert(&mut self, word: String) {
        let index = hash_word(&word, self.buckets.len());
        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry {
            word: word.into_boxed_str(),
            next: head,
        }));
        self.size += 1;
    }

    fn chain(&self, index: usize) -> Chain<'_> {
        Chain {
            cursor: self.buckets[index].as_deref(),
        }
    }

    /// Summarizes chain lengths, for choosing between table sizes.
    pub fn stats(&self) -> TableStats {
        let mut histogram: FxHashMap<usize, usize> = FxHashMap::default();
        let mut occupied = 0;
        let mut longest_chain = 0;

        for index in 0..self.buckets.len() {
            let len = self.chain(index).count();
            if len > 0 {
                occupied += 1;
            }
            longest_chain = longest_chain.max(len);
            *histogram.entry(len).or_default() += 1;
        }

        TableStats {
            bucket_count: self.buckets.len(),
            entries: self.size,
            occupied_buckets: occupied,
            longest_chain,
            chain_histogram: histogram,
        }
    }
}

impl Default for HashTableDictionary {
    fn default() -> Self {
        Self::new(TableSize::default())
    }
}

impl Dictionary for HashTableDictionary {
    fn backend(&self) -> Backend {
        Backend::HashTable
    }

    /// Reads whitespace-delimited tokens; each accepted token becomes one entry.
    ///
    /// Reaching the end of input inserts and counts nothing further, so a
    /// trailing newline (or its absence) does not change `size()`.
    fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for token in WordTokens::new(reader) {
            let token = token?;
            if let Some(word) = report.admit(&token, self.oversize) {
                trace!("insert {:?} (line {})", word, token.line);
                self.insert(word);
            }
        }

        if log::log_enabled!(log::Level::Debug) {
            let stats = self.stats();
            debug!(
                "hash table: {} entries in {}/{} buckets, longest chain {}, load factor {:.3}",
                stats.entries,
                stats.occupied_buckets,
                stats.bucket_count,
                stats.longest_chain,
                stats.load_factor()
            );
        }

        Ok(report)
    }

    fn check(&self, word: &str) -> bool {
        let key = to_canonical(word);
        let index = hash_word(&key, self.buckets.len());
        self.chain(index).any(|stored| stored == key)
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    /// Frees every entry and leaves all buckets empty; safe to call repeatedly.
    fn unload(&mut self) -> bool {
        for slot in self.buckets.iter_mut() {
            *slot = None;
        }
        debug!("hash table unloaded ({} words released)", self.size);
        self.size = 0;
        true
    }
}

/// Chain-length summary of a [`HashTableDictionary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub bucket_count: usize,
    pub entries: usize,
    pub occupied_buckets: usize,
    pub longest_chain: usize,
    /// Chain length → number of buckets with that length (0 included).
    pub chain_histogram: FxHashMap<usize, usize>,
}

impl TableStats {
    /// Average entries per bucket.
    pub fn load_factor(&self) -> f64 {
        if self.bucket_count == 0 {
            0.0
        } else {
            self.entries as f64 / self.bucket_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn loaded(text: &str, size: TableSize) -> HashTableDictionary {
        let mut dict = HashTableDictionary::new(size);
        dict.load_from_reader(Cursor::new(text)).unwrap();
        dict
    }

    #[test]
    fn empty_before_load() {
        let dict = HashTableDictionary::default();
        assert_eq!(dict.size(), 0);
        assert!(!dict.check("anything"));
        assert_eq!(dict.bucket_count(), 65521);
    }

    #[test]
    fn every_entry_sits_in_its_hash_bucket() {
        let dict = loaded("alpha beta gamma delta epsilon zeta eta theta iota kappa", TableSize::Small);
        let n = dict.bucket_count();
        for index in 0..n {
            for word in dict.chain(index) {
                assert_eq!(hash_word(word, n), index, "{} misplaced", word);
            }
        }
    }

    #[test]
    fn head_insertion_keeps_duplicates() {
        let dict = loaded("apple\nApple\nAPPLE\n", TableSize::Small);
        let index = hash_word("apple", dict.bucket_count());
        assert_eq!(dict.chain(index).collect::<Vec<_>>(), vec!["apple"; 3]);
        assert_eq!(dict.size(), 3);
        assert!(dict.check("aPPle"));
    }

    #[test]
    fn newest_entry_is_chain_head() {
        // 676 two-letter words into 509 buckets: some pair must collide.
        let n = TableSize::Small.bucket_count();
        let mut seen: FxHashMap<usize, String> = FxHashMap::default();
        let mut pair = None;
        'search: for a in b'a'..=b'z' {
            for b in b'a'..=b'z' {
                let word = String::from_utf8(vec![a, b]).unwrap();
                let index = hash_word(&word, n);
                if let Some(first) = seen.get(&index) {
                    pair = Some((index, first.clone(), word));
                    break 'search;
                }
                seen.insert(index, word);
            }
        }
        let (index, first, second) = pair.expect("pigeonhole guarantees a collision");

        let mut dict = HashTableDictionary::new(TableSize::Small);
        dict.insert(first.clone());
        dict.insert(second.clone());
        assert_eq!(
            dict.chain(index).collect::<Vec<_>>(),
            vec![second.as_str(), first.as_str()]
        );
        assert!(dict.check(&first.to_uppercase()));
        assert!(dict.check(&second));
    }

    #[test]
    fn unload_is_repeatable() {
        let mut dict = loaded("one two three", TableSize::Small);
        assert!(dict.unload());
        assert_eq!(dict.size(), 0);
        assert!(!dict.check("one"));
        assert!(dict.unload());
        assert!((0..dict.bucket_count()).all(|i| dict.chain(i).next().is_none()));
    }

    #[test]
    fn long_chain_drops_without_overflow() {
        let mut dict = HashTableDictionary::new(TableSize::Small);
        for _ in 0..200_000 {
            dict.insert("same".to_string());
        }
        assert_eq!(dict.size(), 200_000);
        assert!(dict.unload());
    }

    #[test]
    fn stats_reflect_contents() {
        let dict = loaded("apple banana cherry apple", TableSize::Small);
        let stats = dict.stats();
        assert_eq!(stats.bucket_count, 509);
        assert_eq!(stats.entries, 4);
        assert!(stats.longest_chain >= 2);
        assert_eq!(stats.chain_histogram.values().sum::<usize>(), 509);
        assert_eq!(
            stats.chain_histogram.iter().map(|(len, n)| len * n).sum::<usize>(),
            4
        );
        assert!(stats.occupied_buckets <= 3);
        assert!((stats.load_factor() - 4.0 / 509.0).abs() < 1e-12);
    }
}
