//! Letter-indexed trie dictionary backend.
//!
//! Each node has 27 child slots, one per lowercase letter plus one for the
//! apostrophe, and an `is_word` flag. A word is stored as the path of its
//! canonical characters from the root, with the flag set on the last node.
//! Lookup cost is the word's length and does not depend on the dictionary size.
//!
//! Children are `Option<Box<Node>>`, so every node owns its subtree outright and
//! dropping the root releases the whole tree. Paths are at most
//! [`LENGTH`](crate::normalize::LENGTH) deep, so the recursive drop stays shallow.
//!
//! Nodes are never pruned: nothing is removed short of `unload`, so no dead
//! branches can appear.

use std::io::BufRead;

use log::{debug, trace};

use crate::error::Result;
use crate::normalize::{to_canonical, OversizePolicy};
use crate::source::{LoadReport, WordLines};
use crate::{Backend, Dictionary};

/// Letters of the alphabet plus apostrophe.
pub const CHARS: usize = 27;

/// Slot of the apostrophe; letters use `0..26`.
const APOSTROPHE: usize = CHARS - 1;

/// Maps a canonical byte to its child slot; `None` for bytes with no slot.
#[inline]
pub fn child_index(b: u8) -> Option<usize> {
    match b {
        b'a'..=b'z' => Some((b - b'a') as usize),
        b'\'' => Some(APOSTROPHE),
        _ => None,
    }
}

#[derive(Default)]
struct Node {
    // Does this node end a dictionary word?
    is_word: bool,
    children: [Option<Box<Node>>; CHARS],
}

/// Word-membership dictionary backed by a 27-way trie.
///
/// The root stands for the empty prefix and always exists, so a dictionary
/// that was never loaded simply answers `false`.
pub struct TrieDictionary {
    root: Box<Node>,
    oversize: OversizePolicy,
    size: usize,
    node_count: usize,
}

impl TrieDictionary {
    pub fn new() -> Self {
        Self::with_policy(OversizePolicy::default())
    }

    pub fn with_policy(oversize: OversizePolicy) -> Self {
        Self {
            root: Box::default(),
            oversize,
            size: 0,
            node_count: 1,
        }
    }

    /// Number of allocated nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Walks (and extends) the path of an already-canonical word and marks its end.
    ///
    /// Every accepted line counts toward `size`, repeated words included,
    /// which keeps the count in line with the hash-table backend.
    fn insert(&mut self, word: &str) {
        debug_assert!(
            word.bytes().all(|b| child_index(b).is_some()),
            "word {:?} was not canonicalized",
            word
        );

        let mut created = 0;
        let mut node = &mut *self.root;
        for index in word.bytes().filter_map(child_index) {
            node = &mut **node.children[index].get_or_insert_with(|| {
                created += 1;
                Box::default()
            });
        }
        node.is_word = true;

        self.node_count += created;
        self.size += 1;
    }
}

impl Default for TrieDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for TrieDictionary {
    fn backend(&self) -> Backend {
        Backend::Trie
    }

    /// Reads one word per line.
    ///
    /// A last line with no trailing newline still counts, and blank lines
    /// are skipped.
    fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for line in WordLines::new(reader) {
            let line = line?;
            if let Some(word) = report.admit(&line, self.oversize) {
                trace!("insert {:?} (line {})", word, line.line);
                self.insert(&word);
            }
        }

        debug!(
            "trie: {} words across {} nodes",
            self.size, self.node_count
        );
        Ok(report)
    }

    fn check(&self, word: &str) -> bool {
        let key = to_canonical(word);
        let mut node = &*self.root;

        for b in key.bytes() {
            match child_index(b).and_then(|i| node.children[i].as_deref()) {
                Some(child) => node = child,
                None => return false,
            }
        }

        node.is_word
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    /// Drops the whole tree and starts over from an empty root.
    fn unload(&mut self) -> bool {
        self.root = Box::default();
        debug!(
            "trie unloaded ({} words, {} nodes released)",
            self.size, self.node_count
        );
        self.size = 0;
        self.node_count = 1;
        true
    }
}
