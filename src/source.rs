//! Readers that turn a word-list file into raw tokens.
//!
//! Two framings exist because the backends historically read the file
//! differently:
//!
//! - [`WordLines`]: one token per line (trie backend).
//! - [`WordTokens`]: whitespace-delimited tokens (hash-table backend).
//!
//! Both read raw bytes, so a file with invalid UTF-8 does not abort the load:
//! offending bytes become `U+FFFD` and the token policy rejects them later.

use std::io::{self, BufRead};

use log::warn;

use crate::normalize::{canonicalize_token, OversizePolicy, TokenRejection};

/// A raw token together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceToken {
    pub line: usize,
    pub text: String,
}

/// Outcome of a load: how many words went in and how many tokens were skipped.
///
/// Blank lines are not tokens and count toward neither field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

impl LoadReport {
    /// Runs `token` through the token policy, updating the tallies.
    ///
    /// Returns the canonical word when it should be inserted.
    pub(crate) fn admit(&mut self, token: &SourceToken, policy: OversizePolicy) -> Option<String> {
        match canonicalize_token(&token.text, policy) {
            Ok(word) => {
                self.accepted += 1;
                Some(word)
            }
            Err(TokenRejection::Empty) => None,
            Err(reason) => {
                warn!("skipping dictionary token {:?} on line {}: {}", token.text, token.line, reason);
                self.rejected += 1;
                None
            }
        }
    }

    /// Adds another report's tallies (used when a dictionary is loaded from several files).
    pub fn merge(&mut self, other: LoadReport) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
    }
}

/// Iterates the lines of a reader, trimmed of surrounding whitespace.
///
/// A final line without a trailing newline is still yielded.
pub struct WordLines<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
}

impl<R: BufRead> WordLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(64),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for WordLines<R> {
    type Item = io::Result<SourceToken>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            // End of input: nothing was read, so nothing is counted.
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                // Trimming also drops the `\n` / `\r\n` terminator.
                let text = String::from_utf8_lossy(&self.buf);
                Some(Ok(SourceToken {
                    line: self.line,
                    text: text.trim().to_string(),
                }))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Iterates whitespace-delimited tokens of a reader.
pub struct WordTokens<R> {
    lines: WordLines<R>,
    pending: std::vec::IntoIter<String>,
    line: usize,
}

impl<R: BufRead> WordTokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: WordLines::new(reader),
            pending: Vec::new().into_iter(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for WordTokens<R> {
    type Item = io::Result<SourceToken>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(text) = self.pending.next() {
                return Some(Ok(SourceToken {
                    line: self.line,
                    text,
                }));
            }

            match self.lines.next()? {
                Ok(source) => {
                    self.line = source.line;
                    self.pending = source
                        .text
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                        .into_iter();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
