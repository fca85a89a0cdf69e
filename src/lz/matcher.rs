//! This module implements the Lempel–Ziv matchers. Matches use absolute
//! offsets and may start anywhere in the history: there is no window, so the
//! whole history is the dictionary.
//!
//! Both matchers return the same match for the same input: the longest one,
//! and among the longest the one that starts first. This keeps the compressed
//! output identical no matter which matcher produced it.
use std::ops::Range;

use crate::MatchStrategy;

/// Used to mark empty cells.
const EMPTY_CELL: usize = usize::MAX;
/// The number of bytes in the keys of the position index.
const INDEX_WORD: usize = 2;

/// Searches the history for the longest prefix of the pending input.
pub trait MatchFinder {
    /// Return the absolute range in 'history' of the longest prefix of
    /// 'pending' that occurs there. The range never extends past the end of
    /// the history. Returns an empty range at 0 if nothing matches.
    /// Consecutive calls must pass the same history, possibly grown.
    fn find_match(&mut self, history: &[u8], pending: &[u8]) -> Range<usize>;
}

/// Return the size of the common prefix of 'pending' and the history that
/// starts at 'offset'.
fn get_match_length(history: &[u8], offset: usize, pending: &[u8]) -> usize {
    history[offset..]
        .iter()
        .zip(pending)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Return True if we can prove that the match at 'offset' is not longer than
/// the best match.
fn early_disqualify(
    history: &[u8],
    offset: usize,
    pending: &[u8],
    best_size: usize,
) -> bool {
    let end = offset + best_size;
    end >= history.len()
        || best_size >= pending.len()
        || history[end] != pending[best_size]
}

/// A matcher that compares the pending input against every offset in the
/// history.
#[derive(Debug, Default)]
pub struct NaiveMatcher;

impl NaiveMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl MatchFinder for NaiveMatcher {
    fn find_match(&mut self, history: &[u8], pending: &[u8]) -> Range<usize> {
        let mut best = 0..0;
        for offset in 0..history.len() {
            if early_disqualify(history, offset, pending, best.len()) {
                continue;
            }
            let len = get_match_length(history, offset, pending);
            if best.len() < len {
                best = offset..offset + len;
                // Nothing can be longer than the pending input.
                if len == pending.len() {
                    break;
                }
            }
        }
        best
    }
}

/// A matcher that indexes every position of the history by the two bytes
/// that start there. Only positions that share the first two bytes with the
/// pending input are compared.
pub struct IndexedMatcher {
    /// The first position of each byte value in the history.
    first_seen: Vec<usize>,
    /// Maps a pair of bytes to the ascending list of positions where it
    /// starts.
    positions: Vec<Vec<usize>>,
    /// The number of history bytes that were recorded in 'first_seen'.
    scanned: usize,
    /// The number of history positions that were recorded in 'positions'.
    indexed: usize,
}

impl Default for IndexedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedMatcher {
    pub fn new() -> Self {
        Self {
            first_seen: vec![EMPTY_CELL; 256],
            positions: vec![Vec::new(); 1 << (8 * INDEX_WORD)],
            scanned: 0,
            indexed: 0,
        }
    }

    fn word_at(bytes: &[u8]) -> usize {
        ((bytes[0] as usize) << 8) | bytes[1] as usize
    }

    /// Record the positions of the bytes that were added to the history since
    /// the last call.
    fn update(&mut self, history: &[u8]) {
        debug_assert!(history.len() >= self.scanned, "History must only grow");
        for (i, byte) in history.iter().enumerate().skip(self.scanned) {
            let cell = &mut self.first_seen[*byte as usize];
            if *cell == EMPTY_CELL {
                *cell = i;
            }
        }
        self.scanned = history.len();

        while self.indexed + INDEX_WORD <= history.len() {
            let key = Self::word_at(&history[self.indexed..]);
            self.positions[key].push(self.indexed);
            self.indexed += 1;
        }
    }
}

impl MatchFinder for IndexedMatcher {
    fn find_match(&mut self, history: &[u8], pending: &[u8]) -> Range<usize> {
        self.update(history);
        if pending.is_empty() {
            return 0..0;
        }

        // The earliest single-byte match is the fallback.
        let first = self.first_seen[pending[0] as usize];
        if first == EMPTY_CELL {
            return 0..0;
        }
        let mut best = first..first + 1;
        if pending.len() < INDEX_WORD {
            return best;
        }

        // Every match of two bytes or more starts at an indexed position.
        let key = Self::word_at(pending);
        for &offset in &self.positions[key] {
            if early_disqualify(history, offset, pending, best.len()) {
                continue;
            }
            let len = get_match_length(history, offset, pending);
            if best.len() < len {
                best = offset..offset + len;
                if len == pending.len() {
                    break;
                }
            }
        }
        best
    }
}

/// Select the matcher that implements 'strategy'.
pub fn select_matcher(strategy: MatchStrategy) -> Box<dyn MatchFinder> {
    match strategy {
        MatchStrategy::Naive => Box::new(NaiveMatcher::new()),
        MatchStrategy::Indexed => Box::new(IndexedMatcher::new()),
    }
}
