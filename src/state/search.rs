//! Live substring search over the log buffer.
//!
//! Matches are positions in the [`LogBuffer`], oldest first. They are always
//! recomputed from scratch from (buffer, query) and never patched, so the
//! result is a pure function of its inputs.

use crate::state::log_buffer::LogBuffer;
use std::collections::VecDeque;

// ===== Limits =====

/// Matches beyond this many are dropped; the filtered view shows the same set.
pub const MAX_SEARCH_RESULTS: usize = 1_000;

/// Confirmed queries remembered for recall.
pub const MAX_SEARCH_HISTORY: usize = 50;

// ===== SearchState =====

/// Query, its matches, the match cursor and confirmed-query history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    matches: Vec<usize>,
    /// `LogLine::seq` of each match, parallel to `matches`.
    match_seqs: Vec<u64>,
    cursor: usize,
    history: VecDeque<String>,
}

impl SearchState {
    /// Empty query, no matches, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// The applied query; empty when search is off.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a non-empty query is filtering the view.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Buffer positions of matching lines, oldest first.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Index into [`Self::matches`] of the current match.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer position of the match under the cursor.
    pub fn current_match(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// Confirmed queries, oldest first.
    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    /// Replace the query and recompute matches.
    pub fn set_query(&mut self, query: impl Into<String>, buffer: &LogBuffer) {
        self.query = query.into();
        self.recompute(buffer);
    }

    /// Recompute matches from the buffer.
    ///
    /// Case-insensitive substring match, capped at [`MAX_SEARCH_RESULTS`].
    /// An empty query yields no matches. The cursor stays on the same line
    /// when that line still matches. If the line was evicted the cursor moves
    /// to the oldest match; otherwise it is kept when in range and reset to 0
    /// when not.
    pub fn recompute(&mut self, buffer: &LogBuffer) {
        let anchor = self.match_seqs.get(self.cursor).copied();

        self.matches = find_matches(buffer, &self.query);
        self.match_seqs = self
            .matches
            .iter()
            .filter_map(|i| buffer.get(*i).map(|line| line.seq))
            .collect();

        let kept = anchor.and_then(|seq| self.match_seqs.iter().position(|s| *s == seq));
        let evicted = match (anchor, buffer.get(0)) {
            (Some(seq), Some(oldest)) => seq < oldest.seq,
            _ => false,
        };
        self.cursor = match kept {
            Some(position) => position,
            None if evicted => 0,
            None if self.cursor < self.matches.len() => self.cursor,
            None => 0,
        };
    }

    /// Drop the query and matches; history is kept.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.match_seqs.clear();
        self.cursor = 0;
    }

    /// Advance the cursor circularly. Returns the new match position.
    pub fn next_match(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.matches.len();
        self.current_match()
    }

    /// Move the cursor back circularly. Returns the new match position.
    pub fn prev_match(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.current_match()
    }

    /// Remember a confirmed query.
    ///
    /// Empty and already-remembered queries are ignored; the oldest entry is
    /// evicted past [`MAX_SEARCH_HISTORY`].
    pub fn record_history(&mut self, query: &str) {
        if query.is_empty() || self.history.iter().any(|q| q == query) {
            return;
        }
        if self.history.len() == MAX_SEARCH_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(query.to_string());
    }

    /// Forget everything except history (a new stream was opened).
    pub fn reset_keeping_history(&mut self) {
        let history = std::mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
    }
}

// ===== Match Extraction =====

/// Positions of lines containing `query`, case-insensitively, oldest first.
pub fn find_matches(buffer: &LogBuffer, query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    buffer
        .iter()
        .enumerate()
        .filter(|(_, line)| line.text.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

// ===== Tests =====

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
