//! Bounded FIFO ring of log lines.

use std::collections::VecDeque;

/// Maximum lines retained; the oldest line is evicted on overflow.
pub const MAX_LINES: usize = 10_000;

/// One received line.
///
/// `seq` counts every line ever appended to this buffer, so it stays stable
/// while older lines are evicted. Positions in the ring are 0-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Arrival number, never reused.
    pub seq: u64,
    /// Line text without the newline.
    pub text: String,
}

/// Append-only ring holding at most `capacity` lines in arrival order.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
    next_seq: u64,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    /// Buffer bounded at [`MAX_LINES`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINES)
    }

    /// Buffer with a custom bound. A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_seq: 0,
        }
    }

    /// Append one line, evicting the oldest when full.
    pub fn push(&mut self, text: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            seq: self.next_seq,
            text: text.into(),
        });
        self.next_seq += 1;
    }

    /// Split `chunk` into lines and push each non-empty one.
    ///
    /// A trailing `\r` is trimmed from every line. Returns the number pushed.
    pub fn append_chunk(&mut self, chunk: &str) -> usize {
        let mut pushed = 0;
        for line in chunk.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            self.push(line);
            pushed += 1;
        }
        pushed
    }

    /// Lines currently held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines are held.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Most lines ever held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Line at ring position `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&LogLine> {
        self.lines.get(index)
    }

    /// Lines oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> + '_ {
        self.lines.iter()
    }

    /// Drop every line. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines joined with `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buffer: &LogBuffer) -> Vec<&str> {
        buffer.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn chunk_is_split_into_lines() {
        let mut buffer = LogBuffer::new();

        let pushed = buffer.append_chunk("one\r\ntwo\n\nthree\n");

        assert_eq!(pushed, 3);
        assert_eq!(texts(&buffer), vec!["one", "two", "three"]);
    }

    #[test]
    fn blank_chunk_pushes_nothing() {
        let mut buffer = LogBuffer::new();
        assert_eq!(buffer.append_chunk("\n\r\n"), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut buffer = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(format!("line {i}"));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(texts(&buffer), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.get(0).map(|l| l.seq), Some(2));
    }

    #[test]
    fn default_capacity_is_ten_thousand() {
        let mut buffer = LogBuffer::new();
        for i in 0..10_005 {
            buffer.push(i.to_string());
        }

        assert_eq!(buffer.len(), MAX_LINES);
        assert_eq!(buffer.get(0).map(|l| l.text.as_str()), Some("5"));
        assert_eq!(buffer.get(MAX_LINES - 1).map(|l| l.text.as_str()), Some("10004"));
    }

    #[test]
    fn to_text_round_trips_lines() {
        let mut buffer = LogBuffer::new();
        buffer.append_chunk("a\nb");
        assert_eq!(buffer.to_text(), "a\nb\n");
    }
}
