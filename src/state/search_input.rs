//! Search input line: editable draft, cursor and history recall.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;

/// What a key did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Text changed; the live query should be re-applied.
    Edited,
    /// Only the cursor moved.
    Moved,
    /// Nothing the input understands.
    Ignored,
}

/// State of the search input while search entry is active.
///
/// `saved_query` is the query that was in effect when entry began, restored
/// if the search is cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    saved_query: String,
    /// Index into history while recalling, counted from the newest entry.
    recall: Option<usize>,
}

impl SearchInput {
    /// Start editing with `current_query` as the draft.
    pub fn begin(&mut self, current_query: &str) {
        self.text = current_query.to_string();
        self.cursor = self.text.chars().count();
        self.saved_query = current_query.to_string();
        self.recall = None;
    }

    /// Current draft.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor (for measuring its column).
    pub fn before_cursor(&self) -> &str {
        let end = self.byte_offset(self.cursor);
        &self.text[..end]
    }

    /// Query in effect before entry began.
    pub fn saved_query(&self) -> &str {
        &self.saved_query
    }

    /// Edit the draft. Up/Down recall entries from `history`.
    pub fn handle_key(&mut self, key: KeyEvent, history: &VecDeque<String>) -> InputOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    return InputOutcome::Ignored;
                }
                self.set_text(String::new());
                InputOutcome::Edited
            }
            KeyCode::Char('a') if ctrl => self.move_to(0),
            KeyCode::Char('e') if ctrl => self.move_to(self.len()),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                InputOutcome::Ignored
            }
            KeyCode::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                self.recall = None;
                InputOutcome::Edited
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputOutcome::Ignored;
                }
                let at = self.byte_offset(self.cursor - 1);
                self.text.remove(at);
                self.cursor -= 1;
                self.recall = None;
                InputOutcome::Edited
            }
            KeyCode::Delete => {
                if self.cursor >= self.len() {
                    return InputOutcome::Ignored;
                }
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                self.recall = None;
                InputOutcome::Edited
            }
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to((self.cursor + 1).min(self.len())),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.len()),
            KeyCode::Up => self.recall_older(history),
            KeyCode::Down => self.recall_newer(history),
            _ => InputOutcome::Ignored,
        }
    }

    fn recall_older(&mut self, history: &VecDeque<String>) -> InputOutcome {
        if history.is_empty() {
            return InputOutcome::Ignored;
        }
        let next = match self.recall {
            None => 0,
            Some(i) if i + 1 < history.len() => i + 1,
            Some(_) => return InputOutcome::Ignored,
        };
        self.recall = Some(next);
        let entry = history[history.len() - 1 - next].clone();
        self.set_text(entry);
        InputOutcome::Edited
    }

    fn recall_newer(&mut self, history: &VecDeque<String>) -> InputOutcome {
        match self.recall {
            None => InputOutcome::Ignored,
            Some(0) => {
                self.recall = None;
                self.set_text(String::new());
                InputOutcome::Edited
            }
            Some(i) => {
                self.recall = Some(i - 1);
                let entry = history
                    .get(history.len().saturating_sub(i))
                    .cloned()
                    .unwrap_or_default();
                self.set_text(entry);
                InputOutcome::Edited
            }
        }
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.cursor = self.len();
    }

    fn move_to(&mut self, cursor: usize) -> InputOutcome {
        if cursor == self.cursor {
            return InputOutcome::Ignored;
        }
        self.cursor = cursor;
        InputOutcome::Moved
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
