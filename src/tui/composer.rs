//! Single-line mention composer backing the demo input box.
//!
//! Offsets are bytes into the buffer; edits land on grapheme boundaries so
//! the caret never splits a cluster. Mention highlights are kept in step
//! with every edit: spans after the edit shift, spans the edit cuts into
//! are dropped.

use crate::host::{ScreenPoint, TextInputHost};
use crate::model::{HighlightedRange, TextSpan};
use crate::util::unicode;

#[derive(Debug, Clone, Default)]
pub struct Composer {
    buffer: String,
    caret: usize,
    highlights: Vec<HighlightedRange>,
    origin: ScreenPoint,
    focused: bool,
}

impl Composer {
    pub fn new() -> Self {
        Composer {
            focused: true,
            ..Composer::default()
        }
    }

    /// Insert `ch` at the caret and advance past it.
    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.caret, ch);
        self.reflow_highlights(self.caret, 0, ch.len_utf8());
        self.caret += ch.len_utf8();
    }

    /// Delete the grapheme before the caret. Returns false at the start.
    pub fn backspace(&mut self) -> bool {
        let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.caret) else {
            return false;
        };
        let removed = self.caret - prev;
        self.buffer.replace_range(prev..self.caret, "");
        self.caret = prev;
        self.reflow_highlights(prev, removed, 0);
        true
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.caret) {
            self.caret = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.caret) {
            self.caret = next;
        }
    }

    pub fn move_home(&mut self) {
        self.caret = 0;
    }

    pub fn move_end(&mut self) {
        self.caret = self.buffer.len();
    }

    /// Empty the buffer, caret, and highlights (message submitted).
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.caret = 0;
        self.highlights.clear();
    }

    /// Where the composer's first text cell sits on screen, set during
    /// layout so the overlay can anchor to it.
    pub fn set_origin(&mut self, origin: ScreenPoint) {
        self.origin = origin;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Rewrite highlight spans after an edit at `pos` that removed
    /// `removed` bytes and inserted `inserted` bytes.
    fn reflow_highlights(&mut self, pos: usize, removed: usize, inserted: usize) {
        let cut_end = pos + removed;
        self.highlights.retain_mut(|h| {
            if h.span.end <= pos {
                true
            } else if h.span.start >= cut_end {
                h.span = TextSpan::new(
                    h.span.start - removed + inserted,
                    h.span.end - removed + inserted,
                );
                true
            } else {
                // The edit reached into the mention; it is no longer intact.
                false
            }
        });
    }
}

impl TextInputHost for Composer {
    fn text(&self) -> &str {
        &self.buffer
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn insert_plain(&mut self, text: &str) {
        self.buffer.insert_str(self.caret, text);
        self.reflow_highlights(self.caret, 0, text.len());
        self.caret += text.len();
    }

    fn insert_highlighted(&mut self, text: &str, group_mention: bool) {
        let start = self.caret;
        self.buffer.insert_str(start, text);
        self.reflow_highlights(start, 0, text.len());
        self.caret += text.len();
        self.highlights.push(HighlightedRange {
            span: TextSpan::new(start, self.caret),
            group_mention,
        });
    }

    fn highlights(&self) -> &[HighlightedRange] {
        &self.highlights
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn clear_style_at(&mut self, offset: usize) {
        // Reflow already severs spans an edit cuts into; this drops any
        // span the offset still lands strictly inside.
        self.highlights
            .retain(|h| !(h.span.start < offset && offset < h.span.end));
    }

    fn request_focus(&mut self) {
        self.focused = true;
    }

    fn screen_origin(&self) -> ScreenPoint {
        self.origin
    }
}
