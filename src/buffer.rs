use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A cursor-tracked, always-valid-UTF-8 text buffer.
///
/// Indexing is grapheme-based everywhere the line editor or classifier
/// reasons about "characters", per §3's data model — a cursor move or
/// delete never splits a combining-mark cluster or a wide CJK glyph.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    text: String,
    /// Cursor position, in graphemes (0 = before the first grapheme).
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        InputBuffer::default()
    }

    pub fn from_str(s: &str) -> Self {
        let mut b = InputBuffer {
            text: s.to_string(),
            cursor: 0,
        };
        b.cursor = b.end();
        b
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of graphemes in the buffer — the "end" position of §3.
    pub fn end(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of `self.cursor` within `text`.
    pub fn cursor_byte_offset(&self) -> usize {
        self.grapheme_byte_offset(self.cursor)
    }

    /// Byte offset of the `nth` grapheme boundary (0 = start, `end()` = len).
    pub fn grapheme_byte_offset(&self, nth: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(nth)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Display width of the buffer up to (not including) the cursor —
    /// combining marks contribute 0, wide CJK contribute 2, per §3.
    pub fn display_width_to_cursor(&self) -> usize {
        let byte_off = self.cursor_byte_offset();
        UnicodeWidthStr::width(&self.text[..byte_off])
    }

    pub fn display_width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }

    /// Clamp an arbitrary position into `0..=end()` — out-of-range cursor
    /// moves are clamped, never an error (§4.2 failure semantics).
    fn clamp(&self, pos: usize) -> usize {
        pos.min(self.end())
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = self.clamp(pos);
    }

    pub fn insert(&mut self, grapheme: &str) {
        let byte_off = self.cursor_byte_offset();
        self.text.insert_str(byte_off, grapheme);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.grapheme_byte_offset(self.cursor - 1);
        let end = self.cursor_byte_offset();
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.end() {
            return;
        }
        let start = self.cursor_byte_offset();
        let end = self.grapheme_byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.clamp(self.cursor + 1);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end_of_line(&mut self) {
        self.cursor = self.end();
    }

    /// Move to the start of the word the cursor sits in, or the previous
    /// word if already at a word start. Word = run of non-whitespace.
    pub fn word_left(&mut self) {
        let graphemes: Vec<&str> = self.text.graphemes(true).collect();
        let mut i = self.cursor;
        while i > 0 && is_space(graphemes[i - 1]) {
            i -= 1;
        }
        while i > 0 && !is_space(graphemes[i - 1]) {
            i -= 1;
        }
        self.cursor = i;
    }

    pub fn word_right(&mut self) {
        let graphemes: Vec<&str> = self.text.graphemes(true).collect();
        let n = graphemes.len();
        let mut i = self.cursor;
        while i < n && is_space(graphemes[i]) {
            i += 1;
        }
        while i < n && !is_space(graphemes[i]) {
            i += 1;
        }
        self.cursor = i;
    }

    /// Remove `[cursor, end)`, returning the killed text for the yank register.
    pub fn kill_to_end(&mut self) -> String {
        let start = self.cursor_byte_offset();
        let killed = self.text[start..].to_string();
        self.text.truncate(start);
        killed
    }

    /// Remove `[0, cursor)`, returning the killed text for the yank register.
    pub fn kill_to_start(&mut self) -> String {
        let end = self.cursor_byte_offset();
        let killed = self.text[..end].to_string();
        self.text.replace_range(..end, "");
        self.cursor = 0;
        killed
    }

    /// Remove the word immediately before the cursor (Ctrl-W), returning it.
    pub fn kill_word_before(&mut self) -> String {
        let before = self.cursor;
        self.word_left();
        let start = self.grapheme_byte_offset(self.cursor);
        let end = self.grapheme_byte_offset(before);
        let killed = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        killed
    }

    pub fn yank(&mut self, register: &str) {
        if register.is_empty() {
            return;
        }
        let byte_off = self.cursor_byte_offset();
        self.text.insert_str(byte_off, register);
        self.cursor += register.graphemes(true).count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn replace(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = self.end();
    }

    /// Append `tail` at the given byte offset and move the cursor to the
    /// new end — used by `accept_suggestion`.
    pub fn append_at(&mut self, byte_offset: usize, tail: &str) {
        self.text.insert_str(byte_offset, tail);
        self.cursor = self.end();
    }

    /// Replace the last word (from `word_start` byte offset to end) with
    /// `text` — used by BAEJ acceptance.
    pub fn replace_last_word(&mut self, word_start_byte: usize, text: &str) {
        self.text.replace_range(word_start_byte.., text);
        self.cursor = self.end();
    }
}

fn is_space(g: &str) -> bool {
    g == " " || g == "\t"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_cursor_never_exceeds_end() {
        let mut b = InputBuffer::from_str("abc");
        b.set_cursor(999);
        assert!(b.cursor() <= b.end());
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn insert_moves_cursor_right_by_one_grapheme() {
        let mut b = InputBuffer::new();
        b.insert("h");
        b.insert("i");
        assert_eq!(b.as_str(), "hi");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn backspace_removes_preceding_grapheme() {
        let mut b = InputBuffer::from_str("hi");
        b.backspace();
        assert_eq!(b.as_str(), "h");
        assert_eq!(b.cursor(), 1);
    }

    #[test]
    fn combining_mark_is_one_grapheme() {
        // "e" + combining acute accent U+0301 forms a single grapheme cluster.
        let mut b = InputBuffer::from_str("e\u{0301}x");
        assert_eq!(b.end(), 2);
        b.set_cursor(1);
        b.delete();
        assert_eq!(b.as_str(), "e\u{0301}");
    }

    #[test]
    fn wide_cjk_counts_width_two() {
        let b = InputBuffer::from_str("好");
        assert_eq!(b.display_width(), 2);
    }

    #[test]
    fn word_left_and_right_skip_whitespace_runs() {
        let mut b = InputBuffer::from_str("foo  bar");
        b.end_of_line();
        b.word_left();
        assert_eq!(b.cursor(), 5); // start of "bar"
        b.word_left();
        assert_eq!(b.cursor(), 0); // start of "foo"
        b.word_right();
        assert_eq!(b.cursor(), 3); // end of "foo"
    }

    #[test]
    fn kill_to_end_then_yank_reproduces_buffer() {
        let mut b = InputBuffer::from_str("hello world");
        b.set_cursor(5);
        let killed = b.kill_to_end();
        assert_eq!(b.as_str(), "hello");
        b.yank(&killed);
        assert_eq!(b.as_str(), "hello world");
    }

    #[test]
    fn kill_word_before_matches_word_boundary() {
        let mut b = InputBuffer::from_str("echo hello world");
        b.end_of_line();
        let killed = b.kill_word_before();
        assert_eq!(killed, "world");
        assert_eq!(b.as_str(), "echo hello ");
    }

    #[test]
    fn accept_suggestion_then_backspace_reproduces_prior_buffer() {
        let mut b = InputBuffer::from_str("cd /et");
        let before = b.as_str().to_string();
        let before_cursor = b.cursor();
        b.append_at(b.as_str().len(), "c/");
        assert_eq!(b.as_str(), "cd /etc/");
        // Backspacing off exactly the accepted tail reproduces prior state.
        b.backspace();
        b.backspace();
        assert_eq!(b.as_str(), before);
        assert_eq!(b.cursor(), before_cursor);
    }
}
