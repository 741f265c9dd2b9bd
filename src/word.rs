//! Word decomposition (§3's "Word decomposition" data model).
//!
//! Generalizes the teacher's `parser::tokenize` state machine: instead of
//! building `Vec<String>` argv tokens, this walks the same quote/escape
//! states but records byte spans into the original buffer so the
//! highlighter and classifier can operate on slices, not copies.

/// Which quote (if any) currently encloses a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenQuote {
    None,
    Single,
    Double,
    /// `<<TAG` / `<<<TAG` heredoc body — extends to end-of-buffer for the
    /// minimal heuristic named in §9 open question (a).
    Heredoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub end: usize,
    pub quote: OpenQuote,
    /// True if any part of the word was inside quotes.
    pub quoted: bool,
    /// True if this word is a "first word" — position 0, or immediately
    /// after an unquoted `|`, `;`, or `&&` (§3: pipeline separators reset
    /// word counting).
    pub is_command_word: bool,
}

impl Word {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InWord,
    InSingle,
    InDouble,
}

/// Scan `line` into word records, tracking quote/escape state left to right.
///
/// Rules (§3):
/// - word boundaries are runs of unescaped whitespace
/// - `\ ` keeps a space inside the current word
/// - an unclosed quote extends the word to end-of-buffer
/// - `|`, `;`, `&&` outside quotes are separators and reset "first word"
pub fn decompose(line: &str) -> Vec<Word> {
    let bytes = line.as_bytes();
    let n = bytes.len();
    let mut words = Vec::new();
    let mut state = State::Normal;
    let mut word_start = 0usize;
    let mut quoted = false;
    let mut quote_kind = OpenQuote::None;
    let mut command_word_next = true;
    let mut i = 0usize;

    macro_rules! close_word {
        ($end:expr) => {{
            if $end > word_start {
                words.push(Word {
                    start: word_start,
                    end: $end,
                    quote: quote_kind,
                    quoted,
                    is_command_word: command_word_next,
                });
                command_word_next = false;
            }
            quoted = false;
            quote_kind = OpenQuote::None;
        }};
    }

    while i < n {
        let c = bytes[i] as char;
        match (state, c) {
            (State::Normal, ' ' | '\t') => {
                i += 1;
                word_start = i;
            }
            (State::Normal, '"') => {
                state = State::InDouble;
                quoted = true;
                quote_kind = OpenQuote::Double;
                i += 1;
            }
            (State::Normal, '\'') => {
                state = State::InSingle;
                quoted = true;
                quote_kind = OpenQuote::Single;
                i += 1;
            }
            (State::Normal, '\\') => {
                state = State::InWord;
                i += if i + 1 < n { 2 } else { 1 };
            }
            (State::Normal, '|' | ';') => {
                // Separator: single-char token, resets command-word tracking.
                close_word!(i);
                i += 1;
                word_start = i;
                command_word_next = true;
            }
            (State::Normal, '&') if bytes.get(i + 1) == Some(&b'&') => {
                close_word!(i);
                i += 2;
                word_start = i;
                command_word_next = true;
            }
            (State::Normal, _) => {
                state = State::InWord;
                i += 1;
            }

            (State::InWord, ' ' | '\t') => {
                close_word!(i);
                state = State::Normal;
                i += 1;
                word_start = i;
            }
            (State::InWord, '"') => {
                quoted = true;
                if quote_kind == OpenQuote::None {
                    quote_kind = OpenQuote::Double;
                }
                state = State::InDouble;
                i += 1;
            }
            (State::InWord, '\'') => {
                quoted = true;
                if quote_kind == OpenQuote::None {
                    quote_kind = OpenQuote::Single;
                }
                state = State::InSingle;
                i += 1;
            }
            (State::InWord, '\\') => {
                i += if i + 1 < n { 2 } else { 1 };
            }
            (State::InWord, '|' | ';') => {
                close_word!(i);
                state = State::Normal;
                i += 1;
                word_start = i;
                command_word_next = true;
            }
            (State::InWord, '&') if bytes.get(i + 1) == Some(&b'&') => {
                close_word!(i);
                state = State::Normal;
                i += 2;
                word_start = i;
                command_word_next = true;
            }
            (State::InWord, _) => {
                i += 1;
            }

            (State::InDouble, '"') => {
                state = State::InWord;
                i += 1;
            }
            (State::InDouble, '\\') => {
                i += if i + 1 < n { 2 } else { 1 };
            }
            (State::InDouble, _) => {
                i += 1;
            }

            (State::InSingle, '\'') => {
                state = State::InWord;
                i += 1;
            }
            (State::InSingle, _) => {
                i += 1;
            }
        }
    }

    // An unclosed quote (InSingle/InDouble) extends to end-of-buffer; so
    // does a trailing InWord. Either way, flush whatever remains.
    close_word!(n);

    words
}

/// Index (into `words`) of the word the cursor (a byte offset) sits on or
/// just after — used by the classifier/suggestion engine to find "the word
/// under edit". Returns `None` if the buffer is empty.
pub fn word_at_cursor(words: &[Word], cursor_byte: usize) -> Option<usize> {
    if words.is_empty() {
        return None;
    }
    for (idx, w) in words.iter().enumerate() {
        if cursor_byte >= w.start && cursor_byte <= w.end {
            return Some(idx);
        }
    }
    // Cursor sits in trailing whitespace past the last word.
    words.last().map(|_| words.len() - 1)
}
