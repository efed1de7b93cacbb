//! Current-word detection under the caret.

use serde::Deserialize;

/// Word boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordRules {
    /// Characters that end the previous word.
    pub delimiters: Vec<char>,
    /// Characters skipped at the start of a word (nesting and weighting
    /// punctuation the user may be mid-typing).
    pub opening: Vec<char>,
    #[serde(default)]
    pub trim_whitespace: bool,
}

impl Default for WordRules {
    fn default() -> Self {
        Self {
            delimiters: vec!['\n', ',', ':', '|'],
            opening: vec!['(', '[', '{', ' '],
            trim_whitespace: false,
        }
    }
}

/// Half-open byte range `[start, end)` of the current word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Find the word ending at `caret`.
///
/// An out-of-range caret is clamped to the buffer, and a caret inside a
/// multi-byte character is moved back to its start.
pub fn locate(buffer: &str, caret: usize, rules: &WordRules) -> WordSpan {
    let end = floor_char_boundary(buffer, caret);
    let before = &buffer[..end];

    let mut start = before
        .char_indices()
        .rev()
        .find(|(_, c)| rules.delimiters.contains(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    for c in buffer[start..end].chars() {
        if !rules.opening.contains(&c) && !(rules.trim_whitespace && c.is_whitespace()) {
            break;
        }
        start += c.len_utf8();
    }

    let mut end = end;
    if rules.trim_whitespace {
        end = start + buffer[start..end].trim_end().len();
    }

    WordSpan {
        start,
        end,
        text: buffer[start..end].to_string(),
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
