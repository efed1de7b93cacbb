//! Buffer rewrite when a suggestion is accepted.

use crate::locate::WordSpan;

const SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub text: String,
    /// Byte offset just past the separator that follows the inserted tag.
    pub caret: usize,
}

/// Replace `span` in `buffer` with `tag` followed by `", "`.
///
/// A word that directly follows a comma gets a leading space. Text outside
/// the span is left untouched.
pub fn apply(buffer: &str, span: &WordSpan, tag: &str) -> Splice {
    let start = span.start.min(buffer.len());
    let end = span.end.clamp(start, buffer.len());
    let (head, tail) = (&buffer[..start], &buffer[end..]);

    let lead = if start > 0 && head.ends_with(',') { " " } else { "" };

    let mut text =
        String::with_capacity(head.len() + lead.len() + tag.len() + SEPARATOR.len() + tail.len());
    text.push_str(head);
    text.push_str(lead);
    text.push_str(tag);
    text.push_str(SEPARATOR);
    let caret = text.len();
    text.push_str(tail);

    Splice { text, caret }
}
