//! Tag dictionary and text-editing primitives for inline tag completion.
//!
//! `PrefixIndex` answers ranked prefix queries, `locate` finds the word under
//! the caret, and `splice` rewrites the buffer when a suggestion is accepted.

pub mod index;
pub mod locate;
pub mod settings;
pub mod splice;

pub use index::PrefixIndex;
pub use locate::{locate, WordRules, WordSpan};
pub use splice::{apply, Splice};
