//! Inline tag completion for multi-field prompt editors.
//!
//! The `api` module wires the tag dictionary (`tag_core`) and the suggestion
//! state machine (`tag_session`) to host-provided text fields and list
//! rendering, and loads the dictionary blob with bounded retry.

pub mod api;
pub mod trace_init;
