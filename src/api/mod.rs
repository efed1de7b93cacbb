//! Host-facing layer: attaches the controller to editor fields, applies its
//! responses, and loads the dictionary.

pub mod host;
pub mod loader;
mod session;


pub use host::{HostUi, SurfaceHost, TextSurface};
pub use loader::{Backoff, DictionaryLoader, Fetch, FileFetch, HttpFetch, LoadError};
pub use session::{AutocompleteSession, LoadState};

/// Prompt fields attached when settings do not override `[fields] ids`.
pub const DEFAULT_FIELD_IDS: [&str; 6] = [
    "txt2img_prompt",
    "txt2img_neg_prompt",
    "img2img_prompt",
    "img2img_neg_prompt",
    "hires_prompt",
    "hires_neg_prompt",
];
