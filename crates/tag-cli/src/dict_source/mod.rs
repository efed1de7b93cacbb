mod danbooru;

use std::io;

pub use danbooru::{preprocess, select_page, Category, DanbooruOptions, DanbooruSource, TagItem};

#[derive(Debug, thiserror::Error)]
pub enum DictSourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}
