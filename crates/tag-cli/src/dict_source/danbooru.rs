use std::io::Write;
use std::thread;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use super::DictSourceError;

/// Tag list sorted by post count, most used first.
const TAGS_URL: &str = "https://danbooru.donmai.us/tags.json?limit=1000&search[hide_empty]=yes&search[is_deprecated]=no&search[order]=count";
const MAX_PAGE: u32 = 99;
const PAGE_DELAY: Duration = Duration::from_millis(250);

/// Danbooru tag categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    General,
    Artist,
    Copyright,
    Character,
    Meta,
}

impl Category {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::General),
            1 => Some(Self::Artist),
            3 => Some(Self::Copyright),
            4 => Some(Self::Character),
            5 => Some(Self::Meta),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DanbooruOptions {
    /// Stop at the first tag used by fewer posts than this.
    pub min_post_count: i64,
    pub categories: Vec<Category>,
    pub keep_underscore: bool,
    pub escape_brackets: bool,
}

impl Default for DanbooruOptions {
    fn default() -> Self {
        Self {
            min_post_count: 64,
            categories: vec![Category::General, Category::Copyright, Category::Character],
            keep_underscore: false,
            escape_brackets: true,
        }
    }
}

/// One entry of the `tags.json` response.
#[derive(Debug, Deserialize)]
pub struct TagItem {
    pub name: String,
    #[serde(default)]
    pub post_count: Option<i64>,
    #[serde(default)]
    pub category: Option<i64>,
}

/// Dictionary spelling of a Danbooru tag name: underscores become spaces and
/// parentheses are escaped so prompt parsers do not read them as emphasis.
pub fn preprocess(name: &str, opts: &DanbooruOptions) -> String {
    let mut tag = if opts.keep_underscore {
        name.to_string()
    } else {
        name.replace('_', " ")
    };
    if opts.escape_brackets {
        tag = tag.replace('(', "\\(").replace(')', "\\)");
    }
    tag
}

/// Lines to keep from one page, and whether the post-count floor was reached.
pub fn select_page(items: &[TagItem], opts: &DanbooruOptions) -> (Vec<String>, bool) {
    let mut lines = Vec::new();
    for item in items {
        if item.post_count.unwrap_or(-1) < opts.min_post_count {
            return (lines, true);
        }
        let wanted = item
            .category
            .and_then(Category::from_code)
            .is_some_and(|c| opts.categories.contains(&c));
        if wanted {
            lines.push(preprocess(&item.name, opts));
        }
    }
    (lines, false)
}

pub struct DanbooruSource {
    pub opts: DanbooruOptions,
}

impl DanbooruSource {
    fn fetch_page(page: u32) -> Result<Vec<TagItem>, DictSourceError> {
        let url = format!("{TAGS_URL}&page={page}");
        let body = ureq::get(&url)
            .call()
            .map_err(|e| DictSourceError::Http(format!("page {page}: {e}")))?
            .into_body()
            .read_to_string()
            .map_err(|e| DictSourceError::Http(format!("page {page}: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| DictSourceError::Parse(format!("page {page} JSON: {e}")))
    }

    /// Walk the count-ordered tag list and write one tag per line to `out`.
    /// Returns the number of tags written.
    pub fn fetch(&self, out: &mut dyn Write) -> Result<usize, DictSourceError> {
        let mut written = 0;
        for page in 1..=MAX_PAGE {
            eprint!("Page {page}...\r");
            let items = Self::fetch_page(page)?;
            if items.is_empty() {
                break;
            }

            let (lines, finished) = select_page(&items, &self.opts);
            for line in &lines {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
            written += lines.len();

            if finished {
                break;
            }
            thread::sleep(PAGE_DELAY);
        }
        eprintln!();
        Ok(written)
    }
}
