use std::fs;
use std::io::BufWriter;
use std::process;
use std::time::Instant;

use serde::Serialize;

use crate::dict_source::{DanbooruOptions, DanbooruSource};
use tag_core::index::normalize_tag;
use tag_core::settings::settings;
use tag_core::PrefixIndex;
use tag_engine::api::{DictionaryLoader, HttpFetch};
use tag_session::{
    ControllerConfig, FieldId, KeyInput, ListAction, Snapshot, Suggestion, SuggestionController,
};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Caret marker in `complete` buffers.
pub const CARET_MARK: char = '|';

#[derive(Debug, thiserror::Error)]
pub enum CompleteError {
    #[error("buffer has no '|' caret marker")]
    NoCaret,
    #[error("no suggestions for {0:?}")]
    NoSuggestions(String),
    #[error("pick {pick} out of range ({count} suggestions)")]
    PickOutOfRange { pick: usize, count: usize },
}

#[derive(Debug, Serialize)]
struct QueryRow<'a> {
    rank: usize,
    insert: &'a str,
    label: &'a str,
}

fn load_index(file: &str) -> PrefixIndex {
    let blob = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = settings();
    PrefixIndex::from_blob(&blob, s.dictionary.default_weight, s.suggest.max_results)
}

pub fn fetch(url: &str, output_file: &str) {
    let s = settings();
    let mut loader = DictionaryLoader::from_settings("", &s.dictionary);
    loader.path = url.to_string();

    eprintln!("Fetching {url} (up to {} attempts)...", loader.max_attempts);
    let blob = die!(loader.load(&HttpFetch), "Error fetching dictionary: {}");
    die!(fs::write(output_file, &blob), "Error writing {output_file}: {}");

    let index = PrefixIndex::from_blob(&blob, s.dictionary.default_weight, s.suggest.max_results);
    eprintln!("Wrote {output_file} ({} tags)", index.len());
}

/// Build a tag dictionary from Danbooru's count-ordered tag list.
pub fn danbooru(output_file: &str, opts: DanbooruOptions) {
    eprintln!(
        "Fetching Danbooru tags (min posts {}, categories {:?})...",
        opts.min_post_count, opts.categories
    );
    let file = die!(fs::File::create(output_file), "Error creating {output_file}: {}");
    let mut out = BufWriter::new(file);
    let source = DanbooruSource { opts };
    let written = die!(source.fetch(&mut out), "Error fetching tags: {}");
    eprintln!("Wrote {output_file} ({written} tags)");
}

pub fn stats(file: &str) {
    let blob = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = settings();
    let index = PrefixIndex::from_blob(&blob, s.dictionary.default_weight, s.suggest.max_results);
    let (lines, references) = count_lines(&blob, s.dictionary.default_weight);

    println!("Lines:      {lines}");
    println!("Tags:       {}", index.len());
    println!("References: {references}");
}

/// Non-blank dictionary lines and how many of them are weighted references.
pub fn count_lines(blob: &str, default_weight: f64) -> (usize, usize) {
    let tags: Vec<_> = blob
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .filter_map(|l| normalize_tag(l, default_weight))
        .collect();
    let references = tags
        .iter()
        .filter(|t| t.display.as_deref().is_some_and(|d| d.starts_with('<')))
        .count();
    (tags.len(), references)
}

pub fn query(file: &str, prefix: &str, n: usize, json: bool) {
    let index = load_index(file);
    let results = index.query_limited(prefix, n);
    let suggestions: Vec<Suggestion> = results.into_iter().map(Suggestion::new).collect();

    if json {
        let rows: Vec<QueryRow<'_>> = suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| QueryRow {
                rank: i + 1,
                insert: &s.insert,
                label: &s.label,
            })
            .collect();
        let out = die!(serde_json::to_string_pretty(&rows), "Error: {}");
        println!("{out}");
        return;
    }

    if suggestions.is_empty() {
        eprintln!("No matches for {prefix:?}");
        return;
    }
    for (i, s) in suggestions.iter().enumerate() {
        if s.label == s.insert {
            println!("{:>3}. {}", i + 1, s.insert);
        } else {
            println!("{:>3}. {}  -> {}", i + 1, s.label, s.insert);
        }
    }
}

pub fn complete(file: &str, marked: &str, pick: usize) {
    let index = load_index(file);
    let out = die!(complete_buffer(&index, marked, pick), "Error: {}");
    println!("{out}");
}

/// Open the list at the `|` caret in `marked`, accept row `pick`, and return
/// the new buffer with `|` at the resulting caret.
pub fn complete_buffer(
    index: &PrefixIndex,
    marked: &str,
    pick: usize,
) -> Result<String, CompleteError> {
    let caret = marked.find(CARET_MARK).ok_or(CompleteError::NoCaret)?;
    let buffer = marked.replacen(CARET_MARK, "", 1);

    let field = FieldId(0);
    let mut ctrl = SuggestionController::new(ControllerConfig::from_settings(settings()));
    let resp = ctrl.handle_key(
        field,
        KeyInput::explicit_trigger(),
        Snapshot::new(&buffer, caret),
        Some(index),
        Instant::now(),
    );

    let ListAction::Show { items, .. } = resp.list else {
        return Err(CompleteError::NoSuggestions(buffer[..caret].to_string()));
    };
    if pick >= items.len() {
        return Err(CompleteError::PickOutOfRange {
            pick,
            count: items.len(),
        });
    }

    let edit = ctrl
        .click(pick)
        .edit
        .ok_or_else(|| CompleteError::NoSuggestions(buffer[..caret].to_string()))?;
    let (head, tail) = edit.text.split_at(edit.caret);
    Ok(format!("{head}{CARET_MARK}{tail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PrefixIndex {
        PrefixIndex::from_blob("banana\nbandana\nlora:Detail\nblue eyes\n", 0.8, 20)
    }

    #[test]
    fn completes_mid_buffer() {
        assert_eq!(complete_buffer(&index(), "a, b|c", 0).unwrap(), "a, banana, |c");
    }

    #[test]
    fn picks_later_row() {
        assert_eq!(complete_buffer(&index(), "ban|", 1).unwrap(), "bandana, |");
    }

    #[test]
    fn completes_weighted_reference() {
        assert_eq!(
            complete_buffer(&index(), "1girl, (det|", 0).unwrap(),
            "1girl, (<lora:Detail:0.8>, |"
        );
    }

    #[test]
    fn reports_missing_caret() {
        assert!(matches!(
            complete_buffer(&index(), "ban", 0),
            Err(CompleteError::NoCaret)
        ));
    }

    #[test]
    fn reports_no_suggestions() {
        assert!(matches!(
            complete_buffer(&index(), "zzz|", 0),
            Err(CompleteError::NoSuggestions(_))
        ));
    }

    #[test]
    fn reports_pick_out_of_range() {
        assert!(matches!(
            complete_buffer(&index(), "blue|", 3),
            Err(CompleteError::PickOutOfRange { pick: 3, count: 1 })
        ));
    }

    #[test]
    fn counts_references() {
        let blob = "# header\nlong hair\n\nlora:A\n<lora:B:0.5>\n";
        assert_eq!(count_lines(blob, 1.0), (3, 2));
    }
}
