//! Fetching the dictionary blob with bounded retry.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, warn};

use tag_core::settings::{BackoffKind, DictionarySettings};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("empty dictionary: {0}")]
    Empty(String),
    #[error("loader thread exited without a result")]
    Disconnected,
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<LoadError> },
}

/// Source of dictionary text.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// Plain GET; non-2xx statuses and transport failures are errors.
pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        ureq::get(url)
            .call()
            .map_err(|e| LoadError::Http(format!("{url}: {e}")))?
            .into_body()
            .read_to_string()
            .map_err(|e| LoadError::Http(format!("{url}: {e}")))
    }
}

/// Reads the URL as a path, relative to `root` when one is set.
#[derive(Default)]
pub struct FileFetch {
    pub root: Option<PathBuf>,
}

impl Fetch for FileFetch {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let path = match &self.root {
            Some(root) => root.join(url),
            None => PathBuf::from(url),
        };
        Ok(fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// Waits `step * attempt` after the n-th failure.
    Linear(Duration),
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(d) => d,
            Backoff::Linear(step) => step.saturating_mul(attempt),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryLoader {
    pub base_url: String,
    pub path: String,
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl DictionaryLoader {
    pub fn from_settings(base_url: impl Into<String>, dict: &DictionarySettings) -> Self {
        let step = Duration::from_millis(dict.backoff_ms);
        Self {
            base_url: base_url.into(),
            path: dict.path.clone(),
            max_attempts: dict.max_attempts,
            backoff: match dict.backoff {
                BackoffKind::Fixed => Backoff::Fixed(step),
                BackoffKind::Linear => Backoff::Linear(step),
            },
        }
    }

    /// `base_url` joined with `path`. An absolute `path` is used as-is.
    pub fn url(&self) -> String {
        if self.base_url.is_empty() || self.path.contains("://") {
            return self.path.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// Fetch the blob, retrying up to `max_attempts` times.
    pub fn load(&self, fetch: &dyn Fetch) -> Result<String, LoadError> {
        let url = self.url();
        let attempts = self.max_attempts.max(1);
        let mut last = LoadError::Empty(url.clone());

        for attempt in 1..=attempts {
            match fetch.fetch(&url) {
                Ok(body) if !body.trim().is_empty() => {
                    debug!(%url, attempt, bytes = body.len(), "dictionary loaded");
                    return Ok(body);
                }
                Ok(_) => last = LoadError::Empty(url.clone()),
                Err(e) => last = e,
            }
            warn!(%url, attempt, error = %last, "dictionary fetch failed");
            if attempt < attempts {
                thread::sleep(self.backoff.delay(attempt));
            }
        }

        error!(%url, attempts, "dictionary load exhausted");
        Err(LoadError::Exhausted {
            attempts,
            last: Box::new(last),
        })
    }

    /// Run `load` on a background thread. The receiver yields exactly one
    /// result.
    pub fn spawn(
        self,
        fetch: Box<dyn Fetch + Send>,
    ) -> Result<mpsc::Receiver<Result<String, LoadError>>, LoadError> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("tag-dictionary".into())
            .spawn(move || {
                let _ = tx.send(self.load(fetch.as_ref()));
            })?;
        Ok(rx)
    }
}
