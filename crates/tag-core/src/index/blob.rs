use tracing::debug;

use super::PrefixIndex;

impl PrefixIndex {
    /// Build an index from a newline-delimited dictionary blob.
    ///
    /// Line order is the weight, so earlier lines rank first. Blank lines and
    /// `#` comments still consume a position.
    pub fn from_blob(blob: &str, default_weight: f64, max_results: usize) -> Self {
        let mut index = PrefixIndex::new(max_results).with_default_weight(default_weight);
        let mut skipped = 0usize;

        for (order, line) in blob.trim().lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                skipped += 1;
                continue;
            }
            index.insert(line, order as i64);
        }

        debug!(tags = index.len(), skipped, "built prefix index");
        index
    }
}
