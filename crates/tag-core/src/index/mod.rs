//! Character trie of known tags with weighted, capped prefix retrieval.
//!
//! Keys are case-folded on the way in and on lookup. Each terminal node stores
//! the tag's weight (lower ranks first), an insertion sequence number used to
//! break ties, and an optional display string that replaces the key in query
//! results (weighted references, original casing).

mod blob;
pub mod normalize;

use std::collections::HashMap;

use tracing::debug;

pub use normalize::{fold, label_for, normalize_tag, NormalizedTag};

#[derive(Debug, Clone, PartialEq)]
struct Payload {
    weight: i64,
    seq: u64,
    display: Option<String>,
}

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    payload: Option<Payload>,
}

pub struct PrefixIndex {
    root: Node,
    len: usize,
    next_seq: u64,
    max_results: usize,
    default_weight: f64,
}

impl PrefixIndex {
    pub fn new(max_results: usize) -> Self {
        Self {
            root: Node::default(),
            len: 0,
            next_seq: 0,
            max_results,
            default_weight: 1.0,
        }
    }

    /// Weight embedded into `<lora:NAME:W>` insertion strings for tags
    /// inserted after this call.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a raw dictionary line. Re-inserting a key replaces its payload.
    pub fn insert(&mut self, raw_tag: &str, weight: i64) {
        let Some(tag) = normalize_tag(raw_tag, self.default_weight) else {
            return;
        };

        let mut node = &mut self.root;
        for ch in tag.key.chars() {
            node = node.children.entry(ch).or_default();
        }

        if node.payload.is_none() {
            self.len += 1;
        }
        node.payload = Some(Payload {
            weight,
            seq: self.next_seq,
            display: tag.display,
        });
        self.next_seq += 1;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(&fold(key)).is_some_and(|node| node.payload.is_some())
    }

    /// Ranked insertion strings for every tag starting with `prefix`, capped
    /// at the configured result limit.
    pub fn query(&self, prefix: &str) -> Vec<String> {
        self.query_limited(prefix, self.max_results)
    }

    pub fn query_limited(&self, prefix: &str, limit: usize) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let prefix = fold(prefix);
        let Some(start) = self.find(&prefix) else {
            return Vec::new();
        };

        let mut found: Vec<(&Payload, String)> = Vec::new();
        let mut stack: Vec<(&Node, String)> = vec![(start, prefix)];
        while let Some((node, key)) = stack.pop() {
            for (ch, child) in &node.children {
                let mut child_key = String::with_capacity(key.len() + ch.len_utf8());
                child_key.push_str(&key);
                child_key.push(*ch);
                stack.push((child, child_key));
            }
            if let Some(payload) = &node.payload {
                found.push((payload, key));
            }
        }

        found.sort_by_key(|(p, _)| (p.weight, p.seq));
        found.truncate(limit);
        debug!(matches = found.len(), "prefix query");

        found
            .into_iter()
            .map(|(p, key)| p.display.clone().unwrap_or(key))
            .collect()
    }

    fn find(&self, key: &str) -> Option<&Node> {
        let mut node = &self.root;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}
