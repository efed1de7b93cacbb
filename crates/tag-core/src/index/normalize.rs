//! Lookup-key normalization for dictionary lines.
//!
//! A line is either a plain tag (`Long Hair`) or a weighted reference
//! (`lora:DetailTweaker`, `<lora:DetailTweaker>`). References are indexed by
//! their bare name and insert `<lora:NAME:W>` with the default weight.

const MARKER: &str = "lora:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTag {
    pub key: String,
    /// Insertion string when it differs from `key`.
    pub display: Option<String>,
}

/// Case-fold a key or query prefix.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Normalize one raw dictionary line. Returns `None` for blank input.
pub fn normalize_tag(raw: &str, default_weight: f64) -> Option<NormalizedTag> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(name) = reference_name(raw) {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        return Some(NormalizedTag {
            key: fold(name),
            display: Some(format!("<{MARKER}{name}:{}>", format_weight(default_weight))),
        });
    }

    let key = fold(raw);
    let display = (key != raw).then(|| raw.to_string());
    Some(NormalizedTag { key, display })
}

/// Row text for a suggestion: `<lora:NAME:W>` is shown as `lora:NAME`.
pub fn label_for(insert: &str) -> String {
    let inner = insert.strip_prefix('<').and_then(|s| s.strip_suffix('>'));
    match inner {
        Some(inner) if strip_marker(inner).is_some() => match inner.rsplit_once(':') {
            Some((head, _)) if head.len() > MARKER.len() => head.to_string(),
            _ => inner.to_string(),
        },
        _ => insert.to_string(),
    }
}

fn reference_name(raw: &str) -> Option<&str> {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    let rest = strip_marker(inner)?;
    // A weight already present in the line is replaced by the default one.
    Some(rest.split(':').next().unwrap_or(rest))
}

fn strip_marker(s: &str) -> Option<&str> {
    let head = s.get(..MARKER.len())?;
    head.eq_ignore_ascii_case(MARKER).then(|| &s[MARKER.len()..])
}

fn format_weight(weight: f64) -> String {
    format!("{weight}")
}
