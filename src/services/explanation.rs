// src/services/explanation.rs

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.Explain").expect("valid explanation marker regex"));

/// Parses explanation text keyed by `<id>.Explain` markers.
///
/// The body of each marker runs until the next marker or the end of the
/// text and is trimmed. Text before the first marker and markers with an
/// empty body are dropped. A repeated id keeps the last body.
pub fn parse(raw: &str) -> BTreeMap<u32, String> {
    let markers: Vec<(u32, usize, usize)> = MARKER
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps.get(1)?.as_str().parse().ok()?;
            Some((id, whole.start(), whole.end()))
        })
        .collect();

    let mut explanations = BTreeMap::new();
    for (index, &(id, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers
            .get(index + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(raw.len());
        let body = raw[body_start..body_end].trim();
        if body.is_empty() {
            continue;
        }
        explanations.insert(id, body.to_string());
    }

    explanations
}

/// Loads and parses the explanation file.
/// A missing or unreadable file is logged and yields an empty index.
pub async fn load(path: impl AsRef<Path>) -> BTreeMap<u32, String> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse(&raw),
        Err(e) => {
            tracing::warn!("Failed to read explanations {}: {}", path.display(), e);
            BTreeMap::new()
        }
    }
}
