use crate::TabRecord;
use std::collections::BTreeMap;
use url::Url;

/// Titles longer than this are hard-truncated (no ellipsis) to keep lines
/// single-screen-width friendly; the id suffix stays verbatim.
pub const TITLE_MAX_CHARS: usize = 140;

/// Group label for records whose url is blank or has no parseable host.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Render a record collection as the grouped, human-editable document.
///
/// Pure and deterministic: groups are keyed by url host and ordered
/// lexicographically, lines within a group are sorted, and nothing
/// time- or randomness-dependent enters the output. An unmodified edit is
/// therefore detectable by exact string equality against a fresh render.
/// Every record id is recoverable from the output with the `Anywhere`
/// extraction strategy.
pub fn render_document(records: &[TabRecord]) -> String {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in records {
        groups
            .entry(group_key(&record.url))
            .or_default()
            .push(render_line(record));
    }

    let mut document = String::new();
    for (key, lines) in &mut groups {
        lines.sort();
        document.push('[');
        document.push_str(key);
        document.push_str("]\n");
        for line in lines.iter() {
            document.push_str(line);
            document.push('\n');
        }
        document.push('\n');
    }
    document
}

fn group_key(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

fn render_line(record: &TabRecord) -> String {
    let title: String = record.title.chars().take(TITLE_MAX_CHARS).collect();
    format!("- {} ({})", title, record.id)
}
