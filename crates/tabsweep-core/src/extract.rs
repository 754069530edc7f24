use regex::Regex;
use std::collections::BTreeSet;

/// How tab ids are recovered from a text blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStrategy {
    /// A trimmed line contributes its id only when it starts with
    /// `[<digits>]` — the flat listing format emitted by the control
    /// binary, one tab per line.
    LinePrefix,
    /// Every `(<digits>)` substring anywhere in the blob contributes an
    /// id. Survives grouping, reordering, and arbitrary reformatting of
    /// edited text. May over-match a digit-only parenthetical the user
    /// typed into a surviving title; accepted cost of format tolerance.
    Anywhere,
}

/// Ids in first-seen order, duplicates dropped. Malformed or non-numeric
/// tokens never match; a blob with no matches yields an empty list.
pub fn extract_ids_ordered(text: &str, strategy: ExtractStrategy) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ids = Vec::new();
    let mut push = |id: &str| {
        if seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    };

    match strategy {
        ExtractStrategy::LinePrefix => {
            let pattern = Regex::new(r"^\[([0-9]+)\]").expect("valid regex");
            for line in text.lines() {
                if let Some(captures) = pattern.captures(line.trim()) {
                    push(&captures[1]);
                }
            }
        }
        ExtractStrategy::Anywhere => {
            let pattern = Regex::new(r"\(([0-9]+)\)").expect("valid regex");
            for captures in pattern.captures_iter(text) {
                push(&captures[1]);
            }
        }
    }

    ids
}

/// Order-insensitive id set; duplicates collapse.
pub fn extract_ids(text: &str, strategy: ExtractStrategy) -> BTreeSet<String> {
    extract_ids_ordered(text, strategy).into_iter().collect()
}
