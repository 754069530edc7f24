use crate::TabRecord;
use std::collections::BTreeSet;

/// Ids present in the original listing but absent after editing. Ids the
/// user fabricated in the edited text never appear here: the difference is
/// anchored on the original side.
pub fn deletion_set(
    original: &BTreeSet<String>,
    edited: &BTreeSet<String>,
) -> BTreeSet<String> {
    original.difference(edited).cloned().collect()
}

/// Records selected for closure, in original listing order. A record
/// survives as long as its id still appears in the edited id set; edits to
/// its title or url do not affect membership.
pub fn deletion_candidates<'a>(
    records: &'a [TabRecord],
    edited: &BTreeSet<String>,
) -> Vec<&'a TabRecord> {
    records
        .iter()
        .filter(|record| !edited.contains(&record.id))
        .collect()
}

/// Whitespace-insensitive "document unchanged" check; the cancellation
/// signal for a run.
pub fn is_unchanged(original: &str, edited: &str) -> bool {
    original.trim() == edited.trim()
}
