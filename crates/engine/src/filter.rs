//! Pure view derivations over a snapshot.  Cheap enough to run on every
//! keystroke; the remote fetch path is debounced separately.

use std::collections::BTreeSet;

use shelfwatch_api::InventoryRecord;

use crate::snapshot::Snapshot;

/// The visible subset of a snapshot for a free-text query and an optional
/// category selector.  A record matches when the trimmed query is empty or
/// appears case-insensitively in its name or category, and the category
/// selector (when set) equals its category exactly.
pub fn visible(snapshot: &Snapshot, query: &str, category: Option<&str>) -> Vec<InventoryRecord> {
    let needle = query.trim().to_lowercase();
    snapshot
        .records()
        .iter()
        .filter(|record| {
            let matches_search = needle.is_empty()
                || record.name.to_lowercase().contains(&needle)
                || record.category.to_lowercase().contains(&needle);
            let matches_category = category.is_none_or(|c| record.category == c);
            matches_search && matches_category
        })
        .cloned()
        .collect()
}

/// Distinct configured categories, sorted for stable display.  The `"-"`
/// sentinel and empty strings are not real categories.
pub fn categories(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .records()
        .iter()
        .map(|record| record.category.as_str())
        .filter(|category| !category.is_empty() && *category != "-")
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
