//! Text search over the items of the active board.

use crate::model::{Document, Item, ItemKind};

/// Items on the active board whose search text contains `query`,
/// case-insensitively, optionally restricted to one kind.
///
/// An empty query matches every item that passes the kind filter.
pub fn search<'a>(document: &'a Document, query: &str, kind: Option<ItemKind>) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    document
        .board_items()
        .filter(|item| kind.is_none_or(|k| item.kind() == k))
        .filter(|item| needle.is_empty() || item.search_text().to_lowercase().contains(&needle))
        .collect()
}
