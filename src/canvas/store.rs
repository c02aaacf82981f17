//! CanvasStore: the mutable item collections of the canvas
//!
//! Blocks are fixed by the catalog; only their item sequences change.
//! Every mutation installs a new block collection that shares unmodified
//! blocks with the previous one, so a `CanvasSnapshot` taken before a call
//! never observes that call.

use super::catalog::{BlockCatalog, BlockSpec};
use super::item::{CanvasItem, ItemId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A block together with its current items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasBlockData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: String,
    /// Items in append order
    pub items: Vec<CanvasItem>,
}

impl CanvasBlockData {
    fn from_spec(spec: &BlockSpec) -> Self {
        Self {
            id: spec.id.clone(),
            title: spec.title.clone(),
            description: spec.description.clone(),
            color: spec.color.clone(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Immutable view of the canvas at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSnapshot {
    blocks: Arc<Vec<Arc<CanvasBlockData>>>,
}

impl CanvasSnapshot {
    pub fn blocks(&self) -> impl Iterator<Item = &CanvasBlockData> {
        self.blocks.iter().map(|b| b.as_ref())
    }

    /// Blocks with at least one item, in catalog order.
    pub fn non_empty_blocks(&self) -> impl Iterator<Item = &CanvasBlockData> {
        self.blocks().filter(|b| !b.is_empty())
    }

    pub fn block(&self, id: &str) -> Option<&CanvasBlockData> {
        self.blocks().find(|b| b.id == id)
    }

    /// True iff every block is empty. O(number of blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_empty())
    }

    pub fn item_count(&self) -> usize {
        self.blocks.iter().map(|b| b.items.len()).sum()
    }

    /// Whether two snapshots share the same block storage for `id`.
    pub fn shares_block_with(&self, other: &CanvasSnapshot, id: &str) -> bool {
        let mine = self.blocks.iter().find(|b| b.id == id);
        let theirs = other.blocks.iter().find(|b| b.id == id);
        match (mine, theirs) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// In-memory canvas store
#[derive(Debug, Clone)]
pub struct CanvasStore {
    catalog: BlockCatalog,
    blocks: Arc<Vec<Arc<CanvasBlockData>>>,
}

impl CanvasStore {
    /// Create a store with one empty block per catalog entry.
    pub fn new(catalog: BlockCatalog) -> Self {
        let blocks = catalog
            .iter()
            .map(|spec| Arc::new(CanvasBlockData::from_spec(spec)))
            .collect();
        Self {
            catalog,
            blocks: Arc::new(blocks),
        }
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            blocks: Arc::clone(&self.blocks),
        }
    }

    pub fn block(&self, id: &str) -> Option<&CanvasBlockData> {
        self.blocks.iter().find(|b| b.id == id).map(|b| b.as_ref())
    }

    /// Append one item. Whitespace-only text is ignored.
    ///
    /// Returns the new item's id, or `None` when nothing was added.
    pub fn add_item(&mut self, block_id: &str, text: &str) -> Option<ItemId> {
        if text.trim().is_empty() {
            debug!(block_id, "ignoring blank item");
            return None;
        }
        let item = CanvasItem::new(text);
        let id = item.id.clone();
        self.modify_block(block_id, |block| block.items.push(item))?;
        Some(id)
    }

    /// Append one item per input text, in order.
    pub fn add_items<I, S>(&mut self, block_id: &str, texts: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<CanvasItem> = texts.into_iter().map(CanvasItem::new).collect();
        if items.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ItemId> = items.iter().map(|item| item.id.clone()).collect();
        match self.modify_block(block_id, |block| block.items.extend(items)) {
            Some(()) => ids,
            None => Vec::new(),
        }
    }

    /// Replace the text of an item. Returns false if the item is unknown.
    pub fn update_item(&mut self, block_id: &str, item_id: &ItemId, text: &str) -> bool {
        let Some(position) = self.item_position(block_id, item_id) else {
            debug!(block_id, %item_id, "update of unknown item ignored");
            return false;
        };
        self.modify_block(block_id, |block| {
            block.items[position].text = text.to_string();
        })
        .is_some()
    }

    /// Remove an item. Returns false if the item is unknown.
    pub fn delete_item(&mut self, block_id: &str, item_id: &ItemId) -> bool {
        let Some(position) = self.item_position(block_id, item_id) else {
            debug!(block_id, %item_id, "delete of unknown item ignored");
            return false;
        };
        self.modify_block(block_id, |block| {
            block.items.remove(position);
        })
        .is_some()
    }

    /// True iff every block is empty. O(number of blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_empty())
    }

    fn item_position(&self, block_id: &str, item_id: &ItemId) -> Option<usize> {
        self.block(block_id)?
            .items
            .iter()
            .position(|item| &item.id == item_id)
    }

    /// Copy-on-write edit of a single block.
    fn modify_block<R>(
        &mut self,
        block_id: &str,
        edit: impl FnOnce(&mut CanvasBlockData) -> R,
    ) -> Option<R> {
        let Some(index) = self.blocks.iter().position(|b| b.id == block_id) else {
            debug!(block_id, "mutation of unknown block ignored");
            return None;
        };
        let mut blocks: Vec<Arc<CanvasBlockData>> = self.blocks.as_ref().clone();
        let result = edit(Arc::make_mut(&mut blocks[index]));
        self.blocks = Arc::new(blocks);
        Some(result)
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new(BlockCatalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const VP: &str = "value-propositions";

    fn texts(store: &CanvasStore, block_id: &str) -> Vec<String> {
        store
            .block(block_id)
            .unwrap()
            .items
            .iter()
            .map(|i| i.text.clone())
            .collect()
    }

    #[test]
    fn add_item_appends_text_unchanged() {
        let mut store = CanvasStore::default();
        let id = store.add_item(VP, "  Gyors kiszállítás ").unwrap();

        let block = store.block(VP).unwrap();
        assert_eq!(block.items.len(), 1);
        assert_eq!(block.item(&id).unwrap().text, "  Gyors kiszállítás ");
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut store = CanvasStore::default();
        assert!(store.add_item(VP, "").is_none());
        assert!(store.add_item(VP, " \t\n").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_block_is_a_noop() {
        let mut store = CanvasStore::default();
        assert!(store.add_item("no-such-block", "x").is_none());
        assert!(store.add_items("no-such-block", ["x", "y"]).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn add_items_generates_distinct_ids_for_duplicate_text() {
        let mut store = CanvasStore::default();
        let ids = store.add_items(VP, ["same", "same", "same"]);

        assert_eq!(ids.len(), 3);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(texts(&store, VP), vec!["same", "same", "same"]);
    }

    #[test]
    fn add_items_with_empty_list_keeps_storage() {
        let mut store = CanvasStore::default();
        let before = store.snapshot();
        assert!(store.add_items(VP, Vec::<String>::new()).is_empty());
        assert_eq!(before, store.snapshot());
    }

    #[test]
    fn items_keep_append_order() {
        let mut store = CanvasStore::default();
        store.add_item(VP, "első");
        store.add_items(VP, ["második", "harmadik"]);
        store.add_item(VP, "negyedik");
        assert_eq!(
            texts(&store, VP),
            vec!["első", "második", "harmadik", "negyedik"]
        );
    }

    #[test]
    fn update_item_replaces_text_in_place() {
        let mut store = CanvasStore::default();
        store.add_item(VP, "a");
        let id = store.add_item(VP, "b").unwrap();
        store.add_item(VP, "c");

        assert!(store.update_item(VP, &id, "B"));
        assert_eq!(texts(&store, VP), vec!["a", "B", "c"]);
        assert_eq!(store.block(VP).unwrap().item(&id).unwrap().text, "B");
    }

    #[test]
    fn update_and_delete_of_unknown_item_are_noops() {
        let mut store = CanvasStore::default();
        store.add_item(VP, "a");
        let missing = ItemId::from("item-missing");

        assert!(!store.update_item(VP, &missing, "x"));
        assert!(!store.delete_item(VP, &missing));
        // Item ids are scoped to their block
        let id = store.add_item("channels", "web").unwrap();
        assert!(!store.delete_item(VP, &id));
        assert_eq!(texts(&store, VP), vec!["a"]);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut store = CanvasStore::default();
        let first = store.add_item(VP, "ugyanaz").unwrap();
        assert!(store.delete_item(VP, &first));
        let second = store.add_item(VP, "ugyanaz").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn snapshot_is_not_affected_by_later_mutations() {
        let mut store = CanvasStore::default();
        let id = store.add_item(VP, "eredeti").unwrap();
        let before = store.snapshot();

        store.update_item(VP, &id, "módosított");
        store.add_item("channels", "webshop");

        assert_eq!(before.block(VP).unwrap().items[0].text, "eredeti");
        assert!(before.block("channels").unwrap().is_empty());
        assert_eq!(store.snapshot().item_count(), 2);
    }

    #[test]
    fn mutation_shares_untouched_blocks() {
        let mut store = CanvasStore::default();
        store.add_item("channels", "webshop");
        let before = store.snapshot();
        store.add_item(VP, "új");
        let after = store.snapshot();

        assert!(after.shares_block_with(&before, "channels"));
        assert!(!after.shares_block_with(&before, VP));
    }

    #[test]
    fn is_empty_tracks_all_blocks() {
        let mut store = CanvasStore::default();
        assert!(store.is_empty());
        let id = store.add_item("cost-structure", "bérleti díj").unwrap();
        assert!(!store.is_empty());
        store.delete_item("cost-structure", &id);
        assert!(store.is_empty());
    }
}
