//! Batched metadata counters.
//!
//! Applications often bump small counters (views, likes, replies) on many
//! documents while handling one request. [`MetaCounter`] accumulates those
//! increments in memory and turns them into one update per distinct
//! `(collection, field, amount)` instead of one update per document.
//!
//! # Example
//!
//! ```rust
//! use mongoutils_core::{MetaCounter, ObjectId};
//!
//! let (a, b) = (ObjectId::new(), ObjectId::new());
//!
//! let mut counter = MetaCounter::new();
//! counter
//!     .add("posts", "views", a, 1)
//!     .add("posts", "views", b, 1)
//!     .add("posts", "views", a, 1);
//!
//! // `a` ends up with +2 and `b` with +1, so two updates are needed.
//! let batches = counter.aggregate();
//! assert_eq!(batches.len(), 2);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use bson::{Bson, Document, doc, oid::ObjectId};
use indexmap::IndexMap;
use tracing::debug;

/// Accumulated increments keyed by collection, then by (field, document id).
#[derive(Debug, Clone)]
pub struct MetaCounter<Id = ObjectId> {
    collections: IndexMap<String, IndexMap<(String, Id), i64>>,
}

impl<Id> Default for MetaCounter<Id> {
    fn default() -> Self {
        Self {
            collections: IndexMap::new(),
        }
    }
}

impl<Id> MetaCounter<Id>
where
    Id: Clone + Eq + Hash,
{
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the `meta` field of document `id` in `collection`.
    ///
    /// Repeated calls for the same document and field are summed, wrapping
    /// around on `i64` overflow. Zero and negative amounts are recorded like
    /// any other.
    pub fn add(&mut self, collection: &str, meta: &str, id: Id, amount: i64) -> &mut Self {
        let slot = self
            .collections
            .entry(collection.to_string())
            .or_default()
            .entry((meta.to_string(), id))
            .or_insert(0);
        *slot = slot.wrapping_add(amount);
        self
    }

    /// Current accumulated amount for a document field.
    pub fn amount(&self, collection: &str, meta: &str, id: &Id) -> Option<i64> {
        self.collections
            .get(collection)?
            .get(&(meta.to_string(), id.clone()))
            .copied()
    }

    /// Number of distinct (collection, field, document) entries.
    pub fn len(&self) -> usize {
        self.collections.values().map(IndexMap::len).sum()
    }

    /// Check if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all accumulated entries.
    pub fn clear(&mut self) {
        self.collections.clear();
    }

    /// Group the accumulated entries into update batches.
    ///
    /// Every document whose field ended up with the same amount in the same
    /// collection lands in one [`MetaQuery`]. Callers must not rely on the
    /// order of the returned batches.
    pub fn aggregate(&self) -> Vec<MetaQuery<Id>> {
        let mut batches = Vec::new();

        for (collection, entries) in &self.collections {
            let mut groups: IndexMap<(&str, i64), Vec<Id>> = IndexMap::new();
            for ((meta, id), amount) in entries {
                groups
                    .entry((meta.as_str(), *amount))
                    .or_default()
                    .push(id.clone());
            }

            for ((meta, amount), ids) in groups {
                batches.push(MetaQuery {
                    collection: collection.clone(),
                    ids,
                    update: HashMap::from([(meta.to_string(), amount)]),
                });
            }
        }

        debug!(
            entries = self.len(),
            batches = batches.len(),
            "Aggregated meta counters"
        );

        batches
    }

    /// Consume the counter and return its update batches.
    ///
    /// Same grouping as [`aggregate`](Self::aggregate), but document ids are
    /// moved into the batches instead of cloned.
    pub fn into_batches(self) -> Vec<MetaQuery<Id>> {
        let mut batches = Vec::new();

        for (collection, entries) in self.collections {
            let mut groups: IndexMap<(String, i64), Vec<Id>> = IndexMap::new();
            for ((meta, id), amount) in entries {
                groups.entry((meta, amount)).or_default().push(id);
            }

            for ((meta, amount), ids) in groups {
                batches.push(MetaQuery {
                    collection: collection.clone(),
                    ids,
                    update: HashMap::from([(meta, amount)]),
                });
            }
        }

        debug!(batches = batches.len(), "Drained meta counters");

        batches
    }
}

/// One batched counter update.
///
/// All `ids` receive the same `update` in `collection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaQuery<Id = ObjectId> {
    /// Target collection.
    pub collection: String,
    /// Documents receiving the update. Never contains duplicates.
    pub ids: Vec<Id>,
    /// Field to amount increments.
    pub update: HashMap<String, i64>,
}

impl<Id> MetaQuery<Id>
where
    Id: Clone + Into<Bson>,
{
    /// Filter matching every document of the batch: `{ _id: { $in: ids } }`.
    pub fn filter(&self) -> Document {
        let ids: Vec<Bson> = self.ids.iter().cloned().map(Into::into).collect();
        doc! { "_id": { "$in": ids } }
    }

    /// Update applying the increments: `{ $inc: { field: amount } }`.
    pub fn update_doc(&self) -> Document {
        let mut increments = Document::new();
        for (meta, amount) in &self.update {
            increments.insert(meta.clone(), *amount);
        }
        crate::operators::inc(increments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn find<'a>(
        batches: &'a [MetaQuery<u32>],
        collection: &str,
        meta: &str,
        amount: i64,
    ) -> Option<&'a MetaQuery<u32>> {
        batches.iter().find(|b| {
            b.collection == collection && b.update.get(meta) == Some(&amount)
        })
    }

    #[test]
    fn test_add_accumulates() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "views", 1u32, 1)
            .add("posts", "views", 1, 4)
            .add("posts", "likes", 1, 2);

        assert_eq!(counter.amount("posts", "views", &1), Some(5));
        assert_eq!(counter.amount("posts", "likes", &1), Some(2));
        assert_eq!(counter.amount("posts", "shares", &1), None);
        assert_eq!(counter.amount("comments", "views", &1), None);
        assert_eq!(counter.len(), 2);
    }

    #[test]
    fn test_aggregate_splits_by_amount() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "views", 1u32, 1)
            .add("posts", "views", 2, 1)
            .add("posts", "views", 1, 1);

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 2);

        let twice = find(&batches, "posts", "views", 2).unwrap();
        assert_eq!(twice.ids, vec![1]);
        assert_eq!(twice.update.len(), 1);

        let once = find(&batches, "posts", "views", 1).unwrap();
        assert_eq!(once.ids, vec![2]);
    }

    #[test]
    fn test_aggregate_merges_equal_amounts() {
        let mut counter = MetaCounter::new();
        for id in 0u32..5 {
            counter.add("posts", "views", id, 1);
        }

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_collections_are_independent() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "likes", 1u32, 5)
            .add("comments", "likes", 1, 5);

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 2);
        assert_eq!(find(&batches, "posts", "likes", 5).unwrap().ids, vec![1]);
        assert_eq!(find(&batches, "comments", "likes", 5).unwrap().ids, vec![1]);
    }

    #[test]
    fn test_fields_are_independent() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "likes", 1u32, 1)
            .add("posts", "views", 1, 1);

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.update.len() == 1));
    }

    #[test]
    fn test_negative_amounts_cancel_to_zero() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "score", 1u32, -3)
            .add("posts", "score", 1, 3);

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].update.get("score"), Some(&0));
        assert_eq!(batches[0].ids, vec![1]);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "views", 1u32, 1)
            .add("posts", "views", 2, 3)
            .add("users", "posts", 7, 1);

        let first: HashSet<_> = counter
            .aggregate()
            .into_iter()
            .map(|b| (b.collection, b.ids, b.update.into_iter().collect::<Vec<_>>()))
            .collect();
        let second: HashSet<_> = counter
            .aggregate()
            .into_iter()
            .map(|b| (b.collection, b.ids, b.update.into_iter().collect::<Vec<_>>()))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_add_wraps_on_overflow() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "views", 1u32, i64::MAX)
            .add("posts", "views", 1, 1);

        assert_eq!(counter.amount("posts", "views", &1), Some(i64::MIN));

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].update.get("views"), Some(&i64::MIN));
    }

    #[test]
    fn test_into_batches_matches_aggregate() {
        let mut counter = MetaCounter::new();
        counter
            .add("posts", "views", 1u32, 1)
            .add("posts", "views", 2, 1)
            .add("posts", "views", 3, 2)
            .add("users", "posts", 1, 1);

        let aggregated = counter.aggregate();
        let drained = counter.into_batches();
        assert_eq!(drained, aggregated);
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_counter() {
        let counter: MetaCounter<u32> = MetaCounter::new();
        assert!(counter.is_empty());
        assert!(counter.aggregate().is_empty());
    }

    #[test]
    fn test_clear_and_into_batches() {
        let mut counter = MetaCounter::new();
        counter.add("posts", "views", 1u32, 1);
        assert!(!counter.is_empty());

        counter.clear();
        assert!(counter.is_empty());

        counter.add("posts", "views", 2, 1);
        let batches = counter.into_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].ids, vec![2]);
    }

    #[test]
    fn test_filter_and_update_doc() {
        let a = ObjectId::new();
        let b = ObjectId::new();

        let mut counter = MetaCounter::new();
        counter.add("posts", "views", a, 2).add("posts", "views", b, 2);

        let batches = counter.aggregate();
        assert_eq!(batches.len(), 1);

        let batch = &batches[0];
        assert_eq!(batch.filter(), doc! { "_id": { "$in": [a, b] } });
        assert_eq!(batch.update_doc(), doc! { "$inc": { "views": 2_i64 } });
    }
}
