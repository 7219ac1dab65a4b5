//! Favorites pseudo-collection

use crate::memo::Memo;
use crate::selector::{entity_inputs, Selector};
use lrc_entity::{is_favorite, EntityKind};
use lrc_store::NormalizedStore;
use serde_json::Value;
use std::sync::Arc;

/// Every favorited record across the six entity tables
///
/// Ordered by table (course, program, userlist, video, podcast,
/// podcastepisode) then by id. Tables not yet loaded are skipped.
#[must_use]
pub fn compute_favorites(store: &NormalizedStore) -> Vec<Value> {
    EntityKind::TABLE_KINDS
        .iter()
        .filter_map(|kind| store.kind_table(*kind))
        .flat_map(|table| table.values())
        .filter(|record| is_favorite(record))
        .cloned()
        .collect()
}

/// Memoized [`compute_favorites`]
#[derive(Debug, Default)]
pub struct FavoritesSelector {
    memo: Memo<Vec<Value>>,
}

impl FavoritesSelector {
    /// Create new selector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times favorites were recomputed
    #[inline]
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

impl Selector for FavoritesSelector {
    type Output = Vec<Value>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<Value>> {
        self.memo
            .get_or_compute(entity_inputs(store), || compute_favorites(store))
    }
}
