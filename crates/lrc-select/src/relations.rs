//! Cross-kind relation selectors (similar resources, popular content)

use crate::memo::Memo;
use crate::selector::{entity_inputs, resolve_references, Selector};
use lrc_entity::{CompositeKey, Reference};
use lrc_store::{NormalizedStore, TableName};
use serde_json::Value;
use std::sync::Arc;

/// Parse an array of `{objectId, objectType}` values, dropping malformed ones
#[must_use]
pub fn references_in(value: Option<&Value>) -> Vec<Reference> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

/// Resources similar to one resource, resolved to full records
#[derive(Debug)]
pub struct SimilarResourcesSelector {
    key: CompositeKey,
    memo: Memo<Vec<Value>>,
}

impl SimilarResourcesSelector {
    /// Selector for resources similar to `key`
    #[must_use]
    pub fn new(key: CompositeKey) -> Self {
        Self {
            key,
            memo: Memo::new(),
        }
    }
}

impl Selector for SimilarResourcesSelector {
    type Output = Vec<Value>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<Value>> {
        let mut inputs = vec![store.slot(&TableName::SIMILAR_RESOURCES)];
        inputs.extend(entity_inputs(store));

        self.memo.get_or_compute(inputs, || {
            let refs = references_in(
                store
                    .table(&TableName::SIMILAR_RESOURCES)
                    .and_then(|table| table.get(&self.key.relation_key()))
                    .and_then(|entry| entry.get("results")),
            );
            resolve_references(store, &refs)
        })
    }
}

/// Popular content, resolved to full records in server order
#[derive(Debug, Default)]
pub struct PopularContentSelector {
    memo: Memo<Vec<Value>>,
}

impl PopularContentSelector {
    /// Create new selector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for PopularContentSelector {
    type Output = Vec<Value>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<Value>> {
        let mut inputs = vec![store.slot(&TableName::POPULAR_CONTENT)];
        inputs.extend(entity_inputs(store));

        self.memo.get_or_compute(inputs, || {
            let refs = references_in(
                store
                    .slot_ref(&TableName::POPULAR_CONTENT)
                    .and_then(|slot| slot.as_scalar()),
            );
            resolve_references(store, &refs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrc_entity::EntityKind;
    use lrc_merge::{MergePolicy, Slot};
    use lrc_store::{Patch, UpdateMap};
    use serde_json::json;

    #[test]
    fn references_in_drops_malformed() {
        let value = json!([
            {"objectId": 1, "objectType": "course"},
            {"objectId": 2, "objectType": "bootcamp"},
            "garbage",
        ]);
        assert_eq!(
            references_in(Some(&value)),
            vec![Reference::new(1, EntityKind::Course)]
        );
        assert!(references_in(None).is_empty());
    }

    #[test]
    fn similar_resources_keyed_by_kind_and_id() {
        let mut store = NormalizedStore::new();
        store.apply(
            Patch::new()
                .with_record(
                    TableName::SIMILAR_RESOURCES,
                    "course_5",
                    json!({"id": "course_5", "results": [{"objectId": 2, "objectType": "video"}]}),
                )
                .with_record(TableName::VIDEOS, 2, json!({"id": 2})),
            &UpdateMap::new()
                .with(TableName::SIMILAR_RESOURCES, MergePolicy::ShallowMerge)
                .with(TableName::VIDEOS, MergePolicy::DeepMerge),
        );

        let for_course = SimilarResourcesSelector::new(CompositeKey::new(EntityKind::Course, 5));
        let for_list = SimilarResourcesSelector::new(CompositeKey::new(EntityKind::UserList, 5));
        assert_eq!(*for_course.select(&store), vec![json!({"id": 2})]);
        assert!(for_list.select(&store).is_empty());
    }

    #[test]
    fn popular_content_resolves_scalar_list() {
        let mut store = NormalizedStore::new();
        store.apply(
            Patch::new()
                .with(
                    TableName::POPULAR_CONTENT,
                    Slot::Scalar(json!([
                        {"objectId": 1, "objectType": "podcast"},
                        {"objectId": 1, "objectType": "course"},
                    ])),
                )
                .with_record(TableName::COURSES, 1, json!({"id": 1, "title": "C"}))
                .with_record(TableName::PODCASTS, 1, json!({"id": 1, "title": "P"})),
            &UpdateMap::new()
                .with(TableName::POPULAR_CONTENT, MergePolicy::Replace)
                .with(TableName::COURSES, MergePolicy::DeepMerge)
                .with(TableName::PODCASTS, MergePolicy::DeepMerge),
        );

        let titles: Vec<_> = PopularContentSelector::new()
            .select(&store)
            .iter()
            .map(|r| r["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("P"), json!("C")]);
    }
}
