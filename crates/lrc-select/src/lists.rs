//! Ordered list selectors

use crate::memo::Memo;
use crate::selector::{entity_inputs, Selector};
use lrc_entity::{EntityId, EntityKind, ListItem};
use lrc_store::{NormalizedStore, TableName};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Records of a named id list, in list order
///
/// Ids whose record is not (yet) in the kind's table are skipped.
#[derive(Debug)]
pub struct ListSelector {
    ids_table: TableName,
    kind: EntityKind,
    memo: Memo<Vec<Value>>,
}

impl ListSelector {
    /// Selector over the ids slot `ids_table`, resolved in the table of `kind`
    #[must_use]
    pub fn new(ids_table: TableName, kind: EntityKind) -> Self {
        Self {
            ids_table,
            kind,
            memo: Memo::new(),
        }
    }

    /// Ids slot being read
    #[inline]
    #[must_use]
    pub fn ids_table(&self) -> &TableName {
        &self.ids_table
    }

    /// Kind of the listed records
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Selector for ListSelector {
    type Output = Vec<Value>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<Value>> {
        let records_table = TableName::for_kind(self.kind);
        let inputs = vec![store.slot(&self.ids_table), store.slot(&records_table)];

        self.memo.get_or_compute(inputs, || {
            let Some(ids) = store.slot_ref(&self.ids_table).and_then(|s| s.as_ids()) else {
                return Vec::new();
            };
            let Some(records) = store.table(&records_table) else {
                return Vec::new();
            };
            ids.iter().filter_map(|id| records.get(id)).cloned().collect()
        })
    }
}

/// User lists authored by one user, ordered by id
#[derive(Debug)]
pub struct MyListsSelector {
    user_id: EntityId,
    memo: Memo<Vec<Value>>,
}

impl MyListsSelector {
    /// Selector for lists whose `author` is `user_id`
    #[must_use]
    pub fn new(user_id: impl Into<EntityId>) -> Self {
        Self {
            user_id: user_id.into(),
            memo: Memo::new(),
        }
    }
}

impl Selector for MyListsSelector {
    type Output = Vec<Value>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<Value>> {
        let inputs = vec![store.slot(&TableName::USER_LISTS)];

        self.memo.get_or_compute(inputs, || {
            store
                .table(&TableName::USER_LISTS)
                .into_iter()
                .flat_map(|table| table.values())
                .filter(|record| {
                    record
                        .get("author")
                        .and_then(EntityId::from_value)
                        .is_some_and(|author| author == self.user_id)
                })
                .cloned()
                .collect()
        })
    }
}

/// One list item joined with its target record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedItem {
    /// Stored item reference
    #[serde(flatten)]
    pub item: ListItem,
    /// Target record, `None` until its table holds it
    pub content: Option<Value>,
}

/// Items of one user list, ordered by position
#[derive(Debug)]
pub struct UserListItemsSelector {
    items_table: TableName,
    memo: Memo<Vec<ResolvedItem>>,
}

impl UserListItemsSelector {
    /// Selector for the items of `list_id`
    #[must_use]
    pub fn new(list_id: impl Into<EntityId>) -> Self {
        Self {
            items_table: TableName::list_items(&list_id.into()),
            memo: Memo::new(),
        }
    }
}

impl Selector for UserListItemsSelector {
    type Output = Vec<ResolvedItem>;

    fn select(&self, store: &NormalizedStore) -> Arc<Vec<ResolvedItem>> {
        let mut inputs = vec![store.slot(&self.items_table)];
        inputs.extend(entity_inputs(store));

        self.memo.get_or_compute(inputs, || {
            let mut items: Vec<ListItem> = store
                .table(&self.items_table)
                .into_iter()
                .flat_map(|table| table.values())
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect();
            items.sort_by_key(|item| item.position);

            items
                .into_iter()
                .map(|item| {
                    let content = store.get(&item.reference.key()).cloned();
                    ResolvedItem { item, content }
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrc_entity::Reference;
    use lrc_merge::{MergePolicy, Slot};
    use lrc_store::{Patch, UpdateMap};
    use serde_json::json;

    #[test]
    fn list_selector_resolves_in_order_skipping_missing() {
        let ids_table = TableName::from_static("newCourses");
        let mut store = NormalizedStore::new();
        store.apply(
            Patch::new()
                .with(ids_table.clone(), Slot::Ids(vec![3.into(), 1.into(), 2.into()]))
                .with_record(TableName::COURSES, 1, json!({"id": 1}))
                .with_record(TableName::COURSES, 3, json!({"id": 3})),
            &UpdateMap::new()
                .with(ids_table.clone(), MergePolicy::Replace)
                .with(TableName::COURSES, MergePolicy::DeepMerge),
        );

        let selector = ListSelector::new(ids_table, EntityKind::Course);
        assert_eq!(*selector.select(&store), vec![json!({"id": 3}), json!({"id": 1})]);
    }

    #[test]
    fn my_lists_filters_by_author() {
        let mut store = NormalizedStore::new();
        store.apply(
            Patch::new()
                .with_record(TableName::USER_LISTS, 1, json!({"id": 1, "author": 7}))
                .with_record(TableName::USER_LISTS, 2, json!({"id": 2, "author": 8}))
                .with_record(TableName::USER_LISTS, 3, json!({"id": 3, "author": 7})),
            &UpdateMap::new().with(TableName::USER_LISTS, MergePolicy::DeepMerge),
        );

        let mine: Vec<_> = MyListsSelector::new(7)
            .select(&store)
            .iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(mine, vec![json!(1), json!(3)]);
    }

    #[test]
    fn list_items_sorted_by_position() {
        let mut store = NormalizedStore::new();
        let items_table = TableName::list_items(&EntityId::Int(4));
        let later = ListItem::new(40, 2, Reference::new(1, EntityKind::Video));
        let first = ListItem::new(41, 1, Reference::new(1, EntityKind::Course));
        store.apply(
            Patch::new()
                .with_record(items_table.clone(), 40, later.to_value())
                .with_record(items_table.clone(), 41, first.to_value())
                .with_record(TableName::COURSES, 1, json!({"id": 1, "title": "Course"})),
            &UpdateMap::new()
                .with(items_table, MergePolicy::Replace)
                .with(TableName::COURSES, MergePolicy::DeepMerge),
        );

        let resolved = UserListItemsSelector::new(4).select(&store);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].item.item_id, EntityId::Int(41));
        assert_eq!(resolved[0].content, Some(json!({"id": 1, "title": "Course"})));
        assert_eq!(resolved[1].content, None);
    }
}
