//! Building blocks shared by the descriptor transforms
//!
//! Everything here tolerates missing or malformed input: a record that
//! cannot be keyed is logged and skipped, never merged under a guessed key.

use lrc_entity::{record_id, record_kind, EntityId, EntityKind, ListItem, Reference};
use lrc_merge::{MergePolicy, Table};
use lrc_store::{Patch, TableName, UpdateMap};
use serde_json::Value;

/// Records of a response: the `results` array of a `{next, results}` page,
/// or the body itself when it is a bare array
#[must_use]
pub fn results(body: Option<&Value>) -> &[Value] {
    match body {
        Some(Value::Array(items)) => items.as_slice(),
        Some(page) => page
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        None => &[],
    }
}

/// Whether `body` looks like a list response (bare array or `{results}` page)
#[must_use]
pub fn is_page(body: Option<&Value>) -> bool {
    body.is_some_and(|page| page.is_array() || page.get("results").is_some())
}

/// `next` link of a paginated page (`null` on the last page)
#[must_use]
pub fn next_link(body: Option<&Value>) -> Value {
    body.and_then(|page| page.get("next"))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Key records of one kind by id, preserving response order in the returned ids
pub fn id_map<'a>(records: impl IntoIterator<Item = &'a Value>, kind: EntityKind) -> (Table, Vec<EntityId>) {
    let mut table = Table::new();
    let mut order = Vec::new();

    for record in records {
        match record_id(record) {
            Ok(id) => {
                if table.insert(id.clone(), record.clone()).is_none() {
                    order.push(id);
                }
            }
            Err(e) => tracing::warn!("Skipping {} record without usable id: {}", kind, e),
        }
    }

    (table, order)
}

/// Kind and payload of one polymorphic record
///
/// Accepts flat records carrying `object_type` and wrapped ones of the form
/// `{content_type, content_data}`.
#[must_use]
pub fn polymorphic(record: &Value) -> Option<(EntityKind, Value)> {
    if let Some(data) = record.get("content_data").filter(|d| d.is_object()) {
        let kind = record_kind(data)
            .ok()
            .or_else(|| record.get("content_type")?.as_str()?.parse().ok())?;
        return Some((kind, data.clone()));
    }

    match record_kind(record) {
        Ok(kind) => Some((kind, record.clone())),
        Err(e) => {
            tracing::warn!("Skipping polymorphic record: {}", e);
            None
        }
    }
}

/// Split mixed-kind records into one table patch per kind
///
/// Returns the patch and a [`Reference`] per accepted record in input order.
pub fn demux<'a>(records: impl IntoIterator<Item = &'a Value>) -> (Patch, Vec<Reference>) {
    let mut patch = Patch::new();
    let mut refs = Vec::new();

    for (kind, record) in records.into_iter().filter_map(polymorphic) {
        match record_id(&record) {
            Ok(id) => {
                refs.push(Reference::new(id.clone(), kind));
                patch.insert_record(TableName::for_kind(kind), id, record);
            }
            Err(e) => tracing::warn!("Skipping {} record without usable id: {}", kind, e),
        }
    }

    (patch, refs)
}

/// `DeepMerge` for every entity table
#[must_use]
pub fn entity_update() -> UpdateMap {
    EntityKind::TABLE_KINDS
        .iter()
        .fold(UpdateMap::new(), |update, kind| {
            update.with(TableName::for_kind(*kind), MergePolicy::DeepMerge)
        })
}

/// Parse one server list item `{id, position, object_id, content_type, content_data?}`
///
/// Returns the stored item plus the embedded record, if the server sent one.
#[must_use]
pub fn list_item(value: &Value) -> Option<(ListItem, Option<Value>)> {
    let item_id = value.get("id").and_then(EntityId::from_value)?;
    let object_id = value
        .get("object_id")
        .and_then(EntityId::from_value)
        .or_else(|| value.get("content_data")?.get("id").and_then(EntityId::from_value))?;
    let kind: EntityKind = value.get("content_type")?.as_str()?.parse().ok()?;
    let position = value.get("position").and_then(Value::as_i64).unwrap_or(0);

    let content = value.get("content_data").filter(|d| d.is_object()).cloned();
    Some((ListItem::new(item_id, position, Reference::new(object_id, kind)), content))
}

/// Item table of one list, keyed by item id
#[must_use]
pub fn list_items_table<'a>(items: impl IntoIterator<Item = &'a ListItem>) -> Table {
    items
        .into_iter()
        .map(|item| (item.item_id.clone(), item.to_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn results_accepts_page_or_array() {
        let page = json!({"next": null, "results": [{"id": 1}]});
        let bare = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(results(Some(&page)).len(), 1);
        assert_eq!(results(Some(&bare)).len(), 2);
        assert!(results(Some(&json!({"detail": "x"}))).is_empty());
        assert!(results(None).is_empty());
        assert!(is_page(Some(&bare)));
        assert!(!is_page(Some(&json!({"detail": "Not found."}))));
    }

    #[test]
    fn next_link_defaults_to_null() {
        assert_eq!(next_link(Some(&json!({"next": "/p2"}))), json!("/p2"));
        assert_eq!(next_link(Some(&json!([]))), Value::Null);
        assert_eq!(next_link(None), Value::Null);
    }

    #[test]
    fn id_map_skips_records_without_id() {
        let records = [json!({"id": 2}), json!({"title": "orphan"}), json!({"id": 1}), json!({"id": 2})];
        let (table, order) = id_map(&records, EntityKind::Course);
        assert_eq!(table.len(), 2);
        assert_eq!(order, vec![EntityId::Int(2), EntityId::Int(1)]);
    }

    #[test]
    fn polymorphic_unwraps_content_data() {
        let wrapped = json!({"content_type": "video", "content_data": {"id": 4, "title": "v"}});
        let (kind, record) = polymorphic(&wrapped).unwrap();
        assert_eq!(kind, EntityKind::Video);
        assert_eq!(record, json!({"id": 4, "title": "v"}));

        assert!(polymorphic(&json!({"id": 1})).is_none());
    }

    #[test]
    fn demux_touches_only_present_kinds() {
        let records = [
            json!({"id": 1, "object_type": "course"}),
            json!({"id": 1, "object_type": "userlist"}),
            json!({"id": 9, "object_type": "spaceship"}),
        ];
        let (patch, refs) = demux(&records);

        assert_eq!(patch.len(), 2);
        assert!(patch.table(&TableName::COURSES).is_some());
        assert!(patch.table(&TableName::USER_LISTS).is_some());
        assert_eq!(
            refs,
            vec![Reference::new(1, EntityKind::Course), Reference::new(1, EntityKind::UserList)]
        );
    }

    #[test]
    fn list_item_parses_server_shape() {
        let value = json!({
            "id": 30,
            "position": 2,
            "object_id": 5,
            "content_type": "course",
            "content_data": {"id": 5, "title": "Algebra"},
        });
        let (item, content) = list_item(&value).unwrap();
        assert_eq!(item, ListItem::new(30, 2, Reference::new(5, EntityKind::Course)));
        assert_eq!(content.unwrap()["title"], "Algebra");

        assert!(list_item(&json!({"id": 1})).is_none());
    }
}
