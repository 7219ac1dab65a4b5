//! User lists and their items

use crate::descriptor::{transform, Method, MutationDescriptor, QueryDescriptor};
use crate::transform::{entity_update, id_map, is_page, list_item, list_items_table, results};
use lrc_entity::{record_id, EntityId, EntityKind, ListItem, Reference};
use lrc_merge::{MergePolicy, Slot};
use lrc_store::{Patch, TableName, UpdateMap};
use serde_json::{json, Value};

const USER_LISTS_URL: &str = "/api/v0/userlists/";

fn user_list_url(id: &EntityId) -> String {
    format!("{USER_LISTS_URL}{id}/")
}

fn items_url(list_id: &EntityId) -> String {
    format!("{USER_LISTS_URL}{list_id}/items/")
}

fn user_lists_update() -> UpdateMap {
    UpdateMap::new().with(TableName::USER_LISTS, MergePolicy::DeepMerge)
}

/// Store the server's canonical user list under its own id
fn canonical_user_list() -> crate::descriptor::Transform {
    transform(|body| match body.map(|record| (record_id(record), record)) {
        Some((Ok(id), record)) => Patch::new().with_record(TableName::USER_LISTS, id, record.clone()),
        Some((Err(e), _)) => {
            tracing::warn!("User list response without id: {}", e);
            Patch::new()
        }
        None => Patch::new(),
    })
}

/// `GET /api/v0/userlists/` into the `userLists` table
#[must_use]
pub fn user_lists_request() -> QueryDescriptor {
    let transform = transform(|body| {
        let (lists, _) = id_map(results(body), EntityKind::UserList);
        if lists.is_empty() {
            return Patch::new();
        }
        Patch::new().with(TableName::USER_LISTS, Slot::Table(lists))
    });

    QueryDescriptor::get(USER_LISTS_URL, transform, user_lists_update())
}

/// `POST /api/v0/userlists/`
#[must_use]
pub fn create_user_list_mutation(payload: Value) -> MutationDescriptor {
    MutationDescriptor::new(Method::Post, USER_LISTS_URL)
        .with_body(payload)
        .with_transform(canonical_user_list())
        .with_update(user_lists_update())
}

/// `PATCH /api/v0/userlists/{id}/`
#[must_use]
pub fn update_user_list_mutation(id: impl Into<EntityId>, payload: Value) -> MutationDescriptor {
    MutationDescriptor::new(Method::Patch, user_list_url(&id.into()))
        .with_body(payload)
        .with_transform(canonical_user_list())
        .with_update(user_lists_update())
}

/// `DELETE /api/v0/userlists/{id}/`, evicting the list and its items
///
/// The response carries nothing to merge; the transform only empties the
/// list's item table.
#[must_use]
pub fn delete_user_list_mutation(id: impl Into<EntityId>) -> MutationDescriptor {
    let id = id.into();
    let items = TableName::list_items(&id);
    let cleared = items.clone();

    MutationDescriptor::new(Method::Delete, user_list_url(&id))
        .with_transform(transform(move |_| Patch::new().with(cleared.clone(), Slot::empty_table())))
        .with_update(
            UpdateMap::new()
                .with(TableName::USER_LISTS, MergePolicy::Dissoc(id))
                .with(items, MergePolicy::Replace),
        )
}

/// Embedded records of list items go to their own entity tables
fn insert_contents(patch: &mut Patch, item: &ListItem, content: Option<Value>) {
    if let Some(record) = content {
        let key = item.reference.key();
        patch.insert_record(TableName::for_kind(key.kind), key.id, record);
    }
}

/// `GET /api/v0/userlists/{id}/items/`
///
/// The response is the full membership, so it replaces the list's item
/// table. Embedded records go to their own tables.
#[must_use]
pub fn user_list_items_request(list_id: impl Into<EntityId>) -> QueryDescriptor {
    let list_id = list_id.into();
    let url = items_url(&list_id);
    let items_table = TableName::list_items(&list_id);
    let target = items_table.clone();

    let transform = transform(move |body| {
        if !is_page(body) {
            return Patch::new();
        }

        let mut patch = Patch::new();
        let mut items = Vec::new();
        for (item, content) in results(body).iter().filter_map(list_item) {
            insert_contents(&mut patch, &item, content);
            items.push(item);
        }

        patch.insert(target.clone(), Slot::Table(list_items_table(&items)));
        patch
    });

    QueryDescriptor::get(url, transform, entity_update().with(items_table, MergePolicy::Replace))
}

/// `POST /api/v0/userlists/{id}/items/` adding `reference` to the list
///
/// The confirmed item is upserted by its item id, leaving every other item
/// of the list as the store holds it at merge time.
#[must_use]
pub fn create_list_item_mutation(list_id: impl Into<EntityId>, reference: &Reference) -> MutationDescriptor {
    let list_id = list_id.into();
    let url = items_url(&list_id);
    let request = json!({
        "content_type": reference.object_type.as_str(),
        "object_id": reference.object_id.to_value(),
    });
    let items_table = TableName::list_items(&list_id);
    let target = items_table.clone();

    let transform = transform(move |body| {
        let Some((item, content)) = body.and_then(list_item) else {
            tracing::warn!("Unparseable list item response for list {}", list_id);
            return Patch::new();
        };

        let mut patch = Patch::new();
        insert_contents(&mut patch, &item, content);
        patch.insert_record(target.clone(), item.item_id.clone(), item.to_value());
        patch
    });

    MutationDescriptor::new(Method::Post, url)
        .with_body(request)
        .with_transform(transform)
        .with_update(entity_update().with(items_table, MergePolicy::DeepMerge))
}

/// `DELETE /api/v0/userlists/{id}/items/{item}/`, evicting that one item
#[must_use]
pub fn delete_list_item_mutation(list_id: impl Into<EntityId>, item_id: impl Into<EntityId>) -> MutationDescriptor {
    let list_id = list_id.into();
    let item_id = item_id.into();
    let url = format!("{}{}/", items_url(&list_id), item_id);

    MutationDescriptor::new(Method::Delete, url)
        .with_update(UpdateMap::new().with(TableName::list_items(&list_id), MergePolicy::Dissoc(item_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use lrc_store::NormalizedStore;
    use pretty_assertions::assert_eq;

    fn server_item(id: i64, position: i64, object_id: i64, kind: &str) -> Value {
        json!({
            "id": id,
            "position": position,
            "object_id": object_id,
            "content_type": kind,
            "content_data": {"id": object_id, "title": format!("{kind} {object_id}")},
        })
    }

    #[test]
    fn delete_evicts_list_and_empties_its_items() {
        let delete = delete_user_list_mutation(4);
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.url, "/api/v0/userlists/4/");
        assert_eq!(
            delete.update.policy(&TableName::USER_LISTS),
            Some(&MergePolicy::Dissoc(EntityId::Int(4)))
        );

        let patch = delete.patch_for(None);
        assert_eq!(patch.get(&TableName::list_items(&EntityId::Int(4))), Some(&Slot::empty_table()));
        assert!(patch.get(&TableName::USER_LISTS).is_none());
    }

    #[test]
    fn create_and_update_store_canonical_object() {
        let create = create_user_list_mutation(json!({"title": "New"}));
        let patch = create.patch_for(Some(&json!({"id": 12, "title": "New", "author": 7})));
        assert_eq!(patch.table(&TableName::USER_LISTS).unwrap()[&EntityId::Int(12)]["author"], 7);

        let update = update_user_list_mutation(12, json!({"title": "Renamed"}));
        assert_eq!(update.method, Method::Patch);
        assert_eq!(update.url, "/api/v0/userlists/12/");
    }

    fn items_of(store: &NormalizedStore, list_id: i64) -> Vec<EntityId> {
        store
            .table(&TableName::list_items(&EntityId::Int(list_id)))
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn items_request_splits_references_and_content() {
        let body = json!({"results": [server_item(2, 1, 9, "video"), server_item(1, 0, 5, "course")]});
        let patch = user_list_items_request(3).patch_for(Some(&body));

        assert_eq!(patch.table(&TableName::VIDEOS).unwrap().len(), 1);
        assert_eq!(patch.table(&TableName::COURSES).unwrap().len(), 1);

        let items = patch.table(&TableName::list_items(&EntityId::Int(3))).unwrap();
        assert_eq!(items[&EntityId::Int(1)]["objectType"], "course");
        assert_eq!(items[&EntityId::Int(2)]["position"], 1);
    }

    #[test]
    fn item_mutations_maintain_membership() {
        let mut store = NormalizedStore::new();
        let load = user_list_items_request(3);
        store.apply(
            load.patch_for(Some(&json!([server_item(1, 0, 5, "course")]))),
            &load.update,
        );

        let add = create_list_item_mutation(3, &Reference::new(9, EntityKind::Video));
        assert_eq!(add.body, Some(json!({"content_type": "video", "object_id": 9})));
        store.apply(add.patch_for(Some(&server_item(2, 1, 9, "video"))), &add.update);
        assert_eq!(items_of(&store, 3), vec![EntityId::Int(1), EntityId::Int(2)]);

        let remove = delete_list_item_mutation(3, 1);
        assert_eq!(remove.url, "/api/v0/userlists/3/items/1/");
        store.apply(remove.patch_for(None), &remove.update);

        let items = store.table(&TableName::list_items(&EntityId::Int(3))).unwrap();
        assert_eq!(
            items.values().collect::<Vec<_>>(),
            vec![&json!({"itemId": 2, "position": 1, "objectId": 9, "objectType": "video"})]
        );
    }

    #[test]
    fn concurrent_adds_both_survive() {
        let mut store = NormalizedStore::new();
        let load = user_list_items_request(3);
        store.apply(
            load.patch_for(Some(&json!([server_item(1, 0, 5, "course")]))),
            &load.update,
        );

        // Both built before either is confirmed.
        let first = create_list_item_mutation(3, &Reference::new(9, EntityKind::Video));
        let second = create_list_item_mutation(3, &Reference::new(4, EntityKind::Podcast));
        store.apply(second.patch_for(Some(&server_item(3, 2, 4, "podcast"))), &second.update);
        store.apply(first.patch_for(Some(&server_item(2, 1, 9, "video"))), &first.update);

        assert_eq!(
            items_of(&store, 3),
            vec![EntityId::Int(1), EntityId::Int(2), EntityId::Int(3)]
        );
    }

    #[test]
    fn add_and_delete_confirmed_in_either_order() {
        for add_first in [true, false] {
            let mut store = NormalizedStore::new();
            let load = user_list_items_request(3);
            store.apply(
                load.patch_for(Some(&json!([server_item(1, 0, 5, "course")]))),
                &load.update,
            );

            let add = create_list_item_mutation(3, &Reference::new(9, EntityKind::Video));
            let remove = delete_list_item_mutation(3, 1);
            let added = add.patch_for(Some(&server_item(2, 1, 9, "video")));
            if add_first {
                store.apply(added, &add.update);
                store.apply(remove.patch_for(None), &remove.update);
            } else {
                store.apply(remove.patch_for(None), &remove.update);
                store.apply(added, &add.update);
            }

            assert_eq!(items_of(&store, 3), vec![EntityId::Int(2)], "add_first={add_first}");
        }
    }

    #[test]
    fn empty_bodies_yield_empty_patches() {
        assert!(user_lists_request().patch_for(None).is_empty());
        assert!(user_list_items_request(1).patch_for(None).is_empty());
        assert!(create_user_list_mutation(json!({})).patch_for(None).is_empty());
    }
}
