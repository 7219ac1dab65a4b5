//! Favorites: the mixed-kind favorites feed and the favorite toggle

use crate::descriptor::{transform, Method, MutationDescriptor, QueryDescriptor};
use crate::error::QueryError;
use crate::transform::{demux, entity_update, results};
use lrc_entity::{is_favorite, record_id, EntityError, EntityKind, FAVORITE_FIELD};
use lrc_merge::MergePolicy;
use lrc_store::{Patch, TableName, UpdateMap};
use serde_json::{json, Value};

/// `GET /api/v0/favorites/`, demultiplexed into one table per kind
///
/// Every record in the feed is stored with `is_favorite: true`.
#[must_use]
pub fn favorites_request() -> QueryDescriptor {
    let transform = transform(|body| {
        let flagged: Vec<Value> = results(body)
            .iter()
            .map(|record| {
                let mut record = record.clone();
                let wrapped = record.get("content_data").is_some_and(Value::is_object);
                let target = if wrapped {
                    record.get_mut("content_data")
                } else {
                    Some(&mut record)
                };
                if let Some(object) = target.and_then(Value::as_object_mut) {
                    object.insert(FAVORITE_FIELD.to_string(), Value::Bool(true));
                }
                record
            })
            .collect();
        demux(&flagged).0
    });

    QueryDescriptor::get("/api/v0/favorites/", transform, entity_update())
}

/// Toggle the favorite flag of `record`
///
/// Sends `POST {api_base}{id}/favorite/` (or `unfavorite/` when the record is
/// currently a favorite). On success only `{id, is_favorite}` is merged, so
/// fields written by other requests since `record` was read are kept.
///
/// # Errors
/// Returns error if `record` is not an object or has no usable `id`
pub fn favorite_mutation(kind: EntityKind, record: &Value) -> Result<MutationDescriptor, QueryError> {
    if !record.is_object() {
        return Err(EntityError::NotAnObject.into());
    }
    let id = record_id(record)?;
    let favorite = is_favorite(record);
    let action = if favorite { "unfavorite" } else { "favorite" };
    let table = TableName::for_kind(kind);

    let url = format!("{}{}/{}/", kind.api_base(), id, action);
    let flag = json!({"id": id.to_value(), "is_favorite": !favorite});
    let target = table.clone();
    let transform = transform(move |_| Patch::new().with_record(target.clone(), id.clone(), flag.clone()));

    Ok(MutationDescriptor::new(Method::Post, url)
        .with_transform(transform)
        .with_update(UpdateMap::new().with(table, MergePolicy::DeepMerge)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use lrc_entity::EntityId;
    use serde_json::json;

    #[test]
    fn favorite_url_depends_on_current_flag() {
        let plain = json!({"id": 5, "is_favorite": false});
        let fav = json!({"id": 5, "is_favorite": true});

        assert_eq!(
            favorite_mutation(EntityKind::Course, &plain).unwrap().url,
            "/api/v0/courses/5/favorite/"
        );
        assert_eq!(
            favorite_mutation(EntityKind::UserList, &fav).unwrap().url,
            "/api/v0/userlists/5/unfavorite/"
        );
    }

    #[test]
    fn toggle_patch_carries_only_the_flag() {
        let record = json!({"id": 2, "title": "Pod", "is_favorite": false});
        let mutation = favorite_mutation(EntityKind::Podcast, &record).unwrap();

        // Favorite endpoints answer with no body.
        let patch = mutation.patch_for(None);
        assert_eq!(
            patch.table(&TableName::PODCASTS).unwrap()[&EntityId::Int(2)],
            json!({"id": 2, "is_favorite": true})
        );
    }

    #[test]
    fn toggle_keeps_fields_fetched_after_it_was_built() {
        let update = UpdateMap::new().with(TableName::COURSES, MergePolicy::DeepMerge);
        let mut store = lrc_store::NormalizedStore::new();
        store.apply(
            Patch::new().with_record(TableName::COURSES, 1, json!({"id": 1, "title": "old"})),
            &update,
        );

        let current = store.get(&lrc_entity::CompositeKey::new(EntityKind::Course, 1)).cloned().unwrap();
        let toggle = favorite_mutation(EntityKind::Course, &current).unwrap();

        store.apply(
            Patch::new().with_record(TableName::COURSES, 1, json!({"id": 1, "title": "new"})),
            &update,
        );
        store.apply(toggle.patch_for(None), &toggle.update);

        assert_eq!(
            store.get(&lrc_entity::CompositeKey::new(EntityKind::Course, 1)),
            Some(&json!({"id": 1, "title": "new", "is_favorite": true}))
        );
    }

    #[test]
    fn favorite_mutation_rejects_keyless_record() {
        assert!(favorite_mutation(EntityKind::Video, &json!({"title": "x"})).is_err());
        assert!(favorite_mutation(EntityKind::Video, &json!("x")).is_err());
    }

    #[test]
    fn favorites_feed_flags_records() {
        let body = json!({"results": [
            {"id": 1, "object_type": "course"},
            {"content_type": "video", "content_data": {"id": 2, "object_type": "video"}},
        ]});
        let patch = favorites_request().patch_for(Some(&body));

        assert_eq!(patch.table(&TableName::COURSES).unwrap()[&EntityId::Int(1)]["is_favorite"], true);
        assert_eq!(patch.table(&TableName::VIDEOS).unwrap()[&EntityId::Int(2)]["is_favorite"], true);
    }
}
