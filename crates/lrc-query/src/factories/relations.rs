//! Cross-kind feeds stored as references

use crate::descriptor::{transform, QueryDescriptor};
use crate::transform::{demux, entity_update, is_page, results};
use lrc_entity::{CompositeKey, Reference};
use lrc_merge::{MergePolicy, Slot};
use lrc_store::{Patch, TableName};
use serde_json::{json, Value};

fn reference_list(refs: &[Reference]) -> Value {
    Value::Array(refs.iter().map(Reference::to_value).collect())
}

/// `POST /api/v0/similar/` for the resource `key`
///
/// Similar records land in their own tables; the ordered references are
/// stored in `similarResources` under `"{kind}_{id}"`.
#[must_use]
pub fn similar_resources_request(key: CompositeKey) -> QueryDescriptor {
    let body = json!({
        "id": key.id.to_value(),
        "object_type": key.kind.as_str(),
    });
    let row = key.relation_key();

    let transform = transform(move |response| {
        if !is_page(response) {
            return Patch::new();
        }
        let (mut patch, refs) = demux(results(response));
        patch.insert_record(
            TableName::SIMILAR_RESOURCES,
            row.clone(),
            json!({"id": row.to_value(), "results": reference_list(&refs)}),
        );
        patch
    });

    let update = entity_update().with(TableName::SIMILAR_RESOURCES, MergePolicy::ShallowMerge);
    QueryDescriptor::post("/api/v0/similar/", body, transform, update)
        .with_query_key(format!("similar:{key}"))
}

/// `GET /api/v0/popular-content/`, replacing the ordered popular feed
#[must_use]
pub fn popular_content_request() -> QueryDescriptor {
    let transform = transform(|body| {
        if !is_page(body) {
            return Patch::new();
        }
        let (patch, refs) = demux(results(body));
        patch.with(TableName::POPULAR_CONTENT, Slot::Scalar(reference_list(&refs)))
    });

    let update = entity_update().with(TableName::POPULAR_CONTENT, MergePolicy::Replace);
    QueryDescriptor::get("/api/v0/popular-content/", transform, update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Descriptor, Method};
    use lrc_entity::{EntityId, EntityKind};
    use serde_json::json;

    #[test]
    fn similar_request_is_keyed_per_kind() {
        let course = similar_resources_request(CompositeKey::new(EntityKind::Course, 5));
        let list = similar_resources_request(CompositeKey::new(EntityKind::UserList, 5));

        assert_eq!(course.method, Method::Post);
        assert_ne!(course.dedup_key(), list.dedup_key());
        assert_eq!(course.body, Some(json!({"id": 5, "object_type": "course"})));
    }

    #[test]
    fn similar_response_stores_references() {
        let query = similar_resources_request(CompositeKey::new(EntityKind::Video, 2));
        let patch = query.patch_for(Some(&json!([
            {"id": 7, "object_type": "video", "title": "A"},
            {"id": 1, "object_type": "course", "title": "B"},
        ])));

        let row = &patch.table(&TableName::SIMILAR_RESOURCES).unwrap()[&EntityId::from("video_2")];
        assert_eq!(
            row["results"],
            json!([
                {"objectId": 7, "objectType": "video"},
                {"objectId": 1, "objectType": "course"},
            ])
        );
        assert_eq!(patch.table(&TableName::VIDEOS).unwrap().len(), 1);
    }

    #[test]
    fn popular_content_replaces_feed() {
        let patch = popular_content_request().patch_for(Some(&json!({"results": [
            {"id": 3, "object_type": "podcastepisode"},
        ]})));

        assert_eq!(
            patch.get(&TableName::POPULAR_CONTENT),
            Some(&Slot::Scalar(json!([{"objectId": 3, "objectType": "podcastepisode"}])))
        );
        assert!(popular_content_request().patch_for(None).is_empty());
    }
}
