//! Single-record detail requests

use crate::descriptor::{transform, QueryDescriptor};
use lrc_entity::{record_id, EntityId, EntityKind};
use lrc_merge::MergePolicy;
use lrc_store::{Patch, TableName, UpdateMap};

/// Detail URL of one record: `{api_base}{id}/`
#[must_use]
pub fn resource_url(kind: EntityKind, id: &EntityId) -> String {
    format!("{}{}/", kind.api_base(), id)
}

/// Fetch one record of any kind into its table with `DeepMerge`
///
/// A response without its own `id` is stored under the requested id.
#[must_use]
pub fn resource_request(kind: EntityKind, id: impl Into<EntityId>) -> QueryDescriptor {
    let id = id.into();
    let table = TableName::for_kind(kind);
    let url = resource_url(kind, &id);

    let target = table.clone();
    let transform = transform(move |body| match body {
        Some(record) if record.is_object() => {
            let key = record_id(record).unwrap_or_else(|_| id.clone());
            Patch::new().with_record(target.clone(), key, record.clone())
        }
        Some(_) => {
            tracing::warn!("Ignoring non-object {} detail response", kind);
            Patch::new()
        }
        None => Patch::new(),
    });

    QueryDescriptor::get(url, transform, UpdateMap::new().with(table, MergePolicy::DeepMerge))
}
