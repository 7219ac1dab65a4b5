//! Testing utilities for the learning resource cache workspace
//!
//! Shared record fixtures and a scriptable in-memory transport.

#![allow(missing_docs)]

use async_trait::async_trait;
use lrc_engine::{HttpRequest, HttpResponse, Transport, TransportError};
use lrc_entity::{EntityId, EntityKind};
use lrc_merge::MergePolicy;
use lrc_store::{NormalizedStore, Patch, TableName, UpdateMap};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub fn record(kind: EntityKind, id: impl Into<EntityId>) -> Value {
    let id = id.into();
    json!({
        "id": id.to_value(),
        "object_type": kind.as_str(),
        "title": format!("{kind} {id}"),
        "is_favorite": false,
    })
}

pub fn course(id: i64) -> Value {
    record(EntityKind::Course, id)
}

pub fn video(id: i64) -> Value {
    record(EntityKind::Video, id)
}

pub fn user_list(id: i64, author: i64) -> Value {
    let mut list = record(EntityKind::UserList, id);
    list["author"] = json!(author);
    list
}

pub fn favorited(mut record: Value) -> Value {
    record["is_favorite"] = json!(true);
    record
}

/// Server shape of one list item with its embedded content
pub fn list_item(id: i64, position: i64, content: Value) -> Value {
    json!({
        "id": id,
        "position": position,
        "object_id": content["id"].clone(),
        "content_type": content["object_type"].clone(),
        "content_data": content,
    })
}

pub fn page(results: Vec<Value>) -> Value {
    json!({"next": null, "count": results.len(), "results": results})
}

/// Store preloaded with `records`, each routed to its `object_type` table
pub fn store_with(records: &[Value]) -> NormalizedStore {
    let mut patch = Patch::new();
    let mut update = UpdateMap::new();
    for record in records {
        let kind = lrc_entity::record_kind(record).unwrap();
        let id = lrc_entity::record_id(record).unwrap();
        let table = TableName::for_kind(kind);
        patch.insert_record(table.clone(), id, record.clone());
        update = update.with(table, MergePolicy::DeepMerge);
    }

    let mut store = NormalizedStore::new();
    store.apply(patch, &update);
    store
}

/// In-memory [`Transport`] answering from a route table
///
/// Unrouted URLs answer `404`. A route scripted with several answers gives
/// them out in order and then repeats the last one. Every request is counted
/// and recorded.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url: &str, body: Value) -> Self {
        self.with_response(url, HttpResponse::ok(body))
    }

    pub fn with_response(self, url: &str, response: HttpResponse) -> Self {
        self.with_answers(url, [Ok(response)])
    }

    pub fn with_error(self, url: &str, error: TransportError) -> Self {
        self.with_answers(url, [Err(error)])
    }

    /// Answer successive requests to `url` with `bodies`, in order
    pub fn with_json_sequence(self, url: &str, bodies: impl IntoIterator<Item = Value>) -> Self {
        self.with_answers(url, bodies.into_iter().map(|body| Ok(HttpResponse::ok(body))))
    }

    fn with_answers(
        self,
        url: &str,
        answers: impl IntoIterator<Item = Result<HttpResponse, TransportError>>,
    ) -> Self {
        self.routes.lock().insert(url.to_string(), answers.into_iter().collect());
        self
    }

    /// Hold every request until the returned semaphore gets permits
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(gate) = &self.gate {
            // Closed semaphores release immediately.
            let _permit = gate.acquire().await;
        }

        let mut routes = self.routes.lock();
        let answers = routes.get_mut(&request.url);
        answers
            .and_then(|answers| {
                if answers.len() > 1 {
                    answers.pop_front()
                } else {
                    answers.front().cloned()
                }
            })
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    body: Some(json!({"detail": "Not found."})),
                })
            })
    }
}
