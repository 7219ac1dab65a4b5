//! Request/transform/update descriptors
//!
//! A descriptor is a short-lived value: the engine sends its request, feeds
//! the response body to its transform and merges the resulting [`Patch`]
//! with its [`UpdateMap`].

use lrc_store::{Patch, UpdateMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// HTTP method of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read
    Get,
    /// Create, or a body-carrying read
    Post,
    /// Partial update
    Patch,
    /// Delete
    Delete,
}

impl Method {
    /// Wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body → store patch
///
/// Must be pure. `None` (no body, or JSON `null`) yields an empty patch.
pub type Transform = Arc<dyn Fn(Option<&Value>) -> Patch + Send + Sync>;

/// Wrap a closure as a [`Transform`]
pub fn transform<F>(f: F) -> Transform
where
    F: Fn(Option<&Value>) -> Patch + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What the engine needs from either descriptor kind
pub trait Descriptor: Send + Sync {
    /// Request URL (path relative to the transport's base)
    fn url(&self) -> &str;

    /// Request method
    fn method(&self) -> Method;

    /// Request body
    fn body(&self) -> Option<&Value>;

    /// Run the transform on a confirmed response body
    fn patch_for(&self, body: Option<&Value>) -> Patch;

    /// Merge policy per table
    fn update(&self) -> &UpdateMap;
}

/// Read request
#[derive(Clone)]
pub struct QueryDescriptor {
    /// Explicit de-duplication key; the URL is used when absent
    pub query_key: Option<String>,
    /// Request URL
    pub url: String,
    /// `GET`, or `POST` for body-carrying reads
    pub method: Method,
    /// Request body
    pub body: Option<Value>,
    /// Response → patch
    pub transform: Transform,
    /// Merge policy per table
    pub update: UpdateMap,
}

impl QueryDescriptor {
    /// Create `GET` descriptor
    #[must_use]
    pub fn get(url: impl Into<String>, transform: Transform, update: UpdateMap) -> Self {
        Self {
            query_key: None,
            url: url.into(),
            method: Method::Get,
            body: None,
            transform,
            update,
        }
    }

    /// Create `POST` descriptor carrying a body
    #[must_use]
    pub fn post(url: impl Into<String>, body: Value, transform: Transform, update: UpdateMap) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::get(url, transform, update)
        }
    }

    /// Set explicit de-duplication key
    #[inline]
    #[must_use]
    pub fn with_query_key(mut self, key: impl Into<String>) -> Self {
        self.query_key = Some(key.into());
        self
    }

    /// Key under which concurrent identical queries share one request
    #[inline]
    #[must_use]
    pub fn dedup_key(&self) -> &str {
        self.query_key.as_deref().unwrap_or(&self.url)
    }
}

impl Debug for QueryDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("query_key", &self.query_key)
            .field("url", &self.url)
            .field("method", &self.method)
            .field("body", &self.body)
            .field("update", &self.update)
            .finish_non_exhaustive()
    }
}

impl Descriptor for QueryDescriptor {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> Method {
        self.method
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn patch_for(&self, body: Option<&Value>) -> Patch {
        (self.transform)(body.filter(|b| !b.is_null()))
    }

    fn update(&self) -> &UpdateMap {
        &self.update
    }
}

/// Write request, merged only after the server confirms it
#[derive(Clone)]
pub struct MutationDescriptor {
    /// Request URL
    pub url: String,
    /// `POST`, `PATCH` or `DELETE`
    pub method: Method,
    /// Request body
    pub body: Option<Value>,
    /// Confirmed response → patch; `None` for mutations that only evict
    pub transform: Option<Transform>,
    /// Merge policy per table
    pub update: UpdateMap,
}

impl MutationDescriptor {
    /// Create mutation with no body, transform or update
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            transform: None,
            update: UpdateMap::new(),
        }
    }

    /// Set request body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set transform
    #[inline]
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Set update map
    #[inline]
    #[must_use]
    pub fn with_update(mut self, update: UpdateMap) -> Self {
        self.update = update;
        self
    }
}

impl Debug for MutationDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("body", &self.body)
            .field("has_transform", &self.transform.is_some())
            .field("update", &self.update)
            .finish()
    }
}

impl Descriptor for MutationDescriptor {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> Method {
        self.method
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn patch_for(&self, body: Option<&Value>) -> Patch {
        match &self.transform {
            Some(transform) => transform(body.filter(|b| !b.is_null())),
            None => Patch::new(),
        }
    }

    fn update(&self) -> &UpdateMap {
        &self.update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrc_merge::MergePolicy;
    use lrc_store::TableName;
    use serde_json::json;

    fn echo() -> Transform {
        transform(|body| match body {
            Some(record) => Patch::new().with_record(TableName::COURSES, 1, record.clone()),
            None => Patch::new(),
        })
    }

    #[test]
    fn dedup_key_falls_back_to_url() {
        let query = QueryDescriptor::get("/api/v0/courses/1/", echo(), UpdateMap::new());
        assert_eq!(query.dedup_key(), "/api/v0/courses/1/");

        let keyed = query.with_query_key("course_1");
        assert_eq!(keyed.dedup_key(), "course_1");
    }

    #[test]
    fn null_body_reaches_transform_as_none() {
        let query = QueryDescriptor::get("/x/", echo(), UpdateMap::new());
        assert!(query.patch_for(Some(&Value::Null)).is_empty());
        assert!(query.patch_for(None).is_empty());
        assert_eq!(query.patch_for(Some(&json!({"id": 1}))).len(), 1);
    }

    #[test]
    fn mutation_without_transform_yields_empty_patch() {
        let delete = MutationDescriptor::new(Method::Delete, "/api/v0/userlists/3/")
            .with_update(UpdateMap::new().with(TableName::USER_LISTS, MergePolicy::Dissoc(3.into())));

        assert!(delete.patch_for(Some(&json!({"id": 3}))).is_empty());
        assert_eq!(delete.update().len(), 1);
    }

    #[test]
    fn post_query_carries_body() {
        let query = QueryDescriptor::post("/api/v0/similar/", json!({"id": 1}), echo(), UpdateMap::new());
        assert_eq!(query.method, Method::Post);
        assert_eq!(Descriptor::body(&query), Some(&json!({"id": 1})));
    }

    #[test]
    fn method_wire_names() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(serde_json::to_value(Method::Delete).unwrap(), json!("DELETE"));
    }
}
