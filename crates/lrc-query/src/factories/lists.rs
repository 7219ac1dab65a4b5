//! Named list queries
//!
//! A [`ListDefinition`] fixes a list's identity once: the ids slot it owns,
//! the entity kind it holds and the endpoint it loads from. The query and the
//! selector are both derived from it, so the two can never disagree.

use crate::descriptor::{transform, QueryDescriptor};
use crate::error::QueryError;
use crate::transform::{id_map, is_page, next_link, results};
use lrc_entity::{EntityId, EntityKind};
use lrc_merge::{MergePolicy, Slot};
use lrc_select::ListSelector;
use lrc_store::{NormalizedStore, Patch, TableName, UpdateMap};

/// Identity of one ordered list of records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDefinition {
    name: TableName,
    kind: EntityKind,
    url: String,
    paginated: bool,
}

impl ListDefinition {
    /// Create list definition
    #[must_use]
    pub fn new(name: impl Into<TableName>, kind: EntityKind, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.into(),
            paginated: false,
        }
    }

    /// Mark the endpoint as `next`-paginated
    #[inline]
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }

    /// Name of the ids slot
    #[inline]
    #[must_use]
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Kind of the listed records
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// First-page URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the list loads page by page
    #[inline]
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.paginated
    }

    /// Slot holding the `next` link
    #[must_use]
    pub fn next_table(&self) -> TableName {
        TableName::owned(format!("{}Next", self.name))
    }

    /// Load the first page, replacing the list membership
    #[must_use]
    pub fn query(&self) -> QueryDescriptor {
        self.page_query(self.url.clone(), MergePolicy::Replace)
    }

    /// Load a following page, appending to the list membership
    #[must_use]
    pub fn next_page_query(&self, next_url: impl Into<String>) -> QueryDescriptor {
        self.page_query(next_url.into(), MergePolicy::AppendUnique)
    }

    /// `next` link stored by the last page load, if more pages remain
    #[must_use]
    pub fn next_url(&self, store: &NormalizedStore) -> Option<String> {
        store
            .slot_ref(&self.next_table())
            .and_then(Slot::as_scalar)
            .and_then(|next| next.as_str())
            .map(str::to_owned)
    }

    /// Selector resolving this list's ids to records
    #[must_use]
    pub fn selector(&self) -> ListSelector {
        ListSelector::new(self.name.clone(), self.kind)
    }

    /// Built-in list by name (`newCourses`, `recentPodcastEpisodes`, ...)
    ///
    /// # Errors
    /// Returns `QueryError::UnknownList` for any other name
    pub fn by_name(name: &str) -> Result<Self, QueryError> {
        Self::builtins()
            .into_iter()
            .find(|list| list.name.as_str() == name)
            .ok_or_else(|| QueryError::unknown_list(name))
    }

    /// Every built-in list
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![
            new_courses(),
            upcoming_courses(),
            featured_courses(),
            new_videos(),
            all_podcasts(),
            recent_podcast_episodes(),
        ]
    }

    fn page_query(&self, url: String, ids_policy: MergePolicy) -> QueryDescriptor {
        let kind = self.kind;
        let records_table = TableName::for_kind(kind);
        let ids_table = self.name.clone();
        let next_table = self.paginated.then(|| self.next_table());

        let mut update = UpdateMap::new()
            .with(records_table.clone(), MergePolicy::DeepMerge)
            .with(ids_table.clone(), ids_policy);
        if let Some(next) = &next_table {
            update = update.with(next.clone(), MergePolicy::Replace);
        }

        let transform = transform(move |body| {
            // Non-page bodies (error details) must not wipe the list.
            if !is_page(body) {
                return Patch::new();
            }

            let (records, order) = id_map(results(body), kind);
            let mut patch = Patch::new()
                .with(records_table.clone(), Slot::Table(records))
                .with(ids_table.clone(), Slot::Ids(order));
            if let Some(next) = &next_table {
                patch.insert(next.clone(), Slot::Scalar(next_link(body)));
            }
            patch
        });

        QueryDescriptor::get(url, transform, update)
    }
}

/// `newCourses`
#[must_use]
pub fn new_courses() -> ListDefinition {
    ListDefinition::new("newCourses", EntityKind::Course, "/api/v0/courses/new/")
}

/// `upcomingCourses`
#[must_use]
pub fn upcoming_courses() -> ListDefinition {
    ListDefinition::new("upcomingCourses", EntityKind::Course, "/api/v0/courses/upcoming/")
}

/// `featuredCourses`
#[must_use]
pub fn featured_courses() -> ListDefinition {
    ListDefinition::new("featuredCourses", EntityKind::Course, "/api/v0/courses/featured/")
}

/// `newVideos`
#[must_use]
pub fn new_videos() -> ListDefinition {
    ListDefinition::new("newVideos", EntityKind::Video, "/api/v0/videos/new/")
}

/// `allPodcasts`
#[must_use]
pub fn all_podcasts() -> ListDefinition {
    ListDefinition::new("allPodcasts", EntityKind::Podcast, "/api/v0/podcasts/")
}

/// `recentPodcastEpisodes`, loaded page by page
#[must_use]
pub fn recent_podcast_episodes() -> ListDefinition {
    ListDefinition::new(
        "recentPodcastEpisodes",
        EntityKind::PodcastEpisode,
        "/api/v0/podcasts/recent/",
    )
    .paginated()
}

/// Episodes of one podcast, loaded page by page
#[must_use]
pub fn podcast_episodes(podcast_id: impl Into<EntityId>) -> ListDefinition {
    let podcast_id = podcast_id.into();
    ListDefinition::new(
        TableName::owned(format!("podcastEpisodes_{podcast_id}")),
        EntityKind::PodcastEpisode,
        format!("/api/v0/podcasts/{podcast_id}/episodes/"),
    )
    .paginated()
}
