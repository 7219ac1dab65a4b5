//! Store table names

use lrc_entity::{EntityId, EntityKind};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Name of one store slot
///
/// Entity tables follow [`EntityKind::table_name`]; everything else (named
/// lists, relations, cursors) is defined where it is produced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableName(Cow<'static, str>);

impl TableName {
    /// `courses`
    pub const COURSES: Self = Self::from_static("courses");
    /// `programs`
    pub const PROGRAMS: Self = Self::from_static("programs");
    /// `videos`
    pub const VIDEOS: Self = Self::from_static("videos");
    /// `userLists` (user lists and learning paths)
    pub const USER_LISTS: Self = Self::from_static("userLists");
    /// `podcasts`
    pub const PODCASTS: Self = Self::from_static("podcasts");
    /// `podcastEpisodes`
    pub const PODCAST_EPISODES: Self = Self::from_static("podcastEpisodes");

    /// Relation table: `"{kind}_{id}"` → `{id, results: [Reference]}`
    pub const SIMILAR_RESOURCES: Self = Self::from_static("similarResources");
    /// Ordered references of the popular-content feed
    pub const POPULAR_CONTENT: Self = Self::from_static("popularContent");

    /// Name known at compile time
    #[inline]
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Name built at runtime
    #[inline]
    #[must_use]
    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Items of one user list, keyed by item id
    #[must_use]
    pub fn list_items(list_id: &EntityId) -> Self {
        Self::owned(format!("userListItems_{list_id}"))
    }

    /// Entity table for a kind
    #[inline]
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        Self::from_static(kind.table_name())
    }

    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EntityKind> for TableName {
    fn from(kind: EntityKind) -> Self {
        Self::for_kind(kind)
    }
}

impl From<&'static str> for TableName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}
