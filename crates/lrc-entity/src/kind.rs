//! Entity kinds
//!
//! Provides [`EntityKind`], the tag that routes a record to its normalized
//! table and its REST resource.

use crate::error::EntityError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Resource category
///
/// Serialized with the wire names used in `object_type` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Course
    Course,

    /// Program (a bundle of courses)
    Program,

    /// Video
    Video,

    /// User-curated list
    #[serde(rename = "userlist")]
    UserList,

    /// Staff-curated learning path (stored with user lists)
    #[serde(rename = "learningpath")]
    LearningPath,

    /// Podcast
    Podcast,

    /// Single podcast episode
    #[serde(rename = "podcastepisode")]
    PodcastEpisode,
}

impl EntityKind {
    /// Every kind
    pub const ALL: [Self; 7] = [
        Self::Course,
        Self::Program,
        Self::Video,
        Self::UserList,
        Self::LearningPath,
        Self::Podcast,
        Self::PodcastEpisode,
    ];

    /// One kind per backing table, in favorites display order
    pub const TABLE_KINDS: [Self; 6] = [
        Self::Course,
        Self::Program,
        Self::UserList,
        Self::Video,
        Self::Podcast,
        Self::PodcastEpisode,
    ];

    /// Wire name (`object_type`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Program => "program",
            Self::Video => "video",
            Self::UserList => "userlist",
            Self::LearningPath => "learningpath",
            Self::Podcast => "podcast",
            Self::PodcastEpisode => "podcastepisode",
        }
    }

    /// Name of the normalized table holding records of this kind
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Program => "programs",
            Self::Video => "videos",
            Self::UserList | Self::LearningPath => "userLists",
            Self::Podcast => "podcasts",
            Self::PodcastEpisode => "podcastEpisodes",
        }
    }

    /// REST collection path, with trailing slash
    #[must_use]
    pub const fn api_base(self) -> &'static str {
        match self {
            Self::Course => "/api/v0/courses/",
            Self::Program => "/api/v0/programs/",
            Self::Video => "/api/v0/videos/",
            Self::UserList | Self::LearningPath => "/api/v0/userlists/",
            Self::Podcast => "/api/v0/podcasts/",
            Self::PodcastEpisode => "/api/v0/podcastepisodes/",
        }
    }

    /// Kind that owns the backing table
    #[inline]
    #[must_use]
    pub const fn canonical(self) -> Self {
        match self {
            Self::LearningPath => Self::UserList,
            other => other,
        }
    }

    /// Whether records of this kind are ordered list aggregates
    #[inline]
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::UserList | Self::LearningPath)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EntityError::UnknownKind(s.to_string()))
    }
}
