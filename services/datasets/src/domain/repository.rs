#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    CommunityKey, Dataset, DatasetProfile, DatasetStats, FollowedAuthor, FollowedCommunity,
};
use crate::error::DatasetsServiceError;

/// Match criteria for related-dataset candidates. A dataset matches when any one
/// criterion does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateQuery {
    pub exclude_id: i32,
    /// Matched as case-insensitive substrings of the stored tag list.
    pub tags: Vec<String>,
    pub author_orcids: Vec<String>,
    /// Matched against lowercased author names.
    pub author_names: Vec<String>,
    pub community_keys: Vec<CommunityKey>,
}

impl CandidateQuery {
    pub fn from_profile(exclude_id: i32, profile: &DatasetProfile) -> Self {
        Self {
            exclude_id,
            tags: profile.tags.iter().cloned().collect(),
            author_orcids: profile.author_orcids.iter().cloned().collect(),
            author_names: profile.author_names.iter().cloned().collect(),
            community_keys: profile.community_keys.iter().cloned().collect(),
        }
    }

    /// No criterion at all; such a query would match nothing.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.author_orcids.is_empty()
            && self.author_names.is_empty()
            && self.community_keys.is_empty()
    }
}

/// Read access to datasets. Every returned dataset has its authors and
/// communities attached.
pub trait DatasetStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Dataset>, DatasetsServiceError>;

    /// Distinct datasets matching `query`, never including `query.exclude_id`.
    async fn find_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<Dataset>, DatasetsServiceError>;

    /// Most downloaded first, newer first on ties.
    async fn top_by_popularity(
        &self,
        exclude: &[i32],
        limit: usize,
    ) -> Result<Vec<Dataset>, DatasetsServiceError>;

    /// Datasets created at or after `since`, most downloaded first.
    async fn trending(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Dataset>, DatasetsServiceError>;

    /// Atomically bump the download counter. Returns `false` if no such dataset.
    async fn record_download(&self, id: i32) -> Result<bool, DatasetsServiceError>;

    async fn find_stats(&self, id: i32) -> Result<Option<DatasetStats>, DatasetsServiceError>;
}

/// Repository for author and community follows.
pub trait FollowRepository: Send + Sync {
    /// Idempotent.
    async fn follow_author(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<(), DatasetsServiceError>;

    /// Returns `true` if a follow was removed.
    async fn unfollow_author(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<bool, DatasetsServiceError>;

    async fn list_authors(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FollowedAuthor>, DatasetsServiceError>;

    /// Idempotent.
    async fn follow_community(
        &self,
        user_id: Uuid,
        community_id: &str,
    ) -> Result<(), DatasetsServiceError>;

    /// Returns `true` if a follow was removed.
    async fn unfollow_community(
        &self,
        user_id: Uuid,
        community_id: &str,
    ) -> Result<bool, DatasetsServiceError>;

    async fn list_communities(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FollowedCommunity>, DatasetsServiceError>;
}
