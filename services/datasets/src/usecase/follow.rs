use uuid::Uuid;

use crate::domain::repository::FollowRepository;
use crate::domain::types::{FollowedAuthor, FollowedCommunity};
use crate::error::DatasetsServiceError;

// ── Authors ──────────────────────────────────────────────────────────────────

pub struct FollowAuthorUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> FollowAuthorUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<(), DatasetsServiceError> {
        if user_id == author_user_id {
            return Err(DatasetsServiceError::CannotFollowSelf);
        }
        self.repo.follow_author(user_id, author_user_id).await
    }
}

pub struct UnfollowAuthorUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> UnfollowAuthorUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<(), DatasetsServiceError> {
        if !self.repo.unfollow_author(user_id, author_user_id).await? {
            return Err(DatasetsServiceError::NotFollowing);
        }
        Ok(())
    }
}

pub struct ListFollowedAuthorsUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> ListFollowedAuthorsUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<FollowedAuthor>, DatasetsServiceError> {
        self.repo.list_authors(user_id).await
    }
}

// ── Communities ──────────────────────────────────────────────────────────────

fn community_id(raw: &str) -> Result<&str, DatasetsServiceError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(DatasetsServiceError::ValidationError(
            "community id is required".to_owned(),
        ));
    }
    Ok(id)
}

pub struct FollowCommunityUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> FollowCommunityUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, community: &str) -> Result<(), DatasetsServiceError> {
        self.repo
            .follow_community(user_id, community_id(community)?)
            .await
    }
}

pub struct UnfollowCommunityUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> UnfollowCommunityUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, community: &str) -> Result<(), DatasetsServiceError> {
        if !self
            .repo
            .unfollow_community(user_id, community_id(community)?)
            .await?
        {
            return Err(DatasetsServiceError::NotFollowing);
        }
        Ok(())
    }
}

pub struct ListFollowedCommunitiesUseCase<R: FollowRepository> {
    pub repo: R,
}

impl<R: FollowRepository> ListFollowedCommunitiesUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FollowedCommunity>, DatasetsServiceError> {
        self.repo.list_communities(user_id).await
    }
}
