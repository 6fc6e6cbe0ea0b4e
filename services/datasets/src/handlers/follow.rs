use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use fifahub_auth_types::identity::IdentityHeaders;

use crate::domain::types::{FollowedAuthor, FollowedCommunity};
use crate::error::DatasetsServiceError;
use crate::state::AppState;
use crate::usecase::follow::{
    FollowAuthorUseCase, FollowCommunityUseCase, ListFollowedAuthorsUseCase,
    ListFollowedCommunitiesUseCase, UnfollowAuthorUseCase, UnfollowCommunityUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FollowedAuthorResponse {
    pub author_user_id: Uuid,
    #[serde(serialize_with = "fifahub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FollowedAuthor> for FollowedAuthorResponse {
    fn from(f: FollowedAuthor) -> Self {
        Self {
            author_user_id: f.author_user_id,
            created_at: f.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct FollowedCommunityResponse {
    pub community_id: String,
    #[serde(serialize_with = "fifahub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FollowedCommunity> for FollowedCommunityResponse {
    fn from(f: FollowedCommunity) -> Self {
        Self {
            community_id: f.community_id,
            created_at: f.created_at,
        }
    }
}

// ── /users/@me/follows/authors ───────────────────────────────────────────────

pub async fn list_followed_authors(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<FollowedAuthorResponse>>, DatasetsServiceError> {
    let usecase = ListFollowedAuthorsUseCase {
        repo: state.follow_repo(),
    };
    let follows = usecase.execute(identity.user_id).await?;
    Ok(Json(follows.into_iter().map(Into::into).collect()))
}

pub async fn follow_author(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_user_id): Path<Uuid>,
) -> Result<StatusCode, DatasetsServiceError> {
    let usecase = FollowAuthorUseCase {
        repo: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow_author(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_user_id): Path<Uuid>,
) -> Result<StatusCode, DatasetsServiceError> {
    let usecase = UnfollowAuthorUseCase {
        repo: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /users/@me/follows/communities ───────────────────────────────────────────

pub async fn list_followed_communities(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<FollowedCommunityResponse>>, DatasetsServiceError> {
    let usecase = ListFollowedCommunitiesUseCase {
        repo: state.follow_repo(),
    };
    let follows = usecase.execute(identity.user_id).await?;
    Ok(Json(follows.into_iter().map(Into::into).collect()))
}

pub async fn follow_community(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(community_id): Path<String>,
) -> Result<StatusCode, DatasetsServiceError> {
    let usecase = FollowCommunityUseCase {
        repo: state.follow_repo(),
    };
    usecase.execute(identity.user_id, &community_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow_community(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(community_id): Path<String>,
) -> Result<StatusCode, DatasetsServiceError> {
    let usecase = UnfollowCommunityUseCase {
        repo: state.follow_repo(),
    };
    usecase.execute(identity.user_id, &community_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
