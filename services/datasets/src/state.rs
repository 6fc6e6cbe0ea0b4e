use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::domain::types::RecommendationWeights;
use crate::infra::db::{DbDatasetStore, DbFollowRepository};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub weights: RecommendationWeights,
}

impl AppState {
    pub fn dataset_store(&self) -> DbDatasetStore {
        DbDatasetStore {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
