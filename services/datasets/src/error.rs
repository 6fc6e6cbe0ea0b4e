use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Datasets service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DatasetsServiceError {
    #[error("dataset not found")]
    DatasetNotFound,
    #[error("users cannot follow themselves")]
    CannotFollowSelf,
    #[error("not following")]
    NotFollowing,
    #[error("{0}")]
    ValidationError(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DatasetsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatasetNotFound => "DATASET_NOT_FOUND",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::NotFollowing => "NOT_FOLLOWING",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for DatasetsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CannotFollowSelf | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatasetNotFound | Self::NotFollowing => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
