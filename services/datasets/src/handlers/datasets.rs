use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use fifahub_domain::dataset::DatasetKind;

use crate::domain::profile::extract_tags;
use crate::domain::types::{Dataset, DatasetStats};
use crate::error::DatasetsServiceError;
use crate::state::AppState;
use crate::usecase::downloads::{GetDatasetStatsUseCase, RecordDownloadUseCase};
use crate::usecase::related::GetRelatedDatasetsUseCase;
use crate::usecase::trending::{GetTrendingDatasetsUseCase, TrendingInput};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub id: i32,
    pub kind: DatasetKind,
    pub title: String,
    pub tags: Vec<String>,
    pub download_count: i64,
    #[serde(serialize_with = "fifahub_core::serde::to_rfc3339_ms_opt")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Dataset> for DatasetSummary {
    fn from(dataset: Dataset) -> Self {
        let kind = dataset.kind();
        let core = match dataset {
            Dataset::Uvl(d) => d.core,
            Dataset::Tabular(d) => d.core,
        };
        Self {
            id: core.id,
            kind,
            title: core.title,
            tags: extract_tags(core.tags.as_deref()).into_iter().collect(),
            download_count: core.download_count,
            created_at: core.created_at,
        }
    }
}

fn summaries(datasets: Vec<Dataset>) -> Json<Vec<DatasetSummary>> {
    Json(datasets.into_iter().map(DatasetSummary::from).collect())
}

// ── GET /datasets/{id}/related ───────────────────────────────────────────────

pub async fn get_related(
    State(state): State<AppState>,
    Path(dataset_id): Path<i32>,
) -> Result<Json<Vec<DatasetSummary>>, DatasetsServiceError> {
    let usecase = GetRelatedDatasetsUseCase {
        store: state.dataset_store(),
        weights: state.weights,
    };
    let related = usecase.execute(dataset_id).await?;
    Ok(summaries(related))
}

// ── GET /datasets/trending ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct TrendingQuery {
    pub days: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn get_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<DatasetSummary>>, DatasetsServiceError> {
    let usecase = GetTrendingDatasetsUseCase {
        store: state.dataset_store(),
    };
    let trending = usecase
        .execute(TrendingInput {
            days: query.days,
            limit: query.limit,
        })
        .await?;
    Ok(summaries(trending))
}

// ── POST /datasets/{id}/downloads ────────────────────────────────────────────

pub async fn record_download(
    State(state): State<AppState>,
    Path(dataset_id): Path<i32>,
) -> Result<Json<DatasetStats>, DatasetsServiceError> {
    let usecase = RecordDownloadUseCase {
        store: state.dataset_store(),
    };
    Ok(Json(usecase.execute(dataset_id).await?))
}

// ── GET /datasets/{id}/stats ─────────────────────────────────────────────────

pub async fn get_stats(
    State(state): State<AppState>,
    Path(dataset_id): Path<i32>,
) -> Result<Json<DatasetStats>, DatasetsServiceError> {
    let usecase = GetDatasetStatsUseCase {
        store: state.dataset_store(),
    };
    Ok(Json(usecase.execute(dataset_id).await?))
}
