use chrono::{DateTime, Duration, Utc};

use crate::domain::repository::DatasetStore;
use crate::domain::types::{
    Dataset, TRENDING_DEFAULT_DAYS, TRENDING_DEFAULT_LIMIT, TRENDING_MAX_DAYS, TRENDING_MAX_LIMIT,
};
use crate::error::DatasetsServiceError;

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendingInput {
    pub days: Option<u32>,
    pub limit: Option<u32>,
}

/// Most downloaded datasets created within the last `days`, or of all time when
/// that window holds none.
pub struct GetTrendingDatasetsUseCase<S: DatasetStore> {
    pub store: S,
}

impl<S: DatasetStore> GetTrendingDatasetsUseCase<S> {
    pub async fn execute(&self, input: TrendingInput) -> Result<Vec<Dataset>, DatasetsServiceError> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: TrendingInput,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        let days = input
            .days
            .unwrap_or(TRENDING_DEFAULT_DAYS)
            .clamp(1, TRENDING_MAX_DAYS);
        let limit = input
            .limit
            .unwrap_or(TRENDING_DEFAULT_LIMIT)
            .clamp(1, TRENDING_MAX_LIMIT) as usize;

        let since = now - Duration::days(i64::from(days));
        let recent = self.store.trending(since, limit).await?;
        if !recent.is_empty() {
            return Ok(recent);
        }
        self.store.top_by_popularity(&[], limit).await
    }
}
