use crate::domain::repository::DatasetStore;
use crate::domain::types::DatasetStats;
use crate::error::DatasetsServiceError;

// ── RecordDownload ────────────────────────────────────────────────────────────

pub struct RecordDownloadUseCase<S: DatasetStore> {
    pub store: S,
}

impl<S: DatasetStore> RecordDownloadUseCase<S> {
    /// Count one download and return the stats as they stand afterwards.
    pub async fn execute(&self, dataset_id: i32) -> Result<DatasetStats, DatasetsServiceError> {
        if !self.store.record_download(dataset_id).await? {
            return Err(DatasetsServiceError::DatasetNotFound);
        }
        let stats = self
            .store
            .find_stats(dataset_id)
            .await?
            .ok_or(DatasetsServiceError::DatasetNotFound)?;
        tracing::info!(dataset_id, downloads = stats.downloads, "download recorded");
        Ok(stats)
    }
}

// ── GetDatasetStats ───────────────────────────────────────────────────────────

pub struct GetDatasetStatsUseCase<S: DatasetStore> {
    pub store: S,
}

impl<S: DatasetStore> GetDatasetStatsUseCase<S> {
    pub async fn execute(&self, dataset_id: i32) -> Result<DatasetStats, DatasetsServiceError> {
        self.store
            .find_stats(dataset_id)
            .await?
            .ok_or(DatasetsServiceError::DatasetNotFound)
    }
}
