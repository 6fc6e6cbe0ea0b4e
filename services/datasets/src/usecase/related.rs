use chrono::{DateTime, Utc};

use crate::domain::profile::collect_profile;
use crate::domain::repository::{CandidateQuery, DatasetStore};
use crate::domain::scoring::rank;
use crate::domain::types::{Dataset, MAX_RESULTS, RecommendationWeights};
use crate::error::DatasetsServiceError;

/// Up to [`MAX_RESULTS`] datasets related to one dataset, best match first.
///
/// Candidates share at least a tag, an author or a community with the base dataset.
/// When there are none, or none scores above zero, the most downloaded datasets are
/// returned instead; a short scored list is padded the same way.
pub struct GetRelatedDatasetsUseCase<S: DatasetStore> {
    pub store: S,
    pub weights: RecommendationWeights,
}

impl<S: DatasetStore> GetRelatedDatasetsUseCase<S> {
    pub async fn execute(&self, dataset_id: i32) -> Result<Vec<Dataset>, DatasetsServiceError> {
        self.execute_at(dataset_id, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        dataset_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        let Some(base) = self.store.find_by_id(dataset_id).await? else {
            return Ok(Vec::new());
        };

        let profile = collect_profile(&base);
        // Nothing to compare on; no store scan.
        if !profile.has_preferences() {
            return Ok(Vec::new());
        }

        let query = CandidateQuery::from_profile(dataset_id, &profile);
        if query.is_empty() {
            return self.popular(&[dataset_id], MAX_RESULTS).await;
        }

        let candidates = self.store.find_candidates(&query).await?;
        if candidates.is_empty() {
            return self.popular(&[dataset_id], MAX_RESULTS).await;
        }

        let ranked = rank(&profile, candidates, &self.weights, now);
        if ranked.iter().all(|s| s.score <= 0.0) {
            tracing::debug!(dataset_id, "no candidate scored; using popularity");
            return self.popular(&[dataset_id], MAX_RESULTS).await;
        }

        let mut results: Vec<Dataset> = ranked
            .into_iter()
            .filter(|s| s.dataset.id() != dataset_id)
            .take(MAX_RESULTS)
            .map(|s| s.dataset)
            .collect();

        if results.len() < MAX_RESULTS {
            let mut used: Vec<i32> = results.iter().map(Dataset::id).collect();
            used.push(dataset_id);
            let padding = self.popular(&used, MAX_RESULTS - results.len()).await?;
            results.extend(padding);
        }

        results.truncate(MAX_RESULTS);
        Ok(results)
    }

    async fn popular(
        &self,
        exclude: &[i32],
        limit: usize,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        self.store.top_by_popularity(exclude, limit).await
    }
}
