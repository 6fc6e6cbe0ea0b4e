use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::profile::collect_profile;
use crate::domain::types::{
    DOWNLOAD_SATURATION_LOG10, Dataset, DatasetProfile, RECENCY_WINDOW_DAYS,
    RecommendationWeights,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// `|A ∩ B| / |A ∪ B|`, 0.0 if either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Weighted popularity contribution, log-damped and saturating at 10^5 downloads.
pub fn download_score(download_count: i64, weight: f64) -> f64 {
    if download_count <= 0 {
        return 0.0;
    }
    let damped = ((download_count as f64) + 1.0).log10() / DOWNLOAD_SATURATION_LOG10;
    damped.min(1.0) * weight
}

/// Weighted freshness contribution, decaying linearly to zero over a year.
pub fn recency_score(created_at_ts: f64, now: DateTime<Utc>, weight: f64) -> f64 {
    if created_at_ts == 0.0 {
        return 0.0;
    }
    let now_ts = now.timestamp_millis() as f64 / 1000.0;
    let days_old = (now_ts - created_at_ts).max(0.0) / SECONDS_PER_DAY;
    (1.0 - days_old / RECENCY_WINDOW_DAYS).max(0.0) * weight
}

/// Similarity of `candidate` to `base` in `[0, 1]` under the default weights.
pub fn compute_score(
    base: &DatasetProfile,
    candidate: &DatasetProfile,
    weights: &RecommendationWeights,
    now: DateTime<Utc>,
) -> f64 {
    jaccard(&base.tags, &candidate.tags) * weights.tags
        + jaccard(&base.author_tokens(), &candidate.author_tokens()) * weights.authors
        + jaccard(&base.communities, &candidate.communities) * weights.communities
        + download_score(candidate.download_count, weights.downloads)
        + recency_score(candidate.created_at_ts, now, weights.recency)
}

#[derive(Debug, Clone)]
pub struct ScoredDataset {
    pub dataset: Dataset,
    pub score: f64,
    created_at_ts: f64,
}

/// Score every candidate and sort best first.
///
/// Order: score desc, downloads desc, creation time desc, id asc.
pub fn rank(
    base: &DatasetProfile,
    candidates: Vec<Dataset>,
    weights: &RecommendationWeights,
    now: DateTime<Utc>,
) -> Vec<ScoredDataset> {
    let mut scored: Vec<ScoredDataset> = candidates
        .into_iter()
        .map(|dataset| {
            let profile = collect_profile(&dataset);
            ScoredDataset {
                score: compute_score(base, &profile, weights, now),
                created_at_ts: profile.created_at_ts,
                dataset,
            }
        })
        .collect();
    scored.sort_by(compare);
    scored
}

fn compare(a: &ScoredDataset, b: &ScoredDataset) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            b.dataset
                .core()
                .download_count
                .cmp(&a.dataset.core().download_count)
        })
        .then_with(|| b.created_at_ts.total_cmp(&a.created_at_ts))
        .then_with(|| a.dataset.id().cmp(&b.dataset.id()))
}
