use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use fifahub_domain::dataset::DatasetKind;

// ── Recommendation policy ────────────────────────────────────────────────────

/// Upper bound on related datasets returned for one dataset.
pub const MAX_RESULTS: usize = 5;

/// `log10` of the download count treated as maximum popularity (100 000).
pub const DOWNLOAD_SATURATION_LOG10: f64 = 5.0;

/// Age in days at which the recency signal reaches zero.
pub const RECENCY_WINDOW_DAYS: f64 = 365.0;

pub const TRENDING_DEFAULT_DAYS: u32 = 30;
pub const TRENDING_MAX_DAYS: u32 = 3650;
pub const TRENDING_DEFAULT_LIMIT: u32 = 5;
pub const TRENDING_MAX_LIMIT: u32 = 50;

/// Weight of each similarity factor. The defaults sum to 1.0, so a score is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationWeights {
    pub tags: f64,
    pub communities: f64,
    pub authors: f64,
    pub downloads: f64,
    pub recency: f64,
}

impl RecommendationWeights {
    pub const DEFAULT: Self = Self {
        tags: 0.40,
        communities: 0.30,
        authors: 0.20,
        downloads: 0.05,
        recency: 0.05,
    };
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Datasets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: i32,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub identifier: Option<String>,
}

/// Fields every dataset flavour carries.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetCore {
    pub id: i32,
    pub title: String,
    /// Comma-separated tag list as stored.
    pub tags: Option<String>,
    pub authors: Vec<Author>,
    pub communities: Vec<Community>,
    /// Dataset-level community attribute, consulted when no community row is linked.
    pub community_id: Option<String>,
    pub download_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UvlDataset {
    pub core: DatasetCore,
    pub uvl_filename: Option<String>,
    pub uvl_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    pub core: DatasetCore,
    pub rows_count: Option<i64>,
    pub schema_json: Option<String>,
}

/// A dataset of either flavour. Recommendation only looks at [`DatasetCore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Uvl(UvlDataset),
    Tabular(TabularDataset),
}

impl Dataset {
    pub fn core(&self) -> &DatasetCore {
        match self {
            Self::Uvl(d) => &d.core,
            Self::Tabular(d) => &d.core,
        }
    }

    pub fn id(&self) -> i32 {
        self.core().id
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Uvl(_) => DatasetKind::Uvl,
            Self::Tabular(_) => DatasetKind::Tabular,
        }
    }
}

// ── Profiles ─────────────────────────────────────────────────────────────────

/// Raw value used to look a community up in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommunityKey {
    Text(String),
    Id(i32),
}

/// Normalised similarity attributes of one dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetProfile {
    pub tags: BTreeSet<String>,
    pub author_names: BTreeSet<String>,
    /// Trimmed, case preserved.
    pub author_orcids: BTreeSet<String>,
    pub communities: BTreeSet<String>,
    pub community_keys: BTreeSet<CommunityKey>,
    pub download_count: i64,
    /// Unix seconds; 0.0 when the creation time is unknown.
    pub created_at_ts: f64,
}

impl DatasetProfile {
    /// Whether there is anything to match other datasets on.
    pub fn has_preferences(&self) -> bool {
        !(self.tags.is_empty()
            && self.author_names.is_empty()
            && self.author_orcids.is_empty()
            && self.communities.is_empty())
    }

    /// Names and ORCIDs as one set; the two are compared interchangeably.
    pub fn author_tokens(&self) -> BTreeSet<String> {
        self.author_names
            .union(&self.author_orcids)
            .cloned()
            .collect()
    }
}

// ── Follows ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedAuthor {
    pub author_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedCommunity {
    pub community_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub dataset_id: i32,
    pub downloads: i64,
}
