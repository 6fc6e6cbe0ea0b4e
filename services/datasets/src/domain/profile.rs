//! Similarity profile extraction.
//!
//! Text attributes are compared after [`normalize_text`]: trimmed, lowercased and with
//! internal whitespace runs collapsed to one space. ORCIDs are only trimmed.

use std::collections::BTreeSet;

use crate::domain::types::{Author, Community, CommunityKey, Dataset, DatasetCore, DatasetProfile};

/// Prefix of the legacy community marker some datasets carry in their tag list.
const LEGACY_COMMUNITY_TAG_PREFIX: &str = "community:";

pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comma-split tag set; empty tokens are dropped.
pub fn extract_tags(tags: Option<&str>) -> BTreeSet<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(normalize_text)
            .filter(|tag| !tag.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// `(names, orcids)` of the dataset's authors.
pub fn extract_authors(authors: &[Author]) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut names = BTreeSet::new();
    let mut orcids = BTreeSet::new();
    for author in authors {
        let name = normalize_text(&author.name);
        if !name.is_empty() {
            names.insert(name);
        }
        if let Some(orcid) = author.orcid.as_deref().map(str::trim) {
            if !orcid.is_empty() {
                orcids.insert(orcid.to_owned());
            }
        }
    }
    (names, orcids)
}

/// The value a community is known by: the first non-blank of slug, code, name and
/// identifier, else its id.
pub fn community_key(community: &Community) -> CommunityKey {
    [
        &community.slug,
        &community.code,
        &community.name,
        &community.identifier,
    ]
    .into_iter()
    .filter_map(|v| v.as_deref().map(str::trim))
    .find(|v| !v.is_empty())
    .map(|v| CommunityKey::Text(v.to_owned()))
    .unwrap_or(CommunityKey::Id(community.id))
}

/// `(normalised identifiers, raw lookup keys)`.
///
/// Linked community rows win. Without any, the dataset-level `community_id` is used, and
/// only when that is blank too the legacy `community:<value>` tag.
pub fn extract_communities(core: &DatasetCore) -> (BTreeSet<String>, BTreeSet<CommunityKey>) {
    let mut keys: BTreeSet<CommunityKey> = core.communities.iter().map(community_key).collect();

    if keys.is_empty() {
        if let Some(id) = core
            .community_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            keys.insert(CommunityKey::Text(id.to_owned()));
        }
    }

    if keys.is_empty() {
        keys.extend(legacy_community_tags(core.tags.as_deref()));
    }

    let normalized = keys
        .iter()
        .map(|key| match key {
            CommunityKey::Text(s) => normalize_text(s),
            CommunityKey::Id(id) => id.to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect();

    (normalized, keys)
}

fn legacy_community_tags(tags: Option<&str>) -> Vec<CommunityKey> {
    let Some(tags) = tags else {
        return Vec::new();
    };
    tags.split(',')
        .map(str::trim)
        .filter_map(|token| {
            let prefix = token.get(..LEGACY_COMMUNITY_TAG_PREFIX.len())?;
            if !prefix.eq_ignore_ascii_case(LEGACY_COMMUNITY_TAG_PREFIX) {
                return None;
            }
            let value = token[LEGACY_COMMUNITY_TAG_PREFIX.len()..].trim();
            (!value.is_empty()).then(|| CommunityKey::Text(value.to_owned()))
        })
        .collect()
}

pub fn collect_profile(dataset: &Dataset) -> DatasetProfile {
    let core = dataset.core();
    let (author_names, author_orcids) = extract_authors(&core.authors);
    let (communities, community_keys) = extract_communities(core);

    DatasetProfile {
        tags: extract_tags(core.tags.as_deref()),
        author_names,
        author_orcids,
        communities,
        community_keys,
        download_count: core.download_count,
        created_at_ts: core
            .created_at
            .map(|at| at.timestamp_millis() as f64 / 1000.0)
            .unwrap_or(0.0),
    }
}
