use fifahub_datasets::domain::types::{DatasetCore, RecommendationWeights};
use fifahub_datasets::usecase::related::GetRelatedDatasetsUseCase;

use crate::helpers::{
    MockDatasetStore, author, community, core, days_ago, ids, now, tabular, uvl,
};

fn related(store: &MockDatasetStore) -> GetRelatedDatasetsUseCase<MockDatasetStore> {
    GetRelatedDatasetsUseCase {
        store: store.clone(),
        weights: RecommendationWeights::default(),
    }
}

fn tagged(id: i32, tags: &str) -> DatasetCore {
    DatasetCore {
        tags: Some(tags.to_owned()),
        ..core(id)
    }
}

// ── Short-circuits ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_nothing_for_unknown_dataset() {
    let store = MockDatasetStore::new(vec![uvl(tagged(1, "uvl"))]);

    let result = related(&store).execute_at(99, now()).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(store.candidate_calls(), 0);
}

#[tokio::test]
async fn should_not_scan_store_when_dataset_has_no_preferences() {
    let popular = DatasetCore {
        download_count: 1_000,
        ..core(2)
    };
    let store = MockDatasetStore::new(vec![uvl(core(1)), uvl(popular)]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(store.candidate_calls(), 0);
    assert!(store.popularity_calls().is_empty());
}

// ── Ranking ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rank_tag_overlap_above_author_overlap() {
    let ada = author("Ada Lovelace", Some("0000-0002-1825-0097"));
    let base = DatasetCore {
        authors: vec![ada.clone()],
        ..tagged(1, "uvl, automotive")
    };
    let author_only = DatasetCore {
        authors: vec![ada],
        ..core(2)
    };
    let tag_only = tagged(3, "UVL, Automotive");
    let store = MockDatasetStore::new(vec![uvl(base), uvl(author_only), uvl(tag_only)]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![3, 2]);
}

#[tokio::test]
async fn should_cap_results_and_order_equal_similarity_by_downloads() {
    let mut datasets = vec![uvl(tagged(1, "uvl"))];
    for id in 2..=8 {
        datasets.push(uvl(DatasetCore {
            download_count: i64::from(id) * 10,
            ..tagged(id, "uvl")
        }));
    }
    let store = MockDatasetStore::new(datasets);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![8, 7, 6, 5, 4]);
    assert!(store.popularity_calls().is_empty());
}

#[tokio::test]
async fn should_match_communities_across_dataset_kinds() {
    let base = DatasetCore {
        communities: vec![community(1, "spl")],
        ..core(1)
    };
    let linked = DatasetCore {
        communities: vec![community(1, "spl")],
        ..core(2)
    };
    let by_attribute = DatasetCore {
        community_id: Some("spl ".to_owned()),
        download_count: 5,
        ..core(3)
    };
    let unrelated = DatasetCore {
        communities: vec![community(2, "automotive")],
        ..core(4)
    };
    let store = MockDatasetStore::new(vec![
        uvl(base),
        uvl(linked),
        tabular(by_attribute),
        uvl(unrelated),
    ]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    // Equal community overlap; 3 wins on downloads. 4 only arrives as padding.
    assert_eq!(ids(&result), vec![3, 2, 4]);
}

#[tokio::test]
async fn should_prefer_recent_candidate_on_equal_overlap() {
    let base = tagged(1, "uvl");
    let fresh = DatasetCore {
        created_at: days_ago(0),
        ..tagged(2, "uvl")
    };
    let stale = DatasetCore {
        created_at: days_ago(200),
        ..tagged(3, "uvl")
    };
    let store = MockDatasetStore::new(vec![uvl(base), uvl(stale), uvl(fresh)]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![2, 3]);
}

// ── Popularity fallback ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_pad_with_popular_datasets_excluding_chosen_ones() {
    let base = tagged(1, "uvl");
    let match_one = tagged(2, "uvl");
    let mut datasets = vec![uvl(base), uvl(match_one)];
    for (id, downloads) in [(3, 50), (4, 40), (5, 30), (6, 20), (7, 10)] {
        datasets.push(uvl(DatasetCore {
            download_count: downloads,
            ..core(id)
        }));
    }
    let store = MockDatasetStore::new(datasets);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![2, 3, 4, 5, 6]);

    let calls = store.popularity_calls();
    assert_eq!(calls.len(), 1);
    let (exclude, limit) = &calls[0];
    assert!(exclude.contains(&1) && exclude.contains(&2));
    assert_eq!(*limit, 4);
}

#[tokio::test]
async fn should_fall_back_to_popularity_without_candidates() {
    let store = MockDatasetStore::new(vec![
        uvl(tagged(1, "uvl")),
        uvl(DatasetCore {
            download_count: 10,
            ..core(2)
        }),
        tabular(DatasetCore {
            download_count: 20,
            ..core(3)
        }),
    ]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![3, 2]);
    assert_eq!(store.candidate_calls(), 1);
    assert_eq!(store.popularity_calls(), vec![(vec![1], 5)]);
}

#[tokio::test]
async fn should_fall_back_to_popularity_when_no_candidate_scores() {
    // "uvl-tools" contains "uvl" so it is fetched, but shares no whole tag; it is
    // also old and never downloaded.
    let substring_only = DatasetCore {
        created_at: days_ago(400),
        ..tagged(2, "uvl-tools")
    };
    let popular = DatasetCore {
        download_count: 100,
        ..core(3)
    };
    let store = MockDatasetStore::new(vec![
        uvl(tagged(1, "uvl")),
        uvl(substring_only),
        uvl(popular),
    ]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![3, 2]);
    assert_eq!(store.popularity_calls(), vec![(vec![1], 5)]);
}

#[tokio::test]
async fn should_never_recommend_the_dataset_itself() {
    let store = MockDatasetStore::new(vec![
        uvl(DatasetCore {
            download_count: 1_000_000,
            ..tagged(1, "uvl")
        }),
        uvl(tagged(2, "uvl")),
    ]);

    let result = related(&store).execute_at(1, now()).await.unwrap();
    assert_eq!(ids(&result), vec![2]);
}
