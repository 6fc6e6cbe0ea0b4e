use chrono::Duration;

use fifahub_datasets::domain::types::DatasetCore;
use fifahub_datasets::usecase::trending::{GetTrendingDatasetsUseCase, TrendingInput};

use crate::helpers::{MockDatasetStore, core, days_ago, ids, now, tabular, uvl};

fn trending(store: &MockDatasetStore) -> GetTrendingDatasetsUseCase<MockDatasetStore> {
    GetTrendingDatasetsUseCase {
        store: store.clone(),
    }
}

fn dataset(id: i32, downloads: i64, age_days: i64) -> DatasetCore {
    DatasetCore {
        download_count: downloads,
        created_at: days_ago(age_days),
        ..core(id)
    }
}

#[tokio::test]
async fn should_list_recent_datasets_by_downloads() {
    let store = MockDatasetStore::new(vec![
        uvl(dataset(1, 10, 3)),
        tabular(dataset(2, 30, 10)),
        uvl(dataset(3, 500, 45)),
        uvl(dataset(4, 20, 29)),
    ]);

    let result = trending(&store)
        .execute_at(TrendingInput::default(), now())
        .await
        .unwrap();
    assert_eq!(ids(&result), vec![2, 4, 1]);

    let calls = store.trending_calls();
    assert_eq!(calls, vec![(now() - Duration::days(30), 5)]);
    assert!(store.popularity_calls().is_empty());
}

#[tokio::test]
async fn should_honor_custom_window() {
    let store = MockDatasetStore::new(vec![uvl(dataset(1, 10, 3)), uvl(dataset(3, 500, 45))]);

    let result = trending(&store)
        .execute_at(
            TrendingInput {
                days: Some(60),
                limit: None,
            },
            now(),
        )
        .await
        .unwrap();
    assert_eq!(ids(&result), vec![3, 1]);
}

#[tokio::test]
async fn should_fall_back_to_all_time_top_when_window_is_empty() {
    let store = MockDatasetStore::new(vec![
        uvl(dataset(1, 10, 100)),
        uvl(dataset(2, 90, 400)),
    ]);

    let result = trending(&store)
        .execute_at(TrendingInput::default(), now())
        .await
        .unwrap();
    assert_eq!(ids(&result), vec![2, 1]);
    assert_eq!(store.popularity_calls(), vec![(Vec::new(), 5)]);
}

#[tokio::test]
async fn should_clamp_limit_and_days() {
    let store = MockDatasetStore::new(vec![uvl(dataset(1, 10, 0))]);
    let usecase = trending(&store);

    usecase
        .execute_at(
            TrendingInput {
                days: Some(0),
                limit: Some(0),
            },
            now(),
        )
        .await
        .unwrap();
    usecase
        .execute_at(
            TrendingInput {
                days: Some(7),
                limit: Some(500),
            },
            now(),
        )
        .await
        .unwrap();

    assert_eq!(
        store.trending_calls(),
        vec![
            (now() - Duration::days(1), 1),
            (now() - Duration::days(7), 50),
        ]
    );
}
