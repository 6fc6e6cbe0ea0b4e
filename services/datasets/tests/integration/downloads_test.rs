use fifahub_datasets::domain::types::{DatasetCore, DatasetStats};
use fifahub_datasets::error::DatasetsServiceError;
use fifahub_datasets::usecase::downloads::{GetDatasetStatsUseCase, RecordDownloadUseCase};
use fifahub_datasets::usecase::trending::{GetTrendingDatasetsUseCase, TrendingInput};

use crate::helpers::{MockDatasetStore, core, days_ago, ids, now, tabular, uvl};

fn record(store: &MockDatasetStore) -> RecordDownloadUseCase<MockDatasetStore> {
    RecordDownloadUseCase {
        store: store.clone(),
    }
}

fn stats(store: &MockDatasetStore) -> GetDatasetStatsUseCase<MockDatasetStore> {
    GetDatasetStatsUseCase {
        store: store.clone(),
    }
}

#[tokio::test]
async fn should_count_each_download() {
    let store = MockDatasetStore::new(vec![uvl(core(1))]);

    let first = record(&store).execute(1).await.unwrap();
    assert_eq!(
        first,
        DatasetStats {
            dataset_id: 1,
            downloads: 1
        }
    );
    let second = record(&store).execute(1).await.unwrap();
    assert_eq!(second.downloads, 2);

    let read = stats(&store).execute(1).await.unwrap();
    assert_eq!(read.downloads, 2);
    assert_eq!(store.download_count(1), Some(2));
}

#[tokio::test]
async fn should_start_from_existing_count() {
    let store = MockDatasetStore::new(vec![tabular(DatasetCore {
        download_count: 41,
        ..core(7)
    })]);

    let result = record(&store).execute(7).await.unwrap();
    assert_eq!(result.downloads, 42);
}

#[tokio::test]
async fn should_reject_download_of_unknown_dataset() {
    let store = MockDatasetStore::new(vec![uvl(core(1))]);

    let result = record(&store).execute(99).await;
    assert!(
        matches!(result, Err(DatasetsServiceError::DatasetNotFound)),
        "expected DatasetNotFound, got {result:?}"
    );
    assert_eq!(store.download_count(1), Some(0));
}

#[tokio::test]
async fn should_report_missing_stats_as_not_found() {
    let store = MockDatasetStore::new(Vec::new());

    let result = stats(&store).execute(3).await;
    assert!(
        matches!(result, Err(DatasetsServiceError::DatasetNotFound)),
        "expected DatasetNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_feed_recorded_downloads_into_trending() {
    let store = MockDatasetStore::new(vec![
        uvl(DatasetCore {
            download_count: 1,
            created_at: days_ago(2),
            ..core(1)
        }),
        uvl(DatasetCore {
            download_count: 1,
            created_at: days_ago(3),
            ..core(2)
        }),
    ]);
    let trending = GetTrendingDatasetsUseCase {
        store: store.clone(),
    };

    let before = trending
        .execute_at(TrendingInput::default(), now())
        .await
        .unwrap();
    assert_eq!(ids(&before), vec![1, 2]);

    record(&store).execute(2).await.unwrap();
    let after = trending
        .execute_at(TrendingInput::default(), now())
        .await
        .unwrap();
    assert_eq!(ids(&after), vec![2, 1]);
}
