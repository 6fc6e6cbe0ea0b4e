use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Statement, Value,
    sea_query::{Expr, NullOrdering, OnConflict, Order},
};
use uuid::Uuid;

use fifahub_datasets_schema::{
    authors, communities, dataset_communities, datasets, user_follow_authors,
    user_follow_communities,
};
use fifahub_domain::dataset::DatasetKind;

use crate::domain::repository::{CandidateQuery, DatasetStore, FollowRepository};
use crate::domain::types::{
    Author, Community, CommunityKey, Dataset, DatasetCore, DatasetStats, FollowedAuthor,
    FollowedCommunity, TabularDataset, UvlDataset,
};
use crate::error::DatasetsServiceError;

// ── DatasetStore ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDatasetStore {
    pub db: DatabaseConnection,
}

impl DatasetStore for DbDatasetStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Dataset>, DatasetsServiceError> {
        let Some(model) = datasets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find dataset by id")?
        else {
            return Ok(None);
        };
        Ok(self.attach_relations(vec![model]).await?.pop())
    }

    async fn find_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        let Some((sql, values)) = candidate_statement(query) else {
            return Ok(Vec::new());
        };

        #[derive(Debug, FromQueryResult)]
        struct IdRow {
            id: i32,
        }

        let ids: Vec<i32> = IdRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            &sql,
            values,
        ))
        .all(&self.db)
        .await
        .context("find candidate dataset ids")?
        .into_iter()
        .map(|row| row.id)
        .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = datasets::Entity::find()
            .filter(datasets::Column::Id.is_in(ids))
            .order_by_asc(datasets::Column::Id)
            .all(&self.db)
            .await
            .context("load candidate datasets")?;
        self.attach_relations(models).await
    }

    async fn top_by_popularity(
        &self,
        exclude: &[i32],
        limit: usize,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut select = datasets::Entity::find();
        if !exclude.is_empty() {
            select = select.filter(datasets::Column::Id.is_not_in(exclude.to_vec()));
        }
        let models = select
            .order_by_desc(datasets::Column::DownloadCount)
            .order_by_with_nulls(datasets::Column::CreatedAt, Order::Desc, NullOrdering::Last)
            .order_by_asc(datasets::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list datasets by popularity")?;
        self.attach_relations(models).await
    }

    async fn trending(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let models = datasets::Entity::find()
            .filter(datasets::Column::CreatedAt.gte(since))
            .order_by_desc(datasets::Column::DownloadCount)
            .order_by_desc(datasets::Column::CreatedAt)
            .order_by_asc(datasets::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list trending datasets")?;
        self.attach_relations(models).await
    }

    async fn record_download(&self, id: i32) -> Result<bool, DatasetsServiceError> {
        let result = datasets::Entity::update_many()
            .col_expr(
                datasets::Column::DownloadCount,
                Expr::col(datasets::Column::DownloadCount).add(1),
            )
            .filter(datasets::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment dataset download count")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_stats(&self, id: i32) -> Result<Option<DatasetStats>, DatasetsServiceError> {
        let downloads: Option<i64> = datasets::Entity::find_by_id(id)
            .select_only()
            .column(datasets::Column::DownloadCount)
            .into_tuple()
            .one(&self.db)
            .await
            .context("find dataset stats")?;
        Ok(downloads.map(|downloads| DatasetStats {
            dataset_id: id,
            downloads,
        }))
    }
}

impl DbDatasetStore {
    /// Load authors and communities for `models` in two queries, keeping the input order.
    async fn attach_relations(
        &self,
        models: Vec<datasets::Model>,
    ) -> Result<Vec<Dataset>, DatasetsServiceError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let author_rows = authors::Entity::find()
            .filter(authors::Column::DatasetId.is_in(ids.clone()))
            .order_by_asc(authors::Column::Id)
            .all(&self.db)
            .await
            .context("load dataset authors")?;

        let community_rows = dataset_communities::Entity::find()
            .filter(dataset_communities::Column::DatasetId.is_in(ids))
            .find_also_related(communities::Entity)
            .order_by_asc(dataset_communities::Column::CommunityId)
            .all(&self.db)
            .await
            .context("load dataset communities")?;

        let mut authors_by_dataset: HashMap<i32, Vec<Author>> = HashMap::new();
        for row in author_rows {
            authors_by_dataset
                .entry(row.dataset_id)
                .or_default()
                .push(Author {
                    name: row.name,
                    orcid: row.orcid,
                });
        }

        let mut communities_by_dataset: HashMap<i32, Vec<Community>> = HashMap::new();
        for (link, community) in community_rows {
            if let Some(community) = community {
                communities_by_dataset
                    .entry(link.dataset_id)
                    .or_default()
                    .push(community_from_model(community));
            }
        }

        let datasets = models
            .into_iter()
            .map(|model| {
                let authors = authors_by_dataset.remove(&model.id).unwrap_or_default();
                let communities = communities_by_dataset.remove(&model.id).unwrap_or_default();
                dataset_from_model(model, authors, communities)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(datasets)
    }
}

// ── Candidate query ──────────────────────────────────────────────────────────

/// Positional parameter list for a raw Postgres statement.
#[derive(Default)]
struct Params {
    values: Vec<Value>,
}

impl Params {
    fn bind(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    fn bind_list<T: Into<Value>>(&mut self, items: impl IntoIterator<Item = T>) -> String {
        items
            .into_iter()
            .map(|item| self.bind(item))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Community identifier as the profile extraction resolves it from a row.
const COMMUNITY_KEY_SQL: &str = "COALESCE(NULLIF(TRIM(c.slug), ''), NULLIF(TRIM(c.code), ''), \
     NULLIF(TRIM(c.name), ''), NULLIF(TRIM(c.identifier), ''))";

/// `SELECT DISTINCT d.id ...` matching any criterion of `query`, or `None` when
/// there is nothing to match on.
fn candidate_statement(query: &CandidateQuery) -> Option<(String, Vec<Value>)> {
    let mut params = Params::default();
    let exclude = params.bind(query.exclude_id);
    let mut clauses: Vec<String> = Vec::new();

    for tag in &query.tags {
        let p = params.bind(format!("%{}%", escape_like(tag)));
        clauses.push(format!("d.tags ILIKE {p}"));
    }

    if !query.author_orcids.is_empty() {
        let list = params.bind_list(query.author_orcids.iter().cloned());
        clauses.push(format!("a.orcid IN ({list})"));
    }
    if !query.author_names.is_empty() {
        let list = params.bind_list(query.author_names.iter().cloned());
        clauses.push(format!("LOWER(a.name) IN ({list})"));
    }

    let mut texts: Vec<String> = Vec::new();
    let mut ids: Vec<i32> = Vec::new();
    for key in &query.community_keys {
        match key {
            CommunityKey::Text(s) => texts.push(s.clone()),
            CommunityKey::Id(id) => ids.push(*id),
        }
    }

    if !texts.is_empty() {
        let list = params.bind_list(texts);
        clauses.push(format!("{COMMUNITY_KEY_SQL} IN ({list})"));
        clauses.push(format!("TRIM(d.community_id) IN ({list})"));
    }
    if !ids.is_empty() {
        let list = params.bind_list(ids);
        clauses.push(format!("c.id IN ({list})"));
    }

    if clauses.is_empty() {
        return None;
    }

    let sql = format!(
        r#"
        SELECT DISTINCT d.id
            FROM datasets d
            LEFT JOIN authors a ON a.dataset_id = d.id
            LEFT JOIN dataset_communities dc ON dc.dataset_id = d.id
            LEFT JOIN communities c ON c.id = dc.community_id
            WHERE d.id <> {exclude}
              AND ({})
        "#,
        clauses.join(" OR "),
    );
    Some((sql, params.values))
}

/// Escape `LIKE` wildcards so a tag only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ── Model mappers ────────────────────────────────────────────────────────────

fn community_from_model(model: communities::Model) -> Community {
    Community {
        id: model.id,
        slug: model.slug,
        code: model.code,
        name: model.name,
        identifier: model.identifier,
    }
}

fn dataset_from_model(
    model: datasets::Model,
    authors: Vec<Author>,
    communities: Vec<Community>,
) -> anyhow::Result<Dataset> {
    let kind: DatasetKind = model
        .kind
        .parse()
        .with_context(|| format!("dataset {} has an unreadable kind", model.id))?;
    let core = DatasetCore {
        id: model.id,
        title: model.title,
        tags: model.tags,
        authors,
        communities,
        community_id: model.community_id,
        download_count: model.download_count,
        created_at: model.created_at,
    };
    Ok(match kind {
        DatasetKind::Uvl => Dataset::Uvl(UvlDataset {
            core,
            uvl_filename: model.uvl_filename,
            uvl_version: model.uvl_version,
        }),
        DatasetKind::Tabular => Dataset::Tabular(TabularDataset {
            core,
            rows_count: model.rows_count,
            schema_json: model.schema_json,
        }),
    })
}

// ── FollowRepository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn follow_author(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<(), DatasetsServiceError> {
        let follow = user_follow_authors::ActiveModel {
            user_id: Set(user_id),
            author_user_id: Set(author_user_id),
            created_at: Set(Utc::now()),
        };
        user_follow_authors::Entity::insert(follow)
            .on_conflict(
                OnConflict::columns([
                    user_follow_authors::Column::UserId,
                    user_follow_authors::Column::AuthorUserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("follow author")?;
        Ok(())
    }

    async fn unfollow_author(
        &self,
        user_id: Uuid,
        author_user_id: Uuid,
    ) -> Result<bool, DatasetsServiceError> {
        let result = user_follow_authors::Entity::delete_many()
            .filter(user_follow_authors::Column::UserId.eq(user_id))
            .filter(user_follow_authors::Column::AuthorUserId.eq(author_user_id))
            .exec(&self.db)
            .await
            .context("unfollow author")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_authors(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FollowedAuthor>, DatasetsServiceError> {
        let rows = user_follow_authors::Entity::find()
            .filter(user_follow_authors::Column::UserId.eq(user_id))
            .order_by_desc(user_follow_authors::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok(rows
            .into_iter()
            .map(|row| FollowedAuthor {
                author_user_id: row.author_user_id,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn follow_community(
        &self,
        user_id: Uuid,
        community_id: &str,
    ) -> Result<(), DatasetsServiceError> {
        let follow = user_follow_communities::ActiveModel {
            user_id: Set(user_id),
            community_id: Set(community_id.to_owned()),
            created_at: Set(Utc::now()),
        };
        user_follow_communities::Entity::insert(follow)
            .on_conflict(
                OnConflict::columns([
                    user_follow_communities::Column::UserId,
                    user_follow_communities::Column::CommunityId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("follow community")?;
        Ok(())
    }

    async fn unfollow_community(
        &self,
        user_id: Uuid,
        community_id: &str,
    ) -> Result<bool, DatasetsServiceError> {
        let result = user_follow_communities::Entity::delete_many()
            .filter(user_follow_communities::Column::UserId.eq(user_id))
            .filter(user_follow_communities::Column::CommunityId.eq(community_id))
            .exec(&self.db)
            .await
            .context("unfollow community")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_communities(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FollowedCommunity>, DatasetsServiceError> {
        let rows = user_follow_communities::Entity::find()
            .filter(user_follow_communities::Column::UserId.eq(user_id))
            .order_by_desc(user_follow_communities::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list followed communities")?;
        Ok(rows
            .into_iter()
            .map(|row| FollowedCommunity {
                community_id: row.community_id,
                created_at: row.created_at,
            })
            .collect())
    }
}
