use sea_orm::entity::prelude::*;

/// One row per dataset. `kind` selects which of the flavour columns are set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub title: String,
    /// Comma-separated, as entered by the uploader.
    pub tags: Option<String>,
    pub community_id: Option<String>,
    pub download_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    // uvl
    pub uvl_filename: Option<String>,
    pub uvl_version: Option<String>,
    // tabular
    pub rows_count: Option<i64>,
    pub schema_json: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::authors::Entity")]
    Authors,
    #[sea_orm(has_many = "super::dataset_communities::Entity")]
    DatasetCommunities,
}

impl Related<super::authors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authors.def()
    }
}

impl Related<super::dataset_communities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DatasetCommunities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
