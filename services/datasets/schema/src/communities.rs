use sea_orm::entity::prelude::*;

/// A community datasets can be published under. Every identifier column is
/// optional; the first non-empty one of `slug`, `code`, `name`, `identifier`
/// names the community, falling back to `id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "communities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dataset_communities::Entity")]
    DatasetCommunities,
}

impl Related<super::dataset_communities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DatasetCommunities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
