use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Communities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Communities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Communities::Slug).string().null().unique_key())
                    .col(ColumnDef::new(Communities::Code).string().null())
                    .col(ColumnDef::new(Communities::Name).string().null())
                    .col(ColumnDef::new(Communities::Identifier).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DatasetCommunities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DatasetCommunities::DatasetId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DatasetCommunities::CommunityId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DatasetCommunities::DatasetId)
                            .col(DatasetCommunities::CommunityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DatasetCommunities::Table, DatasetCommunities::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DatasetCommunities::Table, DatasetCommunities::CommunityId)
                            .to(Communities::Table, Communities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(DatasetCommunities::Table)
                    .col(DatasetCommunities::CommunityId)
                    .name("idx_dataset_communities_community_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DatasetCommunities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Communities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Communities {
    Table,
    Id,
    Slug,
    Code,
    Name,
    Identifier,
}

#[derive(Iden)]
enum DatasetCommunities {
    Table,
    DatasetId,
    CommunityId,
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
}
