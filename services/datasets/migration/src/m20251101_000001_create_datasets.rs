use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Datasets::Kind)
                            .string()
                            .not_null()
                            .default("uvl"),
                    )
                    .col(ColumnDef::new(Datasets::Title).string().not_null())
                    .col(ColumnDef::new(Datasets::Tags).text().null())
                    .col(ColumnDef::new(Datasets::CommunityId).string().null())
                    .col(
                        ColumnDef::new(Datasets::DownloadCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Datasets::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Datasets::UvlFilename).string().null())
                    .col(ColumnDef::new(Datasets::UvlVersion).string().null())
                    .col(ColumnDef::new(Datasets::RowsCount).big_integer().null())
                    .col(ColumnDef::new(Datasets::SchemaJson).text().null())
                    .to_owned(),
            )
            .await?;

        // Popularity fallback and trending both sort on these.
        manager
            .create_index(
                Index::create()
                    .table(Datasets::Table)
                    .col(Datasets::DownloadCount)
                    .col(Datasets::CreatedAt)
                    .name("idx_datasets_popularity")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
    Kind,
    Title,
    Tags,
    CommunityId,
    DownloadCount,
    CreatedAt,
    UvlFilename,
    UvlVersion,
    RowsCount,
    SchemaJson,
}
