use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFollowAuthors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserFollowAuthors::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserFollowAuthors::AuthorUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFollowAuthors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserFollowAuthors::UserId)
                            .col(UserFollowAuthors::AuthorUserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFollowCommunities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFollowCommunities::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFollowCommunities::CommunityId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFollowCommunities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserFollowCommunities::UserId)
                            .col(UserFollowCommunities::CommunityId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFollowCommunities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserFollowAuthors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserFollowAuthors {
    Table,
    UserId,
    AuthorUserId,
    CreatedAt,
}

#[derive(Iden)]
enum UserFollowCommunities {
    Table,
    UserId,
    CommunityId,
    CreatedAt,
}
