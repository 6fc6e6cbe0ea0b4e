use sea_orm_migration::prelude::*;

mod m20251101_000001_create_datasets;
mod m20251101_000002_create_authors;
mod m20251101_000003_create_communities;
mod m20251101_000004_create_follows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_datasets::Migration),
            Box::new(m20251101_000002_create_authors::Migration),
            Box::new(m20251101_000003_create_communities::Migration),
            Box::new(m20251101_000004_create_follows::Migration),
        ]
    }
}
