use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(fifahub_datasets_migration::Migrator).await;
}
