use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(fifahub_auth_migration::Migrator).await;
}
