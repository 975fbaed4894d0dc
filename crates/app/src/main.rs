use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use crate::{error::Result, settings::Database};

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "simple_payments={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

/// Open the configured database and bring its schema up to date.
async fn connect(config: &Database) -> Result<DatabaseConnection> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };
    tracing::info!("opening database {url}");

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
