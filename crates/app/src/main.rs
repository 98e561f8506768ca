use clap::Parser;
use engine::Store;
use migration::{Migrator, MigratorTrait};

use crate::{cli::Cli, error::Result};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},engine={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("opening {}", settings.database_url);
    let database = sea_orm::Database::connect(&settings.database_url).await?;
    Migrator::up(&database, None).await?;

    let mut store = Store::builder().database(database).build().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, &mut store, &settings, &mut out).await
}
